//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult, DateRange};
use crate::domain::config_validation::{
    optional_date, optional_number, strategy_params, validate_backtest_config,
    validate_data_config, validate_strategy_config, validate_strategy_params,
};
use crate::domain::error::BacktestError;
use crate::domain::strategy::{StrategyKind, StrategyParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, Interval, MAX_LIMIT};
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "candlebt", about = "Single-position candle backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and emit the JSON result
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        interval: Option<String>,
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List supported strategies and their default parameters
    Strategies,
}

/// Where to read candles from and how many.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub dir: PathBuf,
    pub symbol: String,
    pub interval: Interval,
    pub limit: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            interval,
            strategy,
            output,
        } => run_backtest(
            &config,
            symbol.as_deref(),
            interval.as_deref(),
            strategy.as_deref(),
            output.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Strategies => run_strategies(),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn report_error(err: &BacktestError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn run_backtest(
    config_path: &Path,
    symbol_override: Option<&str>,
    interval_override: Option<&str>,
    strategy_override: Option<&str>,
    output_path: Option<&Path>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate and assemble typed settings
    if let Err(e) = validate_backtest_config(&adapter) {
        return report_error(&e);
    }
    let settings = match build_data_settings(&adapter, symbol_override, interval_override) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };
    let params = match build_strategy(&adapter, strategy_override) {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    let range = match build_date_range(&adapter) {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    // Stage 3: Fetch, run, report
    let data_port = CsvAdapter::new(settings.dir.clone());
    run_backtest_pipeline(
        &data_port,
        &settings,
        &params,
        &bt_config,
        &range,
        output_path,
    )
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, BacktestError> {
    let defaults = BacktestConfig::default();
    let bt_config = BacktestConfig {
        initial_capital: optional_number(config, "backtest", "initial_capital")?
            .unwrap_or(defaults.initial_capital),
        commission_rate: optional_number(config, "backtest", "commission_rate")?
            .unwrap_or(defaults.commission_rate),
    };
    bt_config.validate()?;
    Ok(bt_config)
}

pub fn build_date_range(config: &dyn ConfigPort) -> Result<DateRange, BacktestError> {
    Ok(DateRange {
        start: optional_date(config, "start_date")?,
        end: optional_date(config, "end_date")?,
    })
}

/// Strategy from `[strategy] type` (or `tag_override`) and `[strategy.params]`.
pub fn build_strategy(
    config: &dyn ConfigPort,
    tag_override: Option<&str>,
) -> Result<StrategyParams, BacktestError> {
    let tag = match tag_override {
        Some(tag) => tag.to_string(),
        None => {
            validate_strategy_config(config)?;
            config.get_string("strategy", "type").unwrap_or_default()
        }
    };
    let kind = StrategyKind::from_tag(&tag);
    let params = strategy_params(config)?;
    validate_strategy_params(kind, &params)?;
    Ok(StrategyParams::from_map(kind, &params))
}

pub fn build_data_settings(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
    interval_override: Option<&str>,
) -> Result<DataSettings, BacktestError> {
    validate_data_config(config)?;

    let symbol = symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BacktestError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        })?;

    let interval = interval_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "interval"))
        .map(|tag| Interval::parse_or_default(&tag))
        .unwrap_or_default();

    let limit = optional_number(config, "data", "limit")?
        .map_or(MAX_LIMIT, |l| l as usize)
        .min(MAX_LIMIT);

    Ok(DataSettings {
        dir: PathBuf::from(config.get_string("data", "dir").unwrap_or_default().trim()),
        symbol,
        interval,
        limit,
    })
}

/// Fetch candles, narrow them to `range` and run the engine.
pub fn execute_backtest(
    data_port: &dyn DataPort,
    settings: &DataSettings,
    params: &StrategyParams,
    bt_config: &BacktestConfig,
    range: &DateRange,
) -> Result<BacktestResult, BacktestError> {
    let (start_time, _) = range.bounds();
    let candles = data_port.fetch_candles(
        &settings.symbol,
        settings.interval,
        settings.limit,
        start_time,
    )?;
    let candles = range.filter(candles);

    eprintln!(
        "Running {} on {} {}: {} candles",
        params.kind(),
        settings.symbol,
        settings.interval,
        candles.len()
    );
    backtest_engine::run_with_params(&candles, params, bt_config)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    settings: &DataSettings,
    params: &StrategyParams,
    bt_config: &BacktestConfig,
    range: &DateRange,
    output_path: Option<&Path>,
) -> ExitCode {
    let result = match execute_backtest(data_port, settings, params, bt_config, range) {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    print_summary(&result);

    let reporter = JsonReportAdapter::new(true);
    match output_path {
        Some(path) => {
            if let Err(e) = reporter.write(&result, path) {
                return report_error(&e);
            }
            eprintln!("\nResult written to: {}", path.display());
        }
        None => match reporter.render(&result) {
            Ok(text) => println!("{text}"),
            Err(e) => return report_error(&e),
        },
    }
    ExitCode::SUCCESS
}

fn print_summary(result: &BacktestResult) {
    eprintln!("\n=== Results ===");
    eprintln!("Initial Capital:  {:.2}", result.initial_capital);
    eprintln!("Total Return:     {:.2}%", result.total_return);
    eprintln!("Total Profit:     {:.2}", result.total_profit);
    eprintln!("Daily Average:    {:.2}%", result.daily_average_return);
    eprintln!("CAGR:             {:.2}%", result.cagr);
    eprintln!("Sharpe Ratio:     {:.2}", result.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.2}%", result.max_drawdown);
    eprintln!("Total Trades:     {}", result.total_trades);
    eprintln!("Win Rate:         {:.2}%", result.win_rate);
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        return report_error(&e);
    }
    let settings = match build_data_settings(&adapter, None, None) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };
    let params = match build_strategy(&adapter, None) {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };

    eprintln!(
        "\nData: {} {} from {} (limit {})",
        settings.symbol,
        settings.interval,
        settings.dir.display(),
        settings.limit
    );
    println!("strategy = {}", params.kind());
    for (key, value) in params.to_pairs() {
        println!("{key} = {value}");
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_strategies() -> ExitCode {
    for kind in StrategyKind::SUPPORTED {
        let pairs: Vec<String> = StrategyParams::defaults(kind)
            .to_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        println!("{:<20} {}", kind.as_str(), pairs.join(" "));
    }
    ExitCode::SUCCESS
}
