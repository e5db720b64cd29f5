//! Backtest engine facade.
//!
//! candles -> signals -> simulation -> metrics, assembled into one
//! [`BacktestResult`]. Each run is independent and deterministic.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::candle::{validate_candles, Candle};
use super::error::BacktestError;
use super::execution::simulate;
use super::metrics::{cumulative_return_curve, monthly_returns, Metrics};
use super::portfolio::{EquityPoint, Trade, TradeSignal};
use super::strategy::{generate_signals, StrategyKind, StrategyParams};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_COMMISSION_RATE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub commission_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            commission_rate: DEFAULT_COMMISSION_RATE,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), BacktestError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(BacktestError::InvalidCapital(self.initial_capital));
        }
        if !(0.0..1.0).contains(&self.commission_rate) {
            return Err(BacktestError::InvalidCommission(self.commission_rate));
        }
        Ok(())
    }
}

/// Inclusive UTC calendar-day window applied to candles before a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// First and last unix second covered by the window.
    pub fn bounds(&self) -> (Option<i64>, Option<i64>) {
        let start = self
            .start
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp());
        let end = self
            .end
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc().timestamp());
        (start, end)
    }

    pub fn filter(&self, candles: Vec<Candle>) -> Vec<Candle> {
        let (start, end) = self.bounds();
        candles
            .into_iter()
            .filter(|c| start.is_none_or(|s| c.time >= s) && end.is_none_or(|e| c.time <= e))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub total_return: f64,
    pub total_profit: f64,
    pub daily_average_return: f64,
    pub cumulative_return: f64,
    pub cagr: f64,
    pub total_trades: usize,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub chart_data: Vec<Candle>,
    pub equity_curve: Vec<EquityPoint>,
    pub cumulative_return_curve: Vec<EquityPoint>,
    pub monthly_returns: Vec<EquityPoint>,
    pub trade_signals: Vec<TradeSignal>,
    #[serde(skip)]
    pub trades: Vec<Trade>,
    #[serde(skip)]
    pub trade_log_alternates: bool,
}

/// Run a backtest selected by strategy tag with loosely-typed parameters.
/// Unknown tags run the all-`hold` strategy.
pub fn run_backtest(
    candles: &[Candle],
    strategy_type: &str,
    parameters: &HashMap<String, f64>,
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    let params = StrategyParams::from_map(StrategyKind::from_tag(strategy_type), parameters);
    run_with_params(candles, &params, config)
}

pub fn run_with_params(
    candles: &[Candle],
    params: &StrategyParams,
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    config.validate()?;
    validate_candles(candles)?;

    let signals = generate_signals(candles, params);
    let sim = simulate(
        candles,
        &signals,
        config.initial_capital,
        config.commission_rate,
    );

    // validate_candles guarantees at least one candle
    let first_time = candles.first().map_or(0, |c| c.time);
    let last_time = candles.last().map_or(0, |c| c.time);
    let metrics = Metrics::compute(
        config.initial_capital,
        &sim.equity_curve,
        &sim.trades,
        first_time,
        last_time,
    );

    log::debug!(
        "{} over {} candles: {} trades, return {}%, final equity {}",
        params.kind(),
        candles.len(),
        metrics.total_trades,
        metrics.total_return,
        sim.final_equity
    );

    Ok(BacktestResult {
        initial_capital: config.initial_capital,
        total_return: metrics.total_return,
        total_profit: metrics.total_profit,
        daily_average_return: metrics.daily_average_return,
        cumulative_return: metrics.total_return,
        cagr: metrics.cagr,
        total_trades: metrics.total_trades,
        win_rate: metrics.win_rate,
        max_drawdown: metrics.max_drawdown,
        sharpe_ratio: metrics.sharpe_ratio,
        chart_data: candles.to_vec(),
        cumulative_return_curve: cumulative_return_curve(config.initial_capital, &sim.equity_curve),
        monthly_returns: monthly_returns(&sim.equity_curve),
        equity_curve: sim.equity_curve,
        trade_signals: sim.trade_signals,
        trades: sim.trades,
        trade_log_alternates: metrics.trade_log_alternates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_candles(n: usize, close: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle {
                time: 1_700_000_000 + i as i64 * 3_600,
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            })
            .collect()
    }

    #[test]
    fn default_config() {
        let c = BacktestConfig::default();
        assert_eq!(c.initial_capital, 10_000.0);
        assert_eq!(c.commission_rate, 0.001);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_capital_and_commission() {
        let bad_capital = BacktestConfig {
            initial_capital: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_capital.validate(),
            Err(BacktestError::InvalidCapital(_))
        ));

        let bad_commission = BacktestConfig {
            commission_rate: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_commission.validate(),
            Err(BacktestError::InvalidCommission(_))
        ));

        let negative_commission = BacktestConfig {
            commission_rate: -0.01,
            ..Default::default()
        };
        assert!(negative_commission.validate().is_err());
    }

    #[test]
    fn empty_candles_are_an_error() {
        let err = run_backtest(&[], "rsi", &HashMap::new(), &BacktestConfig::default());
        assert!(matches!(err, Err(BacktestError::EmptyInput)));
    }

    #[test]
    fn unknown_strategy_runs_as_hold() {
        let candles = flat_candles(5, 10.0);
        let result =
            run_backtest(&candles, "martingale", &HashMap::new(), &BacktestConfig::default())
                .unwrap();
        assert_eq!(result.total_trades, 0);
        assert_eq!(result.total_return, 0.0);
        assert_eq!(result.equity_curve.len(), 5);
        assert!(result.trade_signals.is_empty());
    }

    #[test]
    fn cumulative_return_mirrors_total_return() {
        let candles = flat_candles(3, 10.0);
        let result = run_with_params(
            &candles,
            &StrategyParams::Hold,
            &BacktestConfig::default(),
        )
        .unwrap();
        assert_eq!(result.cumulative_return, result.total_return);
        assert_eq!(result.chart_data, candles);
    }

    #[test]
    fn date_range_is_inclusive_of_whole_days() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 2),
            end: NaiveDate::from_ymd_opt(2024, 1, 3),
        };
        let (start, end) = range.bounds();
        assert_eq!(start, Some(1_704_153_600));
        assert_eq!(end, Some(1_704_326_399));

        let candles: Vec<Candle> = [1_704_153_599, 1_704_153_600, 1_704_326_399, 1_704_326_400]
            .iter()
            .map(|&time| Candle {
                time,
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 0.0,
            })
            .collect();
        let kept: Vec<i64> = range.filter(candles).iter().map(|c| c.time).collect();
        assert_eq!(kept, vec![1_704_153_600, 1_704_326_399]);
    }

    #[test]
    fn open_date_range_keeps_everything() {
        let candles = flat_candles(4, 1.0);
        assert_eq!(DateRange::default().filter(candles.clone()), candles);
    }

    #[test]
    fn result_serializes_camel_case() {
        let candles = flat_candles(2, 10.0);
        let result = run_with_params(
            &candles,
            &StrategyParams::Hold,
            &BacktestConfig::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        for key in [
            "initialCapital",
            "totalReturn",
            "totalProfit",
            "dailyAverageReturn",
            "cumulativeReturn",
            "cagr",
            "totalTrades",
            "winRate",
            "maxDrawdown",
            "sharpeRatio",
            "chartData",
            "equityCurve",
            "cumulativeReturnCurve",
            "monthlyReturns",
            "tradeSignals",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("trades").is_none());
    }
}
