//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. Missing optional
//! fields fall back to defaults; present but malformed fields are errors.

use std::collections::HashMap;

use crate::domain::error::BacktestError;
use crate::domain::strategy::{StrategyKind, StrategyParams};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const PARAMS_SECTION: &str = "strategy.params";

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_initial_capital(config)?;
    validate_commission(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    require(config, "data", "dir")?;
    if let Some(limit) = optional_number(config, "data", "limit")? {
        if limit < 1.0 || limit.fract() != 0.0 {
            return Err(invalid("data", "limit", "limit must be a positive integer"));
        }
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let tag = require(config, "strategy", "type")?;
    let params = strategy_params(config)?;
    validate_strategy_params(StrategyKind::from_tag(&tag), &params)
}

/// Range checks for a parameter map, shared by config files and CLI overrides.
pub fn validate_strategy_params(
    kind: StrategyKind,
    params: &HashMap<String, f64>,
) -> Result<(), BacktestError> {
    for &key in StrategyParams::period_keys(kind) {
        if let Some(&value) = params.get(key) {
            if value < 1.0 || value.fract() != 0.0 {
                return Err(invalid(
                    PARAMS_SECTION,
                    key,
                    &format!("{key} must be a positive integer"),
                ));
            }
        }
    }

    match StrategyParams::from_map(kind, params) {
        StrategyParams::Rsi(p) => {
            if !(0.0..=100.0).contains(&p.oversold) || !(0.0..=100.0).contains(&p.overbought) {
                return Err(invalid(
                    PARAMS_SECTION,
                    "rsiOversold",
                    "RSI thresholds must be between 0 and 100",
                ));
            }
            if p.oversold >= p.overbought {
                return Err(invalid(
                    PARAMS_SECTION,
                    "rsiOversold",
                    "rsiOversold must be below rsiOverbought",
                ));
            }
        }
        StrategyParams::VolatilityBreakout(p) if p.k < 0.0 => {
            return Err(invalid(PARAMS_SECTION, "k", "k must be non-negative"));
        }
        _ => {}
    }
    Ok(())
}

/// Every `[strategy.params]` entry parsed as a number.
pub fn strategy_params(config: &dyn ConfigPort) -> Result<HashMap<String, f64>, BacktestError> {
    config
        .get_section(PARAMS_SECTION)
        .into_iter()
        .map(|(key, raw)| match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok((key, value)),
            _ => Err(invalid(
                PARAMS_SECTION,
                &key,
                &format!("expected a number, got {raw:?}"),
            )),
        })
        .collect()
}

/// Optional `YYYY-MM-DD` date from `[backtest]`.
pub fn optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, BacktestError> {
    match config.get_string("backtest", key) {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "backtest",
                    key,
                    &format!("invalid {key} format, expected YYYY-MM-DD"),
                )
            }),
        _ => Ok(None),
    }
}

/// Optional number; a present value that does not parse is an error.
pub fn optional_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, BacktestError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(section, key, &format!("expected a number, got {s:?}"))),
        _ => Ok(None),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    if let Some(value) = optional_number(config, "backtest", "initial_capital")? {
        if !(value.is_finite() && value > 0.0) {
            return Err(invalid(
                "backtest",
                "initial_capital",
                "initial_capital must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    if let Some(value) = optional_number(config, "backtest", "commission_rate")? {
        if !(0.0..1.0).contains(&value) {
            return Err(invalid(
                "backtest",
                "commission_rate",
                "commission_rate must be in [0, 1)",
            ));
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let start = optional_date(config, "start_date")?;
    let end = optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, BacktestError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(BacktestError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> BacktestError {
    BacktestError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
