//! OHLCV candle representation and input validation.

use serde::{Deserialize, Serialize};

use super::error::BacktestError;

/// One price bar. `time` is the bucket open in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Check the structural invariants the engine relies on: at least one candle,
/// strictly increasing `time`, finite non-negative prices.
pub fn validate_candles(candles: &[Candle]) -> Result<(), BacktestError> {
    if candles.is_empty() {
        return Err(BacktestError::EmptyInput);
    }

    for (index, candle) in candles.iter().enumerate() {
        for (field, value) in [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BacktestError::InvalidPrice {
                    index,
                    field,
                    value,
                });
            }
        }

        if index > 0 {
            let previous = candles[index - 1].time;
            if candle.time <= previous {
                return Err(BacktestError::NonMonotonicTime {
                    index,
                    previous,
                    time: candle.time,
                });
            }
        }
    }

    Ok(())
}

/// Closing prices, positionally aligned with `candles`.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
