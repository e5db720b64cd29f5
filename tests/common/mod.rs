#![allow(dead_code)]

use candlebt::domain::candle::Candle;
use candlebt::domain::error::BacktestError;
use candlebt::ports::data_port::{DataPort, Interval};
use std::cell::RefCell;
use std::collections::HashMap;

pub const START_TIME: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z
pub const DAY: i64 = 86_400;

/// In-memory data port. Records every fetch so tests can inspect arguments.
pub struct MockDataPort {
    pub data: HashMap<String, Vec<Candle>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<(String, Interval, usize, Option<i64>)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(symbol.to_string(), candles);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>, BacktestError> {
        self.calls
            .borrow_mut()
            .push((symbol.to_string(), interval, limit, start_time));
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BacktestError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|candles| {
                candles
                    .iter()
                    .filter(|c| start_time.is_none_or(|s| c.time >= s))
                    .take(limit)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn make_candle(time: i64, close: f64) -> Candle {
    Candle {
        time,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1_000.0,
    }
}

/// Daily candles starting at 2024-01-01 with the given closes.
pub fn daily_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_candle(START_TIME + i as i64 * DAY, close))
        .collect()
}

/// Zig-zag closes that cross moving averages several times.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 20.0 * ((i as f64) / 4.0).sin() + i as f64 * 0.1)
        .collect()
}

pub fn params(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}
