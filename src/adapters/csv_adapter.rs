//! CSV file data adapter.
//!
//! One file per symbol and interval: `<dir>/<SYMBOL>_<interval>.csv` with a
//! `time,open,high,low,close,volume` header.

use crate::domain::candle::Candle;
use crate::domain::error::BacktestError;
use crate::ports::data_port::{DataPort, Interval, MAX_LIMIT};
use std::path::PathBuf;

/// Timestamps above this are taken to be milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol.to_uppercase(), interval))
    }
}

fn to_seconds(time: i64) -> i64 {
    if time > MILLIS_THRESHOLD {
        time / 1000
    } else {
        time
    }
}

impl DataPort for CsvAdapter {
    fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>, BacktestError> {
        let path = self.csv_path(symbol, interval);
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| BacktestError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let mut candles = Vec::new();
        for (line, row) in rdr.deserialize::<Candle>().enumerate() {
            let mut candle = row.map_err(|e| BacktestError::Data {
                reason: format!("{} row {}: {}", path.display(), line + 1, e),
            })?;
            candle.time = to_seconds(candle.time);

            if start_time.is_some_and(|start| candle.time < start) {
                continue;
            }
            candles.push(candle);
        }

        candles.sort_by_key(|c| c.time);
        candles.truncate(limit.min(MAX_LIMIT));

        log::debug!(
            "loaded {} {} candles for {} from {}",
            candles.len(),
            interval,
            symbol,
            path.display()
        );
        Ok(candles)
    }
}
