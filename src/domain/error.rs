//! Domain error types.

/// Top-level error type for candlebt.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("no candles to backtest")]
    EmptyInput,

    #[error("candle {index} has time {time}, not after previous time {previous}")]
    NonMonotonicTime { index: usize, previous: i64, time: i64 },

    #[error("candle {index} has invalid {field} price {value}")]
    InvalidPrice {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("initial capital must be positive, got {0}")]
    InvalidCapital(f64),

    #[error("commission rate must be in [0, 1), got {0}")]
    InvalidCommission(f64),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("market data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) | BacktestError::Report { .. } => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. } => 2,
            BacktestError::Data { .. } | BacktestError::EmptyInput => 5,
            BacktestError::NonMonotonicTime { .. }
            | BacktestError::InvalidPrice { .. }
            | BacktestError::InvalidCapital(_)
            | BacktestError::InvalidCommission(_) => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_candle() {
        let err = BacktestError::NonMonotonicTime {
            index: 3,
            previous: 200,
            time: 100,
        };
        assert_eq!(
            err.to_string(),
            "candle 3 has time 100, not after previous time 200"
        );

        let err = BacktestError::InvalidPrice {
            index: 0,
            field: "close",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "candle 0 has invalid close price -1");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: BacktestError = io.into();
        assert!(matches!(err, BacktestError::Io(_)));
    }
}
