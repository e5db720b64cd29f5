//! Market data port trait.

use std::fmt;

use crate::domain::candle::Candle;
use crate::domain::error::BacktestError;

/// Upper bound on candles returned by one fetch.
pub const MAX_LIMIT: usize = 1000;

/// Candle interval tags understood by data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    FourHours,
    #[default]
    OneDay,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::OneHour,
        Interval::FourHours,
        Interval::OneDay,
    ];

    /// Unknown tags fall back to `1d`.
    pub fn parse_or_default(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == tag.trim())
            .unwrap_or_else(|| {
                log::warn!("unknown interval {tag:?}, using 1d");
                Interval::OneDay
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait DataPort {
    /// Up to `min(limit, MAX_LIMIT)` candles for `symbol`, ascending by time,
    /// none earlier than `start_time` (unix seconds) when given.
    fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>, BacktestError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_intervals() {
        for interval in Interval::ALL {
            assert_eq!(Interval::parse_or_default(interval.as_str()), interval);
        }
        assert_eq!(Interval::parse_or_default(" 4h "), Interval::FourHours);
    }

    #[test]
    fn unknown_interval_is_daily() {
        assert_eq!(Interval::parse_or_default("3d"), Interval::OneDay);
        assert_eq!(Interval::parse_or_default(""), Interval::OneDay);
    }
}
