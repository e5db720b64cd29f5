//! Strategy selection and parameters.
//!
//! A strategy is picked by its tag (`moving_average`, `rsi`, `macd`, `ema`,
//! `volatility_breakout`). Unknown tags resolve to [`StrategyKind::Hold`],
//! which never trades.

pub mod ema;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod volatility_breakout;

use std::collections::HashMap;
use std::fmt;

use crate::domain::candle::Candle;
use crate::domain::signal::{hold_all, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    MovingAverage,
    Rsi,
    Macd,
    Ema,
    VolatilityBreakout,
    /// Fallback for unrecognised tags: an all-`hold` signal sequence.
    Hold,
}

impl StrategyKind {
    pub const SUPPORTED: [StrategyKind; 5] = [
        StrategyKind::MovingAverage,
        StrategyKind::Rsi,
        StrategyKind::Macd,
        StrategyKind::Ema,
        StrategyKind::VolatilityBreakout,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "moving_average" => StrategyKind::MovingAverage,
            "rsi" => StrategyKind::Rsi,
            "macd" => StrategyKind::Macd,
            "ema" => StrategyKind::Ema,
            "volatility_breakout" => StrategyKind::VolatilityBreakout,
            other => {
                log::warn!("unknown strategy type {other:?}, every candle will hold");
                StrategyKind::Hold
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::MovingAverage => "moving_average",
            StrategyKind::Rsi => "rsi",
            StrategyKind::Macd => "macd",
            StrategyKind::Ema => "ema",
            StrategyKind::VolatilityBreakout => "volatility_breakout",
            StrategyKind::Hold => "hold",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverageParams {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        MovingAverageParams {
            short_period: 5,
            long_period: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiParams {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        MacdParams {
            fast_period: crate::domain::indicator::macd::DEFAULT_FAST,
            slow_period: crate::domain::indicator::macd::DEFAULT_SLOW,
            signal_period: crate::domain::indicator::macd::DEFAULT_SIGNAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaParams {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        EmaParams {
            short_period: 12,
            long_period: 26,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityBreakoutParams {
    pub k: f64,
}

impl Default for VolatilityBreakoutParams {
    fn default() -> Self {
        VolatilityBreakoutParams { k: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyParams {
    MovingAverage(MovingAverageParams),
    Rsi(RsiParams),
    Macd(MacdParams),
    Ema(EmaParams),
    VolatilityBreakout(VolatilityBreakoutParams),
    Hold,
}

impl StrategyParams {
    pub fn defaults(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::MovingAverage => StrategyParams::MovingAverage(Default::default()),
            StrategyKind::Rsi => StrategyParams::Rsi(Default::default()),
            StrategyKind::Macd => StrategyParams::Macd(Default::default()),
            StrategyKind::Ema => StrategyParams::Ema(Default::default()),
            StrategyKind::VolatilityBreakout => {
                StrategyParams::VolatilityBreakout(Default::default())
            }
            StrategyKind::Hold => StrategyParams::Hold,
        }
    }

    /// Build parameters from camelCase keys, falling back to the default for
    /// any missing or unusable value. Keys that do not belong to `kind` are ignored.
    pub fn from_map(kind: StrategyKind, map: &HashMap<String, f64>) -> Self {
        match kind {
            StrategyKind::MovingAverage => {
                let d = MovingAverageParams::default();
                StrategyParams::MovingAverage(MovingAverageParams {
                    short_period: period(map, "shortPeriod", d.short_period),
                    long_period: period(map, "longPeriod", d.long_period),
                })
            }
            StrategyKind::Rsi => {
                let d = RsiParams::default();
                StrategyParams::Rsi(RsiParams {
                    period: period(map, "rsiPeriod", d.period),
                    overbought: number(map, "rsiOverbought", d.overbought),
                    oversold: number(map, "rsiOversold", d.oversold),
                })
            }
            StrategyKind::Macd => {
                let d = MacdParams::default();
                StrategyParams::Macd(MacdParams {
                    fast_period: period(map, "fastPeriod", d.fast_period),
                    slow_period: period(map, "slowPeriod", d.slow_period),
                    signal_period: period(map, "signalPeriod", d.signal_period),
                })
            }
            StrategyKind::Ema => {
                let d = EmaParams::default();
                StrategyParams::Ema(EmaParams {
                    short_period: period(map, "shortPeriod", d.short_period),
                    long_period: period(map, "longPeriod", d.long_period),
                })
            }
            StrategyKind::VolatilityBreakout => {
                let d = VolatilityBreakoutParams::default();
                StrategyParams::VolatilityBreakout(VolatilityBreakoutParams {
                    k: number(map, "k", d.k),
                })
            }
            StrategyKind::Hold => StrategyParams::Hold,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyParams::MovingAverage(_) => StrategyKind::MovingAverage,
            StrategyParams::Rsi(_) => StrategyKind::Rsi,
            StrategyParams::Macd(_) => StrategyKind::Macd,
            StrategyParams::Ema(_) => StrategyKind::Ema,
            StrategyParams::VolatilityBreakout(_) => StrategyKind::VolatilityBreakout,
            StrategyParams::Hold => StrategyKind::Hold,
        }
    }

    /// Parameter names and values as they appear in configuration.
    pub fn to_pairs(&self) -> Vec<(&'static str, f64)> {
        match self {
            StrategyParams::MovingAverage(p) => vec![
                ("shortPeriod", p.short_period as f64),
                ("longPeriod", p.long_period as f64),
            ],
            StrategyParams::Rsi(p) => vec![
                ("rsiPeriod", p.period as f64),
                ("rsiOverbought", p.overbought),
                ("rsiOversold", p.oversold),
            ],
            StrategyParams::Macd(p) => vec![
                ("fastPeriod", p.fast_period as f64),
                ("slowPeriod", p.slow_period as f64),
                ("signalPeriod", p.signal_period as f64),
            ],
            StrategyParams::Ema(p) => vec![
                ("shortPeriod", p.short_period as f64),
                ("longPeriod", p.long_period as f64),
            ],
            StrategyParams::VolatilityBreakout(p) => vec![("k", p.k)],
            StrategyParams::Hold => vec![],
        }
    }

    /// Names of the parameters that must be whole, positive candle counts.
    pub fn period_keys(kind: StrategyKind) -> &'static [&'static str] {
        match kind {
            StrategyKind::MovingAverage | StrategyKind::Ema => &["shortPeriod", "longPeriod"],
            StrategyKind::Rsi => &["rsiPeriod"],
            StrategyKind::Macd => &["fastPeriod", "slowPeriod", "signalPeriod"],
            StrategyKind::VolatilityBreakout | StrategyKind::Hold => &[],
        }
    }
}

fn period(map: &HashMap<String, f64>, key: &str, default: usize) -> usize {
    match map.get(key) {
        Some(&v) if v.is_finite() && v >= 0.0 => v.trunc() as usize,
        _ => default,
    }
}

fn number(map: &HashMap<String, f64>, key: &str, default: f64) -> f64 {
    match map.get(key) {
        Some(&v) if v.is_finite() => v,
        _ => default,
    }
}

/// One signal per candle for the chosen strategy.
pub fn generate_signals(candles: &[Candle], params: &StrategyParams) -> Vec<Signal> {
    match params {
        StrategyParams::MovingAverage(p) => moving_average::generate(candles, p),
        StrategyParams::Rsi(p) => rsi::generate(candles, p),
        StrategyParams::Macd(p) => macd::generate(candles, p),
        StrategyParams::Ema(p) => ema::generate(candles, p),
        StrategyParams::VolatilityBreakout(p) => volatility_breakout::generate(candles, p),
        StrategyParams::Hold => hold_all(candles.len()),
    }
}
