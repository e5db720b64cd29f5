//! Technical indicators as small rolling states.
//!
//! Each generator carries only the values it needs to decide the next
//! candle (previous line pair, previous EMA, previous RSI) rather than
//! full indicator histories.

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::EmaState;
pub use macd::MacdState;
pub use rsi::rsi_at;

use crate::domain::signal::Action;

/// Mean of the `period` values ending at `end` (inclusive).
///
/// `None` when `period` is 0 or the window would start before index 0.
pub fn sma_at(values: &[f64], end: usize, period: usize) -> Option<f64> {
    if period == 0 || end >= values.len() || period > end + 1 {
        return None;
    }
    let window = &values[end + 1 - period..=end];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// `a` moved strictly above `b`, having been at or below it on the previous candle.
pub fn crossed_above(prev_a: f64, prev_b: f64, a: f64, b: f64) -> bool {
    a > b && prev_a <= prev_b
}

/// `a` moved strictly below `b`, having been at or above it on the previous candle.
pub fn crossed_below(prev_a: f64, prev_b: f64, a: f64, b: f64) -> bool {
    a < b && prev_a >= prev_b
}

/// Remembers the last (fast, slow) pair and turns the next pair into an action.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crossover {
    prev: Option<(f64, f64)>,
}

impl Crossover {
    /// Buy on an upward cross of `fast` over `slow`, sell on a downward one.
    /// The first pair only primes the state and yields `Hold`.
    pub fn update(&mut self, fast: f64, slow: f64) -> Action {
        let action = match self.prev {
            Some((prev_fast, prev_slow)) if crossed_above(prev_fast, prev_slow, fast, slow) => {
                Action::Buy
            }
            Some((prev_fast, prev_slow)) if crossed_below(prev_fast, prev_slow, fast, slow) => {
                Action::Sell
            }
            _ => Action::Hold,
        };
        self.prev = Some((fast, slow));
        action
    }
}
