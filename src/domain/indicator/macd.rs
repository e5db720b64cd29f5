//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow), both seeded by an SMA at the seed index.
//! Signal Line = running mean of MACD values until `signal` values exist,
//! EMA(signal) of MACD afterwards. The first signal value is the MACD itself.

use super::ema::EmaState;
use super::sma_at;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdState {
    fast: EmaState,
    slow: EmaState,
    signal_period: usize,
    signal_alpha: f64,
    count: usize,
    macd_sum: f64,
    macd: f64,
    signal: f64,
}

impl MacdState {
    /// Seed both EMAs from SMAs of the windows ending at `index` and record the
    /// first MACD value. `None` if either window is unavailable or
    /// `signal_period` is 0.
    pub fn seeded(
        closes: &[f64],
        index: usize,
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Option<Self> {
        if signal_period == 0 {
            return None;
        }
        let fast_seed = sma_at(closes, index, fast_period)?;
        let slow_seed = sma_at(closes, index, slow_period)?;

        let mut state = MacdState {
            fast: EmaState::seeded(fast_period, fast_seed),
            slow: EmaState::seeded(slow_period, slow_seed),
            signal_period,
            signal_alpha: EmaState::smoothing(signal_period),
            count: 0,
            macd_sum: 0.0,
            macd: 0.0,
            signal: 0.0,
        };
        state.push_macd(fast_seed - slow_seed);
        Some(state)
    }

    /// Advance both EMAs by one close and return (macd, signal).
    pub fn update(&mut self, close: f64) -> (f64, f64) {
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);
        self.push_macd(fast - slow);
        (self.macd, self.signal)
    }

    fn push_macd(&mut self, macd: f64) {
        self.count += 1;
        self.macd_sum += macd;
        self.signal = if self.count == 1 {
            macd
        } else if self.count >= self.signal_period {
            self.signal_alpha * macd + (1.0 - self.signal_alpha) * self.signal
        } else {
            self.macd_sum / self.count as f64
        };
        self.macd = macd;
    }

    pub fn macd(&self) -> f64 {
        self.macd
    }

    pub fn signal(&self) -> f64 {
        self.signal
    }
}
