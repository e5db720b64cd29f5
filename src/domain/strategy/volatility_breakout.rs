//! Volatility breakout with a one-candle holding period.
//!
//! Buy when the close breaks `prev_close + k * (prev_high - prev_low)`, then
//! sell unconditionally on the following candle.

use super::VolatilityBreakoutParams;
use crate::domain::candle::Candle;
use crate::domain::signal::Signal;

pub fn generate(candles: &[Candle], params: &VolatilityBreakoutParams) -> Vec<Signal> {
    let mut signals = Vec::with_capacity(candles.len());
    let mut held = false;

    for (i, candle) in candles.iter().enumerate() {
        if i == 0 {
            signals.push(Signal::HOLD);
            continue;
        }

        let prev = &candles[i - 1];
        let buy_threshold = prev.close + prev.range() * params.k;

        if !held && candle.close > buy_threshold {
            signals.push(Signal::BUY);
            held = true;
        } else if held {
            signals.push(Signal::SELL);
            held = false;
        } else {
            signals.push(Signal::HOLD);
        }
    }

    signals
}
