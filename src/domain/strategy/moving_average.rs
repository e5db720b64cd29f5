//! Simple moving average crossover.
//!
//! Buy when SMA(short) crosses above SMA(long), sell on the opposite cross.
//! Candles before index `long_period` hold.

use super::MovingAverageParams;
use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::{sma_at, Crossover};
use crate::domain::signal::Signal;

pub fn generate(candles: &[Candle], params: &MovingAverageParams) -> Vec<Signal> {
    let closes = closes(candles);
    let mut signals = Vec::with_capacity(candles.len());
    let mut cross = Crossover::default();

    for i in 0..closes.len() {
        if i < params.long_period {
            signals.push(Signal::HOLD);
            continue;
        }

        let lines =
            sma_at(&closes, i, params.short_period).zip(sma_at(&closes, i, params.long_period));
        match lines {
            Some((short, long)) => signals.push(cross.update(short, long).into()),
            None => signals.push(Signal::HOLD),
        }
    }

    signals
}
