//! RSI threshold crossings.
//!
//! Buy when RSI rises through `oversold`, sell when it falls through
//! `overbought`. Candles before index `period` hold.

use super::RsiParams;
use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::{crossed_above, crossed_below, rsi_at};
use crate::domain::signal::Signal;

pub fn generate(candles: &[Candle], params: &RsiParams) -> Vec<Signal> {
    let closes = closes(candles);
    let mut signals = Vec::with_capacity(candles.len());
    let mut prev_rsi: Option<f64> = None;

    for i in 0..closes.len() {
        if i < params.period {
            signals.push(Signal::HOLD);
            continue;
        }

        let Some(rsi) = rsi_at(&closes, i, params.period) else {
            signals.push(Signal::HOLD);
            continue;
        };

        let signal = match prev_rsi {
            Some(prev) if crossed_above(prev, params.oversold, rsi, params.oversold) => Signal::BUY,
            Some(prev) if crossed_below(prev, params.overbought, rsi, params.overbought) => {
                Signal::SELL
            }
            _ => Signal::HOLD,
        };
        signals.push(signal);
        prev_rsi = Some(rsi);
    }

    signals
}
