//! MACD / signal-line crossover.

use super::MacdParams;
use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::{Crossover, MacdState};
use crate::domain::signal::Signal;

pub fn generate(candles: &[Candle], params: &MacdParams) -> Vec<Signal> {
    let closes = closes(candles);
    let mut signals = Vec::with_capacity(candles.len());
    let mut cross = Crossover::default();
    let mut state: Option<MacdState> = None;

    for (i, &close) in closes.iter().enumerate() {
        if i < params.slow_period {
            signals.push(Signal::HOLD);
            continue;
        }

        if i == params.slow_period {
            state = MacdState::seeded(
                &closes,
                i,
                params.fast_period,
                params.slow_period,
                params.signal_period,
            );
        } else if let Some(macd) = state.as_mut() {
            macd.update(close);
        }

        match &state {
            Some(macd) => signals.push(cross.update(macd.macd(), macd.signal()).into()),
            None => signals.push(Signal::HOLD),
        }
    }

    signals
}
