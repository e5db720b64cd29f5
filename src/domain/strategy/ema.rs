//! Exponential moving average crossover.
//!
//! Both EMAs are seeded by SMAs at index `long_period` and advanced by the
//! EMA recurrence afterwards.

use super::EmaParams;
use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::{sma_at, Crossover, EmaState};
use crate::domain::signal::Signal;

pub fn generate(candles: &[Candle], params: &EmaParams) -> Vec<Signal> {
    let closes = closes(candles);
    let mut signals = Vec::with_capacity(candles.len());
    let mut cross = Crossover::default();
    let mut lines: Option<(EmaState, EmaState)> = None;

    for (i, &close) in closes.iter().enumerate() {
        if i < params.long_period {
            signals.push(Signal::HOLD);
            continue;
        }

        if i == params.long_period {
            lines = sma_at(&closes, i, params.short_period)
                .zip(sma_at(&closes, i, params.long_period))
                .map(|(short, long)| {
                    (
                        EmaState::seeded(params.short_period, short),
                        EmaState::seeded(params.long_period, long),
                    )
                });
        } else if let Some((short, long)) = lines.as_mut() {
            short.update(close);
            long.update(close);
        }

        match &lines {
            Some((short, long)) => {
                signals.push(cross.update(short.value(), long.value()).into())
            }
            None => signals.push(Signal::HOLD),
        }
    }

    signals
}
