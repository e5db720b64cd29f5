//! Per-candle trading decisions.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// One decision per candle, positionally aligned with the candle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub action: Action,
}

impl Signal {
    pub const BUY: Signal = Signal {
        action: Action::Buy,
    };
    pub const SELL: Signal = Signal {
        action: Action::Sell,
    };
    pub const HOLD: Signal = Signal {
        action: Action::Hold,
    };
}

impl From<Action> for Signal {
    fn from(action: Action) -> Self {
        Signal { action }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "buy"),
            Action::Sell => write!(f, "sell"),
            Action::Hold => write!(f, "hold"),
        }
    }
}

/// An all-`hold` sequence of length `n`.
pub fn hold_all(n: usize) -> Vec<Signal> {
    vec![Signal::HOLD; n]
}
