//! Single-position portfolio state and the logs it produces.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(rename = "type")]
    pub kind: TradeKind,
    pub time: i64,
    pub price: f64,
    pub quantity: f64,
}

/// Marker for a chart: where and at what price a trade happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub time: i64,
    #[serde(rename = "type")]
    pub kind: TradeKind,
    pub price: f64,
}

/// A timestamped value. Used for equity, cumulative return and monthly return curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub time: i64,
    pub value: f64,
}

/// Either all cash or all units, never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionState {
    pub cash: f64,
    pub units_held: f64,
}

impl PositionState {
    pub fn flat(cash: f64) -> Self {
        PositionState {
            cash,
            units_held: 0.0,
        }
    }

    pub fn is_long(&self) -> bool {
        self.units_held > 0.0
    }

    /// Flat with cash to spend and a positive price to spend it at.
    pub fn can_buy(&self, price: f64) -> bool {
        !self.is_long() && self.cash > 0.0 && price > 0.0
    }

    /// cash + units_held * price
    pub fn value_at(&self, price: f64) -> f64 {
        self.cash + self.units_held * price
    }

    /// Convert all cash into units at `price` after the commission haircut.
    /// Returns the quantity bought.
    pub fn buy_all(&mut self, price: f64, commission_rate: f64) -> f64 {
        self.units_held = (self.cash * (1.0 - commission_rate)) / price;
        self.cash = 0.0;
        self.units_held
    }

    /// Convert all units into cash at `price` after the commission haircut.
    /// Returns the quantity sold.
    pub fn sell_all(&mut self, price: f64, commission_rate: f64) -> f64 {
        let quantity = self.units_held;
        self.cash = quantity * price * (1.0 - commission_rate);
        self.units_held = 0.0;
        quantity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub state: PositionState,
    pub trades: Vec<Trade>,
    pub trade_signals: Vec<TradeSignal>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            state: PositionState::flat(initial_capital),
            trades: Vec::new(),
            trade_signals: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn record_trade(&mut self, kind: TradeKind, time: i64, price: f64, quantity: f64) {
        self.trades.push(Trade {
            kind,
            time,
            price,
            quantity,
        });
        self.trade_signals.push(TradeSignal { time, kind, price });
    }

    pub fn record_equity(&mut self, time: i64, value: f64) {
        self.equity_curve.push(EquityPoint { time, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_portfolio_is_flat() {
        let portfolio = Portfolio::new(10_000.0);
        assert!((portfolio.state.cash - 10_000.0).abs() < f64::EPSILON);
        assert!(!portfolio.state.is_long());
        assert!(portfolio.trades.is_empty());
        assert!(portfolio.trade_signals.is_empty());
        assert!(portfolio.equity_curve.is_empty());
    }

    #[test]
    fn buy_all_applies_commission_once() {
        let mut state = PositionState::flat(1_000.0);
        let qty = state.buy_all(50.0, 0.01);
        assert!((qty - 19.8).abs() < 1e-12);
        assert_eq!(state.cash, 0.0);
        assert!(state.is_long());
    }

    #[test]
    fn sell_all_applies_commission_once() {
        let mut state = PositionState {
            cash: 0.0,
            units_held: 10.0,
        };
        let qty = state.sell_all(100.0, 0.01);
        assert!((qty - 10.0).abs() < f64::EPSILON);
        assert!((state.cash - 990.0).abs() < 1e-9);
        assert_eq!(state.units_held, 0.0);
    }

    #[test]
    fn cannot_buy_at_zero_price_or_with_no_cash() {
        assert!(PositionState::flat(100.0).can_buy(1.0));
        assert!(!PositionState::flat(100.0).can_buy(0.0));
        assert!(!PositionState::flat(0.0).can_buy(1.0));
        let long = PositionState {
            cash: 0.0,
            units_held: 1.0,
        };
        assert!(!long.can_buy(1.0));
    }

    #[test]
    fn value_marks_units_to_market() {
        let state = PositionState {
            cash: 0.0,
            units_held: 4.0,
        };
        assert!((state.value_at(25.0) - 100.0).abs() < f64::EPSILON);
        assert!((PositionState::flat(7.0).value_at(1e6) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_trade_also_logs_signal() {
        let mut portfolio = Portfolio::new(100.0);
        portfolio.record_trade(TradeKind::Buy, 60, 10.0, 9.9);
        assert_eq!(portfolio.trades.len(), 1);
        assert_eq!(
            portfolio.trade_signals,
            vec![TradeSignal {
                time: 60,
                kind: TradeKind::Buy,
                price: 10.0
            }]
        );
    }

    #[test]
    fn trade_serializes_with_type_field() {
        let trade = Trade {
            kind: TradeKind::Sell,
            time: 1,
            price: 2.0,
            quantity: 3.0,
        };
        let json = serde_json::to_string(&trade).unwrap();
        assert_eq!(json, r#"{"type":"sell","time":1,"price":2.0,"quantity":3.0}"#);
    }
}
