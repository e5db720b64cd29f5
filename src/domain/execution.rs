//! Signal execution: the FLAT/LONG state machine.
//!
//! Each candle applies its signal first, then records equity at that
//! candle's close. A position still open after the last candle is sold at
//! the last close and the final equity point is replaced by the realized cash.

use super::candle::Candle;
use super::portfolio::{EquityPoint, Portfolio, PositionState, Trade, TradeKind, TradeSignal};
use super::signal::{Action, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub trade_signals: Vec<TradeSignal>,
    pub final_equity: f64,
    /// Diagnostic trace: post-transition state for every candle, before
    /// forced liquidation. Not part of the backtest result.
    pub states: Vec<PositionState>,
}

/// Run `signals` against `candles`. A missing signal is treated as `hold`.
/// A buy at a non-positive close, or with no cash left, is ignored.
pub fn simulate(
    candles: &[Candle],
    signals: &[Signal],
    initial_capital: f64,
    commission_rate: f64,
) -> Simulation {
    let mut portfolio = Portfolio::new(initial_capital);
    let mut states = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        let action = signals.get(i).map_or(Action::Hold, |s| s.action);

        match action {
            Action::Buy if portfolio.state.can_buy(candle.close) => {
                let quantity = portfolio.state.buy_all(candle.close, commission_rate);
                portfolio.record_trade(TradeKind::Buy, candle.time, candle.close, quantity);
            }
            Action::Sell if portfolio.state.is_long() => {
                let quantity = portfolio.state.sell_all(candle.close, commission_rate);
                portfolio.record_trade(TradeKind::Sell, candle.time, candle.close, quantity);
            }
            _ => {}
        }

        let value = portfolio.state.value_at(candle.close);
        portfolio.record_equity(candle.time, value);
        states.push(portfolio.state);
    }

    if let Some(last) = candles.last() {
        if portfolio.state.is_long() {
            let quantity = portfolio.state.sell_all(last.close, commission_rate);
            portfolio.record_trade(TradeKind::Sell, last.time, last.close, quantity);
            log::debug!("liquidated {quantity} units at {} (t={})", last.close, last.time);

            let cash = portfolio.state.cash;
            if let Some(point) = portfolio.equity_curve.last_mut() {
                point.value = cash;
            }
        }
    }

    let final_equity = portfolio
        .equity_curve
        .last()
        .map(|p| p.value)
        .unwrap_or(initial_capital);

    Simulation {
        trades: portfolio.trades,
        equity_curve: portfolio.equity_curve,
        trade_signals: portfolio.trade_signals,
        final_equity,
        states,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                time: 1_000 + i as i64 * 60,
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect()
    }

    fn signals(actions: &[Action]) -> Vec<Signal> {
        actions.iter().map(|&a| a.into()).collect()
    }

    use Action::{Buy, Hold, Sell};

    #[test]
    fn all_hold_keeps_cash() {
        let sim = simulate(&candles(&[10.0, 20.0, 5.0]), &signals(&[Hold; 3]), 1_000.0, 0.001);
        assert!(sim.trades.is_empty());
        assert_eq!(sim.equity_curve.len(), 3);
        assert!(sim.equity_curve.iter().all(|p| p.value == 1_000.0));
        assert_eq!(sim.final_equity, 1_000.0);
    }

    #[test]
    fn round_trip_with_commission() {
        let sim = simulate(
            &candles(&[10.0, 20.0, 40.0]),
            &signals(&[Buy, Hold, Sell]),
            1_000.0,
            0.01,
        );

        assert_eq!(sim.trades.len(), 2);
        assert_eq!(sim.trades[0].kind, TradeKind::Buy);
        assert!((sim.trades[0].quantity - 99.0).abs() < 1e-9);
        assert_eq!(sim.trades[1].kind, TradeKind::Sell);
        assert!((sim.trades[1].quantity - 99.0).abs() < 1e-9);

        // equity after each candle's action
        assert!((sim.equity_curve[0].value - 990.0).abs() < 1e-9);
        assert!((sim.equity_curve[1].value - 1_980.0).abs() < 1e-9);
        assert!((sim.equity_curve[2].value - 99.0 * 40.0 * 0.99).abs() < 1e-9);
        assert!((sim.final_equity - 3_920.4).abs() < 1e-9);
    }

    #[test]
    fn redundant_signals_are_ignored() {
        let sim = simulate(
            &candles(&[10.0, 11.0, 12.0, 13.0, 14.0]),
            &signals(&[Sell, Buy, Buy, Sell, Sell]),
            100.0,
            0.0,
        );
        let kinds: Vec<TradeKind> = sim.trades.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TradeKind::Buy, TradeKind::Sell]);
        assert_eq!(sim.trades[0].time, 1_060);
        assert_eq!(sim.trades[1].time, 1_180);
    }

    #[test]
    fn open_position_is_liquidated_at_last_close() {
        let sim = simulate(
            &candles(&[10.0, 20.0]),
            &signals(&[Buy, Hold]),
            100.0,
            0.1,
        );

        assert_eq!(sim.trades.len(), 2);
        let last = &sim.trades[1];
        assert_eq!(last.kind, TradeKind::Sell);
        assert_eq!(last.time, 1_060);
        assert_eq!(last.price, 20.0);
        assert!((last.quantity - 9.0).abs() < 1e-12);

        // mark-to-market would be 180; realized value pays the exit commission
        assert!((sim.equity_curve[1].value - 162.0).abs() < 1e-9);
        assert!((sim.final_equity - 162.0).abs() < 1e-9);
        assert_eq!(sim.trade_signals.len(), 2);
        assert_eq!(sim.trade_signals[1].kind, TradeKind::Sell);
        assert_eq!(sim.trade_signals[1].time, 1_060);
    }

    #[test]
    fn buy_on_last_candle_is_closed_immediately() {
        let sim = simulate(&candles(&[10.0]), &signals(&[Buy]), 100.0, 0.5);
        assert_eq!(sim.trades.len(), 2);
        assert!((sim.final_equity - 25.0).abs() < 1e-12);
        assert_eq!(sim.equity_curve.len(), 1);
    }

    #[test]
    fn never_holds_cash_and_units_together() {
        let sim = simulate(
            &candles(&[10.0, 12.0, 9.0, 15.0, 15.0, 8.0]),
            &signals(&[Buy, Sell, Buy, Hold, Sell, Buy]),
            500.0,
            0.002,
        );
        for state in &sim.states {
            assert!(!(state.cash > 0.0 && state.units_held > 0.0));
        }
    }

    #[test]
    fn equity_matches_state_at_close() {
        let closes = [10.0, 12.0, 9.0, 15.0, 11.0];
        let cs = candles(&closes);
        let sim = simulate(&cs, &signals(&[Buy, Hold, Sell, Buy, Hold]), 500.0, 0.0);
        // last point is overwritten by liquidation, check the rest
        for i in 0..closes.len() - 1 {
            let expected = sim.states[i].value_at(closes[i]);
            assert!((sim.equity_curve[i].value - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn short_signal_slice_holds_the_rest() {
        let sim = simulate(&candles(&[10.0, 20.0, 30.0]), &signals(&[Buy]), 100.0, 0.0);
        assert_eq!(sim.equity_curve.len(), 3);
        assert_eq!(sim.trades.len(), 2);
        assert!((sim.final_equity - 300.0).abs() < 1e-9);
    }

    #[test]
    fn buy_at_zero_close_is_skipped() {
        let sim = simulate(
            &candles(&[10.0, 0.0, 10.0]),
            &signals(&[Hold, Buy, Hold]),
            100.0,
            0.0,
        );
        assert!(sim.trades.is_empty());
        assert!(sim.equity_curve.iter().all(|p| p.value == 100.0));
    }

    #[test]
    fn wiped_out_portfolio_stops_buying() {
        let sim = simulate(
            &candles(&[10.0, 0.0, 10.0, 12.0]),
            &signals(&[Buy, Sell, Buy, Hold]),
            100.0,
            0.0,
        );
        let kinds: Vec<TradeKind> = sim.trades.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TradeKind::Buy, TradeKind::Sell]);
        assert!(sim.equity_curve.iter().all(|p| p.value.is_finite()));
        assert_eq!(sim.final_equity, 0.0);
    }

    #[test]
    fn empty_candles_yield_initial_capital() {
        let sim = simulate(&[], &[], 100.0, 0.0);
        assert!(sim.equity_curve.is_empty());
        assert_eq!(sim.final_equity, 100.0);
    }
}
