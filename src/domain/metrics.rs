//! Performance metrics over an equity curve and trade log.
//!
//! Percentages are expressed as percent (12.5 means 12.5%). Scalar outputs are
//! rounded to 2 decimals; intermediate values keep full precision.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike};

use super::portfolio::{EquityPoint, Trade, TradeKind};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub total_profit: f64,
    pub daily_average_return: f64,
    pub cagr: f64,
    pub total_trades: usize,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    /// False when the trade log is not strictly buy, sell, buy, sell, ...
    pub trade_log_alternates: bool,
}

impl Metrics {
    /// `first_time`/`last_time` are the first and last candle timestamps.
    pub fn compute(
        initial_capital: f64,
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        first_time: i64,
        last_time: i64,
    ) -> Self {
        let Some(last) = equity_curve.last() else {
            return Metrics {
                total_return: 0.0,
                total_profit: 0.0,
                daily_average_return: 0.0,
                cagr: 0.0,
                total_trades: 0,
                win_rate: 0.0,
                max_drawdown: 0.0,
                sharpe_ratio: 0.0,
                trade_log_alternates: true,
            };
        };
        let final_value = last.value;

        let total_return = (final_value - initial_capital) / initial_capital * 100.0;
        let total_profit = final_value - initial_capital;

        let elapsed = (last_time - first_time) as f64;
        let days = elapsed / SECONDS_PER_DAY;
        let daily_average_return = if days > 0.0 {
            total_return / days
        } else {
            0.0
        };

        let years = elapsed / SECONDS_PER_YEAR;
        let cagr = compute_cagr(initial_capital, final_value, years);

        let total_trades = trades.iter().filter(|t| t.kind == TradeKind::Sell).count();
        let (win_rate, trade_log_alternates) = compute_win_rate(trades, total_trades);

        Metrics {
            total_return: round2(total_return),
            total_profit: round2(total_profit),
            daily_average_return: round2(daily_average_return),
            cagr: round2(cagr),
            total_trades,
            win_rate: round2(win_rate),
            max_drawdown: round2(compute_max_drawdown(initial_capital, equity_curve)),
            sharpe_ratio: round2(compute_sharpe(equity_curve)),
            trade_log_alternates,
        }
    }
}

/// Round half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

fn compute_cagr(initial_capital: f64, final_value: f64, years: f64) -> f64 {
    if years <= 0.0 || final_value <= 0.0 {
        return 0.0;
    }
    let cagr = ((final_value / initial_capital).powf(1.0 / years) - 1.0) * 100.0;
    if cagr.is_finite() {
        cagr
    } else {
        // very short spans can overflow the exponent
        log::debug!("CAGR overflowed over {years} years, reporting 0");
        0.0
    }
}

/// Pairs each sell with the trade before it. Returns (win rate %, alternates).
fn compute_win_rate(trades: &[Trade], total_trades: usize) -> (f64, bool) {
    let alternates = trades.iter().enumerate().all(|(i, t)| {
        let expected = if i % 2 == 0 {
            TradeKind::Buy
        } else {
            TradeKind::Sell
        };
        t.kind == expected
    });
    if !alternates {
        log::warn!("trade log does not alternate buy/sell; only well-formed pairs count as wins");
    }

    if trades.len() < 2 || total_trades == 0 {
        return (0.0, alternates);
    }

    let wins = trades
        .chunks_exact(2)
        .filter(|pair| {
            let (buy, sell) = (&pair[0], &pair[1]);
            buy.kind == TradeKind::Buy && sell.kind == TradeKind::Sell && sell.price > buy.price
        })
        .count();

    (wins as f64 / total_trades as f64 * 100.0, alternates)
}

/// Largest percentage decline from the running peak, as a positive number.
/// The peak starts at the initial capital.
fn compute_max_drawdown(initial_capital: f64, equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = initial_capital;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.value > peak {
            peak = point.value;
        }
        if peak > 0.0 {
            let dd = (point.value - peak) / peak * 100.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd.abs()
}

/// Annualized mean/stddev of step returns (population stddev, 252 periods).
fn compute_sharpe(equity_curve: &[EquityPoint]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0].value;
            if prev > 0.0 {
                (w[1].value - prev) / prev
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}

/// Percent return versus initial capital at each equity point.
pub fn cumulative_return_curve(
    initial_capital: f64,
    equity_curve: &[EquityPoint],
) -> Vec<EquityPoint> {
    equity_curve
        .iter()
        .map(|p| EquityPoint {
            time: p.time,
            value: round2((p.value - initial_capital) / initial_capital * 100.0),
        })
        .collect()
}

struct MonthSpan {
    start_time: i64,
    start_value: f64,
    end_value: f64,
}

/// Return within each UTC calendar month, from its first to its last equity
/// point, stamped at the month's first point. Empty for fewer than 2 points.
pub fn monthly_returns(equity_curve: &[EquityPoint]) -> Vec<EquityPoint> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }

    let mut months: BTreeMap<(i32, u32), MonthSpan> = BTreeMap::new();
    for point in equity_curve {
        let Some(dt) = DateTime::from_timestamp(point.time, 0) else {
            log::warn!("timestamp {} out of range, skipped in monthly returns", point.time);
            continue;
        };
        months
            .entry((dt.year(), dt.month()))
            .and_modify(|span| span.end_value = point.value)
            .or_insert(MonthSpan {
                start_time: point.time,
                start_value: point.value,
                end_value: point.value,
            });
    }

    months
        .into_values()
        .filter(|span| span.start_value > 0.0)
        .map(|span| EquityPoint {
            time: span.start_time,
            value: round2((span.end_value - span.start_value) / span.start_value * 100.0),
        })
        .collect()
}
