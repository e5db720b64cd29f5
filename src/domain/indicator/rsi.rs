//! RSI (Relative Strength Index) over a trailing window.
//!
//! Averages are simple means of the last `period` gains and losses, recomputed
//! for every candle (no Wilder carry-over between candles).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100

/// RSI at `index` using the `period` price changes ending there.
///
/// `None` when `period` is 0 or fewer than `period` changes precede `index`.
pub fn rsi_at(closes: &[f64], index: usize, period: usize) -> Option<f64> {
    if period == 0 || index < period || index >= closes.len() {
        return None;
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for j in index + 1 - period..=index {
        let change = closes[j] - closes[j - 1];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += change.abs();
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        Some(100.0)
    } else {
        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}
