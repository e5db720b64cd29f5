//! Exponential moving average recurrence.
//!
//! alpha = 2/(n+1), seeded by an SMA, then EMA = alpha*C + (1-alpha)*EMA_prev.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaState {
    alpha: f64,
    value: f64,
}

impl EmaState {
    pub fn smoothing(period: usize) -> f64 {
        2.0 / (period as f64 + 1.0)
    }

    pub fn seeded(period: usize, seed: f64) -> Self {
        EmaState {
            alpha: Self::smoothing(period),
            value: seed,
        }
    }

    pub fn update(&mut self, price: f64) -> f64 {
        self.value = self.alpha * price + (1.0 - self.alpha) * self.value;
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_factor() {
        assert!((EmaState::smoothing(10) - 2.0 / 11.0).abs() < f64::EPSILON);
        assert!((EmaState::smoothing(1) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn seed_is_initial_value() {
        let ema = EmaState::seeded(3, 20.0);
        assert!((ema.value() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recursive_calculation() {
        let k = 2.0 / 4.0;
        let sma = (10.0 + 20.0 + 30.0) / 3.0;
        let mut ema = EmaState::seeded(3, sma);

        let ema_3 = k * 40.0 + (1.0 - k) * sma;
        assert!((ema.update(40.0) - ema_3).abs() < f64::EPSILON);

        let ema_4 = k * 50.0 + (1.0 - k) * ema_3;
        assert!((ema.update(50.0) - ema_4).abs() < f64::EPSILON);
    }

    #[test]
    fn equal_prices_stay_flat() {
        let mut ema = EmaState::seeded(5, 100.0);
        for _ in 0..10 {
            assert!((ema.update(100.0) - 100.0).abs() < 1e-12);
        }
    }
}
