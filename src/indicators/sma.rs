// Simple Moving Average over a fixed trailing window.

use super::window::{defined, rolling_mean};

/// SMA aligned 1:1 with `values`; undefined for the first `period - 1`
/// positions (and everywhere when the series is shorter than `period`).
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling_mean(&defined(values), period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_basic() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_eq!(sma.last().copied().flatten(), Some(3.0));
        assert!(sma[..4].iter().all(Option::is_none));
    }

    #[test]
    fn sma_50_absent_on_short_series() {
        let closes: Vec<f64> = (1..=49).map(|x| x as f64).collect();
        assert!(calculate_sma(&closes, 50).iter().all(Option::is_none));
    }
}
