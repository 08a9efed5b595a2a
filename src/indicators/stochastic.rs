// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
//   %K = 100 * (close - lowest_low) / (highest_high - lowest_low)
//   %D = SMA(%K, d_period)
//
// Lowest low / highest high are taken over the trailing `k_period` bars.  A
// zero high-low range leaves %K undefined for that bar instead of dividing by
// zero, and any undefined %K inside the %D window leaves %D undefined too.

use super::window::{rolling_max, rolling_mean, rolling_min};

#[derive(Debug, Clone, Default)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> StochasticSeries {
    let lowest = rolling_min(lows, k_period);
    let highest = rolling_max(highs, k_period);

    let k: Vec<Option<f64>> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let (lo, hi) = (lowest.get(i).copied()??, highest.get(i).copied()??);
            let range = hi - lo;
            if range == 0.0 {
                return None;
            }
            Some(100.0 * (close - lo) / range)
        })
        .collect();

    let d = rolling_mean(&k, d_period);
    StochasticSeries { k, d }
}
