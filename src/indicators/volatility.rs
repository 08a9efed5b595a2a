// =============================================================================
// Realized Volatility
// =============================================================================
//
// Rolling sample standard deviation of the daily fractional price change over
// `window` changes, expressed as a percentage:
//
//   r_t        = (close_t - close_{t-1}) / close_{t-1}
//   volatility = std(r over window) * 100
//
// The first change needs two closes, so the first defined value sits at index
// `window`.  A zero previous close makes that change (and every window that
// contains it) undefined.

use super::window::rolling_std;

pub fn calculate_volatility(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut changes = vec![None; closes.len()];
    for i in 1..closes.len() {
        let prev = closes[i - 1];
        if prev != 0.0 {
            changes[i] = Some((closes[i] - prev) / prev);
        }
    }

    rolling_std(&changes, window)
        .into_iter()
        .map(|sd| sd.map(|v| v * 100.0))
        .collect()
}
