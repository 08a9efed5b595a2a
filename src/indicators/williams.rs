// Williams %R:  -100 * (highest_high - close) / (highest_high - lowest_low)
// over the trailing `period` bars.  Ranges from -100 (close at the low) to 0
// (close at the high); a zero range is undefined.

use super::window::{rolling_max, rolling_min};

pub fn calculate_williams_r(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let lowest = rolling_min(lows, period);
    let highest = rolling_max(highs, period);

    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let (lo, hi) = (lowest.get(i).copied()??, highest.get(i).copied()??);
            let range = hi - lo;
            if range == 0.0 {
                return None;
            }
            Some(-100.0 * (hi - close) / range)
        })
        .collect()
}
