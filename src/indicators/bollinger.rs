// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the sample standard deviation of
// the closes over the same window.
//
// Band position locates the close inside the bands:
//   position = (close - lower) / (upper - lower) * 100
// and is undefined when the bands have zero width.

use super::window::{defined, rolling_mean, rolling_std};

/// Bands and position, each aligned 1:1 with the input closes.
#[derive(Debug, Clone, Default)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub position: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Every output is undefined before `period` closes exist.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerSeries {
    let values = defined(closes);
    let middle = rolling_mean(&values, period);
    let std = rolling_std(&values, period);

    let mut upper = vec![None; closes.len()];
    let mut lower = vec![None; closes.len()];
    let mut position = vec![None; closes.len()];

    for i in 0..closes.len() {
        let (Some(mid), Some(sd)) = (middle[i], std[i]) else {
            continue;
        };
        let up = mid + num_std * sd;
        let lo = mid - num_std * sd;
        upper[i] = Some(up);
        lower[i] = Some(lo);

        let width = up - lo;
        if width > 0.0 {
            position[i] = Some((closes[i] - lo) / width * 100.0);
        }
    }

    BollingerSeries {
        upper,
        middle,
        lower,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        let (up, mid, lo) = (bb.upper[19].unwrap(), bb.middle[19].unwrap(), bb.lower[19].unwrap());
        assert!((mid - 10.5).abs() < 1e-12);
        assert!(up > mid && lo < mid);
        assert!(((up - mid) - (mid - lo)).abs() < 1e-12);
    }

    #[test]
    fn bollinger_uses_sample_std() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        // Sample variance of 1..=20 is 35.
        let expected = 10.5 + 2.0 * 35.0_f64.sqrt();
        assert!((bb.upper[19].unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bb = calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0);
        assert!(bb.middle.iter().all(Option::is_none));
        assert!(bb.upper.iter().all(Option::is_none));
    }

    #[test]
    fn bollinger_flat_has_zero_width_and_no_position() {
        let bb = calculate_bollinger(&[100.0; 30], 20, 2.0);
        let last = 29;
        assert_eq!(bb.upper[last], Some(100.0));
        assert_eq!(bb.lower[last], Some(100.0));
        assert!(bb.position[last].is_none());
    }

    #[test]
    fn position_is_within_bands_for_inside_close() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.9).sin() * 3.0).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        for (i, pos) in bb.position.iter().enumerate() {
            if let Some(p) = pos {
                let inside = closes[i] >= bb.lower[i].unwrap() && closes[i] <= bb.upper[i].unwrap();
                if inside {
                    assert!((0.0..=100.0).contains(p), "position {p} at {i}");
                }
            }
        }
    }
}
