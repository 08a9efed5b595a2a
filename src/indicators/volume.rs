// Volume ratio: the bar's volume over the mean volume of the trailing
// `window` bars (the window includes the bar itself).

use super::window::{defined, rolling_mean};

pub fn calculate_volume_ratio(volumes: &[f64], window: usize) -> Vec<Option<f64>> {
    let avg = rolling_mean(&defined(volumes), window);
    volumes
        .iter()
        .zip(&avg)
        .map(|(&vol, avg)| {
            let avg = (*avg)?;
            if avg == 0.0 {
                return None;
            }
            Some(vol / avg)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_volume_ratio_is_one() {
        let r = calculate_volume_ratio(&[500.0; 25], 20);
        assert!(r[18].is_none());
        assert_eq!(r[24], Some(1.0));
    }

    #[test]
    fn spike_on_last_bar() {
        let mut vols = vec![100.0; 20];
        vols[19] = 290.0;
        // mean = (19 * 100 + 290) / 20 = 109.5
        let r = calculate_volume_ratio(&vols, 20).last().copied().flatten().unwrap();
        assert!((r - 290.0 / 109.5).abs() < 1e-12);
    }

    #[test]
    fn zero_average_volume_is_undefined() {
        let r = calculate_volume_ratio(&[0.0; 20], 20);
        assert!(r.iter().all(Option::is_none));
    }
}
