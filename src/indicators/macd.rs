// =============================================================================
// MACD — Moving Average Convergence/Divergence
// =============================================================================
//
//   MACD      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(MACD, signal_span)
//   histogram = MACD - signal
//
// All three EMAs are seeded from their first observation, so every line is
// defined from the first bar onwards.

use super::ema::calculate_ema;

/// The MACD triad, each aligned 1:1 with the input closes.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let macd: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    // The signal EMA runs over the defined prefix of the MACD line.
    let defined_len = macd.iter().take_while(|v| v.is_some()).count();
    let macd_values: Vec<f64> = macd[..defined_len].iter().flatten().copied().collect();
    let mut signal = calculate_ema(&macd_values, signal_span);
    signal.resize(macd.len(), None);

    let histogram = macd
        .iter()
        .zip(&signal)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        let m = calculate_macd(&[], 12, 26, 9);
        assert!(m.macd.is_empty() && m.signal.is_empty() && m.histogram.is_empty());
    }

    #[test]
    fn macd_defined_from_first_bar() {
        let m = calculate_macd(&[100.0], 12, 26, 9);
        assert_eq!(m.macd, vec![Some(0.0)]);
        assert_eq!(m.signal, vec![Some(0.0)]);
        assert_eq!(m.histogram, vec![Some(0.0)]);
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let m = calculate_macd(&[50.0; 30], 12, 26, 9);
        for h in m.histogram.into_iter().flatten() {
            assert!(h.abs() < 1e-12);
        }
    }

    #[test]
    fn macd_rising_series_is_bullish() {
        let closes: Vec<f64> = (1..=60).map(|x| 100.0 + x as f64).collect();
        let m = calculate_macd(&closes, 12, 26, 9);
        let macd = m.macd.last().copied().flatten().unwrap();
        let signal = m.signal.last().copied().flatten().unwrap();
        assert!(macd > 0.0);
        assert!(macd > signal);
    }

    #[test]
    fn histogram_sign_matches_macd_minus_signal() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        let m = calculate_macd(&closes, 12, 26, 9);
        for ((macd, signal), hist) in m.macd.iter().zip(&m.signal).zip(&m.histogram) {
            let (macd, signal, hist) = (macd.unwrap(), signal.unwrap(), hist.unwrap());
            assert_eq!(hist, macd - signal);
            assert_eq!(hist > 0.0, macd > signal);
            assert_eq!(hist < 0.0, macd < signal);
        }
    }
}
