// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = value_0
//   EMA_t  = EMA_{t-1} + alpha * (value_t - EMA_{t-1})
//
// The series is seeded from the first observation; there is no warm-up
// truncation, so every position is defined once one value exists.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// The output is aligned 1:1 with the input.
///
/// # Edge cases
/// - `span == 0` => every position undefined
/// - A non-finite intermediate value ends the series; later positions stay
///   undefined because downstream consumers should not trust it.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if span == 0 || values.is_empty() {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = values[0];
    if !prev.is_finite() {
        return result;
    }
    result[0] = Some(prev);

    for (i, &value) in values.iter().enumerate().skip(1) {
        let ema = prev + alpha * (value - prev);
        if !ema.is_finite() {
            break;
        }
        result[i] = Some(ema);
        prev = ema;
    }

    result
}
