// =============================================================================
// Rate of Change (N-day return)
// =============================================================================
//
// ROC measures the percentage change in price over a look-back period:
//   ROC = ((close - close_n) / close_n) * 100
//
// Positive ROC indicates upward momentum; negative indicates downward.

/// Calculate the N-day return for the given closing prices.
///
/// Aligned 1:1 with `closes`; position `i` is defined from index `period`
/// (i.e. once `period + 1` closes exist).  A zero reference close is
/// undefined rather than reported as 0%.
pub fn calculate_roc(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 {
        return result;
    }

    for i in period..closes.len() {
        let prev = closes[i - period];
        if prev != 0.0 {
            result[i] = Some(((closes[i] - prev) / prev) * 100.0);
        }
    }
    result
}
