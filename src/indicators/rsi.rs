// =============================================================================
// Relative Strength Index (RSI) — simple rolling-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — avg_gain / avg_loss are the plain arithmetic means of the gains and
//          of the absolute losses over the trailing `period` deltas.  There is
//          no Wilder smoothing: each window stands alone.
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

use super::window::rolling_mean;

/// Compute the RSI series for `closes`, aligned 1:1 with the input.
///
/// Position `i` is defined once `period` deltas exist, i.e. from index
/// `period` onwards.
///
/// # Edge cases
/// - `period == 0` => every position undefined
/// - No losses in the window (but some gains) => 100.0
/// - Neither gains nor losses in the window => undefined (0 / 0)
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if closes.is_empty() {
        return Vec::new();
    }

    // deltas[0] has no predecessor and stays undefined.
    let mut gains = vec![None; closes.len()];
    let mut losses = vec![None; closes.len()];
    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        gains[i] = Some(delta.max(0.0));
        losses[i] = Some((-delta).max(0.0));
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| rsi_from_averages((*g)?, (*l)?))
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { None } else { Some(100.0) };
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
