// =============================================================================
// Rolling-window helpers
// =============================================================================
//
// Every helper returns a vector aligned 1:1 with its input.  Position `i` is
// defined only when the full window ending at `i` exists and every value in
// it is defined; a missing value anywhere in the window makes the output
// undefined rather than shrinking the window.

/// Apply `f` to each complete window of `values`.
pub fn rolling<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut buf = Vec::with_capacity(window);
    for end in window - 1..values.len() {
        buf.clear();
        buf.extend(values[end + 1 - window..=end].iter().flatten().copied());
        if buf.len() == window {
            out[end] = f(&buf).filter(|v| v.is_finite());
        }
    }
    out
}

pub fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| Some(v)).collect()
}

pub fn mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(window: &[f64]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let m = mean(window)?;
    let var = window.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (window.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn min(window: &[f64]) -> Option<f64> {
    window.iter().copied().reduce(f64::min)
}

pub fn max(window: &[f64]) -> Option<f64> {
    window.iter().copied().reduce(f64::max)
}

pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, mean)
}

pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, sample_std)
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(&defined(values), window, min)
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(&defined(values), window, max)
}
