//! Small numeric helpers shared by the indicator and scoring crates.

/// Arithmetic mean of a slice. Returns 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

/// Spread of the window relative to its mean: `(max - min) / mean`.
///
/// Returns `None` for an empty window or a non-positive mean.
pub fn relative_range(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let m = mean(data);
    if m <= 0.0 {
        return None;
    }
    Some((max - min) / m)
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
