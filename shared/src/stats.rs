//! Numeric helpers over `f64` slices

/// Largest magnitude in the slice, or 1 when every value is zero.
fn magnitude(values: &[f64]) -> f64 {
    let max = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Arithmetic mean; 0 for an empty slice.
///
/// Finite input always gives a finite mean: a sum that overflows is redone
/// on values scaled into [-1, 1].
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    if sum.is_finite() {
        return sum / n;
    }
    let scale = magnitude(values);
    scale * (values.iter().map(|v| v / scale).sum::<f64>() / n)
}

/// Population standard deviation; 0 for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if variance.is_finite() {
        return variance.sqrt();
    }
    let scale = magnitude(values);
    let scaled_mean = mean / scale;
    let scaled_variance = values
        .iter()
        .map(|v| (v / scale - scaled_mean).powi(2))
        .sum::<f64>()
        / n;
    scale * scaled_variance.sqrt()
}

/// Relative spread below which a series counts as constant
const FLAT_TOLERANCE: f64 = 1e-12;

/// Z-score of every value against the whole slice.
///
/// A (numerically) zero standard deviation yields 0 for every value; summing
/// a constant series can leave rounding noise in the mean. Deviations are
/// taken on scaled values so a spread near `f64::MAX` cannot overflow.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    let mean = mean(values);
    let std = std_dev(values);
    if std <= FLAT_TOLERANCE * mean.abs().max(1.0) {
        return vec![0.0; values.len()];
    }
    let scale = magnitude(values);
    let (mean, std) = (mean / scale, std / scale);
    values.iter().map(|v| (v / scale - mean) / std).collect()
}

/// `out[i] = values[i] - values[i - 1]`, with `out[0] = 0`.
pub fn first_differences(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
        out.push(if i == 0 { 0.0 } else { v - values[i - 1] });
    }
    out
}

/// Half-open index range of a centered window of `width` around `index`,
/// truncated at the series boundaries.
pub fn centered_window(index: usize, width: usize, len: usize) -> std::ops::Range<usize> {
    let start = index.saturating_sub(width / 2);
    let end = (index + width.div_ceil(2)).min(len);
    start..end
}

/// Centered rolling mean. Windows shrink at the edges instead of padding.
///
/// `width` must be at least 1.
pub fn rolling_average(values: &[f64], width: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| mean(&values[centered_window(i, width, values.len())]))
        .collect()
}
