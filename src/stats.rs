//! Batch-relative standardization and small descriptive helpers.
//!
//! Standardization here is deliberately an explicit free function invoked
//! fresh per call: the z-scores it produces are a pure function of whatever
//! values happen to be in the batch, and the same raw value standardizes
//! differently in a different batch. Callers own that contract; nothing in
//! this module caches fitted statistics.

/// Standardizes a batch to zero mean and unit variance (population std).
///
/// NaN entries are zero-filled before the statistics are computed, matching
/// the derived-metric contract. A batch with (near-)zero variance maps every
/// entry to 0.0, so a single-value batch always standardizes to `[0.0]`.
///
/// # Examples
///
/// ```
/// use viabilidad::stats::standardize;
///
/// let z = standardize(&[1.0, 2.0, 3.0]);
/// assert!(z[0] < 0.0 && z[2] > 0.0);
/// assert!((z[1]).abs() < 1e-12);
///
/// assert_eq!(standardize(&[42.0]), vec![0.0]);
/// ```
#[must_use]
pub fn standardize(values: &[f64]) -> Vec<f64> {
    let filled: Vec<f64> = values
        .iter()
        .map(|v| if v.is_nan() { 0.0 } else { *v })
        .collect();
    if filled.is_empty() {
        return filled;
    }
    let mean = filled.iter().sum::<f64>() / filled.len() as f64;
    let var = filled.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / filled.len() as f64;
    let std = var.sqrt();
    if std <= 1e-10 {
        return vec![0.0; filled.len()];
    }
    filled.iter().map(|v| (v - mean) / std).collect()
}

/// Standardizes a batch while leaving NaN entries in place.
///
/// Statistics are computed over the finite entries only (NaN-omitting, the
/// peer-comparison policy); NaN inputs stay NaN in the output. Zero-variance
/// batches map every finite entry to 0.0.
#[must_use]
pub fn standardize_lenient(values: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        return values.to_vec();
    }
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / finite.len() as f64;
    let std = var.sqrt();
    values
        .iter()
        .map(|v| {
            if v.is_nan() {
                f64::NAN
            } else if std <= 1e-10 {
                0.0
            } else {
                (v - mean) / std
            }
        })
        .collect()
}

/// Median of the finite entries (NaN if none are finite).
#[must_use]
pub fn nan_median(values: &[f64]) -> f64 {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        (finite[mid - 1] + finite[mid]) / 2.0
    } else {
        finite[mid]
    }
}

/// Mean of the finite entries (NaN if none are finite).
#[must_use]
pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
