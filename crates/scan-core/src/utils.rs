//! Utility functions for working with measurement slices
//!
//! Raw measurement arrays may carry NaN or infinite values from corrupt
//! captures. Everything here either filters them out or tolerates them.

use std::cmp::Ordering;

use num_traits::ToPrimitive;
use statrs::statistics::Statistics;

/// Collect the finite values of `data`, preserving order
///
/// # Examples
///
/// ```rust
/// use scan_core::utils::finite_values;
///
/// let data = [1.0, f64::NAN, 2.0, f64::INFINITY];
/// assert_eq!(finite_values(&data), vec![1.0, 2.0]);
/// ```
pub fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}

/// Number of finite values in `data`
pub fn count_finite(data: &[f64]) -> usize {
    data.iter().filter(|x| x.is_finite()).count()
}

/// Sort data and return a new vector
///
/// Handles NaN values by placing them at the end.
///
/// # Examples
///
/// ```rust
/// use scan_core::utils::sorted;
///
/// let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    });
    sorted
}

/// Smallest and largest finite value, or `None` if there are none
pub fn extent(data: &[f64]) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

/// Calculate the mean of a slice
///
/// Returns 0.0 for empty slices.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().mean()
}

/// Calculate the sample standard deviation
///
/// Returns 0.0 for slices with less than 2 elements.
///
/// # Examples
///
/// ```rust
/// use scan_core::utils::std_dev;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let sd = std_dev(&data);
/// assert!((sd - 1.58113883).abs() < 1e-6);
/// ```
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    data.iter().std_dev()
}

/// Linearly interpolated quantile of already sorted, finite data
///
/// Uses the `(n - 1) * p` position convention. Returns `None` for an empty
/// slice or a probability outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * p;
    let lo = pos.floor().to_usize()?;
    let hi = pos.ceil().to_usize()?.min(sorted.len() - 1);
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Interquartile range of already sorted, finite data
pub fn iqr_sorted(sorted: &[f64]) -> f64 {
    match (quantile_sorted(sorted, 0.25), quantile_sorted(sorted, 0.75)) {
        (Some(q1), Some(q3)) => q3 - q1,
        _ => 0.0,
    }
}
