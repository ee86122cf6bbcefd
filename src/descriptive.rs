//! Descriptive primitives shared by the test engines.
//!
//! Mean, sample variance, standard deviation and median come from
//! `u_numflow::stats` (compensated summation, Welford variance). The
//! remaining helpers build on those.
//!
//! All functions return `None` for empty input or non-finite values.

use u_numflow::stats;

/// Arithmetic mean.
///
/// # Examples
///
/// ```
/// use u_hypotest::descriptive::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    stats::mean(data)
}

/// Sample variance (denominator `n − 1`).
///
/// # Returns
///
/// `None` if fewer than 2 observations or non-finite values.
///
/// # Examples
///
/// ```
/// use u_hypotest::descriptive::variance;
///
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    stats::variance(data)
}

/// Population variance (denominator `n`).
pub fn population_variance(data: &[f64]) -> Option<f64> {
    Some(sum_of_squares(data)? / data.len() as f64)
}

/// Sample standard deviation, `√variance`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    stats::std_dev(data)
}

/// Median without mutating the input.
///
/// # Examples
///
/// ```
/// use u_hypotest::descriptive::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    if data.iter().any(|x| !x.is_finite()) {
        return None;
    }
    stats::median(data)
}

/// Sum of squared deviations from the mean, Σ(x − x̄)².
pub fn sum_of_squares(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    Some(data.iter().map(|&x| (x - m).powi(2)).sum())
}

/// Harmonic mean of group sizes, `k / Σ(1/nᵢ)`.
///
/// Used as the effective per-group sample size for unbalanced Tukey HSD.
///
/// # Returns
///
/// `None` if `sizes` is empty or contains a zero.
///
/// # Examples
///
/// ```
/// use u_hypotest::descriptive::harmonic_mean;
///
/// assert_eq!(harmonic_mean(&[4, 4, 4]), Some(4.0));
/// assert!((harmonic_mean(&[2, 6]).unwrap() - 3.0).abs() < 1e-12);
/// ```
pub fn harmonic_mean(sizes: &[usize]) -> Option<f64> {
    if sizes.is_empty() || sizes.contains(&0) {
        return None;
    }
    let recip: f64 = sizes.iter().map(|&n| 1.0 / n as f64).sum();
    Some(sizes.len() as f64 / recip)
}
