//! General hypothesis testing.
//!
//! t-tests (independent Welch, paired, one-sample), t-based confidence
//! intervals for a mean, and χ² tests for contingency tables and
//! goodness of fit.
//!
//! # Examples
//!
//! ```
//! use u_hypotest::testing::one_sample_t_test;
//!
//! let data = [5.1, 4.9, 5.2, 5.0, 4.8, 5.3, 5.1, 4.9];
//! let result = one_sample_t_test(&data, 5.0).unwrap();
//! assert!(!result.significant); // cannot reject H₀: μ = 5.0
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::descriptive::{mean, variance};
use crate::distribution::{
    chi_square_p_value, t_p_value_one_tailed, t_p_value_two_tailed, t_quantile,
};
use crate::error::{Error, Result};
use crate::{is_significant, EffectMagnitude};

// Expected counts below this are "low" for the χ² approximation.
const LOW_EXPECTED_COUNT: f64 = 5.0;
// Fraction of low-expected cells above which the approximation is flagged.
const LOW_EXPECTED_SHARE: f64 = 0.2;

// ---------------------------------------------------------------------------
// t-tests
// ---------------------------------------------------------------------------

/// Which t-test to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TTestKind {
    /// Two independent samples, unequal variances (Welch).
    Independent,
    /// Two paired samples, tested on their differences.
    Paired,
    /// One sample against a population mean.
    OneSample,
}

impl fmt::Display for TTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Independent => write!(f, "independent"),
            Self::Paired => write!(f, "paired"),
            Self::OneSample => write!(f, "one-sample"),
        }
    }
}

impl FromStr for TTestKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" | "welch" | "two-sample" | "two_sample" => Ok(Self::Independent),
            "paired" | "dependent" => Ok(Self::Paired),
            "one-sample" | "one_sample" | "onesample" | "single" => Ok(Self::OneSample),
            _ => Err(Error::UnknownTTestKind(s.to_string())),
        }
    }
}

/// Result of a t-test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    /// Which test produced this result.
    pub kind: TTestKind,
    /// t-statistic; `±∞` for a non-zero difference with zero standard error.
    pub t_statistic: f64,
    /// Degrees of freedom (fractional for Welch).
    pub df: f64,
    /// Two-tailed p-value.
    pub p_value: f64,
    /// Upper-tail p-value, P(T ≥ t).
    pub p_value_one_tailed: f64,
    /// x̄₁ − x̄₂, mean of differences, or x̄ − μ₀.
    pub mean_difference: f64,
    /// Standard error of `mean_difference`.
    pub standard_error: f64,
    /// Cohen's d.
    pub cohens_d: f64,
    /// Effect-size class of d.
    pub effect_magnitude: EffectMagnitude,
    /// 95% confidence interval on `mean_difference`.
    pub confidence_interval: (f64, f64),
    /// `p_value < 0.05`.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// Runs the t-test selected by `kind`.
///
/// `second` is required for [`TTestKind::Independent`] and
/// [`TTestKind::Paired`]; `population_mean` is used only by
/// [`TTestKind::OneSample`].
///
/// # Examples
///
/// ```
/// use u_hypotest::testing::{t_test, TTestKind};
///
/// let kind: TTestKind = "paired".parse().unwrap();
/// let before = [5.0, 6.0, 7.0, 8.0, 9.0];
/// let after = [5.5, 6.2, 7.1, 8.3, 9.4];
/// let r = t_test(kind, &before, Some(&after[..]), 0.0).unwrap();
/// assert!(r.t_statistic < 0.0);
/// ```
pub fn t_test(
    kind: TTestKind,
    first: &[f64],
    second: Option<&[f64]>,
    population_mean: f64,
) -> Option<TTestResult> {
    match kind {
        TTestKind::Independent => independent_t_test(first, second?),
        TTestKind::Paired => paired_t_test(first, second?),
        TTestKind::OneSample => one_sample_t_test(first, population_mean),
    }
}

/// Two-sample Welch t-test: H₀: μ₁ = μ₂ (unequal variances).
///
/// # Algorithm
///
/// t = (x̄₁ − x̄₂) / √(s₁²/n₁ + s₂²/n₂)
/// df = Welch-Satterthwaite approximation.
/// Cohen's d uses the pooled standard deviation.
///
/// # Returns
///
/// `None` if either sample has fewer than 2 observations, values are
/// non-finite, or the standard error is zero.
///
/// # References
///
/// Welch (1947). "The generalization of Student's problem when several
/// different population variances are involved". Biometrika, 34, 28–35.
///
/// # Examples
///
/// ```
/// use u_hypotest::testing::independent_t_test;
///
/// let a = [5.1, 4.9, 5.2, 5.0, 4.8];
/// let b = [7.1, 6.9, 7.2, 7.0, 6.8];
/// let r = independent_t_test(&a, &b).unwrap();
/// assert!(r.p_value < 0.01); // means clearly differ
/// ```
pub fn independent_t_test(a: &[f64], b: &[f64]) -> Option<TTestResult> {
    let n1 = a.len();
    let n2 = b.len();
    if n1 < 2 || n2 < 2 {
        return None;
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let mean1 = mean(a)?;
    let mean2 = mean(b)?;
    let var1 = variance(a)?;
    let var2 = variance(b)?;

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let v1 = var1 / n1f;
    let v2 = var2 / n2f;
    let se_sq = v1 + v2;
    if se_sq <= 0.0 {
        tracing::debug!("independent t-test: zero standard error");
        return None;
    }
    let standard_error = se_sq.sqrt();

    let mean_difference = mean1 - mean2;
    let t = mean_difference / standard_error;
    let df = se_sq * se_sq / (v1 * v1 / (n1f - 1.0) + v2 * v2 / (n2f - 1.0));

    let pooled_sd = (((n1f - 1.0) * var1 + (n2f - 1.0) * var2) / (n1f + n2f - 2.0)).sqrt();
    let cohens_d = standardized(mean_difference, pooled_sd);

    Some(build_t_result(
        TTestKind::Independent,
        t,
        df,
        mean_difference,
        standard_error,
        cohens_d,
    ))
}

/// Paired t-test: H₀: mean difference = 0.
///
/// # Algorithm
///
/// Computes differences dᵢ = xᵢ − yᵢ, then applies the one-sample test
/// with μ₀ = 0. Cohen's d is d̄ / s_d.
///
/// # Returns
///
/// `None` if fewer than 2 pairs, slices differ in length, or non-finite values.
///
/// # Examples
///
/// ```
/// use u_hypotest::testing::paired_t_test;
///
/// let before = [5.0, 6.0, 7.0, 8.0, 9.0];
/// let after  = [5.5, 6.2, 7.1, 8.3, 9.4];
/// let r = paired_t_test(&before, &after).unwrap();
/// assert!(r.t_statistic < 0.0); // after > before
/// ```
pub fn paired_t_test(x: &[f64], y: &[f64]) -> Option<TTestResult> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let diffs: Vec<f64> = x.iter().zip(y.iter()).map(|(&a, &b)| a - b).collect();
    let mut result = one_sample_t_test(&diffs, 0.0)?;
    result.kind = TTestKind::Paired;
    result.interpretation = interpret_t(
        TTestKind::Paired,
        result.significant,
        result.effect_magnitude,
    );
    Some(result)
}

/// One-sample t-test: H₀: μ = μ₀.
///
/// # Algorithm
///
/// t = (x̄ − μ₀) / (s / √n), df = n − 1.
///
/// A sample with zero variance yields t = `±∞` (p = 0) when x̄ ≠ μ₀ and
/// t = 0 (p = 1) otherwise.
///
/// # Returns
///
/// `None` if fewer than 2 observations or non-finite values.
///
/// # Examples
///
/// ```
/// use u_hypotest::testing::one_sample_t_test;
///
/// let data = [2.0, 4.0, 6.0, 8.0, 10.0];
/// let r = one_sample_t_test(&data, 6.0).unwrap();
/// assert!(r.p_value > 0.5); // mean is 6.0
/// ```
pub fn one_sample_t_test(data: &[f64], mu0: f64) -> Option<TTestResult> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    if data.iter().any(|v| !v.is_finite()) || !mu0.is_finite() {
        return None;
    }

    let sample_mean = mean(data)?;
    let sd = variance(data)?.sqrt();
    let standard_error = sd / (n as f64).sqrt();
    let mean_difference = sample_mean - mu0;

    let t = if standard_error > 0.0 {
        mean_difference / standard_error
    } else {
        tracing::debug!(mean_difference, "one-sample t-test: zero variance");
        signed_infinity(mean_difference)
    };
    let cohens_d = standardized(mean_difference, sd);

    Some(build_t_result(
        TTestKind::OneSample,
        t,
        (n - 1) as f64,
        mean_difference,
        standard_error,
        cohens_d,
    ))
}

fn build_t_result(
    kind: TTestKind,
    t: f64,
    df: f64,
    mean_difference: f64,
    standard_error: f64,
    cohens_d: f64,
) -> TTestResult {
    let p_value = t_p_value_two_tailed(t, df);
    let p_value_one_tailed = t_p_value_one_tailed(t, df);
    let margin = t_quantile(0.975, df).map_or(f64::NAN, |q| q * standard_error);
    let effect_magnitude = EffectMagnitude::from_standardized_difference(cohens_d);
    let significant = is_significant(p_value);

    tracing::trace!(%kind, t, df, p_value, "t-test");

    TTestResult {
        kind,
        t_statistic: t,
        df,
        p_value,
        p_value_one_tailed,
        mean_difference,
        standard_error,
        cohens_d,
        effect_magnitude,
        confidence_interval: (mean_difference - margin, mean_difference + margin),
        significant,
        interpretation: interpret_t(kind, significant, effect_magnitude),
    }
}

fn interpret_t(kind: TTestKind, significant: bool, effect: EffectMagnitude) -> String {
    let subject = match kind {
        TTestKind::Independent => "between the two group means",
        TTestKind::Paired => "between paired observations",
        TTestKind::OneSample => "between the sample mean and the population mean",
    };
    if significant {
        format!(
            "Significant difference {subject} ({} effect size)",
            effect.label()
        )
    } else {
        format!(
            "No significant difference {subject} ({} effect size)",
            effect.label()
        )
    }
}

// difference / sd, with the zero-sd cases mapped to ±∞ or 0.
fn standardized(difference: f64, sd: f64) -> f64 {
    if sd > 0.0 {
        difference / sd
    } else {
        signed_infinity(difference)
    }
}

fn signed_infinity(value: f64) -> f64 {
    if value > 0.0 {
        f64::INFINITY
    } else if value < 0.0 {
        f64::NEG_INFINITY
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Confidence interval
// ---------------------------------------------------------------------------

/// Confidence interval for a population mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Confidence level in percent.
    pub level: u32,
    /// Sample mean.
    pub mean: f64,
    /// s / √n.
    pub standard_error: f64,
    /// t critical value t(1 − α/2; n − 1).
    pub t_critical: f64,
    /// t_critical · standard_error.
    pub margin_of_error: f64,
    /// mean − margin.
    pub lower: f64,
    /// mean + margin.
    pub upper: f64,
    /// n − 1.
    pub df: usize,
}

/// t-based confidence interval for the mean at `level` percent.
///
/// # Returns
///
/// `None` if fewer than 2 observations, non-finite values, or `level`
/// outside 1..=99.
///
/// # Examples
///
/// ```
/// use u_hypotest::testing::confidence_interval;
///
/// let ci = confidence_interval(&[2.0, 4.0, 6.0, 8.0, 10.0], 95).unwrap();
/// assert!(ci.lower < 6.0 && 6.0 < ci.upper);
/// assert!(confidence_interval(&[1.0, 2.0], 100).is_none());
/// ```
pub fn confidence_interval(data: &[f64], level: u32) -> Option<ConfidenceInterval> {
    let n = data.len();
    if n < 2 || !(1..=99).contains(&level) {
        return None;
    }
    if data.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let sample_mean = mean(data)?;
    let standard_error = variance(data)?.sqrt() / (n as f64).sqrt();
    let df = n - 1;
    let alpha = 1.0 - f64::from(level) / 100.0;
    let t_critical = t_quantile(1.0 - alpha / 2.0, df as f64)?;
    let margin_of_error = t_critical * standard_error;

    Some(ConfidenceInterval {
        level,
        mean: sample_mean,
        standard_error,
        t_critical,
        margin_of_error,
        lower: sample_mean - margin_of_error,
        upper: sample_mean + margin_of_error,
        df,
    })
}

// ---------------------------------------------------------------------------
// Chi-square tests
// ---------------------------------------------------------------------------

/// Strength of association for Cramér's V.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationStrength {
    /// V < 0.1.
    Negligible,
    /// 0.1 ≤ V < 0.3.
    Weak,
    /// 0.3 ≤ V < 0.5.
    Moderate,
    /// V ≥ 0.5.
    Strong,
}

impl AssociationStrength {
    /// Classifies Cramér's V.
    pub fn from_cramers_v(v: f64) -> Self {
        if v < 0.1 {
            Self::Negligible
        } else if v < 0.3 {
            Self::Weak
        } else if v < 0.5 {
            Self::Moderate
        } else {
            Self::Strong
        }
    }

    /// Lower-case label used in interpretation sentences.
    pub fn label(self) -> &'static str {
        match self {
            Self::Negligible => "negligible",
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

/// Result of a χ² test of independence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareIndependence {
    /// Σ (O − E)² / E.
    pub chi_square_statistic: f64,
    /// χ² p-value (table-based for df ≤ 5).
    pub p_value: f64,
    /// (rows − 1)(columns − 1).
    pub df: usize,
    /// Grand total of the table.
    pub n_total: f64,
    /// Cramér's V = √(χ² / (N · (min(r, c) − 1))).
    pub cramers_v: f64,
    /// Strength class of V.
    pub association: AssociationStrength,
    /// Expected frequencies Rᵢ·Cⱼ/N, same shape as the input.
    pub expected: Vec<Vec<f64>>,
    /// Number of cells with expected frequency below 5.
    pub low_expected_cells: usize,
    /// More than 20% of cells have expected frequency below 5.
    pub low_expected_warning: bool,
    /// Significant at α = 0.05.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// χ² test of independence on a contingency table of counts.
///
/// # Returns
///
/// `None` if the table has fewer than 2 rows or columns, is not
/// rectangular, contains negative or non-finite counts, or has a row or
/// column summing to zero.
///
/// # Examples
///
/// ```
/// use u_hypotest::testing::chi_square_independence;
///
/// let table = [[10.0, 20.0], [20.0, 10.0]];
/// let r = chi_square_independence(&table).unwrap();
/// assert!((r.chi_square_statistic - 20.0 / 3.0).abs() < 1e-10);
/// assert_eq!(r.df, 1);
/// ```
pub fn chi_square_independence<R: AsRef<[f64]>>(table: &[R]) -> Option<ChiSquareIndependence> {
    let rows = table.len();
    if rows < 2 {
        return None;
    }
    let cols = table[0].as_ref().len();
    if cols < 2 || table.iter().any(|r| r.as_ref().len() != cols) {
        return None;
    }
    if table
        .iter()
        .flat_map(|r| r.as_ref().iter())
        .any(|&v| !v.is_finite() || v < 0.0)
    {
        return None;
    }

    let row_totals: Vec<f64> = table.iter().map(|r| r.as_ref().iter().sum()).collect();
    let col_totals: Vec<f64> = (0..cols)
        .map(|j| table.iter().map(|r| r.as_ref()[j]).sum())
        .collect();
    if row_totals.iter().chain(col_totals.iter()).any(|&t| t <= 0.0) {
        return None;
    }
    let n_total: f64 = row_totals.iter().sum();

    let expected: Vec<Vec<f64>> = row_totals
        .iter()
        .map(|&rt| col_totals.iter().map(|&ct| rt * ct / n_total).collect())
        .collect();

    let chi2: f64 = table
        .iter()
        .zip(expected.iter())
        .flat_map(|(obs, exp)| obs.as_ref().iter().zip(exp.iter()))
        .map(|(&o, &e)| (o - e) * (o - e) / e)
        .sum();

    let (low_expected_cells, low_expected_warning) =
        low_expected(expected.iter().flat_map(|r| r.iter()), rows * cols);

    let df = (rows - 1) * (cols - 1);
    let p_value = chi_square_p_value(chi2, df as f64);
    let min_dim = rows.min(cols) as f64;
    let cramers_v = (chi2 / (n_total * (min_dim - 1.0))).sqrt();
    let association = AssociationStrength::from_cramers_v(cramers_v);
    let significant = is_significant(p_value);

    if low_expected_warning {
        tracing::debug!(
            low_expected_cells,
            "chi-square independence: many expected frequencies below 5"
        );
    }
    tracing::trace!(chi2, p_value, df, "chi-square independence");

    Some(ChiSquareIndependence {
        chi_square_statistic: chi2,
        p_value,
        df,
        n_total,
        cramers_v,
        association,
        expected,
        low_expected_cells,
        low_expected_warning,
        significant,
        interpretation: if significant {
            format!(
                "Significant association between the variables ({} association)",
                association.label()
            )
        } else {
            "No significant association between the variables".to_string()
        },
    })
}

/// Result of a χ² goodness-of-fit test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareGoodnessOfFit {
    /// Σ (O − E)² / E.
    pub chi_square_statistic: f64,
    /// χ² p-value (table-based for df ≤ 5).
    pub p_value: f64,
    /// Categories − 1.
    pub df: usize,
    /// Total observed count.
    pub n_total: f64,
    /// Expected frequencies, scaled to `n_total`.
    pub expected: Vec<f64>,
    /// Number of categories with expected frequency below 5.
    pub low_expected_cells: usize,
    /// More than 20% of categories have expected frequency below 5.
    pub low_expected_warning: bool,
    /// Significant at α = 0.05.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// χ² goodness-of-fit test of observed counts against expected
/// frequencies.
///
/// With `expected = None` the categories are assumed equally likely.
/// Supplied expected frequencies may be proportions or counts: they are
/// rescaled to the observed total.
///
/// # Returns
///
/// `None` if fewer than 2 categories, negative or non-finite counts, a
/// zero observed total, or `expected` differs in length or contains a
/// non-positive value.
///
/// # Examples
///
/// ```
/// use u_hypotest::testing::chi_square_goodness_of_fit;
///
/// let r = chi_square_goodness_of_fit(&[30.0, 10.0, 10.0, 10.0], None).unwrap();
/// assert!((r.chi_square_statistic - 20.0).abs() < 1e-10);
/// assert!(r.significant);
/// ```
pub fn chi_square_goodness_of_fit(
    observed: &[f64],
    expected: Option<&[f64]>,
) -> Option<ChiSquareGoodnessOfFit> {
    let k = observed.len();
    if k < 2 || observed.iter().any(|&v| !v.is_finite() || v < 0.0) {
        return None;
    }
    let n_total: f64 = observed.iter().sum();
    if n_total <= 0.0 {
        return None;
    }

    let expected: Vec<f64> = match expected {
        None => vec![n_total / k as f64; k],
        Some(e) => {
            if e.len() != k || e.iter().any(|&v| !v.is_finite() || v <= 0.0) {
                return None;
            }
            let scale = n_total / e.iter().sum::<f64>();
            e.iter().map(|&v| v * scale).collect()
        }
    };

    let chi2: f64 = observed
        .iter()
        .zip(expected.iter())
        .map(|(&o, &e)| (o - e) * (o - e) / e)
        .sum();
    let (low_expected_cells, low_expected_warning) = low_expected(expected.iter(), k);

    let df = k - 1;
    let p_value = chi_square_p_value(chi2, df as f64);
    let significant = is_significant(p_value);

    tracing::trace!(chi2, p_value, df, "chi-square goodness of fit");

    Some(ChiSquareGoodnessOfFit {
        chi_square_statistic: chi2,
        p_value,
        df,
        n_total,
        expected,
        low_expected_cells,
        low_expected_warning,
        significant,
        interpretation: if significant {
            "Observed frequencies differ significantly from expected".to_string()
        } else {
            "Observed frequencies are consistent with expected".to_string()
        },
    })
}

fn low_expected<'a>(cells: impl Iterator<Item = &'a f64>, total: usize) -> (usize, bool) {
    let low = cells.filter(|&&e| e < LOW_EXPECTED_COUNT).count();
    (low, low as f64 / total as f64 > LOW_EXPECTED_SHARE)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // t-tests
    // -----------------------------------------------------------------------

    #[test]
    fn kind_parses() {
        assert_eq!("Welch".parse::<TTestKind>(), Ok(TTestKind::Independent));
        assert_eq!("paired".parse::<TTestKind>(), Ok(TTestKind::Paired));
        assert_eq!(" one-sample ".parse::<TTestKind>(), Ok(TTestKind::OneSample));
        assert_eq!(
            "anova".parse::<TTestKind>(),
            Err(Error::UnknownTTestKind("anova".to_string()))
        );
    }

    #[test]
    fn welch_known_values() {
        // means 3 and 8, both variances 2.5: SE = 1, df = 1 / (2 · 0.25 / 4) = 8
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = independent_t_test(&a, &b).expect("should compute");
        assert!((r.t_statistic + 5.0).abs() < 1e-12);
        assert!((r.df - 8.0).abs() < 1e-12);
        assert!((r.standard_error - 1.0).abs() < 1e-12);
        assert!((r.cohens_d + 5.0 / 2.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(r.effect_magnitude, EffectMagnitude::Large);
        let (lo, hi) = r.confidence_interval;
        assert!((lo + 5.0 + 2.306).abs() < 1e-2, "lo = {lo}");
        assert!((hi + 5.0 - 2.306).abs() < 1e-2, "hi = {hi}");
        assert!(r.significant);
        assert!(r.p_value_one_tailed > 0.99);
    }

    #[test]
    fn welch_zero_variance_is_none() {
        assert!(independent_t_test(&[2.0, 2.0], &[3.0, 3.0]).is_none());
        assert!(independent_t_test(&[1.0], &[2.0, 3.0]).is_none());
        assert!(independent_t_test(&[1.0, f64::NAN], &[2.0, 3.0]).is_none());
    }

    #[test]
    fn one_sample_at_mean() {
        let r = one_sample_t_test(&[2.0, 4.0, 6.0, 8.0, 10.0], 6.0).expect("should compute");
        assert_eq!(r.t_statistic, 0.0);
        assert!((r.p_value - 1.0).abs() < 1e-12);
        assert!((r.p_value_one_tailed - 0.5).abs() < 1e-12);
        assert_eq!(r.df, 4.0);
        assert!(!r.significant);
    }

    #[test]
    fn one_sample_zero_variance_sentinel() {
        let r = one_sample_t_test(&[3.0, 3.0, 3.0], 1.0).expect("should compute");
        assert_eq!(r.t_statistic, f64::INFINITY);
        assert_eq!(r.p_value, 0.0);
        assert!(r.significant);

        let r = one_sample_t_test(&[3.0, 3.0, 3.0], 3.0).expect("should compute");
        assert_eq!(r.t_statistic, 0.0);
        assert_eq!(r.p_value, 1.0);
        assert!(!r.significant);
    }

    #[test]
    fn paired_consistent_increase() {
        let before = [5.0, 6.0, 7.0, 8.0, 9.0];
        let after = [5.5, 6.2, 7.1, 8.3, 9.4];
        let r = paired_t_test(&before, &after).expect("should compute");
        assert_eq!(r.kind, TTestKind::Paired);
        assert!(r.mean_difference < 0.0);
        assert!(r.significant, "p = {}", r.p_value);
        assert!(r.interpretation.contains("paired observations"));
    }

    #[test]
    fn paired_length_mismatch() {
        assert!(paired_t_test(&[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn dispatcher_requires_second_sample() {
        let a = [1.0, 2.0, 3.0];
        assert!(t_test(TTestKind::Independent, &a, None, 0.0).is_none());
        assert!(t_test(TTestKind::Paired, &a, None, 0.0).is_none());
        let r = t_test(TTestKind::OneSample, &a, None, 2.0).expect("should compute");
        assert_eq!(r.kind, TTestKind::OneSample);
    }

    // -----------------------------------------------------------------------
    // Confidence interval
    // -----------------------------------------------------------------------

    #[test]
    fn confidence_interval_95() {
        // s = √10, SE = √2, t(0.975; 4) ≈ 2.776
        let ci = confidence_interval(&[2.0, 4.0, 6.0, 8.0, 10.0], 95).expect("should compute");
        assert_eq!(ci.mean, 6.0);
        assert_eq!(ci.df, 4);
        assert!((ci.standard_error - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!((ci.t_critical - 2.776).abs() < 1e-3, "t = {}", ci.t_critical);
        assert!((ci.margin_of_error - 2.776 * 2.0_f64.sqrt()).abs() < 1e-2);
        assert!((ci.upper - ci.mean - ci.margin_of_error).abs() < 1e-12);
    }

    #[test]
    fn confidence_interval_narrows_with_level() {
        let data = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let wide = confidence_interval(&data, 99).expect("should compute");
        let narrow = confidence_interval(&data, 80).expect("should compute");
        assert!(wide.margin_of_error > narrow.margin_of_error);
    }

    #[test]
    fn confidence_interval_edge_cases() {
        assert!(confidence_interval(&[1.0], 95).is_none());
        assert!(confidence_interval(&[1.0, 2.0], 0).is_none());
        assert!(confidence_interval(&[1.0, 2.0], 100).is_none());
        assert!(confidence_interval(&[1.0, 2.0], 1).is_some());
    }

    // -----------------------------------------------------------------------
    // Chi-square
    // -----------------------------------------------------------------------

    #[test]
    fn independence_two_by_two() {
        // expected 15 everywhere: χ² = 4 · 25 / 15
        let table = vec![vec![10.0, 20.0], vec![20.0, 10.0]];
        let r = chi_square_independence(&table).expect("should compute");
        assert!((r.chi_square_statistic - 20.0 / 3.0).abs() < 1e-10);
        assert_eq!(r.expected, vec![vec![15.0, 15.0], vec![15.0, 15.0]]);
        assert_eq!(r.p_value, 0.01); // 6.635 < 6.667 < 10.828
        assert!(r.significant);
        assert!((r.cramers_v - (1.0_f64 / 9.0).sqrt()).abs() < 1e-10);
        assert_eq!(r.association, AssociationStrength::Moderate);
        assert_eq!(r.low_expected_cells, 0);
        assert!(!r.low_expected_warning);
    }

    #[test]
    fn independence_low_expected_flag() {
        let table = [[2.0, 3.0, 1.0], [1.0, 2.0, 8.0]];
        let r = chi_square_independence(&table).expect("should compute");
        assert_eq!(r.df, 2);
        assert!(r.low_expected_cells > 1);
        assert!(r.low_expected_warning);
    }

    #[test]
    fn independence_invalid_tables() {
        assert!(chi_square_independence(&[[1.0, 2.0]]).is_none());
        assert!(chi_square_independence(&[[1.0], [2.0]]).is_none());
        assert!(chi_square_independence(&[vec![1.0, 2.0], vec![3.0]]).is_none());
        assert!(chi_square_independence(&[[1.0, -2.0], [3.0, 4.0]]).is_none());
        assert!(chi_square_independence(&[[0.0, 2.0], [0.0, 4.0]]).is_none());
    }

    #[test]
    fn goodness_of_fit_uniform() {
        let r = chi_square_goodness_of_fit(&[10.0, 10.0, 10.0, 10.0], None).expect("should compute");
        assert_eq!(r.chi_square_statistic, 0.0);
        assert_eq!(r.p_value, 0.15);
        assert!(!r.significant);
    }

    #[test]
    fn goodness_of_fit_rescales_expected() {
        let observed = [30.0, 10.0, 10.0, 10.0];
        let uniform = chi_square_goodness_of_fit(&observed, None).expect("should compute");
        let props = chi_square_goodness_of_fit(&observed, Some(&[1.0, 1.0, 1.0, 1.0][..]))
            .expect("should compute");
        assert_eq!(props.expected, vec![15.0; 4]);
        assert!((uniform.chi_square_statistic - 20.0).abs() < 1e-10);
        assert!((props.chi_square_statistic - 20.0).abs() < 1e-10);
        assert_eq!(props.p_value, 0.001);
    }

    #[test]
    fn goodness_of_fit_invalid() {
        assert!(chi_square_goodness_of_fit(&[5.0], None).is_none());
        assert!(chi_square_goodness_of_fit(&[0.0, 0.0], None).is_none());
        assert!(chi_square_goodness_of_fit(&[1.0, 2.0], Some(&[1.0][..])).is_none());
        assert!(chi_square_goodness_of_fit(&[1.0, 2.0], Some(&[1.0, 0.0][..])).is_none());
    }
}
