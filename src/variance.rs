//! Homogeneity-of-variance tests.
//!
//! - [`levene_test`]: Brown-Forsythe variant (median-centred), robust to
//!   non-normality
//! - [`bartlett_test`]: likelihood-ratio test, assumes normality
//!
//! # Examples
//!
//! ```
//! use u_hypotest::variance::{bartlett_test, levene_test};
//!
//! let tight = [4.9, 5.0, 5.0, 5.1, 5.0];
//! let wide = [0.0, 3.0, 5.0, 7.0, 10.0];
//! assert!(levene_test(&[&tight, &wide]).unwrap().significant);
//! assert!(bartlett_test(&[&tight, &wide]).unwrap().significant);
//! ```
//!
//! # References
//!
//! - Levene (1960). "Robust tests for equality of variances". In
//!   Olkin (Ed.), Contributions to Probability and Statistics.
//! - Brown & Forsythe (1974). "Robust tests for the equality of variances".
//!   JASA, 69(346), 364–367.
//! - Bartlett (1937). "Properties of sufficiency and statistical tests".
//!   Proceedings of the Royal Society A, 160(901), 268–282.

use serde::{Deserialize, Serialize};

use crate::anova::one_way_anova;
use crate::descriptive::{median, variance};
use crate::distribution::chi_square_p_value;
use crate::is_significant;

/// Result of Levene's test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeveneResult {
    /// F-statistic of the ANOVA on absolute median deviations.
    pub f_statistic: f64,
    /// Upper-tail p-value.
    pub p_value: f64,
    /// k − 1.
    pub df_between: usize,
    /// N − k.
    pub df_within: usize,
    /// `p_value < 0.05`.
    pub significant: bool,
    /// Homogeneity reading of the result.
    pub interpretation: String,
}

/// Result of Bartlett's test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BartlettResult {
    /// Corrected χ² statistic.
    pub chi_square_statistic: f64,
    /// p-value (table-based for df ≤ 5).
    pub p_value: f64,
    /// k − 1.
    pub df: usize,
    /// Σ(nᵢ−1)s²ᵢ / (N−k).
    pub pooled_variance: f64,
    /// Sample variance of each group.
    pub group_variances: Vec<f64>,
    /// Significant at α = 0.05.
    pub significant: bool,
    /// Homogeneity reading of the result.
    pub interpretation: String,
}

/// Levene (Brown-Forsythe) test: H₀: all groups have equal variance.
///
/// # Algorithm
///
/// 1. zᵢⱼ = |xᵢⱼ − median(groupᵢ)|
/// 2. One-way ANOVA on the zᵢⱼ
///
/// Empty groups are dropped.
///
/// # Returns
///
/// `None` if fewer than 2 non-empty groups or non-finite values.
pub fn levene_test(groups: &[&[f64]]) -> Option<LeveneResult> {
    if groups.iter().any(|g| g.iter().any(|v| !v.is_finite())) {
        return None;
    }
    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .filter(|g| !g.is_empty())
        .map(|g| {
            let m = median(g).unwrap_or(0.0);
            g.iter().map(|&x| (x - m).abs()).collect()
        })
        .collect();
    let refs: Vec<&[f64]> = deviations.iter().map(Vec::as_slice).collect();
    let anova = one_way_anova(&refs)?;

    let significant = is_significant(anova.p_value);
    Some(LeveneResult {
        f_statistic: anova.f_statistic,
        p_value: anova.p_value,
        df_between: anova.df_between,
        df_within: anova.df_within,
        significant,
        interpretation: interpret(significant),
    })
}

/// Bartlett test: H₀: all groups have equal variance.
///
/// # Algorithm
///
/// 1. s²ₚ = Σ(nᵢ−1)s²ᵢ / (N−k)
/// 2. Numerator: (N−k) ln s²ₚ − Σ(nᵢ−1) ln s²ᵢ
/// 3. C = 1 + [Σ 1/(nᵢ−1) − 1/(N−k)] / (3(k−1))
/// 4. χ² = numerator / C, df = k − 1
///
/// When the pooled variance is 0 or every group variance is 0, returns
/// χ² = 0, p = 1.0, not significant. A single zero-variance group among
/// varying groups makes ln s²ᵢ = −∞ and χ² = +∞.
///
/// Empty groups are dropped.
///
/// # Returns
///
/// `None` if fewer than 2 non-empty groups, any group has a single
/// observation, or non-finite values.
pub fn bartlett_test(groups: &[&[f64]]) -> Option<BartlettResult> {
    let mut sizes = Vec::with_capacity(groups.len());
    let mut vars = Vec::with_capacity(groups.len());
    for g in groups.iter().filter(|g| !g.is_empty()) {
        // None for single observations or non-finite values
        vars.push(variance(g)?);
        sizes.push(g.len());
    }

    let k = sizes.len();
    if k < 2 {
        return None;
    }
    let n_total: usize = sizes.iter().sum();
    let nk = (n_total - k) as f64;
    let df = k - 1;

    let pooled_variance: f64 = sizes
        .iter()
        .zip(vars.iter())
        .map(|(&n, &v)| (n as f64 - 1.0) * v)
        .sum::<f64>()
        / nk;

    if pooled_variance <= 0.0 || vars.iter().all(|&v| v <= 0.0) {
        tracing::debug!(pooled_variance, "Bartlett: no variance to compare");
        return Some(BartlettResult {
            chi_square_statistic: 0.0,
            p_value: 1.0,
            df,
            pooled_variance,
            group_variances: vars,
            significant: false,
            interpretation: interpret(false),
        });
    }

    let numerator = nk * pooled_variance.ln()
        - sizes
            .iter()
            .zip(vars.iter())
            .map(|(&n, &v)| (n as f64 - 1.0) * v.ln())
            .sum::<f64>();

    let sum_recip: f64 = sizes.iter().map(|&n| 1.0 / (n as f64 - 1.0)).sum();
    let correction = 1.0 + (sum_recip - 1.0 / nk) / (3.0 * df as f64);

    let chi_square_statistic = numerator / correction;
    let p_value = chi_square_p_value(chi_square_statistic, df as f64);
    let significant = is_significant(p_value);

    tracing::trace!(chi_square_statistic, p_value, k, "Bartlett test");

    Some(BartlettResult {
        chi_square_statistic,
        p_value,
        df,
        pooled_variance,
        group_variances: vars,
        significant,
        interpretation: interpret(significant),
    })
}

fn interpret(significant: bool) -> String {
    if significant {
        "Variances differ significantly between groups (homogeneity of variance rejected)"
            .to_string()
    } else {
        "No significant difference in variances (homogeneity of variance holds)".to_string()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bartlett_p_bounded(
            g1 in proptest::collection::vec(0.1_f64..100.0, 3..=15),
            g2 in proptest::collection::vec(0.1_f64..100.0, 3..=15),
        ) {
            let r = bartlett_test(&[&g1, &g2]).expect("valid input");
            prop_assert!((0.0..=1.0).contains(&r.p_value), "p = {}", r.p_value);
            prop_assert!(r.chi_square_statistic >= -1e-9, "T = {}", r.chi_square_statistic);
        }

        #[test]
        fn levene_p_bounded(
            g1 in proptest::collection::vec(-1e3_f64..1e3, 2..=15),
            g2 in proptest::collection::vec(-1e3_f64..1e3, 2..=15),
        ) {
            let r = levene_test(&[&g1, &g2]).expect("valid input");
            prop_assert!((0.0..=1.0).contains(&r.p_value), "p = {}", r.p_value);
            prop_assert!(r.f_statistic >= 0.0);
        }
    }
}
