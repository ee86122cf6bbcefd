//! One-way ANOVA.
//!
//! # Algorithm
//!
//! ```text
//! SS_between = Σ nᵢ (x̄ᵢ − x̄)²        df_between = k − 1
//! SS_within  = Σᵢ Σⱼ (xᵢⱼ − x̄ᵢ)²      df_within  = N − k
//! F = MS_between / MS_within
//! η² = SS_between / SS_total
//! ω² = (SS_between − df_between·MS_within) / (SS_between + (df_total + 1)·MS_within)
//! ```
//!
//! ω² is clamped at 0.

use serde::{Deserialize, Serialize};

use super::{f_ratio, non_empty_groups};
use crate::descriptive::{mean, sum_of_squares};
use crate::distribution::f_p_value;
use crate::{is_significant, EffectMagnitude};

/// Result of one-way ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneWayAnova {
    /// F-statistic; `+∞` when MS_within is zero and MS_between is not.
    pub f_statistic: f64,
    /// Upper-tail p-value of F.
    pub p_value: f64,
    /// Degrees of freedom between groups (k − 1).
    pub df_between: usize,
    /// Degrees of freedom within groups (N − k).
    pub df_within: usize,
    /// Total degrees of freedom (N − 1).
    pub df_total: usize,
    /// Sum of squares between groups.
    pub ss_between: f64,
    /// Sum of squares within groups.
    pub ss_within: f64,
    /// Total sum of squares about the grand mean.
    pub ss_total: f64,
    /// Mean square between.
    pub ms_between: f64,
    /// Mean square within (0 when df_within is 0).
    pub ms_within: f64,
    /// η² = SS_between / SS_total.
    pub eta_squared: f64,
    /// ω², clamped at 0.
    pub omega_squared: f64,
    /// Effect-size class of η².
    pub effect_size: EffectMagnitude,
    /// Group means, in caller order with empty groups removed.
    pub group_means: Vec<f64>,
    /// Group sizes matching `group_means`.
    pub group_sizes: Vec<usize>,
    /// Grand mean of all observations.
    pub grand_mean: f64,
    /// `p_value < 0.05`.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// One-way ANOVA: H₀: all group means are equal.
///
/// Empty groups are dropped before analysis.
///
/// # Returns
///
/// `None` if fewer than 2 non-empty groups remain or any value is
/// non-finite.
///
/// # Examples
///
/// ```
/// use u_hypotest::anova::one_way_anova;
///
/// let group1 = [5.0, 6.0, 7.0, 5.5, 6.5];
/// let group2 = [8.0, 9.0, 8.5, 9.5, 8.0];
/// let group3 = [4.0, 3.0, 3.5, 4.5, 4.0];
/// let r = one_way_anova(&[&group1, &group2, &group3]).unwrap();
/// assert!(r.significant);
/// assert_eq!(r.df_between, 2);
/// assert_eq!(r.df_within, 12);
/// ```
pub fn one_way_anova(groups: &[&[f64]]) -> Option<OneWayAnova> {
    let groups: Vec<&[f64]> = non_empty_groups(groups)?
        .into_iter()
        .map(|(_, g)| g)
        .collect();
    let k = groups.len();
    if k < 2 {
        return None;
    }

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let total_n = pooled.len();
    let grand_mean = mean(&pooled)?;
    let ss_total = sum_of_squares(&pooled)?;

    let group_sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    let group_means = groups
        .iter()
        .map(|g| mean(g))
        .collect::<Option<Vec<f64>>>()?;

    let ss_between: f64 = group_sizes
        .iter()
        .zip(group_means.iter())
        .map(|(&n, &m)| n as f64 * (m - grand_mean).powi(2))
        .sum();

    let mut ss_within = 0.0;
    for g in &groups {
        ss_within += sum_of_squares(g)?;
    }

    let df_between = k - 1;
    let df_within = total_n - k;
    let df_total = total_n - 1;

    let ms_between = ss_between / df_between as f64;
    let ms_within = if df_within > 0 {
        ss_within / df_within as f64
    } else {
        0.0
    };

    let f_statistic = f_ratio(ms_between, ms_within);
    let p_value = f_p_value(f_statistic, df_between as f64, df_within as f64);

    let eta_squared = if ss_total > 0.0 {
        ss_between / ss_total
    } else {
        0.0
    };

    let omega_denom = ss_between + (df_total as f64 + 1.0) * ms_within;
    let omega_squared = if omega_denom > 0.0 {
        ((ss_between - df_between as f64 * ms_within) / omega_denom).max(0.0)
    } else {
        0.0
    };

    let effect_size = EffectMagnitude::from_variance_explained(eta_squared);
    let significant = is_significant(p_value);
    let interpretation = interpret(significant, effect_size);

    tracing::trace!(f_statistic, p_value, k, total_n, "one-way ANOVA");

    Some(OneWayAnova {
        f_statistic,
        p_value,
        df_between,
        df_within,
        df_total,
        ss_between,
        ss_within,
        ss_total,
        ms_between,
        ms_within,
        eta_squared,
        omega_squared,
        effect_size,
        group_means,
        group_sizes,
        grand_mean,
        significant,
        interpretation,
    })
}

fn interpret(significant: bool, effect: EffectMagnitude) -> String {
    if significant {
        format!(
            "Significant difference between group means ({} effect size)",
            effect.label()
        )
    } else {
        format!(
            "No significant difference between group means ({} effect size)",
            effect.label()
        )
    }
}
