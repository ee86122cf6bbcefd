//! Post-hoc pairwise comparisons after one-way ANOVA.
//!
//! Both methods compare every unordered pair of non-empty groups (i < j)
//! and label groups by their 1-based position in the caller's slice.
//!
//! - **Tukey HSD**: q = |x̄ᵢ − x̄ⱼ| / √(MS_within / ñ), where ñ is the
//!   harmonic mean of all group sizes. Significant when q exceeds the
//!   tabulated q(0.05; k, df_within).
//! - **Bonferroni**: pooled-variance t-test per pair, then every p-value is
//!   multiplied by the number of comparisons (capped at 1). Significance is
//!   judged on the adjusted p-value only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{non_empty_groups, OneWayAnova};
use crate::descriptive::{self, harmonic_mean};
use crate::distribution::{t_p_value_two_tailed, tukey_critical_value, tukey_p_value};
use crate::error::{Error, Result};
use crate::is_significant;

const NOT_SIGNIFICANT_WARNING: &str =
    "ANOVA was not significant; pairwise differences should be interpreted with caution";

/// Post-hoc comparison method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostHocMethod {
    /// Tukey's honestly significant difference.
    Tukey,
    /// Bonferroni-adjusted pairwise t-tests.
    Bonferroni,
}

impl fmt::Display for PostHocMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tukey => write!(f, "Tukey HSD"),
            Self::Bonferroni => write!(f, "Bonferroni"),
        }
    }
}

impl FromStr for PostHocMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tukey" | "tukey_hsd" | "tukey-hsd" | "hsd" => Ok(Self::Tukey),
            "bonferroni" => Ok(Self::Bonferroni),
            _ => Err(Error::UnknownPostHocMethod(s.to_string())),
        }
    }
}

/// One pairwise comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    /// 1-based caller position of the first group.
    pub group_a: usize,
    /// 1-based caller position of the second group.
    pub group_b: usize,
    /// Mean of group a.
    pub mean_a: f64,
    /// Mean of group b.
    pub mean_b: f64,
    /// mean_a − mean_b.
    pub mean_difference: f64,
    /// Standard error used for the statistic.
    pub standard_error: f64,
    /// q (Tukey) or t (Bonferroni).
    pub statistic: f64,
    /// Tukey band p-value, or unadjusted two-tailed t p-value.
    pub p_value: f64,
    /// Bonferroni-adjusted p-value; `None` for Tukey.
    pub adjusted_p_value: Option<f64>,
    /// Tukey: q > q_crit. Bonferroni: adjusted p < 0.05.
    pub significant: bool,
    /// Tukey simultaneous interval for the difference; `None` for Bonferroni.
    pub confidence_interval: Option<(f64, f64)>,
}

/// Result of a post-hoc analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostHocResult {
    /// Method used.
    pub method: PostHocMethod,
    /// Pairwise comparisons in (i, j) lexicographic order.
    pub comparisons: Vec<PairwiseComparison>,
    /// MS_within taken from the ANOVA.
    pub ms_within: f64,
    /// df_within taken from the ANOVA.
    pub df_within: usize,
    /// Tukey critical q; `None` for Bonferroni.
    pub critical_value: Option<f64>,
    /// Set when the parent ANOVA was not significant.
    pub warning: Option<String>,
}

impl PostHocResult {
    /// Number of comparisons flagged significant.
    pub fn significant_count(&self) -> usize {
        self.comparisons.iter().filter(|c| c.significant).count()
    }
}

/// Runs the chosen post-hoc method.
///
/// # Examples
///
/// ```
/// use u_hypotest::anova::{one_way_anova, post_hoc, PostHocMethod};
///
/// let g1 = [1.0, 2.0, 3.0];
/// let g2 = [4.0, 5.0, 6.0];
/// let g3 = [7.0, 8.0, 9.0];
/// let groups: [&[f64]; 3] = [&g1, &g2, &g3];
/// let anova = one_way_anova(&groups).unwrap();
///
/// let method: PostHocMethod = "bonferroni".parse().unwrap();
/// let r = post_hoc(&groups, &anova, method).unwrap();
/// assert_eq!(r.comparisons.len(), 3);
/// assert!(r.warning.is_none());
/// ```
pub fn post_hoc(
    groups: &[&[f64]],
    anova: &OneWayAnova,
    method: PostHocMethod,
) -> Option<PostHocResult> {
    match method {
        PostHocMethod::Tukey => tukey_hsd(groups, anova),
        PostHocMethod::Bonferroni => bonferroni(groups, anova),
    }
}

/// Tukey HSD pairwise comparisons.
///
/// # Returns
///
/// `None` if fewer than 2 non-empty groups, a non-finite value, or the
/// groups do not match the ANOVA's group count.
pub fn tukey_hsd(groups: &[&[f64]], anova: &OneWayAnova) -> Option<PostHocResult> {
    let summaries = summarize(groups, anova)?;
    let k = summaries.len();
    let sizes: Vec<usize> = summaries.iter().map(|s| s.n).collect();
    let n_h = harmonic_mean(&sizes)?;

    let se = (anova.ms_within / n_h).sqrt();
    let critical = tukey_critical_value(k, anova.df_within as f64);

    let mut comparisons = Vec::with_capacity(k * (k - 1) / 2);
    for (i, a) in summaries.iter().enumerate() {
        for b in &summaries[i + 1..] {
            let diff = a.mean - b.mean;
            let q = studentized(diff.abs(), se);
            let margin = critical * se;
            comparisons.push(PairwiseComparison {
                group_a: a.label,
                group_b: b.label,
                mean_a: a.mean,
                mean_b: b.mean,
                mean_difference: diff,
                standard_error: se,
                statistic: q,
                p_value: tukey_p_value(q, critical),
                adjusted_p_value: None,
                significant: q > critical,
                confidence_interval: Some((diff - margin, diff + margin)),
            });
        }
    }

    tracing::trace!(k, critical, n_h, "Tukey HSD");

    Some(PostHocResult {
        method: PostHocMethod::Tukey,
        comparisons,
        ms_within: anova.ms_within,
        df_within: anova.df_within,
        critical_value: Some(critical),
        warning: warning_for(anova),
    })
}

/// Bonferroni-corrected pairwise t-tests.
///
/// Each pair uses the pooled variance s²ₚ = ((nᵢ−1)s²ᵢ + (nⱼ−1)s²ⱼ)/(nᵢ+nⱼ−2)
/// with df = nᵢ + nⱼ − 2. Adjusted p-values come from
/// [`bonferroni_adjust`] once every pair has been computed.
///
/// # Returns
///
/// `None` under the same conditions as [`tukey_hsd`].
pub fn bonferroni(groups: &[&[f64]], anova: &OneWayAnova) -> Option<PostHocResult> {
    let summaries = summarize(groups, anova)?;
    let k = summaries.len();

    let mut comparisons = Vec::with_capacity(k * (k - 1) / 2);
    for (i, a) in summaries.iter().enumerate() {
        for b in &summaries[i + 1..] {
            let diff = a.mean - b.mean;
            let df = a.n + b.n - 2;
            let pooled = if df > 0 {
                ((a.n as f64 - 1.0) * a.variance + (b.n as f64 - 1.0) * b.variance) / df as f64
            } else {
                0.0
            };
            let se = (pooled * (1.0 / a.n as f64 + 1.0 / b.n as f64)).sqrt();
            let t = studentized(diff, se);
            comparisons.push(PairwiseComparison {
                group_a: a.label,
                group_b: b.label,
                mean_a: a.mean,
                mean_b: b.mean,
                mean_difference: diff,
                standard_error: se,
                statistic: t,
                p_value: t_p_value_two_tailed(t, df as f64),
                adjusted_p_value: None,
                significant: false,
                confidence_interval: None,
            });
        }
    }

    let raw: Vec<f64> = comparisons.iter().map(|c| c.p_value).collect();
    for (c, adjusted) in comparisons.iter_mut().zip(bonferroni_adjust(&raw)) {
        c.adjusted_p_value = Some(adjusted);
        c.significant = is_significant(adjusted);
    }

    Some(PostHocResult {
        method: PostHocMethod::Bonferroni,
        comparisons,
        ms_within: anova.ms_within,
        df_within: anova.df_within,
        critical_value: None,
        warning: warning_for(anova),
    })
}

/// Bonferroni adjustment: `min(p × m, 1)` where m is the number of p-values.
///
/// # Examples
///
/// ```
/// use u_hypotest::anova::bonferroni_adjust;
///
/// let adj = bonferroni_adjust(&[0.01, 0.02, 0.03]);
/// assert!((adj[0] - 0.03).abs() < 1e-12);
/// assert!((adj[2] - 0.09).abs() < 1e-12);
/// assert_eq!(bonferroni_adjust(&[0.4, 0.5, 0.6]), vec![1.0, 1.0, 1.0]);
/// ```
pub fn bonferroni_adjust(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len() as f64;
    p_values.iter().map(|&p| (p * m).min(1.0)).collect()
}

struct GroupSummary {
    label: usize,
    n: usize,
    mean: f64,
    variance: f64,
}

fn summarize(groups: &[&[f64]], anova: &OneWayAnova) -> Option<Vec<GroupSummary>> {
    let kept = non_empty_groups(groups)?;
    if kept.len() < 2 || kept.len() != anova.group_means.len() {
        return None;
    }
    kept.into_iter()
        .map(|(label, g)| {
            let n = g.len();
            let variance = if n > 1 { descriptive::variance(g)? } else { 0.0 };
            Some(GroupSummary {
                label,
                n,
                mean: descriptive::mean(g)?,
                variance,
            })
        })
        .collect()
}

// diff / se, with the zero-SE sentinel of ±∞ (or 0 when diff is 0).
fn studentized(diff: f64, se: f64) -> f64 {
    if se > 0.0 {
        diff / se
    } else if diff == 0.0 {
        0.0
    } else {
        tracing::debug!(diff, "zero standard error in pairwise comparison");
        diff.signum() * f64::INFINITY
    }
}

fn warning_for(anova: &OneWayAnova) -> Option<String> {
    (!anova.significant).then(|| NOT_SIGNIFICANT_WARNING.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anova::one_way_anova;

    fn three_groups() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        )
    }

    // -----------------------------------------------------------------------
    // Tukey HSD
    // -----------------------------------------------------------------------

    #[test]
    fn tukey_balanced() {
        let (g1, g2, g3) = three_groups();
        let groups: [&[f64]; 3] = [&g1, &g2, &g3];
        let anova = one_way_anova(&groups).expect("anova");
        let r = tukey_hsd(&groups, &anova).expect("tukey");

        // MS_within = 1, n = 3 → SE = 1/√3; df_within = 6 → bucket 10
        let se = (1.0_f64 / 3.0).sqrt();
        assert_eq!(r.critical_value, Some(3.877));
        assert_eq!(r.comparisons.len(), 3);

        let c = &r.comparisons[0];
        assert_eq!((c.group_a, c.group_b), (1, 2));
        assert!((c.mean_difference + 3.0).abs() < 1e-12);
        assert!((c.standard_error - se).abs() < 1e-12);
        assert!((c.statistic - 3.0 / se).abs() < 1e-9);
        assert!(c.significant); // q ≈ 5.196 > 3.877
        assert_eq!(c.p_value, 0.01); // ratio ≈ 1.34

        let (lo, hi) = c.confidence_interval.expect("interval");
        assert!((lo - (-3.0 - 3.877 * se)).abs() < 1e-9);
        assert!((hi - (-3.0 + 3.877 * se)).abs() < 1e-9);

        let far = &r.comparisons[1];
        assert_eq!((far.group_a, far.group_b), (1, 3));
        assert_eq!(far.p_value, 0.001);
        assert!(r.warning.is_none());
    }

    #[test]
    fn tukey_labels_skip_empty_groups() {
        let (g1, g2, _) = three_groups();
        let empty: Vec<f64> = Vec::new();
        let groups: [&[f64]; 3] = [&g1, &empty, &g2];
        let anova = one_way_anova(&groups).expect("anova");
        let r = tukey_hsd(&groups, &anova).expect("tukey");
        assert_eq!(r.comparisons.len(), 1);
        assert_eq!((r.comparisons[0].group_a, r.comparisons[0].group_b), (1, 3));
    }

    #[test]
    fn mean_differences_follow_group_means() {
        let g1 = [0.1, 0.2, 0.3, 0.7];
        let g2 = [1.1, 1.9, 2.3];
        let g3 = [4.4];
        let groups: [&[f64]; 3] = [&g1, &g2, &g3];
        let anova = one_way_anova(&groups).expect("anova");
        let r = bonferroni(&groups, &anova).expect("bonferroni");
        let m = &anova.group_means;
        assert_eq!(r.comparisons[0].mean_difference, m[0] - m[1]);
        assert_eq!(r.comparisons[1].mean_difference, m[0] - m[2]);
        assert_eq!(r.comparisons[2].mean_difference, m[1] - m[2]);
    }

    #[test]
    fn tukey_mismatched_groups() {
        let (g1, g2, g3) = three_groups();
        let anova = one_way_anova(&[&g1, &g2]).expect("anova");
        assert!(tukey_hsd(&[&g1, &g2, &g3], &anova).is_none());
    }

    // -----------------------------------------------------------------------
    // Bonferroni
    // -----------------------------------------------------------------------

    #[test]
    fn bonferroni_adjusts_after_all_pairs() {
        let (g1, g2, g3) = three_groups();
        let groups: [&[f64]; 3] = [&g1, &g2, &g3];
        let anova = one_way_anova(&groups).expect("anova");
        let r = bonferroni(&groups, &anova).expect("bonferroni");

        for c in &r.comparisons {
            let adj = c.adjusted_p_value.expect("adjusted");
            assert!((adj - (c.p_value * 3.0).min(1.0)).abs() < 1e-15);
            assert_eq!(c.significant, adj < 0.05);
            assert!(c.confidence_interval.is_none());
        }

        // pooled variance 1, SE = √(2/3), df = 4
        let c = &r.comparisons[0];
        assert!((c.statistic - (-3.0 / (2.0_f64 / 3.0).sqrt())).abs() < 1e-9);
    }

    #[test]
    fn bonferroni_adjust_caps_at_one() {
        let adj = bonferroni_adjust(&[0.01, 0.02, 0.03]);
        let expected = [0.03, 0.06, 0.09];
        for (a, e) in adj.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-12, "{a} vs {e}");
        }
        assert_eq!(bonferroni_adjust(&[0.2, 0.3, 0.5, 0.9]), vec![0.8, 1.0, 1.0, 1.0]);
        assert!(bonferroni_adjust(&[]).is_empty());
    }

    #[test]
    fn warning_when_anova_not_significant() {
        let g1 = [5.0, 5.1, 4.9, 5.0];
        let g2 = [5.0, 5.2, 4.8, 5.0];
        let groups: [&[f64]; 2] = [&g1, &g2];
        let anova = one_way_anova(&groups).expect("anova");
        assert!(!anova.significant);
        let r = post_hoc(&groups, &anova, PostHocMethod::Tukey).expect("tukey");
        assert!(r.warning.is_some());
        let r = post_hoc(&groups, &anova, PostHocMethod::Bonferroni).expect("bonferroni");
        assert!(r.warning.is_some());
        assert_eq!(r.significant_count(), 0);
    }

    #[test]
    fn zero_variance_pairs() {
        let g1 = [2.0, 2.0, 2.0];
        let g2 = [5.0, 5.0, 5.0];
        let groups: [&[f64]; 2] = [&g1, &g2];
        let anova = one_way_anova(&groups).expect("anova");
        let r = bonferroni(&groups, &anova).expect("bonferroni");
        let c = &r.comparisons[0];
        assert_eq!(c.statistic, f64::NEG_INFINITY);
        assert_eq!(c.p_value, 0.0);
        assert!(c.significant);

        let r = tukey_hsd(&groups, &anova).expect("tukey");
        assert!(r.comparisons[0].statistic.is_infinite());
        assert!(r.comparisons[0].significant);
    }

    #[test]
    fn method_parsing() {
        assert_eq!("Tukey".parse::<PostHocMethod>(), Ok(PostHocMethod::Tukey));
        assert_eq!(" bonferroni ".parse::<PostHocMethod>(), Ok(PostHocMethod::Bonferroni));
        assert_eq!(
            "scheffe".parse::<PostHocMethod>(),
            Err(Error::UnknownPostHocMethod("scheffe".into()))
        );
        assert_eq!(PostHocMethod::Tukey.to_string(), "Tukey HSD");
    }
}
