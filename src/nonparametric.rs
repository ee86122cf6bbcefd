//! Rank-based non-parametric tests.
//!
//! - [`kruskal_wallis_test`] — k independent groups (analogue of one-way ANOVA)
//! - [`mann_whitney_u_test`] — 2 independent groups (analogue of Student t)
//! - [`wilcoxon_signed_rank_test`] — paired samples (analogue of paired t)
//! - [`friedman_test`] — k repeated measures (analogue of RM-ANOVA)
//!
//! Every test ranks with [`rank_with_ties`](crate::rank::rank_with_ties)
//! and corrects for ties with Σ(t³ − t).
//!
//! # References
//!
//! - Kruskal & Wallis (1952). "Use of ranks in one-criterion variance
//!   analysis". JASA, 47(260), 583–621.
//! - Mann & Whitney (1947). "On a test of whether one of two random
//!   variables is stochastically larger than the other". Annals of
//!   Mathematical Statistics, 18(1), 50–60.
//! - Wilcoxon (1945). "Individual comparisons by ranking methods".
//!   Biometrics Bulletin, 1(6), 80–83.
//! - Friedman (1937). "The use of ranks to avoid the assumption of
//!   normality implicit in the analysis of variance". JASA, 32(200), 675–701.

use serde::{Deserialize, Serialize};

use crate::distribution::{chi_square_p_value, normal_p_value_two_tailed};
use crate::rank::{rank_with_ties, tie_correction};
use crate::{is_significant, EffectMagnitude};

// Both Mann-Whitney samples need at least this many observations before
// the continuity correction is applied.
const CONTINUITY_MIN_GROUP: usize = 8;

// ---------------------------------------------------------------------------
// Kruskal-Wallis
// ---------------------------------------------------------------------------

/// Result of the Kruskal-Wallis H test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KruskalWallisResult {
    /// Tie-corrected H statistic.
    pub h_statistic: f64,
    /// χ² p-value (table-based for df ≤ 5).
    pub p_value: f64,
    /// k − 1.
    pub df: usize,
    /// Total observations N.
    pub n_total: usize,
    /// Rank sum of each group.
    pub rank_sums: Vec<f64>,
    /// Mean rank of each group.
    pub mean_ranks: Vec<f64>,
    /// 1 − Σ(t³−t)/(N³−N); 1.0 without ties.
    pub tie_correction: f64,
    /// ε² = H / (N − 1).
    pub epsilon_squared: f64,
    /// Significant at α = 0.05.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// Kruskal-Wallis test: H₀: all groups come from the same distribution.
///
/// # Algorithm
///
/// H = [12 / (N(N+1))] Σ Rᵢ²/nᵢ − 3(N+1), divided by
/// 1 − Σ(t³−t)/(N³−N) when ties are present. df = k − 1.
///
/// Empty groups are dropped.
///
/// # Returns
///
/// `None` if fewer than 2 non-empty groups or non-finite values.
///
/// # Examples
///
/// ```
/// use u_hypotest::nonparametric::kruskal_wallis_test;
///
/// let r = kruskal_wallis_test(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]).unwrap();
/// assert!((r.h_statistic - 7.2).abs() < 1e-10);
/// assert_eq!(r.rank_sums, vec![6.0, 15.0, 24.0]);
/// ```
pub fn kruskal_wallis_test(groups: &[&[f64]]) -> Option<KruskalWallisResult> {
    if groups.iter().any(|g| g.iter().any(|v| !v.is_finite())) {
        return None;
    }
    let groups: Vec<&[f64]> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    if k < 2 {
        return None;
    }

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let ranks = rank_with_ties(&pooled);
    let n_total = pooled.len();
    let nf = n_total as f64;

    let mut rank_sums = Vec::with_capacity(k);
    let mut offset = 0;
    for g in &groups {
        rank_sums.push(ranks[offset..offset + g.len()].iter().sum::<f64>());
        offset += g.len();
    }

    let sum_term: f64 = groups
        .iter()
        .zip(rank_sums.iter())
        .map(|(g, &r)| r * r / g.len() as f64)
        .sum();
    let mut h = 12.0 / (nf * (nf + 1.0)) * sum_term - 3.0 * (nf + 1.0);

    let ties = tie_correction(&pooled);
    let mut factor = 1.0;
    if ties > 0.0 {
        factor = 1.0 - ties / (nf * nf * nf - nf);
        if factor > 0.0 {
            h /= factor;
        } else {
            tracing::debug!(factor, "Kruskal-Wallis: all values tied; correction skipped");
        }
    }
    let h = h.max(0.0);

    let df = k - 1;
    let p_value = chi_square_p_value(h, df as f64);
    let significant = is_significant(p_value);
    let mean_ranks = groups
        .iter()
        .zip(rank_sums.iter())
        .map(|(g, &r)| r / g.len() as f64)
        .collect();
    let epsilon_squared = if n_total > 1 { h / (nf - 1.0) } else { 0.0 };

    tracing::trace!(h, p_value, k, n_total, "Kruskal-Wallis");

    Some(KruskalWallisResult {
        h_statistic: h,
        p_value,
        df,
        n_total,
        rank_sums,
        mean_ranks,
        tie_correction: factor,
        epsilon_squared,
        significant,
        interpretation: if significant {
            "Significant difference in distributions between groups".to_string()
        } else {
            "No significant difference in distributions between groups".to_string()
        },
    })
}

// ---------------------------------------------------------------------------
// Mann-Whitney U
// ---------------------------------------------------------------------------

/// Result of the Mann-Whitney U test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyResult {
    /// U = min(U₁, U₂).
    pub u_statistic: f64,
    /// U₁ = n₁n₂ + n₁(n₁+1)/2 − R₁.
    pub u1: f64,
    /// U₂ = n₁n₂ − U₁.
    pub u2: f64,
    /// Rank sum of the first sample.
    pub rank_sum_1: f64,
    /// Rank sum of the second sample.
    pub rank_sum_2: f64,
    /// Normal-approximation z-score (≤ 0).
    pub z_score: f64,
    /// Two-tailed p-value.
    pub p_value: f64,
    /// r = |z| / √(n₁+n₂).
    pub effect_size: f64,
    /// Effect-size class of r.
    pub effect_magnitude: EffectMagnitude,
    /// Size of the first sample.
    pub n1: usize,
    /// Size of the second sample.
    pub n2: usize,
    /// Whether the ±0.5 continuity correction was applied.
    pub continuity_corrected: bool,
    /// `p_value < 0.05`.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// Mann-Whitney U test: H₀: both samples come from the same distribution.
///
/// # Algorithm
///
/// 1. Rank the pooled samples (mid-ranks for ties)
/// 2. U₁ = n₁n₂ + n₁(n₁+1)/2 − R₁, U₂ = n₁n₂ − U₁, U = min(U₁, U₂)
/// 3. z = (U − n₁n₂/2) / σ with
///    σ² = n₁n₂/12 · [(N+1) − Σ(t³−t)/(N(N−1))]
/// 4. When both n ≥ 8, |U − μ| is reduced by 0.5 (continuity correction)
///
/// A zero variance (every value tied) gives z = 0, p = 1.0.
///
/// # Returns
///
/// `None` if either sample is empty or contains non-finite values.
///
/// # Examples
///
/// ```
/// use u_hypotest::nonparametric::mann_whitney_u_test;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let b = [6.0, 7.0, 8.0, 9.0, 10.0];
/// let r = mann_whitney_u_test(&a, &b).unwrap();
/// assert_eq!(r.u_statistic, 0.0);
/// assert!(r.significant);
/// ```
pub fn mann_whitney_u_test(a: &[f64], b: &[f64]) -> Option<MannWhitneyResult> {
    let n1 = a.len();
    let n2 = b.len();
    if n1 == 0 || n2 == 0 {
        return None;
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    let ranks = rank_with_ties(&pooled);
    let rank_sum_1: f64 = ranks[..n1].iter().sum();
    let rank_sum_2: f64 = ranks[n1..].iter().sum();

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let nf = n1f + n2f;

    let u1 = n1f * n2f + n1f * (n1f + 1.0) / 2.0 - rank_sum_1;
    let u2 = n1f * n2f - u1;
    let u = u1.min(u2);

    let mu = n1f * n2f / 2.0;
    let ties = tie_correction(&pooled);
    let tie_term = if nf > 1.0 {
        ties / (nf * (nf - 1.0))
    } else {
        0.0
    };
    let sigma_sq = n1f * n2f / 12.0 * ((nf + 1.0) - tie_term);

    let continuity_corrected = n1 >= CONTINUITY_MIN_GROUP && n2 >= CONTINUITY_MIN_GROUP;
    let z_score = z_from_deviation(u - mu, sigma_sq, continuity_corrected);
    let p_value = if sigma_sq > 0.0 {
        normal_p_value_two_tailed(z_score)
    } else {
        tracing::debug!("Mann-Whitney: zero variance; all values tied");
        1.0
    };

    let effect_size = z_score.abs() / nf.sqrt();
    let effect_magnitude = EffectMagnitude::from_correlation(effect_size);
    let significant = is_significant(p_value);

    tracing::trace!(u, z_score, p_value, "Mann-Whitney U");

    Some(MannWhitneyResult {
        u_statistic: u,
        u1,
        u2,
        rank_sum_1,
        rank_sum_2,
        z_score,
        p_value,
        effect_size,
        effect_magnitude,
        n1,
        n2,
        continuity_corrected,
        significant,
        interpretation: if significant {
            format!(
                "Significant difference between the two distributions ({} effect size)",
                effect_magnitude.label()
            )
        } else {
            format!(
                "No significant difference between the two distributions ({} effect size)",
                effect_magnitude.label()
            )
        },
    })
}

// ---------------------------------------------------------------------------
// Wilcoxon signed-rank
// ---------------------------------------------------------------------------

/// Result of the Wilcoxon signed-rank test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WilcoxonResult {
    /// W = min(W⁺, W⁻).
    pub w_statistic: f64,
    /// Sum of ranks of positive differences.
    pub w_plus: f64,
    /// Sum of ranks of negative differences.
    pub w_minus: f64,
    /// Normal-approximation z-score (≤ 0).
    pub z_score: f64,
    /// Two-tailed p-value.
    pub p_value: f64,
    /// r = |z| / √n_effective.
    pub effect_size: f64,
    /// Effect-size class of r.
    pub effect_magnitude: EffectMagnitude,
    /// Number of non-zero differences.
    pub n_effective: usize,
    /// Number of zero differences dropped.
    pub n_zeros: usize,
    /// `p_value < 0.05`.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// Wilcoxon signed-rank test: H₀: the median paired difference is zero.
///
/// # Algorithm
///
/// 1. dᵢ = xᵢ − yᵢ; zero differences are dropped and counted
/// 2. Rank |dᵢ| with mid-ranks; W⁺, W⁻ are the signed rank sums
/// 3. W = min(W⁺, W⁻), μ = n(n+1)/4,
///    σ² = n(n+1)(2n+1)/24 − Σ(t³−t)/48
/// 4. z = (W − μ ± 0.5) / σ, the 0.5 moving toward zero
///
/// With no non-zero differences, returns W = 0, p = 1.0, n_effective = 0.
///
/// # Returns
///
/// `None` if the samples are empty, differ in length, or contain
/// non-finite values.
///
/// # Examples
///
/// ```
/// use u_hypotest::nonparametric::wilcoxon_signed_rank_test;
///
/// let same = [1.0, 2.0, 3.0];
/// let r = wilcoxon_signed_rank_test(&same, &same).unwrap();
/// assert_eq!(r.w_statistic, 0.0);
/// assert_eq!(r.p_value, 1.0);
/// assert_eq!(r.n_effective, 0);
/// ```
pub fn wilcoxon_signed_rank_test(x: &[f64], y: &[f64]) -> Option<WilcoxonResult> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let all_diffs: Vec<f64> = x.iter().zip(y.iter()).map(|(&a, &b)| a - b).collect();
    let diffs: Vec<f64> = all_diffs.iter().copied().filter(|&d| d != 0.0).collect();
    let n_zeros = all_diffs.len() - diffs.len();
    let n = diffs.len();

    if n == 0 {
        tracing::debug!(n_zeros, "Wilcoxon: no non-zero differences");
        return Some(WilcoxonResult {
            w_statistic: 0.0,
            w_plus: 0.0,
            w_minus: 0.0,
            z_score: 0.0,
            p_value: 1.0,
            effect_size: 0.0,
            effect_magnitude: EffectMagnitude::Negligible,
            n_effective: 0,
            n_zeros,
            significant: false,
            interpretation: "No differences between paired observations".to_string(),
        });
    }

    let abs_diffs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranks = rank_with_ties(&abs_diffs);
    let (w_plus, w_minus) = diffs
        .iter()
        .zip(ranks.iter())
        .fold((0.0, 0.0), |(plus, minus), (&d, &r)| {
            if d > 0.0 {
                (plus + r, minus)
            } else {
                (plus, minus + r)
            }
        });
    let w = w_plus.min(w_minus);

    let nf = n as f64;
    let mu = nf * (nf + 1.0) / 4.0;
    let sigma_sq = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_correction(&abs_diffs) / 48.0;

    let z_score = z_from_deviation(w - mu, sigma_sq, true);
    let p_value = if sigma_sq > 0.0 {
        normal_p_value_two_tailed(z_score)
    } else {
        1.0
    };
    let effect_size = z_score.abs() / nf.sqrt();
    let effect_magnitude = EffectMagnitude::from_correlation(effect_size);
    let significant = is_significant(p_value);

    tracing::trace!(w, z_score, p_value, n, "Wilcoxon signed-rank");

    Some(WilcoxonResult {
        w_statistic: w,
        w_plus,
        w_minus,
        z_score,
        p_value,
        effect_size,
        effect_magnitude,
        n_effective: n,
        n_zeros,
        significant,
        interpretation: if significant {
            format!(
                "Significant difference between paired observations ({} effect size)",
                effect_magnitude.label()
            )
        } else {
            format!(
                "No significant difference between paired observations ({} effect size)",
                effect_magnitude.label()
            )
        },
    })
}

// ---------------------------------------------------------------------------
// Friedman
// ---------------------------------------------------------------------------

/// Result of the Friedman test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriedmanResult {
    /// Tie-corrected χ² statistic.
    pub chi_square_statistic: f64,
    /// χ² p-value (table-based for df ≤ 5).
    pub p_value: f64,
    /// k − 1.
    pub df: usize,
    /// Number of subjects n.
    pub n_subjects: usize,
    /// Number of conditions k.
    pub n_conditions: usize,
    /// Rank sum Rⱼ of each condition.
    pub rank_sums: Vec<f64>,
    /// Mean rank of each condition.
    pub mean_ranks: Vec<f64>,
    /// Kendall's W = χ² / (n(k−1)).
    pub kendall_w: f64,
    /// Significant at α = 0.05.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// Friedman test: H₀: all conditions have the same distribution across
/// subjects.
///
/// `conditions[j][i]` is subject i's score under condition j.
///
/// # Algorithm
///
/// 1. Rank each subject's k scores (mid-ranks for ties)
/// 2. χ² = [12 / (nk(k+1))] Σ Rⱼ² − 3n(k+1)
/// 3. Divide by 1 − C/(nk(k²−1)), C = Σ over subjects of Σ(t³−t),
///    unless that factor is ≤ 0
///
/// # Returns
///
/// `None` if fewer than 3 conditions, conditions differ in length or are
/// empty, or values are non-finite.
///
/// # Examples
///
/// ```
/// use u_hypotest::nonparametric::friedman_test;
///
/// let c1 = [1.0, 1.0, 1.0, 1.0];
/// let c2 = [2.0, 2.0, 2.0, 2.0];
/// let c3 = [3.0, 3.0, 3.0, 3.0];
/// let r = friedman_test(&[&c1, &c2, &c3]).unwrap();
/// assert!((r.chi_square_statistic - 8.0).abs() < 1e-10);
/// assert!((r.kendall_w - 1.0).abs() < 1e-10);
/// ```
pub fn friedman_test(conditions: &[&[f64]]) -> Option<FriedmanResult> {
    let k = conditions.len();
    if k < 3 {
        return None;
    }
    let n = conditions[0].len();
    if n == 0 || conditions.iter().any(|c| c.len() != n) {
        return None;
    }
    if conditions.iter().any(|c| c.iter().any(|v| !v.is_finite())) {
        return None;
    }

    let mut rank_sums = vec![0.0; k];
    let mut ties = 0.0;
    let mut row = vec![0.0; k];
    for i in 0..n {
        for (slot, c) in row.iter_mut().zip(conditions.iter()) {
            *slot = c[i];
        }
        for (sum, r) in rank_sums.iter_mut().zip(rank_with_ties(&row)) {
            *sum += r;
        }
        ties += tie_correction(&row);
    }

    let nf = n as f64;
    let kf = k as f64;
    let sum_sq: f64 = rank_sums.iter().map(|r| r * r).sum();
    let mut chi2 = 12.0 / (nf * kf * (kf + 1.0)) * sum_sq - 3.0 * nf * (kf + 1.0);

    if ties > 0.0 {
        let factor = 1.0 - ties / (nf * kf * (kf * kf - 1.0));
        if factor > 0.0 {
            chi2 /= factor;
        } else {
            tracing::debug!(factor, "Friedman: every subject fully tied; correction skipped");
        }
    }
    let chi2 = chi2.max(0.0);

    let df = k - 1;
    let p_value = chi_square_p_value(chi2, df as f64);
    let significant = is_significant(p_value);
    let mean_ranks = rank_sums.iter().map(|r| r / nf).collect();
    let kendall_w = chi2 / (nf * (kf - 1.0));

    tracing::trace!(chi2, p_value, n, k, "Friedman");

    Some(FriedmanResult {
        chi_square_statistic: chi2,
        p_value,
        df,
        n_subjects: n,
        n_conditions: k,
        rank_sums,
        mean_ranks,
        kendall_w,
        significant,
        interpretation: if significant {
            "Significant difference between conditions across subjects".to_string()
        } else {
            "No significant difference between conditions across subjects".to_string()
        },
    })
}

// (statistic − mean) / σ, shrinking |deviation| by 0.5 when corrected.
fn z_from_deviation(deviation: f64, sigma_sq: f64, continuity: bool) -> f64 {
    if sigma_sq <= 0.0 {
        return 0.0;
    }
    let deviation = if continuity {
        deviation.signum() * (deviation.abs() - 0.5).max(0.0)
    } else {
        deviation
    };
    deviation / sigma_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Kruskal-Wallis
    // -----------------------------------------------------------------------

    #[test]
    fn kruskal_wallis_textbook() {
        // rank sums 6, 15, 24: H = 12/90 · (36+225+576)/3 − 30 = 7.2
        let r = kruskal_wallis_test(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]])
            .expect("should compute");
        assert!((r.h_statistic - 7.2).abs() < 1e-10);
        assert_eq!(r.df, 2);
        assert_eq!(r.tie_correction, 1.0);
        assert_eq!(r.mean_ranks, vec![2.0, 5.0, 8.0]);
        assert_eq!(r.p_value, 0.05); // 5.991 < 7.2 < 9.210
        // p = α is not below α
        assert!(!r.significant);
        assert!((r.epsilon_squared - 0.9).abs() < 1e-10);
    }

    #[test]
    fn kruskal_wallis_significance_is_strictly_below_alpha() {
        let at_alpha = kruskal_wallis_test(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]])
            .expect("should compute");
        assert_eq!(at_alpha.p_value, 0.05);
        assert_eq!(at_alpha.significant, at_alpha.p_value < 0.05);

        // H = 60.5 − 48 = 12.5 exceeds 9.210 at df = 2
        let below = kruskal_wallis_test(&[
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[6.0, 7.0, 8.0, 9.0, 10.0],
            &[11.0, 12.0, 13.0, 14.0, 15.0],
        ])
        .expect("should compute");
        assert_eq!(below.p_value, 0.01);
        assert!(below.significant);
    }

    #[test]
    fn kruskal_wallis_ties() {
        // pooled [1,1,2 | 2,3,3]: ranks [1.5,1.5,3.5 | 3.5,5.5,5.5]
        let r = kruskal_wallis_test(&[&[1.0, 1.0, 2.0], &[2.0, 3.0, 3.0]]).expect("should compute");
        assert_eq!(r.rank_sums, vec![6.5, 14.5]);
        let raw: f64 = 12.0 / 42.0 * (6.5 * 6.5 / 3.0 + 14.5 * 14.5 / 3.0) - 21.0;
        let factor = 1.0 - 18.0 / 210.0;
        assert!((r.tie_correction - factor).abs() < 1e-12);
        assert!((r.h_statistic - raw / factor).abs() < 1e-10);
    }

    #[test]
    fn kruskal_wallis_all_tied() {
        let r = kruskal_wallis_test(&[&[4.0, 4.0], &[4.0, 4.0, 4.0]]).expect("should compute");
        assert!(r.h_statistic.abs() < 1e-10);
        assert!(!r.significant);
    }

    #[test]
    fn kruskal_wallis_edge_cases() {
        assert!(kruskal_wallis_test(&[&[1.0, 2.0]]).is_none());
        assert!(kruskal_wallis_test(&[&[1.0, 2.0], &[]]).is_none());
        assert!(kruskal_wallis_test(&[&[1.0, f64::NAN], &[2.0]]).is_none());
    }

    // -----------------------------------------------------------------------
    // Mann-Whitney
    // -----------------------------------------------------------------------

    #[test]
    fn mann_whitney_separated_small() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = mann_whitney_u_test(&a, &b).expect("should compute");
        assert_eq!(r.rank_sum_1, 15.0);
        assert_eq!(r.rank_sum_2, 40.0);
        assert_eq!(r.u1, 25.0);
        assert_eq!(r.u2, 0.0);
        assert_eq!(r.u_statistic, 0.0);
        assert!(!r.continuity_corrected);
        // σ² = 25/12 · 11
        let z = -12.5 / (25.0_f64 / 12.0 * 11.0).sqrt();
        assert!((r.z_score - z).abs() < 1e-12);
        assert!((r.effect_size - z.abs() / 10.0_f64.sqrt()).abs() < 1e-12);
        assert!(r.p_value < 0.05);
    }

    #[test]
    fn mann_whitney_continuity_for_large_groups() {
        let a: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let b: Vec<f64> = (4..12).map(|i| i as f64).collect();
        let r = mann_whitney_u_test(&a, &b).expect("should compute");
        assert!(r.continuity_corrected);
        // ties at 4..7 (four pairs): Σ(t³−t) = 4·6 = 24
        let sigma_sq = 64.0 / 12.0 * (17.0 - 24.0 / 240.0);
        let expected = (r.u_statistic - 32.0 + 0.5) / f64::sqrt(sigma_sq);
        assert!((r.z_score - expected).abs() < 1e-12);
    }

    #[test]
    fn mann_whitney_all_tied() {
        let r = mann_whitney_u_test(&[3.0, 3.0], &[3.0, 3.0, 3.0]).expect("should compute");
        assert_eq!(r.z_score, 0.0);
        assert_eq!(r.p_value, 1.0);
        assert!(!r.significant);
    }

    #[test]
    fn mann_whitney_edge_cases() {
        assert!(mann_whitney_u_test(&[], &[1.0]).is_none());
        assert!(mann_whitney_u_test(&[1.0], &[f64::NAN]).is_none());
    }

    // -----------------------------------------------------------------------
    // Wilcoxon
    // -----------------------------------------------------------------------

    #[test]
    fn wilcoxon_all_zero_differences() {
        let x = [5.0, 6.0, 7.0];
        let r = wilcoxon_signed_rank_test(&x, &x).expect("should compute");
        assert_eq!(r.w_statistic, 0.0);
        assert_eq!(r.p_value, 1.0);
        assert!(!r.significant);
        assert_eq!(r.n_effective, 0);
        assert_eq!(r.n_zeros, 3);
    }

    #[test]
    fn wilcoxon_rank_sums() {
        // diffs: 1, -2, 3, 0, 4 → non-zero |d| ranks 1, 2, 3, 4
        let x = [2.0, 1.0, 6.0, 5.0, 9.0];
        let y = [1.0, 3.0, 3.0, 5.0, 5.0];
        let r = wilcoxon_signed_rank_test(&x, &y).expect("should compute");
        assert_eq!(r.n_zeros, 1);
        assert_eq!(r.n_effective, 4);
        assert_eq!(r.w_plus, 8.0);
        assert_eq!(r.w_minus, 2.0);
        assert_eq!(r.w_statistic, 2.0);
        // μ = 5, σ² = 4·5·9/24 = 7.5, corrected deviation −2.5
        assert!((r.z_score - (-2.5 / 7.5_f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn wilcoxon_consistent_shift() {
        let before = [5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0];
        let after = [6.1, 7.3, 8.2, 9.4, 10.5, 11.6, 12.7, 13.8, 14.9, 16.0];
        let r = wilcoxon_signed_rank_test(&after, &before).expect("should compute");
        assert_eq!(r.w_minus, 0.0);
        assert!(r.significant, "p = {}", r.p_value);
        assert_eq!(r.effect_magnitude, EffectMagnitude::Large);
    }

    #[test]
    fn wilcoxon_edge_cases() {
        assert!(wilcoxon_signed_rank_test(&[1.0, 2.0], &[1.0]).is_none());
        assert!(wilcoxon_signed_rank_test(&[], &[]).is_none());
    }

    // -----------------------------------------------------------------------
    // Friedman
    // -----------------------------------------------------------------------

    #[test]
    fn friedman_perfect_agreement() {
        let c1 = [1.0, 2.0, 3.0, 4.0];
        let c2 = [5.0, 6.0, 7.0, 8.0];
        let c3 = [9.0, 10.0, 11.0, 12.0];
        let r = friedman_test(&[&c1, &c2, &c3]).expect("should compute");
        assert_eq!(r.rank_sums, vec![4.0, 8.0, 12.0]);
        // 12/(4·3·4) · (16+64+144) − 3·4·4 = 56 − 48
        assert!((r.chi_square_statistic - 8.0).abs() < 1e-10);
        assert_eq!(r.p_value, 0.05);
        assert!(!r.significant);
        assert_eq!(r.significant, r.p_value < 0.05);
        assert_eq!(r.mean_ranks, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn friedman_more_subjects_reach_significance() {
        // same ordering over 6 subjects: χ² = 12 > 9.210 at df = 2
        let c1 = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let c2 = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let c3 = [13.0, 14.0, 15.0, 16.0, 17.0, 18.0];
        let r = friedman_test(&[&c1, &c2, &c3]).expect("should compute");
        assert!((r.chi_square_statistic - 12.0).abs() < 1e-10);
        assert_eq!(r.p_value, 0.01);
        assert!(r.significant);
    }

    #[test]
    fn friedman_tie_correction() {
        // subject 1 ties conditions 1 and 2
        let c1 = [1.0, 1.0, 2.0];
        let c2 = [1.0, 2.0, 1.0];
        let c3 = [3.0, 3.0, 3.0];
        let r = friedman_test(&[&c1, &c2, &c3]).expect("should compute");
        assert_eq!(r.rank_sums, vec![4.5, 4.5, 9.0]);
        let raw = 12.0 / 36.0 * (4.5 * 4.5 * 2.0 + 81.0) - 36.0;
        let factor = 1.0 - 6.0 / (3.0 * 3.0 * 8.0);
        assert!((r.chi_square_statistic - raw / factor).abs() < 1e-10);
    }

    #[test]
    fn friedman_fully_tied_subjects() {
        let c = [2.0, 2.0];
        let r = friedman_test(&[&c, &c, &c]).expect("should compute");
        assert!(r.chi_square_statistic.abs() < 1e-10);
        assert!(!r.significant);
    }

    #[test]
    fn friedman_edge_cases() {
        assert!(friedman_test(&[&[1.0, 2.0], &[2.0, 3.0]]).is_none());
        assert!(friedman_test(&[&[1.0, 2.0], &[2.0, 3.0], &[1.0]]).is_none());
        assert!(friedman_test(&[&[], &[], &[]]).is_none());
    }
}
