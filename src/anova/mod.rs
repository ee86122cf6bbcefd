//! Analysis of variance.
//!
//! # Methods
//!
//! - [`one_way_anova`] — Single-factor ANOVA with η² and ω² effect sizes
//! - [`tukey_hsd`] / [`bonferroni`] — Pairwise post-hoc comparisons
//!   driven by a one-way result's MS_within
//! - [`two_way_anova`] — Two-factor factorial ANOVA with interaction
//!
//! # References
//!
//! - Fisher, R.A. (1925). *Statistical Methods for Research Workers*.
//! - Tukey, J.W. (1949). "Comparing Individual Means in the Analysis of
//!   Variance", *Biometrics* 5(2), pp. 99-114.

mod one_way;
mod post_hoc;
mod two_way;

pub use one_way::{one_way_anova, OneWayAnova};
pub use post_hoc::{
    bonferroni, bonferroni_adjust, post_hoc, tukey_hsd, PairwiseComparison, PostHocMethod,
    PostHocResult,
};
pub use two_way::{two_way_anova, CellSummary, EffectTerm, ResidualTerm, TwoWayAnova};

// F = MS_effect / MS_error, with +∞ when only the denominator vanishes.
pub(crate) fn f_ratio(ms_effect: f64, ms_error: f64) -> f64 {
    if ms_error == 0.0 {
        if ms_effect != 0.0 {
            tracing::debug!(ms_effect, "zero error mean square; F = +inf");
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        ms_effect / ms_error
    }
}

// Drops empty groups, keeping each survivor's 1-based caller position.
// Returns None if any value is non-finite.
pub(crate) fn non_empty_groups<'a>(groups: &[&'a [f64]]) -> Option<Vec<(usize, &'a [f64])>> {
    let mut kept = Vec::with_capacity(groups.len());
    for (i, g) in groups.iter().enumerate() {
        if g.iter().any(|v| !v.is_finite()) {
            return None;
        }
        if !g.is_empty() {
            kept.push((i + 1, *g));
        }
    }
    Some(kept)
}
