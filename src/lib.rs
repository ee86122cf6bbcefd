//! # u-hypotest
//!
//! Hypothesis testing and descriptive analysis on in-memory samples.
//!
//! Every entry point is a pure function of its arguments: callers hand in
//! slices of `f64` (groups, paired samples, contingency tables, or a
//! single series) and receive an immutable, serializable result record.
//! Invalid input yields `None`; numerically degenerate input yields
//! explicit IEEE-754 sentinels (`+∞` statistics, `1.0` p-values) rather
//! than an error.
//!
//! ## Modules
//!
//! - [`distribution`] — Normal, t, F, and χ² p-value approximations; Tukey q table
//! - [`rank`] — Mid-rank assignment with tie averaging
//! - [`descriptive`] — Mean, variance, median, harmonic mean
//! - [`anova`] — One-way ANOVA, post-hoc (Tukey HSD, Bonferroni), two-way ANOVA
//! - [`variance`] — Homogeneity of variance (Levene/Brown-Forsythe, Bartlett)
//! - [`nonparametric`] — Kruskal-Wallis, Mann-Whitney U, Wilcoxon, Friedman
//! - [`testing`] — t-tests, confidence intervals, χ² tests
//! - [`timeseries`] — Linear trend, moving average, growth, seasonality
//!
//! ## Design Philosophy
//!
//! - **Stateless**: no caches, no shared mutable state between calls
//! - **Table-driven approximations**: χ² and Tukey p-values come from fixed
//!   critical-value tables, matching common statistical-software output
//! - **Explicit degenerate cases**: zero variance is a documented sentinel,
//!   never a panic

pub mod anova;
pub mod descriptive;
pub mod distribution;
pub mod error;
pub mod nonparametric;
pub mod rank;
pub mod testing;
pub mod timeseries;
pub mod variance;

pub use error::{Error, Result};

use serde::{Deserialize, Serialize};

/// Significance level α used by every test in the crate.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Magnitude class for proportion-of-variance effect sizes (η², ω², ε²).
///
/// Thresholds follow Cohen (1988): 0.01 small, 0.06 medium, 0.14 large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMagnitude {
    /// Below 0.01.
    Negligible,
    /// 0.01 to 0.06.
    Small,
    /// 0.06 to 0.14.
    Medium,
    /// 0.14 and above.
    Large,
}

impl EffectMagnitude {
    /// Classifies a variance-explained effect size.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_hypotest::EffectMagnitude;
    ///
    /// assert_eq!(EffectMagnitude::from_variance_explained(0.005), EffectMagnitude::Negligible);
    /// assert_eq!(EffectMagnitude::from_variance_explained(0.06), EffectMagnitude::Medium);
    /// assert_eq!(EffectMagnitude::from_variance_explained(0.5), EffectMagnitude::Large);
    /// ```
    pub fn from_variance_explained(value: f64) -> Self {
        if value < 0.01 {
            Self::Negligible
        } else if value < 0.06 {
            Self::Small
        } else if value < 0.14 {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// Classifies a correlation-type effect size r (Cohen: 0.1 / 0.3 / 0.5).
    pub fn from_correlation(r: f64) -> Self {
        let r = r.abs();
        if r < 0.1 {
            Self::Negligible
        } else if r < 0.3 {
            Self::Small
        } else if r < 0.5 {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// Classifies a standardized mean difference d (Cohen: 0.2 / 0.5 / 0.8).
    pub fn from_standardized_difference(d: f64) -> Self {
        let d = d.abs();
        if d < 0.2 {
            Self::Negligible
        } else if d < 0.5 {
            Self::Small
        } else if d < 0.8 {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// Lower-case label used in interpretation sentences.
    pub fn label(self) -> &'static str {
        match self {
            Self::Negligible => "negligible",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

pub(crate) fn is_significant(p_value: f64) -> bool {
    p_value < SIGNIFICANCE_LEVEL
}
