//! Two-way factorial ANOVA.
//!
//! # Algorithm
//!
//! Observations are grouped into cells keyed by (level A, level B).
//!
//! ```text
//! SS_A     = Σₐ nₐ (x̄ₐ − x̄)²
//! SS_B     = Σ_b n_b (x̄_b − x̄)²
//! SS_AB    = Σ_cells n_ab (x̄_ab − x̄ₐ − x̄_b + x̄)²
//! SS_error = SS_total − SS_A − SS_B − SS_AB
//! df_error = N − a·b
//! ```
//!
//! Empty cells contribute nothing to SS_AB. df_error always subtracts the
//! full a·b grid, so a design with empty cells loses error df for cells it
//! never observed; when N ≤ a·b the error term is empty (df 0, MS 0) and
//! every p-value is 1.0. For unbalanced designs the subtraction can go
//! slightly negative, and SS_error is clamped at 0.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::f_ratio;
use crate::distribution::f_p_value;
use crate::is_significant;

/// One effect row of the ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectTerm {
    /// Sum of squares.
    pub ss: f64,
    /// Degrees of freedom.
    pub df: usize,
    /// Mean square.
    pub ms: f64,
    /// F = MS / MS_error (`+∞` when MS_error is zero and MS is not).
    pub f_statistic: f64,
    /// Upper-tail p-value of F.
    pub p_value: f64,
    /// Partial η² = SS / (SS + SS_error).
    pub partial_eta_squared: f64,
    /// `p_value < 0.05`.
    pub significant: bool,
}

/// Error (residual) row of the ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualTerm {
    /// Sum of squares.
    pub ss: f64,
    /// N − a·b, saturating at 0.
    pub df: usize,
    /// SS / df, or 0 when df is 0.
    pub ms: f64,
}

/// Mean of one (A, B) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSummary {
    /// Factor A level.
    pub level_a: String,
    /// Factor B level.
    pub level_b: String,
    /// Observations in the cell.
    pub n: usize,
    /// Cell mean.
    pub mean: f64,
}

/// Result of two-way ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoWayAnova {
    /// Main effect of factor A.
    pub factor_a: EffectTerm,
    /// Main effect of factor B.
    pub factor_b: EffectTerm,
    /// A×B interaction.
    pub interaction: EffectTerm,
    /// Error term.
    pub error: ResidualTerm,
    /// Total sum of squares.
    pub ss_total: f64,
    /// N − 1.
    pub df_total: usize,
    /// Grand mean.
    pub grand_mean: f64,
    /// Distinct levels of factor A, sorted.
    pub levels_a: Vec<String>,
    /// Distinct levels of factor B, sorted.
    pub levels_b: Vec<String>,
    /// Observed cells in (A, B) order.
    pub cells: Vec<CellSummary>,
    /// Number of (A, B) combinations with no observations.
    pub empty_cells: usize,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

/// Two-way ANOVA over a factorial design.
///
/// `factor_a[i]`, `factor_b[i]` and `values[i]` describe observation i.
///
/// # Returns
///
/// `None` if the three slices differ in length or are empty, a value is
/// non-finite, or either factor has fewer than 2 distinct levels.
///
/// # Examples
///
/// ```
/// use u_hypotest::anova::two_way_anova;
///
/// let a = ["lo", "lo", "lo", "lo", "hi", "hi", "hi", "hi"];
/// let b = ["x", "x", "y", "y", "x", "x", "y", "y"];
/// let v = [1.0, 3.0, 5.0, 7.0, 3.0, 5.0, 7.0, 9.0];
/// let r = two_way_anova(&a, &b, &v).unwrap();
/// assert!((r.factor_b.f_statistic - 16.0).abs() < 1e-10);
/// assert_eq!(r.error.df, 4);
/// ```
pub fn two_way_anova<S: AsRef<str>>(
    factor_a: &[S],
    factor_b: &[S],
    values: &[f64],
) -> Option<TwoWayAnova> {
    let n = values.len();
    if n == 0 || factor_a.len() != n || factor_b.len() != n {
        return None;
    }
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let levels_a: BTreeSet<&str> = factor_a.iter().map(AsRef::as_ref).collect();
    let levels_b: BTreeSet<&str> = factor_b.iter().map(AsRef::as_ref).collect();
    if levels_a.len() < 2 || levels_b.len() < 2 {
        return None;
    }

    let mut cells: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
    for ((a, b), &v) in factor_a.iter().zip(factor_b.iter()).zip(values.iter()) {
        cells.entry((a.as_ref(), b.as_ref())).or_default().push(v);
    }

    let grand_mean = values.iter().sum::<f64>() / n as f64;
    let marginal_a = marginal_means(factor_a, values);
    let marginal_b = marginal_means(factor_b, values);

    let ss_a = marginal_ss(&marginal_a, grand_mean);
    let ss_b = marginal_ss(&marginal_b, grand_mean);

    let mut ss_ab = 0.0;
    let mut summaries = Vec::with_capacity(cells.len());
    for (&(a, b), cell) in &cells {
        let count = cell.len();
        let mean = cell.iter().sum::<f64>() / count as f64;
        let (_, mean_a) = marginal_a[a];
        let (_, mean_b) = marginal_b[b];
        ss_ab += count as f64 * (mean - mean_a - mean_b + grand_mean).powi(2);
        summaries.push(CellSummary {
            level_a: a.to_string(),
            level_b: b.to_string(),
            n: count,
            mean,
        });
    }

    let grid = levels_a.len() * levels_b.len();
    let empty_cells = grid - cells.len();
    if empty_cells > 0 {
        tracing::debug!(empty_cells, grid, "two-way design has empty cells");
    }

    let ss_total: f64 = values.iter().map(|&x| (x - grand_mean).powi(2)).sum();
    let ss_error = (ss_total - ss_a - ss_b - ss_ab).max(0.0);

    let df_a = levels_a.len() - 1;
    let df_b = levels_b.len() - 1;
    let df_ab = df_a * df_b;
    let df_error = n.saturating_sub(grid);
    let ms_error = if df_error > 0 {
        ss_error / df_error as f64
    } else {
        0.0
    };

    let factor_a = effect_term(ss_a, df_a, ss_error, ms_error, df_error);
    let factor_b = effect_term(ss_b, df_b, ss_error, ms_error, df_error);
    let interaction = effect_term(ss_ab, df_ab, ss_error, ms_error, df_error);
    let interpretation = interpret(&factor_a, &factor_b, &interaction);

    tracing::trace!(
        f_a = factor_a.f_statistic,
        f_b = factor_b.f_statistic,
        f_ab = interaction.f_statistic,
        "two-way ANOVA"
    );

    Some(TwoWayAnova {
        factor_a,
        factor_b,
        interaction,
        error: ResidualTerm {
            ss: ss_error,
            df: df_error,
            ms: ms_error,
        },
        ss_total,
        df_total: n - 1,
        grand_mean,
        levels_a: levels_a.into_iter().map(str::to_string).collect(),
        levels_b: levels_b.into_iter().map(str::to_string).collect(),
        cells: summaries,
        empty_cells,
        interpretation,
    })
}

// level → (count, mean)
fn marginal_means<'a, S: AsRef<str>>(
    levels: &'a [S],
    values: &[f64],
) -> BTreeMap<&'a str, (usize, f64)> {
    let mut sums: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for (level, &v) in levels.iter().zip(values.iter()) {
        let entry = sums.entry(level.as_ref()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += v;
    }
    sums.into_iter()
        .map(|(level, (count, sum))| (level, (count, sum / count as f64)))
        .collect()
}

fn marginal_ss(marginal: &BTreeMap<&str, (usize, f64)>, grand_mean: f64) -> f64 {
    marginal
        .values()
        .map(|&(count, mean)| count as f64 * (mean - grand_mean).powi(2))
        .sum()
}

fn effect_term(ss: f64, df: usize, ss_error: f64, ms_error: f64, df_error: usize) -> EffectTerm {
    let ms = if df > 0 { ss / df as f64 } else { 0.0 };
    let f_statistic = f_ratio(ms, ms_error);
    let p_value = f_p_value(f_statistic, df as f64, df_error as f64);
    let partial_denom = ss + ss_error;
    let partial_eta_squared = if partial_denom > 0.0 {
        ss / partial_denom
    } else {
        0.0
    };
    EffectTerm {
        ss,
        df,
        ms,
        f_statistic,
        p_value,
        partial_eta_squared,
        significant: is_significant(p_value),
    }
}

fn interpret(a: &EffectTerm, b: &EffectTerm, ab: &EffectTerm) -> String {
    let found: Vec<&str> = [
        (a.significant, "main effect of factor A"),
        (b.significant, "main effect of factor B"),
        (ab.significant, "A×B interaction"),
    ]
    .iter()
    .filter(|(sig, _)| *sig)
    .map(|&(_, name)| name)
    .collect();

    if found.is_empty() {
        "No significant main or interaction effects".to_string()
    } else {
        format!("Significant {}", found.join(", "))
    }
}
