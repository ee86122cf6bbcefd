//! Distribution approximations.
//!
//! p-value approximations for the standard normal, Student t, F, and χ²
//! distributions, plus critical-value tables for the studentized range
//! (Tukey q) and χ².
//!
//! These are deliberately approximations: χ² p-values for small integer
//! degrees of freedom come from a critical-value table, and Tukey p-values
//! are coarse bands relative to the tabulated critical value. Downstream
//! results depend on these exact values, so they are not refined with
//! incomplete beta/gamma integration.
//!
//! # Examples
//!
//! ```
//! use u_hypotest::distribution::{chi_square_p_value, normal_cdf, tukey_critical_value};
//!
//! assert!((normal_cdf(1.96) - 0.975).abs() < 1e-4);
//! assert_eq!(chi_square_p_value(7.2, 2.0), 0.05); // 5.991 < 7.2 < 9.210
//! assert_eq!(tukey_critical_value(3, 12.0), 3.877); // nearest df bucket is 10
//! ```

use std::f64::consts::{FRAC_2_PI, SQRT_2};

// ---------------------------------------------------------------------------
// Standard normal
// ---------------------------------------------------------------------------

/// Standard normal CDF Φ(z).
///
/// # Algorithm
///
/// Abramowitz & Stegun 26.2.17 polynomial approximation, absolute error
/// below 7.5e-8.
///
/// # References
///
/// Abramowitz & Stegun (1964). *Handbook of Mathematical Functions*, §26.2.
pub fn normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return 1.0;
    }
    if z == f64::NEG_INFINITY {
        return 0.0;
    }

    const P: f64 = 0.231_641_9;
    const B1: f64 = 0.319_381_530;
    const B2: f64 = -0.356_563_782;
    const B3: f64 = 1.781_477_937;
    const B4: f64 = -1.821_255_978;
    const B5: f64 = 1.330_274_429;

    let x = z.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));
    let pdf = (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt();
    let upper = (pdf * poly).clamp(0.0, 1.0);

    if z >= 0.0 {
        1.0 - upper
    } else {
        upper
    }
}

/// Two-tailed p-value for a standard normal z-score, `2(1 − Φ(|z|))`.
pub fn normal_p_value_two_tailed(z: f64) -> f64 {
    if z.is_nan() {
        return 1.0;
    }
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Student t
// ---------------------------------------------------------------------------

// Above this, t is evaluated through a normalizing transform.
const T_SERIES_MAX_DF: f64 = 1000.0;

/// Student t CDF, P(T ≤ t).
///
/// # Algorithm
///
/// For integer ν the closed-form trigonometric series of Abramowitz &
/// Stegun 26.7.3–26.7.4 is used. Fractional ν (Welch) interpolates
/// linearly between ⌊ν⌋ and ⌈ν⌉. For ν > 1000, the normalizing transform
/// z = t(1 − 1/(4ν)) / √(1 + t²/(2ν)) (A&S 26.7.8) is used instead.
///
/// `df < 1` is evaluated as `df = 1`; `df ≤ 0` or NaN returns 0.5.
///
/// # Examples
///
/// ```
/// use u_hypotest::distribution::t_cdf;
///
/// assert!((t_cdf(0.0, 5.0) - 0.5).abs() < 1e-12);
/// assert!((t_cdf(1.0, 1.0) - 0.75).abs() < 1e-12); // Cauchy
/// assert!((t_cdf(2.228, 10.0) - 0.975).abs() < 1e-3);
/// ```
pub fn t_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return 0.5;
    }
    let central = t_central_probability(t.abs(), df);
    if t >= 0.0 {
        0.5 + 0.5 * central
    } else {
        0.5 - 0.5 * central
    }
}

/// Two-tailed t p-value, P(|T| ≥ |t|).
///
/// Returns 1.0 for `df ≤ 0` or NaN input, 0.0 for infinite `t`.
pub fn t_p_value_two_tailed(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return 1.0;
    }
    (1.0 - t_central_probability(t.abs(), df)).clamp(0.0, 1.0)
}

/// One-tailed (upper) t p-value, P(T ≥ t).
///
/// Returns 1.0 for `df ≤ 0` or NaN input.
pub fn t_p_value_one_tailed(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return 1.0;
    }
    let tail = 0.5 * (1.0 - t_central_probability(t.abs(), df));
    let p = if t >= 0.0 { tail } else { 1.0 - tail };
    p.clamp(0.0, 1.0)
}

/// Student t quantile: the `t` with `t_cdf(t, df) = p`.
///
/// Solved by bisection on [`t_cdf`], so it is exactly consistent with the
/// CDF approximation used for p-values.
///
/// # Returns
///
/// `None` if `p` is outside (0, 1) or `df ≤ 0`.
///
/// # Examples
///
/// ```
/// use u_hypotest::distribution::t_quantile;
///
/// let t = t_quantile(0.975, 10.0).unwrap();
/// assert!((t - 2.228).abs() < 1e-3);
/// ```
pub fn t_quantile(p: f64, df: f64) -> Option<f64> {
    if !(p > 0.0 && p < 1.0) || df.is_nan() || df <= 0.0 {
        return None;
    }
    if p < 0.5 {
        return t_quantile(1.0 - p, df).map(|t| -t);
    }
    if p == 0.5 {
        return Some(0.0);
    }

    let mut hi = 1.0;
    while t_cdf(hi, df) < p && hi < 1e12 {
        hi *= 2.0;
    }
    let mut lo = 0.0;
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if t_cdf(mid, df) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-12 * hi.max(1.0) {
            break;
        }
    }
    Some(0.5 * (lo + hi))
}

// P(|T| < t) for t ≥ 0.
fn t_central_probability(t: f64, df: f64) -> f64 {
    if t == f64::INFINITY {
        return 1.0;
    }
    if df > T_SERIES_MAX_DF {
        let z = t * (1.0 - 1.0 / (4.0 * df)) / (1.0 + t * t / (2.0 * df)).sqrt();
        return (2.0 * normal_cdf(z) - 1.0).clamp(0.0, 1.0);
    }

    let df = df.max(1.0);
    let lower = df.floor();
    let frac = df - lower;
    let a = t_central_integer(t, lower as u64);
    if frac == 0.0 {
        return a;
    }
    let b = t_central_integer(t, lower as u64 + 1);
    a + frac * (b - a)
}

// A&S 26.7.3 (odd ν) and 26.7.4 (even ν).
fn t_central_integer(t: f64, nu: u64) -> f64 {
    let theta = (t / (nu as f64).sqrt()).atan();
    let s = theta.sin();
    let c = theta.cos();
    let c2 = c * c;

    let a = if nu % 2 == 1 {
        if nu == 1 {
            FRAC_2_PI * theta
        } else {
            let mut term = c;
            let mut sum = c;
            for i in 1..=(nu - 3) / 2 {
                let i = i as f64;
                term *= c2 * (2.0 * i) / (2.0 * i + 1.0);
                sum += term;
            }
            FRAC_2_PI * (theta + s * sum)
        }
    } else {
        let mut term = 1.0;
        let mut sum = 1.0;
        for i in 1..=(nu - 2) / 2 {
            let i = i as f64;
            term *= c2 * (2.0 * i - 1.0) / (2.0 * i);
            sum += term;
        }
        s * sum
    };
    a.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// F distribution
// ---------------------------------------------------------------------------

/// Upper-tail F p-value, P(F ≥ f).
///
/// # Algorithm
///
/// Paulson's normal approximation (A&S 26.6.15):
///
/// z = [(1 − 2/(9d₂)) f^{1/3} − (1 − 2/(9d₁))] / √(2/(9d₂) f^{2/3} + 2/(9d₁))
///
/// with the small-d₂ adjustment z(1 + 0.08 z⁴/d₂³) when d₂ < 3.
///
/// # Returns
///
/// 1.0 for `f ≤ 0`, NaN input, or non-positive degrees of freedom;
/// 0.0 for `f = +∞`.
///
/// # Examples
///
/// ```
/// use u_hypotest::distribution::f_p_value;
///
/// assert_eq!(f_p_value(0.0, 2.0, 12.0), 1.0);
/// assert_eq!(f_p_value(5.0, 2.0, 0.0), 1.0);
/// assert_eq!(f_p_value(f64::INFINITY, 2.0, 12.0), 0.0);
/// assert!((f_p_value(3.885, 2.0, 12.0) - 0.05).abs() < 0.01);
/// ```
pub fn f_p_value(f: f64, df1: f64, df2: f64) -> f64 {
    if !(f > 0.0) || !(df1 > 0.0) || !(df2 > 0.0) {
        return 1.0;
    }
    if f == f64::INFINITY {
        return 0.0;
    }

    let a = 2.0 / (9.0 * df1);
    let b = 2.0 / (9.0 * df2);
    let f13 = f.cbrt();
    let mut z = ((1.0 - b) * f13 - (1.0 - a)) / (b * f13 * f13 + a).sqrt();
    if df2 < 3.0 {
        z *= 1.0 + 0.08 * z.powi(4) / df2.powi(3);
    }
    (1.0 - normal_cdf(z)).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Chi-square
// ---------------------------------------------------------------------------

/// Significance levels of the χ² critical-value table columns.
pub const CHI_SQUARE_LEVELS: [f64; 4] = [0.10, 0.05, 0.01, 0.001];

/// χ² critical values for df = 1..=5 at the levels in [`CHI_SQUARE_LEVELS`].
pub const CHI_SQUARE_CRITICAL: [[f64; 4]; 5] = [
    [2.706, 3.841, 6.635, 10.828],
    [4.605, 5.991, 9.210, 13.816],
    [6.251, 7.815, 11.345, 16.266],
    [7.779, 9.488, 13.277, 18.467],
    [9.236, 11.070, 15.086, 20.515],
];

/// p-value reported when a tabulated statistic exceeds no critical value.
pub const CHI_SQUARE_ABOVE_TABLE_P: f64 = 0.15;

/// Upper-tail χ² p-value.
///
/// # Algorithm
///
/// For integer df in 1..=5, returns the smallest tabulated significance
/// level whose critical value the statistic exceeds, or
/// [`CHI_SQUARE_ABOVE_TABLE_P`] (meaning p > 0.10) when it exceeds none.
/// Other df use the Fisher normal approximation
/// z = √(2χ²) − √(2df − 1), p = 1 − Φ(z).
///
/// # Returns
///
/// 1.0 for NaN input or `df ≤ 0`.
///
/// # Examples
///
/// ```
/// use u_hypotest::distribution::chi_square_p_value;
///
/// assert_eq!(chi_square_p_value(11.0, 1.0), 0.001);
/// assert_eq!(chi_square_p_value(1.0, 1.0), 0.15);
/// let p = chi_square_p_value(18.307, 10.0); // 5% critical value for df = 10
/// assert!((p - 0.05).abs() < 0.02);
/// ```
pub fn chi_square_p_value(statistic: f64, df: f64) -> f64 {
    if statistic.is_nan() || df.is_nan() || df <= 0.0 {
        return 1.0;
    }

    if let Some(row) = chi_square_table_row(df) {
        return row
            .iter()
            .zip(CHI_SQUARE_LEVELS.iter())
            .rev()
            .find(|(&critical, _)| statistic > critical)
            .map_or(CHI_SQUARE_ABOVE_TABLE_P, |(_, &level)| level);
    }

    if statistic == f64::INFINITY {
        return 0.0;
    }
    let z = (2.0 * statistic.max(0.0)).sqrt() - (2.0 * df - 1.0).max(0.0).sqrt();
    (1.0 - normal_cdf(z)).clamp(0.0, 1.0)
}

fn chi_square_table_row(df: f64) -> Option<&'static [f64; 4]> {
    if df.fract() != 0.0 || !(1.0..=5.0).contains(&df) {
        return None;
    }
    CHI_SQUARE_CRITICAL.get(df as usize - 1)
}

// ---------------------------------------------------------------------------
// Studentized range (Tukey q)
// ---------------------------------------------------------------------------

/// Error-df buckets of the Tukey table columns; the last is df = ∞.
pub const TUKEY_DF_BUCKETS: [f64; 6] = [10.0, 20.0, 30.0, 60.0, 120.0, f64::INFINITY];

/// Finite df at or above which the ∞ column is selected.
pub const TUKEY_INFINITE_DF_CUTOFF: f64 = 240.0;

/// Studentized range critical values q(0.05; k, df) for k = 3..=10.
pub const TUKEY_Q_05: [[f64; 6]; 8] = [
    [3.877, 3.578, 3.486, 3.399, 3.356, 3.314],
    [4.327, 3.958, 3.845, 3.737, 3.685, 3.633],
    [4.654, 4.232, 4.102, 3.977, 3.917, 3.858],
    [4.912, 4.445, 4.302, 4.163, 4.096, 4.030],
    [5.124, 4.620, 4.464, 4.314, 4.241, 4.170],
    [5.305, 4.768, 4.602, 4.441, 4.363, 4.286],
    [5.461, 4.896, 4.720, 4.550, 4.468, 4.387],
    [5.599, 5.008, 4.824, 4.646, 4.560, 4.474],
];

/// Tukey HSD critical value q(0.05; k, df).
///
/// The df column is the bucket nearest to `df` by absolute difference
/// (ties resolve to the smaller bucket); `df ≥ 240` selects the ∞ column.
/// Group counts outside 3..=10 use a synthesized row: for k ≤ 2,
/// `√2 · t(0.975, bucket df)`; for k > 10, linear extrapolation of the
/// k = 9 → 10 step.
pub fn tukey_critical_value(k: usize, df: f64) -> f64 {
    let col = tukey_df_column(df);
    tukey_row(k)[col]
}

/// Coarse Tukey p-value from the ratio q / q_crit.
///
/// | ratio | p |
/// |---|---|
/// | ≥ 1.5 | 0.001 |
/// | ≥ 1.2 | 0.01 |
/// | ≥ 1.0 | 0.05 |
/// | ≥ 0.9 | 0.10 |
/// | ≥ 0.8 | 0.15 |
/// | otherwise | 0.20 |
///
/// Returns 1.0 when the critical value is not positive or `q` is NaN.
///
/// # Examples
///
/// ```
/// use u_hypotest::distribution::tukey_p_value;
///
/// assert_eq!(tukey_p_value(6.0, 3.5), 0.001);
/// assert_eq!(tukey_p_value(3.6, 3.5), 0.05);
/// assert_eq!(tukey_p_value(1.0, 3.5), 0.20);
/// ```
pub fn tukey_p_value(q: f64, critical: f64) -> f64 {
    if q.is_nan() || !(critical > 0.0) {
        return 1.0;
    }
    let ratio = q / critical;
    if ratio >= 1.5 {
        0.001
    } else if ratio >= 1.2 {
        0.01
    } else if ratio >= 1.0 {
        0.05
    } else if ratio >= 0.9 {
        0.10
    } else if ratio >= 0.8 {
        0.15
    } else {
        0.20
    }
}

fn tukey_df_column(df: f64) -> usize {
    if df.is_nan() || df >= TUKEY_INFINITE_DF_CUTOFF {
        return TUKEY_DF_BUCKETS.len() - 1;
    }
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &bucket) in TUKEY_DF_BUCKETS[..TUKEY_DF_BUCKETS.len() - 1]
        .iter()
        .enumerate()
    {
        let dist = (df - bucket).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

fn tukey_row(k: usize) -> [f64; 6] {
    match k {
        3..=10 => TUKEY_Q_05[k - 3],
        0..=2 => {
            let mut row = [0.0; 6];
            for (q, &df) in row.iter_mut().zip(TUKEY_DF_BUCKETS.iter()) {
                let t = t_quantile(0.975, df).unwrap_or(1.959_964);
                *q = SQRT_2 * t;
            }
            row
        }
        _ => {
            let last = TUKEY_Q_05[7];
            let prev = TUKEY_Q_05[6];
            let steps = (k - 10) as f64;
            let mut row = [0.0; 6];
            for (i, q) in row.iter_mut().enumerate() {
                *q = last[i] + steps * (last[i] - prev[i]);
            }
            row
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Normal
    // -----------------------------------------------------------------------

    #[test]
    fn normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.0) - 0.841_344_7).abs() < 1e-6);
        assert!((normal_cdf(-1.0) - 0.158_655_3).abs() < 1e-6);
        assert!((normal_cdf(2.575_829) - 0.995).abs() < 1e-6);
        assert_eq!(normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(normal_cdf(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn normal_two_tailed() {
        assert!((normal_p_value_two_tailed(1.959_964) - 0.05).abs() < 1e-6);
        assert!((normal_p_value_two_tailed(-1.959_964) - 0.05).abs() < 1e-6);
        assert!((normal_p_value_two_tailed(0.0) - 1.0).abs() < 1e-6);
    }

    // -----------------------------------------------------------------------
    // Student t
    // -----------------------------------------------------------------------

    #[test]
    fn t_cdf_known_quantiles() {
        // t(0.975; df) from standard tables
        let cases = [(1.0, 12.706), (2.0, 4.303), (5.0, 2.571), (30.0, 2.042)];
        for (df, t) in cases {
            let c = t_cdf(t, df);
            assert!((c - 0.975).abs() < 5e-4, "df = {df}: cdf = {c}");
        }
    }

    #[test]
    fn t_cdf_large_df_approaches_normal() {
        let c = t_cdf(1.96, 5000.0);
        assert!((c - normal_cdf(1.96)).abs() < 1e-3);
    }

    #[test]
    fn t_cdf_fractional_df_is_between_neighbours() {
        let lo = t_cdf(2.0, 4.0);
        let hi = t_cdf(2.0, 5.0);
        let mid = t_cdf(2.0, 4.5);
        assert!(mid >= lo.min(hi) && mid <= lo.max(hi));
    }

    #[test]
    fn t_p_values() {
        assert!((t_p_value_two_tailed(2.228, 10.0) - 0.05).abs() < 1e-3);
        assert!((t_p_value_one_tailed(1.812, 10.0) - 0.05).abs() < 1e-3);
        assert!((t_p_value_one_tailed(-1.812, 10.0) - 0.95).abs() < 1e-3);
        assert_eq!(t_p_value_two_tailed(f64::INFINITY, 10.0), 0.0);
        assert_eq!(t_p_value_two_tailed(3.0, 0.0), 1.0);
    }

    #[test]
    fn t_quantile_inverts_cdf() {
        for &df in &[1.0, 3.0, 7.5, 29.0, 200.0] {
            for &p in &[0.6, 0.9, 0.975, 0.995] {
                let t = t_quantile(p, df).expect("valid");
                assert!((t_cdf(t, df) - p).abs() < 1e-9, "df = {df}, p = {p}");
            }
        }
        assert!(t_quantile(0.0, 5.0).is_none());
        assert!(t_quantile(0.5, 0.0).is_none());
        let lower = t_quantile(0.025, 10.0).expect("valid");
        assert!((lower + 2.228).abs() < 1e-3);
    }

    // -----------------------------------------------------------------------
    // F
    // -----------------------------------------------------------------------

    #[test]
    fn f_p_value_degenerate() {
        assert_eq!(f_p_value(-1.0, 2.0, 10.0), 1.0);
        assert_eq!(f_p_value(f64::NAN, 2.0, 10.0), 1.0);
        assert_eq!(f_p_value(2.0, 0.0, 10.0), 1.0);
        assert_eq!(f_p_value(2.0, 2.0, -1.0), 1.0);
    }

    #[test]
    fn f_p_value_near_critical() {
        // F(0.05; 1, 10) = 4.965, F(0.01; 3, 20) = 4.938
        assert!((f_p_value(4.965, 1.0, 10.0) - 0.05).abs() < 0.01);
        assert!((f_p_value(4.938, 3.0, 20.0) - 0.01).abs() < 0.005);
    }

    #[test]
    fn f_p_value_monotone_in_f() {
        let mut prev = 1.0;
        for i in 1..50 {
            let p = f_p_value(i as f64 * 0.5, 3.0, 15.0);
            assert!(p <= prev + 1e-12);
            prev = p;
        }
    }

    // -----------------------------------------------------------------------
    // Chi-square
    // -----------------------------------------------------------------------

    #[test]
    fn chi_square_table_bands() {
        assert_eq!(chi_square_p_value(2.0, 1.0), 0.15);
        assert_eq!(chi_square_p_value(3.0, 1.0), 0.10);
        assert_eq!(chi_square_p_value(4.0, 1.0), 0.05);
        assert_eq!(chi_square_p_value(7.0, 1.0), 0.01);
        assert_eq!(chi_square_p_value(21.0, 5.0), 0.001);
        // exactly at a critical value does not exceed it
        assert_eq!(chi_square_p_value(5.991, 2.0), 0.10);
        assert_eq!(chi_square_p_value(f64::INFINITY, 3.0), 0.001);
    }

    #[test]
    fn chi_square_fallback() {
        let p = chi_square_p_value(0.0, 8.0);
        assert!(p > 0.99, "p = {p}");
        assert_eq!(chi_square_p_value(f64::INFINITY, 8.0), 0.0);
        // fractional df never uses the table
        let p = chi_square_p_value(3.0, 2.5);
        assert!(p > 0.1 && p < 0.6, "p = {p}");
        assert_eq!(chi_square_p_value(3.0, 0.0), 1.0);
    }

    // -----------------------------------------------------------------------
    // Tukey
    // -----------------------------------------------------------------------

    #[test]
    fn tukey_nearest_bucket() {
        assert_eq!(tukey_critical_value(4, 10.0), 4.327);
        assert_eq!(tukey_critical_value(4, 24.0), 3.958);
        assert_eq!(tukey_critical_value(4, 26.0), 3.845);
        assert_eq!(tukey_critical_value(4, 15.0), 4.327); // tie → smaller df
        assert_eq!(tukey_critical_value(4, 100.0), 3.685);
        assert_eq!(tukey_critical_value(4, 5000.0), 3.633);
        assert_eq!(tukey_critical_value(10, 2.0), 5.599);
    }

    #[test]
    fn tukey_synthesized_rows() {
        // k = 2: q = √2 · t(0.975, df)
        let q = tukey_critical_value(2, 10.0);
        assert!((q - 3.151).abs() < 2e-3, "q = {q}");
        let q = tukey_critical_value(2, f64::INFINITY);
        assert!((q - 2.772).abs() < 2e-3, "q = {q}");
        // k > 10 extrapolates upward
        assert!(tukey_critical_value(12, 20.0) > tukey_critical_value(10, 20.0));
    }

    #[test]
    fn tukey_bands() {
        let crit = 4.0;
        assert_eq!(tukey_p_value(6.0, crit), 0.001);
        assert_eq!(tukey_p_value(5.0, crit), 0.01);
        assert_eq!(tukey_p_value(4.0, crit), 0.05);
        assert_eq!(tukey_p_value(3.7, crit), 0.10);
        assert_eq!(tukey_p_value(3.3, crit), 0.15);
        assert_eq!(tukey_p_value(0.0, crit), 0.20);
        assert_eq!(tukey_p_value(f64::INFINITY, crit), 0.001);
        assert_eq!(tukey_p_value(2.0, 0.0), 1.0);
    }
}
