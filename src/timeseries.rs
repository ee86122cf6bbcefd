//! Time-series summaries on an ordered series.
//!
//! Values are assumed equally spaced; the index 0..n−1 is the time axis.
//!
//! - [`linear_trend`]: least-squares slope, intercept, R², direction
//! - [`moving_average`]: trailing fixed-window means
//! - [`growth_rates`], [`cagr`], [`average_growth_rate`]: percentage growth
//! - [`seasonal_decomposition`]: phase averages, centered trend, strength
//! - [`SeasonalityDetector`]: picks the strongest candidate period

use serde::{Deserialize, Serialize};

use crate::descriptive::{mean, population_variance};

/// Slopes within ±this are reported as [`TrendDirection::Stable`].
pub const TREND_STABLE_THRESHOLD: f64 = 0.01;

/// Candidate periods tried by [`SeasonalityDetector::default`].
pub const DEFAULT_SEASONAL_PERIODS: [usize; 5] = [2, 3, 4, 6, 12];

/// Minimum strength for [`SeasonalityDetector::default`] to report a period.
pub const DEFAULT_MIN_SEASONAL_STRENGTH: f64 = 0.1;

// ---------------------------------------------------------------------------
// Linear trend
// ---------------------------------------------------------------------------

/// Direction of a fitted trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// slope > 0.01.
    Increasing,
    /// slope < −0.01.
    Decreasing,
    /// |slope| ≤ 0.01.
    Stable,
}

impl TrendDirection {
    fn from_slope(slope: f64) -> Self {
        if slope > TREND_STABLE_THRESHOLD {
            Self::Increasing
        } else if slope < -TREND_STABLE_THRESHOLD {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

/// Least-squares trend line over the series index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    /// Change per step.
    pub slope: f64,
    /// Fitted value at index 0.
    pub intercept: f64,
    /// Coefficient of determination; 1.0 for a constant series.
    pub r_squared: f64,
    /// Direction label of `slope`.
    pub direction: TrendDirection,
    /// Number of points.
    pub n: usize,
}

/// Fits y = intercept + slope · i for i = 0..n−1.
///
/// # Returns
///
/// `None` if fewer than 2 values or any value is non-finite.
///
/// # Examples
///
/// ```
/// use u_hypotest::timeseries::{linear_trend, TrendDirection};
///
/// let t = linear_trend(&[1.0, 3.0, 5.0, 7.0]).unwrap();
/// assert!((t.slope - 2.0).abs() < 1e-12);
/// assert!((t.intercept - 1.0).abs() < 1e-12);
/// assert_eq!(t.direction, TrendDirection::Increasing);
/// ```
pub fn linear_trend(values: &[f64]) -> Option<LinearTrend> {
    let n = values.len();
    if n < 2 || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values)?;

    let (sxy, sxx) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
            let dx = i as f64 - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });
    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let ss_tot: f64 = values.iter().map(|&y| (y - y_mean).powi(2)).sum();
    let r_squared = if ss_tot > 0.0 {
        let ss_res: f64 = values
            .iter()
            .enumerate()
            .map(|(i, &y)| (y - (intercept + slope * i as f64)).powi(2))
            .sum();
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some(LinearTrend {
        slope,
        intercept,
        r_squared,
        direction: TrendDirection::from_slope(slope),
        n,
    })
}

// ---------------------------------------------------------------------------
// Moving average
// ---------------------------------------------------------------------------

/// Means of every contiguous window of `window` values.
///
/// Produces `len − window + 1` values.
///
/// # Returns
///
/// `None` if `window` is 0 or exceeds the series length, or any value is
/// non-finite.
///
/// # Examples
///
/// ```
/// use u_hypotest::timeseries::moving_average;
///
/// assert_eq!(moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), Some(vec![2.0, 3.0, 4.0]));
/// assert_eq!(moving_average(&[1.0, 2.0], 3), None);
/// ```
pub fn moving_average(values: &[f64], window: usize) -> Option<Vec<f64>> {
    if window == 0 || window > values.len() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let w = window as f64;
    Some(
        values
            .windows(window)
            .map(|win| win.iter().sum::<f64>() / w)
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

/// Period-over-period growth in percent, (xᵢ − xᵢ₋₁) / xᵢ₋₁ · 100.
///
/// A zero previous value gives 0.0 when the current value is also zero and
/// `+∞` otherwise.
///
/// # Returns
///
/// `None` if fewer than 2 values or any value is non-finite.
///
/// # Examples
///
/// ```
/// use u_hypotest::timeseries::growth_rates;
///
/// let g = growth_rates(&[100.0, 110.0, 0.0, 0.0, 5.0]).unwrap();
/// assert!((g[0] - 10.0).abs() < 1e-12);
/// assert_eq!(g[1], -100.0);
/// assert_eq!(g[2], 0.0);
/// assert_eq!(g[3], f64::INFINITY);
/// ```
pub fn growth_rates(values: &[f64]) -> Option<Vec<f64>> {
    if values.len() < 2 || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(
        values
            .windows(2)
            .map(|pair| {
                let (prev, current) = (pair[0], pair[1]);
                if prev == 0.0 {
                    if current == 0.0 {
                        0.0
                    } else {
                        f64::INFINITY
                    }
                } else {
                    (current - prev) / prev * 100.0
                }
            })
            .collect(),
    )
}

/// Compound annual growth rate in percent,
/// ((final / initial)^(1 / periods) − 1) · 100.
///
/// # Returns
///
/// - `None` if `initial ≤ 0`, `periods ≤ 0`, `final_value < 0`, or any
///   argument is non-finite
/// - −100.0 if `final_value` is 0
///
/// # Examples
///
/// ```
/// use u_hypotest::timeseries::cagr;
///
/// let rate = cagr(100.0, 133.1, 3.0).unwrap();
/// assert!((rate - 10.0).abs() < 1e-9);
/// assert_eq!(cagr(100.0, 0.0, 3.0), Some(-100.0));
/// assert_eq!(cagr(0.0, 10.0, 3.0), None);
/// ```
pub fn cagr(initial: f64, final_value: f64, periods: f64) -> Option<f64> {
    if !initial.is_finite() || !final_value.is_finite() || !periods.is_finite() {
        return None;
    }
    if initial <= 0.0 || periods <= 0.0 || final_value < 0.0 {
        return None;
    }
    if final_value == 0.0 {
        return Some(-100.0);
    }
    Some(((final_value / initial).powf(1.0 / periods) - 1.0) * 100.0)
}

/// Mean of the finite period-over-period growth rates.
///
/// # Returns
///
/// `None` if [`growth_rates`] is `None` or every rate is infinite.
pub fn average_growth_rate(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = growth_rates(values)?
        .into_iter()
        .filter(|r| r.is_finite())
        .collect();
    mean(&finite)
}

// ---------------------------------------------------------------------------
// Seasonality
// ---------------------------------------------------------------------------

/// Additive seasonal decomposition at a fixed period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalDecomposition {
    /// Season length.
    pub period: usize,
    /// Mean of the values at each phase (index mod period).
    pub seasonal_indices: Vec<f64>,
    /// Seasonal component per input index: phase mean minus series mean.
    pub seasonal: Vec<f64>,
    /// Centered moving-average trend; `None` where the window does not fit.
    pub trend: Vec<Option<f64>>,
    /// Values with the seasonal component removed.
    pub deseasonalized: Vec<f64>,
    /// Population variance of `seasonal_indices` over that of the series,
    /// capped at 1.0; 0.0 for a constant series.
    pub strength: f64,
}

/// Decomposes `values` into phase averages and a centered trend.
///
/// # Algorithm
///
/// Odd periods use a centered window of `period` values. Even periods use
/// the 2×`period` moving average: `period + 1` values, the two end points
/// weighted ½.
///
/// # Returns
///
/// `None` if `period < 2`, fewer than `2 · period` values, or non-finite
/// values.
///
/// # Examples
///
/// ```
/// use u_hypotest::timeseries::seasonal_decomposition;
///
/// let d = seasonal_decomposition(&[1.0, 5.0, 1.0, 5.0, 1.0, 5.0], 2).unwrap();
/// assert_eq!(d.seasonal_indices, vec![1.0, 5.0]);
/// assert_eq!(d.trend[0], None);
/// assert_eq!(d.trend[1], Some(3.0));
/// assert!((d.strength - 1.0).abs() < 1e-12);
/// ```
pub fn seasonal_decomposition(values: &[f64], period: usize) -> Option<SeasonalDecomposition> {
    let n = values.len();
    if period < 2 || n < 2 * period || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &v) in values.iter().enumerate() {
        sums[i % period] += v;
        counts[i % period] += 1;
    }
    let seasonal_indices: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| s / c as f64)
        .collect();

    let series_mean = mean(values)?;
    let seasonal: Vec<f64> = (0..n)
        .map(|i| seasonal_indices[i % period] - series_mean)
        .collect();
    let deseasonalized = values
        .iter()
        .zip(seasonal.iter())
        .map(|(&v, &s)| v - s)
        .collect();

    let series_var = population_variance(values)?;
    let strength = if series_var > 0.0 {
        (population_variance(&seasonal_indices)? / series_var).min(1.0)
    } else {
        0.0
    };

    Some(SeasonalDecomposition {
        period,
        seasonal_indices,
        seasonal,
        trend: centered_trend(values, period),
        deseasonalized,
        strength,
    })
}

fn centered_trend(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let half = period / 2;
    let p = period as f64;
    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = &values[i - half..=i + half];
            if period % 2 == 1 {
                Some(window.iter().sum::<f64>() / p)
            } else {
                let inner: f64 = window[1..period].iter().sum();
                Some((0.5 * (window[0] + window[period]) + inner) / p)
            }
        })
        .collect()
}

/// Strength of one candidate period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodStrength {
    /// Candidate period.
    pub period: usize,
    /// [`SeasonalDecomposition::strength`] at that period.
    pub strength: f64,
}

/// Outcome of seasonality detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityReport {
    /// A candidate exceeded the minimum strength.
    pub detected: bool,
    /// Strongest qualifying period.
    pub period: Option<usize>,
    /// Strength of the strongest evaluated period (0.0 if none fit).
    pub strength: f64,
    /// Every candidate the series was long enough to evaluate.
    pub evaluated: Vec<PeriodStrength>,
}

/// Chooses a seasonal period among fixed candidates.
///
/// # Examples
///
/// ```
/// use u_hypotest::timeseries::SeasonalityDetector;
///
/// let series = [10.0, 20.0, 30.0, 10.0, 20.0, 30.0, 10.0, 20.0, 30.0];
/// let report = SeasonalityDetector::default().detect(&series);
/// assert!(report.detected);
/// assert_eq!(report.period, Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityDetector {
    candidates: Vec<usize>,
    min_strength: f64,
}

impl Default for SeasonalityDetector {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_SEASONAL_PERIODS.to_vec(),
            min_strength: DEFAULT_MIN_SEASONAL_STRENGTH,
        }
    }
}

impl SeasonalityDetector {
    /// Creates a detector over `candidates`.
    ///
    /// # Returns
    ///
    /// `None` if `candidates` is empty, any period is below 2, or
    /// `min_strength` is outside [0, 1).
    pub fn new(candidates: Vec<usize>, min_strength: f64) -> Option<Self> {
        if candidates.is_empty() || candidates.iter().any(|&p| p < 2) {
            return None;
        }
        if !(0.0..1.0).contains(&min_strength) {
            return None;
        }
        Some(Self {
            candidates,
            min_strength,
        })
    }

    /// Candidate periods, in evaluation order.
    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    /// Minimum strength a period must exceed.
    pub fn min_strength(&self) -> f64 {
        self.min_strength
    }

    /// Evaluates every candidate the series is long enough for and reports
    /// the strongest one exceeding the minimum strength. Ties keep the
    /// earlier candidate.
    pub fn detect(&self, values: &[f64]) -> SeasonalityReport {
        let evaluated: Vec<PeriodStrength> = self
            .candidates
            .iter()
            .filter_map(|&period| {
                seasonal_decomposition(values, period).map(|d| PeriodStrength {
                    period,
                    strength: d.strength,
                })
            })
            .collect();

        let best = evaluated.iter().fold(None::<PeriodStrength>, |best, &c| match best {
            Some(b) if b.strength >= c.strength => Some(b),
            _ => Some(c),
        });

        let strength = best.map_or(0.0, |b| b.strength);
        let period = best
            .filter(|b| b.strength > self.min_strength)
            .map(|b| b.period);

        tracing::trace!(?period, strength, "seasonality detection");

        SeasonalityReport {
            detected: period.is_some(),
            period,
            strength,
            evaluated,
        }
    }
}
