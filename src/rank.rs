//! Mid-rank assignment shared by the rank-based tests.
//!
//! Tied values receive the mean of the ranks they would occupy if the
//! tie were broken arbitrarily, so `[1, 2, 2, 3]` ranks as
//! `[1, 2.5, 2.5, 4]`. Ranks are returned in input order and do not
//! depend on the input order of equal values.
//!
//! # Examples
//!
//! ```
//! use u_hypotest::rank::{rank_with_ties, tie_correction};
//!
//! assert_eq!(rank_with_ties(&[1.0, 2.0, 2.0, 3.0]), vec![1.0, 2.5, 2.5, 4.0]);
//! assert_eq!(tie_correction(&[1.0, 2.0, 2.0, 3.0]), 6.0); // 2³ − 2
//! ```

/// Assigns 1-based mid-ranks in input order.
///
/// # Algorithm
///
/// Sort indices by value (stable), walk runs of equal values, and give
/// every member of a run of length t starting at sorted position i the
/// rank `i + (t + 1) / 2`.
pub fn rank_with_ties(values: &[f64]) -> Vec<f64> {
    let order = sorted_order(values);
    let mut ranks = vec![0.0; values.len()];
    for (start, end) in tie_runs(values, &order) {
        // Positions start..end are tied; average rank = (start+1 + end) / 2
        let avg_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg_rank;
        }
    }
    ranks
}

/// Sizes of every group of tied values (singletons excluded).
///
/// # Examples
///
/// ```
/// use u_hypotest::rank::tie_group_sizes;
///
/// assert_eq!(tie_group_sizes(&[3.0, 1.0, 3.0, 2.0, 3.0, 1.0]), vec![2, 3]);
/// assert!(tie_group_sizes(&[1.0, 2.0, 3.0]).is_empty());
/// ```
pub fn tie_group_sizes(values: &[f64]) -> Vec<usize> {
    let order = sorted_order(values);
    tie_runs(values, &order)
        .map(|(start, end)| end - start)
        .filter(|&t| t > 1)
        .collect()
}

/// Tie correction term Σ(t³ − t) over all tie groups.
pub fn tie_correction(values: &[f64]) -> f64 {
    tie_group_sizes(values)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}

fn sorted_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

// Yields half-open [start, end) runs of equal values over the sorted order.
fn tie_runs<'a>(
    values: &'a [f64],
    order: &'a [usize],
) -> impl Iterator<Item = (usize, usize)> + 'a {
    let n = order.len();
    let mut i = 0;
    std::iter::from_fn(move || {
        if i >= n {
            return None;
        }
        let start = i;
        let v = values[order[start]];
        let mut j = start + 1;
        while j < n && values[order[j]] == v {
            j += 1;
        }
        i = j;
        Some((start, j))
    })
}
