//! Statistical helpers for the UKCP selection pipeline.
//!
//! All functions operate on plain slices. Missing values are encoded as NaN
//! (fill values are converted on load), so the reductions used on cube data
//! skip non-finite entries.

use std::cmp::Ordering;

/// Arithmetic mean of the finite values in a slice.
///
/// Returns NaN if the slice holds no finite value, so that an all-missing
/// grid cell stays missing after averaging.
pub fn nan_mean(data: &[f64]) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Finite values of `data`, sorted ascending.
pub fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Linear-interpolation quantile (R type 7, numpy's default).
///
/// **Expects pre-sorted input** (caller's responsibility). `p` is a
/// probability in `[0, 1]`.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Percentile (0..=100) of the finite values in `data`.
///
/// Returns NaN when `data` holds no finite value.
pub fn nan_percentile(data: &[f64], percentile: f64) -> f64 {
    let sorted = sorted_finite(data);
    if sorted.is_empty() {
        return f64::NAN;
    }
    quantile_type7(&sorted, percentile / 100.0)
}

/// Indices that sort `values` ascending.
///
/// The sort is stable, so ties keep their original order. NaN sorts last.
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| cmp_nan_last(values[a], values[b]));
    idx
}

fn cmp_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

/// Position window `[lo, hi)` covering `percentile ± half_width` of a
/// population of `n` ranked members.
///
/// Bounds are truncated towards zero and clamped to `0..=n`.
///
/// ```
/// // 50th percentile of 3000 members, +/- 10 percentage points.
/// assert_eq!(ukcp_stats::percentile_window(3000, 50.0, 10.0), (1200, 1800));
/// ```
pub fn percentile_window(n: usize, percentile: f64, half_width: f64) -> (usize, usize) {
    let bound = |p: f64| -> usize {
        let raw = (p * n as f64 / 100.0).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(n)
        }
    };
    (
        bound(percentile - half_width),
        bound(percentile + half_width),
    )
}
