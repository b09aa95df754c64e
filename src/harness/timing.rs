//! Robust per-call timing.
//!
//! Each measurement runs the kernel in batches and keeps the per-call
//! interval of every batch. The reported median is taken over the batch
//! intervals sorted in descending order, and the spread excludes the two
//! extreme batches, which absorbs scheduler noise without discarding real
//! variation.

use std::time::Instant;

pub(crate) struct RobustStats {
    /// Median per-call time in nanoseconds.
    pub(crate) median: f64,
    /// Spread of the interior intervals around the median.
    pub(crate) sd: f64,
}

/// Time `f` over `robust_iters` batches of `speed_iters` calls each.
///
/// Fewer than 3 batches cannot produce a median with an interior spread, so
/// the batch count is raised to 3 when needed.
pub(crate) fn measure<F: FnMut()>(mut f: F, speed_iters: usize, robust_iters: usize) -> RobustStats {
    let robust_iters = robust_iters.max(3);
    let mut intervals = Vec::with_capacity(robust_iters);
    for _ in 0..robust_iters {
        let start = Instant::now();
        for _ in 0..speed_iters {
            f();
        }
        intervals.push(start.elapsed().as_nanos() as f64 / speed_iters as f64);
    }
    robust_stats(&mut intervals)
}

/// Median and interior spread of a set of batch intervals.
///
/// Requires at least 3 intervals.
pub(crate) fn robust_stats(intervals: &mut [f64]) -> RobustStats {
    debug_assert!(intervals.len() >= 3);
    intervals.sort_by(|a, b| b.total_cmp(a));
    let n = intervals.len();
    let median = intervals[(n + 1) >> 1];
    let mut sse = 0.0;
    for v in &intervals[1..n - 1] {
        let d = v - median;
        sse += d * d;
    }
    RobustStats {
        median,
        sd: (sse / (n - 2) as f64).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_ignores_outliers() {
        // One huge outlier must not move the median.
        let mut intervals = vec![10.0, 10.0, 11.0, 9.0, 10.0, 10.0, 1000.0];
        let stats = robust_stats(&mut intervals);
        assert_eq!(stats.median, 10.0);
        assert!(stats.sd < 1.0);
    }

    #[test]
    fn measure_tolerates_tiny_batch_counts() {
        // Batch counts below 3 are raised to 3 instead of indexing out of
        // bounds or dividing by zero.
        for robust_iters in [0, 1, 2] {
            let stats = measure(|| {}, 4, robust_iters);
            assert!(stats.median >= 0.0);
            assert!(stats.sd.is_finite());
        }
    }

    #[test]
    fn measure_returns_positive_times() {
        let mut x = 0u64;
        let stats = measure(
            || {
                x = x.wrapping_add(1);
            },
            1000,
            5,
        );
        assert!(stats.median >= 0.0);
        assert!(stats.sd >= 0.0);
    }
}
