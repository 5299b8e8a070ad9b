//! ECG interval figures derived from the incoming trace.
//!
//! This is a placeholder estimator: each figure is drawn uniformly from a
//! plausible range and the input sample is ignored. Real PR/QT/QRS/ST
//! measurement needs beat segmentation over the whole sample window, which
//! the upstream firmware does not provide yet. The ranges and the
//! recompute-on-every-sample cadence are kept so a real estimator can drop
//! in behind the same interface.

use rand::rngs::ThreadRng;
use rand::Rng;

/// Derived ECG interval figures, recomputed on every accepted sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct DerivedMetrics {
    /// PR interval in milliseconds.
    pub pr_interval_ms: f64,
    /// QT interval in milliseconds.
    pub qt_interval_ms: f64,
    /// QRS duration in milliseconds.
    pub qrs_duration_ms: f64,
    /// ST segment elevation in millivolts.
    pub st_segment_mv: f64,
}

/// Sampling ranges for the placeholder figures.
pub const PR_RANGE_MS: (f64, f64) = (0.0, 200.0);
pub const QT_RANGE_MS: (f64, f64) = (0.0, 400.0);
pub const QRS_RANGE_MS: (f64, f64) = (0.0, 100.0);
pub const ST_RANGE_MV: (f64, f64) = (0.0, 50.0);

/// Produces [`DerivedMetrics`] from the live trace.
#[derive(Debug, Default)]
pub struct IntervalEstimator {
    rng: ThreadRng,
}

impl IntervalEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute interval figures for the latest sample.
    ///
    /// Placeholder behavior: independent uniform draws, `_ecg` unused.
    pub fn estimate(&mut self, _ecg: f64) -> DerivedMetrics {
        DerivedMetrics {
            pr_interval_ms: self.rng.gen_range(PR_RANGE_MS.0..PR_RANGE_MS.1),
            qt_interval_ms: self.rng.gen_range(QT_RANGE_MS.0..QT_RANGE_MS.1),
            qrs_duration_ms: self.rng.gen_range(QRS_RANGE_MS.0..QRS_RANGE_MS.1),
            st_segment_mv: self.rng.gen_range(ST_RANGE_MV.0..ST_RANGE_MV.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimates_stay_in_range() {
        let mut estimator = IntervalEstimator::new();
        for i in 0..500 {
            let m = estimator.estimate(i as f64 * 0.01);
            assert!((PR_RANGE_MS.0..PR_RANGE_MS.1).contains(&m.pr_interval_ms));
            assert!((QT_RANGE_MS.0..QT_RANGE_MS.1).contains(&m.qt_interval_ms));
            assert!((QRS_RANGE_MS.0..QRS_RANGE_MS.1).contains(&m.qrs_duration_ms));
            assert!((ST_RANGE_MV.0..ST_RANGE_MV.1).contains(&m.st_segment_mv));
        }
    }

    #[test]
    fn test_default_metrics_are_zero() {
        let m = DerivedMetrics::default();
        assert_eq!(m.pr_interval_ms, 0.0);
        assert_eq!(m.qt_interval_ms, 0.0);
        assert_eq!(m.qrs_duration_ms, 0.0);
        assert_eq!(m.st_segment_mv, 0.0);
    }
}
