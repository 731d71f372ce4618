//! Reusable per-iteration output buffers.

use faer::Mat;

use crate::matrix_ops::fill_zero;

use super::auxiliary::pair_count;
use super::error_rates::ErrorRateCounts;

/// Caller-owned accumulation targets for one sampler iteration.
///
/// The predictor, projection, and error-count targets are accumulated in
/// place by their kernels and the auxiliary matrix is overwritten, so the
/// driver allocates this bundle once and calls [`reset`](Self::reset) at
/// the top of each iteration instead of reallocating.
#[derive(Debug, Clone)]
pub struct IterationBuffers {
    /// Linear-predictor target, `n_individuals` by `q`.
    pub predictor: Mat<f64>,
    /// Sequential-sampling auxiliary target, `n_individuals` by `q(q-1)/2`.
    pub auxiliary: Mat<f64>,
    /// Augmented-data accumulator, one row per individual.
    pub projection: Mat<f64>,
    /// Sensitivity/specificity count target.
    pub error_counts: ErrorRateCounts,
}

impl IterationBuffers {
    /// Zeroed buffers for `n_individuals` individuals, `q` predictor
    /// dimensions, and `n_assays` assays.
    #[must_use]
    pub fn zeros(n_individuals: usize, q: usize, n_assays: usize) -> Self {
        Self {
            predictor: Mat::zeros(n_individuals, q),
            auxiliary: Mat::zeros(n_individuals, pair_count(q)),
            projection: Mat::zeros(n_individuals, 1),
            error_counts: ErrorRateCounts::zeros(n_assays),
        }
    }

    /// Zero every buffer in place, keeping the allocations.
    pub fn reset(&mut self) {
        fill_zero(&mut self.predictor);
        fill_zero(&mut self.auxiliary);
        fill_zero(&mut self.projection);
        self.error_counts.reset();
    }
}
