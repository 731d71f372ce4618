//! Assay error-rate sufficient-statistic accumulation.

use faer::Mat;

use crate::input::PoolObservations;
use crate::matrix_ops::fill_zero;

use super::types::{KernelError, check_cols, check_rows};

/// Running sensitivity/specificity sufficient statistics, one row per assay.
///
/// The counts are combined downstream with Beta priors to draw posterior
/// sensitivity and specificity, and the column convention follows that
/// parameterization. `sensitivity` column 0 counts pools where a true
/// positive was present and the pool tested positive; column 1 counts pools
/// where a true positive was missed. For `specificity` the column roles are
/// swapped: column 0 counts correctly negative pools and column 1 counts
/// false-positive pool results.
#[derive(Debug, Clone)]
pub struct ErrorRateCounts {
    pub sensitivity: Mat<f64>,
    pub specificity: Mat<f64>,
}

impl ErrorRateCounts {
    /// Fresh zeroed counts for `n_assays` assays.
    #[must_use]
    pub fn zeros(n_assays: usize) -> Self {
        Self {
            sensitivity: Mat::zeros(n_assays, 2),
            specificity: Mat::zeros(n_assays, 2),
        }
    }

    /// Number of assays the counts cover.
    #[must_use]
    pub fn n_assays(&self) -> usize {
        self.sensitivity.nrows()
    }

    /// Zero every cell in place, keeping the allocation.
    pub fn reset(&mut self) {
        fill_zero(&mut self.sensitivity);
        fill_zero(&mut self.specificity);
    }
}

/// Accumulate sensitivity/specificity counts over one sweep of pools.
///
/// For each pool, sums the reconstructed latent statuses of its members
/// (`statuses` is a single column, one row per individual, nonzero meaning
/// truly positive) and increments exactly one cell of `counts` according to
/// the pool's test outcome and assay. Counts are incremented in place and
/// never normalized; the driver calls [`ErrorRateCounts::reset`] before
/// each iteration's sweep.
///
/// # Errors
///
/// Returns a dimension-mismatch [`KernelError`] when `statuses` is not a
/// single column or `counts` does not match the pool set's assay count,
/// [`KernelError::AssayOutOfRange`] when a pool's assay has no row in
/// `counts`, or [`KernelError::MemberOutOfRange`] when a pool references an
/// individual past the end of `statuses`.
pub fn accumulate_error_counts(
    statuses: &Mat<f64>,
    pools: &PoolObservations,
    counts: &mut ErrorRateCounts,
) -> Result<(), KernelError> {
    check_cols("status vector", statuses, 1)?;
    check_rows("sensitivity counts", &counts.sensitivity, pools.n_assays())?;
    check_cols("sensitivity counts", &counts.sensitivity, 2)?;
    check_rows("specificity counts", &counts.specificity, pools.n_assays())?;
    check_cols("specificity counts", &counts.specificity, 2)?;

    let n_individuals = statuses.nrows();
    for (index, pool) in pools.pools().iter().enumerate() {
        let assay = pool.assay();
        if assay >= counts.n_assays() {
            return Err(KernelError::AssayOutOfRange {
                pool: index,
                assay,
                n_assays: counts.n_assays(),
            });
        }
        let mut status_sum = 0.0;
        for &member in pool.members() {
            if member >= n_individuals {
                return Err(KernelError::MemberOutOfRange {
                    pool: index,
                    member,
                    n_individuals,
                });
            }
            status_sum += statuses[(member, 0)];
        }
        match (status_sum > 0.0, pool.tested_positive()) {
            (true, true) => counts.sensitivity[(assay, 0)] += 1.0,
            (true, false) => counts.sensitivity[(assay, 1)] += 1.0,
            (false, true) => counts.specificity[(assay, 1)] += 1.0,
            (false, false) => counts.specificity[(assay, 0)] += 1.0,
        }
    }
    Ok(())
}
