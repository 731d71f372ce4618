//! Shared error type and shape checks for the update kernels.

use faer::Mat;
use thiserror::Error;

/// Errors returned by the update kernels.
///
/// Dimension mismatches are detected on entry; index-out-of-range failures
/// are detected inside the loops when a site, assay, or member index falls
/// outside its target container. Failures are always surfaced to the
/// driver, never skipped, since a silently dropped update would corrupt the
/// chain's stationary distribution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("{name} has {rows} rows; expected {expected}")]
    RowCountMismatch {
        name: &'static str,
        rows: usize,
        expected: usize,
    },
    #[error("{name} has {cols} columns; expected {expected}")]
    ColumnCountMismatch {
        name: &'static str,
        cols: usize,
        expected: usize,
    },
    #[error("site index {site} for individual {individual} is out of range for {n_sites} random-effect columns")]
    SiteOutOfRange {
        individual: usize,
        site: usize,
        n_sites: usize,
    },
    #[error("assay index {assay} for pool {pool} is out of range for {n_assays} assays")]
    AssayOutOfRange {
        pool: usize,
        assay: usize,
        n_assays: usize,
    },
    #[error("individual index {member} in pool {pool} is out of range for {n_individuals} individuals")]
    MemberOutOfRange {
        pool: usize,
        member: usize,
        n_individuals: usize,
    },
}

pub(crate) fn check_rows(
    name: &'static str,
    matrix: &Mat<f64>,
    expected: usize,
) -> Result<(), KernelError> {
    if matrix.nrows() == expected {
        Ok(())
    } else {
        Err(KernelError::RowCountMismatch {
            name,
            rows: matrix.nrows(),
            expected,
        })
    }
}

pub(crate) fn check_cols(
    name: &'static str,
    matrix: &Mat<f64>,
    expected: usize,
) -> Result<(), KernelError> {
    if matrix.ncols() == expected {
        Ok(())
    } else {
        Err(KernelError::ColumnCountMismatch {
            name,
            cols: matrix.ncols(),
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_checks_report_the_offending_argument() {
        let matrix = Mat::<f64>::zeros(2, 3);
        assert!(check_rows("predictor", &matrix, 2).is_ok());
        assert_eq!(
            check_rows("predictor", &matrix, 4),
            Err(KernelError::RowCountMismatch {
                name: "predictor",
                rows: 2,
                expected: 4,
            })
        );
        assert_eq!(
            check_cols("predictor", &matrix, 1),
            Err(KernelError::ColumnCountMismatch {
                name: "predictor",
                cols: 3,
                expected: 1,
            })
        );
    }
}
