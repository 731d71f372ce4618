//! Random-effect projection into the augmented-data vector.

use faer::Mat;

use crate::input::SiteAssignments;

use super::types::{KernelError, check_cols, check_rows};

/// Accumulate each individual's random-effect contribution to the augmented
/// latent variable.
///
/// For individual `i` with site `s`, adds
/// `sum_j augmented(i,j) * b(j,s)` to `accumulator(i, 0)`, projecting the
/// augmented-data covariate row through the site-specific random-effect
/// vector. Purely additive; callers reset the accumulator between
/// non-incremental uses.
///
/// # Errors
///
/// Returns a dimension-mismatch [`KernelError`] when `sites`,
/// `random_effects`, or `accumulator` disagree with the augmented matrix's
/// shape, or [`KernelError::SiteOutOfRange`] when an individual's site index
/// has no column in `random_effects`.
pub fn accumulate_projection(
    augmented: &Mat<f64>,
    sites: &SiteAssignments,
    random_effects: &Mat<f64>,
    accumulator: &mut Mat<f64>,
) -> Result<(), KernelError> {
    let n = augmented.nrows();
    let q = augmented.ncols();
    if sites.len() != n {
        return Err(KernelError::RowCountMismatch {
            name: "site assignments",
            rows: sites.len(),
            expected: n,
        });
    }
    check_rows("random-effect matrix", random_effects, q)?;
    check_rows("accumulator", accumulator, n)?;
    check_cols("accumulator", accumulator, 1)?;

    let n_sites = random_effects.ncols();
    for i in 0..n {
        let site = sites.site(i);
        if site >= n_sites {
            return Err(KernelError::SiteOutOfRange {
                individual: i,
                site,
                n_sites,
            });
        }
        let mut value = 0.0;
        for j in 0..q {
            value += augmented[(i, j)] * random_effects[(j, site)];
        }
        accumulator[(i, 0)] += value;
    }
    Ok(())
}
