//! Auxiliary matrix for sequential conditional sampling.

use faer::Mat;

use crate::input::SiteAssignments;

use super::types::{KernelError, check_cols, check_rows};

/// Number of unordered covariate pairs `(j, m)` with `j < m < q`.
#[must_use]
pub const fn pair_count(q: usize) -> usize {
    if q < 2 { 0 } else { q * (q - 1) / 2 }
}

/// Column index of pair `(j, m)` in the auxiliary matrix.
///
/// Pairs are enumerated with `j` outer and `m` inner, both increasing, the
/// order the sequential conditional sampler consumes them in: for `q = 3`
/// the columns are `(0,1), (0,2), (1,2)`. Callers must uphold `j < m < q`.
#[must_use]
pub const fn pair_index(j: usize, m: usize, q: usize) -> usize {
    j * (2 * q - j - 1) / 2 + (m - j - 1)
}

/// Build the auxiliary matrix used to draw a correlated latent vector one
/// coordinate at a time.
///
/// For individual `i` with site `s` and each pair `(j, m)` with `j < m`,
/// sets `auxiliary(i, pair_index(j, m, q)) = b(j,s) * Z(i,m) * V(m,m)`,
/// where `Z` is `covariates`, `b` is `random_effects`, and only the
/// diagonal of `loadings` is read. Each later coordinate's conditional mean
/// and variance depend on earlier coordinates through these products.
///
/// Unlike the predictor kernel this one overwrites `auxiliary` rather than
/// accumulating; previous contents are discarded.
///
/// # Errors
///
/// Returns a dimension-mismatch [`KernelError`] when `sites`, `loadings`,
/// `random_effects`, or `auxiliary` disagree with the covariate matrix's
/// shape, or [`KernelError::SiteOutOfRange`] when an individual's site index
/// has no column in `random_effects`.
pub fn build_sequential_auxiliary(
    covariates: &Mat<f64>,
    sites: &SiteAssignments,
    loadings: &Mat<f64>,
    random_effects: &Mat<f64>,
    auxiliary: &mut Mat<f64>,
) -> Result<(), KernelError> {
    let n = covariates.nrows();
    let q = covariates.ncols();
    if sites.len() != n {
        return Err(KernelError::RowCountMismatch {
            name: "site assignments",
            rows: sites.len(),
            expected: n,
        });
    }
    check_rows("loading matrix", loadings, q)?;
    check_cols("loading matrix", loadings, q)?;
    check_rows("random-effect matrix", random_effects, q)?;
    check_rows("auxiliary matrix", auxiliary, n)?;
    check_cols("auxiliary matrix", auxiliary, pair_count(q))?;

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
        let mut column = 0;
        for j in 0..q.saturating_sub(1) {
            for m in (j + 1)..q {
                auxiliary[(i, column)] =
                    random_effects[(j, site)] * covariates[(i, m)] * loadings[(m, m)];
                column += 1;
            }
        }
    }
    Ok(())
}
