//! Latent linear-predictor accumulation.

use faer::Mat;

use crate::input::SiteAssignments;

use super::types::{KernelError, check_cols, check_rows};

/// Accumulate the latent linear predictor for every individual.
///
/// For individual `i` with site `s` and each predictor dimension `j`, adds
/// `Z(i,j) * b(j,s) + sum_{k<j} Z(i,j) * b(k,s) * A(j,k)` to
/// `predictor(i,j)`, where `Z` is `covariates`, `b` is `random_effects`
/// (one column per site), and `A` is `cross_terms`. Only the strict lower
/// triangle of `cross_terms` is read; dimension 0 has no cross term. The
/// result is the q-dimensional linear predictor consumed by the driver's
/// latent-variable draw.
///
/// `predictor` is incremented in place on top of whatever baseline
/// contribution it already holds; callers that need a fresh value must zero
/// it first.
///
/// # Errors
///
/// Returns a dimension-mismatch [`KernelError`] when `sites`, `cross_terms`,
/// `random_effects`, or `predictor` disagree with the covariate matrix's
/// shape, or [`KernelError::SiteOutOfRange`] when an individual's site index
/// has no column in `random_effects`.
pub fn accumulate_linear_predictor(
    covariates: &Mat<f64>,
    sites: &SiteAssignments,
    cross_terms: &Mat<f64>,
    random_effects: &Mat<f64>,
    predictor: &mut Mat<f64>,
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
    check_rows("cross-term matrix", cross_terms, q)?;
    check_cols("cross-term matrix", cross_terms, q)?;
    check_rows("random-effect matrix", random_effects, q)?;
    check_rows("predictor", predictor, n)?;
    check_cols("predictor", predictor, q)?;

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
        for j in 0..q {
            let mut value = covariates[(i, j)] * random_effects[(j, site)];
            for k in 0..j {
                value += covariates[(i, j)] * random_effects[(k, site)] * cross_terms[(j, k)];
            }
            predictor[(i, j)] += value;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn single_site(n: usize) -> SiteAssignments {
        SiteAssignments::from_one_based(&vec![1; n]).unwrap()
    }

    #[test]
    fn zero_random_effects_leave_predictor_unchanged() {
        let covariates = Mat::from_fn(3, 3, |i, j| 1.0 + f64::from(u8::try_from(i + j).unwrap()));
        let sites = SiteAssignments::from_one_based(&[1, 2, 1]).unwrap();
        let cross_terms = Mat::from_fn(3, 3, |i, j| if i > j { 0.5 } else { 0.0 });
        let random_effects = Mat::<f64>::zeros(3, 2);
        let mut predictor = Mat::from_fn(3, 3, |i, _| f64::from(u8::try_from(i).unwrap()) - 1.0);
        let baseline = predictor.clone();

        accumulate_linear_predictor(
            &covariates,
            &sites,
            &cross_terms,
            &random_effects,
            &mut predictor,
        )
        .unwrap();

        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(predictor[(i, j)], baseline[(i, j)]);
            }
        }
    }

    #[test]
    fn single_dimension_has_no_cross_term() {
        let covariates = Mat::from_fn(2, 1, |i, _| if i == 0 { 2.0 } else { -1.0 });
        let sites = single_site(2);
        let cross_terms = Mat::<f64>::zeros(1, 1);
        let random_effects = Mat::from_fn(1, 1, |_, _| 3.0);
        let mut predictor = Mat::<f64>::zeros(2, 1);

        accumulate_linear_predictor(
            &covariates,
            &sites,
            &cross_terms,
            &random_effects,
            &mut predictor,
        )
        .unwrap();

        assert_relative_eq!(predictor[(0, 0)], 6.0);
        assert_relative_eq!(predictor[(1, 0)], -3.0);
    }

    #[test]
    fn cross_terms_apply_once_per_lower_triangular_pair() {
        // Z all ones, b = [2, 3] at the single site, A(1,0) = 1:
        // dimension 0 gets 2, dimension 1 gets 3 + 2 * 1 = 5.
        let covariates = Mat::from_fn(2, 2, |_, _| 1.0);
        let sites = single_site(2);
        let cross_terms = Mat::from_fn(2, 2, |i, j| if i == 1 && j == 0 { 1.0 } else { 0.0 });
        let random_effects = Mat::from_fn(2, 1, |i, _| if i == 0 { 2.0 } else { 3.0 });
        let mut predictor = Mat::<f64>::zeros(2, 2);

        accumulate_linear_predictor(
            &covariates,
            &sites,
            &cross_terms,
            &random_effects,
            &mut predictor,
        )
        .unwrap();

        for i in 0..2 {
            assert_relative_eq!(predictor[(i, 0)], 2.0);
            assert_relative_eq!(predictor[(i, 1)], 5.0);
        }
    }

    #[test]
    fn upper_triangle_of_cross_terms_is_never_read() {
        let covariates = Mat::from_fn(2, 2, |_, _| 1.0);
        let sites = single_site(2);
        // Garbage above the diagonal must not leak into the result.
        let cross_terms = Mat::from_fn(2, 2, |i, j| if i < j { f64::NAN } else { 0.0 });
        let random_effects = Mat::from_fn(2, 1, |_, _| 1.0);
        let mut predictor = Mat::<f64>::zeros(2, 2);

        accumulate_linear_predictor(
            &covariates,
            &sites,
            &cross_terms,
            &random_effects,
            &mut predictor,
        )
        .unwrap();

        assert!(predictor[(0, 0)].is_finite());
        assert!(predictor[(0, 1)].is_finite());
    }

    #[test]
    fn repeated_calls_accumulate() {
        let covariates = Mat::from_fn(2, 2, |_, _| 1.0);
        let sites = single_site(2);
        let cross_terms = Mat::<f64>::zeros(2, 2);
        let random_effects = Mat::from_fn(2, 1, |_, _| 1.5);
        let mut predictor = Mat::<f64>::zeros(2, 2);

        for _ in 0..2 {
            accumulate_linear_predictor(
                &covariates,
                &sites,
                &cross_terms,
                &random_effects,
                &mut predictor,
            )
            .unwrap();
        }

        assert_relative_eq!(predictor[(0, 0)], 3.0);
        assert_relative_eq!(predictor[(1, 1)], 3.0);
    }

    #[test]
    fn site_without_random_effect_column_fails() {
        let covariates = Mat::from_fn(2, 1, |_, _| 1.0);
        let sites = SiteAssignments::from_one_based(&[1, 2]).unwrap();
        let cross_terms = Mat::<f64>::zeros(1, 1);
        let random_effects = Mat::<f64>::zeros(1, 1);
        let mut predictor = Mat::<f64>::zeros(2, 1);

        let err = accumulate_linear_predictor(
            &covariates,
            &sites,
            &cross_terms,
            &random_effects,
            &mut predictor,
        )
        .expect_err("missing site column should fail");
        assert_eq!(
            err,
            KernelError::SiteOutOfRange {
                individual: 1,
                site: 1,
                n_sites: 1,
            }
        );
    }

    #[test]
    fn mismatched_predictor_shape_fails() {
        let covariates = Mat::from_fn(2, 2, |_, _| 1.0);
        let sites = single_site(2);
        let cross_terms = Mat::<f64>::zeros(2, 2);
        let random_effects = Mat::<f64>::zeros(2, 1);
        let mut predictor = Mat::<f64>::zeros(2, 3);

        let err = accumulate_linear_predictor(
            &covariates,
            &sites,
            &cross_terms,
            &random_effects,
            &mut predictor,
        )
        .expect_err("wrong predictor width should fail");
        assert_eq!(
            err,
            KernelError::ColumnCountMismatch {
                name: "predictor",
                cols: 3,
                expected: 2,
            }
        );
    }

    #[test]
    fn swapping_individuals_permutes_rows_without_coupling() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 5;
        let q = 3;
        let covariates = Mat::from_fn(n, q, |_, _| rng.random_range(-1.0..1.0));
        let site_ids: Vec<usize> = (0..n).map(|_| rng.random_range(1..=2)).collect();
        let sites = SiteAssignments::from_one_based(&site_ids).unwrap();
        let cross_terms = Mat::from_fn(q, q, |i, j| {
            if i > j {
                rng.random_range(-1.0..1.0)
            } else {
                0.0
            }
        });
        let random_effects = Mat::from_fn(q, 2, |_, _| rng.random_range(-1.0..1.0));

        let mut predictor = Mat::<f64>::zeros(n, q);
        accumulate_linear_predictor(
            &covariates,
            &sites,
            &cross_terms,
            &random_effects,
            &mut predictor,
        )
        .unwrap();

        // Swap individuals 1 and 3 in every row-indexed input.
        let (a, b) = (1, 3);
        let swap = |i: usize| match i {
            i if i == a => b,
            i if i == b => a,
            i => i,
        };
        let swapped_covariates = Mat::from_fn(n, q, |i, j| covariates[(swap(i), j)]);
        let swapped_ids: Vec<usize> = (0..n).map(|i| site_ids[swap(i)]).collect();
        let swapped_sites = SiteAssignments::from_one_based(&swapped_ids).unwrap();

        let mut swapped_predictor = Mat::<f64>::zeros(n, q);
        accumulate_linear_predictor(
            &swapped_covariates,
            &swapped_sites,
            &cross_terms,
            &random_effects,
            &mut swapped_predictor,
        )
        .unwrap();

        for i in 0..n {
            for j in 0..q {
                assert_relative_eq!(swapped_predictor[(i, j)], predictor[(swap(i), j)]);
            }
        }
    }
}
