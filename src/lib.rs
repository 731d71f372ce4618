#![forbid(unsafe_code)]

//! # `group_testing_kernels`
//!
//! Per-iteration numerical kernels for an MCMC sampler over a group-testing
//! regression with imperfect assays: individuals are tested in pools, pool
//! outcomes are corrupted by assay sensitivity and specificity, and a latent
//! per-individual regression with site-specific random effects models the
//! true infection probability.
//!
//! The crate covers only the per-iteration hot loops. An external driver
//! owns all sampler state (coefficient draws, covariance matrices, the
//! random-number generator, chain output) and calls the kernels once per
//! iteration in the order fixed by the model's conditional structure:
//! linear predictor, then auxiliary/projection, then its own latent draw,
//! then error-rate accumulation. No kernel calls another and none retains
//! state between calls.
//!
//! Site, assay, and pool-member identifiers arrive 1-based in the raw data
//! matrices; the [`input`] module converts them to 0-based indices once at
//! the boundary so the numeric core stays index-origin-agnostic.

pub mod input;
pub mod kernels;
pub mod matrix_ops;

pub use input::{InputError, Pool, PoolObservations, SiteAssignments};
pub use kernels::{
    ErrorRateCounts, IterationBuffers, KernelError, accumulate_error_counts,
    accumulate_linear_predictor, accumulate_projection, build_sequential_auxiliary, pair_count,
    pair_index,
};
