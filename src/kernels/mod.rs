//! # Per-iteration update kernels
//!
//! Four stateless numerical passes, invoked once per MCMC iteration by the
//! external driver:
//!
//! - [`accumulate_linear_predictor`] — latent linear predictor per
//!   individual, with lower-triangular cross terms (accumulates).
//! - [`build_sequential_auxiliary`] — auxiliary matrix for sequential
//!   conditional sampling of a correlated latent vector (overwrites).
//! - [`accumulate_projection`] — random-effect contribution to the
//!   augmented-data vector (accumulates).
//! - [`accumulate_error_counts`] — assay sensitivity/specificity
//!   sufficient-statistic counts from pool outcomes (accumulates).
//!
//! Every kernel is a single deterministic pass whose outer iterations
//! (individuals, or pools for the error kernel) are independent: each reads
//! only shared inputs and writes only its own row's outputs, so callers may
//! partition the outer index across threads provided accumulation targets
//! do not overlap. Accumulating kernels never reset their targets; the
//! driver zeroes them (see [`IterationBuffers`]) whenever a fresh value is
//! needed.

pub mod auxiliary;
pub mod error_rates;
pub mod predictor;
pub mod projection;
pub mod types;
pub mod workspace;

pub use auxiliary::{build_sequential_auxiliary, pair_count, pair_index};
pub use error_rates::{ErrorRateCounts, accumulate_error_counts};
pub use predictor::accumulate_linear_predictor;
pub use projection::accumulate_projection;
pub use types::KernelError;
pub use workspace::IterationBuffers;
