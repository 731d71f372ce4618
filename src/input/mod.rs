//! # Kernel inputs
//!
//! Typed containers for the driver-supplied data, normalized once at the
//! boundary: site, assay, and pool-member identifiers are stored 1-based in
//! the raw matrices and are converted to 0-based indices here, in a single
//! validated pass, so the numeric kernels never carry index-origin
//! conversions in their hot loops.
//!
//! # Examples
//!
//! ```
//! use faer::Mat;
//! use group_testing_kernels::{PoolObservations, SiteAssignments};
//!
//! // Metadata column 2 holds 1-based site ids.
//! let metadata = Mat::from_fn(3, 3, |i, j| match (i % 2, j) {
//!     (0, 2) => 1.0,
//!     (1, 2) => 2.0,
//!     _ => 0.0,
//! });
//! let sites = SiteAssignments::from_metadata(&metadata, 2).unwrap();
//! assert_eq!(sites.n_sites(), 2);
//! assert_eq!(sites.site(0), 0);
//!
//! // One pool: positive outcome, size 2, assay 1, members 1 and 3 (1-based).
//! let raw = Mat::from_fn(1, 5, |_, j| [1.0, 2.0, 1.0, 1.0, 3.0][j]);
//! let pools = PoolObservations::from_raw(&raw, 3, 1).unwrap();
//! assert_eq!(pools.pools()[0].members(), &[0, 2]);
//! ```

use faer::Mat;
use num_traits::ToPrimitive;
use thiserror::Error;

/// Column of the raw pool matrix where member ids begin.
const MEMBER_COLUMN_OFFSET: usize = 3;

/// Errors returned when normalizing raw driver matrices.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("site id in row {row} is not a positive integer")]
    InvalidSiteId { row: usize },
    #[error("metadata matrix has {cols} columns; site ids were requested from column {column}")]
    MissingSiteColumn { cols: usize, column: usize },
    #[error("pool matrix has {cols} columns; at least {required} are required")]
    MissingPoolColumns { cols: usize, required: usize },
    #[error("pool {pool} column {column} is not a valid non-negative integer")]
    InvalidPoolEntry { pool: usize, column: usize },
    #[error("pool {pool} has size zero")]
    EmptyPool { pool: usize },
    #[error("pool {pool} has size {size} but only {available} member columns are present")]
    PoolSizeExceedsColumns {
        pool: usize,
        size: usize,
        available: usize,
    },
    #[error("pool {pool} uses assay {assay}; assay ids are 1-based and at most {n_assays}")]
    AssayIdOutOfRange {
        pool: usize,
        assay: usize,
        n_assays: usize,
    },
    #[error("pool {pool} references individual {member}; member ids are 1-based and at most {n_individuals}")]
    MemberIdOutOfRange {
        pool: usize,
        member: usize,
        n_individuals: usize,
    },
}

/// Per-individual site assignment, 0-based after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAssignments {
    sites: Vec<usize>,
    n_sites: usize,
}

impl SiteAssignments {
    /// Build from 1-based site ids, as stored in the metadata matrix.
    ///
    /// The number of sites is taken as the largest id seen.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidSiteId` if any id is zero.
    pub fn from_one_based(ids: &[usize]) -> Result<Self, InputError> {
        let mut sites = Vec::with_capacity(ids.len());
        let mut n_sites = 0;
        for (row, &id) in ids.iter().enumerate() {
            if id == 0 {
                return Err(InputError::InvalidSiteId { row });
            }
            sites.push(id - 1);
            n_sites = n_sites.max(id);
        }
        Ok(Self { sites, n_sites })
    }

    /// Read 1-based site ids from `column` of an individual metadata matrix.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MissingSiteColumn` if the matrix has no such
    /// column, or `InputError::InvalidSiteId` if any entry is not a positive
    /// integer.
    pub fn from_metadata(metadata: &Mat<f64>, column: usize) -> Result<Self, InputError> {
        if column >= metadata.ncols() {
            return Err(InputError::MissingSiteColumn {
                cols: metadata.ncols(),
                column,
            });
        }
        let mut ids = Vec::with_capacity(metadata.nrows());
        for row in 0..metadata.nrows() {
            let id = parse_one_based(metadata[(row, column)])
                .ok_or(InputError::InvalidSiteId { row })?;
            ids.push(id);
        }
        Self::from_one_based(&ids)
    }

    /// Number of individuals covered by the assignment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// 0-based site index of `individual`.
    ///
    /// # Panics
    ///
    /// Panics if `individual >= self.len()`.
    #[must_use]
    pub fn site(&self, individual: usize) -> usize {
        self.sites[individual]
    }

    /// Number of distinct sites implied by the largest id seen.
    #[must_use]
    pub const fn n_sites(&self) -> usize {
        self.n_sites
    }
}

/// One pool observation after index normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    positive: bool,
    assay: usize,
    members: Vec<usize>,
}

impl Pool {
    /// Whether the pooled specimen tested positive.
    #[must_use]
    pub const fn tested_positive(&self) -> bool {
        self.positive
    }

    /// 0-based index of the assay used for this pool.
    #[must_use]
    pub const fn assay(&self) -> usize {
        self.assay
    }

    /// 0-based indices of the pooled individuals.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of individuals in the pool.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// The full set of pool observations for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolObservations {
    pools: Vec<Pool>,
    n_assays: usize,
    n_individuals: usize,
}

impl PoolObservations {
    /// Normalize a raw pool matrix.
    ///
    /// Row layout per pool: column 0 holds the test outcome (any value
    /// greater than zero means positive), column 1 the pool size, column 2
    /// the 1-based assay id, and columns 3 onward the 1-based ids of the
    /// member individuals. Columns past `3 + size - 1` are ignored, so rows
    /// for pools of different sizes can share one padded matrix.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the matrix has fewer than three columns, a
    /// size/assay/member entry is not a valid integer, a pool is empty or
    /// larger than the available member columns, or an assay or member id
    /// falls outside `[1, n_assays]` / `[1, n_individuals]`.
    pub fn from_raw(
        raw: &Mat<f64>,
        n_individuals: usize,
        n_assays: usize,
    ) -> Result<Self, InputError> {
        if raw.ncols() < MEMBER_COLUMN_OFFSET {
            return Err(InputError::MissingPoolColumns {
                cols: raw.ncols(),
                required: MEMBER_COLUMN_OFFSET,
            });
        }
        let available = raw.ncols() - MEMBER_COLUMN_OFFSET;
        let mut pools = Vec::with_capacity(raw.nrows());
        for pool in 0..raw.nrows() {
            let outcome = raw[(pool, 0)];
            if !outcome.is_finite() {
                return Err(InputError::InvalidPoolEntry { pool, column: 0 });
            }
            let size =
                parse_count(raw[(pool, 1)]).ok_or(InputError::InvalidPoolEntry { pool, column: 1 })?;
            if size == 0 {
                return Err(InputError::EmptyPool { pool });
            }
            if size > available {
                return Err(InputError::PoolSizeExceedsColumns {
                    pool,
                    size,
                    available,
                });
            }
            let assay = parse_one_based(raw[(pool, 2)])
                .ok_or(InputError::InvalidPoolEntry { pool, column: 2 })?;
            if assay > n_assays {
                return Err(InputError::AssayIdOutOfRange {
                    pool,
                    assay,
                    n_assays,
                });
            }
            let mut members = Vec::with_capacity(size);
            for slot in 0..size {
                let column = MEMBER_COLUMN_OFFSET + slot;
                let member = parse_one_based(raw[(pool, column)])
                    .ok_or(InputError::InvalidPoolEntry { pool, column })?;
                if member > n_individuals {
                    return Err(InputError::MemberIdOutOfRange {
                        pool,
                        member,
                        n_individuals,
                    });
                }
                members.push(member - 1);
            }
            pools.push(Pool {
                positive: outcome > 0.0,
                assay: assay - 1,
                members,
            });
        }
        Ok(Self {
            pools,
            n_assays,
            n_individuals,
        })
    }

    /// Normalized pools, in raw-matrix row order.
    #[must_use]
    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Number of pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Number of assays the pools may reference.
    #[must_use]
    pub const fn n_assays(&self) -> usize {
        self.n_assays
    }

    /// Number of individuals the pools may reference.
    #[must_use]
    pub const fn n_individuals(&self) -> usize {
        self.n_individuals
    }
}

/// Parse a 1-based id stored as a float; `None` unless a positive integer.
fn parse_one_based(value: f64) -> Option<usize> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    value.to_usize().filter(|&id| id > 0)
}

/// Parse a non-negative count stored as a float.
fn parse_count(value: f64) -> Option<usize> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    value.to_usize()
}
