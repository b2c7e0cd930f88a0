//! Error taxonomy, cause chains, and batch result types.
//!
//! Foundation crate -- no I/O dependencies.

pub mod error;
pub mod types;

pub use error::{
    AppError, AppResult, Cause, Chain, ErrorKind, Link, Sentinel, ALREADY_COMMITTED,
    ALREADY_ROLLED_BACK, NOT_FOUND, UNAUTHORIZED,
};
pub use types::{BatchEntry, BatchResult, Job, Operation, Outcome};
