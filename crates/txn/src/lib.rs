//! Scoped transactions with exactly-once commit-or-rollback.

pub mod scope;
pub mod transaction;

pub use scope::run_in_transaction;
pub use transaction::{RollbackOutcome, Transaction, TxState};
