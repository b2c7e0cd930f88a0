//! Built-in demo batch: plain jobs, a panicking job, and transactional jobs.

use thiserror::Error;
use warden_core::{AppError, Cause, ErrorKind, Job};
use warden_txn::run_in_transaction;

/// Driver-level failure the demo store raises.
#[derive(Debug, Error)]
#[error("db error: {message} ({query})")]
pub struct DbError {
    pub query: &'static str,
    pub message: &'static str,
}

pub fn jobs() -> Vec<Job> {
    vec![
        Job::new("fetch data", || Ok(())),
        Job::new("transform data", || {
            Err(AppError::validation("invalid format").with_detail("field", "payload"))
        }),
        Job::new("store data", || panic!("nil pointer dereference")),
        Job::new("insert users", || {
            run_in_transaction(|tx| {
                tx.stage("INSERT INTO users (email) VALUES ('a@example.com')")?;
                let db = DbError {
                    query: "INSERT INTO users",
                    message: "duplicate key",
                };
                Err(AppError::wrap_as(
                    ErrorKind::Internal,
                    Cause::opaque(db),
                    format!("{}: insert users", tx.id()),
                ))
            })
        }),
        Job::new("insert audit", || {
            run_in_transaction(|tx| {
                tx.stage("INSERT INTO audit (event) VALUES ('batch')")?;
                Ok(())
            })
        }),
        Job::new("send notification", || Ok(())),
    ]
}
