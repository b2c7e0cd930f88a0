//! Sequential, fault-isolated batch execution.
//!
//! Jobs run strictly in submission order, one at a time, each behind its own
//! fault boundary. A failing or panicking job is recorded and the loop moves
//! on; nothing a job does can halt the batch.

use crate::boundary;
use warden_core::{BatchEntry, BatchResult, Job, Outcome};

/// Run every job and aggregate the outcomes.
pub fn run_batch(jobs: &[Job]) -> BatchResult {
    run_batch_with(jobs, |_| {})
}

/// Like [`run_batch`], calling `on_entry` after each job is recorded.
pub fn run_batch_with<F>(jobs: &[Job], mut on_entry: F) -> BatchResult
where
    F: FnMut(&BatchEntry),
{
    tracing::info!(jobs = jobs.len(), "batch started");
    let mut result = BatchResult::with_capacity(jobs.len());

    for (position, job) in jobs.iter().enumerate() {
        tracing::debug!(position, job = job.name(), "running");
        let outcome = Outcome::from(boundary::execute(|| job.run()));

        match &outcome {
            Outcome::Success => tracing::debug!(job = job.name(), "succeeded"),
            Outcome::Failure(err) => tracing::warn!(
                job = job.name(),
                kind = %err.kind(),
                fault = outcome.is_fault(),
                error = %err.render_chain(),
                "failed"
            ),
        }

        let entry = result.record(job.name(), outcome);
        on_entry(entry);
    }

    if let Err(err) = result.check_invariants() {
        tracing::error!(error = %err, "batch accounting mismatch");
    }
    debug_assert_eq!(result.len(), jobs.len());

    tracing::info!(
        succeeded = result.success_count(),
        failed = result.failure_count(),
        faults = result.fault_count(),
        "batch finished"
    );
    result
}
