//! Job and batch result types.

use crate::error::{AppError, AppResult, ErrorKind};
use std::fmt;

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Zero-argument unit of work. `Fn`, so a job can be run more than once.
pub type Operation = Box<dyn Fn() -> AppResult<()>>;

/// A named operation submitted to a batch.
pub struct Job {
    name: String,
    operation: Operation,
}

impl Job {
    pub fn new<F>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn() -> AppResult<()> + 'static,
    {
        Self {
            name: name.into(),
            operation: Box::new(operation),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self) -> AppResult<()> {
        (self.operation)()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("name", &self.name).finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Outcome {
    Success,
    Failure(AppError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Failure produced by a fault boundary rather than a returned error.
    pub fn is_fault(&self) -> bool {
        matches!(self, Outcome::Failure(e) if e.kind() == ErrorKind::Fault)
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Outcome::Success => None,
            Outcome::Failure(e) => Some(e),
        }
    }
}

impl From<AppResult<()>> for Outcome {
    fn from(result: AppResult<()>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Failure(e),
        }
    }
}

#[derive(Debug)]
pub struct BatchEntry {
    pub name: String,
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// Batch result
// ---------------------------------------------------------------------------

/// Aggregate of one batch run. Entries keep submission order.
///
/// Counts only move through [`BatchResult::record`], so they always sum to
/// the entry classifications; [`BatchResult::check_invariants`] verifies it.
#[derive(Debug, Default)]
pub struct BatchResult {
    success_count: usize,
    failure_count: usize,
    fault_count: usize,
    entries: Vec<BatchEntry>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(jobs: usize) -> Self {
        Self {
            entries: Vec::with_capacity(jobs),
            ..Self::default()
        }
    }

    /// Append one classified outcome and return the recorded entry.
    pub fn record(&mut self, name: impl Into<String>, outcome: Outcome) -> &BatchEntry {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
            if outcome.is_fault() {
                self.fault_count += 1;
            }
        }
        let index = self.entries.len();
        self.entries.push(BatchEntry {
            name: name.into(),
            outcome,
        });
        &self.entries[index]
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn fault_count(&self) -> usize {
        self.fault_count
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| !e.outcome.is_success())
    }

    /// Counts must equal the classifications of the recorded entries.
    pub fn check_invariants(&self) -> AppResult<()> {
        let successes = self.entries.iter().filter(|e| e.outcome.is_success()).count();
        let faults = self.entries.iter().filter(|e| e.outcome.is_fault()).count();
        let failures = self.entries.len() - successes;

        if self.success_count + self.failure_count != self.entries.len() {
            return Err(AppError::internal(format!(
                "counts {} + {} do not cover {} entries",
                self.success_count,
                self.failure_count,
                self.entries.len()
            )));
        }
        if (self.success_count, self.failure_count, self.fault_count)
            != (successes, failures, faults)
        {
            return Err(AppError::internal(format!(
                "recorded {}/{}/{} but entries classify as {}/{}/{}",
                self.success_count,
                self.failure_count,
                self.fault_count,
                successes,
                failures,
                faults
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_classifies_outcomes() {
        let mut result = BatchResult::new();
        result.record("a", Outcome::Success);
        result.record("b", Outcome::Failure(AppError::validation("bad")));
        result.record("c", Outcome::Failure(AppError::fault("boom")));

        assert_eq!(result.success_count(), 1);
        assert_eq!(result.failure_count(), 2);
        assert_eq!(result.fault_count(), 1);
        assert_eq!(result.len(), 3);
        assert!(result.check_invariants().is_ok());

        let names: Vec<_> = result.failures().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn check_invariants_detects_drift() {
        let mut result = BatchResult::new();
        result.record("a", Outcome::Success);
        result.fault_count = 1;

        let err = result.check_invariants().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        result.fault_count = 0;
        result.success_count = 2;
        assert!(result.check_invariants().is_err());
    }

    #[test]
    fn empty_result_is_consistent() {
        let result = BatchResult::with_capacity(4);
        assert!(result.is_empty());
        assert!(result.check_invariants().is_ok());
    }

    #[test]
    fn job_runs_its_operation() {
        let ok = Job::new("ok", || Ok(()));
        let bad = Job::new("bad", || Err(AppError::not_found("gone")));
        assert_eq!(ok.name(), "ok");
        assert!(Outcome::from(ok.run()).is_success());
        assert!(!Outcome::from(bad.run()).is_fault());
        assert!(format!("{bad:?}").contains("bad"));
    }
}
