//! Serializable rows for batch results.
//!
//! Two row schemas:
//! - [`BatchSummaryRow`] — one per batch run
//! - [`EntryRow`] — one per job, in submission order
//!
//! One backend: [`json_stream::JsonStreamSink`] writes newline-delimited JSON
//! to any `Write` impl.

pub mod json_stream;

use crate::reporter::Report;
use serde::Serialize;
use warden_core::{BatchResult, ErrorKind, Outcome};

// ---------------------------------------------------------------------------
// Serializable row types
// ---------------------------------------------------------------------------

/// One row per batch run — summary statistics.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummaryRow {
    pub total_jobs: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub fault_count: u32,
    pub elapsed_ms: u64,
}

/// One row per job.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRow {
    pub position: u32,
    pub name: String,
    /// `success` or `failure`.
    pub status: &'static str,
    pub fault: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Messages from the outermost node to the root cause.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,
}

/// Combined document for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct BatchDocument {
    pub summary: BatchSummaryRow,
    pub entries: Vec<EntryRow>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl Report {
    pub fn to_summary_row(&self) -> BatchSummaryRow {
        BatchSummaryRow {
            total_jobs: self.total_jobs as u32,
            success_count: self.success_count as u32,
            failure_count: self.failure_count as u32,
            fault_count: self.fault_count as u32,
            elapsed_ms: self.elapsed.as_millis() as u64,
        }
    }
}

/// Flatten every entry of `result` into sink-ready rows.
pub fn entry_rows(result: &BatchResult) -> Vec<EntryRow> {
    result
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| match &entry.outcome {
            Outcome::Success => EntryRow {
                position: (i + 1) as u32,
                name: entry.name.clone(),
                status: "success",
                fault: false,
                kind: None,
                message: None,
                chain: Vec::new(),
            },
            Outcome::Failure(err) => EntryRow {
                position: (i + 1) as u32,
                name: entry.name.clone(),
                status: "failure",
                fault: entry.outcome.is_fault(),
                kind: Some(err.kind()),
                message: Some(err.message().to_string()),
                chain: err.chain().map(|link| link.to_string()).collect(),
            },
        })
        .collect()
}

pub fn document(report: &Report, result: &BatchResult) -> BatchDocument {
    BatchDocument {
        summary: report.to_summary_row(),
        entries: entry_rows(result),
    }
}
