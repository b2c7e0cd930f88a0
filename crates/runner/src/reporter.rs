//! Human-readable batch report.
//!
//! Takes a `BatchResult` and produces a boxed summary followed by one line
//! per job, with the full causal chain for every failure.

use warden_core::{BatchResult, ErrorKind, Outcome};

/// Report produced from a finished batch.
#[derive(Debug)]
pub struct Report {
    pub total_jobs: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub fault_count: usize,
    pub lines: Vec<ReportLine>,
    pub elapsed: std::time::Duration,
}

/// One job as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub position: usize,
    pub name: String,
    pub status: &'static str,
    pub kind: Option<ErrorKind>,
    pub chain: Option<String>,
}

impl Report {
    pub fn build(result: &BatchResult, elapsed: std::time::Duration) -> Self {
        let lines = result
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let (status, kind, chain) = match &entry.outcome {
                    Outcome::Success => ("OK", None, None),
                    Outcome::Failure(err) if err.kind() == ErrorKind::Fault => {
                        ("FAULT", Some(err.kind()), Some(err.render_chain()))
                    }
                    Outcome::Failure(err) => ("FAILED", Some(err.kind()), Some(err.render_chain())),
                };
                ReportLine {
                    position: i + 1,
                    name: entry.name.clone(),
                    status,
                    kind,
                    chain,
                }
            })
            .collect();

        Report {
            total_jobs: result.len(),
            success_count: result.success_count(),
            failure_count: result.failure_count(),
            fault_count: result.fault_count(),
            lines,
            elapsed,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push('\n');
        out.push_str("╔══════════════════════════════════════════════════════════════╗\n");
        out.push_str("║                     WARDEN BATCH REPORT                      ║\n");
        out.push_str("╠══════════════════════════════════════════════════════════════╣\n");
        out.push_str(&format!("║  Jobs:               {:>39} ║\n", self.total_jobs));
        out.push_str(&format!("║  Succeeded:          {:>39} ║\n", self.success_count));
        out.push_str(&format!("║  Failed:             {:>39} ║\n", self.failure_count));
        out.push_str(&format!("║    of which faults:  {:>39} ║\n", self.fault_count));
        out.push_str(&format!("║  Elapsed:            {:>39} ║\n", format!("{:?}", self.elapsed)));
        out.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        if self.lines.is_empty() {
            push_row(&mut out, "", "No jobs submitted.");
        }

        for line in &self.lines {
            let title = format!("{}. [{}] {}", line.position, line.status, line.name);
            push_row(&mut out, "", &title);
            if let (Some(kind), Some(chain)) = (line.kind, &line.chain) {
                push_row(&mut out, "   ", &format!("{kind}: {chain}"));
            }
        }

        out.push_str("╚══════════════════════════════════════════════════════════════╝\n");
        out
    }
}

/// Characters between `║  ` and the closing `║`.
const ROW_WIDTH: usize = 60;

/// Append `text` as bordered rows, wrapping onto continuation rows when it
/// does not fit.
fn push_row(out: &mut String, indent: &str, text: &str) {
    let width = ROW_WIDTH - indent.chars().count();
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = chars.chunks(width).peekable();
    if chunks.peek().is_none() {
        out.push_str(&format!("║  {:<1$}║\n", "", ROW_WIDTH));
    }
    for chunk in chunks {
        let piece: String = chunk.iter().collect();
        out.push_str(&format!("║  {indent}{piece:<width$}║\n"));
    }
}
