use std::path::PathBuf;

use crate::{FailurePolicy, RunState};

/// Counters and lists reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub state: RunState,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Inputs never dispatched because the run halted first.
    pub not_attempted: usize,
    pub failed_inputs: Vec<String>,
    pub artifacts: Vec<PathBuf>,
    /// Sources that could not be read or parsed.
    pub unreadable_sources: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, artifact: PathBuf) {
        self.succeeded += 1;
        self.artifacts.push(artifact);
    }

    pub fn record_failure(&mut self, input: &str) {
        self.failed += 1;
        self.failed_inputs.push(input.to_string());
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_not_attempted(&mut self, count: usize) {
        self.not_attempted += count;
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped + self.not_attempted
    }

    /// Human-readable report, one entry per line.
    pub fn report_lines(&self, policy: FailurePolicy) -> Vec<String> {
        let mut lines = vec![
            format!("Run {}", self.state),
            format!("Succeeded: {}", self.succeeded),
            format!("Failed: {}", self.failed),
            format!("Skipped (already processed): {}", self.skipped),
        ];
        if self.not_attempted > 0 {
            lines.push(format!(
                "Not attempted (credentials exhausted): {}",
                self.not_attempted
            ));
        }
        for path in &self.unreadable_sources {
            lines.push(format!("Unreadable source: {}", path.display()));
        }
        if !self.failed_inputs.is_empty() {
            match policy {
                FailurePolicy::RetryOnFailure => {
                    lines.push("Failed inputs (will retry next run):".to_string())
                }
                FailurePolicy::MarkAttempted => {
                    lines.push("Failed inputs (marked as attempted):".to_string())
                }
            }
            lines.extend(self.failed_inputs.iter().map(|id| format!("  - {id}")));
        }
        lines
    }
}
