use std::fmt;
use std::str::FromStr;

/// Result of dispatching one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
    Skipped,
}

/// Lifecycle of a single input within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Pending,
    Skipped,
    Generating,
    Succeeded,
    Failed,
}

/// Lifecycle of a whole batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    /// Every credential hit its quota; remaining inputs were left for a later run.
    Halted,
    Crashed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Running => write!(f, "running"),
            RunState::Completed => write!(f, "completed"),
            RunState::Halted => write!(f, "halted (all credentials exhausted)"),
            RunState::Crashed => write!(f, "crashed"),
        }
    }
}

/// Whether an input whose generation failed is recorded as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave failed inputs untracked so the next run tries them again.
    #[default]
    RetryOnFailure,
    /// Track failed inputs too; they are never retried.
    MarkAttempted,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::RetryOnFailure => write!(f, "retry"),
            FailurePolicy::MarkAttempted => write!(f, "mark-attempted"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retry" | "retry-on-failure" => Ok(FailurePolicy::RetryOnFailure),
            "mark-attempted" | "mark" => Ok(FailurePolicy::MarkAttempted),
            other => Err(format!(
                "unknown failure policy '{other}' (expected 'retry' or 'mark-attempted')"
            )),
        }
    }
}
