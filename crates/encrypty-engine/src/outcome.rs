//! Captured results of an engine run and the states a run passes through.

use serde::Serialize;

/// Terminal record of an engine process that ran to exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineOutcome {
    /// Process exit code; `-1` when the process was ended by a signal.
    pub exit_code: i32,
    /// Captured standard output, decoded lossily as UTF-8.
    pub stdout: String,
    /// Captured standard error, decoded lossily as UTF-8.
    pub stderr: String,
}

impl EngineOutcome {
    /// Exit code 0 is the only success signal, whatever stderr contains.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Lifecycle of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    /// Nothing has been attempted yet.
    NotStarted,
    /// The process is alive and the directive has been sent.
    Running,
    /// The process exited on its own; see [`EngineOutcome::is_success`].
    Completed,
    /// The wall-clock budget elapsed and the process was killed.
    TimedOut,
    /// The executable was missing or could not be spawned.
    FailedToStart,
    /// Supervising the running process failed; the process was killed.
    Aborted,
}

impl InvocationState {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::TimedOut => "timed_out",
            Self::FailedToStart => "failed_to_start",
            Self::Aborted => "aborted",
        }
    }
}

/// Which gateway surface asked for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Uploaded files staged in a private workspace.
    Batch,
    /// A caller-supplied directory processed in place.
    Directory,
}

impl RunMode {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::Directory => "directory",
        }
    }
}
