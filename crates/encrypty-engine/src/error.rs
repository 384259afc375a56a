//! # Design
//!
//! - Keep error messages constant; capture paths, operations, and limits as fields.
//! - A nonzero exit is not an error here: it is an [`crate::EngineOutcome`] the caller classifies.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures raised while locating, starting, or supervising the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The action keyword was not recognised.
    #[error("unsupported processing action")]
    InvalidAction {
        /// Value supplied by the caller.
        value: String,
    },
    /// The directive target cannot be expressed on the line protocol.
    #[error("invalid engine target path")]
    InvalidTarget {
        /// Offending path.
        path: PathBuf,
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// No executable exists at the expected location.
    #[error("engine executable not found")]
    NotFound {
        /// Location that was probed.
        path: PathBuf,
    },
    /// The operating system refused to start the executable.
    #[error("failed to start engine process")]
    Spawn {
        /// Executable that failed to start.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// IO failed while talking to a running engine.
    #[error("engine io failure")]
    Io {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The engine did not exit within its wall-clock budget and was killed.
    #[error("engine timed out")]
    TimedOut {
        /// Budget that was exceeded.
        timeout: Duration,
    },
    /// The concurrency gate was closed while waiting for a slot.
    #[error("engine runner is shutting down")]
    Closed,
}

impl EngineError {
    pub(crate) const fn io(operation: &'static str, source: io::Error) -> Self {
        Self::Io { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn engine_error_messages_are_constant() {
        let not_found = EngineError::NotFound {
            path: PathBuf::from("/opt/engine/encrypt_decrypt"),
        };
        assert_eq!(not_found.to_string(), "engine executable not found");
        assert!(not_found.source().is_none());

        let spawn = EngineError::Spawn {
            path: PathBuf::from("engine"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(spawn.to_string(), "failed to start engine process");
        assert!(spawn.source().is_some());

        let io_err = EngineError::io("engine.write_directive", io::Error::other("closed"));
        assert!(matches!(
            io_err,
            EngineError::Io {
                operation: "engine.write_directive",
                ..
            }
        ));

        let timed_out = EngineError::TimedOut {
            timeout: Duration::from_secs(300),
        };
        assert_eq!(timed_out.to_string(), "engine timed out");
    }
}
