//! Errors for workspace staging, store writes, and output traversal.
//!
//! Messages stay constant; the operation tag and path live in fields.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for filesystem operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced while staging uploads or collecting engine output.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// A read, write, rename, or removal failed.
    #[error("filesystem operation failed")]
    Io {
        /// Operation tag such as `store.persist`.
        operation: &'static str,
        /// Path being touched.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Walking engine output failed part-way.
    #[error("output traversal failed")]
    Walkdir {
        /// Operation tag such as `collect.walk`.
        operation: &'static str,
        /// Root of the walk.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// A caller-supplied name was refused.
    #[error("file name rejected")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: &'static str, value: &str) -> Self {
        Self::InvalidInput {
            field,
            reason,
            value: Some(value.to_string()),
        }
    }

    /// Whether a caller-supplied name was at fault.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
