//! JSON error wrapper returned by every failing handler.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use encrypty_engine::{EngineError, EngineOutcome};
use encrypty_fsops::FsOpsError;
use tracing::{debug, error, warn};

use crate::http::constants::{MSG_ENGINE_MISSING, MSG_INVALID_ACTION, MSG_TIMED_OUT};
use crate::models::ErrorResponse;

/// Structured API error rendered as `{ success: false, error, stdout?, stderr? }`.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) kind: &'static str,
    message: String,
    stdout: Option<String>,
    stderr: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
            stdout: None,
            stderr: None,
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }

    /// The engine ran to completion but reported failure.
    pub(crate) fn engine_failed(outcome: EngineOutcome) -> Self {
        warn!(
            exit_code = outcome.exit_code,
            stderr = %outcome.stderr,
            "engine reported failure"
        );
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "engine_failed",
            message: format!("Encryption/Decryption failed: {}", outcome.stderr),
            stdout: Some(outcome.stdout),
            stderr: Some(outcome.stderr),
        }
    }

    pub(crate) fn from_engine(err: &EngineError) -> Self {
        match err {
            EngineError::InvalidAction { .. } => Self::bad_request(MSG_INVALID_ACTION),
            EngineError::InvalidTarget { reason, .. } => {
                warn!(reason, "engine target rejected");
                Self::bad_request(format!("Invalid target path: {reason}"))
            }
            EngineError::NotFound { path } => {
                error!(path = %path.display(), "engine executable missing");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "engine_missing",
                    MSG_ENGINE_MISSING,
                )
            }
            EngineError::TimedOut { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "engine_timeout",
                MSG_TIMED_OUT,
            ),
            EngineError::Spawn { source, .. } | EngineError::Io { source, .. } => {
                error!(error = %err, source = %source, "engine execution failed");
                Self::internal(format!("Execution error: {err}: {source}"))
            }
            EngineError::Closed => {
                error!(error = %err, "engine execution failed");
                Self::internal(format!("Execution error: {err}"))
            }
        }
    }

    pub(crate) fn from_fsops(operation: &'static str, err: &FsOpsError) -> Self {
        match err {
            FsOpsError::InvalidInput { field, reason, .. } => {
                warn!(operation, field, reason, "request input rejected");
                Self::bad_request(format!("Invalid {field}: {reason}"))
            }
            FsOpsError::Io { source, path, .. } => {
                error!(operation, path = %path.display(), error = %source, "filesystem failure");
                Self::internal(format!("Server error: {err}: {source}"))
            }
            FsOpsError::Walkdir { source, path, .. } => {
                error!(operation, path = %path.display(), error = %source, "filesystem walk failure");
                Self::internal(format!("Server error: {err}: {source}"))
            }
        }
    }

    pub(crate) fn from_multipart(err: MultipartError) -> Self {
        let status = err.status();
        warn!(status = status.as_u16(), error = %err.body_text(), "multipart payload rejected");
        Self::new(status, "invalid_upload", format!("Invalid upload: {}", err.body_text()))
    }

    #[cfg(test)]
    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(status = self.status.as_u16(), kind = self.kind, "request failed");
        let body = ErrorResponse {
            success: false,
            error: self.message,
            stdout: self.stdout,
            stderr: self.stderr,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn engine_errors_map_to_taxonomy() {
        let missing = ApiError::from_engine(&EngineError::NotFound {
            path: PathBuf::from("/opt/engine/encrypt_decrypt"),
        });
        assert_eq!(missing.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(missing.kind, "engine_missing");

        let timed_out = ApiError::from_engine(&EngineError::TimedOut {
            timeout: Duration::from_secs(300),
        });
        assert_eq!(timed_out.kind, "engine_timeout");
        assert_eq!(timed_out.message(), MSG_TIMED_OUT);

        let action = ApiError::from_engine(&EngineError::InvalidAction {
            value: "shred".into(),
        });
        assert_eq!(action.status, StatusCode::BAD_REQUEST);

        let spawn = ApiError::from_engine(&EngineError::Spawn {
            path: PathBuf::from("engine"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });
        assert!(spawn.message().starts_with("Execution error: "));
    }

    #[test]
    fn engine_failure_carries_output_verbatim() {
        let err = ApiError::engine_failed(EngineOutcome {
            exit_code: 3,
            stdout: "partial\n".into(),
            stderr: "bad key\n".into(),
        });
        assert_eq!(err.message(), "Encryption/Decryption failed: bad key\n");
        assert_eq!(err.stderr.as_deref(), Some("bad key\n"));
        assert_eq!(err.stdout.as_deref(), Some("partial\n"));
    }

    #[test]
    fn fsops_errors_split_input_from_server_faults() {
        let invalid = ApiError::from_fsops(
            "download",
            &FsOpsError::InvalidInput {
                field: "filename",
                reason: "path_separator",
                value: None,
            },
        );
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let io_err = ApiError::from_fsops(
            "collect",
            &FsOpsError::Io {
                operation: "store.copy",
                path: PathBuf::from("/data/processed"),
                source: io::Error::other("disk full"),
            },
        );
        assert_eq!(io_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(io_err.message().starts_with("Server error: "));
    }
}
