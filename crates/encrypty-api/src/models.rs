//! Request and response bodies for the gateway.

use serde::{Deserialize, Serialize};

/// Successful batch submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Names written to the processed-files store, in collection order.
    pub files: Vec<String>,
    /// Raw engine stdout.
    pub output: String,
}

/// Directory-reference submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRequest {
    /// Directory to process in place.
    #[serde(default)]
    pub directory: Option<String>,
    /// `encrypt` or `decrypt`; defaults to `encrypt`.
    #[serde(default)]
    pub action: Option<String>,
}

/// Successful directory-reference submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Regular files found under the directory after the engine finished.
    pub file_count: usize,
    /// Raw engine stdout.
    pub output: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Message for the caller.
    pub error: String,
    /// Engine stdout when the engine ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    /// Engine stderr when the engine exited nonzero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

/// Liveness summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` while the server is answering.
    pub status: String,
    /// Whether the engine executable is currently present.
    pub engine_available: bool,
    /// Engine processes running right now.
    pub active_runs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_response_omits_absent_engine_output() -> serde_json::Result<()> {
        let body = ErrorResponse {
            success: false,
            error: "File not found".to_string(),
            stdout: None,
            stderr: None,
        };
        assert_eq!(
            serde_json::to_value(&body)?,
            json!({"success": false, "error": "File not found"})
        );
        Ok(())
    }

    #[test]
    fn directory_request_fields_are_optional() -> serde_json::Result<()> {
        let request: DirectoryRequest = serde_json::from_str("{}")?;
        assert_eq!(request, DirectoryRequest::default());
        let request: DirectoryRequest =
            serde_json::from_str(r#"{"directory": "/srv/data", "action": "DECRYPT"}"#)?;
        assert_eq!(request.directory.as_deref(), Some("/srv/data"));
        assert_eq!(request.action.as_deref(), Some("DECRYPT"));
        Ok(())
    }
}
