//! Route handlers for processing, downloads, and the landing page.

mod batch;
mod directory;
mod download;
mod landing;

pub(crate) use batch::process_batch;
pub(crate) use directory::process_directory;
pub(crate) use download::download;
pub(crate) use landing::{landing, route_not_found};

use std::str::FromStr;

use encrypty_engine::ProcessingAction;
use encrypty_fsops::FsOpsResult;
use tracing::error;

use crate::http::constants::MSG_INVALID_ACTION;
use crate::http::errors::ApiError;

/// Absent or blank selects `encrypt`; anything else must name an action.
pub(crate) fn parse_action(raw: Option<&str>) -> Result<ProcessingAction, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(ProcessingAction::default()),
        Some(value) => {
            ProcessingAction::from_str(value).map_err(|_| ApiError::bad_request(MSG_INVALID_ACTION))
        }
    }
}

/// Run filesystem work off the async workers and map its failure.
pub(crate) async fn blocking<T, F>(operation: &'static str, task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> FsOpsResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(|err| ApiError::from_fsops(operation, &err)),
        Err(err) => {
            error!(operation, error = %err, "blocking task failed");
            Err(ApiError::internal(format!("Server error: {err}")))
        }
    }
}

/// Await a detached pipeline task, surfacing panics as server errors.
pub(crate) async fn join_pipeline<T>(
    handle: tokio::task::JoinHandle<Result<T, ApiError>>,
) -> Result<T, ApiError> {
    handle.await.unwrap_or_else(|err| {
        error!(error = %err, "processing task failed");
        Err(ApiError::internal(format!("Server error: {err}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn parse_action_defaults_and_normalises() -> Result<(), ApiError> {
        assert_eq!(parse_action(None)?, ProcessingAction::Encrypt);
        assert_eq!(parse_action(Some("  "))?, ProcessingAction::Encrypt);
        assert_eq!(parse_action(Some("DeCrypt"))?, ProcessingAction::Decrypt);
        Ok(())
    }

    #[test]
    fn parse_action_rejects_unknown_verbs() {
        let err = parse_action(Some("shred")).err();
        assert_eq!(err.map(|err| err.status), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn blocking_maps_fsops_failures() {
        let result: Result<(), ApiError> = blocking("test", || {
            encrypty_fsops::validate_file_name("filename", "../x").map(|_| ())
        })
        .await;
        assert_eq!(result.err().map(|err| err.status), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn join_pipeline_reports_panics() {
        let handle = tokio::spawn(async {
            if true {
                panic!("pipeline exploded");
            }
            Ok::<(), ApiError>(())
        });
        let result = join_pipeline(handle).await;
        assert_eq!(
            result.err().map(|err| err.status),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }
}
