//! `POST /api/process-directory`: run the engine in place over a caller's directory.
//!
//! The directory is rewritten by the engine with no pre-image kept; callers own
//! any backup. Validation rejects missing or non-directory paths before the
//! engine is consulted.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use encrypty_engine::{EngineDirective, ProcessingAction, RunMode};
use encrypty_fsops::count_files;
use tracing::{Instrument, Span, info, warn};

use crate::http::constants::{MSG_INVALID_DIRECTORY, MSG_INVALID_JSON, MSG_NO_DIRECTORY};
use crate::http::errors::ApiError;
use crate::http::handlers::{blocking, join_pipeline, parse_action};
use crate::models::{DirectoryRequest, DirectoryResponse};
use crate::state::ApiState;

pub(crate) async fn process_directory(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<DirectoryRequest>, JsonRejection>,
) -> Result<Json<DirectoryResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "directory request body rejected");
        ApiError::bad_request(MSG_INVALID_JSON)
    })?;

    let raw = request.directory.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ApiError::bad_request(MSG_NO_DIRECTORY));
    }
    let action = parse_action(request.action.as_deref())?;
    let directory = resolve_directory(raw).await?;
    let directive = EngineDirective::new(&directory, action)
        .map_err(|_| ApiError::bad_request(MSG_INVALID_DIRECTORY))?;

    let pipeline = run_directory(Arc::clone(&state), directive).instrument(Span::current());
    join_pipeline(tokio::spawn(pipeline)).await.map(Json)
}

async fn resolve_directory(raw: &str) -> Result<PathBuf, ApiError> {
    match tokio::fs::canonicalize(raw).await {
        Ok(path) if path.is_dir() => Ok(path),
        Ok(path) => {
            warn!(path = %path.display(), "directory request names a non-directory");
            Err(ApiError::bad_request(MSG_INVALID_DIRECTORY))
        }
        Err(err) => {
            warn!(path = raw, error = %err, "directory request path does not resolve");
            Err(ApiError::bad_request(MSG_INVALID_DIRECTORY))
        }
    }
}

async fn run_directory(
    state: Arc<ApiState>,
    directive: EngineDirective,
) -> Result<DirectoryResponse, ApiError> {
    let outcome = state
        .runner
        .run(&directive, RunMode::Directory)
        .await
        .map_err(|err| ApiError::from_engine(&err))?;
    if !outcome.is_success() {
        return Err(ApiError::engine_failed(outcome));
    }

    let target = directive.target().to_path_buf();
    let file_count = blocking("directory.count", move || count_files(&target)).await?;
    let action: ProcessingAction = directive.action();
    info!(
        action = action.as_str(),
        directory = %directive.target().display(),
        file_count,
        "directory processed"
    );
    Ok(DirectoryResponse {
        success: true,
        message: format!("Successfully {} files in directory", action.past_tense()),
        file_count,
        output: outcome.stdout,
    })
}
