//! `POST /api/encrypt`: stage uploads, run the engine, collect results.
//!
//! # Design
//! - Validation (field presence, filename policy, action) completes before any
//!   filesystem or process work, so rejected requests never reach the engine.
//! - Stage, run, collect, and cleanup execute in a detached task that owns the
//!   workspace; a dropped connection cannot kill the engine or pull the directory
//!   out from under it.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use encrypty_engine::{EngineDirective, EngineOutcome, ProcessingAction, RunMode};
use encrypty_fsops::{FsOpsResult, Workspace, collect_into_store};
use tracing::{Instrument, Span, debug, info, warn};

use crate::http::constants::{
    FIELD_ACTION, FIELD_FILES, MSG_NO_FILES, MSG_NO_SELECTION, MSG_NO_VALID_FILES,
};
use crate::http::errors::ApiError;
use crate::http::handlers::{blocking, join_pipeline, parse_action};
use crate::models::BatchResponse;
use crate::state::ApiState;

#[derive(Debug)]
struct Upload {
    name: String,
    bytes: Bytes,
}

#[derive(Debug, Default)]
struct BatchForm {
    files: Vec<Upload>,
    action: Option<String>,
}

pub(crate) async fn process_batch(
    State(state): State<Arc<ApiState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Ok(multipart) = multipart else {
        return Err(ApiError::bad_request(MSG_NO_FILES));
    };
    let form = read_form(multipart).await?;
    let action = parse_action(form.action.as_deref())?;
    let uploads = select_uploads(&state, form.files)?;

    let pipeline = run_batch(Arc::clone(&state), uploads, action).instrument(Span::current());
    join_pipeline(tokio::spawn(pipeline)).await.map(Json)
}

async fn read_form(mut multipart: Multipart) -> Result<BatchForm, ApiError> {
    let mut form = BatchForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ApiError::from_multipart)?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some(FIELD_FILES) => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(ApiError::from_multipart)?;
                form.files.push(Upload { name, bytes });
            }
            Some(FIELD_ACTION) => {
                form.action = Some(field.text().await.map_err(ApiError::from_multipart)?);
            }
            other => debug!(field = ?other, "ignoring unexpected multipart field"),
        }
    }
    Ok(form)
}

fn select_uploads(state: &ApiState, files: Vec<Upload>) -> Result<Vec<Upload>, ApiError> {
    if files.is_empty() {
        return Err(ApiError::bad_request(MSG_NO_FILES));
    }
    if files.iter().all(|upload| upload.name.is_empty()) {
        return Err(ApiError::bad_request(MSG_NO_SELECTION));
    }

    let total = files.len();
    let accepted: Vec<Upload> = files
        .into_iter()
        .filter(|upload| match state.policy.check(&upload.name) {
            Ok(()) => true,
            Err(err) => {
                warn!(filename = %upload.name, error = ?err, "upload rejected by filename policy");
                false
            }
        })
        .collect();
    state.telemetry.add_rejected_files(total - accepted.len());

    if accepted.is_empty() {
        return Err(ApiError::bad_request(MSG_NO_VALID_FILES));
    }
    Ok(accepted)
}

async fn run_batch(
    state: Arc<ApiState>,
    uploads: Vec<Upload>,
    action: ProcessingAction,
) -> Result<BatchResponse, ApiError> {
    let root = state.uploads_root.clone();
    let workspace = blocking("batch.stage", move || stage_uploads(&root, &uploads)).await?;
    state.telemetry.add_staged_files(workspace.staged().len());

    let result = execute(&state, workspace.path(), action).await;
    release(workspace).await;

    let (outcome, files) = result?;
    state.telemetry.add_collected_files(files.len());
    info!(
        action = action.as_str(),
        files = files.len(),
        "batch processed"
    );
    Ok(BatchResponse {
        success: true,
        message: format!(
            "Successfully {} {} file(s)",
            action.past_tense(),
            files.len()
        ),
        files,
        output: outcome.stdout,
    })
}

fn stage_uploads(root: &Path, uploads: &[Upload]) -> FsOpsResult<Workspace> {
    let mut workspace = Workspace::create(root)?;
    for upload in uploads {
        workspace.stage(&upload.name, &upload.bytes)?;
    }
    Ok(workspace)
}

async fn execute(
    state: &ApiState,
    workspace: &Path,
    action: ProcessingAction,
) -> Result<(EngineOutcome, Vec<String>), ApiError> {
    let directive =
        EngineDirective::new(workspace, action).map_err(|err| ApiError::from_engine(&err))?;
    let outcome = state
        .runner
        .run(&directive, RunMode::Batch)
        .await
        .map_err(|err| ApiError::from_engine(&err))?;
    if !outcome.is_success() {
        return Err(ApiError::engine_failed(outcome));
    }

    let source = workspace.to_path_buf();
    let store = state.store.clone();
    let files = blocking("batch.collect", move || collect_into_store(&source, &store)).await?;
    Ok((outcome, files))
}

async fn release(workspace: Workspace) {
    match tokio::task::spawn_blocking(move || workspace.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => debug!(error = %err, "workspace left behind after close failure"),
        Err(err) => warn!(error = %err, "workspace cleanup task failed"),
    }
}
