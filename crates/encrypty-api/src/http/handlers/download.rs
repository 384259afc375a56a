//! `GET /api/download/{filename}`: serve an artifact from the processed-files store.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use encrypty_fsops::FsOpsError;
use tracing::{debug, error};

use crate::http::constants::{MSG_FILE_NOT_FOUND, MSG_INVALID_FILENAME};
use crate::http::errors::ApiError;
use crate::state::ApiState;

pub(crate) async fn download(
    State(state): State<Arc<ApiState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let store = state.store.clone();
    let key = filename.clone();
    let resolved = tokio::task::spawn_blocking(move || store.resolve(&key))
        .await
        .map_err(|err| {
            error!(error = %err, "download lookup task failed");
            ApiError::internal(format!("Server error: {err}"))
        })?;
    let path = match resolved {
        Ok(Some(path)) => path,
        Ok(None) => {
            debug!(filename = %filename, "download miss");
            return Err(ApiError::not_found(MSG_FILE_NOT_FOUND));
        }
        Err(FsOpsError::InvalidInput { reason, .. }) => {
            debug!(filename = %filename, reason, "download name rejected");
            return Err(ApiError::bad_request(MSG_INVALID_FILENAME));
        }
        Err(err) => return Err(ApiError::from_fsops("download.resolve", &err)),
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found(MSG_FILE_NOT_FOUND));
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "failed to read artifact");
            return Err(ApiError::internal(format!("Server error: {err}")));
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        )
        .header(header::CONTENT_DISPOSITION, content_disposition(&filename))
        .body(Body::from(bytes))
        .map_err(|err| {
            error!(error = %err, "failed to build download response");
            ApiError::internal("failed to build download response")
        })
}

/// `attachment` with an ASCII fallback name plus the RFC 5987 UTF-8 form.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|ch| {
            if (ch.is_ascii_graphic() && ch != '"' && ch != '\\') || ch == ' ' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_disposition_escapes_awkward_names() {
        assert_eq!(
            content_disposition("a.txt"),
            "attachment; filename=\"a.txt\"; filename*=UTF-8''a.txt"
        );
        assert_eq!(
            content_disposition("my \"file\".txt"),
            "attachment; filename=\"my _file_.txt\"; filename*=UTF-8''my%20%22file%22.txt"
        );
        assert_eq!(
            content_disposition("résumé.pdf"),
            "attachment; filename=\"r_sum_.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
        );
    }
}
