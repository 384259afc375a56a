//! Baseline values applied when an environment variable is absent.

use std::time::Duration;

/// Default listener address (all interfaces).
pub const BIND_ADDR: [u8; 4] = [0, 0, 0, 0];
/// Default listener port.
pub const HTTP_PORT: u16 = 5000;
/// Root for the staging area and the processed-files store.
pub const DATA_DIR: &str = "./data";
/// Subdirectory of the data root holding per-request workspaces.
pub const UPLOADS_DIR_NAME: &str = "uploads";
/// Subdirectory of the data root holding downloadable artifacts.
pub const PROCESSED_DIR_NAME: &str = "processed";
/// Directory the engine executable lives in and runs from.
pub const ENGINE_DIR: &str = "./engine";
/// Engine executable stem; the platform suffix is appended at lookup time.
pub const ENGINE_NAME: &str = "encrypt_decrypt";
/// Wall-clock budget for a single engine run.
pub const ENGINE_TIMEOUT: Duration = Duration::from_secs(300);
/// Upper bound accepted for `ENCRYPTY_ENGINE_TIMEOUT_SECS`.
pub const MAX_ENGINE_TIMEOUT_SECS: u64 = 3600;
/// Engine processes allowed to run at once.
pub const MAX_CONCURRENT_JOBS: usize = 4;
/// Largest request body accepted by the gateway.
pub const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;
/// Log level used when neither `ENCRYPTY_LOG_LEVEL` nor `RUST_LOG` is set.
pub const LOG_LEVEL: &str = "info";
/// Extensions accepted for uploaded files.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "doc", "docx", "jpg", "jpeg", "png", "gif", "zip", "bin",
];
