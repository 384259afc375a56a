//! Boot-time failures for the gateway binary.
//!
//! # Design
//! - One variant per boot stage; each carries the stage operation and its source.
//! - Messages are constant so log aggregation groups by stage, not by path.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for boot operations.
pub type AppResult<T> = Result<T, AppError>;

/// Reasons the gateway can fail to boot or stop serving.
#[derive(Debug, Error)]
pub enum AppError {
    /// Environment configuration was rejected.
    #[error("configuration rejected")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: encrypty_config::ConfigError,
    },
    /// Logging or metrics setup failed.
    #[error("telemetry setup failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: encrypty_telemetry::TelemetryError,
    },
    /// A data directory could not be prepared.
    #[error("data directory unavailable")]
    DataDir {
        /// Operation identifier.
        operation: &'static str,
        /// Directory involved.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The processed-files store could not be opened.
    #[error("processed store unavailable")]
    Store {
        /// Operation identifier.
        operation: &'static str,
        /// Source fsops error.
        source: encrypty_fsops::FsOpsError,
    },
    /// The HTTP listener failed.
    #[error("gateway listener failed")]
    Listener {
        /// Operation identifier.
        operation: &'static str,
        /// Source listener error.
        source: encrypty_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: encrypty_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: encrypty_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) fn data_dir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::DataDir {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn store(operation: &'static str, source: encrypty_fsops::FsOpsError) -> Self {
        Self::Store { operation, source }
    }

    pub(crate) const fn listener(
        operation: &'static str,
        source: encrypty_api::ApiServerError,
    ) -> Self {
        Self::Listener { operation, source }
    }
}
