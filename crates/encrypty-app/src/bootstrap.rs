use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use encrypty_api::{ApiServer, ApiState};
use encrypty_config::{LogFormatPreference, ServerConfig};
use encrypty_engine::{EngineRunner, ProcessEngine};
use encrypty_fsops::{FilenamePolicy, ProcessedStore};
use encrypty_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Build identifier stamped at compile time, falling back to the crate version.
const BUILD_ID: &str = match option_env!("ENCRYPTY_BUILD_SHA") {
    Some(sha) => sha,
    None => env!("CARGO_PKG_VERSION"),
};

/// Wired gateway ready to bind.
pub(crate) struct Gateway {
    pub(crate) server: ApiServer,
    pub(crate) addr: SocketAddr,
}

/// Entry point for the Encrypty boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, logging, store setup, or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let config = ServerConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
    let logging = LoggingConfig {
        level: &config.logging.level,
        format: log_format(config.logging.format),
        build_sha: BUILD_ID,
    };
    encrypty_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("encrypty");

    info!("Encrypty gateway bootstrap starting");
    let gateway = build_gateway(&config)?;
    info!(addr = %gateway.addr, "Launching API listener");
    gateway
        .server
        .serve_with_shutdown(gateway.addr, shutdown_signal())
        .await
        .map_err(|err| AppError::listener("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

/// Create the data directories and wire every collaborator from `config`.
pub(crate) fn build_gateway(config: &ServerConfig) -> AppResult<Gateway> {
    let uploads = config.uploads_dir();
    fs::create_dir_all(&uploads).map_err(|err| AppError::data_dir("uploads_dir.create", &uploads, err))?;
    let store = ProcessedStore::open(config.processed_dir(), config.collision_policy)
        .map_err(|err| AppError::store("processed_store.open", err))?;

    let mut engine_settings = config.engine.clone();
    engine_settings.install_dir = std::path::absolute(&config.engine.install_dir)
        .map_err(|err| AppError::data_dir("engine_dir.resolve", &config.engine.install_dir, err))?;

    let telemetry = Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let engine = ProcessEngine::from_settings(&engine_settings, telemetry.clone());
    if engine.is_available() {
        info!(
            path = %engine.locator().executable_path().display(),
            timeout_secs = engine_settings.timeout.as_secs(),
            max_concurrent = engine_settings.max_concurrent,
            "engine executable located"
        );
    } else {
        warn!(
            path = %engine.locator().executable_path().display(),
            "engine executable not found; processing requests will fail until it is built"
        );
    }

    let state = ApiState::new(
        Arc::new(engine),
        store,
        FilenamePolicy::new(&config.allowed_extensions),
        uploads,
        telemetry,
    );
    Ok(Gateway {
        server: ApiServer::new(state, config.max_upload_bytes),
        addr: config.socket_addr(),
    })
}

const fn log_format(preference: Option<LogFormatPreference>) -> LogFormat {
    match preference {
        Some(LogFormatPreference::Json) => LogFormat::Json,
        Some(LogFormatPreference::Pretty) => LogFormat::Pretty,
        None => LogFormat::infer(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use encrypty_test_support::fixtures::MockEngine;
    use tower::ServiceExt;

    fn config_in(data: &std::path::Path, engine_dir: &std::path::Path) -> ServerConfig {
        let mut config = ServerConfig {
            data_dir: data.to_path_buf(),
            ..ServerConfig::default()
        };
        config.engine.install_dir = engine_dir.to_path_buf();
        config
    }

    #[test]
    fn log_format_follows_preference() {
        assert_eq!(log_format(Some(LogFormatPreference::Json)), LogFormat::Json);
        assert_eq!(log_format(Some(LogFormatPreference::Pretty)), LogFormat::Pretty);
        assert_eq!(log_format(None), LogFormat::infer());
    }

    #[test]
    fn build_id_is_stamped_at_compile_time() {
        assert!(!BUILD_ID.is_empty());
        match option_env!("ENCRYPTY_BUILD_SHA") {
            Some(sha) => assert_eq!(BUILD_ID, sha),
            None => assert_eq!(BUILD_ID, env!("CARGO_PKG_VERSION")),
        }
    }

    #[tokio::test]
    async fn build_gateway_creates_stores_and_tolerates_missing_engine() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let config = config_in(&scratch.path().join("data"), &scratch.path().join("engine"));

        let gateway = build_gateway(&config)?;
        assert_eq!(gateway.addr, config.socket_addr());
        assert!(config.uploads_dir().is_dir());
        assert!(config.processed_dir().is_dir());

        let response = gateway
            .server
            .router()
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["engine_available"], false);
        Ok(())
    }

    #[tokio::test]
    async fn build_gateway_detects_installed_engine() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let engine = MockEngine::install("exit 0\n")?;
        let config = config_in(&scratch.path().join("data"), engine.dir());

        let gateway = build_gateway(&config)?;
        let response = gateway
            .server
            .router()
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty())?)
            .await?;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["engine_available"], true);
        Ok(())
    }

    #[test]
    fn build_gateway_reports_unusable_data_dir() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let blocker = scratch.path().join("data");
        fs::write(&blocker, "not a directory")?;
        let config = config_in(&blocker, scratch.path());

        let result = build_gateway(&config);
        assert!(matches!(
            result,
            Err(AppError::DataDir {
                operation: "uploads_dir.create",
                ..
            })
        ));
        Ok(())
    }
}
