//! Environment loading for [`ServerConfig`].
//!
//! # Design
//! - Parsing runs against an injectable lookup so tests never touch process env.
//! - Absent variables fall back to defaults; malformed ones are errors.

use tracing::debug;

use crate::error::ConfigResult;
use crate::model::ServerConfig;
use crate::validate::{
    parse_bind_addr, parse_collision_policy, parse_extensions, parse_log_format,
    parse_non_empty, parse_path, parse_port, parse_positive_usize, parse_timeout,
};

/// Listener interface.
pub const ENV_BIND_ADDR: &str = "ENCRYPTY_BIND_ADDR";
/// Listener port.
pub const ENV_HTTP_PORT: &str = "ENCRYPTY_HTTP_PORT";
/// Data root.
pub const ENV_DATA_DIR: &str = "ENCRYPTY_DATA_DIR";
/// Engine installation directory.
pub const ENV_ENGINE_DIR: &str = "ENCRYPTY_ENGINE_DIR";
/// Engine executable stem.
pub const ENV_ENGINE_NAME: &str = "ENCRYPTY_ENGINE_NAME";
/// Engine timeout in seconds.
pub const ENV_ENGINE_TIMEOUT_SECS: &str = "ENCRYPTY_ENGINE_TIMEOUT_SECS";
/// Concurrent engine process limit.
pub const ENV_MAX_CONCURRENT_JOBS: &str = "ENCRYPTY_MAX_CONCURRENT_JOBS";
/// Request body limit in bytes.
pub const ENV_MAX_UPLOAD_BYTES: &str = "ENCRYPTY_MAX_UPLOAD_BYTES";
/// Comma separated upload extension allow-list.
pub const ENV_ALLOWED_EXTENSIONS: &str = "ENCRYPTY_ALLOWED_EXTENSIONS";
/// Processed-store collision policy.
pub const ENV_COLLISION_POLICY: &str = "ENCRYPTY_COLLISION_POLICY";
/// Default log level.
pub const ENV_LOG_LEVEL: &str = "ENCRYPTY_LOG_LEVEL";
/// Log output format.
pub const ENV_LOG_FORMAT: &str = "ENCRYPTY_LOG_FORMAT";

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any present variable holds an invalid value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if any present variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BIND_ADDR) {
            config.bind_addr = parse_bind_addr(ENV_BIND_ADDR, &raw)?;
        }
        if let Some(raw) = lookup(ENV_HTTP_PORT) {
            config.http_port = parse_port(ENV_HTTP_PORT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DATA_DIR) {
            config.data_dir = parse_path(ENV_DATA_DIR, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_UPLOAD_BYTES) {
            config.max_upload_bytes = parse_positive_usize(ENV_MAX_UPLOAD_BYTES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ALLOWED_EXTENSIONS) {
            config.allowed_extensions = parse_extensions(ENV_ALLOWED_EXTENSIONS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_COLLISION_POLICY) {
            config.collision_policy = parse_collision_policy(ENV_COLLISION_POLICY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ENGINE_DIR) {
            config.engine.install_dir = parse_path(ENV_ENGINE_DIR, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ENGINE_NAME) {
            config.engine.executable_name = parse_non_empty(ENV_ENGINE_NAME, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ENGINE_TIMEOUT_SECS) {
            config.engine.timeout = parse_timeout(ENV_ENGINE_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_CONCURRENT_JOBS) {
            config.engine.max_concurrent = parse_positive_usize(ENV_MAX_CONCURRENT_JOBS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = parse_non_empty(ENV_LOG_LEVEL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.logging.format = Some(parse_log_format(ENV_LOG_FORMAT, &raw)?);
        }

        debug!(
            addr = %config.socket_addr(),
            data_dir = %config.data_dir.display(),
            engine_dir = %config.engine.install_dir.display(),
            collision_policy = config.collision_policy.as_str(),
            "configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::model::{CollisionPolicy, LogFormatPreference};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() -> ConfigResult<()> {
        let config = ServerConfig::from_lookup(|_| None)?;
        assert_eq!(config, ServerConfig::default());
        Ok(())
    }

    #[test]
    fn every_variable_is_honoured() -> ConfigResult<()> {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (ENV_BIND_ADDR, "127.0.0.1"),
            (ENV_HTTP_PORT, "9090"),
            (ENV_DATA_DIR, "/srv/encrypty"),
            (ENV_ENGINE_DIR, "/opt/engine"),
            (ENV_ENGINE_NAME, "cryptor"),
            (ENV_ENGINE_TIMEOUT_SECS, "12"),
            (ENV_MAX_CONCURRENT_JOBS, "2"),
            (ENV_MAX_UPLOAD_BYTES, "1024"),
            (ENV_ALLOWED_EXTENSIONS, "txt,md"),
            (ENV_COLLISION_POLICY, "rename"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_FORMAT, "json"),
        ]))?;

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(config.processed_dir(), PathBuf::from("/srv/encrypty/processed"));
        assert_eq!(config.engine_dir(), PathBuf::from("/opt/engine").as_path());
        assert_eq!(config.engine.executable_name, "cryptor");
        assert_eq!(config.engine.timeout, Duration::from_secs(12));
        assert_eq!(config.engine.max_concurrent, 2);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.allowed_extensions, vec!["md", "txt"]);
        assert_eq!(config.collision_policy, CollisionPolicy::Rename);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, Some(LogFormatPreference::Json));
        Ok(())
    }

    #[test]
    fn malformed_values_fail_instead_of_defaulting() {
        let err = ServerConfig::from_lookup(lookup_from(&[(ENV_HTTP_PORT, "http")]));
        assert_eq!(
            err,
            Err(ConfigError::InvalidField {
                field: ENV_HTTP_PORT,
                reason: "out_of_range",
                value: Some("http".to_string()),
            })
        );

        let err = ServerConfig::from_lookup(lookup_from(&[(ENV_MAX_CONCURRENT_JOBS, "0")]));
        assert!(matches!(
            err,
            Err(ConfigError::InvalidField {
                field: ENV_MAX_CONCURRENT_JOBS,
                ..
            })
        ));
    }
}
