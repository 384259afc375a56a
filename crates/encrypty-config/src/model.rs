//! Typed settings consumed by the gateway, engine runner, and filesystem layer.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::defaults;

/// What the processed-files store does when an artifact name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Replace the existing artifact; the last successful run wins.
    #[default]
    Overwrite,
    /// Keep the existing artifact and store the new one under a numbered name.
    Rename,
}

impl CollisionPolicy {
    /// Stable string form used in logs and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Rename => "rename",
        }
    }
}

/// Requested log output format; `None` in [`LoggingSettings`] defers to the build profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormatPreference {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

/// Logging knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Explicit output format, if configured.
    pub format: Option<LogFormatPreference>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

/// Location and limits of the external engine process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSettings {
    /// Directory holding the executable; also the engine's working directory.
    pub install_dir: PathBuf,
    /// Executable stem without the platform suffix.
    pub executable_name: String,
    /// Wall-clock budget before the process is killed.
    pub timeout: Duration,
    /// Maximum number of engine processes running at once.
    pub max_concurrent: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from(defaults::ENGINE_DIR),
            executable_name: defaults::ENGINE_NAME.to_string(),
            timeout: defaults::ENGINE_TIMEOUT,
            max_concurrent: defaults::MAX_CONCURRENT_JOBS,
        }
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    /// Interface the HTTP listener binds to.
    pub bind_addr: IpAddr,
    /// HTTP listener port (never zero).
    pub http_port: u16,
    /// Root holding the staging area and the processed-files store.
    pub data_dir: PathBuf,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
    /// Lowercase file extensions accepted for upload.
    pub allowed_extensions: Vec<String>,
    /// Name collision handling for the processed-files store.
    pub collision_policy: CollisionPolicy,
    /// External engine settings.
    pub engine: EngineSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from(defaults::BIND_ADDR),
            http_port: defaults::HTTP_PORT,
            data_dir: PathBuf::from(defaults::DATA_DIR),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            allowed_extensions: defaults::ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            collision_policy: CollisionPolicy::default(),
            engine: EngineSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Address the HTTP listener binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }

    /// Root under which per-request workspaces are created.
    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join(defaults::UPLOADS_DIR_NAME)
    }

    /// Flat directory holding downloadable artifacts.
    #[must_use]
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join(defaults::PROCESSED_DIR_NAME)
    }

    /// Convenience accessor for the engine installation directory.
    #[must_use]
    pub fn engine_dir(&self) -> &Path {
        &self.engine.install_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_places_stores_under_data_dir() {
        let config = ServerConfig::default();
        assert_eq!(config.uploads_dir(), PathBuf::from("./data/uploads"));
        assert_eq!(config.processed_dir(), PathBuf::from("./data/processed"));
        assert_eq!(config.socket_addr().port(), 5000);
        assert_eq!(config.engine.timeout, Duration::from_secs(300));
        assert!(config.allowed_extensions.iter().any(|ext| ext == "docx"));
    }

    #[test]
    fn collision_policy_serializes_snake_case() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&CollisionPolicy::Rename)?, "\"rename\"");
        assert_eq!(CollisionPolicy::default().as_str(), "overwrite");
        Ok(())
    }
}
