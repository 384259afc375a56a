//! Telemetry setup and exposition failures.

use prometheus::Error as PrometheusError;
use thiserror::Error;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised while installing logging or serving metrics.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed, or installation failed.
    #[error("failed to install tracing subscriber")]
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
    /// A collector could not be built or added to the registry.
    #[error("failed to set up metrics collector")]
    Collector {
        /// Metric name.
        name: &'static str,
        /// `build` or `register`.
        stage: &'static str,
        /// Underlying Prometheus error.
        #[source]
        source: PrometheusError,
    },
    /// Rendering the text exposition failed.
    #[error("failed to render metrics")]
    Render {
        /// Underlying Prometheus error.
        #[source]
        source: PrometheusError,
    },
    /// The rendered exposition was not UTF-8.
    #[error("metrics output was not valid utf-8")]
    RenderUtf8 {
        /// Underlying conversion error.
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl TelemetryError {
    pub(crate) const fn collector(
        name: &'static str,
        stage: &'static str,
        source: PrometheusError,
    ) -> Self {
        Self::Collector {
            name,
            stage,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn collector_error_carries_stage() {
        let err = TelemetryError::collector(
            "engine_runs_total",
            "register",
            PrometheusError::AlreadyReg,
        );
        assert_eq!(err.to_string(), "failed to set up metrics collector");
        assert!(matches!(
            err,
            TelemetryError::Collector {
                name: "engine_runs_total",
                stage: "register",
                ..
            }
        ));
    }

    #[test]
    fn render_errors_expose_sources() -> anyhow::Result<()> {
        let Err(utf8) = String::from_utf8(vec![0, 159]) else {
            anyhow::bail!("expected invalid utf-8");
        };
        let cases = [
            (
                TelemetryError::Render {
                    source: PrometheusError::Msg("encode".to_string()),
                },
                "failed to render metrics",
            ),
            (
                TelemetryError::RenderUtf8 { source: utf8 },
                "metrics output was not valid utf-8",
            ),
        ];
        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
            assert!(err.source().is_some());
        }
        Ok(())
    }
}
