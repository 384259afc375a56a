//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Collectors are private; callers record through intent-named methods.
//! - `/health` reads a [`MetricsSnapshot`]; `/metrics` renders the full registry.

use std::sync::Arc;
use std::time::Duration;

use prometheus::core::Collector;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    engine_runs_total: IntCounterVec,
    engine_run_duration_ms: IntGauge,
    active_engine_runs: IntGauge,
    staged_files_total: IntCounter,
    collected_files_total: IntCounter,
    rejected_files_total: IntCounter,
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Engine processes currently running.
    pub active_engine_runs: i64,
    /// Duration of the most recent engine run (ms).
    pub engine_run_duration_ms: i64,
    /// Files written into workspaces.
    pub staged_files_total: u64,
    /// Files copied into the processed-files store.
    pub collected_files_total: u64,
    /// Uploaded files dropped by the filename policy.
    pub rejected_files_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let inner = MetricsInner {
            http_requests_total: counter_vec(
                &registry,
                "http_requests_total",
                "Total HTTP requests received",
                &["route", "code"],
            )?,
            engine_runs_total: counter_vec(
                &registry,
                "engine_runs_total",
                "Engine invocations by mode and outcome",
                &["mode", "outcome"],
            )?,
            engine_run_duration_ms: gauge(
                &registry,
                "engine_run_duration_ms",
                "Wall-clock duration of the most recent engine run (ms)",
            )?,
            active_engine_runs: gauge(
                &registry,
                "active_engine_runs",
                "Engine processes currently running",
            )?,
            staged_files_total: counter(
                &registry,
                "staged_files_total",
                "Uploaded files written into request workspaces",
            )?,
            collected_files_total: counter(
                &registry,
                "collected_files_total",
                "Files copied into the processed-files store",
            )?,
            rejected_files_total: counter(
                &registry,
                "rejected_files_total",
                "Uploaded files dropped by the filename policy",
            )?,
            registry,
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Mark an engine process as started.
    pub fn engine_run_started(&self) {
        self.inner.active_engine_runs.inc();
    }

    /// Record the end of an engine invocation with its terminal state.
    pub fn engine_run_finished(&self, mode: &str, outcome: &str, elapsed: Duration) {
        self.inner.active_engine_runs.dec();
        self.record_engine_outcome(mode, outcome);
        self.inner
            .engine_run_duration_ms
            .set(Self::duration_to_ms(elapsed));
    }

    /// Count an engine invocation that never reached a running process.
    pub fn record_engine_outcome(&self, mode: &str, outcome: &str) {
        self.inner
            .engine_runs_total
            .with_label_values(&[mode, outcome])
            .inc();
    }

    /// Count files staged into a workspace.
    pub fn add_staged_files(&self, count: usize) {
        self.inner.staged_files_total.inc_by(Self::count_to_u64(count));
    }

    /// Count files copied into the processed-files store.
    pub fn add_collected_files(&self, count: usize) {
        self.inner
            .collected_files_total
            .inc_by(Self::count_to_u64(count));
    }

    /// Count uploaded files rejected by the filename policy.
    pub fn add_rejected_files(&self, count: usize) {
        self.inner
            .rejected_files_total
            .inc_by(Self::count_to_u64(count));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::Render { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::RenderUtf8 { source })
    }

    /// Take a point-in-time snapshot of the most relevant gauges and counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            active_engine_runs: self.inner.active_engine_runs.get(),
            engine_run_duration_ms: self.inner.engine_run_duration_ms.get(),
            staged_files_total: self.inner.staged_files_total.get(),
            collected_files_total: self.inner.collected_files_total.get(),
            rejected_files_total: self.inner.rejected_files_total.get(),
        }
    }

    /// Convert a duration to milliseconds saturating at `i64::MAX`.
    pub(crate) fn duration_to_ms(duration: Duration) -> i64 {
        i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
    }

    fn count_to_u64(count: usize) -> u64 {
        u64::try_from(count).unwrap_or(u64::MAX)
    }
}

fn counter(registry: &Registry, name: &'static str, help: &str) -> Result<IntCounter> {
    let built = IntCounter::new(name, help)
        .map_err(|source| TelemetryError::collector(name, "build", source))?;
    register(registry, name, built)
}

fn gauge(registry: &Registry, name: &'static str, help: &str) -> Result<IntGauge> {
    let built =
        IntGauge::new(name, help).map_err(|source| TelemetryError::collector(name, "build", source))?;
    register(registry, name, built)
}

fn counter_vec(
    registry: &Registry,
    name: &'static str,
    help: &str,
    labels: &[&str],
) -> Result<IntCounterVec> {
    let built = IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::collector(name, "build", source))?;
    register(registry, name, built)
}

fn register<C>(registry: &Registry, name: &'static str, collector: C) -> Result<C>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::collector(name, "register", source))?;
    Ok(collector)
}
