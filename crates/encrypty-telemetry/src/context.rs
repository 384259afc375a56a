//! Span builders shared by the HTTP surface and the engine runner.
//!
//! # Design
//! - Every request span and engine-run span has a fixed field set so JSON logs stay
//!   queryable by `request_id`, `route`, and `run_id`.
//! - The application span is entered once at boot and carries service/build info.

use std::time::Duration;

use tracing::{Span, field, span::Entered};

use crate::init::build_sha;

/// Guard that keeps the application-level span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    /// Enter the `app` span tagged with `service` and the build identifier.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        let span: &'static Span = Box::leak(Box::new(tracing::info_span!(
            "app",
            service = %service,
            build_sha = %build_sha()
        )));
        Self {
            _guard: span.enter(),
        }
    }
}

/// Span for one inbound HTTP request.
///
/// `status_code` and `latency_ms` start empty and are filled by [`record_http_response`].
#[must_use]
pub fn http_request_span(method: &str, route: &str, request_id: &str) -> Span {
    tracing::info_span!(
        "http.request",
        method = %method,
        route = %route,
        request_id = %request_id,
        build_sha = %build_sha(),
        status_code = field::Empty,
        latency_ms = field::Empty
    )
}

/// Fill the response fields on a span built by [`http_request_span`].
pub fn record_http_response(span: &Span, status: u16, latency: Duration) {
    span.record("status_code", status);
    span.record("latency_ms", saturating_ms(latency));
}

/// Span for one engine invocation; `pid` is recorded once the child is running.
#[must_use]
pub fn engine_run_span(run_id: &str, mode: &str, action: &str) -> Span {
    tracing::info_span!(
        "engine.run",
        run_id = %run_id,
        mode = %mode,
        action = %action,
        pid = field::Empty
    )
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
#[must_use]
pub fn saturating_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_context_guard_can_be_entered_and_dropped() {
        let guard = GlobalContextGuard::new("test");
        drop(guard);
    }

    #[test]
    fn request_span_accepts_response_fields() {
        let span = http_request_span("POST", "/api/encrypt", "req-1");
        record_http_response(&span, 200, Duration::from_millis(15));
    }

    #[test]
    fn engine_span_accepts_pid() {
        let span = engine_run_span("run-1", "batch", "encrypt");
        span.record("pid", 4242_u32);
    }

    #[test]
    fn saturating_ms_clamps_large_durations() {
        assert_eq!(saturating_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(saturating_ms(Duration::from_secs(u64::MAX)), u64::MAX);
    }
}
