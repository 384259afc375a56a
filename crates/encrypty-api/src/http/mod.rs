//! HTTP surface modules (router, handlers, middleware).

/// Shared constants: header names, multipart fields, response messages.
pub mod constants;
/// JSON error responses and their mapping from domain errors.
pub mod errors;
/// Processing, download, and landing-page handlers.
pub mod handlers;
/// Health and metrics endpoints.
pub mod health;
/// Router construction and server host.
pub mod router;
/// Per-route request counting middleware.
pub mod telemetry;
