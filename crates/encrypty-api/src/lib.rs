#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

//! HTTP gateway: accepts uploads or directory references, drives the engine, and
//! serves processed artifacts.
//!
//! Layout: `http/router.rs` (server + layers), `http/handlers/` (one module per
//! route group), `http/errors.rs` (JSON error mapping), `state.rs`, `models.rs`, `error.rs`.

pub mod error;
pub mod http;
pub mod models;
pub mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use state::ApiState;
