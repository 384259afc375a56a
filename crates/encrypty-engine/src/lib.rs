#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

//! Invocation protocol for the external encryption engine.
//!
//! The engine is an opaque executable that reads a two-line directive (absolute
//! target path, then action) from stdin, rewrites every file under the target in
//! place, and reports success through its exit status.
//!
//! Layout: `action.rs` (processing verb), `directive.rs` (stdin payload),
//! `locator.rs` (executable lookup), `outcome.rs` (captured results and states),
//! `runner.rs` (runner seam), `process.rs` (spawn/timeout/kill), `error.rs`.

pub mod action;
pub mod directive;
pub mod error;
pub mod locator;
pub mod outcome;
pub mod process;
pub mod runner;

pub use action::ProcessingAction;
pub use directive::EngineDirective;
pub use error::{EngineError, EngineResult};
pub use locator::EngineLocator;
pub use outcome::{EngineOutcome, InvocationState, RunMode};
pub use process::ProcessEngine;
pub use runner::EngineRunner;
