//! Filesystem side of a processing request: staging uploads, persisting results,
//! and walking engine output.
//! Layout: `policy.rs` (filename checks), `workspace.rs` (per-request staging dir),
//! `store.rs` (flat processed-files store), `collect.rs` (walk + copy/count), `error.rs`.
#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

pub mod collect;
pub mod error;
pub mod policy;
pub mod store;
pub mod workspace;

pub use collect::{collect_into_store, count_files};
pub use error::{FsOpsError, FsOpsResult};
pub use policy::{FilenamePolicy, validate_file_name};
pub use store::ProcessedStore;
pub use workspace::Workspace;
