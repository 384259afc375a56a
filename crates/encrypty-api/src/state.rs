//! Shared dependencies handed to every handler.

use std::path::PathBuf;
use std::sync::Arc;

use encrypty_engine::EngineRunner;
use encrypty_fsops::{FilenamePolicy, ProcessedStore};
use encrypty_telemetry::Metrics;

/// Application state shared across requests.
///
/// Nothing here is mutated per request; the processed-files store is the only
/// shared resource and it lives on disk.
#[derive(Clone)]
pub struct ApiState {
    pub(crate) runner: Arc<dyn EngineRunner>,
    pub(crate) store: ProcessedStore,
    pub(crate) policy: FilenamePolicy,
    pub(crate) uploads_root: PathBuf,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    /// Bundle the gateway's collaborators.
    #[must_use]
    pub fn new(
        runner: Arc<dyn EngineRunner>,
        store: ProcessedStore,
        policy: FilenamePolicy,
        uploads_root: impl Into<PathBuf>,
        telemetry: Metrics,
    ) -> Self {
        Self {
            runner,
            store,
            policy,
            uploads_root: uploads_root.into(),
            telemetry,
        }
    }
}
