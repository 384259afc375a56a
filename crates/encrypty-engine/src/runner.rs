//! Seam between the gateway and whatever executes directives.

use async_trait::async_trait;

use crate::directive::EngineDirective;
use crate::error::EngineResult;
use crate::outcome::{EngineOutcome, RunMode};

/// Executes engine directives.
///
/// Implementations must treat a nonzero exit as `Ok` with a failing
/// [`EngineOutcome`]; `Err` is reserved for runs that never produced an exit status.
#[async_trait]
pub trait EngineRunner: Send + Sync {
    /// Run the engine against the directive's target and wait for it to finish.
    async fn run(&self, directive: &EngineDirective, mode: RunMode) -> EngineResult<EngineOutcome>;

    /// Whether the engine could be started right now.
    fn is_available(&self) -> bool;
}
