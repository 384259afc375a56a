//! The two-line stdin payload understood by the engine.

use std::path::{Path, PathBuf};

use crate::action::ProcessingAction;
use crate::error::{EngineError, EngineResult};

/// Instruction telling the engine which tree to process and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineDirective {
    target: PathBuf,
    action: ProcessingAction,
}

impl EngineDirective {
    /// Build a directive for an absolute target directory.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTarget`] when the path is relative, not valid
    /// UTF-8, or contains a line break that would corrupt the protocol.
    pub fn new(target: impl Into<PathBuf>, action: ProcessingAction) -> EngineResult<Self> {
        let target = target.into();
        if !target.is_absolute() {
            return Err(EngineError::InvalidTarget {
                path: target,
                reason: "relative_path",
            });
        }
        let Some(text) = target.to_str() else {
            return Err(EngineError::InvalidTarget {
                path: target,
                reason: "not_utf8",
            });
        };
        if text.contains(['\n', '\r']) {
            return Err(EngineError::InvalidTarget {
                path: target,
                reason: "line_break",
            });
        }
        Ok(Self { target, action })
    }

    /// Directory the engine will process.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Requested transformation.
    #[must_use]
    pub const fn action(&self) -> ProcessingAction {
        self.action
    }

    /// Wire form: target path, newline, action keyword, newline.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}\n{}\n", self.target.display(), self.action.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_two_lines() -> EngineResult<()> {
        let directive = EngineDirective::new("/srv/data/job-1", ProcessingAction::Decrypt)?;
        assert_eq!(directive.render(), "/srv/data/job-1\ndecrypt\n");
        assert_eq!(directive.target(), Path::new("/srv/data/job-1"));
        assert_eq!(directive.action(), ProcessingAction::Decrypt);
        Ok(())
    }

    #[test]
    fn rejects_relative_and_multiline_targets() {
        assert!(matches!(
            EngineDirective::new("data/job", ProcessingAction::Encrypt),
            Err(EngineError::InvalidTarget {
                reason: "relative_path",
                ..
            })
        ));
        assert!(matches!(
            EngineDirective::new("/tmp/evil\ndecrypt", ProcessingAction::Encrypt),
            Err(EngineError::InvalidTarget {
                reason: "line_break",
                ..
            })
        ));
    }
}
