//! Resolution of the engine executable beside the gateway.

use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

use encrypty_config::EngineSettings;

use crate::error::{EngineError, EngineResult};

/// Fixed location of the engine executable and its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineLocator {
    install_dir: PathBuf,
    executable_name: String,
}

impl EngineLocator {
    /// Locator for `<install_dir>/<executable_name><EXE_SUFFIX>`.
    #[must_use]
    pub fn new(install_dir: impl Into<PathBuf>, executable_name: impl Into<String>) -> Self {
        Self {
            install_dir: install_dir.into(),
            executable_name: executable_name.into(),
        }
    }

    /// Locator derived from engine settings.
    #[must_use]
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(&settings.install_dir, &settings.executable_name)
    }

    /// Directory the engine runs from.
    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Expected executable path, with the platform suffix applied.
    #[must_use]
    pub fn executable_path(&self) -> PathBuf {
        self.install_dir
            .join(format!("{}{EXE_SUFFIX}", self.executable_name))
    }

    /// Return the executable path if a file exists there.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] when nothing usable exists at the path.
    pub fn locate(&self) -> EngineResult<PathBuf> {
        let path = self.executable_path();
        if path.is_file() {
            Ok(path)
        } else {
            Err(EngineError::NotFound { path })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn executable_path_appends_platform_suffix() {
        let locator = EngineLocator::new("/opt/engine", "encrypt_decrypt");
        assert_eq!(
            locator.executable_path(),
            PathBuf::from(format!("/opt/engine/encrypt_decrypt{EXE_SUFFIX}"))
        );
        assert_eq!(locator.install_dir(), Path::new("/opt/engine"));
    }

    #[test]
    fn locate_reports_missing_executable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let locator = EngineLocator::new(dir.path(), "absent");
        assert!(matches!(locator.locate(), Err(EngineError::NotFound { path }) if path.starts_with(dir.path())));

        fs::write(dir.path().join(format!("absent{EXE_SUFFIX}")), b"")?;
        assert_eq!(locator.locate()?, locator.executable_path());
        Ok(())
    }

    #[test]
    fn locate_ignores_directories() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join(format!("engine{EXE_SUFFIX}")))?;
        let locator = EngineLocator::from_settings(&EngineSettings {
            install_dir: dir.path().to_path_buf(),
            executable_name: "engine".to_string(),
            ..EngineSettings::default()
        });
        assert!(locator.locate().is_err());
        Ok(())
    }
}
