//! Per-request staging directory for uploaded files.
//!
//! # Design
//! - One workspace per request, never shared; the directory name is unique (`job-*`).
//! - Removal happens on drop for every exit path; [`Workspace::close`] is the
//!   explicit form that reports removal failures instead of swallowing them.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{FsOpsError, FsOpsResult};
use crate::policy::validate_file_name;

const WORKSPACE_PREFIX: &str = "job-";

/// Exclusively owned temporary directory under the staging root.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    staged: Vec<String>,
}

impl Workspace {
    /// Create a fresh workspace under `root`, creating `root` if needed.
    ///
    /// The workspace path is absolute even when `root` is relative.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the root or workspace directory cannot be created.
    pub fn create(root: &Path) -> FsOpsResult<Self> {
        fs::create_dir_all(root)
            .map_err(|source| FsOpsError::io("workspace.create_root", root, source))?;
        let root = fs::canonicalize(root)
            .map_err(|source| FsOpsError::io("workspace.canonicalize_root", root, source))?;
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&root)
            .map_err(|source| FsOpsError::io("workspace.create", &root, source))?;
        debug!(path = %dir.path().display(), "workspace created");
        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    /// Absolute path of the workspace directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Names staged so far, in staging order.
    #[must_use]
    pub fn staged(&self) -> &[String] {
        &self.staged
    }

    /// Write `bytes` to `<workspace>/<name>`.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InvalidInput`] if `name` is not a plain file name, or an
    /// IO error if the write fails.
    pub fn stage(&mut self, name: &str, bytes: &[u8]) -> FsOpsResult<PathBuf> {
        let name = validate_file_name("filename", name)?;
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).map_err(|source| FsOpsError::io("workspace.stage", &path, source))?;
        self.staged.push(name.to_string());
        Ok(path)
    }

    /// Remove the workspace now.
    ///
    /// # Errors
    ///
    /// Returns an IO error if recursive removal fails.
    pub fn close(self) -> FsOpsResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|source| {
            warn!(path = %path.display(), error = %source, "failed to remove workspace");
            FsOpsError::io("workspace.close", &path, source)
        })?;
        debug!(path = %path.display(), "workspace removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_writes_files_inside_workspace() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let mut workspace = Workspace::create(&root.path().join("uploads"))?;
        assert!(
            workspace
                .path()
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(WORKSPACE_PREFIX))
        );

        assert!(workspace.path().is_absolute());

        let path = workspace.stage("a.txt", b"alpha")?;
        assert_eq!(path.parent(), Some(workspace.path()));
        assert_eq!(fs::read(&path)?, b"alpha");
        assert_eq!(workspace.staged(), ["a.txt".to_string()]);
        Ok(())
    }

    #[test]
    fn stage_rejects_escaping_names() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let mut workspace = Workspace::create(root.path())?;
        assert!(matches!(
            workspace.stage("../escape.txt", b"x"),
            Err(FsOpsError::InvalidInput { .. })
        ));
        assert!(!root.path().join("escape.txt").exists());
        assert!(workspace.staged().is_empty());
        Ok(())
    }

    #[test]
    fn workspaces_are_unique_and_removed() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let first = Workspace::create(root.path())?;
        let second = Workspace::create(root.path())?;
        assert_ne!(first.path(), second.path());

        let first_path = first.path().to_path_buf();
        let second_path = second.path().to_path_buf();
        first.close()?;
        drop(second);

        assert!(!first_path.exists());
        assert!(!second_path.exists());
        assert_eq!(fs::read_dir(root.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn close_removes_nested_engine_output() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let mut workspace = Workspace::create(root.path())?;
        workspace.stage("a.txt", b"a")?;
        encrypty_test_support::fixtures::write_tree(workspace.path(), &[("deep/nested/b.txt", "b")])?;
        workspace.close()?;
        assert_eq!(fs::read_dir(root.path())?.count(), 0);
        Ok(())
    }
}
