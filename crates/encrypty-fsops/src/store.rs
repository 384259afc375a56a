//! Flat, filename-keyed store of processed artifacts.
//!
//! # Design
//! - Writes land in a hidden temp file in the store and are renamed into place, so a
//!   concurrent download never reads a half-copied file.
//! - Same-name writes follow [`CollisionPolicy`]: overwrite (last writer wins) or
//!   rename to the first free `name (n).ext`.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use encrypty_config::CollisionPolicy;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{FsOpsError, FsOpsResult};
use crate::policy::validate_file_name;

const TEMP_PREFIX: &str = ".incoming-";
const MAX_RENAME_ATTEMPTS: usize = 10_000;

/// Durable directory holding files available for download.
#[derive(Debug, Clone)]
pub struct ProcessedStore {
    root: PathBuf,
    policy: CollisionPolicy,
}

impl ProcessedStore {
    /// Open (and create if missing) the store at `root`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>, policy: CollisionPolicy) -> FsOpsResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| FsOpsError::io("store.open", &root, source))?;
        Ok(Self { root, policy })
    }

    /// Store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Active collision policy.
    #[must_use]
    pub const fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Copy `source` into the store as `name`, returning the name actually used.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InvalidInput`] for names that are not plain file names and
    /// IO errors for copy or rename failures.
    pub fn store(&self, name: &str, source: &Path) -> FsOpsResult<String> {
        let name = validate_file_name("filename", name)?;
        let staged = self.copy_to_temp(source)?;
        let stored = match self.policy {
            CollisionPolicy::Overwrite => {
                let target = self.root.join(name);
                staged
                    .persist(&target)
                    .map_err(|err| FsOpsError::io("store.persist", &target, err.error))?;
                name.to_string()
            }
            CollisionPolicy::Rename => self.persist_unique(staged, name)?,
        };
        debug!(name = %stored, source = %source.display(), "artifact stored");
        Ok(stored)
    }

    /// Path of `name` in the store if it exists as a regular file.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InvalidInput`] when `name` could escape the store.
    pub fn resolve(&self, name: &str) -> FsOpsResult<Option<PathBuf>> {
        let name = validate_file_name("filename", name)?;
        if name.starts_with(TEMP_PREFIX) {
            return Ok(None);
        }
        let path = self.root.join(name);
        Ok(path.is_file().then_some(path))
    }

    fn copy_to_temp(&self, source: &Path) -> FsOpsResult<NamedTempFile> {
        let mut reader =
            File::open(source).map_err(|err| FsOpsError::io("store.open_source", source, err))?;
        let mut staged = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.root)
            .map_err(|err| FsOpsError::io("store.create_temp", &self.root, err))?;
        io::copy(&mut reader, staged.as_file_mut())
            .map_err(|err| FsOpsError::io("store.copy", source, err))?;
        Ok(staged)
    }

    fn persist_unique(&self, mut staged: NamedTempFile, name: &str) -> FsOpsResult<String> {
        for attempt in 0..MAX_RENAME_ATTEMPTS {
            let candidate = numbered_name(name, attempt);
            let target = self.root.join(&candidate);
            match staged.persist_noclobber(&target) {
                Ok(_) => return Ok(candidate),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    staged = err.file;
                }
                Err(err) => return Err(FsOpsError::io("store.persist", &target, err.error)),
            }
        }
        Err(FsOpsError::invalid("filename", "no_free_name", name))
    }
}

/// `report.txt` -> `report (n).txt`; attempt 0 keeps the original name.
fn numbered_name(name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem} ({attempt}).{extension}"),
        _ => format!("{name} ({attempt})"),
    }
}
