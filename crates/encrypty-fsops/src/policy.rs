//! Filename checks applied to uploads and download keys.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use crate::error::{FsOpsError, FsOpsResult};

/// Ensure `name` is a single, normal path component.
///
/// # Errors
///
/// Returns [`FsOpsError::InvalidInput`] for empty names, separators, `.`/`..`,
/// or anything that would resolve outside the directory it is joined to.
pub fn validate_file_name<'a>(field: &'static str, name: &'a str) -> FsOpsResult<&'a str> {
    if name.trim().is_empty() {
        return Err(FsOpsError::invalid(field, "empty", name));
    }
    if name.contains(['/', '\\']) {
        return Err(FsOpsError::invalid(field, "path_separator", name));
    }
    if name.contains('\0') {
        return Err(FsOpsError::invalid(field, "nul_byte", name));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(FsOpsError::invalid(field, "not_a_file_name", name)),
    }
}

/// Extension allow-list for uploaded filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenamePolicy {
    allowed: BTreeSet<String>,
}

impl FilenamePolicy {
    /// Build a policy from extensions without the leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { allowed }
    }

    /// Allowed extensions, lowercase and sorted.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }

    /// Check an uploaded filename.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InvalidInput`] when the name is not a plain file name
    /// or its extension (text after the last dot) is not allowed.
    pub fn check(&self, name: &str) -> FsOpsResult<()> {
        let name = validate_file_name("filename", name)?;
        let Some((_, extension)) = name.rsplit_once('.') else {
            return Err(FsOpsError::invalid("filename", "missing_extension", name));
        };
        if self.allowed.contains(&extension.to_ascii_lowercase()) {
            Ok(())
        } else {
            Err(FsOpsError::invalid("filename", "extension_not_allowed", name))
        }
    }

    /// Convenience boolean form of [`Self::check`].
    #[must_use]
    pub fn is_allowed(&self, name: &str) -> bool {
        self.check(name).is_ok()
    }
}
