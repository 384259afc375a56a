//! Stand-in engine executables and small file-tree helpers.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Default executable name the gateway probes for.
pub const ENGINE_NAME: &str = "encrypt_decrypt";

/// Shell bodies for [`MockEngine`]; each runs under `/bin/sh` from the install dir.
pub mod scripts {
    /// Writes the received directive to `directive.log` and the working directory to `cwd.log`.
    pub const RECORD_DIRECTIVE: &str = "cat > directive.log\npwd > cwd.log\necho recorded\n";

    /// Stderr emitted by [`FAIL`].
    pub const FAIL_STDERR: &str = "bad key material\n";

    /// Prints progress, writes [`FAIL_STDERR`], and exits with status 3.
    pub const FAIL: &str =
        "cat > /dev/null\necho 'partial progress'\necho 'bad key material' >&2\nexit 3\n";

    /// Never exits on its own.
    pub const HANG: &str = "exec sleep 30\n";

    /// Exits 0 at once but leaves a background helper holding stdout/stderr.
    pub const LEAVE_HELPER_RUNNING: &str = "cat > /dev/null\necho done\nsleep 8 &\nexit 0\n";

    /// Exits successfully without consuming the directive.
    pub const IGNORE_STDIN: &str = "echo 'no input needed'\n";

    /// Appends `:<action>` to every file under the target directory.
    pub const APPEND_ACTION: &str = "read -r target\nread -r action\n\
find \"$target\" -type f | while read -r file; do printf ':%s' \"$action\" >> \"$file\"; done\n\
echo \"processed $action\"\n";
}

/// A throwaway install directory holding an executable shell script.
#[derive(Debug)]
pub struct MockEngine {
    dir: TempDir,
    name: String,
}

impl MockEngine {
    /// Install `body` as [`ENGINE_NAME`] in a fresh directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or script cannot be created.
    pub fn install(body: &str) -> anyhow::Result<Self> {
        Self::install_named(ENGINE_NAME, body)
    }

    /// Install `body` under an explicit executable name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or script cannot be created.
    pub fn install_named(name: &str, body: &str) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}"))?;
        make_executable(&path)?;
        Ok(Self {
            dir,
            name: name.to_string(),
        })
    }

    /// Install directory; also the engine's working directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Executable name without a platform suffix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the installed script.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(&self.name)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}

/// Write each `(relative path, contents)` pair under `root`, creating parents.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be written.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) -> anyhow::Result<()> {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_writes_script_with_shebang() -> anyhow::Result<()> {
        let mock = MockEngine::install(scripts::IGNORE_STDIN)?;
        assert_eq!(mock.name(), ENGINE_NAME);
        let body = fs::read_to_string(mock.path())?;
        assert!(body.starts_with("#!/bin/sh\n"));
        assert!(body.ends_with(scripts::IGNORE_STDIN));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn install_marks_script_executable() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mock = MockEngine::install_named("engine", scripts::HANG)?;
        let mode = fs::metadata(mock.path())?.permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
        Ok(())
    }

    #[test]
    fn write_tree_creates_nested_files() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        write_tree(root.path(), &[("a.txt", "one"), ("nested/b.txt", "two")])?;
        assert_eq!(fs::read_to_string(root.path().join("nested/b.txt"))?, "two");
        Ok(())
    }
}
