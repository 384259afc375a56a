//! Walk engine output: copy into the store (batch) or count in place (directory).
//!
//! Symlinks to files count as files and are copied by content. Symlinked
//! directories are not descended into; dangling links are skipped.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::error::{FsOpsError, FsOpsResult};
use crate::store::ProcessedStore;

/// Copy every regular file under `root`, at any depth, into `store`.
///
/// Names are flattened to their final component. Returns the stored names in walk
/// order (entries sorted by file name within each directory).
///
/// # Errors
///
/// Returns a walkdir error if traversal fails, [`FsOpsError::InvalidInput`] for names
/// that are not valid UTF-8, and IO errors from the store.
pub fn collect_into_store(root: &Path, store: &ProcessedStore) -> FsOpsResult<Vec<String>> {
    let mut stored = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| FsOpsError::walkdir("collect.walk", root, source))?;
        if !is_file_entry(&entry) {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            return Err(FsOpsError::InvalidInput {
                field: "filename",
                reason: "not_utf8",
                value: Some(entry.file_name().to_string_lossy().into_owned()),
            });
        };
        let stored_name = store.store(name, entry.path())?;
        debug!(source = %entry.path().display(), name = %stored_name, "collected artifact");
        stored.push(stored_name);
    }
    info!(root = %root.display(), count = stored.len(), "collected engine output");
    Ok(stored)
}

/// Count regular files under `root` at any depth.
///
/// # Errors
///
/// Returns a walkdir error if traversal fails.
pub fn count_files(root: &Path) -> FsOpsResult<usize> {
    let mut count = 0usize;
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| FsOpsError::walkdir("count.walk", root, source))?;
        if is_file_entry(&entry) {
            count += 1;
        }
    }
    Ok(count)
}

fn is_file_entry(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        || (entry.path_is_symlink()
            && fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encrypty_config::CollisionPolicy;
    use encrypty_test_support::fixtures::write_tree;

    #[test]
    fn collect_flattens_nested_output() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let output = scratch.path().join("job");
        write_tree(
            &output,
            &[("b.jpg", "bee"), ("a.txt", "ay"), ("nested/deeper/c.png", "sea")],
        )?;
        let store = ProcessedStore::open(scratch.path().join("processed"), CollisionPolicy::Overwrite)?;

        let names = collect_into_store(&output, &store)?;

        assert_eq!(names, vec!["a.txt", "b.jpg", "c.png"]);
        assert_eq!(fs::read_to_string(store.root().join("c.png"))?, "sea");
        Ok(())
    }

    #[test]
    fn duplicate_names_follow_store_policy() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let output = scratch.path().join("job");
        write_tree(&output, &[("x/dup.txt", "first"), ("y/dup.txt", "second")])?;

        let overwrite = ProcessedStore::open(scratch.path().join("overwrite"), CollisionPolicy::Overwrite)?;
        assert_eq!(collect_into_store(&output, &overwrite)?, vec!["dup.txt", "dup.txt"]);
        assert_eq!(fs::read_to_string(overwrite.root().join("dup.txt"))?, "second");

        let rename = ProcessedStore::open(scratch.path().join("rename"), CollisionPolicy::Rename)?;
        assert_eq!(collect_into_store(&output, &rename)?, vec!["dup.txt", "dup (1).txt"]);
        Ok(())
    }

    #[test]
    fn count_files_is_recursive() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        write_tree(
            scratch.path(),
            &[("1.txt", ""), ("2.txt", ""), ("a/3.txt", ""), ("a/b/4.txt", ""), ("a/b/c/5.txt", "")],
        )?;
        fs::create_dir_all(scratch.path().join("empty"))?;
        assert_eq!(count_files(scratch.path())?, 5);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_followed_but_linked_dirs_are_not() -> anyhow::Result<()> {
        use std::os::unix::fs::symlink;

        let scratch = tempfile::tempdir()?;
        let outside = scratch.path().join("outside");
        write_tree(&outside, &[("real.txt", "linked body"), ("deep/hidden.txt", "no")])?;
        let output = scratch.path().join("job");
        write_tree(&output, &[("plain.txt", "plain")])?;
        symlink(outside.join("real.txt"), output.join("alias.txt"))?;
        symlink(outside.join("deep"), output.join("linked_dir"))?;
        symlink(outside.join("missing.txt"), output.join("dangling.txt"))?;

        assert_eq!(count_files(&output)?, 2);

        let store = ProcessedStore::open(scratch.path().join("processed"), CollisionPolicy::Overwrite)?;
        let names = collect_into_store(&output, &store)?;
        assert_eq!(names, vec!["alias.txt", "plain.txt"]);
        let stored = store.root().join("alias.txt");
        assert!(!fs::symlink_metadata(&stored)?.file_type().is_symlink());
        assert_eq!(fs::read_to_string(stored)?, "linked body");
        Ok(())
    }

    #[test]
    fn count_files_reports_missing_root() {
        let result = count_files(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(FsOpsError::Walkdir { .. })));
    }
}
