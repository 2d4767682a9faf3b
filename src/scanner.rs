//! Source tree scanning.
//!
//! Walks a rule's source directory and collects the regular files whose names
//! match the rule's pattern. Results are sorted by relative path so a plan
//! never depends on the order in which the filesystem lists entries.

use crate::error::{PlacementError, Result};
use crate::rule::FilePattern;
use camino::{Utf8Path, Utf8PathBuf};
use log::{trace, warn};
use std::fs;

/// Collect files below `dir` whose file name matches `pattern`.
///
/// Returned paths are relative to `dir` and sorted. A missing directory yields
/// no matches; symlinked directories are not descended into, symlinked files
/// are included when they resolve to a regular file.
///
/// # Errors
///
/// Returns [`PlacementError::ScanFailed`] if an existing directory cannot be
/// read. Entries whose names are not valid UTF-8 are skipped with a warning.
pub fn find_matching_files(dir: &Utf8Path, pattern: &FilePattern) -> Result<Vec<Utf8PathBuf>> {
    if !dir.exists() {
        trace!("scan: {dir} does not exist; no candidates");
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        warn!("scan: {dir} is not a directory; no candidates");
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    walk(dir, Utf8Path::new(""), pattern, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(
    root: &Utf8Path,
    relative: &Utf8Path,
    pattern: &FilePattern,
    found: &mut Vec<Utf8PathBuf>,
) -> Result<()> {
    let dir = if relative.as_str().is_empty() {
        root.to_owned()
    } else {
        root.join(relative)
    };
    let scan_failed = |source| PlacementError::ScanFailed {
        path: dir.clone(),
        source,
    };

    for dir_entry in fs::read_dir(&dir).map_err(scan_failed)? {
        let entry = dir_entry.map_err(scan_failed)?;
        let Ok(path) = Utf8PathBuf::try_from(entry.path()) else {
            warn!(
                "scan: skipping non-UTF-8 entry {}",
                entry.path().display()
            );
            continue;
        };
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let file_type = entry.file_type().map_err(scan_failed)?;
        let child = relative.join(file_name);

        if file_type.is_dir() {
            walk(root, &child, pattern, found)?;
        } else if path.is_file() && pattern.matches(file_name) {
            found.push(child);
        } else {
            trace!("scan: skipping {path}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct Tree {
        _temp_dir: TempDir,
        root: Utf8PathBuf,
    }

    impl Tree {
        fn touch(&self, relative: &str) {
            let path = self.root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("failed to create parent");
            }
            fs::write(&path, relative).expect("failed to write file");
        }
    }

    #[fixture]
    fn tree() -> Tree {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp_dir.path().to_owned()).expect("non-UTF8 temp path");
        Tree {
            _temp_dir: temp_dir,
            root,
        }
    }

    fn pattern(raw: &str) -> FilePattern {
        FilePattern::new(raw).expect("valid pattern")
    }

    #[rstest]
    fn finds_nested_matches_sorted(tree: Tree) {
        tree.touch("spdlog/sinks/all-sinks.h");
        tree.touch("spdlog/common.h");
        tree.touch("monolithic_examples.h");
        tree.touch("spdlog/details/windows_include.h");
        tree.touch("spdlog/README.md");

        let found = find_matching_files(&tree.root, &pattern("*.h")).expect("scan");

        assert_eq!(
            found,
            vec![
                Utf8PathBuf::from("monolithic_examples.h"),
                Utf8PathBuf::from("spdlog/common.h"),
                Utf8PathBuf::from("spdlog/details/windows_include.h"),
                Utf8PathBuf::from("spdlog/sinks/all-sinks.h"),
            ]
        );
    }

    #[rstest]
    fn missing_directory_yields_no_matches(tree: Tree) {
        let found =
            find_matching_files(&tree.root.join("absent"), &pattern("*")).expect("scan");
        assert!(found.is_empty());
    }

    #[rstest]
    fn file_in_place_of_directory_yields_no_matches(tree: Tree) {
        tree.touch("staticlib");
        let found =
            find_matching_files(&tree.root.join("staticlib"), &pattern("*")).expect("scan");
        assert!(found.is_empty());
    }

    #[rstest]
    fn directories_matching_the_pattern_are_not_files(tree: Tree) {
        tree.touch("spdlog-cmake/libspdlog.a");

        let found = find_matching_files(&tree.root, &pattern("*spdlog*")).expect("scan");

        assert_eq!(found, vec![Utf8PathBuf::from("spdlog-cmake/libspdlog.a")]);
    }

    #[cfg(target_os = "linux")]
    #[rstest]
    fn non_utf8_names_are_skipped(tree: Tree) {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        tree.touch("include/foo.h");
        let junk = tree
            .root
            .as_std_path()
            .join("include")
            .join(OsStr::from_bytes(b"junk\xff.txt"));
        fs::write(&junk, b"junk").expect("failed to write non-UTF-8 file");

        let found = find_matching_files(&tree.root, &pattern("*.h")).expect("scan");

        assert_eq!(found, vec![Utf8PathBuf::from("include/foo.h")]);
    }

    #[cfg(unix)]
    #[rstest]
    fn includes_symlinked_files_but_not_symlinked_directories(tree: Tree) {
        use std::os::unix::fs::symlink;

        tree.touch("real/libspdlog.a");
        symlink(tree.root.join("real"), tree.root.join("loop")).expect("dir symlink");
        symlink(
            tree.root.join("real/libspdlog.a"),
            tree.root.join("libspdlog-link.a"),
        )
        .expect("file symlink");

        let found = find_matching_files(&tree.root, &pattern("*spdlog*")).expect("scan");

        assert_eq!(
            found,
            vec![
                Utf8PathBuf::from("libspdlog-link.a"),
                Utf8PathBuf::from("real/libspdlog.a"),
            ]
        );
    }
}
