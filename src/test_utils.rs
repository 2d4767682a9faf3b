//! Shared test utilities for placement tests.
//!
//! [`Checkout`] lays out a scratch directory shaped like a real build tree:
//!
//! ```text
//! <root>/work/spdlog/include/...           source root (headers)
//! <root>/output/<target>/staticlib/...     compiled libraries
//! <root>/package/                           package root
//! ```
//!
//! so that the built-in recipe's `../../output/{target}/staticlib` source
//! directory resolves inside the scratch tree.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// A temporary source checkout with sibling build output and package roots.
#[derive(Debug)]
pub struct Checkout {
    _temp_dir: TempDir,
    root: Utf8PathBuf,
}

impl Checkout {
    /// Create an empty checkout with an existing, empty source root.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created or is not UTF-8.
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp_dir.path().to_owned()).expect("non-UTF8 temp path");
        let checkout = Self {
            _temp_dir: temp_dir,
            root,
        };
        fs::create_dir_all(checkout.source_root()).expect("failed to create source root");
        checkout
    }

    /// The scratch directory holding everything else.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The source root handed to the resolver.
    #[must_use]
    pub fn source_root(&self) -> Utf8PathBuf {
        self.root.join("work").join("spdlog")
    }

    /// The package root handed to the stager.
    #[must_use]
    pub fn package_root(&self) -> Utf8PathBuf {
        self.root.join("package")
    }

    /// The static library directory for `target`.
    #[must_use]
    pub fn staticlib_dir(&self, target: &str) -> Utf8PathBuf {
        self.root.join("output").join(target).join("staticlib")
    }

    /// Write `contents` to `path` relative to the scratch root, creating
    /// parent directories. Returns the absolute path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, path: &str, contents: &[u8]) -> Utf8PathBuf {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directory");
        }
        fs::write(&full, contents).expect("failed to write file");
        full
    }

    /// Write a header below `<source root>/include`.
    pub fn write_header(&self, relative: &str, contents: &[u8]) -> Utf8PathBuf {
        self.write(&format!("work/spdlog/include/{relative}"), contents)
    }

    /// Write a library into the static library directory for `target`.
    pub fn write_library(&self, target: &str, file_name: &str, contents: &[u8]) -> Utf8PathBuf {
        self.write(&format!("output/{target}/staticlib/{file_name}"), contents)
    }

    /// Read a file below the package root.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    #[must_use]
    pub fn read_packaged(&self, relative: &str) -> Vec<u8> {
        fs::read(self.package_root().join(relative)).expect("failed to read packaged file")
    }

    /// Whether a file exists below the package root.
    #[must_use]
    pub fn is_packaged(&self, relative: &str) -> bool {
        self.package_root().join(relative).is_file()
    }
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new()
    }
}
