//! Build target identifiers.
//!
//! A build target names a platform/architecture/variant combination such as
//! `windows-x64-release`. Its contents are opaque; the only requirement is
//! that it is usable verbatim as a single path segment, so anything that could
//! escape the directory it is substituted into is rejected at construction.

use crate::error::{PlacementError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A validated build target identifier.
///
/// Construction via [`TryFrom`] or [`FromStr`] rejects empty values, `.` and
/// `..`, path separators, and NUL bytes.
///
/// # Examples
///
/// ```
/// use stevedore::target::BuildTarget;
///
/// let target: BuildTarget = "windows-x64-release".parse().expect("valid target");
/// assert_eq!(target.as_str(), "windows-x64-release");
/// assert!("../etc".parse::<BuildTarget>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BuildTarget(String);

impl BuildTarget {
    /// Return the target as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn validate(value: &str) -> Result<()> {
    let reject = |why: &str| {
        Err(PlacementError::invalid_input(format!(
            "build target {value:?} {why}"
        )))
    };

    if value.trim().is_empty() {
        return reject("is empty");
    }
    if value == "." || value == ".." || value.contains("..") {
        return reject("contains a path-traversal segment");
    }
    if value.contains(['/', '\\']) {
        return reject("contains a path separator");
    }
    if value.contains('\0') {
        return reject("contains a NUL byte");
    }
    Ok(())
}

impl TryFrom<&str> for BuildTarget {
    type Error = PlacementError;

    fn try_from(value: &str) -> Result<Self> {
        validate(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for BuildTarget {
    type Error = PlacementError;

    fn try_from(value: String) -> Result<Self> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl FromStr for BuildTarget {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl AsRef<str> for BuildTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
