//! Declarative artefact rules.
//!
//! A rule names one category of files to relocate: a file-name pattern, the
//! directory to search (relative to the source root), and the directory the
//! matches land in (relative to the package root). Both directories are
//! [`PathTemplate`]s so they can embed the build target.

use crate::error::{PlacementError, Result};
use crate::template::PathTemplate;
use camino::{Utf8Component, Utf8Path};
use serde::Serialize;
use std::fmt;

/// A glob-style pattern matched against file names.
///
/// Supports the `glob` crate syntax (`*`, `?`, `[...]`). Patterns apply to a
/// single file name, so path separators are rejected.
///
/// # Examples
///
/// ```
/// use stevedore::rule::FilePattern;
///
/// let pattern = FilePattern::new("*spdlog*").expect("valid pattern");
/// assert!(pattern.matches("libspdlog.a"));
/// assert!(!pattern.matches("libfmt.a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern(glob::Pattern);

impl FilePattern {
    /// Compile a file-name pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidInput`] when the pattern is empty,
    /// contains a path separator, or is not valid glob syntax.
    pub fn new(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(PlacementError::invalid_input("file pattern is empty"));
        }
        if raw.contains(['/', '\\']) {
            return Err(PlacementError::invalid_input(format!(
                "file pattern {raw:?} must match file names, not paths"
            )));
        }
        glob::Pattern::new(raw).map(Self).map_err(|e| {
            PlacementError::invalid_input(format!("file pattern {raw:?} is invalid: {e}"))
        })
    }

    /// Whether `file_name` matches the pattern.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.0.matches(file_name)
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FilePattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One category of files to relocate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRule {
    pattern: FilePattern,
    source: PathTemplate,
    destination: PathTemplate,
}

impl ArtifactRule {
    /// Build a rule from its textual parts.
    ///
    /// `source` is resolved against the source root and may climb out of it
    /// with `..` segments; `destination` is resolved against the package root
    /// and must stay inside it.
    ///
    /// # Examples
    ///
    /// ```
    /// use stevedore::rule::ArtifactRule;
    ///
    /// let rule = ArtifactRule::new(
    ///     "*spdlog*",
    ///     "../../output/{target}/staticlib",
    ///     "3rdparty/spdlog/output/{target}/staticlib",
    /// )
    /// .expect("valid rule");
    /// assert_eq!(rule.pattern().as_str(), "*spdlog*");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidInput`] when the pattern or either
    /// template is malformed, when either directory is absolute, or when the
    /// destination contains a `..` segment.
    pub fn new(pattern: &str, source: &str, destination: &str) -> Result<Self> {
        let file_pattern = FilePattern::new(pattern)?;

        ensure_relative("source", source)?;
        ensure_relative("destination", destination)?;
        if has_parent_segment(destination) {
            return Err(PlacementError::invalid_input(format!(
                "destination {destination:?} must not leave the package root"
            )));
        }

        Ok(Self {
            pattern: file_pattern,
            source: PathTemplate::parse(source)?,
            destination: PathTemplate::parse(destination)?,
        })
    }

    /// The file-name pattern.
    #[must_use]
    pub fn pattern(&self) -> &FilePattern {
        &self.pattern
    }

    /// The source directory template, relative to the source root.
    #[must_use]
    pub fn source(&self) -> &PathTemplate {
        &self.source
    }

    /// The destination directory template, relative to the package root.
    #[must_use]
    pub fn destination(&self) -> &PathTemplate {
        &self.destination
    }
}

impl fmt::Display for ArtifactRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} to {}", self.pattern, self.source, self.destination)
    }
}

fn ensure_relative(role: &str, raw: &str) -> Result<()> {
    let absolute = raw.starts_with(['/', '\\'])
        || Utf8Path::new(raw)
            .components()
            .any(|c| matches!(c, Utf8Component::RootDir | Utf8Component::Prefix(_)));
    if absolute {
        return Err(PlacementError::invalid_input(format!(
            "{role} directory {raw:?} must be relative"
        )));
    }
    Ok(())
}

fn has_parent_segment(raw: &str) -> bool {
    raw.split(['/', '\\']).any(|segment| segment == "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::headers("*.h", "spdlog.h", true)]
    #[case::headers_inl("*.h", "spdlog-inl.h", true)]
    #[case::headers_cpp("*.h", "bundled_fmtlib_format.cpp", false)]
    #[case::library_unix("*spdlog*", "libspdlog.a", true)]
    #[case::library_windows("*spdlog*", "spdlog.lib", true)]
    #[case::library_debug("*spdlog*", "spdlogd.pdb", true)]
    #[case::other_library("*spdlog*", "libfmt.a", false)]
    #[case::case_sensitive("*.h", "SPDLOG.H", false)]
    fn pattern_matches_file_names(
        #[case] pattern: &str,
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        let compiled = FilePattern::new(pattern).expect("valid pattern");
        assert_eq!(compiled.matches(name), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::path("include/*.h")]
    #[case::bad_class("[*.h")]
    fn rejects_bad_patterns(#[case] raw: &str) {
        assert!(FilePattern::new(raw).is_err());
    }

    #[test]
    fn source_may_climb_out_of_the_root() {
        let rule = ArtifactRule::new("*", "../../output/{target}/staticlib", "out")
            .expect("source may use parent segments");
        assert!(rule.source().mentions_target());
    }

    #[rstest]
    #[case::parent("../escape")]
    #[case::nested_parent("3rdparty/../../escape")]
    #[case::absolute("/opt/pkg")]
    #[case::windows_absolute("\\pkg")]
    fn rejects_destinations_outside_package_root(#[case] destination: &str) {
        let err = ArtifactRule::new("*.h", "include", destination)
            .expect_err("destination should be rejected");
        assert!(matches!(err, PlacementError::InvalidInput { .. }));
    }

    #[test]
    fn rejects_absolute_source() {
        assert!(ArtifactRule::new("*.h", "/usr/include", "include").is_err());
    }

    #[test]
    fn display_summarises_rule() {
        let rule = ArtifactRule::new("*.h", "include", "3rdparty/spdlog/include").expect("valid");
        assert_eq!(
            rule.to_string(),
            "*.h from include to 3rdparty/spdlog/include"
        );
    }
}
