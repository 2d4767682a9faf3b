//! Error types for artefact placement.
//!
//! Every variant names the rule and path involved so that a failed packaging
//! run can be diagnosed from the message alone. The three caller-facing
//! classes (`InvalidInput`, `SourceMissing`, `DestinationUnwritable`) map to
//! distinct process exit codes in the CLI.

use crate::plan::Placement;
use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while resolving or applying a placement plan.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The caller supplied unusable configuration (bad target, missing source
    /// root, empty rule set, malformed rule).
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of what was rejected.
        reason: String,
    },

    /// A source file listed in the plan no longer exists.
    #[error("source file for rule {rule} is missing: {path}")]
    SourceMissing {
        /// Index of the rule that produced the placement.
        rule: usize,
        /// Path of the vanished source file.
        path: Utf8PathBuf,
    },

    /// The destination could not be created or written.
    #[error("cannot write destination for rule {rule} at {path}")]
    DestinationUnwritable {
        /// Index of the rule that produced the placement.
        rule: usize,
        /// Destination path that could not be written.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A source directory exists but could not be enumerated.
    #[error("failed to scan {path}")]
    ScanFailed {
        /// Directory whose traversal failed.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A recipe file could not be read or parsed.
    #[error("invalid recipe {path}: {reason}")]
    Recipe {
        /// Location of the recipe, or `<builtin>` for the embedded recipe.
        path: String,
        /// Description of the problem.
        reason: String,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl PlacementError {
    /// Shorthand for an [`PlacementError::InvalidInput`] with the given reason.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Process exit code for this error class.
    ///
    /// Caller configuration errors, vanished sources, and unwritable
    /// destinations each get their own code so that an orchestrator can tell
    /// them apart without parsing messages.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } => 2,
            Self::SourceMissing { .. } => 3,
            Self::DestinationUnwritable { .. } => 4,
            Self::ScanFailed { .. } | Self::Recipe { .. } | Self::WriteFailed { .. } => 1,
        }
    }
}

/// A failed [`crate::stager::apply_plan`] run.
///
/// Copying stops at the first error. Files copied before that point are left
/// in place and listed in `completed`.
#[derive(Debug)]
pub struct ApplyFailure {
    /// Placements copied successfully before the failure.
    pub completed: Vec<Placement>,
    /// The error that stopped the run.
    pub error: PlacementError,
}

impl fmt::Display for ApplyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} file(s) copied before the failure)",
            self.error,
            self.completed.len()
        )
    }
}

impl std::error::Error for ApplyFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<ApplyFailure> for PlacementError {
    fn from(failure: ApplyFailure) -> Self {
        failure.error
    }
}

/// Result type alias using [`PlacementError`].
pub type Result<T> = std::result::Result<T, PlacementError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn source_missing_names_rule_and_path() {
        let err = PlacementError::SourceMissing {
            rule: 1,
            path: Utf8PathBuf::from("/src/include/spdlog/spdlog.h"),
        };
        let msg = err.to_string();
        assert!(msg.contains("rule 1"));
        assert!(msg.contains("spdlog.h"));
    }

    #[test]
    fn destination_unwritable_preserves_source() {
        let err = PlacementError::DestinationUnwritable {
            rule: 0,
            path: Utf8PathBuf::from("/pkg/3rdparty"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.to_string().contains("/pkg/3rdparty"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[rstest]
    #[case::invalid_input(PlacementError::invalid_input("bad target"), 2)]
    #[case::source_missing(
        PlacementError::SourceMissing { rule: 0, path: Utf8PathBuf::from("a") },
        3
    )]
    #[case::destination(
        PlacementError::DestinationUnwritable {
            rule: 0,
            path: Utf8PathBuf::from("a"),
            source: std::io::Error::other("denied"),
        },
        4
    )]
    #[case::recipe(
        PlacementError::Recipe { path: "r.toml".to_owned(), reason: "bad".to_owned() },
        1
    )]
    fn exit_codes_distinguish_error_classes(#[case] err: PlacementError, #[case] code: i32) {
        assert_eq!(err.exit_code(), code);
    }

    #[test]
    fn apply_failure_reports_completed_count_and_source() {
        let failure = ApplyFailure {
            completed: Vec::new(),
            error: PlacementError::SourceMissing {
                rule: 0,
                path: Utf8PathBuf::from("gone.h"),
            },
        };
        assert!(failure.to_string().contains("0 file(s) copied"));
        let source = std::error::Error::source(&failure).expect("source is set");
        assert!(source.to_string().contains("gone.h"));
    }
}
