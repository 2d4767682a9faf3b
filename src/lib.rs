//! Stevedore packaging library.
//!
//! This crate relocates prebuilt third-party artefacts (public headers and
//! compiled static libraries) from a source checkout into the package layout a
//! downstream consumer expects, parameterised by a build target. It is used by
//! the `stevedore` CLI binary and can be consumed programmatically by build
//! orchestrators.
//!
//! Packaging is two steps: [`plan::resolve_plan`] evaluates a recipe's rules
//! against a source root and target without touching the destination, and
//! [`stager::apply_plan`] copies the resulting placements.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`digest`] - SHA-256 file digests for change detection
//! - [`error`] - Error types and exit codes
//! - [`output`] - Plan, report, and recipe formatting
//! - [`plan`] - Placement planning
//! - [`recipe`] - Recipe metadata and TOML loading
//! - [`rule`] - Artefact rules and file-name patterns
//! - [`scanner`] - Source tree scanning
//! - [`stager`] - Copying placements into the package root
//! - [`target`] - Build target validation
//! - [`template`] - `{target}` directory templates

pub mod cli;
pub mod digest;
pub mod error;
pub mod output;
pub mod plan;
pub mod recipe;
pub mod rule;
pub mod scanner;
pub mod stager;
pub mod target;
pub mod template;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{ApplyFailure, PlacementError, Result};
pub use plan::{Placement, PlacementPlan, resolve_plan};
pub use recipe::{Recipe, RecipeMetadata};
pub use rule::ArtifactRule;
pub use stager::{ApplyOptions, ApplyReport, OverwritePolicy, apply_plan};
pub use target::BuildTarget;
