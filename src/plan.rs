//! Placement planning.
//!
//! Evaluates an ordered rule set against a source root and build target,
//! producing the list of files to copy and where each one lands. Planning is
//! read-only; [`crate::stager::apply_plan`] performs the copies.

use crate::error::{PlacementError, Result};
use crate::rule::ArtifactRule;
use crate::scanner::find_matching_files;
use crate::target::BuildTarget;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;

/// One file to relocate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Index of the rule that produced this placement.
    pub rule: usize,
    /// Source file, joined onto the source root.
    pub source: Utf8PathBuf,
    /// Destination file, relative to the package root.
    pub destination: Utf8PathBuf,
}

/// The files a packaging run will copy, in copy order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementPlan {
    target: BuildTarget,
    placements: Vec<Placement>,
}

impl PlacementPlan {
    /// Assemble a plan from already-resolved placements.
    #[must_use]
    pub fn new(target: BuildTarget, placements: Vec<Placement>) -> Self {
        Self { target, placements }
    }

    /// The build target the plan was resolved for.
    #[must_use]
    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    /// The placements in copy order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Number of files the plan copies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether the plan copies nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Iterate over the placements in copy order.
    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }
}

impl<'a> IntoIterator for &'a PlacementPlan {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Resolve `rules` against `source_root` for `target`.
///
/// Rules are evaluated in declaration order; within a rule, matches are
/// ordered by their path relative to the rule's source directory. Each
/// destination is the rule's rendered destination directory joined with that
/// relative path. A rule that matches nothing contributes nothing.
///
/// # Errors
///
/// Returns [`PlacementError::InvalidInput`] if `rules` is empty or
/// `source_root` is not an existing directory, and
/// [`PlacementError::ScanFailed`] if a source directory cannot be read.
pub fn resolve_plan(
    source_root: &Utf8Path,
    rules: &[ArtifactRule],
    target: &BuildTarget,
) -> Result<PlacementPlan> {
    if rules.is_empty() {
        return Err(PlacementError::invalid_input("no artefact rules supplied"));
    }
    if !source_root.is_dir() {
        return Err(PlacementError::invalid_input(format!(
            "source root {source_root} does not exist or is not a directory"
        )));
    }

    let mut placements = Vec::new();
    for (index, rule) in rules.iter().enumerate() {
        let source_dir = source_root.join(rule.source().render(target));
        let destination_dir = rule.destination().render(target);
        let matches = find_matching_files(&source_dir, rule.pattern())?;

        debug!(
            "rule {index} ({rule}): {} match(es) in {source_dir}",
            matches.len()
        );

        placements.extend(matches.into_iter().map(|relative| Placement {
            rule: index,
            source: source_dir.join(&relative),
            destination: destination_dir.join(&relative),
        }));
    }

    warn_on_duplicate_destinations(&placements);
    Ok(PlacementPlan::new(target.clone(), placements))
}

/// Later placements overwrite earlier ones at the same destination.
fn warn_on_duplicate_destinations(placements: &[Placement]) {
    let mut seen = HashSet::new();
    for placement in placements {
        if !seen.insert(placement.destination.as_path()) {
            warn!(
                "destination {} is written by more than one placement; rule {} overwrites the earlier copy",
                placement.destination, placement.rule
            );
        }
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
