//! Copying planned artefacts into the package root.
//!
//! The stager walks a [`PlacementPlan`] in order, creating destination
//! directories as needed and copying each source verbatim over whatever is
//! already there. The first failure stops the run; files copied before it
//! stay in place and are reported back to the caller.

use crate::digest::same_contents;
use crate::error::{ApplyFailure, PlacementError, Result};
use crate::plan::{Placement, PlacementPlan};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;
use std::io;

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Always overwrite.
    #[default]
    Always,
    /// Leave the destination alone when its SHA-256 matches the source.
    SkipIdentical,
}

/// Options controlling [`apply_plan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Behaviour for destinations that already exist.
    pub overwrite: OverwritePolicy,
}

/// Outcome of staging a single placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The source bytes were written to the destination.
    Copied,
    /// The destination already held identical bytes and was left untouched.
    Unchanged,
}

/// Result of a successful [`apply_plan`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Placements whose source was copied.
    pub copied: Vec<Placement>,
    /// Placements skipped under [`OverwritePolicy::SkipIdentical`].
    pub unchanged: Vec<Placement>,
}

impl ApplyReport {
    /// Number of files copied.
    #[must_use]
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }
}

/// Handles copying placements below a package root.
#[derive(Debug, Clone)]
pub struct Stager {
    package_root: Utf8PathBuf,
    options: ApplyOptions,
}

impl Stager {
    /// Create a stager writing below `package_root`.
    #[must_use]
    pub fn new(package_root: Utf8PathBuf, options: ApplyOptions) -> Self {
        Self {
            package_root,
            options,
        }
    }

    /// Return the package root.
    #[must_use]
    pub fn package_root(&self) -> &Utf8Path {
        &self.package_root
    }

    /// Absolute destination path for a placement.
    #[must_use]
    pub fn destination_path(&self, placement: &Placement) -> Utf8PathBuf {
        self.package_root.join(&placement.destination)
    }

    /// Copy one placement.
    ///
    /// A destination that resolves to the source file itself is reported as
    /// [`StageOutcome::Unchanged`]. A symlink already sitting at the
    /// destination is removed before copying.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::SourceMissing`] if the source is gone and
    /// [`PlacementError::DestinationUnwritable`] if the destination directory
    /// or file cannot be written.
    pub fn stage(&self, placement: &Placement) -> Result<StageOutcome> {
        let source = placement.source.as_path();
        let destination = self.destination_path(placement);

        if !source.is_file() {
            return Err(source_missing(placement));
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| PlacementError::DestinationUnwritable {
                rule: placement.rule,
                path: parent.to_owned(),
                source: e,
            })?;
        }

        unlink_destination_symlink(placement, &destination)?;

        if is_same_file(source, &destination) {
            debug!("unchanged {destination}: it is the source file");
            return Ok(StageOutcome::Unchanged);
        }

        if self.options.overwrite == OverwritePolicy::SkipIdentical
            && destination.is_file()
            && self.is_identical(source, &destination)
        {
            debug!("unchanged {destination}");
            return Ok(StageOutcome::Unchanged);
        }

        fs::copy(source, &destination).map_err(|e| copy_error(placement, &destination, e))?;
        debug!("copied {source} -> {destination}");
        Ok(StageOutcome::Copied)
    }

    fn is_identical(&self, source: &Utf8Path, destination: &Utf8Path) -> bool {
        same_contents(source, destination).unwrap_or_else(|e| {
            debug!(
                "could not compare {source} with {destination} under {}: {e}",
                self.package_root
            );
            false
        })
    }

    /// Copy every placement in `plan`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyFailure`] holding the first error and the
    /// placements completed before it.
    pub fn apply(&self, plan: &PlacementPlan) -> std::result::Result<ApplyReport, ApplyFailure> {
        let mut report = ApplyReport::default();
        let mut completed = Vec::with_capacity(plan.len());

        for placement in plan {
            match self.stage(placement) {
                Ok(StageOutcome::Copied) => report.copied.push(placement.clone()),
                Ok(StageOutcome::Unchanged) => report.unchanged.push(placement.clone()),
                Err(error) => return Err(ApplyFailure { completed, error }),
            }
            completed.push(placement.clone());
        }

        Ok(report)
    }
}

/// Copy every placement in `plan` below `package_root`.
///
/// Destination directories are created as needed and existing files are
/// overwritten (subject to `options`). Re-applying the same plan leaves the
/// destination tree with the same contents.
///
/// # Errors
///
/// Returns an [`ApplyFailure`] on the first source that has vanished or
/// destination that cannot be written. Already-copied files are not rolled
/// back.
pub fn apply_plan(
    plan: &PlacementPlan,
    package_root: &Utf8Path,
    options: ApplyOptions,
) -> std::result::Result<ApplyReport, ApplyFailure> {
    Stager::new(package_root.to_owned(), options).apply(plan)
}

fn source_missing(placement: &Placement) -> PlacementError {
    PlacementError::SourceMissing {
        rule: placement.rule,
        path: placement.source.clone(),
    }
}

/// A symlink at the destination is replaced, not written through.
fn unlink_destination_symlink(placement: &Placement, destination: &Utf8Path) -> Result<()> {
    let is_symlink = fs::symlink_metadata(destination)
        .is_ok_and(|metadata| metadata.file_type().is_symlink());
    if !is_symlink {
        return Ok(());
    }
    debug!("replacing symlink at {destination}");
    fs::remove_file(destination).map_err(|e| PlacementError::DestinationUnwritable {
        rule: placement.rule,
        path: destination.to_owned(),
        source: e,
    })
}

/// Whether both paths resolve to the same file on disk.
fn is_same_file(source: &Utf8Path, destination: &Utf8Path) -> bool {
    match (source.canonicalize_utf8(), destination.canonicalize_utf8()) {
        (Ok(from), Ok(to)) => from == to,
        _ => false,
    }
}

fn copy_error(placement: &Placement, destination: &Utf8Path, e: io::Error) -> PlacementError {
    if !placement.source.is_file() {
        return source_missing(placement);
    }
    PlacementError::DestinationUnwritable {
        rule: placement.rule,
        path: destination.to_owned(),
        source: e,
    }
}

#[cfg(test)]
#[path = "stager_tests.rs"]
mod tests;
