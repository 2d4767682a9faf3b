//! Output formatting for the packaging CLI.
//!
//! Plans, reports, and recipes are rendered either for people (aligned text)
//! or for scripts (pretty-printed JSON).

use crate::plan::PlacementPlan;
use crate::recipe::Recipe;
use crate::stager::{ApplyReport, OverwritePolicy};
use camino::Utf8Path;
use std::fmt;
use std::io::Write;

/// Format a plan for human-readable output.
///
/// # Examples
///
/// ```
/// use stevedore::output::format_plan_human;
/// use stevedore::plan::PlacementPlan;
/// use stevedore::target::BuildTarget;
///
/// let target: BuildTarget = "win-x64".parse().expect("valid");
/// let output = format_plan_human(&PlacementPlan::new(target, Vec::new()));
/// assert!(output.contains("Nothing to package"));
/// ```
#[must_use]
pub fn format_plan_human(plan: &PlacementPlan) -> String {
    if plan.is_empty() {
        return format!(
            "Nothing to package for target {}: no rule matched any file.",
            plan.target()
        );
    }

    let mut lines = vec![format!(
        "{} for target {}:",
        file_count(plan.len()),
        plan.target()
    )];
    for placement in plan {
        lines.push(format!(
            "  [{}] {} -> {}",
            placement.rule, placement.source, placement.destination
        ));
    }
    lines.join("\n")
}

/// Format a plan as JSON.
#[must_use]
pub fn format_plan_json(plan: &PlacementPlan) -> String {
    serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".to_owned())
}

/// Format recipe metadata and rules for human-readable output.
#[must_use]
pub fn format_recipe_human(recipe: &Recipe) -> String {
    let metadata = &recipe.metadata;
    let mut lines = vec![format!("{} {}", metadata.name, metadata.version)];

    let optional = [
        ("Description", &metadata.description),
        ("URL", &metadata.url),
        ("License", &metadata.license),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }

    lines.push(String::new());
    lines.push("Rules:".to_owned());
    for (index, rule) in recipe.rules.iter().enumerate() {
        lines.push(format!("  [{index}] {rule}"));
    }
    lines.join("\n")
}

/// Format recipe metadata and rules as JSON.
#[must_use]
pub fn format_recipe_json(recipe: &Recipe) -> String {
    serde_json::to_string_pretty(recipe).unwrap_or_else(|_| "{}".to_owned())
}

/// Format a success message after packaging.
#[must_use]
pub fn success_message(report: &ApplyReport, package_root: &Utf8Path) -> String {
    let mut message = format!(
        "Packaged {} into {package_root}",
        file_count(report.copied_count())
    );
    if !report.unchanged.is_empty() {
        message.push_str(&format!(" ({} already up to date)", report.unchanged.len()));
    }
    message
}

fn file_count(count: usize) -> String {
    let plural = if count == 1 { "file" } else { "files" };
    format!("{count} {plural}")
}

/// Configuration summary printed by `package --dry-run`.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Recipe being packaged.
    pub recipe: &'a Recipe,
    /// Source root the plan was resolved against.
    pub source_root: &'a Utf8Path,
    /// Package root the plan would be applied to.
    pub package_root: &'a Utf8Path,
    /// Overwrite policy that would be used.
    pub overwrite: OverwritePolicy,
    /// The resolved plan.
    pub plan: &'a PlacementPlan,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        [
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!(
                "Recipe: {} {}",
                self.recipe.metadata.name, self.recipe.metadata.version
            ),
            format!("Target: {}", self.plan.target()),
            format!("Source root: {}", self.source_root),
            format!("Package root: {}", self.package_root),
            format!("Overwrite: {}", PolicyLabel(self.overwrite)),
            String::new(),
            format_plan_human(self.plan),
        ]
        .join("\n")
    }
}

struct PolicyLabel(OverwritePolicy);

impl fmt::Display for PolicyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            OverwritePolicy::Always => "always",
            OverwritePolicy::SkipIdentical => "skip identical",
        })
    }
}

/// Write a line to stderr, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Placement;
    use crate::target::BuildTarget;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};

    #[fixture]
    fn plan() -> PlacementPlan {
        let target = BuildTarget::try_from("win-x64").expect("valid target");
        PlacementPlan::new(
            target,
            vec![Placement {
                rule: 1,
                source: Utf8PathBuf::from("/src/../../output/win-x64/staticlib/libspdlog.a"),
                destination: Utf8PathBuf::from(
                    "3rdparty/spdlog/output/win-x64/staticlib/libspdlog.a",
                ),
            }],
        )
    }

    #[fixture]
    fn recipe() -> Recipe {
        Recipe::builtin().expect("builtin recipe")
    }

    #[rstest]
    fn human_plan_lists_each_placement(plan: PlacementPlan) {
        let output = format_plan_human(&plan);
        assert!(output.starts_with("1 file for target win-x64:"));
        assert!(output.contains("[1] /src/../../output/win-x64/staticlib/libspdlog.a -> 3rdparty"));
    }

    #[rstest]
    fn json_plan_has_target_and_placements(plan: PlacementPlan) {
        let parsed: serde_json::Value =
            serde_json::from_str(&format_plan_json(&plan)).expect("valid JSON");
        assert_eq!(parsed["target"], "win-x64");
        assert_eq!(parsed["placements"].as_array().map(Vec::len), Some(1));
    }

    #[rstest]
    fn human_recipe_shows_metadata_and_rules(recipe: Recipe) {
        let output = format_recipe_human(&recipe);
        assert!(output.starts_with("spdlog 1.10.0"));
        assert!(output.contains("License: https://github.com/Esri/spdlog/blob/runtimecore/LICENSE"));
        assert!(output.contains("[1] *spdlog* from ../../output/{target}/staticlib"));
    }

    #[rstest]
    fn json_recipe_serialises_rules_as_strings(recipe: Recipe) {
        let parsed: serde_json::Value =
            serde_json::from_str(&format_recipe_json(&recipe)).expect("valid JSON");
        assert_eq!(parsed["metadata"]["name"], "spdlog");
        assert_eq!(parsed["rules"][0]["pattern"], "*.h");
        assert_eq!(
            parsed["rules"][1]["destination"],
            "3rdparty/spdlog/output/{target}/staticlib"
        );
    }

    #[rstest]
    #[case::singular(1, 0, "Packaged 1 file into /pkg")]
    #[case::plural(2, 0, "Packaged 2 files into /pkg")]
    #[case::with_unchanged(1, 3, "Packaged 1 file into /pkg (3 already up to date)")]
    fn success_message_counts_files(
        plan: PlacementPlan,
        #[case] copied: usize,
        #[case] unchanged: usize,
        #[case] expected: &str,
    ) {
        let placement = plan.placements()[0].clone();
        let report = ApplyReport {
            copied: vec![placement.clone(); copied],
            unchanged: vec![placement; unchanged],
        };
        assert_eq!(success_message(&report, Utf8Path::new("/pkg")), expected);
    }

    #[rstest]
    fn dry_run_mentions_roots_and_policy(plan: PlacementPlan, recipe: Recipe) {
        let info = DryRunInfo {
            recipe: &recipe,
            source_root: Utf8Path::new("/src/spdlog"),
            package_root: Utf8Path::new("/pkg"),
            overwrite: OverwritePolicy::SkipIdentical,
            plan: &plan,
        };
        let text = info.display_text();
        assert!(text.contains("Dry run"));
        assert!(text.contains("Package root: /pkg"));
        assert!(text.contains("Overwrite: skip identical"));
        assert!(text.contains("libspdlog.a"));
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "hello");
        assert_eq!(buffer, b"hello\n");
    }
}
