//! Packaging recipes.
//!
//! A recipe describes one third-party package: its metadata and the ordered
//! rules that relocate its artefacts. Recipes are TOML documents with a
//! `[package]` table and one `[[rule]]` table per rule:
//!
//! ```toml
//! [package]
//! name = "spdlog"
//! version = "1.10.0"
//!
//! [[rule]]
//! pattern = "*.h"
//! source = "include"
//! destination = "3rdparty/{name}/include"
//! ```
//!
//! `{name}` is replaced with the package name when the recipe is loaded.
//! `{target}` is left in place and substituted per packaging run.

use crate::error::{PlacementError, Result};
use crate::rule::ArtifactRule;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// The placeholder substituted with the package name at load time.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Origin label used in errors for the embedded recipe.
const BUILTIN_ORIGIN: &str = "<builtin>";

/// The embedded `spdlog` recipe.
const BUILTIN_RECIPE: &str = include_str!("../recipes/spdlog.toml");

/// Descriptive package metadata. Carries no behaviour.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeMetadata {
    /// Package name, also substituted for `{name}` in rules.
    pub name: String,
    /// Upstream version being packaged.
    pub version: String,
    /// Where the upstream sources live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// License identifier or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// One-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One `[[rule]]` table as written in a recipe file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// File-name pattern.
    pub pattern: String,
    /// Source directory template, relative to the source root.
    pub source: String,
    /// Destination directory template, relative to the package root.
    pub destination: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeFile {
    package: RecipeMetadata,
    #[serde(default, rename = "rule")]
    rules: Vec<RuleConfig>,
}

/// A loaded recipe: metadata plus ready-to-resolve rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recipe {
    /// Package metadata.
    pub metadata: RecipeMetadata,
    /// Rules in declaration order.
    pub rules: Vec<ArtifactRule>,
}

impl Recipe {
    /// Parse a recipe from TOML text.
    ///
    /// `origin` names the source of the text in error messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use stevedore::recipe::Recipe;
    ///
    /// let recipe = Recipe::from_toml(
    ///     concat!(
    ///         "[package]\nname = \"fmt\"\nversion = \"9.1.0\"\n",
    ///         "[[rule]]\npattern = \"*{name}*\"\nsource = \"lib\"\n",
    ///         "destination = \"3rdparty/{name}/lib/{target}\"\n",
    ///     ),
    ///     "inline",
    /// )
    /// .expect("valid recipe");
    /// assert_eq!(recipe.rules[0].pattern().as_str(), "*fmt*");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::Recipe`] when the TOML is malformed, has
    /// unknown fields, declares no rules, has an unusable package name, or
    /// contains a rule that fails validation.
    pub fn from_toml(source: &str, origin: &str) -> Result<Self> {
        let recipe_error = |reason: String| PlacementError::Recipe {
            path: origin.to_owned(),
            reason,
        };

        let file: RecipeFile = toml::from_str(source).map_err(|e| recipe_error(e.to_string()))?;
        validate_name(&file.package.name).map_err(recipe_error)?;
        if file.rules.is_empty() {
            return Err(recipe_error("recipe declares no [[rule]] tables".to_owned()));
        }

        let rules = file
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                expand_rule(rule, &file.package.name)
                    .map_err(|e| recipe_error(format!("rule {index}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            metadata: file.package,
            rules,
        })
    }

    /// Load a recipe from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::Recipe`] if the file cannot be read or fails
    /// to parse.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| PlacementError::Recipe {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&source, path.as_str())
    }

    /// The embedded `spdlog` recipe.
    ///
    /// Headers (`*.h`) under `include/` land in `3rdparty/spdlog/include`;
    /// libraries matching `*spdlog*` under `../../output/<target>/staticlib`
    /// land in `3rdparty/spdlog/output/<target>/staticlib`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::Recipe`] only if the embedded document is
    /// itself invalid.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_RECIPE, BUILTIN_ORIGIN)
    }

    /// Load `path` when given, otherwise fall back to [`Self::builtin`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::load`] or [`Self::builtin`].
    pub fn load_or_builtin(path: Option<&Utf8Path>) -> Result<Self> {
        path.map_or_else(Self::builtin, Self::load)
    }
}

fn validate_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err("package name is empty".to_owned());
    }
    if name.contains(['/', '\\', '{', '}']) || name.contains("..") {
        return Err(format!(
            "package name {name:?} must be usable as a single path segment"
        ));
    }
    Ok(())
}

fn expand_rule(rule: &RuleConfig, name: &str) -> Result<ArtifactRule> {
    let expand = |text: &str| text.replace(NAME_PLACEHOLDER, name);
    ArtifactRule::new(
        &expand(&rule.pattern),
        &expand(&rule.source),
        &expand(&rule.destination),
    )
}
