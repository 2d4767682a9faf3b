//! Directory templates parameterised by the build target.
//!
//! Rule directories are written as relative paths that may embed the
//! `{target}` placeholder, for example `output/{target}/staticlib`. Templates
//! are parsed once when the rule is declared so that a typo such as
//! `{targte}` fails early rather than producing a literal directory name.

use crate::error::{PlacementError, Result};
use crate::target::BuildTarget;
use camino::Utf8PathBuf;
use serde::Serialize;
use std::fmt;

/// The placeholder substituted with the build target.
pub const TARGET_PLACEHOLDER: &str = "{target}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Target,
}

/// A relative directory template with optional `{target}` placeholders.
///
/// # Examples
///
/// ```
/// use stevedore::target::BuildTarget;
/// use stevedore::template::PathTemplate;
///
/// let template = PathTemplate::parse("output/{target}/staticlib").expect("valid");
/// let target: BuildTarget = "win-x64".parse().expect("valid");
/// assert_eq!(template.render(&target).as_str(), "output/win-x64/staticlib");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template string.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidInput`] when the template contains an
    /// unknown placeholder or an unbalanced brace.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            if literal.contains('}') {
                return Err(unbalanced(raw));
            }
            push_literal(&mut segments, literal);

            let Some(close) = tail.find('}') else {
                return Err(unbalanced(raw));
            };
            let (placeholder, after) = tail.split_at(close + 1);
            if placeholder != TARGET_PLACEHOLDER {
                return Err(PlacementError::invalid_input(format!(
                    "template {raw:?} uses unknown placeholder {placeholder}; only {TARGET_PLACEHOLDER} is supported"
                )));
            }
            segments.push(Segment::Target);
            rest = after;
        }

        if rest.contains('}') {
            return Err(unbalanced(raw));
        }
        push_literal(&mut segments, rest);

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    /// Substitute `target` into the template.
    #[must_use]
    pub fn render(&self, target: &BuildTarget) -> Utf8PathBuf {
        let rendered: String = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Target => target.as_str(),
            })
            .collect();
        Utf8PathBuf::from(rendered)
    }

    /// Whether the template embeds the build target.
    #[must_use]
    pub fn mentions_target(&self) -> bool {
        self.segments.contains(&Segment::Target)
    }

    /// The template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn push_literal(segments: &mut Vec<Segment>, literal: &str) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal.to_owned()));
    }
}

fn unbalanced(raw: &str) -> PlacementError {
    PlacementError::invalid_input(format!("template {raw:?} has an unbalanced brace"))
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PathTemplate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
