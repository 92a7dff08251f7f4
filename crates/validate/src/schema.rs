//! Canonical frontmatter schema.
//!
//! One header shape serves every canonical document kind; which fields are
//! allowed or required depends on the [`DocumentSchema`]. Keys that are not
//! part of the shared schema are kept in [`CanonicalFrontmatter::extra`] so
//! per-tool override blocks (e.g. `claudecode: { allowed-tools: [...] }`)
//! survive parsing.

use crate::common::{ValidationIssue, ValidationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// Maximum skill name length accepted by the tools that consume skills.
pub const MAX_SKILL_NAME_LENGTH: usize = 64;
/// Maximum description length before tools start truncating.
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

static SKILL_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

/// Canonical document kinds, as far as schema rules are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSchema {
    Rule,
    Command,
    Subagent,
    Skill,
}

/// `targets` accepts either a single string (usually `"*"`) or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetsField {
    One(String),
    Many(Vec<String>),
}

impl TargetsField {
    /// The listed identifiers, in declaration order.
    pub fn ids(&self) -> Vec<&str> {
        match self {
            TargetsField::One(s) => vec![s.as_str()],
            TargetsField::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// Header of a canonical document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFrontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<TargetsField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globs: Option<Vec<String>>,
    /// Any other key, most notably per-tool override blocks.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Check a parsed header against the rules for `schema`.
pub fn validate_frontmatter(
    path: &Path,
    schema: DocumentSchema,
    frontmatter: &CanonicalFrontmatter,
) -> ValidationResult {
    let mut result = ValidationResult::new(path.to_path_buf());

    if schema != DocumentSchema::Rule {
        if frontmatter.root.is_some() {
            result.add_issue(ValidationIssue::error(
                "root",
                "only rules may declare a root document",
            ));
        }
        if frontmatter.globs.is_some() {
            result.add_issue(ValidationIssue::error("globs", "only rules may declare globs"));
        }
    }

    if schema == DocumentSchema::Skill {
        validate_skill_name(&mut result, frontmatter.name.as_deref());
        if frontmatter
            .description
            .as_deref()
            .is_none_or(|d| d.trim().is_empty())
        {
            result.add_issue(ValidationIssue::error(
                "description",
                "skills must describe when they apply",
            ));
        }
    }

    if let Some(description) = &frontmatter.description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            result.add_issue(ValidationIssue::warning(
                "description",
                format!("longer than {MAX_DESCRIPTION_LENGTH} characters"),
            ));
        }
    }

    if let Some(TargetsField::Many(ids)) = &frontmatter.targets {
        if ids.is_empty() {
            result.add_issue(ValidationIssue::warning(
                "targets",
                "empty list; the document will not be generated for any tool",
            ));
        }
    }

    if let Some(globs) = &frontmatter.globs {
        if globs.iter().any(|g| g.trim().is_empty()) {
            result.add_issue(ValidationIssue::error("globs", "glob patterns must not be empty"));
        }
    }

    result
}

fn validate_skill_name(result: &mut ValidationResult, name: Option<&str>) {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        result.add_issue(ValidationIssue::error("name", "skills require a name"));
        return;
    };

    if name.chars().count() > MAX_SKILL_NAME_LENGTH {
        result.add_issue(ValidationIssue::error(
            "name",
            format!("longer than {MAX_SKILL_NAME_LENGTH} characters"),
        ));
    }
    if !SKILL_NAME_REGEX.is_match(name) {
        result.add_issue(ValidationIssue::warning(
            "name",
            "use lowercase letters, digits and single hyphens",
        ));
    }
}
