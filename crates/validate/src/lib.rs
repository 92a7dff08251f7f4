//! Frontmatter parsing and schema validation for rulekit documents.
//!
//! Canonical documents (rules, commands, subagents and skills) are markdown
//! files with an optional YAML header. This crate splits and parses those
//! headers and checks them against the per-kind schema.
//!
//! # Example
//!
//! ```rust
//! use rulekit_validate::{parse_canonical, DocumentSchema};
//! use std::path::Path;
//!
//! let content = "---\nname: review\ndescription: Review a diff\n---\nReview the staged changes.";
//!
//! let (parsed, result) = parse_canonical(Path::new("SKILL.md"), DocumentSchema::Skill, content).unwrap();
//! assert!(!result.has_errors());
//! assert_eq!(parsed.frontmatter.name.as_deref(), Some("review"));
//! assert_eq!(parsed.body, "Review the staged changes.");
//! ```

pub mod common;
pub mod frontmatter;
pub mod schema;

pub use common::{Severity, ValidationIssue, ValidationResult};
pub use frontmatter::{
    parse_frontmatter, render_frontmatter, split_frontmatter, FrontmatterError, ParsedDocument,
};
pub use schema::{validate_frontmatter, CanonicalFrontmatter, DocumentSchema, TargetsField};

use std::path::Path;

/// Parse a canonical document and validate its header.
///
/// YAML errors are returned as `Err`; schema problems are reported in the
/// returned [`ValidationResult`] so callers decide how strict to be.
pub fn parse_canonical(
    path: &Path,
    schema: DocumentSchema,
    content: &str,
) -> Result<(ParsedDocument<CanonicalFrontmatter>, ValidationResult), FrontmatterError> {
    let parsed = parse_frontmatter::<CanonicalFrontmatter>(content)?;
    let result = validate_frontmatter(path, schema, &parsed.frontmatter);
    for issue in result.warnings() {
        tracing::warn!(path = %path.display(), %issue, "canonical document warning");
    }
    Ok((parsed, result))
}
