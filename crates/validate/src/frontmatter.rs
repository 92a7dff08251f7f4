//! YAML frontmatter parsing and rendering.
//!
//! Every markdown document handled by rulekit may start with a YAML header
//! delimited by `---` lines:
//!
//! ```text
//! ---
//! description: Style guide
//! globs: ["*.ts"]
//! ---
//! Body text.
//! ```
//!
//! Documents without a header parse to `T::default()` with the whole text as
//! the body. An opening `---` without a closing one is treated as body text.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors raised while reading or writing a frontmatter header.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// The header is present but is not valid YAML for the expected shape.
    #[error("Invalid YAML frontmatter: {0}")]
    InvalidYaml(String),
    /// The header could not be serialized.
    #[error("Failed to render frontmatter: {0}")]
    Render(String),
}

/// Result of parsing a document with frontmatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument<T> {
    /// Parsed header, or `T::default()` when no header is present.
    pub frontmatter: T,
    /// The markdown content after the header.
    pub body: String,
}

/// Split content into the raw YAML header and the body.
pub fn split_frontmatter(content: &str) -> (Option<String>, String) {
    let trimmed = content.trim_start();

    if !trimmed.starts_with("---") {
        return (None, content.to_string());
    }

    let after_open = trimmed[3..].trim_start_matches(['\r', '\n']);

    // An empty header closes immediately.
    if let Some(rest) = after_open.strip_prefix("---") {
        return (Some(String::new()), strip_leading_newlines(rest));
    }

    if let Some(end_pos) = after_open.find("\n---") {
        let yaml = after_open[..end_pos].trim_end_matches('\r');
        let rest = &after_open[end_pos + 4..];
        (Some(yaml.to_string()), strip_leading_newlines(rest))
    } else {
        (None, content.to_string())
    }
}

fn strip_leading_newlines(rest: &str) -> String {
    rest.trim_start_matches(['\r', '\n']).to_string()
}

/// Parse a document's YAML header into `T`.
pub fn parse_frontmatter<T>(content: &str) -> Result<ParsedDocument<T>, FrontmatterError>
where
    T: DeserializeOwned + Default,
{
    let (raw_yaml, body) = split_frontmatter(content);

    let Some(yaml) = raw_yaml else {
        return Ok(ParsedDocument {
            frontmatter: T::default(),
            body,
        });
    };

    let frontmatter = if yaml.trim().is_empty() {
        T::default()
    } else {
        serde_yaml::from_str::<T>(&yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok(ParsedDocument { frontmatter, body })
}

/// Render `frontmatter` as a YAML header followed by `body`.
///
/// A header that serializes to an empty mapping is omitted.
pub fn render_frontmatter<T: Serialize>(
    frontmatter: &T,
    body: &str,
) -> Result<String, FrontmatterError> {
    let yaml =
        serde_yaml::to_string(frontmatter).map_err(|e| FrontmatterError::Render(e.to_string()))?;
    let yaml = yaml.trim_end();
    if yaml.is_empty() || yaml == "{}" {
        return Ok(body.to_string());
    }
    Ok(format!("---\n{yaml}\n---\n{body}"))
}
