//! Text blocks injected into the root rule.
//!
//! Everything here is string construction over already converted documents.

use crate::adapters::RefStyle;
use crate::document::ToolDocument;
use regex::Regex;
use std::sync::LazyLock;

const AT_LINES_HEADER: &str = "Please also reference the following documents as needed:";

const TOON_HEADER: &str = "Please also reference the following rules as needed. The list below \
is encoded in TOON (Token-Oriented Object Notation): one row per rule, with the fields named in \
the header. In each path, `@` stands for the project root directory.";

static NUMBER_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid regex")
});

/// Lists `docs` in input order, or `None` when there is nothing to list.
pub fn references_block(style: RefStyle, docs: &[&ToolDocument]) -> Option<String> {
    if docs.is_empty() {
        return None;
    }
    match style {
        RefStyle::None => None,
        RefStyle::AtLines => Some(at_lines_block(docs)),
        RefStyle::Toon => Some(toon_block(docs)),
    }
}

fn at_lines_block(docs: &[&ToolDocument]) -> String {
    let lines: Vec<String> = docs
        .iter()
        .map(|doc| {
            format!(
                "@{} description:\"{}\" applyTo:\"{}\"",
                doc.relative_path_string(),
                escape_line_value(doc.frontmatter.description().unwrap_or_default()),
                escape_line_value(&doc.frontmatter.globs().join(",")),
            )
        })
        .collect();
    format!("{AT_LINES_HEADER}\n\n{}", lines.join("\n"))
}

/// Keeps a quoted value on one line.
fn escape_line_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn toon_block(docs: &[&ToolDocument]) -> String {
    let rows: Vec<String> = docs
        .iter()
        .map(|doc| {
            let path = format!("@{}", doc.relative_path_string());
            let description = doc.frontmatter.description().unwrap_or_default();
            let apply_to = doc.frontmatter.globs().join(",");
            format!(
                "  {},{},{}",
                toon_value(&path),
                toon_value(description),
                toon_value(&apply_to)
            )
        })
        .collect();
    format!(
        "{TOON_HEADER}\n\nrules[{}]{{path,description,applyTo}}:\n{}",
        docs.len(),
        rows.join("\n")
    )
}

/// Quotes a TOON value only when a bare value would be ambiguous.
pub(crate) fn toon_value(value: &str) -> String {
    if !toon_needs_quotes(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn toon_needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.trim() != value
        || matches!(value, "true" | "false" | "null")
        || NUMBER_LIKE.is_match(value)
        || value.starts_with('-')
        || value.chars().any(|c| {
            matches!(c, ',' | ':' | '"' | '\\' | '[' | ']' | '{' | '}' | '#') || c.is_control()
        })
}

/// Fallback directories for the features a tool simulates, relative to the project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedDirs {
    pub commands: Option<String>,
    pub subagents: Option<String>,
    pub skills: Option<String>,
}

impl SimulatedDirs {
    pub fn is_empty(&self) -> bool {
        self.commands.is_none() && self.subagents.is_none() && self.skills.is_none()
    }
}

/// Instructions for emulating unsupported features, or `None` if nothing is simulated.
pub fn conventions_block(dirs: &SimulatedDirs) -> Option<String> {
    if dirs.is_empty() {
        return None;
    }

    let mut parts = vec![
        "# Additional Conventions\n\n\
         This tool has no built-in support for some of the features used in this project. \
         Follow the conventions below to emulate them."
            .to_string(),
    ];

    if let Some(dir) = &dirs.commands {
        parts.push(format!(
            "## Simulated Commands\n\n\
             Custom commands are Markdown files in `{dir}/`. When the user writes \
             `s/<command> [arguments]`, read `{dir}/<command>.md` and carry out its \
             instructions, passing along any arguments. The `s/` prefix keeps these commands \
             apart from built-in slash commands."
        ));
    }

    if let Some(dir) = &dirs.subagents {
        parts.push(format!(
            "## Simulated Subagents\n\n\
             Subagents are Markdown files in `{dir}/`. When the user asks for a subagent, \
             for example \"use the reviewer subagent to check this change\", read \
             `{dir}/<subagent>.md`, do the task the way that file describes, and report \
             the result back."
        ));
    }

    if let Some(dir) = &dirs.skills {
        parts.push(format!(
            "## Simulated Skills\n\n\
             Skills are directories in `{dir}/`, each holding a `SKILL.md` and optional \
             supporting files. Before starting a task, check the `description` of each \
             skill; when one applies, read its `SKILL.md` and follow it."
        ));
    }

    Some(parts.join("\n\n"))
}

/// Joins the generated sections and the original body with blank lines.
pub fn compose_root_body(sections: &[Option<String>], body: &str) -> String {
    sections
        .iter()
        .flatten()
        .map(String::as_str)
        .chain(std::iter::once(body))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
