//! On-disk frontmatter shapes.
//!
//! Each tool reads a slightly different header. [`ToolFrontmatter`] holds one
//! variant per shape; tool-specific keys come from the canonical override
//! block for that tool and flow back into it on reverse conversion.

use crate::canonical::CanonicalDocument;
use crate::error::SyncError;
use crate::tool::{Feature, ToolTarget};
use rulekit_validate::{
    parse_frontmatter, render_frontmatter, CanonicalFrontmatter, FrontmatterError,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Keys a tool accepts beyond the ones rulekit maps itself.
pub type Extra = BTreeMap<String, Value>;

/// Keys shared with the canonical header; never copied from override blocks.
const RESERVED_KEYS: [&str; 5] = ["name", "description", "globs", "root", "targets"];

/// Frontmatter shape identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// No header.
    Bare,
    CursorRule,
    CopilotInstruction,
    KiroSteering,
    WindsurfRule,
    ClaudeCommand,
    CopilotPrompt,
    /// TOML with `description` and `prompt`.
    GeminiCommand,
    ClaudeSubagent,
    /// `name` and `description` only.
    Described,
    Skill,
}

/// Description and globs of a headerless document, kept in memory only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BareMeta {
    pub description: Option<String>,
    pub globs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globs: Option<String>,
    #[serde(rename = "alwaysApply", default)]
    pub always_apply: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopilotInstruction {
    #[serde(rename = "applyTo", default, skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KiroSteering {
    /// `always`, `fileMatch` or `manual`.
    #[serde(default = "default_inclusion")]
    pub inclusion: String,
    #[serde(
        rename = "fileMatchPattern",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_match_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindsurfRule {
    /// `always_on`, `glob`, `model_decision` or `manual`.
    #[serde(default = "default_trigger")]
    pub trigger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaudeCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "allowed-tools",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_tools: Option<Value>,
    #[serde(
        rename = "argument-hint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub argument_hint: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopilotPrompt {
    #[serde(default = "default_prompt_mode")]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeminiCommand {
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiToml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    prompt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaudeSubagent {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Described {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillHeader {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "allowed-tools",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_tools: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

fn default_inclusion() -> String {
    "always".to_string()
}

fn default_trigger() -> String {
    "always_on".to_string()
}

fn default_prompt_mode() -> String {
    "agent".to_string()
}

/// Typed header of a tool document.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolFrontmatter {
    Bare(BareMeta),
    CursorRule(CursorRule),
    CopilotInstruction(CopilotInstruction),
    KiroSteering(KiroSteering),
    WindsurfRule(WindsurfRule),
    ClaudeCommand(ClaudeCommand),
    CopilotPrompt(CopilotPrompt),
    GeminiCommand(GeminiCommand),
    ClaudeSubagent(ClaudeSubagent),
    Described(Described),
    Skill(SkillHeader),
}

/// Failure to read or write a tool header.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    #[error("{0}")]
    Toml(String),
}

impl FormatError {
    /// Attaches the file path.
    pub(crate) fn at(self, path: &Path) -> SyncError {
        match self {
            FormatError::Frontmatter(e) => SyncError::validation(path, e.to_string()),
            FormatError::Toml(message) => SyncError::Format {
                format: "TOML",
                path: path.to_path_buf(),
                message,
            },
        }
    }
}

impl ToolFrontmatter {
    /// Builds the header `format` expects from a canonical document.
    pub fn from_canonical(
        format: Format,
        tool: ToolTarget,
        canonical: &CanonicalDocument,
        root: bool,
    ) -> Self {
        let mut extra = override_extra(canonical, tool);
        let description = canonical.description().map(str::to_string);
        let globs = canonical.globs().to_vec();

        match format {
            Format::Bare => Self::Bare(BareMeta { description, globs }),
            Format::CursorRule => {
                let always_apply = take_bool(&mut extra, "alwaysApply")
                    .unwrap_or_else(|| cursor_always_applies(root, &globs));
                Self::CursorRule(CursorRule {
                    description,
                    globs: join_globs(&globs),
                    always_apply,
                    extra,
                })
            }
            Format::CopilotInstruction => {
                let apply_to = take_string(&mut extra, "applyTo")
                    .or_else(|| join_globs(&globs))
                    .unwrap_or_else(|| "**".to_string());
                Self::CopilotInstruction(CopilotInstruction {
                    apply_to: Some(apply_to),
                    description,
                    extra,
                })
            }
            Format::KiroSteering => {
                let inclusion = take_string(&mut extra, "inclusion")
                    .unwrap_or_else(|| kiro_inclusion(root, &globs).to_string());
                let file_match_pattern = take_string(&mut extra, "fileMatchPattern")
                    .or_else(|| (inclusion == "fileMatch").then(|| globs.join(",")));
                Self::KiroSteering(KiroSteering {
                    inclusion,
                    file_match_pattern,
                    description,
                    extra,
                })
            }
            Format::WindsurfRule => {
                let trigger = take_string(&mut extra, "trigger")
                    .unwrap_or_else(|| windsurf_trigger(root, &globs).to_string());
                Self::WindsurfRule(WindsurfRule {
                    trigger,
                    globs: join_globs(&globs),
                    description,
                    extra,
                })
            }
            Format::ClaudeCommand => Self::ClaudeCommand(ClaudeCommand {
                description,
                allowed_tools: extra.remove("allowed-tools"),
                argument_hint: take_string(&mut extra, "argument-hint"),
                extra,
            }),
            Format::CopilotPrompt => Self::CopilotPrompt(CopilotPrompt {
                mode: take_string(&mut extra, "mode").unwrap_or_else(default_prompt_mode),
                description,
                extra,
            }),
            Format::GeminiCommand => Self::GeminiCommand(GeminiCommand { description }),
            Format::ClaudeSubagent => Self::ClaudeSubagent(ClaudeSubagent {
                name: canonical.name(),
                description,
                model: take_string(&mut extra, "model"),
                extra,
            }),
            Format::Described => Self::Described(Described {
                name: (canonical.kind() != Feature::Commands).then(|| canonical.name()),
                description,
                extra,
            }),
            Format::Skill => Self::Skill(SkillHeader {
                name: canonical.name(),
                description,
                allowed_tools: extra.remove("allowed-tools"),
                extra,
            }),
        }
    }

    /// Canonical header for this tool header. `name` and `root` are left to the caller.
    pub fn to_canonical(&self, tool: ToolTarget, root: bool) -> CanonicalFrontmatter {
        let mut block = Extra::new();
        let (description, globs) = match self {
            Self::Bare(meta) => (meta.description.clone(), meta.globs.clone()),
            Self::CursorRule(h) => {
                block.extend(h.extra.clone());
                let globs = split_globs(h.globs.as_deref());
                if h.always_apply != cursor_always_applies(root, &globs) {
                    block.insert("alwaysApply".into(), Value::Bool(h.always_apply));
                }
                (h.description.clone(), globs)
            }
            Self::CopilotInstruction(h) => {
                block.extend(h.extra.clone());
                let apply_to = h.apply_to.as_deref().filter(|a| *a != "**");
                (h.description.clone(), split_globs(apply_to))
            }
            Self::KiroSteering(h) => {
                block.extend(h.extra.clone());
                let globs = split_globs(h.file_match_pattern.as_deref());
                if h.inclusion != kiro_inclusion(root, &globs) {
                    block.insert("inclusion".into(), Value::String(h.inclusion.clone()));
                }
                (h.description.clone(), globs)
            }
            Self::WindsurfRule(h) => {
                block.extend(h.extra.clone());
                let globs = split_globs(h.globs.as_deref());
                if h.trigger != windsurf_trigger(root, &globs) {
                    block.insert("trigger".into(), Value::String(h.trigger.clone()));
                }
                (h.description.clone(), globs)
            }
            Self::ClaudeCommand(h) => {
                block.extend(h.extra.clone());
                if let Some(tools) = &h.allowed_tools {
                    block.insert("allowed-tools".into(), tools.clone());
                }
                if let Some(hint) = &h.argument_hint {
                    block.insert("argument-hint".into(), Value::String(hint.clone()));
                }
                (h.description.clone(), Vec::new())
            }
            Self::CopilotPrompt(h) => {
                block.extend(h.extra.clone());
                if h.mode != default_prompt_mode() {
                    block.insert("mode".into(), Value::String(h.mode.clone()));
                }
                (h.description.clone(), Vec::new())
            }
            Self::GeminiCommand(h) => (h.description.clone(), Vec::new()),
            Self::ClaudeSubagent(h) => {
                block.extend(h.extra.clone());
                if let Some(model) = &h.model {
                    block.insert("model".into(), Value::String(model.clone()));
                }
                (h.description.clone(), Vec::new())
            }
            Self::Described(h) => {
                block.extend(h.extra.clone());
                (h.description.clone(), Vec::new())
            }
            Self::Skill(h) => {
                block.extend(h.extra.clone());
                if let Some(tools) = &h.allowed_tools {
                    block.insert("allowed-tools".into(), tools.clone());
                }
                (h.description.clone(), Vec::new())
            }
        };

        let mut extra = BTreeMap::new();
        if !block.is_empty() {
            let mapping = block
                .into_iter()
                .map(|(k, v)| (Value::String(k), v))
                .collect();
            extra.insert(tool.as_str().to_string(), Value::Mapping(mapping));
        }

        CanonicalFrontmatter {
            name: None,
            description,
            targets: None,
            root: None,
            globs: (!globs.is_empty()).then_some(globs),
            extra,
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Self::Bare(_) => Format::Bare,
            Self::CursorRule(_) => Format::CursorRule,
            Self::CopilotInstruction(_) => Format::CopilotInstruction,
            Self::KiroSteering(_) => Format::KiroSteering,
            Self::WindsurfRule(_) => Format::WindsurfRule,
            Self::ClaudeCommand(_) => Format::ClaudeCommand,
            Self::CopilotPrompt(_) => Format::CopilotPrompt,
            Self::GeminiCommand(_) => Format::GeminiCommand,
            Self::ClaudeSubagent(_) => Format::ClaudeSubagent,
            Self::Described(_) => Format::Described,
            Self::Skill(_) => Format::Skill,
        }
    }

    /// Name stored in the header, for shapes that carry one.
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            Self::ClaudeSubagent(h) => Some(h.name.as_str()),
            Self::Described(h) => h.name.as_deref(),
            Self::Skill(h) => Some(h.name.as_str()),
            _ => None,
        };
        name.filter(|n| !n.trim().is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Bare(m) => m.description.as_deref(),
            Self::CursorRule(h) => h.description.as_deref(),
            Self::CopilotInstruction(h) => h.description.as_deref(),
            Self::KiroSteering(h) => h.description.as_deref(),
            Self::WindsurfRule(h) => h.description.as_deref(),
            Self::ClaudeCommand(h) => h.description.as_deref(),
            Self::CopilotPrompt(h) => h.description.as_deref(),
            Self::GeminiCommand(h) => h.description.as_deref(),
            Self::ClaudeSubagent(h) => h.description.as_deref(),
            Self::Described(h) => h.description.as_deref(),
            Self::Skill(h) => h.description.as_deref(),
        }
    }

    /// Glob patterns the document applies to, as a list.
    pub fn globs(&self) -> Vec<String> {
        match self {
            Self::Bare(m) => m.globs.clone(),
            Self::CursorRule(h) => split_globs(h.globs.as_deref()),
            Self::CopilotInstruction(h) => {
                split_globs(h.apply_to.as_deref().filter(|a| *a != "**"))
            }
            Self::KiroSteering(h) => split_globs(h.file_match_pattern.as_deref()),
            Self::WindsurfRule(h) => split_globs(h.globs.as_deref()),
            _ => Vec::new(),
        }
    }

    /// Renders the file content for this header and `body`.
    pub fn render(&self, body: &str) -> Result<String, FormatError> {
        let rendered = match self {
            Self::Bare(_) => body.to_string(),
            Self::CursorRule(h) => render_frontmatter(h, body)?,
            Self::CopilotInstruction(h) => render_frontmatter(h, body)?,
            Self::KiroSteering(h) => render_frontmatter(h, body)?,
            Self::WindsurfRule(h) => render_frontmatter(h, body)?,
            Self::ClaudeCommand(h) => render_frontmatter(h, body)?,
            Self::CopilotPrompt(h) => render_frontmatter(h, body)?,
            Self::ClaudeSubagent(h) => render_frontmatter(h, body)?,
            Self::Described(h) => render_frontmatter(h, body)?,
            Self::Skill(h) => render_frontmatter(h, body)?,
            Self::GeminiCommand(h) => toml::to_string_pretty(&GeminiToml {
                description: h.description.clone(),
                prompt: body.to_string(),
            })
            .map_err(|e| FormatError::Toml(e.to_string()))?,
        };
        Ok(rendered)
    }

    /// Parses file content written in `format` into a header and body.
    pub fn parse(format: Format, content: &str) -> Result<(Self, String), FormatError> {
        fn yaml<T: DeserializeOwned + Default>(
            content: &str,
            wrap: fn(T) -> ToolFrontmatter,
        ) -> Result<(ToolFrontmatter, String), FormatError> {
            let parsed = parse_frontmatter::<T>(content)?;
            Ok((wrap(parsed.frontmatter), parsed.body))
        }

        match format {
            Format::Bare => Ok((Self::Bare(BareMeta::default()), content.to_string())),
            Format::CursorRule => yaml(content, Self::CursorRule),
            Format::CopilotInstruction => yaml(content, Self::CopilotInstruction),
            Format::KiroSteering => yaml(content, Self::KiroSteering),
            Format::WindsurfRule => yaml(content, Self::WindsurfRule),
            Format::ClaudeCommand => yaml(content, Self::ClaudeCommand),
            Format::CopilotPrompt => yaml(content, Self::CopilotPrompt),
            Format::ClaudeSubagent => yaml(content, Self::ClaudeSubagent),
            Format::Described => yaml(content, Self::Described),
            Format::Skill => yaml(content, Self::Skill),
            Format::GeminiCommand => {
                let parsed: GeminiToml =
                    toml::from_str(content).map_err(|e| FormatError::Toml(e.to_string()))?;
                Ok((
                    Self::GeminiCommand(GeminiCommand {
                        description: parsed.description,
                    }),
                    parsed.prompt,
                ))
            }
        }
    }
}

fn override_extra(canonical: &CanonicalDocument, tool: ToolTarget) -> Extra {
    let Some(block) = canonical.override_block(tool) else {
        return Extra::new();
    };
    block
        .iter()
        .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.clone())))
        .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
        .collect()
}

fn take_string(extra: &mut Extra, key: &str) -> Option<String> {
    extra.remove(key).and_then(|v| v.as_str().map(str::to_string))
}

fn take_bool(extra: &mut Extra, key: &str) -> Option<bool> {
    extra.remove(key).and_then(|v| v.as_bool())
}

fn join_globs(globs: &[String]) -> Option<String> {
    (!globs.is_empty()).then(|| globs.join(","))
}

fn split_globs(globs: Option<&str>) -> Vec<String> {
    globs
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn cursor_always_applies(root: bool, globs: &[String]) -> bool {
    root || globs.is_empty() || globs.iter().any(|g| g == "**/*" || g == "**")
}

fn kiro_inclusion(root: bool, globs: &[String]) -> &'static str {
    if !root && !globs.is_empty() {
        "fileMatch"
    } else {
        "always"
    }
}

fn windsurf_trigger(root: bool, globs: &[String]) -> &'static str {
    if !root && !globs.is_empty() {
        "glob"
    } else {
        "always_on"
    }
}
