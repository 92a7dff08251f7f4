//! Tool identifiers, document kinds and install modes.

use crate::error::{Result, SyncError};
use rulekit_validate::DocumentSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wildcard accepted wherever a list of tools or features is expected.
pub const WILDCARD: &str = "*";

/// AI coding tools rulekit can generate for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolTarget {
    AgentsMd,
    AmazonQCli,
    ClaudeCode,
    Cline,
    CodexCli,
    Copilot,
    Cursor,
    GeminiCli,
    Junie,
    Kiro,
    OpenCode,
    QwenCode,
    Roo,
    Warp,
    Windsurf,
}

impl ToolTarget {
    pub const ALL: [ToolTarget; 15] = [
        ToolTarget::AgentsMd,
        ToolTarget::AmazonQCli,
        ToolTarget::ClaudeCode,
        ToolTarget::Cline,
        ToolTarget::CodexCli,
        ToolTarget::Copilot,
        ToolTarget::Cursor,
        ToolTarget::GeminiCli,
        ToolTarget::Junie,
        ToolTarget::Kiro,
        ToolTarget::OpenCode,
        ToolTarget::QwenCode,
        ToolTarget::Roo,
        ToolTarget::Warp,
        ToolTarget::Windsurf,
    ];

    /// Canonical identifier, as used in `targets:` and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolTarget::AgentsMd => "agentsmd",
            ToolTarget::AmazonQCli => "amazonqcli",
            ToolTarget::ClaudeCode => "claudecode",
            ToolTarget::Cline => "cline",
            ToolTarget::CodexCli => "codexcli",
            ToolTarget::Copilot => "copilot",
            ToolTarget::Cursor => "cursor",
            ToolTarget::GeminiCli => "geminicli",
            ToolTarget::Junie => "junie",
            ToolTarget::Kiro => "kiro",
            ToolTarget::OpenCode => "opencode",
            ToolTarget::QwenCode => "qwencode",
            ToolTarget::Roo => "roo",
            ToolTarget::Warp => "warp",
            ToolTarget::Windsurf => "windsurf",
        }
    }
}

impl fmt::Display for ToolTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolTarget {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        let id = s.trim();
        ToolTarget::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(id))
            .ok_or_else(|| SyncError::unknown_target(id))
    }
}

/// Canonical document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Rules,
    Commands,
    Subagents,
    Skills,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Rules,
        Feature::Commands,
        Feature::Subagents,
        Feature::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Rules => "rules",
            Feature::Commands => "commands",
            Feature::Subagents => "subagents",
            Feature::Skills => "skills",
        }
    }

    /// Skills are stored as one directory per document; everything else as one file.
    pub fn is_dir_kind(&self) -> bool {
        matches!(self, Feature::Skills)
    }

    pub fn schema(&self) -> DocumentSchema {
        match self {
            Feature::Rules => DocumentSchema::Rule,
            Feature::Commands => DocumentSchema::Command,
            Feature::Subagents => DocumentSchema::Subagent,
            Feature::Skills => DocumentSchema::Skill,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        let id = s.trim();
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(id))
            .ok_or_else(|| SyncError::UnsupportedTarget {
                target: format!("feature '{id}'"),
                feature: None,
            })
    }
}

/// Install scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Paths are rooted at the project base directory.
    Project,
    /// Paths are rooted at the user's home directory.
    Global,
}

impl Mode {
    pub fn from_global(global: bool) -> Self {
        if global {
            Mode::Global
        } else {
            Mode::Project
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Project => "project",
            Mode::Global => "global",
        })
    }
}

/// Parses tool ids, expanding `*` to every tool. Duplicates are dropped.
pub fn parse_targets<S: AsRef<str>>(ids: &[S]) -> Result<Vec<ToolTarget>> {
    expand(ids, &ToolTarget::ALL)
}

/// Parses feature ids, expanding `*` to every feature. Duplicates are dropped.
pub fn parse_features<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Feature>> {
    expand(ids, &Feature::ALL)
}

fn expand<T, S>(ids: &[S], all: &[T]) -> Result<Vec<T>>
where
    T: FromStr<Err = SyncError> + Copy + PartialEq,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for id in ids {
        let id = id.as_ref().trim();
        let parsed = if id == WILDCARD {
            all.to_vec()
        } else {
            vec![id.parse::<T>()?]
        };
        for item in parsed {
            if !out.contains(&item) {
                out.push(item);
            }
        }
    }
    Ok(out)
}
