//! Adapters describe how one tool stores one feature.
//!
//! An [`Adapter`] is plain data: which on-disk frontmatter shape the tool
//! uses, where files live in project and global mode, and how references
//! are rendered into the root rule. Conversion code dispatches on these
//! fields, never on the tool identifier.

mod builtin;
pub mod format;
pub(crate) mod utils;

pub use builtin::builtin_entries;
pub use format::{Format, ToolFrontmatter};

use crate::canonical::CanonicalDocument;
use crate::tool::{Feature, ToolTarget};

/// Whether a tool supports the feature natively or through a stand-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Converts in both directions.
    Native,
    /// Forward-only projection into a fallback location.
    Simulated,
}

/// A single fixed-name file, e.g. `CLAUDE.md` at the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootLocation {
    pub dir: &'static str,
    pub file: &'static str,
}

/// A directory of documents sharing an extension, e.g. `.cursor/rules/*.mdc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonRootLocation {
    pub dir: &'static str,
    pub extension: &'static str,
}

/// Where an adapter's documents live, relative to the project or home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One file per document, with an optional fixed-name root file.
    Files {
        root: Option<RootLocation>,
        non_root: Option<NonRootLocation>,
    },
    /// One sub-directory per document holding a `SKILL.md` manifest.
    Dir { dir: &'static str },
}

impl Layout {
    /// Directory holding non-root documents (or skill directories).
    pub fn document_dir(&self) -> Option<&'static str> {
        match self {
            Layout::Files { non_root, .. } => non_root.map(|n| n.dir),
            Layout::Dir { dir } => Some(dir),
        }
    }
}

/// How the root rule lists the other rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefStyle {
    None,
    /// Tabular TOON block.
    Toon,
    /// One `@path description:"..." applyTo:"..."` line per rule.
    AtLines,
}

/// Conversion rules for one tool and one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Adapter {
    pub tool: ToolTarget,
    pub feature: Feature,
    pub family: Family,
    pub format: Format,
    /// Layout in project mode; `None` when the tool only has a user-scope location.
    pub project: Option<Layout>,
    /// Layout in global mode, rooted at the home directory.
    pub global: Option<Layout>,
    pub references: RefStyle,
    /// Write the additional conventions as a separate rule file.
    pub conventions_rule: bool,
}

impl Adapter {
    pub fn new(tool: ToolTarget, feature: Feature, format: Format, project: Layout) -> Self {
        Self {
            tool,
            feature,
            family: Family::Native,
            format,
            project: Some(project),
            global: None,
            references: RefStyle::None,
            conventions_rule: false,
        }
    }

    /// An adapter with no project layout.
    pub fn global_only(tool: ToolTarget, feature: Feature, format: Format, global: Layout) -> Self {
        Self {
            project: None,
            global: Some(global),
            ..Self::new(tool, feature, format, global)
        }
    }

    /// A simulated adapter. Simulated adapters never have a global layout.
    pub fn simulated(tool: ToolTarget, feature: Feature, format: Format, project: Layout) -> Self {
        Self {
            family: Family::Simulated,
            ..Self::new(tool, feature, format, project)
        }
    }

    pub fn with_global(mut self, global: Layout) -> Self {
        if self.family == Family::Native {
            self.global = Some(global);
        }
        self
    }

    pub fn with_references(mut self, references: RefStyle) -> Self {
        self.references = references;
        self
    }

    pub fn with_conventions_rule(mut self) -> Self {
        self.conventions_rule = true;
        self
    }

    pub fn is_simulated(&self) -> bool {
        self.family == Family::Simulated
    }

    /// True if the document's `targets` include `*` or this tool.
    pub fn is_targeted_by(&self, canonical: &CanonicalDocument) -> bool {
        canonical.targets_tool(self.tool)
    }
}

/// Shorthand for a file layout with both locations.
pub const fn files(
    root: Option<RootLocation>,
    non_root: Option<NonRootLocation>,
) -> Layout {
    Layout::Files { root, non_root }
}

pub const fn root(dir: &'static str, file: &'static str) -> Option<RootLocation> {
    Some(RootLocation { dir, file })
}

pub const fn non_root(dir: &'static str, extension: &'static str) -> Option<NonRootLocation> {
    Some(NonRootLocation { dir, extension })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_adapters_refuse_global_layouts() {
        let adapter = Adapter::simulated(
            ToolTarget::CodexCli,
            Feature::Commands,
            Format::Described,
            files(None, non_root(".codex/commands", ".md")),
        )
        .with_global(files(None, non_root(".codex/commands", ".md")));
        assert!(adapter.global.is_none());
        assert!(adapter.is_simulated());
    }

    #[test]
    fn global_only_has_no_project_layout() {
        let adapter = Adapter::global_only(
            ToolTarget::CodexCli,
            Feature::Skills,
            Format::Skill,
            Layout::Dir { dir: ".codex/skills" },
        );
        assert!(adapter.project.is_none());
        assert_eq!(
            adapter.global.and_then(|l| l.document_dir()),
            Some(".codex/skills")
        );
    }
}
