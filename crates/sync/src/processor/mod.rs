//! Processors turn canonical documents into tool documents and back.
//!
//! [`FileProcessor`] handles rules, commands and subagents; [`DirProcessor`]
//! handles skills. [`Processor`] picks the right one for a feature.

mod dir;
mod file;
pub mod sections;

pub use dir::DirProcessor;
pub use file::{FileProcessor, CONVENTIONS_RULE_STEM};

use crate::canonical::CanonicalDocument;
use crate::document::ToolDocument;
use crate::error::Result;
use crate::paths::output_base;
use crate::registry::Registry;
use crate::tool::{Feature, Mode, ToolTarget};
use std::path::PathBuf;

/// Per-call parameters for a processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorOptions {
    /// Project directory holding `.rulekit/`.
    pub base_dir: PathBuf,
    /// Root for global-mode output.
    pub home_dir: PathBuf,
    pub tool: ToolTarget,
    pub global: bool,
    pub simulate_commands: bool,
    pub simulate_subagents: bool,
    pub simulate_skills: bool,
}

impl ProcessorOptions {
    pub fn new(base_dir: impl Into<PathBuf>, home_dir: impl Into<PathBuf>, tool: ToolTarget) -> Self {
        Self {
            base_dir: base_dir.into(),
            home_dir: home_dir.into(),
            tool,
            global: false,
            simulate_commands: false,
            simulate_subagents: false,
            simulate_skills: false,
        }
    }

    pub fn with_global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    pub fn with_simulation(mut self, commands: bool, subagents: bool, skills: bool) -> Self {
        self.simulate_commands = commands;
        self.simulate_subagents = subagents;
        self.simulate_skills = skills;
        self
    }

    pub fn mode(&self) -> Mode {
        Mode::from_global(self.global)
    }

    /// Directory tool paths are relative to.
    pub fn output_base(&self) -> PathBuf {
        output_base(self.mode(), &self.base_dir, &self.home_dir)
    }

    /// The simulate flag for `feature`. Rules are never simulated.
    pub fn simulates(&self, feature: Feature) -> bool {
        match feature {
            Feature::Rules => false,
            Feature::Commands => self.simulate_commands,
            Feature::Subagents => self.simulate_subagents,
            Feature::Skills => self.simulate_skills,
        }
    }
}

/// Result of a deletion load: the documents found and the files left out.
#[derive(Debug, Default)]
pub struct DeletionLoad {
    pub documents: Vec<ToolDocument>,
    /// One entry per file that could not be read or parsed.
    pub warnings: Vec<String>,
}

/// A file or directory processor, chosen by feature.
#[derive(Debug)]
pub enum Processor<'a> {
    File(FileProcessor<'a>),
    Dir(DirProcessor<'a>),
}

impl<'a> Processor<'a> {
    pub fn new(registry: &'a Registry, feature: Feature, options: ProcessorOptions) -> Self {
        if feature.is_dir_kind() {
            Processor::Dir(DirProcessor::new(registry, options))
        } else {
            Processor::File(FileProcessor::new(registry, feature, options))
        }
    }

    pub async fn load_canonical_documents(&self) -> Result<Vec<CanonicalDocument>> {
        match self {
            Processor::File(p) => p.load_canonical_documents().await,
            Processor::Dir(p) => p.load_canonical_documents().await,
        }
    }

    pub fn convert_canonical_to_tool(&self, docs: &[CanonicalDocument]) -> Result<Vec<ToolDocument>> {
        match self {
            Processor::File(p) => p.convert_canonical_to_tool(docs),
            Processor::Dir(p) => p.convert_canonical_to_tool(docs),
        }
    }

    pub fn convert_tool_to_canonical(&self, docs: &[ToolDocument]) -> Result<Vec<CanonicalDocument>> {
        match self {
            Processor::File(p) => p.convert_tool_to_canonical(docs),
            Processor::Dir(p) => p.convert_tool_to_canonical(docs),
        }
    }

    pub async fn load_tool_documents(&self) -> Result<Vec<ToolDocument>> {
        match self {
            Processor::File(p) => p.load_tool_documents().await,
            Processor::Dir(p) => p.load_tool_documents().await,
        }
    }

    pub async fn load_tool_documents_for_deletion(&self) -> Result<DeletionLoad> {
        match self {
            Processor::File(p) => Ok(p.load_tool_documents_for_deletion().await),
            Processor::Dir(p) => Ok(DeletionLoad {
                documents: p.load_tool_documents_for_deletion().await?,
                warnings: Vec::new(),
            }),
        }
    }
}
