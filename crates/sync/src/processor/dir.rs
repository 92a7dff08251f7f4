use super::ProcessorOptions;
use crate::adapters::utils::is_hidden_path;
use crate::adapters::{Adapter, Family, Layout};
use crate::canonical::{read_skill_dir, walk_error, CanonicalDocument, CanonicalStore};
use crate::document::{Placement, ToolDocument};
use crate::error::Result;
use crate::paths::resolve_paths;
use crate::registry::Registry;
use crate::tool::Feature;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Processor for skills: one directory per document.
#[derive(Debug)]
pub struct DirProcessor<'a> {
    registry: &'a Registry,
    options: ProcessorOptions,
}

impl<'a> DirProcessor<'a> {
    pub fn new(registry: &'a Registry, options: ProcessorOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    fn adapter(&self) -> Result<(&'a Adapter, Layout)> {
        let mode = self.options.mode();
        let adapter = self
            .registry
            .resolve(Feature::Skills, self.options.tool, mode)?;
        let layout = resolve_paths(adapter, mode)?;
        Ok((adapter, layout))
    }

    pub async fn load_canonical_documents(&self) -> Result<Vec<CanonicalDocument>> {
        CanonicalStore::new(&self.options.base_dir)
            .load(Feature::Skills, self.options.mode())
            .await
    }

    pub fn convert_canonical_to_tool(&self, docs: &[CanonicalDocument]) -> Result<Vec<ToolDocument>> {
        let (adapter, layout) = self.adapter()?;
        let base = self.options.output_base();
        Ok(docs
            .iter()
            .filter(|doc| adapter.is_targeted_by(doc))
            .filter_map(|doc| ToolDocument::from_canonical(adapter, layout, doc, &base))
            .collect())
    }

    pub fn convert_tool_to_canonical(&self, docs: &[ToolDocument]) -> Result<Vec<CanonicalDocument>> {
        let mut out = Vec::with_capacity(docs.len());
        for doc in docs {
            if doc.family == Family::Simulated {
                debug!(
                    tool = %doc.tool,
                    path = %doc.relative_path().display(),
                    "skipping simulated skill"
                );
                continue;
            }
            out.push(doc.to_canonical()?);
        }
        Ok(out)
    }

    /// Loads every skill directory. A directory without `SKILL.md` fails the call.
    pub async fn load_tool_documents(&self) -> Result<Vec<ToolDocument>> {
        let (adapter, layout) = self.adapter()?;
        let Layout::Dir { dir } = layout else {
            return Ok(Vec::new());
        };
        let base = self.options.output_base();
        let root = base.join(dir);
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| walk_error(&root, e))?;
            let name = PathBuf::from(entry.file_name());
            if entry.file_type().is_dir() && !is_hidden_path(&name) {
                names.push(name);
            }
        }

        try_join_all(
            names
                .into_iter()
                .map(|name| read_skill(adapter, &base, Placement::skill(adapter.format, dir, name))),
        )
        .await
    }

    /// Same as [`Self::load_tool_documents`].
    pub async fn load_tool_documents_for_deletion(&self) -> Result<Vec<ToolDocument>> {
        self.load_tool_documents().await
    }
}

async fn read_skill(adapter: &Adapter, base: &Path, placement: Placement) -> Result<ToolDocument> {
    let skill_dir = base.join(&placement.relative_dir);
    let (content, files) = read_skill_dir(&skill_dir).await?;
    Ok(ToolDocument::from_file(adapter, base, placement, &content)?.with_files(files))
}
