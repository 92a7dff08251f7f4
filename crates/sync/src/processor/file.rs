use super::sections::{compose_root_body, conventions_block, references_block, SimulatedDirs};
use super::{DeletionLoad, ProcessorOptions};
use crate::adapters::utils::{is_hidden_path, strip_suffix};
use crate::adapters::{Adapter, Family, Layout};
use crate::canonical::{walk_error, CanonicalDocument, CanonicalStore};
use crate::document::{Placement, ToolDocument};
use crate::error::{Result, SyncError};
use crate::paths::resolve_paths;
use crate::registry::Registry;
use crate::tool::{Feature, Mode};
use futures::future::{join_all, try_join_all};
use rulekit_validate::CanonicalFrontmatter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File stem of the generated conventions rule.
pub const CONVENTIONS_RULE_STEM: &str = "additional-conventions";

/// Processor for the file kinds: rules, commands and subagents.
#[derive(Debug)]
pub struct FileProcessor<'a> {
    registry: &'a Registry,
    feature: Feature,
    options: ProcessorOptions,
}

impl<'a> FileProcessor<'a> {
    /// `feature` must be a file kind.
    pub fn new(registry: &'a Registry, feature: Feature, options: ProcessorOptions) -> Self {
        debug_assert!(!feature.is_dir_kind(), "skills use DirProcessor");
        Self {
            registry,
            feature,
            options,
        }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    fn adapter(&self) -> Result<(&'a Adapter, Layout)> {
        let mode = self.options.mode();
        let adapter = self.registry.resolve(self.feature, self.options.tool, mode)?;
        let layout = resolve_paths(adapter, mode)?;
        Ok((adapter, layout))
    }

    pub async fn load_canonical_documents(&self) -> Result<Vec<CanonicalDocument>> {
        CanonicalStore::new(&self.options.base_dir)
            .load(self.feature, self.options.mode())
            .await
    }

    /// Converts every targeted document; rules also get root-section injection.
    ///
    /// Tools that receive a generated conventions rule reject a canonical rule
    /// with the same name.
    pub fn convert_canonical_to_tool(&self, docs: &[CanonicalDocument]) -> Result<Vec<ToolDocument>> {
        let (adapter, layout) = self.adapter()?;
        let base = self.options.output_base();

        let mut out = Vec::with_capacity(docs.len());
        for doc in docs {
            if !adapter.is_targeted_by(doc) {
                debug!(
                    tool = %adapter.tool,
                    document = %doc.relative_file().display(),
                    "document not targeted at tool"
                );
                continue;
            }
            if adapter.conventions_rule && is_conventions_rule(doc.relative_file()) {
                return Err(SyncError::validation(
                    doc.relative_file(),
                    format!(
                        "`{CONVENTIONS_RULE_STEM}` is reserved for the rule {} generates",
                        adapter.tool
                    ),
                ));
            }
            match ToolDocument::from_canonical(adapter, layout, doc, &base) {
                Some(tool_doc) => out.push(tool_doc),
                None => debug!(
                    tool = %adapter.tool,
                    document = %doc.relative_file().display(),
                    "no location for document in this mode"
                ),
            }
        }

        if self.feature == Feature::Rules {
            out = self.inject_root_sections(adapter, layout, out)?;
        }
        Ok(out)
    }

    fn inject_root_sections(
        &self,
        adapter: &Adapter,
        layout: Layout,
        mut docs: Vec<ToolDocument>,
    ) -> Result<Vec<ToolDocument>> {
        let references = {
            let non_root: Vec<&ToolDocument> = docs.iter().filter(|d| !d.is_root()).collect();
            references_block(adapter.references, &non_root)
        };
        let conventions = match self.options.mode() {
            Mode::Project => conventions_block(&self.simulated_dirs()?),
            Mode::Global => None,
        };

        if docs.iter().filter(|d| d.is_root()).count() == 1 {
            let sections = [references, conventions.clone()];
            if let Some(root) = docs.iter_mut().find(|d| d.is_root()) {
                root.body = compose_root_body(&sections, &root.body);
            }
        }

        if let (true, Some(text)) = (adapter.conventions_rule, conventions) {
            let canonical = CanonicalDocument::new(
                Feature::Rules,
                format!("{CONVENTIONS_RULE_STEM}.md"),
                CanonicalFrontmatter {
                    description: Some("Conventions for features this tool simulates".into()),
                    ..Default::default()
                },
                text,
            );
            if let Some(doc) =
                ToolDocument::from_canonical(adapter, layout, &canonical, &self.options.output_base())
            {
                docs.push(doc);
            }
        }

        Ok(docs)
    }

    /// Simulated directories for the features whose flag is on and which the
    /// registry marks as simulated for this tool.
    fn simulated_dirs(&self) -> Result<SimulatedDirs> {
        Ok(SimulatedDirs {
            commands: self.simulated_dir(Feature::Commands)?,
            subagents: self.simulated_dir(Feature::Subagents)?,
            skills: self.simulated_dir(Feature::Skills)?,
        })
    }

    fn simulated_dir(&self, feature: Feature) -> Result<Option<String>> {
        let tool = self.options.tool;
        if !self.options.simulates(feature)
            || !self.registry.simulated_targets(feature).contains(&tool)
        {
            return Ok(None);
        }
        let adapter = self.registry.resolve(feature, tool, Mode::Project)?;
        let layout = resolve_paths(adapter, Mode::Project)?;
        Ok(layout.document_dir().map(str::to_string))
    }

    /// Reverse conversion. Simulated documents and the generated conventions
    /// rule are skipped.
    pub fn convert_tool_to_canonical(&self, docs: &[ToolDocument]) -> Result<Vec<CanonicalDocument>> {
        let generates_conventions = self.feature == Feature::Rules
            && self
                .registry
                .resolve(self.feature, self.options.tool, self.options.mode())?
                .conventions_rule;

        let mut out = Vec::with_capacity(docs.len());
        for doc in docs {
            if doc.family == Family::Simulated {
                debug!(
                    tool = %doc.tool,
                    path = %doc.relative_path().display(),
                    "skipping simulated document"
                );
                continue;
            }
            if generates_conventions && is_conventions_rule(&doc.placement.stem) {
                debug!(path = %doc.relative_path().display(), "skipping generated conventions rule");
                continue;
            }
            out.push(doc.to_canonical()?);
        }
        Ok(out)
    }

    /// Loads documents that a clean-before-write pass should remove.
    ///
    /// Never fails: broken files are logged, left out and listed as warnings.
    pub async fn load_tool_documents_for_deletion(&self) -> DeletionLoad {
        let (adapter, layout) = match self.adapter() {
            Ok(found) => found,
            Err(e) => return self.empty_deletion_load(e),
        };
        let base = self.options.output_base();
        let placements = match discover(adapter, layout, &base) {
            Ok(placements) => placements,
            Err(e) => return self.empty_deletion_load(e),
        };

        let reads = placements
            .into_iter()
            .map(|placement| read_tool_document(adapter, &base, placement));

        let mut load = DeletionLoad::default();
        for result in join_all(reads).await {
            match result {
                Ok(doc) => load.documents.push(doc),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable document");
                    load.warnings.push(format!("not deleted: {e}"));
                }
            }
        }
        load
    }

    fn empty_deletion_load(&self, error: SyncError) -> DeletionLoad {
        warn!(
            tool = %self.options.tool,
            feature = %self.feature,
            error = %error,
            "could not list existing documents for deletion"
        );
        DeletionLoad {
            documents: Vec::new(),
            warnings: vec![format!("could not list existing documents: {error}")],
        }
    }

    /// Loads the tool's documents from disk. Any unreadable file fails the call.
    pub async fn load_tool_documents(&self) -> Result<Vec<ToolDocument>> {
        let (adapter, layout) = self.adapter()?;
        let base = self.options.output_base();
        let placements = discover(adapter, layout, &base)?;
        try_join_all(
            placements
                .into_iter()
                .map(|placement| read_tool_document(adapter, &base, placement)),
        )
        .await
    }
}

fn is_conventions_rule(relative_file: &Path) -> bool {
    relative_file.with_extension("") == Path::new(CONVENTIONS_RULE_STEM)
}

async fn read_tool_document(
    adapter: &Adapter,
    base: &Path,
    placement: Placement,
) -> Result<ToolDocument> {
    let path = base
        .join(&placement.relative_dir)
        .join(&placement.relative_file);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| SyncError::io(&path, e))?;
    ToolDocument::from_file(adapter, base, placement, &content)
}

/// Existing documents for a file layout: the root file, then the document
/// directory in path order.
fn discover(adapter: &Adapter, layout: Layout, base: &Path) -> Result<Vec<Placement>> {
    let Layout::Files { root, non_root } = layout else {
        return Ok(Vec::new());
    };

    let mut placements = Vec::new();
    let mut root_path = None;
    if let Some(loc) = root {
        let path = base.join(loc.dir).join(loc.file);
        if path.is_file() {
            placements.push(Placement::root_file(loc.dir, loc.file));
            root_path = Some(path);
        }
    }

    if let Some(loc) = non_root {
        let dir = base.join(loc.dir);
        if dir.is_dir() {
            for entry in WalkDir::new(&dir).sort_by_file_name() {
                let entry = entry.map_err(|e| walk_error(&dir, e))?;
                if !entry.file_type().is_file() || root_path.as_deref() == Some(entry.path()) {
                    continue;
                }
                let Ok(rel) = entry.path().strip_prefix(&dir) else {
                    continue;
                };
                if is_hidden_path(rel) {
                    continue;
                }
                let Some(stem) = strip_suffix(rel, loc.extension) else {
                    continue;
                };
                placements.push(Placement::document_file(
                    adapter.format,
                    loc.dir,
                    PathBuf::from(rel),
                    stem,
                ));
            }
        }
    }

    Ok(placements)
}
