//! Drives generation and import across base directories, features and tools.

use crate::canonical::CanonicalStore;
use crate::document::ToolDocument;
use crate::error::Result;
use crate::processor::{Processor, ProcessorOptions};
use crate::registry::Registry;
use crate::report::{SkipReason, SyncReport, WriteReport};
use crate::tool::{Feature, ToolTarget};
use crate::writer::Writer;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Parameters for [`Orchestrator::generate`].
///
/// ```
/// use rulekit_sync::GenerateParams;
///
/// let params = GenerateParams { dry_run: true, ..Default::default() };
/// assert_eq!(params.base_dirs, vec![std::path::PathBuf::from(".")]);
/// assert!(!params.global);
/// ```
#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub base_dirs: Vec<PathBuf>,
    /// Root for global-mode output.
    pub home_dir: PathBuf,
    pub targets: Vec<ToolTarget>,
    pub features: Vec<Feature>,
    pub global: bool,
    /// Remove stale tool documents before writing.
    pub delete: bool,
    pub simulate_commands: bool,
    pub simulate_subagents: bool,
    pub simulate_skills: bool,
    pub dry_run: bool,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            base_dirs: vec![PathBuf::from(".")],
            home_dir: PathBuf::from("."),
            targets: ToolTarget::ALL.to_vec(),
            features: Feature::ALL.to_vec(),
            global: false,
            delete: false,
            simulate_commands: false,
            simulate_subagents: false,
            simulate_skills: false,
            dry_run: false,
        }
    }
}

impl GenerateParams {
    fn processor_options(&self, base_dir: &std::path::Path, tool: ToolTarget) -> ProcessorOptions {
        ProcessorOptions::new(base_dir, &self.home_dir, tool)
            .with_global(self.global)
            .with_simulation(
                self.simulate_commands,
                self.simulate_subagents,
                self.simulate_skills,
            )
    }
}

/// Parameters for [`Orchestrator::import`].
#[derive(Debug, Clone)]
pub struct ImportParams {
    /// Project directory receiving `.rulekit/`.
    pub base_dir: PathBuf,
    pub home_dir: PathBuf,
    pub target: ToolTarget,
    pub features: Vec<Feature>,
    pub global: bool,
    pub dry_run: bool,
}

impl ImportParams {
    pub fn new(base_dir: impl Into<PathBuf>, home_dir: impl Into<PathBuf>, target: ToolTarget) -> Self {
        Self {
            base_dir: base_dir.into(),
            home_dir: home_dir.into(),
            target,
            features: Feature::ALL.to_vec(),
            global: false,
            dry_run: false,
        }
    }
}

/// Runs processors against an injected registry.
#[derive(Debug, Default)]
pub struct Orchestrator {
    registry: Registry,
}

impl Orchestrator {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// An orchestrator over the built-in adapter catalogue.
    pub fn builtin() -> Self {
        Self::new(Registry::builtin())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Generates tool files from the canonical store of every base dir.
    pub async fn generate(&self, params: &GenerateParams) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        report.dry_run = params.dry_run;
        let writer = Writer::new(params.dry_run);

        for base_dir in &params.base_dirs {
            for &feature in &params.features {
                let feature_report = report.feature_mut(feature);
                self.generate_feature(params, base_dir, feature, &writer, feature_report)
                    .await?;
            }
        }

        report.summary = report.format_summary("Generate");
        info!(
            written = report.total_written(),
            deleted = report.total_deleted(),
            skipped = report.total_skipped(),
            dry_run = params.dry_run,
            "generate finished"
        );
        Ok(report)
    }

    async fn generate_feature(
        &self,
        params: &GenerateParams,
        base_dir: &std::path::Path,
        feature: Feature,
        writer: &Writer,
        report: &mut WriteReport,
    ) -> Result<()> {
        let mut canonical = None;

        for &tool in &params.targets {
            let options = params.processor_options(base_dir, tool);
            let supported = self
                .registry
                .tool_targets(feature, params.global, options.simulates(feature));
            if !supported.contains(&tool) {
                debug!(%tool, %feature, global = params.global, "tool skipped for feature");
                report
                    .skipped
                    .push(SkipReason::UnsupportedFeature { tool, feature });
                continue;
            }

            if canonical.is_none() {
                let (docs, discarded) = CanonicalStore::new(base_dir)
                    .load_counting_discarded(feature, options.mode())
                    .await?;
                if discarded > 0 {
                    report.warnings.push(format!(
                        "global mode uses only the root rule; {discarded} non-root rules skipped"
                    ));
                }
                canonical = Some(docs);
            }
            let processor = Processor::new(&self.registry, feature, options);
            let docs = canonical.as_deref().unwrap_or_default();
            let outputs = processor.convert_canonical_to_tool(docs)?;
            debug!(%tool, %feature, documents = outputs.len(), "converted");

            if params.delete {
                let existing = processor.load_tool_documents_for_deletion().await?;
                for stale in stale_documents(&existing.documents, &outputs) {
                    writer.remove(stale, report).await?;
                }
                report.warnings.extend(existing.warnings);
            }

            for doc in &outputs {
                writer.write_tool_document(doc, report).await?;
            }
        }
        Ok(())
    }

    /// Imports one tool's documents into the canonical store.
    pub async fn import(&self, params: &ImportParams) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        report.dry_run = params.dry_run;
        let writer = Writer::new(params.dry_run);
        let store = CanonicalStore::new(&params.base_dir);
        let tool = params.target;

        for &feature in &params.features {
            let feature_report = report.feature_mut(feature);
            if !self
                .registry
                .tool_targets(feature, params.global, false)
                .contains(&tool)
            {
                debug!(%tool, %feature, "no native adapter to import from");
                feature_report
                    .skipped
                    .push(SkipReason::UnsupportedFeature { tool, feature });
                continue;
            }

            let options = ProcessorOptions::new(&params.base_dir, &params.home_dir, tool)
                .with_global(params.global);
            let processor = Processor::new(&self.registry, feature, options);
            let tool_docs = processor.load_tool_documents().await?;
            let canonical = processor.convert_tool_to_canonical(&tool_docs)?;
            debug!(%tool, %feature, documents = canonical.len(), "imported");

            for doc in &canonical {
                writer.write_canonical(&store, doc, feature_report).await?;
            }
        }

        report.summary = report.format_summary("Import");
        info!(
            %tool,
            written = report.total_written(),
            skipped = report.total_skipped(),
            dry_run = params.dry_run,
            "import finished"
        );
        Ok(report)
    }
}

/// Existing documents that no freshly generated document will overwrite.
fn stale_documents<'a>(
    existing: &'a [ToolDocument],
    outputs: &[ToolDocument],
) -> impl Iterator<Item = &'a ToolDocument> {
    let fresh: HashSet<PathBuf> = outputs.iter().map(output_key).collect();
    existing
        .iter()
        .filter(move |doc| !fresh.contains(&output_key(doc)))
}

fn output_key(doc: &ToolDocument) -> PathBuf {
    doc.owned_dir().unwrap_or_else(|| doc.path())
}
