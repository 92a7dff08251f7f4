//! Tool documents: one canonical document as a specific tool stores it.

use crate::adapters::utils::{append_suffix, to_slash};
use crate::adapters::{Adapter, Family, Format, Layout, ToolFrontmatter};
use crate::canonical::{AuxFile, CanonicalDocument, SKILL_FILE};
use crate::error::{Result, SyncError};
use crate::tool::{Feature, ToolTarget};
use std::path::{Path, PathBuf};

/// Canonical file stem used when importing a fixed-name root file.
pub const ROOT_DOCUMENT_STEM: &str = "overview";

/// Where a document sits inside a tool layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub relative_dir: PathBuf,
    pub relative_file: PathBuf,
    /// Path inside the document directory without the tool extension, or the
    /// skill directory name.
    pub stem: PathBuf,
    pub root: bool,
    pub format: Format,
}

impl Placement {
    /// Placement for a canonical document, or `None` if the layout has no slot for it.
    pub fn for_canonical(
        adapter: &Adapter,
        layout: Layout,
        canonical: &CanonicalDocument,
    ) -> Option<Self> {
        let stem = canonical.relative_file().with_extension("");
        match layout {
            Layout::Files { root, non_root } => {
                if let (true, Some(loc)) = (canonical.is_root(), root) {
                    return Some(Self::root_file(loc.dir, loc.file));
                }
                let loc = non_root?;
                Some(Self {
                    relative_dir: PathBuf::from(loc.dir),
                    relative_file: append_suffix(&stem, loc.extension),
                    stem,
                    root: canonical.is_root(),
                    format: adapter.format,
                })
            }
            Layout::Dir { dir } => Some(Self::skill(
                adapter.format,
                dir,
                canonical.relative_file().to_path_buf(),
            )),
        }
    }

    /// The fixed-name root file. Root files never carry a header.
    pub fn root_file(dir: &str, file: &str) -> Self {
        Self {
            relative_dir: PathBuf::from(dir),
            relative_file: PathBuf::from(file),
            stem: PathBuf::from(ROOT_DOCUMENT_STEM),
            root: true,
            format: Format::Bare,
        }
    }

    /// A non-root file found on disk.
    pub fn document_file(format: Format, dir: &str, relative_file: PathBuf, stem: PathBuf) -> Self {
        Self {
            relative_dir: PathBuf::from(dir),
            relative_file,
            stem,
            root: false,
            format,
        }
    }

    /// A skill directory `<dir>/<name>/SKILL.md`.
    pub fn skill(format: Format, dir: &str, name: PathBuf) -> Self {
        Self {
            relative_dir: Path::new(dir).join(&name),
            relative_file: PathBuf::from(SKILL_FILE),
            stem: name,
            root: false,
            format,
        }
    }
}

/// A document in one tool's native (or simulated) format.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDocument {
    pub tool: ToolTarget,
    pub feature: Feature,
    pub family: Family,
    /// Project directory, or the home directory in global mode.
    pub base_dir: PathBuf,
    pub placement: Placement,
    pub name: String,
    pub frontmatter: ToolFrontmatter,
    pub body: String,
    /// Skill auxiliary files, relative to the skill directory.
    pub files: Vec<AuxFile>,
}

impl ToolDocument {
    /// Converts a canonical document for `adapter`.
    ///
    /// Returns `None` when the layout has no location for the document, e.g.
    /// a non-root rule for a layout with only a root file.
    pub fn from_canonical(
        adapter: &Adapter,
        layout: Layout,
        canonical: &CanonicalDocument,
        base_dir: &Path,
    ) -> Option<Self> {
        let placement = Placement::for_canonical(adapter, layout, canonical)?;
        let frontmatter = ToolFrontmatter::from_canonical(
            placement.format,
            adapter.tool,
            canonical,
            placement.root,
        );
        Some(Self {
            tool: adapter.tool,
            feature: adapter.feature,
            family: adapter.family,
            base_dir: base_dir.to_path_buf(),
            placement,
            name: canonical.name(),
            frontmatter,
            body: canonical.body().to_string(),
            files: canonical.files().to_vec(),
        })
    }

    /// Parses a document read from disk.
    pub fn from_file(
        adapter: &Adapter,
        base_dir: &Path,
        placement: Placement,
        content: &str,
    ) -> Result<Self> {
        let path = base_dir.join(&placement.relative_dir).join(&placement.relative_file);
        let (frontmatter, body) =
            ToolFrontmatter::parse(placement.format, content).map_err(|e| e.at(&path))?;
        let name = frontmatter
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| to_slash(&placement.stem));
        Ok(Self {
            tool: adapter.tool,
            feature: adapter.feature,
            family: adapter.family,
            base_dir: base_dir.to_path_buf(),
            placement,
            name,
            frontmatter,
            body,
            files: Vec::new(),
        })
    }

    pub fn with_files(mut self, files: Vec<AuxFile>) -> Self {
        self.files = files;
        self
    }

    pub fn is_root(&self) -> bool {
        self.placement.root
    }

    /// Path relative to the base directory.
    pub fn relative_path(&self) -> PathBuf {
        self.placement
            .relative_dir
            .join(&self.placement.relative_file)
    }

    /// Relative path with `/` separators, as shown in references.
    pub fn relative_path_string(&self) -> String {
        to_slash(&self.relative_path())
    }

    pub fn path(&self) -> PathBuf {
        self.base_dir.join(self.relative_path())
    }

    /// Directory owned by the document: the skill directory for skills.
    pub fn owned_dir(&self) -> Option<PathBuf> {
        self.feature
            .is_dir_kind()
            .then(|| self.base_dir.join(&self.placement.relative_dir))
    }

    /// File content in the tool's format.
    pub fn file_content(&self) -> Result<String> {
        self.frontmatter
            .render(&self.body)
            .map_err(|e| e.at(&self.path()))
    }

    /// Converts back to a canonical document. Simulated documents cannot be converted.
    pub fn to_canonical(&self) -> Result<CanonicalDocument> {
        if self.family == Family::Simulated {
            return Err(SyncError::SimulatedReverseConversion {
                tool: self.tool,
                feature: self.feature,
            });
        }

        let mut frontmatter = self.frontmatter.to_canonical(self.tool, self.is_root());
        let stem = &self.placement.stem;
        let relative_file = if self.feature.is_dir_kind() {
            stem.clone()
        } else {
            append_suffix(stem, ".md")
        };
        if self.feature.is_dir_kind() || to_slash(stem) != self.name {
            frontmatter.name = Some(self.name.clone());
        }
        if self.is_root() {
            frontmatter.root = Some(true);
        }

        Ok(
            CanonicalDocument::new(self.feature, relative_file, frontmatter, self.body.clone())
                .with_files(self.files.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::tool::Mode;

    fn canonical(kind: Feature, file: &str, content: &str) -> CanonicalDocument {
        CanonicalDocument::from_content(kind, file, content).unwrap()
    }

    fn convert(
        kind: Feature,
        tool: ToolTarget,
        mode: Mode,
        doc: &CanonicalDocument,
    ) -> ToolDocument {
        let registry = Registry::builtin();
        let adapter = registry.resolve(kind, tool, mode).unwrap();
        let layout = crate::paths::resolve_paths(adapter, mode).unwrap();
        ToolDocument::from_canonical(adapter, layout, doc, Path::new("/work")).unwrap()
    }

    #[test]
    fn root_rule_goes_to_root_file_without_header() {
        let doc = canonical(
            Feature::Rules,
            "overview.md",
            "---\nroot: true\ndescription: Project overview\n---\nIntro",
        );
        let tool = convert(Feature::Rules, ToolTarget::ClaudeCode, Mode::Project, &doc);
        assert_eq!(tool.relative_path(), PathBuf::from("CLAUDE.md"));
        assert!(tool.is_root());
        assert_eq!(tool.file_content().unwrap(), "Intro");
        assert_eq!(tool.frontmatter.description(), Some("Project overview"));
    }

    #[test]
    fn root_rule_without_root_location_stays_in_rules_dir() {
        let doc = canonical(Feature::Rules, "overview.md", "---\nroot: true\n---\nIntro");
        let tool = convert(Feature::Rules, ToolTarget::Cursor, Mode::Project, &doc);
        assert_eq!(tool.relative_path_string(), ".cursor/rules/overview.mdc");
        assert!(tool.is_root());
        assert!(tool.file_content().unwrap().contains("alwaysApply: true"));
    }

    #[test]
    fn non_root_rule_uses_extension() {
        let doc = canonical(Feature::Rules, "nested/style.md", "Tabs.");
        let tool = convert(Feature::Rules, ToolTarget::Copilot, Mode::Project, &doc);
        assert_eq!(
            tool.relative_path_string(),
            ".github/instructions/nested/style.instructions.md"
        );
        assert_eq!(tool.name, "style");
        let back = tool.to_canonical().unwrap();
        assert_eq!(back.relative_file(), Path::new("nested/style.md"));
    }

    #[test]
    fn global_rules_have_no_slot_for_non_root() {
        let registry = Registry::builtin();
        let adapter = registry
            .resolve(Feature::Rules, ToolTarget::ClaudeCode, Mode::Global)
            .unwrap();
        let layout = crate::paths::resolve_paths(adapter, Mode::Global).unwrap();
        let doc = canonical(Feature::Rules, "style.md", "Tabs.");
        assert!(ToolDocument::from_canonical(adapter, layout, &doc, Path::new("/home")).is_none());
    }

    #[test]
    fn skills_live_in_named_directories() {
        let doc = canonical(
            Feature::Skills,
            "pdf",
            "---\nname: pdf\ndescription: PDFs\n---\nRead PDFs.",
        )
        .with_files(vec![AuxFile {
            relative_path: PathBuf::from("scripts/run.sh"),
            content: b"echo".to_vec(),
        }]);
        let tool = convert(Feature::Skills, ToolTarget::ClaudeCode, Mode::Project, &doc);
        assert_eq!(tool.relative_path_string(), ".claude/skills/pdf/SKILL.md");
        assert_eq!(tool.owned_dir(), Some(PathBuf::from("/work/.claude/skills/pdf")));
        assert_eq!(tool.files.len(), 1);

        let back = tool.to_canonical().unwrap();
        assert_eq!(back.relative_file(), Path::new("pdf"));
        assert_eq!(back.name(), "pdf");
        assert_eq!(back.files().len(), 1);
    }

    #[test]
    fn simulated_documents_reject_reverse_conversion() {
        let doc = canonical(Feature::Subagents, "reviewer.md", "Review.");
        let tool = convert(Feature::Subagents, ToolTarget::Cursor, Mode::Project, &doc);
        assert_eq!(tool.family, Family::Simulated);
        assert!(matches!(
            tool.to_canonical(),
            Err(SyncError::SimulatedReverseConversion { .. })
        ));
    }

    #[test]
    fn name_differing_from_stem_is_kept() {
        let doc = canonical(Feature::Commands, "commit.md", "---\nname: ship\n---\nShip it.");
        let tool = convert(Feature::Commands, ToolTarget::ClaudeCode, Mode::Project, &doc);
        assert_eq!(tool.relative_path_string(), ".claude/commands/commit.md");
        let back = tool.to_canonical().unwrap();
        assert_eq!(back.name(), "ship");
        assert_eq!(back.relative_file(), Path::new("commit.md"));
    }

    #[test]
    fn from_file_reads_header_and_name() {
        let registry = Registry::builtin();
        let adapter = registry
            .resolve(Feature::Subagents, ToolTarget::ClaudeCode, Mode::Project)
            .unwrap();
        let placement = Placement::document_file(
            Format::ClaudeSubagent,
            ".claude/agents",
            PathBuf::from("rev.md"),
            PathBuf::from("rev"),
        );
        let tool = ToolDocument::from_file(
            adapter,
            Path::new("/work"),
            placement,
            "---\nname: reviewer\ndescription: Reviews\nmodel: opus\n---\nBe picky.",
        )
        .unwrap();
        assert_eq!(tool.name, "reviewer");
        assert_eq!(tool.body, "Be picky.");

        let back = tool.to_canonical().unwrap();
        assert_eq!(back.name(), "reviewer");
        assert_eq!(back.description(), Some("Reviews"));
        let block = back.override_block(ToolTarget::ClaudeCode).unwrap();
        assert_eq!(block.get("model").and_then(|v| v.as_str()), Some("opus"));
    }
}
