//! Canonical documents and the on-disk canonical store.
//!
//! The store lives under `<base>/.rulekit/` with one directory per kind:
//!
//! ```text
//! .rulekit/
//!   rules/overview.md
//!   rules/style.md
//!   commands/commit.md
//!   subagents/reviewer.md
//!   skills/pdf/SKILL.md
//!   skills/pdf/scripts/extract.py
//! ```

use crate::error::{Result, SyncError};
use crate::tool::{Feature, Mode, ToolTarget, WILDCARD};
use futures::future::try_join_all;
use rulekit_validate::{parse_canonical, render_frontmatter, CanonicalFrontmatter};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::adapters::utils::is_hidden_path;

/// Name of the canonical store directory under each base directory.
pub const CANONICAL_DIR: &str = ".rulekit";
/// Manifest file inside every skill directory.
pub const SKILL_FILE: &str = "SKILL.md";

/// A file shipped alongside a skill manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxFile {
    /// Path relative to the skill directory.
    pub relative_path: PathBuf,
    pub content: Vec<u8>,
}

/// Tool-agnostic rule, command, subagent or skill.
///
/// Fields are private; a document is never modified once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDocument {
    kind: Feature,
    relative_file: PathBuf,
    frontmatter: CanonicalFrontmatter,
    body: String,
    files: Vec<AuxFile>,
}

impl CanonicalDocument {
    /// Builds a document. For skills `relative_file` is the skill directory name.
    pub fn new(
        kind: Feature,
        relative_file: impl Into<PathBuf>,
        frontmatter: CanonicalFrontmatter,
        body: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            relative_file: relative_file.into(),
            frontmatter,
            body: body.into(),
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<AuxFile>) -> Self {
        self.files = files;
        self
    }

    /// Parses file content and validates the header for `kind`.
    pub fn from_content(
        kind: Feature,
        relative_file: impl Into<PathBuf>,
        content: &str,
    ) -> Result<Self> {
        let relative_file = relative_file.into();
        let (parsed, validation) = parse_canonical(&relative_file, kind.schema(), content)
            .map_err(|e| SyncError::validation(&relative_file, e.to_string()))?;
        if validation.has_errors() {
            return Err(SyncError::validation(&relative_file, validation.error_summary()));
        }
        Ok(Self::new(kind, relative_file, parsed.frontmatter, parsed.body))
    }

    pub fn kind(&self) -> Feature {
        self.kind
    }

    pub fn relative_file(&self) -> &Path {
        &self.relative_file
    }

    pub fn frontmatter(&self) -> &CanonicalFrontmatter {
        &self.frontmatter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn files(&self) -> &[AuxFile] {
        &self.files
    }

    /// Frontmatter `name`, else the file stem (or skill directory name).
    pub fn name(&self) -> String {
        if let Some(name) = self
            .frontmatter
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
        {
            return name.to_string();
        }
        file_stem(&self.relative_file)
    }

    pub fn description(&self) -> Option<&str> {
        self.frontmatter.description.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.frontmatter.root == Some(true)
    }

    pub fn globs(&self) -> &[String] {
        self.frontmatter.globs.as_deref().unwrap_or_default()
    }

    /// Declared targets; an absent field means every tool.
    pub fn targets(&self) -> Vec<&str> {
        match &self.frontmatter.targets {
            Some(targets) => targets.ids(),
            None => vec![WILDCARD],
        }
    }

    /// True if `targets` contains `*` or the tool's id.
    pub fn targets_tool(&self, tool: ToolTarget) -> bool {
        self.targets()
            .iter()
            .any(|t| *t == WILDCARD || *t == tool.as_str())
    }

    /// The per-tool override block, e.g. `claudecode: { allowed-tools: [...] }`.
    pub fn override_block(&self, tool: ToolTarget) -> Option<&Mapping> {
        self.frontmatter
            .extra
            .get(tool.as_str())
            .and_then(Value::as_mapping)
    }

    /// Full file content: header plus body.
    pub fn file_content(&self) -> Result<String> {
        render_frontmatter(&self.frontmatter, &self.body)
            .map_err(|e| SyncError::validation(&self.relative_file, e.to_string()))
    }
}

/// File stem of `path` with any extension removed.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reader for the canonical store of one base directory.
#[derive(Debug, Clone)]
pub struct CanonicalStore {
    root: PathBuf,
}

impl CanonicalStore {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            root: base_dir.join(CANONICAL_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind_dir(&self, kind: Feature) -> PathBuf {
        self.root.join(kind.as_str())
    }

    /// Loads every document of `kind`, in path order.
    ///
    /// Fails with [`SyncError::MultipleRoot`] when more than one document is
    /// flagged root. In global mode only the root rule is returned.
    pub async fn load(&self, kind: Feature, mode: Mode) -> Result<Vec<CanonicalDocument>> {
        Ok(self.load_counting_discarded(kind, mode).await?.0)
    }

    /// Like [`Self::load`], also returning how many non-root rules global
    /// mode left out.
    pub async fn load_counting_discarded(
        &self,
        kind: Feature,
        mode: Mode,
    ) -> Result<(Vec<CanonicalDocument>, usize)> {
        let dir = self.kind_dir(kind);
        if !dir.is_dir() {
            debug!(path = %dir.display(), "canonical directory missing; nothing to load");
            return Ok((Vec::new(), 0));
        }

        let docs = if kind.is_dir_kind() {
            load_skill_dirs(&dir).await?
        } else {
            load_files(kind, &dir).await?
        };

        let roots: Vec<PathBuf> = docs
            .iter()
            .filter(|d| d.is_root())
            .map(|d| dir.join(d.relative_file()))
            .collect();
        if roots.len() > 1 {
            return Err(SyncError::MultipleRoot { paths: roots });
        }

        if mode == Mode::Global && kind == Feature::Rules {
            let total = docs.len();
            let kept: Vec<_> = docs.into_iter().filter(|d| d.is_root()).collect();
            let discarded = total - kept.len();
            if discarded > 0 {
                warn!(
                    discarded,
                    "global mode only uses the root rule; skipping non-root rules"
                );
            }
            return Ok((kept, discarded));
        }

        Ok((docs, 0))
    }
}

async fn load_files(kind: Feature, dir: &Path) -> Result<Vec<CanonicalDocument>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        if is_hidden_path(rel) || entry.path().extension().is_none_or(|e| e != "md") {
            continue;
        }
        paths.push(rel.to_path_buf());
    }

    // try_join_all keeps the input order.
    try_join_all(paths.into_iter().map(|rel| async move {
        let path = dir.join(&rel);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SyncError::io(&path, e))?;
        CanonicalDocument::from_content(kind, rel, &content)
    }))
    .await
}

async fn load_skill_dirs(dir: &Path) -> Result<Vec<CanonicalDocument>> {
    let mut skill_dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if entry.file_type().is_dir() && !is_hidden_path(Path::new(entry.file_name())) {
            skill_dirs.push(entry.into_path());
        }
    }

    try_join_all(skill_dirs.into_iter().map(|skill_dir| async move {
        let (content, files) = read_skill_dir(&skill_dir).await?;
        let name = skill_dir
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_default();
        let doc = CanonicalDocument::from_content(Feature::Skills, name, &content)?;
        Ok::<_, SyncError>(doc.with_files(files))
    }))
    .await
}

/// Reads a skill directory: the `SKILL.md` text plus every other file.
pub(crate) async fn read_skill_dir(skill_dir: &Path) -> Result<(String, Vec<AuxFile>)> {
    let manifest = skill_dir.join(SKILL_FILE);
    if !manifest.is_file() {
        return Err(SyncError::MissingRequiredFile { path: manifest });
    }

    let mut aux_paths = Vec::new();
    for entry in WalkDir::new(skill_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(skill_dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(skill_dir) else {
            continue;
        };
        if rel == Path::new(SKILL_FILE) || is_hidden_path(rel) {
            continue;
        }
        aux_paths.push(rel.to_path_buf());
    }

    let content = tokio::fs::read_to_string(&manifest)
        .await
        .map_err(|e| SyncError::io(&manifest, e))?;
    let files = try_join_all(aux_paths.into_iter().map(|rel| async move {
        let path = skill_dir.join(&rel);
        let content = tokio::fs::read(&path)
            .await
            .map_err(|e| SyncError::io(&path, e))?;
        Ok::<_, SyncError>(AuxFile {
            relative_path: rel,
            content,
        })
    }))
    .await?;

    Ok((content, files))
}

pub(crate) fn walk_error(dir: &Path, err: walkdir::Error) -> SyncError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
    SyncError::io(path, source)
}
