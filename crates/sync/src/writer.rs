//! Writes documents to disk, skipping files whose content is unchanged.

use crate::adapters::utils::hash_content;
use crate::canonical::{AuxFile, CanonicalDocument, CanonicalStore, SKILL_FILE};
use crate::document::ToolDocument;
use crate::error::{Result, SyncError};
use crate::report::{SkipReason, WriteReport};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// File writer shared by generate and import.
#[derive(Debug, Clone, Copy, Default)]
pub struct Writer {
    dry_run: bool,
}

impl Writer {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Writes `content` unless the file already holds the same bytes.
    pub async fn write_file(&self, path: &Path, content: &[u8], report: &mut WriteReport) -> Result<()> {
        match tokio::fs::read(path).await {
            Ok(existing) if hash_content(&existing) == hash_content(content) => {
                report.skipped.push(SkipReason::Unchanged {
                    path: path.to_path_buf(),
                });
                return Ok(());
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SyncError::io(path, e)),
        }

        report.written += 1;
        if self.dry_run {
            debug!(path = %path.display(), "dry run: would write");
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SyncError::io(parent, e))?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| SyncError::io(path, e))?;
        debug!(path = %path.display(), "wrote file");
        Ok(())
    }

    async fn write_aux_files(&self, dir: &Path, files: &[AuxFile], report: &mut WriteReport) -> Result<()> {
        for file in files {
            self.write_file(&dir.join(&file.relative_path), &file.content, report)
                .await?;
        }
        Ok(())
    }

    /// Writes a tool document and, for skills, its auxiliary files.
    pub async fn write_tool_document(&self, doc: &ToolDocument, report: &mut WriteReport) -> Result<()> {
        let content = doc.file_content()?;
        self.write_file(&doc.path(), content.as_bytes(), report).await?;
        if let Some(dir) = doc.owned_dir() {
            self.write_aux_files(&dir, &doc.files, report).await?;
        }
        Ok(())
    }

    /// Writes a canonical document into the store.
    pub async fn write_canonical(
        &self,
        store: &CanonicalStore,
        doc: &CanonicalDocument,
        report: &mut WriteReport,
    ) -> Result<()> {
        let kind_dir = store.kind_dir(doc.kind());
        let content = doc.file_content()?;
        if doc.kind().is_dir_kind() {
            let skill_dir = kind_dir.join(doc.relative_file());
            self.write_file(&skill_dir.join(SKILL_FILE), content.as_bytes(), report)
                .await?;
            self.write_aux_files(&skill_dir, doc.files(), report).await?;
        } else {
            self.write_file(&kind_dir.join(doc.relative_file()), content.as_bytes(), report)
                .await?;
        }
        Ok(())
    }

    /// Removes a tool document (the whole directory for skills).
    pub async fn remove(&self, doc: &ToolDocument, report: &mut WriteReport) -> Result<()> {
        let (path, is_dir) = match doc.owned_dir() {
            Some(dir) => (dir, true),
            None => (doc.path(), false),
        };

        report.deleted += 1;
        if self.dry_run {
            debug!(path = %path.display(), "dry run: would delete");
            return Ok(());
        }

        let result = if is_dir {
            tokio::fs::remove_dir_all(&path).await
        } else {
            tokio::fs::remove_file(&path).await
        };
        match result {
            Ok(()) => {
                debug!(path = %path.display(), "deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SyncError::io(&path, e)),
        }
    }
}
