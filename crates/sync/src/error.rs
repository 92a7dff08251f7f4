//! Error taxonomy for the sync engine.

use crate::tool::{Feature, Mode, ToolTarget};
use std::path::{Path, PathBuf};

/// Errors produced while loading, converting or writing documents.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Frontmatter that does not match the expected schema.
    #[error("validation failed for {}: {message}", .path.display())]
    Validation { path: PathBuf, message: String },

    /// More than one document of a kind is flagged `root: true`.
    #[error("multiple root documents found: {}", join_paths(.paths))]
    MultipleRoot { paths: Vec<PathBuf> },

    /// The tool identifier is unknown, or not registered for the feature.
    #[error("unsupported target: {target}{}", for_feature(.feature))]
    UnsupportedTarget {
        target: String,
        feature: Option<Feature>,
    },

    /// The adapter has no layout for the requested install mode.
    #[error("{tool} does not support {mode} mode for {feature}")]
    UnsupportedMode {
        tool: ToolTarget,
        feature: Feature,
        mode: Mode,
    },

    /// A discovered directory lacks its manifest file.
    #[error("missing required file: {}", .path.display())]
    MissingRequiredFile { path: PathBuf },

    /// Reverse conversion was attempted on a simulated document.
    #[error("{tool} {feature}: not implemented because it is a simulated file")]
    SimulatedReverseConversion { tool: ToolTarget, feature: Feature },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-YAML tool format (TOML) failed to parse or render.
    #[error("invalid {format} in {}: {message}", .path.display())]
    Format {
        format: &'static str,
        path: PathBuf,
        message: String,
    },
}

impl SyncError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn validation(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn unknown_target(target: impl Into<String>) -> Self {
        Self::UnsupportedTarget {
            target: target.into(),
            feature: None,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn for_feature(feature: &Option<Feature>) -> String {
    feature.map(|f| format!(" for {f}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, SyncError>;
