//! Canonical rule sync for AI coding tools.
//!
//! Rules, commands, subagents and skills live once under `.rulekit/` and are
//! projected into each tool's own files (`CLAUDE.md`, `.cursor/rules/*.mdc`,
//! `.github/prompts/*.prompt.md`, ...). Tools that lack a feature natively can
//! receive a simulated copy in a fallback directory; native documents can be
//! imported back into the canonical store.
//!
//! # Examples
//!
//! ```
//! use rulekit_sync::{Feature, GenerateParams, Orchestrator, ToolTarget};
//!
//! let tmp = std::env::temp_dir().join("rulekit-doctest");
//! let rules = tmp.join(".rulekit/rules");
//! std::fs::create_dir_all(&rules).unwrap();
//! std::fs::write(rules.join("overview.md"), "---\nroot: true\n---\nBe concise.").unwrap();
//!
//! let params = GenerateParams {
//!     base_dirs: vec![tmp.clone()],
//!     targets: vec![ToolTarget::ClaudeCode],
//!     features: vec![Feature::Rules],
//!     dry_run: true,
//!     ..Default::default()
//! };
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let report = runtime.block_on(Orchestrator::builtin().generate(&params)).unwrap();
//! assert_eq!(report.rules.written, 1);
//! assert!(report.dry_run);
//! ```

#![deny(unsafe_code)]

pub mod adapters;
pub mod canonical;
pub mod document;
pub mod error;
pub mod orchestrator;
pub mod paths;
pub mod processor;
pub mod registry;
pub mod report;
pub mod tool;
pub mod writer;

pub use adapters::{Adapter, Family, Format, Layout, RefStyle, ToolFrontmatter};
pub use canonical::{AuxFile, CanonicalDocument, CanonicalStore, CANONICAL_DIR, SKILL_FILE};
pub use document::{Placement, ToolDocument};
pub use error::{Result, SyncError};
pub use orchestrator::{GenerateParams, ImportParams, Orchestrator};
pub use paths::resolve_paths;
pub use processor::{DeletionLoad, DirProcessor, FileProcessor, Processor, ProcessorOptions};
pub use registry::{AdapterMeta, Registry, RegistryEntry};
pub use report::{SkipReason, SyncReport, WriteReport};
pub use tool::{parse_features, parse_targets, Feature, Mode, ToolTarget};
pub use writer::Writer;
