//! Path resolution per install mode.

use crate::adapters::{Adapter, Layout};
use crate::error::{Result, SyncError};
use crate::tool::Mode;
use std::path::{Path, PathBuf};

/// The layout `adapter` uses in `mode`.
///
/// Fails with [`SyncError::UnsupportedMode`] when the tool has no location
/// for that scope. Simulated adapters never resolve in global mode.
pub fn resolve_paths(adapter: &Adapter, mode: Mode) -> Result<Layout> {
    let layout = match mode {
        Mode::Project => adapter.project,
        Mode::Global if adapter.is_simulated() => None,
        Mode::Global => adapter.global,
    };
    layout.ok_or(SyncError::UnsupportedMode {
        tool: adapter.tool,
        feature: adapter.feature,
        mode,
    })
}

/// Directory the layout's paths are relative to.
pub fn output_base(mode: Mode, base_dir: &Path, home_dir: &Path) -> PathBuf {
    match mode {
        Mode::Project => base_dir.to_path_buf(),
        Mode::Global => home_dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{NonRootLocation, RootLocation};
    use crate::registry::Registry;
    use crate::tool::{Feature, ToolTarget};

    #[test]
    fn claude_rules_use_home_root_in_global_mode() {
        let registry = Registry::builtin();
        let adapter = registry
            .resolve(Feature::Rules, ToolTarget::ClaudeCode, Mode::Global)
            .unwrap();

        let project = resolve_paths(adapter, Mode::Project).unwrap();
        assert_eq!(
            project,
            Layout::Files {
                root: Some(RootLocation {
                    dir: "",
                    file: "CLAUDE.md"
                }),
                non_root: Some(NonRootLocation {
                    dir: ".claude/memories",
                    extension: ".md"
                }),
            }
        );

        let global = resolve_paths(adapter, Mode::Global).unwrap();
        assert_eq!(
            global,
            Layout::Files {
                root: Some(RootLocation {
                    dir: ".claude",
                    file: "CLAUDE.md"
                }),
                non_root: None,
            }
        );
    }

    #[test]
    fn project_only_tool_rejects_global() {
        let registry = Registry::builtin();
        let adapter = registry
            .resolve(Feature::Rules, ToolTarget::Cursor, Mode::Global)
            .unwrap();
        let err = resolve_paths(adapter, Mode::Global).unwrap_err();
        assert!(matches!(err, SyncError::UnsupportedMode { mode: Mode::Global, .. }));
    }

    #[test]
    fn simulated_adapter_rejects_global() {
        let registry = Registry::builtin();
        let adapter = registry
            .resolve(Feature::Subagents, ToolTarget::Cursor, Mode::Project)
            .unwrap();
        assert!(resolve_paths(adapter, Mode::Project).is_ok());
        assert!(resolve_paths(adapter, Mode::Global).is_err());
    }

    #[test]
    fn global_only_adapter_rejects_project() {
        let registry = Registry::builtin();
        let adapter = registry
            .resolve(Feature::Commands, ToolTarget::CodexCli, Mode::Global)
            .unwrap();
        assert!(resolve_paths(adapter, Mode::Project).is_err());
        assert_eq!(
            resolve_paths(adapter, Mode::Global)
                .unwrap()
                .document_dir(),
            Some(".codex/prompts")
        );
    }

    #[test]
    fn output_base_switches_on_mode() {
        let base = Path::new("/work/app");
        let home = Path::new("/home/dev");
        assert_eq!(output_base(Mode::Project, base, home), base);
        assert_eq!(output_base(Mode::Global, base, home), home);
    }
}
