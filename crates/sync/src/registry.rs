//! Adapter registry.
//!
//! The registry maps `(feature, tool)` to the adapter that handles it plus
//! capability metadata. It is an explicit value handed to processors, so
//! tests can build registries with only the entries they need.

use crate::adapters::{builtin_entries, Adapter};
use crate::error::{Result, SyncError};
use crate::tool::{Feature, Mode, ToolTarget};
use indexmap::IndexMap;

/// Capabilities of one tool for one feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterMeta {
    pub supports_project: bool,
    pub supports_global: bool,
    /// The tool gets a simulated stand-in (in at least one mode).
    pub supports_simulated: bool,
}

/// One registered tool for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    /// Default adapter, used for global mode and for project mode when no
    /// project adapter is set.
    pub adapter: Adapter,
    /// Adapter used in project mode instead of the default.
    pub project_adapter: Option<Adapter>,
    pub meta: AdapterMeta,
}

impl RegistryEntry {
    /// An entry whose metadata is derived from the adapter's layouts and family.
    pub fn new(adapter: Adapter) -> Self {
        let meta = derive_meta(&adapter, None);
        Self {
            adapter,
            project_adapter: None,
            meta,
        }
    }

    pub fn with_project_adapter(mut self, project_adapter: Adapter) -> Self {
        self.meta = derive_meta(&self.adapter, Some(&project_adapter));
        self.project_adapter = Some(project_adapter);
        self
    }

    pub fn with_meta(mut self, meta: AdapterMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn tool(&self) -> ToolTarget {
        self.adapter.tool
    }

    pub fn feature(&self) -> Feature {
        self.adapter.feature
    }

    /// The adapter serving `mode`.
    pub fn adapter_for(&self, mode: Mode) -> &Adapter {
        match (mode, &self.project_adapter) {
            (Mode::Project, Some(project)) => project,
            _ => &self.adapter,
        }
    }
}

fn derive_meta(adapter: &Adapter, project_adapter: Option<&Adapter>) -> AdapterMeta {
    let project = project_adapter.unwrap_or(adapter);
    AdapterMeta {
        supports_project: project.project.is_some(),
        supports_global: adapter.global.is_some(),
        supports_simulated: adapter.is_simulated() || project.is_simulated(),
    }
}

/// Registered adapters, grouped by feature, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<Feature, IndexMap<ToolTarget, RegistryEntry>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every built-in tool.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for entry in builtin_entries() {
            registry.register(entry);
        }
        registry
    }

    /// Adds or replaces the entry for its tool and feature.
    pub fn register(&mut self, entry: RegistryEntry) -> Option<RegistryEntry> {
        self.entries
            .entry(entry.feature())
            .or_default()
            .insert(entry.tool(), entry)
    }

    pub fn entry(&self, feature: Feature, tool: ToolTarget) -> Result<&RegistryEntry> {
        self.entries
            .get(&feature)
            .and_then(|tools| tools.get(&tool))
            .ok_or_else(|| SyncError::UnsupportedTarget {
                target: tool.as_str().to_string(),
                feature: Some(feature),
            })
    }

    /// The adapter for `tool` in `mode`.
    pub fn resolve(&self, feature: Feature, tool: ToolTarget, mode: Mode) -> Result<&Adapter> {
        Ok(self.entry(feature, tool)?.adapter_for(mode))
    }

    pub fn meta(&self, feature: Feature, tool: ToolTarget) -> Result<AdapterMeta> {
        Ok(self.entry(feature, tool)?.meta)
    }

    fn tools_where(&self, feature: Feature, keep: impl Fn(&AdapterMeta) -> bool) -> Vec<ToolTarget> {
        self.entries
            .get(&feature)
            .into_iter()
            .flat_map(|tools| tools.values())
            .filter(|entry| keep(&entry.meta))
            .map(RegistryEntry::tool)
            .collect()
    }

    /// Every tool registered for `feature`.
    pub fn registered_tools(&self, feature: Feature) -> Vec<ToolTarget> {
        self.tools_where(feature, |_| true)
    }

    pub fn project_targets(&self, feature: Feature) -> Vec<ToolTarget> {
        self.tools_where(feature, |m| m.supports_project)
    }

    pub fn global_targets(&self, feature: Feature) -> Vec<ToolTarget> {
        self.tools_where(feature, |m| m.supports_global)
    }

    pub fn simulated_targets(&self, feature: Feature) -> Vec<ToolTarget> {
        self.tools_where(feature, |m| m.supports_simulated)
    }

    /// Tools to generate for.
    ///
    /// Global mode: every global-capable tool. Project mode: project-capable
    /// tools, leaving out simulated-capable ones unless `include_simulated`.
    pub fn tool_targets(
        &self,
        feature: Feature,
        global: bool,
        include_simulated: bool,
    ) -> Vec<ToolTarget> {
        if global {
            return self.global_targets(feature);
        }
        self.tools_where(feature, |m| {
            m.supports_project && (include_simulated || !m.supports_simulated)
        })
    }
}
