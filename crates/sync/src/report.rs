//! Sync reporting types for tracking what was written and what was skipped.

use crate::tool::{Feature, ToolTarget};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reasons why an item was skipped during sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkipReason {
    /// The tool has no adapter for the feature in this mode
    UnsupportedFeature { tool: ToolTarget, feature: Feature },
    /// Hash unchanged, no write needed
    Unchanged { path: PathBuf },
}

impl SkipReason {
    /// Returns a human-readable description of the skip reason.
    pub fn description(&self) -> String {
        match self {
            Self::UnsupportedFeature { tool, feature } => {
                format!("{} does not support {} in this mode", tool, feature)
            }
            Self::Unchanged { path } => {
                format!("{} unchanged (same hash)", path.display())
            }
        }
    }
}

/// Report for writes of a single feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteReport {
    /// Number of files written (or that would be written in a dry run)
    pub written: usize,
    /// Number of stale files or skill directories removed
    pub deleted: usize,
    /// Items that were skipped with reasons
    pub skipped: Vec<SkipReason>,
    /// Non-fatal problems: rules global mode left out, files a deletion load skipped
    pub warnings: Vec<String>,
}

/// Complete report across all features.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub rules: WriteReport,
    pub commands: WriteReport,
    pub subagents: WriteReport,
    pub skills: WriteReport,
    /// Nothing was written to disk
    pub dry_run: bool,
    /// Summary message
    pub summary: String,
}

impl SyncReport {
    pub fn feature(&self, feature: Feature) -> &WriteReport {
        match feature {
            Feature::Rules => &self.rules,
            Feature::Commands => &self.commands,
            Feature::Subagents => &self.subagents,
            Feature::Skills => &self.skills,
        }
    }

    pub fn feature_mut(&mut self, feature: Feature) -> &mut WriteReport {
        match feature {
            Feature::Rules => &mut self.rules,
            Feature::Commands => &mut self.commands,
            Feature::Subagents => &mut self.subagents,
            Feature::Skills => &mut self.skills,
        }
    }

    /// Returns total files written across all features.
    pub fn total_written(&self) -> usize {
        Feature::ALL.iter().map(|f| self.feature(*f).written).sum()
    }

    pub fn total_deleted(&self) -> usize {
        Feature::ALL.iter().map(|f| self.feature(*f).deleted).sum()
    }

    /// Returns total items skipped across all features.
    pub fn total_skipped(&self) -> usize {
        Feature::ALL.iter().map(|f| self.feature(*f).skipped.len()).sum()
    }

    /// Generates a formatted summary for display.
    pub fn format_summary(&self, action: &str) -> String {
        let mut out = String::new();
        let suffix = if self.dry_run { " (dry run)" } else { "" };
        out.push_str(&format!("{} complete{}\n", action, suffix));
        for feature in Feature::ALL {
            let report = self.feature(feature);
            out.push_str(&format!(
                "  {:<10} {} written, {} deleted, {} skipped\n",
                format!("{}:", feature),
                report.written,
                report.deleted,
                report.skipped.len()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_every_feature() {
        let mut report = SyncReport::default();
        report.rules.written = 2;
        report.skills.written = 1;
        report.commands.deleted = 3;
        report.subagents.skipped.push(SkipReason::Unchanged {
            path: PathBuf::from("a.md"),
        });
        assert_eq!(report.total_written(), 3);
        assert_eq!(report.total_deleted(), 3);
        assert_eq!(report.total_skipped(), 1);
    }

    #[test]
    fn summary_lists_features() {
        let mut report = SyncReport::default();
        report.dry_run = true;
        report.feature_mut(Feature::Rules).written = 4;
        let summary = report.format_summary("Generate");
        assert!(summary.starts_with("Generate complete (dry run)"));
        assert!(summary.contains("  rules:     4 written, 0 deleted, 0 skipped\n"));
        assert!(summary.contains("skills:"));
    }

    #[test]
    fn skip_reasons_describe_themselves() {
        let reason = SkipReason::UnsupportedFeature {
            tool: ToolTarget::Cline,
            feature: Feature::Skills,
        };
        assert_eq!(
            reason.description(),
            "cline does not support skills in this mode"
        );

        let yaml = serde_yaml::to_string(&reason).unwrap();
        assert!(yaml.contains("type: UnsupportedFeature"));
        assert!(yaml.contains("tool: cline"));
    }
}
