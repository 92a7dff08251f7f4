//! Option precedence.
//!
//! Every option is resolved from an ordered list of sources: the CLI flag,
//! the current config key, any deprecated config key, then the default. The
//! first source holding a value wins. A deprecated source that holds a value
//! always produces a warning, even when an earlier source wins.

use crate::config::ConfigFile;
use std::path::PathBuf;

/// One candidate value for an option.
#[derive(Debug, Clone)]
pub struct OptionSource<T> {
    /// Where the value came from, e.g. `--global` or `experimentalGlobal`.
    pub name: &'static str,
    pub value: Option<T>,
    /// Replacement key to mention when this source is deprecated.
    pub replaced_by: Option<&'static str>,
}

impl<T> OptionSource<T> {
    pub fn new(name: &'static str, value: Option<T>) -> Self {
        Self {
            name,
            value,
            replaced_by: None,
        }
    }

    pub fn deprecated(name: &'static str, value: Option<T>, replaced_by: &'static str) -> Self {
        Self {
            name,
            value,
            replaced_by: Some(replaced_by),
        }
    }
}

/// A deprecated key that was found with a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    pub name: &'static str,
    pub replaced_by: &'static str,
}

/// Resolves option sources and records deprecated usage.
#[derive(Debug, Default)]
pub struct OptionResolver {
    deprecations: Vec<Deprecation>,
}

impl OptionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first defined value among `sources`, else `default`.
    pub fn first_defined<T>(&mut self, sources: Vec<OptionSource<T>>, default: T) -> T {
        let mut chosen = None;
        for source in sources {
            if let Some(replaced_by) = source.replaced_by.filter(|_| source.value.is_some()) {
                tracing::warn!(
                    option = source.name,
                    replacement = replaced_by,
                    "'{}' is deprecated, use '{}' instead",
                    source.name,
                    replaced_by
                );
                self.deprecations.push(Deprecation {
                    name: source.name,
                    replaced_by,
                });
            }
            if chosen.is_none() {
                chosen = source.value;
            }
        }
        chosen.unwrap_or(default)
    }

    pub fn deprecations(&self) -> &[Deprecation] {
        &self.deprecations
    }
}

/// Values given on the command line. `None` means the flag was not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_dirs: Option<Vec<String>>,
    pub targets: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub verbose: Option<bool>,
    pub delete: Option<bool>,
    pub global: Option<bool>,
    pub simulate_commands: Option<bool>,
    pub simulate_subagents: Option<bool>,
    pub simulate_skills: Option<bool>,
}

/// Fully resolved options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub base_dirs: Vec<PathBuf>,
    pub targets: Vec<String>,
    pub features: Vec<String>,
    pub verbose: bool,
    pub delete: bool,
    pub global: bool,
    pub simulate_commands: bool,
    pub simulate_subagents: bool,
    pub simulate_skills: bool,
    pub deprecations: Vec<Deprecation>,
}

/// Merges CLI overrides over an optional config file.
pub fn resolve_options(cli: &CliOverrides, file: Option<&ConfigFile>) -> ResolvedOptions {
    let file = file.cloned().unwrap_or_default();
    let mut resolver = OptionResolver::new();

    let base_dirs = resolver.first_defined(
        vec![
            OptionSource::new("--base-dir", cli.base_dirs.clone()),
            OptionSource::new("baseDirs", file.base_dirs),
        ],
        vec![".".to_string()],
    );
    let targets = resolver.first_defined(
        vec![
            OptionSource::new("--targets", cli.targets.clone()),
            OptionSource::new("targets", file.targets.map(|t| t.into_vec())),
        ],
        vec!["*".to_string()],
    );
    let features = resolver.first_defined(
        vec![
            OptionSource::new("--features", cli.features.clone()),
            OptionSource::new("features", file.features.map(|f| f.into_vec())),
        ],
        vec!["*".to_string()],
    );
    let verbose = resolver.first_defined(
        vec![
            OptionSource::new("--verbose", cli.verbose),
            OptionSource::new("verbose", file.verbose),
        ],
        false,
    );
    let delete = resolver.first_defined(
        vec![
            OptionSource::new("--delete", cli.delete),
            OptionSource::new("delete", file.delete),
        ],
        false,
    );
    let global = resolver.first_defined(
        vec![
            OptionSource::new("--global", cli.global),
            OptionSource::new("global", file.global),
            OptionSource::deprecated("experimentalGlobal", file.experimental_global, "global"),
        ],
        false,
    );
    let simulate_commands = resolver.first_defined(
        vec![
            OptionSource::new("--simulate-commands", cli.simulate_commands),
            OptionSource::new("simulateCommands", file.simulate_commands),
            OptionSource::deprecated(
                "experimentalSimulateCommands",
                file.experimental_simulate_commands,
                "simulateCommands",
            ),
        ],
        false,
    );
    let simulate_subagents = resolver.first_defined(
        vec![
            OptionSource::new("--simulate-subagents", cli.simulate_subagents),
            OptionSource::new("simulateSubagents", file.simulate_subagents),
            OptionSource::deprecated(
                "experimentalSimulateSubagents",
                file.experimental_simulate_subagents,
                "simulateSubagents",
            ),
        ],
        false,
    );
    let simulate_skills = resolver.first_defined(
        vec![
            OptionSource::new("--simulate-skills", cli.simulate_skills),
            OptionSource::new("simulateSkills", file.simulate_skills),
        ],
        false,
    );

    ResolvedOptions {
        base_dirs: base_dirs.into_iter().map(PathBuf::from).collect(),
        targets,
        features,
        verbose,
        delete,
        global,
        simulate_commands,
        simulate_subagents,
        simulate_skills,
        deprecations: resolver.deprecations().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_defined_picks_earliest_value() {
        let mut resolver = OptionResolver::new();
        let value = resolver.first_defined(
            vec![
                OptionSource::new("a", None),
                OptionSource::new("b", Some(2)),
                OptionSource::new("c", Some(3)),
            ],
            0,
        );
        assert_eq!(value, 2);
    }

    #[test]
    fn first_defined_falls_back_to_default() {
        let mut resolver = OptionResolver::new();
        let value: bool = resolver.first_defined(vec![OptionSource::new("a", None)], true);
        assert!(value);
        assert!(resolver.deprecations().is_empty());
    }

    #[test]
    fn deprecated_value_warns_even_when_it_loses() {
        let mut resolver = OptionResolver::new();
        let value = resolver.first_defined(
            vec![
                OptionSource::new("global", Some(false)),
                OptionSource::deprecated("experimentalGlobal", Some(true), "global"),
            ],
            false,
        );
        assert!(!value);
        assert_eq!(
            resolver.deprecations(),
            &[Deprecation {
                name: "experimentalGlobal",
                replaced_by: "global"
            }]
        );
    }

    #[test]
    fn undefined_deprecated_value_is_silent() {
        let mut resolver = OptionResolver::new();
        resolver.first_defined(
            vec![OptionSource::deprecated("experimentalGlobal", None::<bool>, "global")],
            false,
        );
        assert!(resolver.deprecations().is_empty());
    }

    #[test]
    fn defaults_without_config() {
        let resolved = resolve_options(&CliOverrides::default(), None);
        assert_eq!(resolved.base_dirs, vec![PathBuf::from(".")]);
        assert_eq!(resolved.targets, vec!["*"]);
        assert_eq!(resolved.features, vec!["*"]);
        assert!(!resolved.global);
        assert!(!resolved.delete);
        assert!(!resolved.simulate_skills);
    }

    #[test]
    fn cli_wins_over_config() {
        let file = ConfigFile {
            delete: Some(true),
            targets: Some(crate::config::StringList::Many(vec!["cursor".into()])),
            ..Default::default()
        };
        let cli = CliOverrides {
            delete: Some(false),
            ..Default::default()
        };
        let resolved = resolve_options(&cli, Some(&file));
        assert!(!resolved.delete);
        assert_eq!(resolved.targets, vec!["cursor"]);
    }

    #[test]
    fn deprecated_key_is_used_when_new_key_absent() {
        let file = ConfigFile {
            experimental_simulate_commands: Some(true),
            ..Default::default()
        };
        let resolved = resolve_options(&CliOverrides::default(), Some(&file));
        assert!(resolved.simulate_commands);
        assert_eq!(resolved.deprecations.len(), 1);
        assert_eq!(resolved.deprecations[0].replaced_by, "simulateCommands");
    }

    #[test]
    fn new_key_beats_deprecated_key() {
        let file = ConfigFile {
            simulate_subagents: Some(false),
            experimental_simulate_subagents: Some(true),
            ..Default::default()
        };
        let resolved = resolve_options(&CliOverrides::default(), Some(&file));
        assert!(!resolved.simulate_subagents);
        assert_eq!(resolved.deprecations.len(), 1);
    }
}
