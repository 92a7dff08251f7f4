use crate::cli::{Cli, Commands, GenerateArgs, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use rulekit_state::{
    config_path, env_verbose, home_dir, load_config, resolve_options, CliOverrides, ConfigFile,
    ResolvedOptions,
};
use rulekit_sync::{
    parse_features, parse_targets, Feature, GenerateParams, ImportParams, Orchestrator, Registry,
    SyncReport, ToolTarget,
};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// The main entry point for the `rulekit` application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let config_file = config_path(cli.config.as_deref(), &cwd);
    let config = load_config(&config_file)?;

    let mut overrides = match &cli.command {
        Commands::Generate(args) => generate_overrides(args),
        Commands::Import {
            features,
            base_dir,
            global,
            ..
        } => CliOverrides {
            features: features.clone(),
            base_dirs: base_dir.as_ref().map(|d| vec![d.display().to_string()]),
            global: global.then_some(true),
            ..Default::default()
        },
        Commands::Targets { global, .. } => CliOverrides {
            global: global.then_some(true),
            ..Default::default()
        },
    };
    overrides.verbose = cli.verbose.then_some(true).or_else(env_verbose);

    let options = resolve_options(&overrides, config.as_ref());
    init_tracing(options.verbose);
    report_config(&config_file, config.as_ref(), &options);

    match cli.command {
        Commands::Generate(args) => handle_generate(&options, args.dry_run, args.format),
        Commands::Import {
            target,
            dry_run,
            format,
            ..
        } => handle_import(&options, &target, dry_run, format),
        Commands::Targets {
            feature,
            include_simulated,
            ..
        } => handle_targets(&options, feature.as_deref(), include_simulated),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_config(path: &std::path::Path, config: Option<&ConfigFile>, options: &ResolvedOptions) {
    match config {
        Some(_) => debug!(path = %path.display(), "using config file"),
        None => debug!(path = %path.display(), "no config file"),
    }
    for deprecation in &options.deprecations {
        warn!(
            option = deprecation.name,
            replaced_by = deprecation.replaced_by,
            "deprecated config option; use the replacement instead"
        );
    }
}

fn generate_overrides(args: &GenerateArgs) -> CliOverrides {
    CliOverrides {
        base_dirs: (!args.base_dirs.is_empty()).then(|| {
            args.base_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect()
        }),
        targets: args.targets.clone(),
        features: args.features.clone(),
        verbose: None,
        delete: args.delete.then_some(true),
        global: args.global.then_some(true),
        simulate_commands: args.simulate_commands.then_some(true),
        simulate_subagents: args.simulate_subagents.then_some(true),
        simulate_skills: args.simulate_skills.then_some(true),
    }
}

fn handle_generate(options: &ResolvedOptions, dry_run: bool, format: OutputFormat) -> Result<()> {
    let params = GenerateParams {
        base_dirs: options.base_dirs.clone(),
        home_dir: home_dir()?,
        targets: parse_targets(&options.targets)?,
        features: parse_features(&options.features)?,
        global: options.global,
        delete: options.delete,
        simulate_commands: options.simulate_commands,
        simulate_subagents: options.simulate_subagents,
        simulate_skills: options.simulate_skills,
        dry_run,
    };
    debug!(?params, "generate");

    let rt = Runtime::new()?;
    let report = rt.block_on(Orchestrator::builtin().generate(&params))?;
    print_report(&report, format)
}

fn handle_import(
    options: &ResolvedOptions,
    target: &str,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let target: ToolTarget = target.parse()?;
    let base_dir = options
        .base_dirs
        .first()
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut params = ImportParams::new(base_dir, home_dir()?, target);
    params.features = parse_features(&options.features)?;
    params.global = options.global;
    params.dry_run = dry_run;

    let rt = Runtime::new()?;
    let report = rt.block_on(Orchestrator::builtin().import(&params))?;
    print_report(&report, format)
}

fn handle_targets(
    options: &ResolvedOptions,
    feature: Option<&str>,
    include_simulated: bool,
) -> Result<()> {
    let features = match feature {
        Some(f) => vec![f.parse::<Feature>()?],
        None => Feature::ALL.to_vec(),
    };
    let registry = Registry::builtin();
    for feature in features {
        let tools: Vec<String> = registry
            .tool_targets(feature, options.global, include_simulated)
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("{feature}: {}", tools.join(", "));
    }
    Ok(())
}

fn print_report(report: &SyncReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            print!("{}", report.summary);
            for feature in Feature::ALL {
                for warning in &report.feature(feature).warnings {
                    println!("  warning: {warning}");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_generate_flags_fall_through() {
        let cli = Cli::parse_from(["rulekit", "generate"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let overrides = generate_overrides(&args);
        assert!(overrides.base_dirs.is_none());
        assert!(overrides.delete.is_none());
        assert!(overrides.global.is_none());
    }

    #[test]
    fn cli_flags_beat_config_file() {
        let cli = Cli::parse_from(["rulekit", "generate", "--targets", "cursor", "--global"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = rulekit_state::parse_config(
            r#"{ "targets": ["claudecode"], "global": false, "delete": true }"#,
        )
        .unwrap();

        let options = resolve_options(&generate_overrides(&args), Some(&config));
        assert_eq!(options.targets, vec!["cursor"]);
        assert!(options.global);
        assert!(options.delete);
    }
}
