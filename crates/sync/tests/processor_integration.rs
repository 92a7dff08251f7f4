//! End-to-end tests for processors and the orchestrator against a temp project.

use rulekit_sync::{
    resolve_paths, CanonicalDocument, Family, Feature, GenerateParams, ImportParams, Mode,
    Orchestrator, Processor, ProcessorOptions, Registry, SkipReason, SyncError, ToolDocument,
    ToolTarget,
};
use rulekit_test_utils::TestFixture;
use std::fs;

const ROOT_RULE: &str = "---\nroot: true\n---\nIntro";
const STYLE_RULE: &str = "---\ndescription: Style guide\nglobs: [\"*.ts\"]\n---\nUse tabs.";

fn fixture_with_rules() -> TestFixture {
    let fixture = TestFixture::new().expect("fixture");
    fixture.write_rule("overview.md", ROOT_RULE).unwrap();
    fixture.write_rule("style.md", STYLE_RULE).unwrap();
    fixture
}

fn options(fixture: &TestFixture, tool: ToolTarget) -> ProcessorOptions {
    ProcessorOptions::new(&fixture.project, &fixture.home, tool)
}

async fn convert_rules(
    registry: &Registry,
    options: ProcessorOptions,
) -> Result<Vec<ToolDocument>, SyncError> {
    let processor = Processor::new(registry, Feature::Rules, options);
    let canonical = processor.load_canonical_documents().await?;
    processor.convert_canonical_to_tool(&canonical)
}

fn root_of(docs: &[ToolDocument]) -> &ToolDocument {
    docs.iter().find(|d| d.is_root()).expect("root document")
}

#[tokio::test]
async fn toon_references_precede_root_body() {
    let fixture = fixture_with_rules();
    let registry = Registry::builtin();

    let docs = convert_rules(&registry, options(&fixture, ToolTarget::AgentsMd))
        .await
        .unwrap();

    let root = root_of(&docs);
    assert_eq!(root.relative_path_string(), "AGENTS.md");
    assert!(root
        .body
        .starts_with("Please also reference the following rules as needed."));
    assert!(root.body.contains(
        "rules[1]{path,description,applyTo}:\n  @.agents/memories/style.md,Style guide,*.ts"
    ));
    assert!(root.body.ends_with("\n\nIntro"));
}

#[tokio::test]
async fn at_line_references_precede_root_body() {
    let fixture = fixture_with_rules();
    let registry = Registry::builtin();

    let docs = convert_rules(&registry, options(&fixture, ToolTarget::ClaudeCode))
        .await
        .unwrap();

    let root = root_of(&docs);
    assert_eq!(root.relative_path_string(), "CLAUDE.md");
    assert!(root
        .body
        .starts_with("Please also reference the following documents as needed:"));
    assert!(root
        .body
        .contains("@.claude/memories/style.md description:\"Style guide\" applyTo:\"*.ts\""));
    assert!(root.body.ends_with("Intro"));
    assert_eq!(root.file_content().unwrap(), root.body);
}

#[tokio::test]
async fn multiple_roots_are_rejected() {
    let fixture = fixture_with_rules();
    fixture
        .write_rule("second.md", "---\nroot: true\n---\nAgain")
        .unwrap();
    let registry = Registry::builtin();

    let err = convert_rules(&registry, options(&fixture, ToolTarget::ClaudeCode))
        .await
        .unwrap_err();
    match err {
        SyncError::MultipleRoot { paths } => assert_eq!(paths.len(), 2),
        other => panic!("expected MultipleRoot, got {other:?}"),
    }
}

#[tokio::test]
async fn global_mode_keeps_only_the_root_rule() {
    let fixture = fixture_with_rules();
    let registry = Registry::builtin();

    let docs = convert_rules(
        &registry,
        options(&fixture, ToolTarget::ClaudeCode).with_global(true),
    )
    .await
    .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].path(), fixture.home.join(".claude/CLAUDE.md"));
    assert_eq!(docs[0].body, "Intro");
}

#[tokio::test]
async fn targets_limit_documents_to_listed_tools() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_rule("cursor-only.md", "---\ntargets: [\"cursor\"]\n---\nCursor specifics.")
        .unwrap();
    let registry = Registry::builtin();

    for tool in registry.project_targets(Feature::Rules) {
        let docs = convert_rules(&registry, options(&fixture, tool)).await.unwrap();
        let present = docs.iter().any(|d| d.name == "cursor-only");
        assert_eq!(present, tool == ToolTarget::Cursor, "tool {tool}");
    }
}

#[tokio::test]
async fn wildcard_targets_reach_every_tool() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_rule("listed.md", "---\ntargets: [\"*\"]\n---\nEverywhere.")
        .unwrap();
    fixture
        .write_rule("scalar.md", "---\ntargets: \"*\"\n---\nEverywhere too.")
        .unwrap();
    let registry = Registry::builtin();

    for tool in registry.project_targets(Feature::Rules) {
        let docs = convert_rules(&registry, options(&fixture, tool)).await.unwrap();
        for name in ["listed", "scalar"] {
            assert!(
                docs.iter().any(|d| d.name == name),
                "tool {tool} is missing {name}"
            );
        }
    }
}

#[tokio::test]
async fn deletion_load_skips_broken_files() {
    let fixture = TestFixture::new().unwrap();
    let rules_dir = fixture.project.join(".cursor/rules");
    fs::create_dir_all(&rules_dir).unwrap();
    fs::write(
        rules_dir.join("broken.mdc"),
        "---\ndescription: [unclosed\n---\nBody",
    )
    .unwrap();
    fs::write(
        rules_dir.join("fine.mdc"),
        "---\ndescription: Fine\nalwaysApply: false\n---\nBody",
    )
    .unwrap();

    let registry = Registry::builtin();
    let processor = Processor::new(
        &registry,
        Feature::Rules,
        options(&fixture, ToolTarget::Cursor),
    );

    let for_deletion = processor.load_tool_documents_for_deletion().await.unwrap();
    assert_eq!(for_deletion.documents.len(), 1);
    assert_eq!(for_deletion.documents[0].name, "fine");
    assert_eq!(for_deletion.warnings.len(), 1);
    assert!(for_deletion.warnings[0].contains("broken.mdc"));

    assert!(processor.load_tool_documents().await.is_err());
}

#[test]
fn adapter_selection_follows_mode() {
    let registry = Registry::builtin();

    let project = registry
        .resolve(Feature::Commands, ToolTarget::CodexCli, Mode::Project)
        .unwrap();
    assert_eq!(project.family, Family::Simulated);

    let global = registry
        .resolve(Feature::Commands, ToolTarget::CodexCli, Mode::Global)
        .unwrap();
    assert_eq!(global.family, Family::Native);
    assert!(resolve_paths(global, Mode::Global).is_ok());
}

#[tokio::test]
async fn simulated_documents_cannot_be_imported() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_command("deploy.md", "---\ndescription: Deploy\n---\nShip it.")
        .unwrap();
    let registry = Registry::builtin();
    let processor = Processor::new(
        &registry,
        Feature::Commands,
        options(&fixture, ToolTarget::AgentsMd).with_simulation(true, false, false),
    );

    let canonical = processor.load_canonical_documents().await.unwrap();
    let docs = processor.convert_canonical_to_tool(&canonical).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].family, Family::Simulated);
    assert_eq!(docs[0].relative_path_string(), ".agents/commands/deploy.md");

    assert!(matches!(
        docs[0].to_canonical(),
        Err(SyncError::SimulatedReverseConversion { .. })
    ));
    assert!(processor.convert_tool_to_canonical(&docs).unwrap().is_empty());

    let adapter = registry
        .resolve(Feature::Commands, ToolTarget::AgentsMd, Mode::Global)
        .unwrap();
    assert!(matches!(
        resolve_paths(adapter, Mode::Global),
        Err(SyncError::UnsupportedMode { .. })
    ));
}

#[tokio::test]
async fn root_rule_lists_simulated_conventions() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_rule("overview.md", ROOT_RULE).unwrap();
    let registry = Registry::builtin();

    let docs = convert_rules(
        &registry,
        options(&fixture, ToolTarget::CodexCli).with_simulation(true, false, true),
    )
    .await
    .unwrap();

    let root = root_of(&docs);
    assert!(root.body.starts_with("# Additional Conventions"));
    assert!(root.body.contains("`.codex/commands/`"));
    assert!(root.body.contains("## Simulated Skills"));
    assert!(!root.body.contains("## Simulated Subagents"));
    assert!(root.body.ends_with("Intro"));
}

#[tokio::test]
async fn cursor_gets_a_conventions_rule() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_rule("style.md", STYLE_RULE).unwrap();
    let registry = Registry::builtin();

    let docs = convert_rules(
        &registry,
        options(&fixture, ToolTarget::Cursor).with_simulation(false, true, false),
    )
    .await
    .unwrap();

    let conventions = docs
        .iter()
        .find(|d| d.relative_path_string() == ".cursor/rules/additional-conventions.mdc")
        .expect("conventions rule");
    assert!(conventions.body.contains("`.cursor/subagents/`"));

    let processor = Processor::new(
        &registry,
        Feature::Rules,
        options(&fixture, ToolTarget::Cursor),
    );
    let imported = processor.convert_tool_to_canonical(&docs).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].name(), "style");
}

#[tokio::test]
async fn conventions_rule_name_is_reserved() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_rule("additional-conventions.md", "USER RULE")
        .unwrap();
    let registry = Registry::builtin();

    for tool in [ToolTarget::Cursor, ToolTarget::Roo] {
        let err = convert_rules(
            &registry,
            options(&fixture, tool).with_simulation(false, true, false),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SyncError::Validation { .. }), "tool {tool}");
    }

    let processor = Processor::new(
        &registry,
        Feature::Rules,
        options(&fixture, ToolTarget::ClaudeCode),
    );
    let canonical = processor.load_canonical_documents().await.unwrap();
    let docs = processor.convert_canonical_to_tool(&canonical).unwrap();
    let imported = processor.convert_tool_to_canonical(&docs).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].body(), "USER RULE");
}

#[tokio::test]
async fn generate_then_import_restores_commands() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_command(
            "commit.md",
            "---\ndescription: Commit staged work\nclaudecode:\n  allowed-tools: [Bash]\n---\nWrite a commit message.",
        )
        .unwrap();
    let orchestrator = Orchestrator::builtin();

    let report = orchestrator
        .generate(&GenerateParams {
            base_dirs: vec![fixture.project.clone()],
            home_dir: fixture.home.clone(),
            targets: vec![ToolTarget::ClaudeCode],
            features: vec![Feature::Commands],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(report.commands.written, 1);

    let generated = fixture.read_project_file(".claude/commands/commit.md").unwrap();
    assert!(generated.contains("allowed-tools"));
    assert!(generated.ends_with("Write a commit message."));

    fs::remove_file(fixture.canonical_dir("commands").join("commit.md")).unwrap();
    let mut import = ImportParams::new(&fixture.project, &fixture.home, ToolTarget::ClaudeCode);
    import.features = vec![Feature::Commands];
    let report = orchestrator.import(&import).await.unwrap();
    assert_eq!(report.commands.written, 1);

    let restored = fixture.read_project_file(".rulekit/commands/commit.md").unwrap();
    let doc = CanonicalDocument::from_content(Feature::Commands, "commit.md", &restored).unwrap();
    assert_eq!(doc.description(), Some("Commit staged work"));
    assert!(doc.override_block(ToolTarget::ClaudeCode).is_some());
    assert_eq!(doc.body(), "Write a commit message.");
}

#[tokio::test]
async fn skills_carry_auxiliary_files() {
    let fixture = TestFixture::new().unwrap();
    let skill_dir = fixture
        .write_skill("review", "Review a diff", "Read the diff first.")
        .unwrap();
    fs::create_dir_all(skill_dir.join("scripts")).unwrap();
    fs::write(skill_dir.join("scripts/run.sh"), "echo review").unwrap();

    let report = Orchestrator::builtin()
        .generate(&GenerateParams {
            base_dirs: vec![fixture.project.clone()],
            home_dir: fixture.home.clone(),
            targets: vec![ToolTarget::ClaudeCode],
            features: vec![Feature::Skills],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(report.skills.written, 2);
    let manifest = fixture
        .read_project_file(".claude/skills/review/SKILL.md")
        .unwrap();
    assert!(manifest.contains("name: review"));
    assert_eq!(
        fixture
            .read_project_file(".claude/skills/review/scripts/run.sh")
            .unwrap(),
        "echo review"
    );
}

#[tokio::test]
async fn dry_run_reports_without_writing() {
    let fixture = fixture_with_rules();

    let report = Orchestrator::builtin()
        .generate(&GenerateParams {
            base_dirs: vec![fixture.project.clone()],
            home_dir: fixture.home.clone(),
            targets: vec![ToolTarget::ClaudeCode, ToolTarget::Cline],
            features: vec![Feature::Rules, Feature::Commands],
            dry_run: true,
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.rules.written, 4);
    assert!(report.commands.skipped.contains(&SkipReason::UnsupportedFeature {
        tool: ToolTarget::Cline,
        feature: Feature::Commands,
    }));
    assert!(!fixture.project.join("CLAUDE.md").exists());
    assert!(!fixture.project.join(".clinerules").exists());
}

#[tokio::test]
async fn global_generate_writes_under_home() {
    let fixture = fixture_with_rules();

    let report = Orchestrator::builtin()
        .generate(&GenerateParams {
            base_dirs: vec![fixture.project.clone()],
            home_dir: fixture.home.clone(),
            targets: vec![ToolTarget::ClaudeCode, ToolTarget::Cursor],
            features: vec![Feature::Rules],
            global: true,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(report.rules.written, 1);
    assert_eq!(
        fs::read_to_string(fixture.home.join(".claude/CLAUDE.md")).unwrap(),
        "Intro"
    );
    assert_eq!(report.rules.skipped.len(), 1);
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;
    use rulekit_validate::CanonicalFrontmatter;
    use std::path::Path;

    /// Every native adapter with a non-root slot, in the first mode that offers one.
    fn native_adapters(registry: &Registry) -> Vec<(Feature, ToolTarget, Mode)> {
        let mut out = Vec::new();
        for feature in Feature::ALL {
            for tool in registry.registered_tools(feature) {
                for mode in [Mode::Project, Mode::Global] {
                    let Ok(adapter) = registry.resolve(feature, tool, mode) else {
                        continue;
                    };
                    if adapter.family != Family::Native {
                        continue;
                    }
                    if resolve_paths(adapter, mode).is_ok() {
                        out.push((feature, tool, mode));
                        break;
                    }
                }
            }
        }
        out
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Native conversion preserves name, description and body.
        #[test]
        fn native_round_trip(
            name in "[a-z][a-z0-9]{0,15}",
            description in "[A-Za-z][A-Za-z0-9 ]{0,40}",
            body in "[A-Za-z#][A-Za-z0-9 .#\n]{0,200}",
        ) {
            let registry = Registry::builtin();
            for (feature, tool, mode) in native_adapters(&registry) {
                let relative_file = if feature.is_dir_kind() {
                    name.clone()
                } else {
                    format!("{name}.md")
                };
                let frontmatter = CanonicalFrontmatter {
                    name: feature.is_dir_kind().then(|| name.clone()),
                    description: Some(description.clone()),
                    ..Default::default()
                };
                let canonical = CanonicalDocument::new(feature, relative_file, frontmatter, body.clone());

                let adapter = registry.resolve(feature, tool, mode).unwrap();
                let layout = resolve_paths(adapter, mode).unwrap();
                let Some(tool_doc) =
                    ToolDocument::from_canonical(adapter, layout, &canonical, Path::new("/base"))
                else {
                    continue;
                };

                let back = tool_doc.to_canonical().unwrap();
                prop_assert_eq!(back.name(), canonical.name(), "{} {}", tool, feature);
                prop_assert_eq!(back.description(), canonical.description(), "{} {}", tool, feature);
                prop_assert_eq!(back.body(), canonical.body(), "{} {}", tool, feature);
            }
        }
    }
}
