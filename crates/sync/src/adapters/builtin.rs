//! The built-in tool catalogue.

use super::{files, non_root, root, Adapter, Format, Layout, RefStyle};
use crate::registry::RegistryEntry;
use crate::tool::{Feature, ToolTarget};

use Format::*;
use ToolTarget::*;

/// Every built-in registry entry, in registration order.
pub fn builtin_entries() -> Vec<RegistryEntry> {
    let mut entries = rules();
    entries.extend(commands());
    entries.extend(subagents());
    entries.extend(skills());
    entries
}

fn rule(tool: ToolTarget, format: Format, layout: Layout) -> Adapter {
    Adapter::new(tool, Feature::Rules, format, layout)
}

fn memories(tool: ToolTarget, root_file: &'static str, dir: &'static str) -> Adapter {
    rule(tool, Bare, files(root("", root_file), non_root(dir, ".md")))
}

fn rules() -> Vec<RegistryEntry> {
    [
        memories(AgentsMd, "AGENTS.md", ".agents/memories").with_references(RefStyle::Toon),
        rule(AmazonQCli, Bare, files(None, non_root(".amazonq/rules", ".md"))),
        memories(ClaudeCode, "CLAUDE.md", ".claude/memories")
            .with_global(files(root(".claude", "CLAUDE.md"), None))
            .with_references(RefStyle::AtLines),
        rule(Cline, Bare, files(None, non_root(".clinerules", ".md"))),
        memories(CodexCli, "AGENTS.md", ".codex/memories")
            .with_global(files(root(".codex", "AGENTS.md"), None))
            .with_references(RefStyle::Toon),
        rule(
            Copilot,
            CopilotInstruction,
            files(
                root(".github", "copilot-instructions.md"),
                non_root(".github/instructions", ".instructions.md"),
            ),
        ),
        rule(Cursor, CursorRule, files(None, non_root(".cursor/rules", ".mdc")))
            .with_conventions_rule(),
        memories(GeminiCli, "GEMINI.md", ".gemini/memories")
            .with_global(files(root(".gemini", "GEMINI.md"), None))
            .with_references(RefStyle::AtLines),
        rule(
            Junie,
            Bare,
            files(root(".junie", "guidelines.md"), non_root(".junie/memories", ".md")),
        )
        .with_references(RefStyle::Toon),
        rule(Kiro, KiroSteering, files(None, non_root(".kiro/steering", ".md"))),
        memories(OpenCode, "AGENTS.md", ".opencode/memories").with_references(RefStyle::Toon),
        memories(QwenCode, "QWEN.md", ".qwen/memories").with_references(RefStyle::AtLines),
        rule(Roo, Bare, files(None, non_root(".roo/rules", ".md"))).with_conventions_rule(),
        memories(Warp, "WARP.md", ".warp/memories").with_references(RefStyle::Toon),
        rule(Windsurf, WindsurfRule, files(None, non_root(".windsurf/rules", ".md"))),
    ]
    .into_iter()
    .map(RegistryEntry::new)
    .collect()
}

fn command_dir(dir: &'static str, extension: &'static str) -> Layout {
    files(None, non_root(dir, extension))
}

fn command(tool: ToolTarget, format: Format, dir: &'static str, ext: &'static str) -> Adapter {
    Adapter::new(tool, Feature::Commands, format, command_dir(dir, ext))
}

fn simulated_command(tool: ToolTarget, dir: &'static str) -> Adapter {
    Adapter::simulated(tool, Feature::Commands, Described, command_dir(dir, ".md"))
}

fn commands() -> Vec<RegistryEntry> {
    vec![
        RegistryEntry::new(simulated_command(AgentsMd, ".agents/commands")),
        RegistryEntry::new(
            command(ClaudeCode, ClaudeCommand, ".claude/commands", ".md")
                .with_global(command_dir(".claude/commands", ".md")),
        ),
        RegistryEntry::new(Adapter::global_only(
            CodexCli,
            Feature::Commands,
            Bare,
            command_dir(".codex/prompts", ".md"),
        ))
        .with_project_adapter(simulated_command(CodexCli, ".codex/commands")),
        RegistryEntry::new(command(Copilot, CopilotPrompt, ".github/prompts", ".prompt.md")),
        RegistryEntry::new(
            command(Cursor, Bare, ".cursor/commands", ".md")
                .with_global(command_dir(".cursor/commands", ".md")),
        ),
        RegistryEntry::new(
            command(GeminiCli, GeminiCommand, ".gemini/commands", ".toml")
                .with_global(command_dir(".gemini/commands", ".toml")),
        ),
        RegistryEntry::new(
            command(OpenCode, Described, ".opencode/command", ".md")
                .with_global(command_dir(".config/opencode/command", ".md")),
        ),
        RegistryEntry::new(command(Roo, Described, ".roo/commands", ".md")),
    ]
}

fn simulated_subagent(tool: ToolTarget, dir: &'static str) -> RegistryEntry {
    RegistryEntry::new(Adapter::simulated(
        tool,
        Feature::Subagents,
        Described,
        files(None, non_root(dir, ".md")),
    ))
}

fn subagents() -> Vec<RegistryEntry> {
    let claude_agents = files(None, non_root(".claude/agents", ".md"));
    vec![
        simulated_subagent(AgentsMd, ".agents/subagents"),
        RegistryEntry::new(
            Adapter::new(ClaudeCode, Feature::Subagents, ClaudeSubagent, claude_agents)
                .with_global(claude_agents),
        ),
        simulated_subagent(CodexCli, ".codex/subagents"),
        simulated_subagent(Copilot, ".github/subagents"),
        simulated_subagent(Cursor, ".cursor/subagents"),
        simulated_subagent(GeminiCli, ".gemini/subagents"),
        simulated_subagent(Roo, ".roo/subagents"),
    ]
}

fn skill_dir(dir: &'static str) -> Layout {
    Layout::Dir { dir }
}

fn simulated_skill(tool: ToolTarget, dir: &'static str) -> Adapter {
    Adapter::simulated(tool, Feature::Skills, Skill, skill_dir(dir))
}

fn skills() -> Vec<RegistryEntry> {
    vec![
        RegistryEntry::new(simulated_skill(AgentsMd, ".agents/skills")),
        RegistryEntry::new(
            Adapter::new(ClaudeCode, Feature::Skills, Skill, skill_dir(".claude/skills"))
                .with_global(skill_dir(".claude/skills")),
        ),
        RegistryEntry::new(Adapter::global_only(
            CodexCli,
            Feature::Skills,
            Skill,
            skill_dir(".codex/skills"),
        ))
        .with_project_adapter(simulated_skill(CodexCli, ".codex/simulated-skills")),
        RegistryEntry::new(Adapter::new(
            Copilot,
            Feature::Skills,
            Skill,
            skill_dir(".github/skills"),
        )),
        RegistryEntry::new(simulated_skill(Cursor, ".cursor/skills")),
        RegistryEntry::new(simulated_skill(GeminiCli, ".gemini/skills")),
    ]
}
