//! Compiled-in target table.
//!
//! | target       | rules                                         | subagents                  |
//! |--------------|-----------------------------------------------|----------------------------|
//! | `claudecode` | `.claude/rules/{name}.md`                     | `.claude/agents/{name}.md` |
//! | `copilot`    | `.github/instructions/{name}.instructions.md` | `.github/agents/{name}.md` |
//! | `opencode`   | `.opencode/memories/{name}.md`                | `.opencode/agent/{name}.md`|
//! | `cursor`     | `.cursor/rules/{name}.mdc`                    | `.cursor/agents/{name}.md` |
//! | `codexcli`   | `.codex/memories/{name}.md`                   | `.codex/agents/{name}.md`  |

use crate::registry::{CanonicalField, FieldRule, KindSchema, TargetSchema};

pub const CLAUDECODE: &str = "claudecode";
pub const COPILOT: &str = "copilot";
pub const OPENCODE: &str = "opencode";
pub const CURSOR: &str = "cursor";
pub const CODEXCLI: &str = "codexcli";

/// Codex has no native subagent files, so the metadata is folded into the body.
const CODEX_AGENT_BODY: &str = "# {{name}}\n\n{{description}}\n\n{{body}}";

pub fn builtin_schemas() -> Vec<TargetSchema> {
    vec![claudecode(), copilot(), opencode(), cursor(), codexcli()]
}

fn claudecode() -> TargetSchema {
    TargetSchema::new(
        CLAUDECODE,
        KindSchema::new(".claude/rules/{name}.md")
            .field(FieldRule::copy(CanonicalField::Description, "description"))
            .field(FieldRule::copy(CanonicalField::Globs, "paths"))
            .field(FieldRule::PassThrough),
        KindSchema::new(".claude/agents/{name}.md")
            .field(FieldRule::copy(CanonicalField::Name, "name"))
            .field(FieldRule::copy(CanonicalField::Description, "description"))
            .field(FieldRule::PassThrough),
    )
}

fn copilot() -> TargetSchema {
    TargetSchema::new(
        COPILOT,
        KindSchema::new(".github/instructions/{name}.instructions.md")
            .field(FieldRule::copy(CanonicalField::Description, "description"))
            .field(FieldRule::copy(CanonicalField::GlobsJoined, "applyTo"))
            .field(FieldRule::PassThrough)
            .field(FieldRule::default_value("applyTo", "**")),
        KindSchema::new(".github/agents/{name}.md")
            .field(FieldRule::copy(CanonicalField::Name, "name"))
            .field(FieldRule::copy(CanonicalField::Description, "description"))
            .field(FieldRule::PassThrough),
    )
}

fn opencode() -> TargetSchema {
    TargetSchema::new(
        OPENCODE,
        KindSchema::new(".opencode/memories/{name}.md").field(FieldRule::PassThrough),
        KindSchema::new(".opencode/agent/{name}.md")
            .field(FieldRule::copy(CanonicalField::Description, "description"))
            .field(FieldRule::default_value("mode", "subagent"))
            .field(FieldRule::PassThrough),
    )
}

fn cursor() -> TargetSchema {
    TargetSchema::new(
        CURSOR,
        KindSchema::new(".cursor/rules/{name}.mdc")
            .field(FieldRule::copy(CanonicalField::Description, "description"))
            .field(FieldRule::copy(CanonicalField::GlobsJoined, "globs"))
            .field(FieldRule::default_value("alwaysApply", false))
            .field(FieldRule::PassThrough),
        KindSchema::new(".cursor/agents/{name}.md")
            .field(FieldRule::copy(CanonicalField::Name, "name"))
            .field(FieldRule::copy(CanonicalField::Description, "description"))
            .field(FieldRule::PassThrough),
    )
}

fn codexcli() -> TargetSchema {
    TargetSchema::new(
        CODEXCLI,
        KindSchema::new(".codex/memories/{name}.md").field(FieldRule::PassThrough),
        KindSchema::new(".codex/agents/{name}.md")
            .field(FieldRule::PassThrough)
            .wrap_body(CODEX_AGENT_BODY),
    )
}
