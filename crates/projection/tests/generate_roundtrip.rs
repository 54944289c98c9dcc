//! Generation runs against a real output directory.
//!
//! Documents are written with [`FsWriter`] into a temp dir and read back
//! through the front matter parser, the way a target tool would see them.

use rulesync_frontmatter::{parse_document, Value};
use rulesync_projection::{
    generate, CanonicalEntity, EntityKind, FsWriter, GenerateParams, ProjectionError, SkipReason,
    TargetRegistry, Targets,
};
use std::fs;
use tempfile::TempDir;

fn planner() -> CanonicalEntity {
    CanonicalEntity::new(
        EntityKind::Subagent,
        "planner",
        "You are the planner. Analyze files and create a plan.\n",
    )
    .unwrap()
    .with_description("Plans implementation tasks")
}

fn primary_agent() -> CanonicalEntity {
    CanonicalEntity::new(
        EntityKind::Subagent,
        "primary-agent",
        "You are a primary agent.\n",
    )
    .unwrap()
    .with_description("A primary mode agent")
    .with_extension(
        "opencode",
        serde_yaml::from_str("mode: primary\nhidden: false").unwrap(),
    )
}

fn params(targets: &[&str]) -> GenerateParams {
    GenerateParams {
        targets: targets.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn planner_lands_in_claudecode_and_copilot_agent_dirs() {
    // GIVEN a planner subagent targeting every tool
    let out = TempDir::new().unwrap();
    let registry = TargetRegistry::builtin().unwrap();
    let writer = FsWriter::new(out.path());

    // WHEN generating for claudecode and copilot
    let report = generate(
        &registry,
        &[planner()],
        &params(&["claudecode", "copilot"]),
        &writer,
    )
    .unwrap();

    // THEN both agent files exist and carry the body verbatim
    assert!(report.success);
    for relative in [".claude/agents/planner.md", ".github/agents/planner.md"] {
        let content = fs::read_to_string(out.path().join(relative)).unwrap();
        let parsed = parse_document(&content).unwrap();
        assert!(parsed.has_front_matter, "{relative}");
        assert_eq!(
            parsed.front_matter.get("name").and_then(Value::as_str),
            Some("planner")
        );
        assert!(parsed.body.contains("Analyze files and create a plan."));
    }
}

#[test]
fn opencode_primary_mode_is_written_as_authored() {
    let out = TempDir::new().unwrap();
    let registry = TargetRegistry::builtin().unwrap();
    let writer = FsWriter::new(out.path());

    generate(&registry, &[primary_agent()], &params(&["opencode"]), &writer).unwrap();

    let content = fs::read_to_string(out.path().join(".opencode/agent/primary-agent.md")).unwrap();
    assert!(content.contains("mode: primary"));
    assert!(!content.contains("mode: subagent"));

    let parsed = parse_document(&content).unwrap();
    assert_eq!(
        parsed.front_matter.get("hidden").and_then(Value::as_bool),
        Some(false)
    );
}

#[test]
fn second_run_reports_everything_unchanged() {
    let out = TempDir::new().unwrap();
    let registry = TargetRegistry::builtin().unwrap();
    let writer = FsWriter::new(out.path());
    let entities = [planner(), primary_agent()];

    let first = generate(&registry, &entities, &GenerateParams::default(), &writer).unwrap();
    let second = generate(&registry, &entities, &GenerateParams::default(), &writer).unwrap();

    assert_eq!(first.total_written(), 2 * registry.len());
    assert_eq!(second.total_written(), 0);
    for target in &second.targets {
        assert_eq!(target.unchanged(), 2, "{}", target.target);
    }
}

#[test]
fn dry_run_leaves_the_output_directory_empty() {
    let out = TempDir::new().unwrap();
    let registry = TargetRegistry::builtin().unwrap();
    let writer = FsWriter::new(out.path());
    let params = GenerateParams {
        dry_run: true,
        ..Default::default()
    };

    let report = generate(&registry, &[planner()], &params, &writer).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.total_written(), registry.len());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn unknown_target_fails_without_blocking_known_targets() {
    let out = TempDir::new().unwrap();
    let registry = TargetRegistry::builtin().unwrap();
    let writer = FsWriter::new(out.path());

    let report = generate(
        &registry,
        &[planner()],
        &params(&["claudecode", "nonexistent-target"]),
        &writer,
    )
    .unwrap();

    assert!(!report.success);
    assert_eq!(
        report.failures,
        [ProjectionError::unknown_target("nonexistent-target")]
    );
    assert!(out.path().join(".claude/agents/planner.md").exists());
}

#[test]
fn restricted_entity_is_skipped_for_other_targets() {
    let out = TempDir::new().unwrap();
    let registry = TargetRegistry::builtin().unwrap();
    let writer = FsWriter::new(out.path());
    let entity = planner().with_targets(Targets::from_ids(["claudecode"]));

    let report = generate(
        &registry,
        &[entity],
        &params(&["claudecode", "copilot"]),
        &writer,
    )
    .unwrap();

    assert!(report.success);
    let copilot = report.target("copilot").unwrap();
    assert_eq!(copilot.written, 0);
    assert!(matches!(
        copilot.skipped.as_slice(),
        [SkipReason::NotApplicable { .. }]
    ));
    assert!(!out.path().join(".github").exists());
}

#[test]
fn names_that_sanitize_alike_collide_and_are_both_skipped() {
    let out = TempDir::new().unwrap();
    let registry = TargetRegistry::builtin().unwrap();
    let writer = FsWriter::new(out.path());
    let a = CanonicalEntity::new(EntityKind::Rule, "style", "A\n").unwrap();
    let b = CanonicalEntity::new(EntityKind::Rule, "st*yle", "B\n").unwrap();

    let report = generate(&registry, &[a, b], &params(&["cursor"]), &writer).unwrap();

    assert!(!report.success);
    let cursor = report.target("cursor").unwrap();
    assert_eq!(cursor.written, 0);
    assert_eq!(cursor.skipped.len(), 2);
    assert!(!out.path().join(".cursor/rules/style.mdc").exists());
}
