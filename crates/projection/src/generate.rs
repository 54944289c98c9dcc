//! Generation run: the entity × target cross product, end to end.

use crate::engine::{ProjectionEngine, TargetDocument};
use crate::entity::{CanonicalEntity, EntityKind, WILDCARD};
use crate::error::ProjectionError;
use crate::paths::PathClaims;
use crate::registry::TargetRegistry;
use crate::report::{GenerateReport, SkipReason};
use crate::writer::{WriteOutcome, Writer};
use crate::Result;
use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, warn};

/// Parameters for a generation run.
///
/// ```
/// use rulesync_projection::GenerateParams;
///
/// let params = GenerateParams { dry_run: true, ..Default::default() };
/// assert_eq!(params.targets, ["*"]);
/// assert_eq!(params.kinds.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateParams {
    /// Target identifiers to generate for; `"*"` expands to every registered target
    pub targets: Vec<String>,
    /// Entity kinds to generate
    pub kinds: Vec<EntityKind>,
    /// Perform dry run (count documents, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            targets: vec![WILDCARD.to_string()],
            kinds: EntityKind::ALL.to_vec(),
            dry_run: false,
        }
    }
}

/// Expands the requested target list against the registry.
///
/// The wildcard becomes every registered id in registration order. Explicit
/// ids are kept even when unregistered so their projections can report
/// [`ProjectionError::UnknownTarget`]. Duplicates are dropped.
pub fn expand_targets(registry: &TargetRegistry, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        return registry.ids().map(String::from).collect();
    }

    let mut out: Vec<String> = Vec::new();
    let mut push = |id: &str| {
        if !out.iter().any(|existing| existing == id) {
            out.push(id.to_string());
        }
    };
    for id in requested {
        let id = id.trim();
        if id == WILDCARD {
            registry.ids().for_each(&mut push);
        } else if !id.is_empty() {
            push(id);
        }
    }
    out
}

struct Pending {
    target_rank: usize,
    path: PathBuf,
    item: String,
    document: TargetDocument,
}

fn describe(entity: &CanonicalEntity) -> String {
    format!("{} '{}'", entity.kind(), entity.name())
}

/// Projects `entities` for the requested targets and hands every document to
/// `writer`.
///
/// Every requested id missing from the registry is reported as
/// [`ProjectionError::UnknownTarget`] whether or not any entity applies to it.
/// Projection failures and path collisions are collected into the report and
/// never stop the run; every entity sharing a colliding path on a target is
/// skipped on that target. Writer errors abort the run.
pub fn generate<W>(
    registry: &TargetRegistry,
    entities: &[CanonicalEntity],
    params: &GenerateParams,
    writer: &W,
) -> Result<GenerateReport>
where
    W: Writer + ?Sized,
{
    let engine = ProjectionEngine::new(registry);
    let targets = expand_targets(registry, &params.targets);
    let selected: Vec<&CanonicalEntity> = entities
        .iter()
        .filter(|e| params.kinds.contains(&e.kind()))
        .collect();

    let mut report = GenerateReport::new();
    report.dry_run = params.dry_run;
    for target in &targets {
        report.target_mut(target);
    }
    for target in targets.iter().filter(|t| !registry.contains(t.as_str())) {
        warn!(target_id = %target, "requested target is not registered");
        report.fail(ProjectionError::unknown_target(target.as_str()));
    }

    let pairs: Vec<(usize, &CanonicalEntity)> = (0..targets.len())
        .flat_map(|rank| selected.iter().map(move |entity| (rank, *entity)))
        .collect();
    let projected: Vec<_> = pairs
        .into_par_iter()
        .map(|(rank, entity)| (rank, entity, engine.project(entity, &targets[rank])))
        .collect();

    let mut claims = PathClaims::new(registry);
    let mut collided: HashSet<(usize, PathBuf)> = HashSet::new();
    let mut pending = Vec::new();

    for (rank, entity, result) in projected {
        let target = targets[rank].as_str();
        let item = describe(entity);
        let document = match result {
            Ok(Some(document)) => document,
            Ok(None) => {
                report
                    .target_mut(target)
                    .skipped
                    .push(SkipReason::NotApplicable { item });
                continue;
            }
            Err(err) => {
                warn!(target_id = target, item = %item, error = %err, "projection failed");
                report.fail(err);
                continue;
            }
        };

        match claims.claim(entity.kind(), entity.name(), target) {
            Ok(path) => pending.push(Pending {
                target_rank: rank,
                path,
                item,
                document,
            }),
            Err(err) => {
                if let ProjectionError::PathCollision { path, .. } = &err {
                    collided.insert((rank, path.clone()));
                    report
                        .target_mut(target)
                        .skipped
                        .push(SkipReason::PathCollision {
                            item,
                            path: path.clone(),
                        });
                }
                report.fail(err);
            }
        }
    }

    let (blocked, mut ready): (Vec<Pending>, Vec<Pending>) = pending
        .into_iter()
        .partition(|p| collided.contains(&(p.target_rank, p.path.clone())));

    for p in blocked {
        report
            .target_mut(&targets[p.target_rank])
            .skipped
            .push(SkipReason::PathCollision {
                item: p.item,
                path: p.path,
            });
    }

    ready.sort_by(|a, b| (a.target_rank, &a.path).cmp(&(b.target_rank, &b.path)));

    for p in ready {
        let target = targets[p.target_rank].as_str();
        let outcome = if params.dry_run {
            WriteOutcome::Written
        } else {
            writer
                .write(&p.path, &p.document)
                .with_context(|| format!("Failed to write {} for {}", p.item, target))?
        };

        let entry = report.target_mut(target);
        match outcome {
            WriteOutcome::Written => {
                entry.written += 1;
                entry.paths.push(p.path);
            }
            WriteOutcome::Unchanged => entry.skipped.push(SkipReason::Unchanged { item: p.item }),
        }
    }

    info!(
        targets = targets.len(),
        entities = selected.len(),
        written = report.total_written(),
        skipped = report.total_skipped(),
        failures = report.failures.len(),
        dry_run = params.dry_run,
        "generation finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Targets;
    use crate::writer::MockWriter;
    use mockall::predicate::*;
    use std::path::Path;

    fn subagent(name: &str) -> CanonicalEntity {
        CanonicalEntity::new(EntityKind::Subagent, name, "Body text\n")
            .unwrap()
            .with_description("desc")
    }

    fn rule(name: &str) -> CanonicalEntity {
        CanonicalEntity::new(EntityKind::Rule, name, "Rule text\n").unwrap()
    }

    fn params(targets: &[&str]) -> GenerateParams {
        GenerateParams {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn expand_wildcard_keeps_registration_order_and_unknown_ids() {
        let registry = TargetRegistry::builtin().unwrap();
        let expanded = expand_targets(
            &registry,
            &["copilot".into(), "*".into(), "nonexistent-target".into()],
        );
        assert_eq!(
            expanded,
            ["copilot", "claudecode", "opencode", "cursor", "codexcli", "nonexistent-target"]
        );
        assert_eq!(expand_targets(&registry, &[]).len(), registry.len());
    }

    #[test]
    fn writes_each_applicable_document_once() {
        let registry = TargetRegistry::builtin().unwrap();
        let entities = vec![subagent("planner"), rule("style")];

        let mut writer = MockWriter::new();
        writer
            .expect_write()
            .with(eq(Path::new(".claude/agents/planner.md")), always())
            .times(1)
            .returning(|_, _| Ok(WriteOutcome::Written));
        writer
            .expect_write()
            .with(eq(Path::new(".claude/rules/style.md")), always())
            .times(1)
            .returning(|_, _| Ok(WriteOutcome::Written));

        let report = generate(&registry, &entities, &params(&["claudecode"]), &writer).unwrap();
        assert!(report.success);
        assert_eq!(report.total_written(), 2);
        assert_eq!(
            report.target("claudecode").unwrap().paths,
            [
                PathBuf::from(".claude/agents/planner.md"),
                PathBuf::from(".claude/rules/style.md"),
            ]
        );
    }

    #[test]
    fn dry_run_never_touches_writer() {
        let registry = TargetRegistry::builtin().unwrap();
        let entities = vec![subagent("planner")];
        let mut writer = MockWriter::new();
        writer.expect_write().never();

        let report = generate(
            &registry,
            &entities,
            &GenerateParams {
                dry_run: true,
                ..Default::default()
            },
            &writer,
        )
        .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.total_written(), registry.len());
    }

    #[test]
    fn unknown_target_is_reported_once_and_others_proceed() {
        let registry = TargetRegistry::builtin().unwrap();
        let entities = vec![subagent("a"), subagent("b")];
        let mut writer = MockWriter::new();
        writer
            .expect_write()
            .times(2)
            .returning(|_, _| Ok(WriteOutcome::Written));

        let report = generate(
            &registry,
            &entities,
            &params(&["nonexistent-target", "copilot"]),
            &writer,
        )
        .unwrap();

        assert!(!report.success);
        assert_eq!(
            report.failures,
            [ProjectionError::unknown_target("nonexistent-target")]
        );
        assert_eq!(report.target("copilot").unwrap().written, 2);
    }

    #[test]
    fn misspelled_target_fails_even_when_no_entity_applies() {
        // GIVEN an entity restricted to claudecode and a typo in the request
        let registry = TargetRegistry::builtin().unwrap();
        let entities =
            vec![subagent("planner").with_targets(Targets::from_ids(["claudecode"]))];
        let mut writer = MockWriter::new();
        writer.expect_write().never();

        // WHEN generating for the typo only
        let report = generate(&registry, &entities, &params(&["claudcode"]), &writer).unwrap();

        // THEN the unregistered id is a failure rather than a silent no-op
        assert!(!report.success);
        assert_eq!(report.failures, [ProjectionError::unknown_target("claudcode")]);
        assert_eq!(report.total_written(), 0);
    }

    #[test]
    fn unregistered_target_fails_without_any_entities() {
        let registry = TargetRegistry::builtin().unwrap();
        let writer = MockWriter::new();

        let report = generate(&registry, &[], &params(&["copilot", "nope"]), &writer).unwrap();

        assert!(!report.success);
        assert_eq!(report.failures, [ProjectionError::unknown_target("nope")]);
    }

    #[test]
    fn every_repeated_claim_is_reported() {
        let registry = TargetRegistry::builtin().unwrap();
        let entities = vec![subagent("planner"), subagent("planner"), subagent("planner")];
        let mut writer = MockWriter::new();
        writer.expect_write().never();

        let report = generate(&registry, &entities, &params(&["claudecode"]), &writer).unwrap();

        assert_eq!(report.failures.len(), 2);
        assert!(report
            .failures
            .iter()
            .all(|f| matches!(f, ProjectionError::PathCollision { .. })));
        assert_eq!(report.target("claudecode").unwrap().skipped.len(), 3);
    }

    #[test]
    fn colliding_entities_are_all_skipped() {
        let registry = TargetRegistry::builtin().unwrap();
        let entities = vec![subagent("planner"), subagent("planner"), subagent("reviewer")];
        let mut writer = MockWriter::new();
        writer
            .expect_write()
            .with(eq(Path::new(".opencode/agent/reviewer.md")), always())
            .times(1)
            .returning(|_, _| Ok(WriteOutcome::Written));

        let report = generate(&registry, &entities, &params(&["opencode"]), &writer).unwrap();

        assert!(!report.success);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0],
            ProjectionError::PathCollision { .. }
        ));
        let opencode = report.target("opencode").unwrap();
        assert_eq!(opencode.written, 1);
        let collisions = opencode
            .skipped
            .iter()
            .filter(|s| matches!(s, SkipReason::PathCollision { .. }))
            .count();
        assert_eq!(collisions, 2);
    }

    #[test]
    fn not_applicable_and_unchanged_are_recorded_as_skips() {
        let registry = TargetRegistry::builtin().unwrap();
        let entities = vec![
            subagent("claude-only").with_targets(Targets::from_ids(["claudecode"])),
            subagent("shared"),
        ];
        let mut writer = MockWriter::new();
        writer
            .expect_write()
            .returning(|_, _| Ok(WriteOutcome::Unchanged));

        let report = generate(&registry, &entities, &params(&["copilot"]), &writer).unwrap();
        let copilot = report.target("copilot").unwrap();

        assert!(report.success);
        assert_eq!(copilot.written, 0);
        assert_eq!(
            copilot.skipped,
            [
                SkipReason::NotApplicable {
                    item: "subagent 'claude-only'".into()
                },
                SkipReason::Unchanged {
                    item: "subagent 'shared'".into()
                },
            ]
        );
    }

    #[test]
    fn kinds_filter_selected_entities() {
        let registry = TargetRegistry::builtin().unwrap();
        let entities = vec![subagent("planner"), rule("style")];
        let mut writer = MockWriter::new();
        writer
            .expect_write()
            .with(eq(Path::new(".cursor/rules/style.mdc")), always())
            .times(1)
            .returning(|_, _| Ok(WriteOutcome::Written));

        let report = generate(
            &registry,
            &entities,
            &GenerateParams {
                targets: vec!["cursor".into()],
                kinds: vec![EntityKind::Rule],
                dry_run: false,
            },
            &writer,
        )
        .unwrap();
        assert_eq!(report.total_written(), 1);
    }

    #[test]
    fn writer_error_aborts_with_context() {
        let registry = TargetRegistry::builtin().unwrap();
        let entities = vec![subagent("planner")];
        let mut writer = MockWriter::new();
        writer
            .expect_write()
            .returning(|_, _| Err(anyhow::anyhow!("disk full")));

        let err = generate(&registry, &entities, &params(&["claudecode"]), &writer).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("subagent 'planner'"));
        assert!(message.contains("disk full"));
    }
}
