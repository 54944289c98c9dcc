//! Generation reporting: what was written, what was skipped, what failed.

use crate::error::ProjectionError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reasons why a document was not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkipReason {
    /// The entity's `targets` do not include this target
    NotApplicable { item: String },
    /// The file on disk already matches the rendered document
    Unchanged { item: String },
    /// Another entity resolves to the same output file
    PathCollision { item: String, path: PathBuf },
}

impl SkipReason {
    /// Returns a human-readable description of the skip reason.
    pub fn description(&self) -> String {
        match self {
            Self::NotApplicable { item } => format!("{} does not target this tool", item),
            Self::Unchanged { item } => format!("{} unchanged (same hash)", item),
            Self::PathCollision { item, path } => {
                format!("{} collides on {}", item, path.display())
            }
        }
    }

    /// Returns actionable guidance for the user.
    pub fn guidance(&self) -> Option<&str> {
        match self {
            Self::NotApplicable { .. } | Self::Unchanged { .. } => None,
            Self::PathCollision { .. } => {
                Some("Rename one of the entities so each has its own output file")
            }
        }
    }
}

/// Outcome for a single target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetReport {
    pub target: String,
    /// Documents written (or that would be written on a dry run)
    pub written: usize,
    pub skipped: Vec<SkipReason>,
    /// Relative paths of written documents, in write order
    pub paths: Vec<PathBuf>,
}

impl TargetReport {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn unchanged(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s, SkipReason::Unchanged { .. }))
            .count()
    }
}

/// Complete report of one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateReport {
    pub targets: Vec<TargetReport>,
    /// Projection failures, each reported once
    pub failures: Vec<ProjectionError>,
    pub dry_run: bool,
    /// Overall success status
    pub success: bool,
}

impl GenerateReport {
    pub fn new() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn target(&self, target: &str) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.target == target)
    }

    pub(crate) fn target_mut(&mut self, target: &str) -> &mut TargetReport {
        if let Some(i) = self.targets.iter().position(|t| t.target == target) {
            return &mut self.targets[i];
        }
        self.targets.push(TargetReport::new(target));
        let last = self.targets.len() - 1;
        &mut self.targets[last]
    }

    /// Records a failure. Path collisions are kept per occurrence; any other
    /// failure is recorded once.
    pub(crate) fn fail(&mut self, error: ProjectionError) {
        let per_occurrence = matches!(error, ProjectionError::PathCollision { .. });
        if per_occurrence || !self.failures.contains(&error) {
            self.failures.push(error);
        }
        self.success = false;
    }

    /// Returns total documents written across all targets.
    pub fn total_written(&self) -> usize {
        self.targets.iter().map(|t| t.written).sum()
    }

    /// Returns total documents skipped across all targets.
    pub fn total_skipped(&self) -> usize {
        self.targets.iter().map(|t| t.skipped.len()).sum()
    }

    /// Generates a formatted summary for display.
    pub fn format_summary(&self) -> String {
        let mut out = String::new();
        if self.dry_run {
            out.push_str("Generate (dry run)\n");
        } else {
            out.push_str("Generate Complete\n");
        }
        for t in &self.targets {
            out.push_str(&format!(
                "  {:<12} {} written, {} unchanged, {} skipped\n",
                t.target,
                t.written,
                t.unchanged(),
                t.skipped.len() - t.unchanged()
            ));
        }
        for failure in &self.failures {
            out.push_str(&format!("  error: {}\n", failure));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_deduplicated() {
        let mut report = GenerateReport::new();
        report.fail(ProjectionError::unknown_target("nope"));
        report.fail(ProjectionError::unknown_target("nope"));
        report.fail(ProjectionError::unknown_target("other"));

        assert_eq!(report.failures.len(), 2);
        assert!(!report.success);
    }

    #[test]
    fn identical_collisions_are_each_recorded() {
        let collision = ProjectionError::PathCollision {
            target: "claudecode".into(),
            path: PathBuf::from(".claude/agents/planner.md"),
            first: "subagent 'planner'".into(),
            second: "subagent 'planner'".into(),
        };
        let mut report = GenerateReport::new();
        report.fail(collision.clone());
        report.fail(collision);

        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn target_mut_creates_once() {
        let mut report = GenerateReport::new();
        report.target_mut("copilot").written += 1;
        report.target_mut("copilot").written += 1;

        assert_eq!(report.targets.len(), 1);
        assert_eq!(report.total_written(), 2);
    }

    #[test]
    fn summary_lists_targets_and_errors() {
        let mut report = GenerateReport::new();
        let t = report.target_mut("claudecode");
        t.written = 2;
        t.skipped.push(SkipReason::Unchanged {
            item: "subagent 'planner'".into(),
        });
        report.fail(ProjectionError::unknown_target("nonexistent-target"));

        let summary = report.format_summary();
        assert!(summary.contains("claudecode"));
        assert!(summary.contains("2 written, 1 unchanged, 0 skipped"));
        assert!(summary.contains("error: unknown target: nonexistent-target"));
    }

    #[test]
    fn skip_reason_serializes_with_type_tag() {
        let reason = SkipReason::PathCollision {
            item: "rule 'a'".into(),
            path: PathBuf::from(".cursor/rules/a.mdc"),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["type"], "PathCollision");
        assert!(reason.guidance().is_some());
    }
}
