//! Output path resolution and per-run collision tracking.

use crate::entity::EntityKind;
use crate::error::ProjectionError;
use crate::registry::{TargetRegistry, NAME_PLACEHOLDER};
use std::collections::HashMap;
use std::path::PathBuf;

/// Sanitizes an entity name before it is placed into a path.
///
/// Names are used to construct file paths, so a name like
/// `../../../etc/passwd` must never escape the target directory. Forward
/// slashes are kept for nested names (`category/my-rule`); each segment is
/// reduced to alphanumerics, `-`, `_` and non-leading `.`, and empty, `.`
/// and `..` segments are dropped.
pub fn sanitize_name(name: &str) -> String {
    name.split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
                .collect::<String>()
                .trim_start_matches('.')
                .to_string()
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolves the relative output path of `(kind, name)` on `target_id`.
///
/// Pure: identical inputs always produce the identical path.
pub fn resolve(
    registry: &TargetRegistry,
    kind: EntityKind,
    name: &str,
    target_id: &str,
) -> Result<PathBuf, ProjectionError> {
    let schema = registry
        .schema_for(target_id)
        .ok_or_else(|| ProjectionError::unknown_target(target_id))?;

    let safe_name = sanitize_name(name);
    if safe_name.is_empty() {
        return Err(ProjectionError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }

    let template = &schema.for_kind(kind).path_template;
    let relative = template.replace(NAME_PLACEHOLDER, &safe_name);
    Ok(relative.split('/').filter(|s| !s.is_empty()).collect())
}

#[derive(Debug, Clone)]
struct Claimant {
    kind: EntityKind,
    name: String,
}

/// Paths handed out during one generation run, per target.
///
/// Each entity claims its path once per target. A second claim of the same
/// path is a [`ProjectionError::PathCollision`]; the first claim is kept so
/// the caller can decide what to do with both.
#[derive(Debug)]
pub struct PathClaims<'r> {
    registry: &'r TargetRegistry,
    claimed: HashMap<(String, PathBuf), Claimant>,
}

impl<'r> PathClaims<'r> {
    pub fn new(registry: &'r TargetRegistry) -> Self {
        Self {
            registry,
            claimed: HashMap::new(),
        }
    }

    pub fn claim(
        &mut self,
        kind: EntityKind,
        name: &str,
        target_id: &str,
    ) -> Result<PathBuf, ProjectionError> {
        let path = resolve(self.registry, kind, name, target_id)?;
        let key = (target_id.to_string(), path.clone());

        if let Some(existing) = self.claimed.get(&key) {
            tracing::warn!(
                target_id,
                path = %path.display(),
                first = %existing.name,
                second = name,
                "output path collision"
            );
            return Err(ProjectionError::PathCollision {
                target: target_id.to_string(),
                path,
                first: format!("{} '{}'", existing.kind, existing.name),
                second: format!("{} '{}'", kind, name),
            });
        }

        self.claimed.insert(
            key,
            Claimant {
                kind,
                name: name.to_string(),
            },
        );
        Ok(path)
    }

    /// Number of paths claimed so far across all targets.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
