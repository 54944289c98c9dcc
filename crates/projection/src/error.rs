//! Error kinds surfaced by the registry, the entity model, and projection.

use crate::entity::EntityKind;
use serde::Serialize;
use std::path::PathBuf;

/// Failures of a single (entity, target) projection or path claim.
///
/// These are values collected by a generation run; none of them stop the
/// remaining projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "type")]
pub enum ProjectionError {
    /// No schema is registered under the requested identifier.
    #[error("unknown target: {target}")]
    UnknownTarget { target: String },

    /// Two entities resolve to the same output file on one target.
    #[error("{target}: {first} and {second} both resolve to {}", .path.display())]
    PathCollision {
        target: String,
        path: PathBuf,
        first: String,
        second: String,
    },

    /// The entity name has no characters left that are valid in a file name.
    #[error("{kind} name '{name}' cannot be used as a file name")]
    InvalidName { kind: EntityKind, name: String },
}

impl ProjectionError {
    pub fn unknown_target(target: impl Into<String>) -> Self {
        Self::UnknownTarget {
            target: target.into(),
        }
    }

    /// Target identifier the failure belongs to, when there is one.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::UnknownTarget { target } | Self::PathCollision { target, .. } => Some(target),
            Self::InvalidName { .. } => None,
        }
    }
}

/// Misconfiguration of the target table. Raised once, at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("target id registered twice: {0}")]
    DuplicateTargetId(String),
    #[error("target id is invalid: '{0}'")]
    InvalidTargetId(String),
    #[error("{target}: {kind} path template '{template}' does not contain {{name}}")]
    InvalidPathTemplate {
        target: String,
        kind: EntityKind,
        template: String,
    },
}

/// Canonical front matter that violates the entity invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("{kind} has an empty name")]
    EmptyName { kind: EntityKind },
    #[error("{kind} '{name}' has an empty body")]
    EmptyBody { kind: EntityKind, name: String },
    #[error("field '{field}' must be {expected}, found {found}")]
    InvalidField {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("front matter keys must be strings, found {found}")]
    NonStringKey { found: &'static str },
}
