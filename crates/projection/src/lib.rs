//! Projection of canonical rules and subagents into per-tool documents.
//!
//! Authors write each rule or subagent once, in a tool-agnostic form. This
//! crate maps every such [`CanonicalEntity`] onto the native file layout and
//! front matter shape of each registered target (Claude Code, Copilot,
//! OpenCode, ...), keeping target-specific sections exactly as authored.
//!
//! # Examples
//!
//! ```
//! use rulesync_projection::{
//!     paths, CanonicalEntity, EntityKind, ProjectionEngine, TargetRegistry,
//! };
//! use serde_yaml::Value;
//!
//! let registry = TargetRegistry::builtin().unwrap();
//! let engine = ProjectionEngine::new(&registry);
//!
//! let entity = CanonicalEntity::new(EntityKind::Subagent, "primary-agent", "You lead.\n")
//!     .unwrap()
//!     .with_description("A primary mode agent")
//!     .with_extension("opencode", serde_yaml::from_str("mode: primary").unwrap());
//!
//! let doc = engine.project(&entity, "opencode").unwrap().unwrap();
//! assert_eq!(
//!     doc.front_matter().get("mode").and_then(Value::as_str),
//!     Some("primary")
//! );
//!
//! let path = paths::resolve(&registry, entity.kind(), entity.name(), "opencode").unwrap();
//! assert_eq!(path, std::path::Path::new(".opencode/agent/primary-agent.md"));
//! ```

#![deny(unsafe_code)]

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub mod engine;
pub mod entity;
pub mod error;
pub mod generate;
pub mod paths;
pub mod registry;
pub mod report;
pub mod targets;
pub mod writer;

pub use engine::{ProjectionEngine, TargetDocument};
pub use entity::{CanonicalEntity, EntityKind, Targets, WILDCARD};
pub use error::{EntityError, ProjectionError, RegistryError};
pub use generate::{expand_targets, generate, GenerateParams};
pub use paths::{resolve, sanitize_name, PathClaims};
pub use registry::{
    BodyTemplate, CanonicalField, FieldRule, KindSchema, TargetRegistry, TargetSchema,
};
pub use report::{GenerateReport, SkipReason, TargetReport};
pub use writer::{hash_content, FsWriter, WriteOutcome, Writer};
