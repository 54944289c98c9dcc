//! Loading canonical entities from a project's `.rulesync/` directory.
//!
//! This crate provides:
//! - The canonical source layout (`.rulesync/rules`, `.rulesync/subagents`).
//! - Parsing of each source file into a [`CanonicalEntity`].
//! - A [`LoadReport`] that keeps going past broken files.
//!
//! # Examples
//!
//! ```
//! use rulesync_discovery::load_entities;
//! use rulesync_projection::EntityKind;
//! use tempfile::tempdir;
//!
//! let temp = tempdir().unwrap();
//! let dir = temp.path().join(".rulesync/subagents");
//! std::fs::create_dir_all(&dir).unwrap();
//! std::fs::write(dir.join("planner.md"), "---\ndescription: Plans\n---\nPlan.\n").unwrap();
//!
//! let report = load_entities(temp.path(), &EntityKind::ALL).unwrap();
//! assert_eq!(report.entities.len(), 1);
//! assert_eq!(report.entities[0].name(), "planner");
//! ```
//!
//! [`CanonicalEntity`]: rulesync_projection::CanonicalEntity

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error type for discovery operations.
pub type Error = anyhow::Error;
/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Directory scanning and per-file loading.
pub mod scanner;
/// Source layout, load errors and reports.
pub mod types;

pub use scanner::{list_sources, load_entities, load_file};
pub use types::{source_dir, LoadError, LoadFailure, LoadReport, SOURCE_ROOT};
