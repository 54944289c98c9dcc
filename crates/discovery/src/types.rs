use rulesync_frontmatter::FrontmatterError;
use rulesync_projection::{CanonicalEntity, EntityError, EntityKind};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory, relative to the base dir, holding all canonical sources.
pub const SOURCE_ROOT: &str = ".rulesync";

/// Returns the source directory for `kind` under `base_dir`.
///
/// ```
/// use rulesync_discovery::source_dir;
/// use rulesync_projection::EntityKind;
/// use std::path::Path;
///
/// assert_eq!(
///     source_dir(Path::new("proj"), EntityKind::Subagent),
///     Path::new("proj/.rulesync/subagents")
/// );
/// ```
pub fn source_dir(base_dir: &Path, kind: EntityKind) -> PathBuf {
    base_dir.join(SOURCE_ROOT).join(kind.feature())
}

/// Why a single source file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    /// The front matter block is malformed.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    /// The front matter parsed but does not describe a valid entity.
    #[error(transparent)]
    Entity(#[from] EntityError),
}

/// A source file that was skipped.
#[derive(Debug, Serialize)]
pub struct LoadFailure {
    /// Path of the offending file.
    pub path: PathBuf,
    /// What went wrong.
    #[serde(serialize_with = "display")]
    pub error: LoadError,
}

fn display<S: serde::Serializer>(error: &LoadError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of loading a source tree.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Entities in load order: kinds in the requested order, files sorted by name.
    pub entities: Vec<CanonicalEntity>,
    /// Files that were skipped, with the reason.
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Returns true when every file loaded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of loaded entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }
}
