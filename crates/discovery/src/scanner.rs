use crate::types::{source_dir, LoadError, LoadFailure, LoadReport};
use crate::Result;
use anyhow::bail;
use rulesync_frontmatter::parse_document;
use rulesync_projection::{CanonicalEntity, EntityKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "md";

fn is_source_file(entry: &walkdir::DirEntry) -> bool {
    let path = entry.path();
    let hidden = entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'));
    !hidden && path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Lists the source files directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty list. Hidden files, subdirectories
/// and files without an `.md` extension are ignored.
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        bail!("Source path is not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if is_source_file(&entry) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Loads one source file as an entity of `kind`.
///
/// The file stem names the entity unless the front matter sets `name`.
pub fn load_file(kind: EntityKind, path: &Path) -> std::result::Result<CanonicalEntity, LoadError> {
    let content = fs::read_to_string(path)?;
    let parsed = parse_document(&content)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let entity = CanonicalEntity::from_front_matter(kind, &stem, parsed.front_matter, parsed.body)?;
    Ok(entity)
}

/// Loads every canonical entity of the requested `kinds` under `base_dir`.
///
/// Files that fail to load are logged and collected in
/// [`LoadReport::failures`]; loading continues with the next file. Only a
/// source path that exists but is not a directory is an error.
pub fn load_entities(base_dir: &Path, kinds: &[EntityKind]) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for &kind in kinds {
        let dir = source_dir(base_dir, kind);
        let files = list_sources(&dir)?;
        debug!(kind = %kind, dir = %dir.display(), files = files.len(), "scanning sources");

        for path in files {
            match load_file(kind, &path) {
                Ok(entity) => {
                    if let Some(previous) = report
                        .entities
                        .iter()
                        .find(|e| e.kind() == kind && e.name() == entity.name())
                    {
                        warn!(
                            kind = %kind,
                            name = previous.name(),
                            path = %path.display(),
                            "duplicate entity name; output paths will collide"
                        );
                    }
                    report.entities.push(entity);
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "skipping invalid source file");
                    report.failures.push(LoadFailure { path, error });
                }
            }
        }
    }

    Ok(report)
}
