//! Persistence of target documents.

use crate::engine::TargetDocument;
use crate::Result;
use anyhow::Context;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// What a write did on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file already held exactly the rendered bytes.
    Unchanged,
}

/// Sink for rendered target documents.
///
/// Implementations overwrite idempotently and create parent directories.
#[cfg_attr(test, automock)]
pub trait Writer: Send + Sync {
    fn write(&self, path: &Path, document: &TargetDocument) -> Result<WriteOutcome>;
}

/// Writes documents below an output root directory.
#[derive(Debug, Clone)]
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Writer for FsWriter {
    fn write(&self, path: &Path, document: &TargetDocument) -> Result<WriteOutcome> {
        let rendered = document.render().with_context(|| {
            format!(
                "Failed to render {} '{}' for {}",
                document.kind(),
                document.name(),
                document.target()
            )
        })?;
        let full = self.root.join(path);

        if full.exists() {
            let existing = fs::read(&full)
                .with_context(|| format!("Failed to read existing file: {}", full.display()))?;
            if hash_content(&existing) == hash_content(rendered.as_bytes()) {
                tracing::debug!(path = %full.display(), "output unchanged");
                return Ok(WriteOutcome::Unchanged);
            }
        }

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&full, rendered.as_bytes())
            .with_context(|| format!("Failed to write: {}", full.display()))?;
        tracing::debug!(path = %full.display(), target_id = document.target(), "wrote document");
        Ok(WriteOutcome::Written)
    }
}

/// Computes a SHA-256 hash of the given content, returning a lowercase hex string.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
