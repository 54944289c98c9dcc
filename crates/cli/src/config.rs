//! Configuration for `rulesync generate`.
//!
//! Settings are resolved with the following precedence:
//! CLI arguments > environment variables > `rulesync.toml` > defaults.
//! Clap folds the first two together; this module layers the config file
//! and the defaults underneath.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # <base-dir>/rulesync.toml
//!
//! # Target ids, or "*" for every registered target
//! targets = ["claudecode", "copilot", "opencode"]
//!
//! # Features: "rules", "subagents", or "*"
//! features = ["*"]
//!
//! # Where generated files go, relative to the base dir
//! output_dir = "."
//! ```

use crate::cli::GenerateArgs;
use rulesync_projection::{EntityKind, WILDCARD};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the base directory.
pub const CONFIG_FILE: &str = "rulesync.toml";

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown feature '{0}' (expected rules, subagents or *)")]
    UnknownFeature(String),
}

/// Contents of `rulesync.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub targets: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
}

/// Loads `rulesync.toml` from `base_dir`.
///
/// Returns `Ok(None)` if the file doesn't exist and `Err` if it exists but
/// cannot be read or parsed.
pub fn load_config(base_dir: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let path = base_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(
        target: "rulesync::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Parses feature names into entity kinds.
///
/// The wildcard, or an empty list, selects every kind. Order follows the
/// input, without duplicates.
pub fn parse_features(features: &[String]) -> Result<Vec<EntityKind>, ConfigError> {
    let mut kinds = Vec::new();
    for feature in features.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
        if feature == WILDCARD {
            return Ok(EntityKind::ALL.to_vec());
        }
        let kind = EntityKind::parse_feature(feature)
            .ok_or_else(|| ConfigError::UnknownFeature(feature.to_string()))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return Ok(EntityKind::ALL.to_vec());
    }
    Ok(kinds)
}

/// Fully resolved settings for one generate run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    pub targets: Vec<String>,
    pub kinds: Vec<EntityKind>,
    pub dry_run: bool,
    pub json: bool,
}

impl GenerateConfig {
    /// Layers `rulesync.toml` and defaults under the parsed arguments.
    pub fn resolve(args: GenerateArgs) -> Result<Self, ConfigError> {
        let base_dir = args.base_dir.unwrap_or_else(|| PathBuf::from("."));
        let file = load_config(&base_dir)?.unwrap_or_default();

        let targets = args
            .targets
            .or(file.targets)
            .unwrap_or_else(|| vec![WILDCARD.to_string()]);
        let features = args
            .features
            .or(file.features)
            .unwrap_or_else(|| vec![WILDCARD.to_string()]);
        let kinds = parse_features(&features)?;

        // A relative output_dir from the file is relative to the file's directory.
        let output_dir = match (args.output_dir, file.output_dir) {
            (Some(dir), _) => dir,
            (None, Some(dir)) if dir.is_relative() => base_dir.join(dir),
            (None, Some(dir)) => dir,
            (None, None) => base_dir.clone(),
        };

        Ok(Self {
            base_dir,
            output_dir,
            targets,
            kinds,
            dry_run: args.dry_run,
            json: args.json,
        })
    }
}
