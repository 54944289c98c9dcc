//! Shared test utilities for rulesync crates.
//!
//! Provides a throwaway project directory laid out the way `rulesync`
//! expects (`.rulesync/rules/`, `.rulesync/subagents/`) plus guards for
//! tests that touch process-global state.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(v) => std::env::set_var(self.key, v),
            None => std::env::remove_var(self.key),
        }
    }
}

/// Set (or with `None`, unset) an environment variable until the guard drops.
///
/// ```
/// let _guard = rulesync_test_utils::set_env_var("RULESYNC_TARGETS", Some("copilot"));
/// assert_eq!(std::env::var("RULESYNC_TARGETS").unwrap(), "copilot");
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    match value {
        Some(val) => std::env::set_var(key, val),
        None => std::env::remove_var(key),
    }
    EnvVarGuard { key, previous }
}

/// A temporary project with the canonical source directories created.
///
/// The tempdir is removed when the fixture is dropped.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// `<project>/.rulesync/rules`
    pub rules_dir: PathBuf,
    /// `<project>/.rulesync/subagents`
    pub subagents_dir: PathBuf,
}

impl TestFixture {
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let rules_dir = tempdir.path().join(".rulesync/rules");
        let subagents_dir = tempdir.path().join(".rulesync/subagents");

        std::fs::create_dir_all(&rules_dir)?;
        std::fs::create_dir_all(&subagents_dir)?;

        Ok(Self {
            tempdir,
            rules_dir,
            subagents_dir,
        })
    }

    /// Project root; both the base dir and the default output dir.
    pub fn path(&self) -> &Path {
        self.tempdir.path()
    }

    /// Writes `.rulesync/rules/{name}.md` with the given raw content.
    pub fn create_rule(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.rules_dir.join(format!("{name}.md"));
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Writes `.rulesync/subagents/{name}.md` with the given raw content.
    pub fn create_subagent(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.subagents_dir.join(format!("{name}.md"));
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a subagent targeting every tool, with standard frontmatter.
    pub fn create_subagent_with_frontmatter(
        &self,
        name: &str,
        description: &str,
        body: &str,
    ) -> std::io::Result<PathBuf> {
        let content = format!(
            "---\nname: {}\ntargets: [\"*\"]\ndescription: \"{}\"\n---\n{}",
            name, description, body
        );
        self.create_subagent(name, &content)
    }

    /// Writes `rulesync.toml` at the project root.
    pub fn write_config(&self, content: &str) -> std::io::Result<PathBuf> {
        let path = self.path().join("rulesync.toml");
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Reads a generated file relative to the project root.
    pub fn read_output(&self, relative: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.path().join(relative))
    }
}
