use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for the `rulesync` application.
#[derive(Debug, Parser)]
#[command(
    name = "rulesync",
    version,
    about = "Generate rules and subagents for every AI coding tool from one source"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `rulesync` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Projects `.rulesync/` sources into each target's native files.
    Generate(GenerateArgs),
    /// Lists registered targets and where they write.
    Targets,
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Targets to generate for, comma separated; `*` means all.
    #[arg(
        long,
        short = 't',
        env = "RULESYNC_TARGETS",
        value_delimiter = ',',
        value_name = "IDS"
    )]
    pub targets: Option<Vec<String>>,
    /// Features to generate (`rules`, `subagents`), comma separated; `*` means all.
    #[arg(
        long,
        short = 'f',
        env = "RULESYNC_FEATURES",
        value_delimiter = ',',
        value_name = "FEATURES"
    )]
    pub features: Option<Vec<String>>,
    /// Project directory holding `.rulesync/` and `rulesync.toml`.
    #[arg(long, env = "RULESYNC_BASE_DIR", value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
    /// Directory generated files are written under (default: the base dir).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Preview what would be written without touching the filesystem.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Print the report as JSON instead of a summary.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
