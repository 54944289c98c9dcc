use crate::cli::{Cli, Commands, GenerateArgs};
use crate::config::GenerateConfig;
use anyhow::{bail, Context, Result};
use clap::Parser;
use rulesync_discovery::{load_entities, LoadFailure, LoadReport};
use rulesync_projection::{
    generate, EntityKind, FsWriter, GenerateParams, GenerateReport, TargetRegistry,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Everything `generate --json` prints.
#[derive(Debug, Serialize)]
struct GenerateOutput<'a> {
    #[serde(flatten)]
    report: &'a GenerateReport,
    load_failures: &'a [LoadFailure],
}

/// The main entry point for the `rulesync` application.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => handle_generate_command(args),
        Commands::Targets => handle_targets_command(),
    }
}

fn handle_generate_command(args: GenerateArgs) -> Result<()> {
    let config = GenerateConfig::resolve(args)?;
    let registry = TargetRegistry::builtin()?;

    let loaded = load_entities(&config.base_dir, &config.kinds).with_context(|| {
        format!(
            "Failed to load sources from {}",
            config.base_dir.display()
        )
    })?;
    tracing::info!(
        rules = loaded.count(EntityKind::Rule),
        subagents = loaded.count(EntityKind::Subagent),
        invalid = loaded.failures.len(),
        "loaded canonical sources"
    );

    let params = GenerateParams {
        targets: config.targets.clone(),
        kinds: config.kinds.clone(),
        dry_run: config.dry_run,
    };
    let writer = FsWriter::new(&config.output_dir);
    let report = generate(&registry, &loaded.entities, &params, &writer)?;

    if config.json {
        let output = GenerateOutput {
            report: &report,
            load_failures: &loaded.failures,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", format_load_failures(&loaded));
        print!("{}", report.format_summary());
    }

    let failures = report.failures.len() + loaded.failures.len();
    if failures > 0 {
        bail!("generation finished with {failures} error(s)");
    }
    Ok(())
}

fn format_load_failures(loaded: &LoadReport) -> String {
    loaded
        .failures
        .iter()
        .map(|f| format!("Skipped {}: {}\n", f.path.display(), f.error))
        .collect()
}

fn handle_targets_command() -> Result<()> {
    let registry = TargetRegistry::builtin()?;
    println!("{:<12} {:<46} SUBAGENTS", "TARGET", "RULES");
    for schema in registry.schemas() {
        println!(
            "{:<12} {:<46} {}",
            schema.id, schema.rule.path_template, schema.subagent.path_template
        );
    }
    Ok(())
}
