use anyhow::Context;
use clap::{Parser, Subcommand};
use fpipeline::{
    handle, run_pipeline, source::file::FileSource, Pipeline, PipelineError, Report, Rules,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit status for an error kind this driver does not know about.
const EXIT_UNEXPECTED: i32 = 70;

/// Load, validate and process content sources with typed stage errors.
#[derive(Parser)]
#[command(name = "fpipeline")]
struct Cli {
    /// TOML file overriding the default stage rules.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Directory identifiers are resolved against.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the five demonstration scenarios and the missing-source self-check.
    Demo,
    /// Run one source through the pipeline.
    Run {
        identifier: String,
        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run several sources concurrently, one isolated pipeline each.
    Batch {
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => Rules::from_file(path)?,
        None => Rules::default(),
    };
    let source = match &cli.root {
        Some(root) => FileSource::new().with_root(root),
        None => FileSource::new(),
    };

    match cli.command {
        Command::Demo => run_demo(&rules),
        Command::Run { identifier, json } => {
            let pipeline = Pipeline::from_source(source, rules);
            let report = handle(&pipeline.run(&identifier));
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
            std::process::exit(exit_status(&report));
        }
        Command::Batch { identifiers } => {
            let pipeline = Arc::new(Pipeline::from_source(source, rules));
            let mut worst = 0;
            for (identifier, result) in pipeline.run_batch(identifiers).await {
                let report = handle(&result);
                println!("{}: {}", identifier, report);
                worst = worst.max(exit_status(&report));
            }
            std::process::exit(worst);
        }
    }
}

/// Maps a report to a process exit status. Error kinds added after this
/// driver was written fall through to [`EXIT_UNEXPECTED`].
fn exit_status(report: &Report) -> i32 {
    match report {
        Report::Succeeded { .. } => 0,
        Report::Failed { error, .. } => match error {
            PipelineError::ConfigRead { .. }
            | PipelineError::ConfigParse { .. }
            | PipelineError::Validation { .. }
            | PipelineError::Processing { .. } => report.exit_code(),
            _ => {
                warn!(
                    unexpected_error_kind = error.kind(),
                    "error kind not handled by this driver"
                );
                EXIT_UNEXPECTED
            }
        },
    }
}

fn run_demo(rules: &Rules) -> anyhow::Result<()> {
    // Removed with everything in it when `dir` drops.
    let dir = tempfile::tempdir().context("creating demo directory")?;
    let files = [
        ("valid_config.txt", "valid_data_content"),
        ("malformed_config.txt", "malformed content"),
        ("invalid_data_config.txt", "valid_data\ninvalid_field"),
        ("short_data_config.txt", "short"),
    ];
    for (name, content) in files {
        fs::write(dir.path().join(name), content)
            .with_context(|| format!("writing demo file {}", name))?;
    }

    let source = FileSource::new().with_root(dir.path());
    let scenarios = [
        ("Successful Execution", "valid_config.txt"),
        ("Config Read Error", "non_existent_config.txt"),
        ("Config Parse Error", "malformed_config.txt"),
        ("Validation Error", "invalid_data_config.txt"),
        ("Processing Error", "short_data_config.txt"),
    ];
    for (index, (title, identifier)) in scenarios.iter().enumerate() {
        println!("--- Scenario {}: {} ---", index + 1, title);
        let report = handle(&run_pipeline(&source, identifier, rules));
        println!("{}\n", report);
    }

    println!("--- Self-check ---");
    let identifier = "this_file_should_not_exist.txt";
    match run_pipeline(&source, identifier, rules) {
        Err(PipelineError::ConfigRead { source_identifier }) if source_identifier == identifier => {
            println!("missing source reports ConfigRead for '{}'", identifier);
        }
        other => anyhow::bail!("self-check failed: expected ConfigRead, got {:?}", other),
    }

    Ok(())
}
