//! Moulinette CLI - retrieval submission grader
//!
//! This binary validates a submission of retrieved source spans and scores it
//! with recall@k against a ground-truth dataset.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::Result;
use clap::{Parser, Subcommand};
use moulinette::{run_answers, run_evaluate, run_validate};
use moulinette_core::config::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "moulinette")]
#[command(about = "Recall@k grader for retrieval submissions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and score a search-results submission
    Evaluate {
        /// Submission JSON with `search_results` and `k`
        #[arg(short, long, value_name = "FILE")]
        submission: PathBuf,

        /// Ground-truth dataset JSON with `rag_questions`
        #[arg(short, long, value_name = "FILE")]
        dataset: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a submission against the configured limits without scoring it
    Validate {
        /// Submission JSON with `search_results` and `k`
        #[arg(short, long, value_name = "FILE")]
        submission: PathBuf,
    },
    /// Score the retrieved sources of an answer-bearing submission
    Answers {
        /// Submission JSON whose search results all carry an `answer`
        #[arg(short, long, value_name = "FILE")]
        submission: PathBuf,

        /// Ground-truth dataset JSON with `rag_questions`
        #[arg(short, long, value_name = "FILE")]
        dataset: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    let passed = match cli.command {
        Commands::Evaluate {
            submission,
            dataset,
            json,
        } => run_evaluate(&config, &dataset, &submission, json, &mut stdout)?,
        Commands::Validate { submission } => {
            run_validate(&config, &submission, &mut stdout)?;
            true
        }
        Commands::Answers {
            submission,
            dataset,
        } => run_answers(&config, &dataset, &submission, &mut stdout)?,
    };

    info!("Grading finished: {}", if passed { "passed" } else { "failed" });
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "moulinette={level},moulinette_core={level},moulinette_evaluation={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Load and validate configuration
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path)?;
    config.validate()?;
    debug!("Using configuration: {config:?}");
    Ok(config)
}
