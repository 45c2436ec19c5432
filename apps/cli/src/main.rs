//! Nihongo DoJo CLI - operator surface for the dataset cache and reward scorers
//!
//! This CLI provides a `dojo` command for fetching and inspecting the published
//! task datasets and for scoring batches of model completions offline.

mod commands;
mod config;
mod progress;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{DatasetsCommand, datasets, score};

/// Nihongo DoJo CLI - Japanese grammar datasets and reward scoring
#[derive(Parser, Debug)]
#[command(
    name = "dojo",
    author,
    version,
    about = "Nihongo DoJo - Japanese grammar datasets and reward scoring",
    long_about = "Fetch, inspect and pack the Nihongo DoJo task datasets, and score model completions with the particle reward set."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Dataset cache directory (overrides NIHONGO_DOJO_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Dataset repository base URL (overrides NIHONGO_DOJO_REPO_URL)
    #[arg(long, global = true)]
    repo_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dataset catalog and cache management
    ///
    /// List the published datasets, show their local status, download them
    /// into the cache, or pack a local dataset directory into an archive.
    #[command(subcommand)]
    Datasets(DatasetsCommand),

    /// Score a reward batch file
    ///
    /// Reads a JSON reward batch (`completions`, `answer`, optional `prompts`)
    /// and runs the particle reward set over it.
    Score {
        /// Path to the batch JSON file
        batch: PathBuf,

        /// Also run the exact and approximate format rewards
        #[arg(long)]
        with_format: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let cli_config = config::DojoConfig::discover_and_load();

    // Initialize tracing
    let level = match args.log_level.as_deref().or(cli_config.log_level.as_deref()).unwrap_or("info") {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // If no command provided, show help
    let command = if let Some(cmd) = args.command {
        cmd
    } else {
        Args::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Datasets(cmd) => {
            let hub_config = cli_config.hub_config(args.cache_dir, args.repo_url);
            datasets::execute(cmd, hub_config, cli_config.catalog())?;
        }
        Command::Score { batch, with_format, json } => {
            let scorer = cli_config.particle_scorer()?;
            score::execute(&batch, cli_config.delimiters(), scorer, with_format, json)?;
        }
    }

    Ok(())
}
