//! `dojo datasets` subcommands.

use crate::progress::BarProgressSink;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use dojo_datasets::{CacheState, Catalog, DatasetHub, HubConfig, pack_dataset_dir};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub enum DatasetsCommand {
    /// List the dataset catalog with local cache state
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one catalog entry with its local status and metadata
    Info {
        /// Dataset name (e.g. nihongo-dojo-10k)
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download, verify and extract a dataset into the cache
    Fetch {
        /// Dataset name
        name: String,

        /// Download again even if the dataset is already cached
        #[arg(long)]
        force: bool,

        /// Skip sha256 verification of the downloaded archive
        #[arg(long)]
        no_verify: bool,
    },

    /// Pack a dataset directory into a .tar.gz and print its sha256
    Pack {
        /// Dataset directory (its name becomes the archive root)
        dir: PathBuf,

        /// Output archive path (defaults to ./<dir name>.tar.gz)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn execute(command: DatasetsCommand, config: HubConfig, catalog: Catalog) -> Result<()> {
    match command {
        DatasetsCommand::List { json } => list(&hub(config, catalog)?, json),
        DatasetsCommand::Info { name, json } => info(&hub(config, catalog)?, &name, json),
        DatasetsCommand::Fetch { name, force, no_verify } => fetch(hub(config, catalog)?, &name, force, !no_verify),
        DatasetsCommand::Pack { dir, output } => pack(&dir, output),
    }
}

fn hub(config: HubConfig, catalog: Catalog) -> Result<DatasetHub> {
    DatasetHub::with_catalog(config, catalog).context("Failed to initialize dataset hub")
}

fn list(hub: &DatasetHub, json_output: bool) -> Result<()> {
    let datasets = hub.list_available();

    if json_output {
        let out: Vec<_> = datasets
            .iter()
            .map(|d| {
                let state = hub.cache_state(&d.name).unwrap_or(CacheState::Absent);
                json!({
                    "name": d.name,
                    "task_count": d.task_count,
                    "size_class": d.size_class,
                    "compressed_size": d.compressed_size,
                    "description": d.description,
                    "state": state,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{}", format!("Datasets ({})", datasets.len()).bold().cyan());
    println!("  {}", format!("cache: {}", hub.cache_dir().display()).dimmed());
    println!();
    println!("{:<24} {:>9} {:<12} {:<8} {}", "Name", "Tasks", "Size class", "Size", "State");
    println!("{}", "─".repeat(70));
    for d in datasets {
        let state = match hub.cache_state(&d.name).unwrap_or(CacheState::Absent) {
            CacheState::Ready => "ready".green(),
            CacheState::Downloaded => "downloaded".yellow(),
            CacheState::Absent => "-".dimmed(),
        };
        println!(
            "{:<24} {:>9} {:<12} {:<8} {}",
            d.name.cyan(),
            d.task_count,
            d.size_class.to_string(),
            d.compressed_size,
            state
        );
    }
    println!();
    Ok(())
}

fn info(hub: &DatasetHub, name: &str, json_output: bool) -> Result<()> {
    let status = hub.describe(name)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let d = &status.descriptor;
    println!();
    println!("{}", d.name.bold().cyan());
    println!("  {}", d.description);
    println!();
    println!("  Tasks:       {}", d.task_count);
    println!("  Size class:  {}", d.size_class);
    println!("  Archive:     {} ({})", hub.archive_url(d), d.compressed_size);
    println!("  Checksum:    {}", d.checksum.dimmed());
    match status.local_path {
        Some(ref path) => println!("  Local:       {}", path.display().to_string().green()),
        None => println!("  Local:       {}", "not downloaded".dimmed()),
    }
    if let Some(ref metadata) = status.metadata {
        println!();
        println!("  {}", "Metadata".bold());
        println!("{}", indent(&serde_json::to_string_pretty(metadata)?, 4));
    }
    println!();
    Ok(())
}

fn fetch(hub: DatasetHub, name: &str, force: bool, verify: bool) -> Result<()> {
    let hub = hub.with_progress(Arc::new(BarProgressSink::new()));
    let dir = hub.resolve(name, force, verify).with_context(|| format!("Failed to fetch dataset {name}"))?;

    println!("{} {} {}", "✓".green(), name.cyan(), dir.display());
    Ok(())
}

fn pack(dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = match output {
        Some(path) => path,
        None => {
            let name = dir
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("Cannot derive archive name from {}", dir.display()))?;
            PathBuf::from(format!("{name}.tar.gz"))
        }
    };

    let checksum =
        pack_dataset_dir(dir, &output).with_context(|| format!("Failed to pack {}", dir.display()))?;

    println!("{} {}", "✓".green(), output.display());
    println!("sha256 {checksum}");
    Ok(())
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines().map(|line| format!("{pad}{line}")).collect::<Vec<_>>().join("\n")
}
