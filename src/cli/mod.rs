use anyhow::Context;
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::{hash::AudioHash, item::ItemId};
use crate::pipeline::orchestrator::{Pipeline, PipelineReport};
use crate::storage::tracker::{Tracker, TrackerSet};

pub mod shell;

#[derive(Parser)]
#[command(name = "yt2stems")]
#[command(version = "0.1")]
#[command(about = "Download YouTube audio and split it into stems")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "yt2stems.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prompt for urls interactively (default)
    Shell,
    /// Run the pipeline once for a playlist or video url
    Run { url: String },
    /// Show downloaded items and audio files waiting for separation
    Status,
    /// Forget a downloaded item so the next run fetches it again
    Forget { id: String },
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load_or_default(&cli.config)?;
    cfg.ensure_dirs()?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let pipeline = Pipeline::from_config(&cfg);
            let stdin = std::io::stdin();
            shell::run_shell(&mut stdin.lock(), &mut std::io::stdout(), |url| {
                pipeline.run_pipeline(url)
            })
            .context("Interactive shell failed")?;
        }

        Commands::Run { url } => {
            let pipeline = Pipeline::from_config(&cfg);
            let report = pipeline
                .run_pipeline(&url)
                .with_context(|| format!("Pipeline failed for {url}"))?;
            print_report(&report);
        }

        Commands::Status => print_status(&cfg)?,

        Commands::Forget { id } => {
            let id = ItemId::new(&id).context("Item id must not be empty")?;
            let tracker = Tracker::new(&cfg.paths.tracker_file);
            if tracker.forget(id.as_str())? {
                println!("Forgot {id}, it will be downloaded on the next run");
            } else {
                println!("{id} was not in {}", tracker.path().display());
            }
        }
    }

    Ok(())
}

fn print_report(report: &PipelineReport) {
    let fetch = &report.fetch;
    println!("Pipeline {}", report.state);
    println!(
        "Resolved {} items: {} downloaded, {} already downloaded, {} failed",
        fetch.resolved,
        fetch.fetched.len(),
        fetch.skipped.len(),
        fetch.failed.len()
    );
    for id in &fetch.failed {
        println!("  [DOWNLOAD FAILED]  {id}");
    }

    let separation = &report.separation;
    println!(
        "Separation: {} separated, {} already separated, {} failed",
        separation.separated.len(),
        separation.already_separated.len(),
        separation.failed.len()
    );
    for path in &separation.failed {
        println!("  [SEPARATION FAILED]  {}", path.to_string_lossy());
    }
}

fn modified_local_time(path: &Path) -> Option<DateTime<Local>> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::from(modified))
}

fn print_status(cfg: &Config) -> anyhow::Result<()> {
    let tracker = Tracker::new(&cfg.paths.tracker_file);
    let downloaded = tracker.load();
    match modified_local_time(tracker.path()) {
        Some(time) => println!(
            "Tracker {} was updated {} and contains {} items",
            tracker.path().display(),
            time.format("%Y-%m-%d %H:%M:%S"),
            downloaded.len()
        ),
        None => println!("Tracker {} is empty", tracker.path().display()),
    }

    let ledger = Tracker::new(&cfg.paths.separated_ledger).load();
    let pipeline = Pipeline::from_config(cfg);
    let files = pipeline.scan_downloads()?;
    println!(
        "Download directory contains {} audio files, {} separated files recorded",
        files.len(),
        ledger.len()
    );

    for file in &files {
        println!("  [{}]  {}", separation_label(file, &ledger), file.to_string_lossy());
    }

    Ok(())
}

/// Status of one downloaded file; a file that cannot be hashed does not hide the others
fn separation_label(file: &Path, ledger: &TrackerSet) -> &'static str {
    match AudioHash::from_file(file) {
        Ok(hash) if ledger.contains(&hash.to_hex()) => "SEPARATED",
        Ok(_) => "PENDING",
        Err(e) => {
            log::warn!("Failed to read {}: {e}", file.display());
            "UNREADABLE"
        }
    }
}
