//! Folio main entry point
//!
//! This is the command-line interface for the Folio website archiver.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use folio::config::{compute_config_hash, load_config, Config};
use folio::crawler::{run_crawl, Scheduler};
use folio::output::print_history;
use folio::storage::{create_directories, open_history, RunHistory};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Folio: a bounded website-to-PDF archiver
///
/// Folio crawls the configured websites depth-first, saves every page as a
/// PDF (downloading PDF documents directly), skips content it has already
/// saved in the run, and stops once the page budget is spent.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Website crawler and PDF archiver", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one crawl (default)
    Crawl,

    /// Crawl now and then repeatedly on an interval until Ctrl-C
    Schedule {
        /// Interval between runs in hours (defaults to SCHEDULE_HOURS)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        hours: Option<u64>,
    },

    /// Show recent runs from the history database
    History {
        /// Number of runs to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Validate the configuration and print it without crawling
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Crawl) {
        Command::Crawl => {
            setup_logging(cli.verbose, cli.quiet, Some(&config))?;
            handle_crawl(&config).await
        }
        Command::Schedule { hours } => {
            setup_logging(cli.verbose, cli.quiet, Some(&config))?;
            handle_schedule(&config, hours.unwrap_or(config.schedule_hours)).await
        }
        Command::History { limit } => {
            setup_logging(cli.verbose, cli.quiet, None)?;
            handle_history(&config, limit)
        }
        Command::Check => {
            setup_logging(cli.verbose, cli.quiet, None)?;
            handle_check(&config);
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// With a config, log lines also go to `logs/crawler_<timestamp>.log` under
/// the output directory.
fn setup_logging(verbose: u8, quiet: bool, config: Option<&Config>) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("folio=info,warn"),
            1 => EnvFilter::new("folio=debug,info"),
            2 => EnvFilter::new("folio=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match config {
        Some(config) => {
            let path = open_log_file(&config.output.logs_dir())?;
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

fn open_log_file(logs_dir: &Path) -> Result<PathBuf> {
    create_directories(&[logs_dir])
        .with_context(|| format!("Failed to create {}", logs_dir.display()))?;
    Ok(logs_dir.join(format!(
        "crawler_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    )))
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<()> {
    tracing::info!(
        "Base URLs: {}, max depth: {}, max pages: {}",
        config.base_urls.len(),
        config.crawler.max_depth,
        config.crawler.max_pages
    );

    let run = run_crawl(config).await.context("Crawl failed")?;
    let snapshot = &run.snapshot;

    println!("\n=== Crawl Complete (run {}) ===", run.run_id);
    println!("  Pages converted:    {}", snapshot.pages_converted);
    println!("  PDFs found:         {}", snapshot.pdfs_found);
    println!("  PDFs downloaded:    {}", snapshot.pdfs_downloaded);
    println!("  Duplicates skipped: {}", snapshot.duplicates_skipped);
    println!("  Errors:             {}", snapshot.errors_count);
    println!("  Duration:           {:.2} minutes", snapshot.duration_minutes);
    for path in &run.reports {
        println!("  Report: {}", path.display());
    }

    Ok(())
}

/// Handles the schedule mode: crawls now and every `hours` until Ctrl-C
async fn handle_schedule(config: &Config, hours: u64) -> Result<()> {
    let scheduler = Scheduler::every_hours(hours);
    tracing::info!("Press Ctrl+C to exit");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let runs = scheduler.run(|| run_crawl(config), shutdown).await;
    tracing::info!("Scheduler finished after {} run(s)", runs);
    Ok(())
}

/// Handles the history mode: shows recent runs from the database
fn handle_history(config: &Config, limit: usize) -> Result<()> {
    let path = config.output.history_path();
    if !path.exists() {
        println!("No history database at {}", path.display());
        return Ok(());
    }

    let history = open_history(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let runs = history.recent_runs(limit)?;
    print_history(&runs);

    if let Some(latest) = runs.first() {
        let errors = history.run_errors(latest.id)?;
        if !errors.is_empty() {
            println!("\nErrors in run {}:", latest.id);
            for entry in errors {
                println!("  [{}] {}: {}", entry.timestamp, entry.url, entry.error);
            }
        }
    }

    Ok(())
}

/// Handles the check mode: shows the effective configuration
fn handle_check(config: &Config) {
    println!("=== Folio Configuration ===\n");

    println!("Base URLs ({}):", config.base_urls.len());
    for url in &config.base_urls {
        println!("  - {}", url);
    }

    println!("\nCrawler:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Delay between requests: {}s",
        config.crawler.delay_between_requests
    );
    println!("  Timeout: {}s", config.crawler.timeout);
    println!("  Max concurrent connections: {}", config.crawler.max_concurrent);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir.display());
    println!("  PDFs: {}", config.output.pdfs_dir().display());
    println!("  Reports: {}", config.output.reports_dir().display());
    println!("  Logs: {}", config.output.logs_dir().display());
    println!("  History: {}", config.output.history_path().display());

    println!("\nSchedule: every {} hours", config.schedule_hours);
    println!("Excluded keywords: {}", config.excluded_keywords.join(", "));
    println!(
        "Allowed extensions: {}",
        config
            .allowed_extensions
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );

    println!("\n✓ Configuration is valid (hash: {})", compute_config_hash(config));
}
