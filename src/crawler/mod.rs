//! Crawler module for traversal and content acquisition
//!
//! This module contains the core crawling logic, including:
//! - The collaborator interfaces for rendering, downloading and link extraction
//! - HTTP fetching and HTML link extraction
//! - Headless Chromium rendering
//! - The depth-first traversal and the run driver
//! - Periodic re-runs

mod acquirer;
mod coordinator;
mod fetcher;
mod parser;
mod render;
mod scheduler;
mod traits;

pub use acquirer::{AcquireError, Acquired, Acquirer};
pub use coordinator::{Collaborators, Coordinator};
pub use fetcher::{build_http_client, HttpFetcher, USER_AGENT};
pub use parser::{parse_links, HtmlLinkExtractor};
pub use render::{ChromiumRenderer, CHROMIUM_PATH_VAR};
pub use scheduler::Scheduler;
pub use traits::{DirectFetchService, FetchResponse, LinkExtractor, RenderService};

use crate::config::{compute_config_hash, Config};
use crate::output::{write_standard_reports, CrawlReport};
use crate::state::CrawlSnapshot;
use crate::storage::{create_directories, open_history, RunHistory, RunStatus};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of one complete crawl run
#[derive(Debug, Clone)]
pub struct CrawlRun {
    /// ID of the run in the history database
    pub run_id: i64,
    pub snapshot: CrawlSnapshot,
    /// Report files written for the run
    pub reports: Vec<PathBuf>,
}

/// Runs a complete crawl with the production collaborators
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the output directories
/// 2. Record the run in the history database
/// 3. Traverse every seed under the page budget
/// 4. Write the JSON and markdown reports
/// 5. Store the final counters and errors with the run
pub async fn run_crawl(config: &Config) -> Result<CrawlRun> {
    let collaborators = Collaborators::from_config(config)?;
    run_crawl_with(config, collaborators).await
}

/// Runs a complete crawl with the given collaborators
pub async fn run_crawl_with(config: &Config, collaborators: Collaborators) -> Result<CrawlRun> {
    create_directories(&config.output.directories())?;

    let config_hash = compute_config_hash(config);
    let mut history = open_history(&config.output.history_path())?;
    let stale = history.mark_interrupted_runs()?;
    if stale > 0 {
        warn!("Marked {} unfinished run(s) as interrupted", stale);
    }
    let run_id = history.start_run(&config_hash)?;
    info!("Starting crawl run {} (config hash: {})", run_id, config_hash);

    let coordinator = Coordinator::new(Arc::new(config.clone()), collaborators);
    let snapshot = coordinator.run().await;

    let report = CrawlReport {
        run_id: Some(run_id),
        config_hash,
        base_urls: config.base_urls.clone(),
        snapshot: snapshot.clone(),
    };
    let reports = match write_standard_reports(&report, &config.output.reports_dir()) {
        Ok(paths) => paths,
        Err(e) => {
            error!("Failed to write reports: {}", e);
            Vec::new()
        }
    };

    history.finish_run(run_id, RunStatus::Completed, &snapshot)?;

    Ok(CrawlRun {
        run_id,
        snapshot,
        reports,
    })
}
