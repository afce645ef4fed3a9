//! Crawler coordinator - traversal orchestration
//!
//! This module contains the depth-first traversal that drives a crawl run:
//! - Visiting each seed in order under one shared page budget
//! - Acquiring each page's content and recording failures
//! - Screening extracted links and descending into them one at a time
//!
//! The traversal keeps an explicit stack instead of recursing. Children are
//! pushed in reverse so they pop in document order, and each child's whole
//! subtree is finished before its next sibling is considered, exactly as a
//! recursive walk would do it.

use crate::config::Config;
use crate::crawler::acquirer::{Acquired, Acquirer};
use crate::crawler::fetcher::{build_http_client, HttpFetcher};
use crate::crawler::parser::HtmlLinkExtractor;
use crate::crawler::render::ChromiumRenderer;
use crate::crawler::traits::{DirectFetchService, LinkExtractor, RenderService};
use crate::state::{CrawlSnapshot, CrawlStats, NodeState, VisitedRegistry, SYSTEM_ERROR_KEY};
use crate::storage::{ArtifactStore, FsArtifactStore};
use crate::url::{extract_origin, is_eligible, normalize_url};
use crate::{FolioError, Result};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// The external services a crawl run talks to
#[derive(Clone)]
pub struct Collaborators {
    pub renderer: Arc<dyn RenderService>,
    pub fetcher: Arc<dyn DirectFetchService>,
    pub extractor: Arc<dyn LinkExtractor>,
    pub store: Arc<dyn ArtifactStore>,
}

impl Collaborators {
    /// Builds the production collaborators: one shared HTTP client for
    /// downloads and link extraction, headless Chromium for rendering, and
    /// the `pdfs/` directory for artifacts
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.crawler)?;

        Ok(Self {
            renderer: Arc::new(ChromiumRenderer::from_env()),
            fetcher: Arc::new(HttpFetcher::new(client.clone())),
            extractor: Arc::new(HtmlLinkExtractor::new(client)),
            store: Arc::new(FsArtifactStore::new(config.output.pdfs_dir())),
        })
    }
}

/// One pending visit on the traversal stack
#[derive(Debug)]
struct Frame {
    url: String,
    depth: u32,
    /// Reached through a link rather than being the seed itself
    via_link: bool,
}

fn advance(state: &mut NodeState, next: NodeState) {
    debug_assert!(
        state.can_transition_to(next),
        "invalid node transition {} -> {}",
        state,
        next
    );
    *state = next;
}

/// Main crawler coordinator structure
///
/// A coordinator drives exactly one run; its statistics start empty and
/// are shared by every seed.
pub struct Coordinator {
    config: Arc<Config>,
    acquirer: Acquirer,
    extractor: Arc<dyn LinkExtractor>,
    stats: Arc<CrawlStats>,
}

impl Coordinator {
    pub fn new(config: Arc<Config>, collaborators: Collaborators) -> Self {
        let acquirer = Acquirer::new(
            collaborators.renderer,
            collaborators.fetcher,
            collaborators.store,
            config.crawler.request_timeout(),
        );
        let stats = Arc::new(CrawlStats::new(config.crawler.max_pages));

        Self {
            config,
            acquirer,
            extractor: collaborators.extractor,
            stats,
        }
    }

    pub fn stats(&self) -> Arc<CrawlStats> {
        Arc::clone(&self.stats)
    }

    /// Crawls every seed in order and returns the final snapshot
    ///
    /// A seed that fails as a whole is recorded under `SYSTEM` and the
    /// remaining seeds still run. The renderer is shut down before
    /// returning, on every path.
    pub async fn run(&self) -> CrawlSnapshot {
        info!("Starting crawl process...");

        for seed in &self.config.base_urls {
            if self.stats.has_reached_limit() {
                info!("Page limit reached before processing base URL");
                break;
            }

            info!("Processing base URL: {}", seed);
            if let Err(e) = self.crawl_seed(seed).await {
                error!("Critical error during crawl of {}: {}", seed, e);
                self.stats.add_error(SYSTEM_ERROR_KEY, e.to_string());
            }
        }

        self.acquirer.shutdown().await;

        let snapshot = self.stats.snapshot();
        info!(
            "Crawl process completed: {} pages converted, {} PDFs downloaded, {} duplicates, {} errors",
            snapshot.pages_converted,
            snapshot.pdfs_downloaded,
            snapshot.duplicates_skipped,
            snapshot.errors_count
        );
        snapshot
    }

    /// Traverses one seed's site depth-first with a fresh visited set
    pub async fn crawl_seed(&self, seed: &str) -> Result<()> {
        let origin =
            extract_origin(seed).ok_or_else(|| FolioError::InvalidUrl(seed.to_string()))?;
        let start = normalize_url(seed).ok_or_else(|| FolioError::InvalidUrl(seed.to_string()))?;

        let mut visited = VisitedRegistry::new();
        let mut stack = vec![Frame {
            url: start,
            depth: 0,
            via_link: false,
        }];

        while let Some(frame) = stack.pop() {
            if frame.via_link {
                if self.stats.has_reached_limit() {
                    info!("MAX_PAGES limit reached, stopping link processing");
                    break;
                }
                // Reached through another branch since it was scheduled
                if visited.contains(&frame.url) {
                    continue;
                }
                tokio::time::sleep(self.config.crawler.delay()).await;
            }

            let (state, children) = self.visit(&frame, &origin, &mut visited).await;
            trace!("{} (depth {}) -> {}", frame.url, frame.depth, state);

            let depth = frame.depth + 1;
            stack.extend(children.into_iter().rev().map(|url| Frame {
                url,
                depth,
                via_link: true,
            }));
        }

        debug!("Finished seed {} ({} URLs visited)", seed, visited.len());
        Ok(())
    }

    /// Processes one node and returns its outcome plus the links to descend into
    async fn visit(
        &self,
        frame: &Frame,
        origin: &str,
        visited: &mut VisitedRegistry,
    ) -> (NodeState, Vec<String>) {
        let url = frame.url.as_str();
        let max_depth = self.config.crawler.max_depth;
        let mut state = NodeState::Pending;

        if frame.depth > max_depth {
            advance(&mut state, NodeState::FilteredOut);
            return (state, Vec::new());
        }
        if visited.contains(url) {
            advance(&mut state, NodeState::VisitedDuplicate);
            return (state, Vec::new());
        }
        if self.stats.has_reached_limit() {
            advance(&mut state, NodeState::BudgetExceeded);
            return (state, Vec::new());
        }

        visited.insert(url);
        info!("Crawling (depth {}): {}", frame.depth, url);
        advance(&mut state, NodeState::Processing);

        if self.stats.has_reached_limit() {
            info!("Page limit reached, skipping URL");
            advance(&mut state, NodeState::BudgetExceeded);
            return (state, Vec::new());
        }

        match self.acquirer.acquire(url, &self.stats).await {
            Ok(Acquired::Saved(_)) | Ok(Acquired::Duplicate) => {}
            Err(e) => {
                error!("{} - URL: {}", e, url);
                self.stats.add_error(url, e.to_string());
                advance(&mut state, NodeState::Failed);
                return (state, Vec::new());
            }
        }

        if self.stats.has_reached_limit() {
            info!("Page limit reached after processing URL");
            advance(&mut state, NodeState::Succeeded);
            return (state, Vec::new());
        }
        if frame.depth >= max_depth {
            advance(&mut state, NodeState::Succeeded);
            return (state, Vec::new());
        }

        advance(&mut state, NodeState::Recursing);
        let links = match self.extractor.extract(url).await {
            Ok(links) => links,
            Err(e) => {
                warn!("Failed to extract links from {}: {}", url, e);
                Vec::new()
            }
        };
        info!("Found {} links on {}", links.len(), url);

        let children: Vec<String> = links
            .iter()
            .filter(|link| {
                is_eligible(
                    link,
                    origin,
                    &self.config.excluded_keywords,
                    &self.config.allowed_extensions,
                )
            })
            .filter_map(|link| normalize_url(link))
            .collect();
        debug!("{} of {} links eligible on {}", children.len(), links.len(), url);

        advance(&mut state, NodeState::Done);
        (state, children)
    }
}
