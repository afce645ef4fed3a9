//! Content acquisition
//!
//! Dispatches a URL to the direct downloader or the renderer, runs the bytes
//! through content-hash dedup, saves new artifacts, and updates the counters.

use crate::crawler::traits::{DirectFetchService, RenderService};
use crate::state::{content_hash, CrawlStats};
use crate::storage::{generate_filename, ArtifactStore, StorageError};
use crate::url::{classify_url, ContentKind};
use crate::{FetchError, RenderError};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Per-node acquisition failure; recorded against the URL, never fatal
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("Failed to download PDF: {0}")]
    Download(#[source] FetchError),

    #[error("Failed to convert HTML to PDF: {0}")]
    Render(#[source] RenderError),

    #[error("Failed to save artifact: {0}")]
    Store(#[source] StorageError),
}

/// What acquisition produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquired {
    /// New content, written to this path
    Saved(PathBuf),
    /// Content identical to an artifact already saved in this run
    Duplicate,
}

/// Content acquirer for one crawl run
pub struct Acquirer {
    renderer: Arc<dyn RenderService>,
    fetcher: Arc<dyn DirectFetchService>,
    store: Arc<dyn ArtifactStore>,
    timeout: Duration,
}

impl Acquirer {
    pub fn new(
        renderer: Arc<dyn RenderService>,
        fetcher: Arc<dyn DirectFetchService>,
        store: Arc<dyn ArtifactStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            renderer,
            fetcher,
            store,
            timeout,
        }
    }

    /// Acquires the content behind `url`
    ///
    /// Direct PDFs count toward `pdfs_found` and `pdfs_downloaded`, rendered
    /// pages toward `pages_converted`. A duplicate only bumps
    /// `duplicates_skipped`. On error no counter changes.
    pub async fn acquire(&self, url: &str, stats: &CrawlStats) -> Result<Acquired, AcquireError> {
        match classify_url(url) {
            ContentKind::DirectPdf => {
                info!("Downloading PDF: {}", url);
                let bytes = self.download(url).await.map_err(AcquireError::Download)?;
                let outcome = self.persist(url, &bytes, stats).await?;
                if matches!(outcome, Acquired::Saved(_)) {
                    stats.record_pdf_found();
                    stats.record_pdf_download();
                }
                Ok(outcome)
            }
            ContentKind::Page => {
                info!("Converting HTML to PDF: {}", url);
                let bytes = self
                    .renderer
                    .render(url, self.timeout)
                    .await
                    .map_err(AcquireError::Render)?;
                let outcome = self.persist(url, &bytes, stats).await?;
                if matches!(outcome, Acquired::Saved(_)) {
                    stats.record_page();
                }
                Ok(outcome)
            }
        }
    }

    pub async fn shutdown(&self) {
        self.renderer.shutdown().await;
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.fetcher.get(url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }

    async fn persist(
        &self,
        url: &str,
        bytes: &[u8],
        stats: &CrawlStats,
    ) -> Result<Acquired, AcquireError> {
        let hash = content_hash(bytes);
        if stats.is_duplicate(&hash) {
            info!("Duplicate content skipped: {}", url);
            stats.record_duplicate();
            return Ok(Acquired::Duplicate);
        }
        // Recorded before the write; a failed save still claims the hash
        stats.record_hash(hash);

        let filename = generate_filename(url, &Local::now());
        let path = self
            .store
            .save(bytes, &filename)
            .await
            .map_err(AcquireError::Store)?;

        info!("Saved {}", path.display());
        Ok(Acquired::Saved(path))
    }
}
