//! Run-wide statistics and page budget
//!
//! `CrawlStats` is the single shared mutable structure of a crawl run. Every
//! counter, the error list, and the content-hash set live behind one mutex;
//! each method is its own critical section.
//!
//! There is no check-and-reserve primitive: callers test `has_reached_limit`
//! and later record their work in a separate call. Under the sequential
//! traversal this never overshoots the budget, but a concurrent caller could
//! pass the check between another caller's check and increment, so the budget
//! is a soft ceiling.

use crate::state::dedup::DedupGuard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Error-list key for failures that are not tied to a single URL
pub const SYSTEM_ERROR_KEY: &str = "SYSTEM";

/// One recorded failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub url: String,
    pub error: String,
    /// RFC 3339 time the failure was recorded
    pub timestamp: String,
}

#[derive(Debug, Default)]
struct StatsInner {
    pages_converted: u64,
    pdfs_found: u64,
    pdfs_downloaded: u64,
    duplicates_skipped: u64,
    errors: Vec<ErrorEntry>,
    hashes: DedupGuard,
}

impl StatsInner {
    fn total_processed(&self) -> u64 {
        self.pages_converted + self.pdfs_downloaded
    }
}

/// Statistics and budget registry for one crawl run
#[derive(Debug)]
pub struct CrawlStats {
    started_at: DateTime<Utc>,
    max_pages: u64,
    inner: Mutex<StatsInner>,
}

impl CrawlStats {
    pub fn new(max_pages: u64) -> Self {
        Self {
            started_at: Utc::now(),
            max_pages,
            inner: Mutex::new(StatsInner::default()),
        }
    }

    /// Records a page rendered to PDF and saved
    pub fn record_page(&self) {
        self.lock().pages_converted += 1;
    }

    /// Records a PDF downloaded and saved
    pub fn record_pdf_download(&self) {
        self.lock().pdfs_downloaded += 1;
    }

    /// Records a PDF resource found during traversal
    pub fn record_pdf_found(&self) {
        self.lock().pdfs_found += 1;
    }

    /// Records an artifact discarded because its content was already saved
    pub fn record_duplicate(&self) {
        self.lock().duplicates_skipped += 1;
    }

    /// Appends a failure to the error list, stamped with the current time
    pub fn add_error(&self, url: &str, message: impl Into<String>) {
        let entry = ErrorEntry {
            url: url.to_string(),
            error: message.into(),
            timestamp: Utc::now().to_rfc3339(),
        };
        self.lock().errors.push(entry);
    }

    /// Converted pages plus downloaded PDFs
    pub fn total_processed(&self) -> u64 {
        self.lock().total_processed()
    }

    /// Returns true once the budget is spent
    pub fn has_reached_limit(&self) -> bool {
        self.lock().total_processed() >= self.max_pages
    }

    /// Returns true if content with this hash was already saved in this run
    pub fn is_duplicate(&self, hash: &str) -> bool {
        self.lock().hashes.is_duplicate(hash)
    }

    /// Records the hash of content about to be saved
    pub fn record_hash(&self, hash: impl Into<String>) {
        self.lock().hashes.record(hash);
    }

    /// Captures the current state for reporting
    pub fn snapshot(&self) -> CrawlSnapshot {
        let end_time = Utc::now();
        let inner = self.lock();
        let duration = end_time - self.started_at;

        CrawlSnapshot {
            start_time: self.started_at,
            end_time,
            duration_minutes: duration.num_milliseconds() as f64 / 60_000.0,
            pages_converted: inner.pages_converted,
            pdfs_found: inner.pdfs_found,
            pdfs_downloaded: inner.pdfs_downloaded,
            duplicates_skipped: inner.duplicates_skipped,
            errors_count: inner.errors.len(),
            errors: inner.errors.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsInner> {
        // Counters stay meaningful even if a holder panicked mid-update
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Immutable summary of a run, handed to report writers and run history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlSnapshot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub pages_converted: u64,
    pub pdfs_found: u64,
    pub pdfs_downloaded: u64,
    pub duplicates_skipped: u64,
    pub errors_count: usize,
    pub errors: Vec<ErrorEntry>,
}

impl CrawlSnapshot {
    /// Converted pages plus downloaded PDFs
    pub fn total_processed(&self) -> u64 {
        self.pages_converted + self.pdfs_downloaded
    }
}
