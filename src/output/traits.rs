//! Report writer traits and types
//!
//! This module defines the trait interface for report writers and the
//! data every report is built from.

use crate::state::CrawlSnapshot;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything a report says about one run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Run history ID, when the run was recorded
    pub run_id: Option<i64>,
    pub config_hash: String,
    pub base_urls: Vec<String>,
    #[serde(flatten)]
    pub snapshot: CrawlSnapshot,
}

impl CrawlReport {
    /// Share of processed items that did not end in an error (percent)
    pub fn success_rate(&self) -> f64 {
        let processed = self.snapshot.total_processed();
        let attempts = processed + self.snapshot.errors_count as u64;
        if attempts == 0 {
            return 0.0;
        }
        processed as f64 / attempts as f64 * 100.0
    }
}

/// Trait for report formats
pub trait ReportWriter {
    /// File extension, without the dot
    fn extension(&self) -> &'static str;

    /// Renders the report as text
    fn render(&self, report: &CrawlReport) -> OutputResult<String>;
}
