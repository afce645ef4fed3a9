//! Storage traits and error types
//!
//! This module defines the interfaces for persisting artifacts and run
//! history, and their shared error type.

use crate::state::{CrawlSnapshot, ErrorEntry};
use crate::storage::{RunRecord, RunStatus};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for saved PDF artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Writes `bytes` under `filename` and returns where they landed
    async fn save(&self, bytes: &[u8], filename: &str) -> StorageResult<PathBuf>;
}

/// Persistent record of past crawl runs
pub trait RunHistory {
    // ===== Run Management =====

    /// Records the start of a run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the effective configuration
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn start_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Marks runs still recorded as running as interrupted
    ///
    /// # Returns
    ///
    /// The number of runs updated
    fn mark_interrupted_runs(&mut self) -> StorageResult<usize>;

    /// Stores the final snapshot of a run, including its error list
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        snapshot: &CrawlSnapshot,
    ) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent runs, newest first
    fn recent_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>>;

    /// Gets the errors recorded for a run, in the order they occurred
    fn run_errors(&self, run_id: i64) -> StorageResult<Vec<ErrorEntry>>;
}
