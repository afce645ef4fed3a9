//! Storage module for crawl artifacts and run history
//!
//! This module handles everything the crawler writes to disk:
//! - PDF artifacts and their filenames
//! - Output directory creation
//! - SQLite run history

mod filename;
mod filesystem;
mod schema;
mod sqlite;
mod traits;

pub use filename::generate_filename;
pub use filesystem::{create_directories, FsArtifactStore};
pub use sqlite::SqliteHistory;
pub use traits::{ArtifactStore, RunHistory, StorageError, StorageResult};

use std::path::Path;

/// Opens or creates the run history database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_history(path: &Path) -> StorageResult<SqliteHistory> {
    SqliteHistory::new(path)
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub pages_converted: u64,
    pub pdfs_found: u64,
    pub pdfs_downloaded: u64,
    pub duplicates_skipped: u64,
    pub errors_count: u64,
    pub duration_minutes: Option<f64>,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Interrupted,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
