//! SQLite run history
//!
//! This module provides a SQLite-based implementation of the RunHistory trait.

use crate::state::{CrawlSnapshot, ErrorEntry};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RunHistory, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, pages_converted, \
     pdfs_found, pdfs_downloaded, duplicates_skipped, errors_count, duration_minutes";

/// SQLite run history backend
pub struct SqliteHistory {
    conn: Connection,
}

impl SqliteHistory {
    /// Opens or creates the history database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Running),
        pages_converted: row.get::<_, i64>(5)? as u64,
        pdfs_found: row.get::<_, i64>(6)? as u64,
        pdfs_downloaded: row.get::<_, i64>(7)? as u64,
        duplicates_skipped: row.get::<_, i64>(8)? as u64,
        errors_count: row.get::<_, i64>(9)? as u64,
        duration_minutes: row.get(10)?,
    })
}

impl RunHistory for SqliteHistory {
    // ===== Run Management =====

    fn start_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn mark_interrupted_runs(&mut self) -> StorageResult<usize> {
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1 WHERE status = ?2",
            params![
                RunStatus::Interrupted.to_db_string(),
                RunStatus::Running.to_db_string()
            ],
        )?;
        Ok(updated)
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        snapshot: &CrawlSnapshot,
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages_converted = ?3,
                 pdfs_found = ?4, pdfs_downloaded = ?5, duplicates_skipped = ?6,
                 errors_count = ?7, duration_minutes = ?8
             WHERE id = ?9",
            params![
                status.to_db_string(),
                snapshot.end_time.to_rfc3339(),
                snapshot.pages_converted as i64,
                snapshot.pdfs_found as i64,
                snapshot.pdfs_downloaded as i64,
                snapshot.duplicates_skipped as i64,
                snapshot.errors_count as i64,
                snapshot.duration_minutes,
                run_id,
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO run_errors (run_id, url, error, recorded_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in &snapshot.errors {
                stmt.execute(params![run_id, entry.url, entry.error, entry.timestamp])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::RunNotFound(run_id),
                other => StorageError::Sqlite(other),
            })
    }

    fn recent_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT ?1", RUN_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let runs = stmt
            .query_map(params![limit as i64], run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    fn run_errors(&self, run_id: i64) -> StorageResult<Vec<ErrorEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, error, recorded_at FROM run_errors WHERE run_id = ?1 ORDER BY id",
        )?;
        let errors = stmt
            .query_map(params![run_id], |row| {
                Ok(ErrorEntry {
                    url: row.get(0)?,
                    error: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CrawlStats;

    fn finished_snapshot() -> CrawlSnapshot {
        let stats = CrawlStats::new(10);
        stats.record_page();
        stats.record_page();
        stats.record_pdf_found();
        stats.record_pdf_download();
        stats.record_duplicate();
        stats.add_error("https://example.com/broken", "HTTP 500");
        stats.add_error("SYSTEM", "renderer crashed");
        stats.snapshot()
    }

    #[test]
    fn test_start_run() {
        let mut history = SqliteHistory::new_in_memory().unwrap();
        let run_id = history.start_run("abc123").unwrap();

        let run = history.get_run(run_id).unwrap();
        assert_eq!(run.config_hash, "abc123");
        assert_eq!(run.status, RunStatus::Running);
        assert!(run.finished_at.is_none());
        assert_eq!(run.pages_converted, 0);
    }

    #[test]
    fn test_finish_run_stores_counters_and_errors() {
        let mut history = SqliteHistory::new_in_memory().unwrap();
        let run_id = history.start_run("abc123").unwrap();
        let snapshot = finished_snapshot();

        history
            .finish_run(run_id, RunStatus::Completed, &snapshot)
            .unwrap();

        let run = history.get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.finished_at.is_some());
        assert_eq!(run.pages_converted, 2);
        assert_eq!(run.pdfs_found, 1);
        assert_eq!(run.pdfs_downloaded, 1);
        assert_eq!(run.duplicates_skipped, 1);
        assert_eq!(run.errors_count, 2);

        let errors = history.run_errors(run_id).unwrap();
        assert_eq!(errors, snapshot.errors);
    }

    #[test]
    fn test_finish_unknown_run() {
        let mut history = SqliteHistory::new_in_memory().unwrap();
        let result = history.finish_run(42, RunStatus::Completed, &finished_snapshot());
        assert!(matches!(result, Err(StorageError::RunNotFound(42))));
    }

    #[test]
    fn test_mark_interrupted_runs() {
        let mut history = SqliteHistory::new_in_memory().unwrap();
        let stale = history.start_run("one").unwrap();
        let done = history.start_run("two").unwrap();
        history
            .finish_run(done, RunStatus::Completed, &finished_snapshot())
            .unwrap();

        assert_eq!(history.mark_interrupted_runs().unwrap(), 1);
        assert_eq!(history.get_run(stale).unwrap().status, RunStatus::Interrupted);
        assert_eq!(history.get_run(done).unwrap().status, RunStatus::Completed);
    }

    #[test]
    fn test_get_unknown_run() {
        let history = SqliteHistory::new_in_memory().unwrap();
        assert!(matches!(
            history.get_run(7),
            Err(StorageError::RunNotFound(7))
        ));
    }

    #[test]
    fn test_recent_runs_newest_first() {
        let mut history = SqliteHistory::new_in_memory().unwrap();
        let first = history.start_run("one").unwrap();
        let second = history.start_run("two").unwrap();
        let third = history.start_run("three").unwrap();

        let runs = history.recent_runs(2).unwrap();
        let ids: Vec<i64> = runs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third, second]);
        assert!(!ids.contains(&first));
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        let run_id = {
            let mut history = SqliteHistory::new(&path).unwrap();
            let run_id = history.start_run("abc").unwrap();
            history
                .finish_run(run_id, RunStatus::Failed, &finished_snapshot())
                .unwrap();
            run_id
        };

        let history = SqliteHistory::new(&path).unwrap();
        let run = history.get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(history.run_errors(run_id).unwrap().len(), 2);
    }
}
