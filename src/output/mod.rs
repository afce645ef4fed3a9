//! Output module for crawl reports
//!
//! This module handles:
//! - Rendering a finished run as JSON and markdown reports
//! - Writing reports into the reports directory
//! - Displaying run history

mod history;
mod json;
mod markdown;
mod traits;

pub use history::{format_history, print_history};
pub use json::JsonReport;
pub use markdown::{format_markdown_summary, MarkdownReport};
pub use traits::{CrawlReport, OutputError, OutputResult, ReportWriter};

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes one file per report format into `reports_dir`
///
/// Files are named `crawl_report_<YYYYmmdd_HHMMSS>.<ext>`.
///
/// # Returns
///
/// The paths written, in the order of `writers`
pub fn write_reports(
    report: &CrawlReport,
    reports_dir: &Path,
    at: &DateTime<Local>,
    writers: &[&dyn ReportWriter],
) -> OutputResult<Vec<PathBuf>> {
    let stamp = at.format("%Y%m%d_%H%M%S");
    let mut written = Vec::with_capacity(writers.len());

    for writer in writers {
        let path = reports_dir.join(format!("crawl_report_{}.{}", stamp, writer.extension()));
        std::fs::write(&path, writer.render(report)?)?;
        info!("Report generated: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Writes the JSON and markdown reports
pub fn write_standard_reports(
    report: &CrawlReport,
    reports_dir: &Path,
) -> OutputResult<Vec<PathBuf>> {
    write_reports(
        report,
        reports_dir,
        &Local::now(),
        &[&JsonReport, &MarkdownReport],
    )
}
