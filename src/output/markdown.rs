//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of crawl results,
//! including counters and the error list.

use crate::output::traits::{CrawlReport, OutputResult, ReportWriter};

/// Markdown summary of the report
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownReport;

impl ReportWriter for MarkdownReport {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, report: &CrawlReport) -> OutputResult<String> {
        Ok(format_markdown_summary(report))
    }
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The crawl report data
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let snapshot = &report.snapshot;
    let mut md = String::new();

    md.push_str("# Folio Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    if let Some(run_id) = report.run_id {
        md.push_str(&format!("- **Run ID**: {}\n", run_id));
    }
    md.push_str(&format!("- **Started**: {}\n", snapshot.start_time.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", snapshot.end_time.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} minutes\n",
        snapshot.duration_minutes
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", report.config_hash));

    if !report.base_urls.is_empty() {
        md.push_str("## Base URLs\n\n");
        for url in &report.base_urls {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages Converted | {} |\n", snapshot.pages_converted));
    md.push_str(&format!("| PDFs Found | {} |\n", snapshot.pdfs_found));
    md.push_str(&format!("| PDFs Downloaded | {} |\n", snapshot.pdfs_downloaded));
    md.push_str(&format!(
        "| Duplicates Skipped | {} |\n",
        snapshot.duplicates_skipped
    ));
    md.push_str(&format!("| Errors | {} |\n\n", snapshot.errors_count));
    md.push_str(&format!(
        "- **Total Processed**: {}\n",
        snapshot.total_processed()
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    if !snapshot.errors.is_empty() {
        md.push_str(&format!("## Errors ({})\n\n", snapshot.errors.len()));
        md.push_str("| Time | URL | Error |\n");
        md.push_str("|------|-----|-------|\n");
        for entry in &snapshot.errors {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.timestamp,
                entry.url,
                escape_cell(&entry.error)
            ));
        }
        md.push('\n');
    }

    md
}

/// Keeps a value on one table row
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}
