//! Run history display

use crate::storage::RunRecord;

/// Formats recent runs as a fixed-width table
///
/// # Arguments
///
/// * `runs` - Runs to display, in the order given
pub fn format_history(runs: &[RunRecord]) -> String {
    if runs.is_empty() {
        return "No crawl runs recorded.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:>5}  {:<25}  {:<11}  {:>6}  {:>5}  {:>5}  {:>5}  {:>6}  {:>8}\n",
        "Run", "Started", "Status", "Pages", "Found", "PDFs", "Dups", "Errors", "Minutes"
    ));
    for run in runs {
        let minutes = run
            .duration_minutes
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>5}  {:<25}  {:<11}  {:>6}  {:>5}  {:>5}  {:>5}  {:>6}  {:>8}\n",
            run.id,
            run.started_at,
            run.status.to_db_string(),
            run.pages_converted,
            run.pdfs_found,
            run.pdfs_downloaded,
            run.duplicates_skipped,
            run.errors_count,
            minutes
        ));
    }
    out
}

/// Prints recent runs to stdout
pub fn print_history(runs: &[RunRecord]) {
    println!("=== Crawl History ===\n");
    print!("{}", format_history(runs));
}
