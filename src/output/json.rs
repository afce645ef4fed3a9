//! JSON report

use crate::output::traits::{CrawlReport, OutputResult, ReportWriter};

/// Pretty-printed JSON of the report
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReport;

impl ReportWriter for JsonReport {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &CrawlReport) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
