//! Output formatters for check reports

mod github;
mod json;
mod text;

pub use github::GithubFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::checker::CheckReport;
use crate::plan_check::{CheckResult, Report};

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire check report
    fn format(&self, report: &CheckReport) -> String;

    /// Format a single result entry of the batch at `source`
    fn format_result(&self, source: &str, result: &CheckResult) -> String;
}

/// Line and column of a review finding, 0 when unknown
fn position(result: &CheckResult) -> (i64, i64) {
    match &result.report {
        Some(Report::SqlReviewReport(r)) => (r.line, r.column),
        _ => (0, 0),
    }
}

/// Check if a result is the OK sentinel emitted when a rule finds nothing
fn is_ok_sentinel(result: &CheckResult) -> bool {
    result.title == "OK"
        && result.code == 0
        && !matches!(result.report, Some(Report::SqlSummaryReport(_)))
}
