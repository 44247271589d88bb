//! GitHub Actions output formatter
//!
//! Outputs findings in GitHub Actions workflow command format:
//! ::warning file={name},line={line},col={col}::{message}

use super::{is_ok_sentinel, position, OutputFormatter};
use crate::checker::CheckReport;
use crate::plan_check::{CheckResult, Report, ResultStatus};

/// Formatter for GitHub Actions annotations
pub struct GithubFormatter {
    /// Whether to include summary
    pub show_summary: bool,
}

impl GithubFormatter {
    pub fn new() -> Self {
        Self { show_summary: true }
    }

    /// Disable summary output
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }
}

impl Default for GithubFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl OutputFormatter for GithubFormatter {
    fn format(&self, report: &CheckReport) -> String {
        let mut output = String::new();

        for batch in &report.batches {
            if !batch.result.error.is_empty() {
                output.push_str(&format!(
                    "::error file={}::{}\n",
                    batch.source,
                    escape(&batch.result.error)
                ));
            }
            for result in &batch.result.results {
                let is_summary = matches!(result.report, Some(Report::SqlSummaryReport(_)));
                if is_ok_sentinel(result) || is_summary {
                    continue;
                }
                output.push_str(&self.format_result(&batch.source, result));
                output.push('\n');
            }
        }

        if self.show_summary && !report.is_clean() {
            output.push_str(&format!(
                "::notice::SQL review complete: {} error(s), {} warning(s), {} failed rule(s) in {} batch(es)\n",
                report.error_count,
                report.warning_count,
                report.rule_failures,
                report.batches_processed
            ));

            output.push_str("::group::SQL Review Summary\n");
            output.push_str(&format!("Batches checked: {}\n", report.batches_processed));
            output.push_str(&format!("Errors: {}\n", report.error_count));
            output.push_str(&format!("Warnings: {}\n", report.warning_count));
            output.push_str(&format!("Failed rules: {}\n", report.rule_failures));
            output.push_str("::endgroup::\n");
        }

        output
    }

    fn format_result(&self, source: &str, result: &CheckResult) -> String {
        let level = match result.status {
            ResultStatus::Error => "error",
            ResultStatus::Warning => "warning",
            _ => "notice",
        };
        let (line, column) = position(result);

        // GitHub requires line and col >= 1
        format!(
            "::{} file={},line={},col={},title={}::{}",
            level,
            source,
            line.max(1),
            column.max(1),
            result.title,
            escape(&result.content)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{Advice, Code, Status};
    use crate::checker::BatchReport;
    use crate::plan_check::{project, PlanCheckRunResult};
    use crate::rule::Engine;

    fn result(status: Status, content: &str) -> CheckResult {
        project(
            &Advice::new(status, Code::TableNoPK, "table.require-pk", content).at_line(10),
        )
    }

    #[test]
    fn test_format_error() {
        let output = GithubFormatter::new().format_result(
            "changes/001.json",
            &result(Status::Error, "Table T requires PRIMARY KEY"),
        );
        assert_eq!(
            output,
            "::error file=changes/001.json,line=10,col=1,title=table.require-pk::Table T requires PRIMARY KEY"
        );
    }

    #[test]
    fn test_format_warning_and_info() {
        let formatter = GithubFormatter::new();
        assert!(formatter
            .format_result("a.json", &result(Status::Warning, "w"))
            .starts_with("::warning"));
        assert!(formatter
            .format_result("a.json", &result(Status::Success, "i"))
            .starts_with("::notice"));
    }

    #[test]
    fn test_escape_newlines() {
        let output = GithubFormatter::new()
            .format_result("a.json", &result(Status::Error, "Line1\nLine2"));
        assert!(output.contains("%0A"));
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_format_report() {
        let report = CheckReport {
            batches: vec![BatchReport {
                source: "a.json".to_string(),
                engine: Some(Engine::Snowflake),
                result: PlanCheckRunResult {
                    results: vec![
                        result(Status::Error, "Table T requires PRIMARY KEY"),
                        project(&Advice::ok()),
                    ],
                    error: String::new(),
                },
            }],
            batches_processed: 1,
            error_count: 1,
            success_count: 1,
            ..Default::default()
        };

        let output = GithubFormatter::new().format(&report);
        assert_eq!(output.matches("::error").count(), 1);
        assert!(!output.contains("title=OK"));
        assert!(output.contains("::group::"));
        assert!(output.contains("::endgroup::"));

        let output = GithubFormatter::new().without_summary().format(&report);
        assert_eq!(output.matches("::error").count(), 1);
        assert!(!output.contains("::notice::"));
        assert!(!output.contains("::group::"));
    }
}
