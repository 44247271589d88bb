//! Human-readable text output formatter

use super::{is_ok_sentinel, position, OutputFormatter};
use crate::checker::CheckReport;
use crate::plan_check::{CheckResult, Report, ResultStatus};
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show OK entries for rules that found nothing
    pub show_ok: bool,

    /// Show statement summaries
    pub show_summaries: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_ok: false,
            show_summaries: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Hide statement summary entries
    pub fn without_summaries(mut self) -> Self {
        self.show_summaries = false;
        self
    }

    /// Also list OK entries
    pub fn verbose(mut self) -> Self {
        self.show_ok = true;
        self
    }

    fn status_str(&self, result: &CheckResult) -> ColoredString {
        let s = match result.status {
            ResultStatus::Error => "error",
            ResultStatus::Warning => "warning",
            ResultStatus::Success if is_ok_sentinel(result) => "ok",
            ResultStatus::Success | ResultStatus::StatusUnspecified => "info",
        };
        if !self.colored {
            return s.normal();
        }
        match result.status {
            ResultStatus::Error => s.red().bold(),
            ResultStatus::Warning => s.yellow().bold(),
            _ => s.blue(),
        }
    }

    fn paint(&self, s: String, f: fn(ColoredString) -> ColoredString) -> String {
        if self.colored {
            f(s.normal()).to_string()
        } else {
            s
        }
    }

    fn count(
        &self,
        n: usize,
        singular: &str,
        plural: &str,
        f: fn(ColoredString) -> ColoredString,
    ) -> String {
        let s = format!("{} {}", n, if n == 1 { singular } else { plural });
        self.paint(s, f)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &CheckReport) -> String {
        let mut output = String::new();

        for batch in &report.batches {
            let mut lines = Vec::new();

            if !batch.result.error.is_empty() {
                lines.push(format!(
                    "{}: {}: {}\n",
                    batch.source,
                    self.paint("error".to_string(), |s| s.red().bold()),
                    batch.result.error
                ));
            }

            for result in &batch.result.results {
                if is_ok_sentinel(result) && !self.show_ok {
                    continue;
                }
                let is_summary = matches!(result.report, Some(Report::SqlSummaryReport(_)));
                if is_summary && !self.show_summaries {
                    continue;
                }
                lines.push(self.format_result(&batch.source, result));
            }

            if lines.is_empty() {
                continue;
            }

            let header = match batch.engine {
                Some(engine) => format!("{} ({})", batch.source, engine),
                None => batch.source.clone(),
            };
            output.push_str(&self.paint(header, |s| s.underline()));
            output.push('\n');
            for line in lines {
                output.push_str(&line);
            }
            output.push('\n');
        }

        if self.show_stats {
            output.push_str(&format!(
                "\n{} checked",
                self.count(report.batches_processed, "batch", "batches", |s| s)
            ));

            let mut counts = Vec::new();
            if report.error_count > 0 {
                counts.push(self.count(report.error_count, "error", "errors", |s| s.red()));
            }
            if report.warning_count > 0 {
                counts.push(self.count(
                    report.warning_count,
                    "warning",
                    "warnings",
                    |s| s.yellow(),
                ));
            }
            if report.rule_failures > 0 {
                counts.push(self.count(
                    report.rule_failures,
                    "failed rule",
                    "failed rules",
                    |s| s.red(),
                ));
            }
            if report.batches_failed > 0 {
                counts.push(self.count(
                    report.batches_failed,
                    "unreadable batch",
                    "unreadable batches",
                    |s| s.red(),
                ));
            }

            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                report.duration.as_secs_f64()
            ));
        }

        output
    }

    fn format_result(&self, source: &str, result: &CheckResult) -> String {
        let title = self.paint(result.title.clone(), |s| s.cyan());

        match &result.report {
            Some(Report::SqlSummaryReport(summary)) => {
                let mut output = format!("{}: {}[{}]: ", source, self.status_str(result), title);
                output.push_str(&format!(
                    "statement types: {}",
                    if summary.statement_types.is_empty() {
                        "none".to_string()
                    } else {
                        summary.statement_types.join(", ")
                    }
                ));
                output.push_str(&format!(", affected rows: {}", summary.affected_rows));
                output.push_str(&format!(
                    ", changed tables: {}\n",
                    summary.changed_resources.table_count()
                ));
                for db in &summary.changed_resources.databases {
                    for schema in &db.schemas {
                        for table in &schema.tables {
                            let mut parts: Vec<&str> = Vec::new();
                            if !db.name.is_empty() {
                                parts.push(&db.name);
                            }
                            parts.push(&schema.name);
                            parts.push(&table.name);
                            output.push_str(&format!("   = table: {}\n", parts.join(".")));
                        }
                    }
                }
                output
            }
            _ => {
                let (line, column) = position(result);
                let location = match (line, column) {
                    (0, _) => source.to_string(),
                    (line, 0) => format!("{}:{}", source, line),
                    (line, column) => format!("{}:{}:{}", source, line, column),
                };
                let mut output = format!("{}: {}[{}]", location, self.status_str(result), title);
                if !result.content.is_empty() {
                    output.push_str(&format!(": {}", result.content));
                }
                if result.code != 0 {
                    output.push_str(&format!(" (code {})", result.code));
                }
                output.push('\n');
                output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{Advice, Code, StatementSummary, Status};
    use crate::checker::BatchReport;
    use crate::plan_check::{project, PlanCheckRunResult};
    use crate::rule::Engine;

    fn finding() -> CheckResult {
        project(
            &Advice::new(
                Status::Error,
                Code::StatementNoWhere,
                "statement.where.require",
                "\"DELETE FROM t\" requires WHERE clause",
            )
            .at_line(3),
        )
    }

    #[test]
    fn test_format_result() {
        let formatter = TextFormatter::new().without_color();
        let output = formatter.format_result("change.json", &finding());
        assert_eq!(
            output,
            "change.json:3: error[statement.where.require]: \"DELETE FROM t\" requires WHERE clause (code 202)\n"
        );
    }

    #[test]
    fn test_format_summary() {
        let mut summary = StatementSummary::default();
        summary.add_statement_type("INSERT");
        summary.affected_rows = 2;
        summary.changed_resources.add_table("", "public", "t");

        let formatter = TextFormatter::new().without_color();
        let output = formatter.format_result(
            "change.json",
            &project(&Advice::summary("builtin.statement.summary-report", summary)),
        );
        assert!(output.contains("info[builtin.statement.summary-report]"));
        assert!(output.contains("statement types: INSERT, affected rows: 2, changed tables: 1"));
        assert!(output.contains("= table: public.t"));
    }

    #[test]
    fn test_format_report_hides_ok() {
        let report = CheckReport {
            batches: vec![BatchReport {
                source: "change.json".to_string(),
                engine: Some(Engine::Postgres),
                result: PlanCheckRunResult {
                    results: vec![finding(), project(&Advice::ok())],
                    error: String::new(),
                },
            }],
            batches_processed: 1,
            error_count: 1,
            success_count: 1,
            ..Default::default()
        };

        let output = TextFormatter::new().without_color().format(&report);
        assert!(output.contains("change.json (POSTGRES)"));
        assert!(output.contains("requires WHERE clause"));
        assert!(!output.contains("ok[OK]"));
        assert!(output.contains("1 batch checked: 1 error"));

        let output = TextFormatter::new().without_color().verbose().format(&report);
        assert!(output.contains("ok[OK]"));
    }

    #[test]
    fn test_format_report_without_summaries() {
        let mut summary = StatementSummary::default();
        summary.add_statement_type("DELETE");
        let report = CheckReport {
            batches: vec![BatchReport {
                source: "change.json".to_string(),
                engine: Some(Engine::Postgres),
                result: PlanCheckRunResult {
                    results: vec![
                        finding(),
                        project(&Advice::summary("builtin.statement.summary-report", summary)),
                    ],
                    error: String::new(),
                },
            }],
            batches_processed: 1,
            error_count: 1,
            success_count: 1,
            ..Default::default()
        };

        let output = TextFormatter::new().without_color().format(&report);
        assert!(output.contains("statement types: DELETE"));

        let output = TextFormatter::new()
            .without_color()
            .without_summaries()
            .format(&report);
        assert!(!output.contains("statement types"));
        assert!(output.contains("requires WHERE clause"));
    }

    #[test]
    fn test_format_failed_batch() {
        let report = CheckReport {
            batches: vec![BatchReport {
                source: "broken.json".to_string(),
                engine: None,
                result: PlanCheckRunResult::failed("invalid statement batch"),
            }],
            batches_processed: 1,
            batches_failed: 1,
            ..Default::default()
        };

        let output = TextFormatter::new().without_color().format(&report);
        assert!(output.contains("broken.json: error: invalid statement batch"));
        assert!(output.contains("1 unreadable batch"));
    }
}
