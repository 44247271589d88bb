//! JSON output formatter
//!
//! Each batch's `result` is the plan-check run result exactly as persisted.

use super::OutputFormatter;
use crate::checker::CheckReport;
use crate::plan_check::{CheckResult, PlanCheckRunResult};
use crate::rule::Engine;
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| {
            log::error!("Failed to serialize output: {}", e);
            String::new()
        })
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    batches: Vec<JsonBatch<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonBatch<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine: Option<Engine>,
    result: &'a PlanCheckRunResult,
}

#[derive(Serialize)]
struct JsonSummary {
    batches_processed: usize,
    batches_failed: usize,
    error_count: usize,
    warning_count: usize,
    success_count: usize,
    rule_failures: usize,
    duration_ms: u128,
}

#[derive(Serialize)]
struct JsonResult<'a> {
    source: &'a str,
    #[serde(flatten)]
    result: &'a CheckResult,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &CheckReport) -> String {
        let output = JsonOutput {
            batches: report
                .batches
                .iter()
                .map(|b| JsonBatch {
                    source: &b.source,
                    engine: b.engine,
                    result: &b.result,
                })
                .collect(),
            summary: JsonSummary {
                batches_processed: report.batches_processed,
                batches_failed: report.batches_failed,
                error_count: report.error_count,
                warning_count: report.warning_count,
                success_count: report.success_count,
                rule_failures: report.rule_failures,
                duration_ms: report.duration.as_millis(),
            },
        };

        self.render(&output)
    }

    fn format_result(&self, source: &str, result: &CheckResult) -> String {
        self.render(&JsonResult { source, result })
    }
}
