//! Batch checker: runs the review policy over statement batches

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::input::StatementBatch;
use crate::plan_check::{CheckResult, PlanCheckRunResult, ResultStatus};
use crate::registry::Registry;
use crate::rule::Engine;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Per-rule timing statistics
#[derive(Debug, Clone, Default)]
pub struct RuleTiming {
    /// Rule type identifier
    pub rule_id: String,
    /// Total time spent on this rule
    pub total_time: Duration,
    /// Number of times the rule was dispatched
    pub evaluation_count: usize,
    /// Number of findings (non-OK, non-summary results)
    pub match_count: usize,
}

impl RuleTiming {
    pub fn new(rule_id: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            ..Default::default()
        }
    }

    /// Average time per evaluation
    pub fn avg_time(&self) -> Duration {
        if self.evaluation_count > 0 {
            self.total_time / self.evaluation_count as u32
        } else {
            Duration::ZERO
        }
    }
}

/// Plan-check run of one batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Where the batch came from (file path or `<batch>`)
    pub source: String,

    /// Engine of the batch, unknown when it failed to load
    pub engine: Option<Engine>,

    pub result: PlanCheckRunResult,
}

/// Result of checking a set of batches
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Per-batch runs, in input order
    pub batches: Vec<BatchReport>,

    /// Batches processed
    pub batches_processed: usize,

    /// Batches whose run failed as a whole (unreadable or malformed input)
    pub batches_failed: usize,

    /// Findings reported at ERROR
    pub error_count: usize,

    /// Findings reported at WARNING
    pub warning_count: usize,

    /// SUCCESS entries (OK sentinels, summaries, INFO-level findings)
    pub success_count: usize,

    /// Rules that could not be evaluated
    pub rule_failures: usize,

    /// Processing duration
    pub duration: Duration,

    /// Per-rule timing statistics (rule type -> timing)
    pub rule_timings: HashMap<String, RuleTiming>,
}

impl CheckReport {
    fn from_batch(batch: BatchReport, rule_timings: HashMap<String, RuleTiming>) -> Self {
        let mut report = Self {
            batches_processed: 1,
            rule_timings,
            ..Self::default()
        };

        if !batch.result.error.is_empty() {
            report.batches_failed = 1;
        }
        for result in &batch.result.results {
            if result.is_failure() {
                report.rule_failures += 1;
                continue;
            }
            match result.status {
                ResultStatus::Error => report.error_count += 1,
                ResultStatus::Warning => report.warning_count += 1,
                ResultStatus::Success | ResultStatus::StatusUnspecified => {
                    report.success_count += 1
                }
            }
        }

        report.batches.push(batch);
        report
    }

    /// Check if there are any errors, failed rules or failed batches
    pub fn has_errors(&self) -> bool {
        self.error_count > 0 || self.rule_failures > 0 || self.batches_failed > 0
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Get exit code (0 = clean, 1 = warnings, 2 = errors or failures)
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            2
        } else if self.has_warnings() {
            1
        } else {
            0
        }
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: CheckReport) {
        self.batches.extend(other.batches);
        self.batches_processed += other.batches_processed;
        self.batches_failed += other.batches_failed;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.success_count += other.success_count;
        self.rule_failures += other.rule_failures;

        for (rule_id, timing) in other.rule_timings {
            let entry = self
                .rule_timings
                .entry(rule_id)
                .or_insert_with(|| RuleTiming::new(&timing.rule_id));
            entry.total_time += timing.total_time;
            entry.evaluation_count += timing.evaluation_count;
            entry.match_count += timing.match_count;
        }
    }

    /// Rule timings sorted by total time (descending)
    pub fn sorted_timings(&self) -> Vec<&RuleTiming> {
        let mut timings: Vec<_> = self.rule_timings.values().collect();
        timings.sort_by(|a, b| b.total_time.cmp(&a.total_time));
        timings
    }

    /// Format timing statistics as a table
    pub fn format_timings(&self) -> String {
        let timings = self.sorted_timings();
        if timings.is_empty() {
            return "No timing data available".to_string();
        }

        let mut output = String::new();
        output.push_str("Rule Timing Statistics:\n");
        output.push_str(&format!(
            "{:<40} {:>12} {:>12} {:>10} {:>12}\n",
            "Rule", "Total", "Avg", "Evals", "Findings"
        ));
        output.push_str(&"-".repeat(90));
        output.push('\n');

        for timing in timings {
            let total_ms = timing.total_time.as_secs_f64() * 1000.0;
            let avg_us = timing.avg_time().as_secs_f64() * 1_000_000.0;

            output.push_str(&format!(
                "{:<40} {:>10.2}ms {:>10.2}µs {:>10} {:>12}\n",
                timing.rule_id, total_ms, avg_us, timing.evaluation_count, timing.match_count
            ));
        }

        output
    }
}

/// Runs a configured review policy over statement batches
pub struct PlanChecker<'r> {
    config: Config,
    registry: &'r Registry,
}

impl PlanChecker<'static> {
    /// Checker backed by the built-in advisors
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: Registry::builtin(),
        }
    }
}

impl<'r> PlanChecker<'r> {
    /// Checker backed by a custom registry
    pub fn with_registry(config: Config, registry: &'r Registry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load and check batch files
    pub fn check_files(&self, files: &[PathBuf]) -> CheckReport {
        self.run_all(files, |path| match StatementBatch::load(path) {
            Ok(batch) => self.check_batch(&batch),
            Err(e) => {
                log::warn!("{}", e);
                CheckReport::from_batch(
                    BatchReport {
                        source: path.display().to_string(),
                        engine: None,
                        result: PlanCheckRunResult::failed(e.to_string()),
                    },
                    HashMap::new(),
                )
            }
        })
    }

    /// Check already loaded batches
    pub fn check_batches(&self, batches: &[StatementBatch]) -> CheckReport {
        self.run_all(batches, |batch| self.check_batch(batch))
    }

    fn run_all<T: Sync>(
        &self,
        items: &[T],
        check: impl Fn(&T) -> CheckReport + Sync,
    ) -> CheckReport {
        let start = Instant::now();

        let reports: Vec<CheckReport> = if self.config.engine.parallel {
            let threads = if self.config.engine.jobs > 0 {
                self.config.engine.jobs
            } else {
                num_cpus::get()
            };
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| items.par_iter().map(&check).collect()),
                Err(e) => {
                    log::warn!("Failed to build thread pool, checking sequentially: {}", e);
                    items.iter().map(&check).collect()
                }
            }
        } else {
            items.iter().map(&check).collect()
        };

        let mut combined = CheckReport::default();
        for report in reports {
            combined.merge(report);
        }
        combined.duration = start.elapsed();

        log::info!(
            "Checked {} batches: {} errors, {} warnings, {} failed rules in {:.2}s",
            combined.batches_processed,
            combined.error_count,
            combined.warning_count,
            combined.rule_failures,
            combined.duration.as_secs_f64()
        );
        combined
    }

    /// Check a single batch against the policy for its engine
    pub fn check_batch(&self, batch: &StatementBatch) -> CheckReport {
        if let Err(e) = batch.validate() {
            log::warn!("{}", e);
            return CheckReport::from_batch(
                BatchReport {
                    source: batch.name(),
                    engine: Some(batch.engine),
                    result: PlanCheckRunResult::failed(e.to_string()),
                },
                HashMap::new(),
            );
        }

        let (result, timings) = self.run(batch);
        CheckReport::from_batch(
            BatchReport {
                source: batch.name(),
                engine: Some(batch.engine),
                result,
            },
            timings,
        )
    }

    /// Dispatch every rule of the batch's policy, isolating failing rules
    pub fn run(&self, batch: &StatementBatch) -> (PlanCheckRunResult, HashMap<String, RuleTiming>) {
        let mut results = Vec::new();
        let mut timings: HashMap<String, RuleTiming> = HashMap::new();

        let policy = self.config.effective_policy(batch.engine);
        if policy.is_empty() {
            log::debug!("No rules configured for {}", batch.engine);
        }

        for rule in &policy {
            let start = Instant::now();
            let outcome = dispatch(
                self.registry,
                batch.engine,
                rule,
                &batch.tree,
                &batch.statement,
            );
            let elapsed = start.elapsed();

            let rule_id = rule.rule_type.as_str();
            let timing = timings
                .entry(rule_id.to_string())
                .or_insert_with(|| RuleTiming::new(rule_id));
            timing.total_time += elapsed;
            timing.evaluation_count += 1;

            match outcome {
                Ok(entries) => {
                    timing.match_count += entries.iter().filter(|r| is_finding(r)).count();
                    results.extend(entries);
                }
                Err(e) => {
                    log::warn!("Rule {} failed on {}: {}", rule.rule_type, batch.name(), e);
                    results.push(CheckResult::failure(rule.rule_type, &e));
                }
            }
        }

        (
            PlanCheckRunResult {
                results,
                error: String::new(),
            },
            timings,
        )
    }
}

fn is_finding(result: &CheckResult) -> bool {
    matches!(result.status, ResultStatus::Error | ResultStatus::Warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::Code;
    use crate::advisor::ParsedTree;
    use crate::ast::{Statement, StatementNode, TableName};
    use crate::rule::{Rule, RuleLevel, RuleType};
    use serde_json::json;

    fn delete_batch() -> StatementBatch {
        StatementBatch::new(
            Engine::Postgres,
            "DELETE FROM t",
            ParsedTree::Ast {
                statements: vec![StatementNode::new(
                    "DELETE FROM t",
                    1,
                    Statement::Delete {
                        table: TableName::new("t"),
                        where_clause: None,
                    },
                )],
            },
        )
    }

    fn config_with(engine: Engine, rules: Vec<Rule>) -> Config {
        let mut config = Config::new();
        config.engine.parallel = false;
        config.policy.insert(engine, rules);
        config
    }

    #[test]
    fn test_check_report_exit_code() {
        let mut report = CheckReport::default();
        assert_eq!(report.exit_code(), 0);
        assert!(report.is_clean());

        report.warning_count = 1;
        assert_eq!(report.exit_code(), 1);

        report.rule_failures = 1;
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_check_report_merge() {
        let mut first = CheckReport {
            batches_processed: 1,
            error_count: 2,
            ..Default::default()
        };
        first
            .rule_timings
            .insert("naming.table".to_string(), RuleTiming::new("naming.table"));

        let mut second = CheckReport {
            batches_processed: 1,
            warning_count: 3,
            ..Default::default()
        };
        let mut timing = RuleTiming::new("naming.table");
        timing.evaluation_count = 2;
        second.rule_timings.insert("naming.table".to_string(), timing);

        first.merge(second);
        assert_eq!(first.batches_processed, 2);
        assert_eq!(first.error_count, 2);
        assert_eq!(first.warning_count, 3);
        assert_eq!(first.rule_timings["naming.table"].evaluation_count, 2);
    }

    #[test]
    fn test_failing_rule_is_isolated() {
        let config = config_with(
            Engine::Postgres,
            vec![
                Rule::new(RuleType::ColumnMaximumVarcharLength, RuleLevel::Warning)
                    .with_payload(json!({"number": 10})),
                Rule::new(RuleType::StatementWhereRequire, RuleLevel::Error),
            ],
        );
        let checker = PlanChecker::new(config);
        let (result, timings) = checker.run(&delete_batch());

        assert_eq!(result.results.len(), 2);
        let failure = &result.results[0];
        assert!(failure.is_failure());
        assert_eq!(failure.title, "column.maximum-varchar-length");
        assert_eq!(failure.code, Code::RuleNotRegistered.value());

        let finding = &result.results[1];
        assert_eq!(finding.status, ResultStatus::Error);
        assert_eq!(finding.code, Code::StatementNoWhere.value());

        assert_eq!(timings["statement.where.require"].match_count, 1);
    }

    #[test]
    fn test_disabled_rule_produces_nothing() {
        let config = config_with(
            Engine::Postgres,
            vec![Rule::new(RuleType::StatementWhereRequire, RuleLevel::Disabled)],
        );
        let report = PlanChecker::new(config).check_batch(&delete_batch());
        assert!(report.batches[0].result.results.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_check_batches_counts() {
        let mut config = config_with(
            Engine::Postgres,
            vec![
                Rule::new(RuleType::StatementWhereRequire, RuleLevel::Warning),
                Rule::new(RuleType::StatementAddCheckNotValid, RuleLevel::Error),
            ],
        );
        config.engine.parallel = true;
        config.engine.jobs = 2;

        let batches = vec![delete_batch(), delete_batch(), delete_batch()];
        let report = PlanChecker::new(config).check_batches(&batches);

        assert_eq!(report.batches_processed, 3);
        assert_eq!(report.batches.len(), 3);
        assert_eq!(report.warning_count, 3);
        assert_eq!(report.success_count, 3);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            report.rule_timings["statement.where.require"].evaluation_count,
            3
        );
    }

    #[test]
    fn test_custom_registry() {
        use crate::advice::Advice;
        use crate::advisor::{Advisor, Context};
        use crate::error::AdvisorError;

        struct AlwaysFlag;

        impl Advisor for AlwaysFlag {
            fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
                Ok(vec![ctx.advice(Code::StatementNoWhere, "flagged").at_line(1)])
            }
        }

        let mut registry = Registry::new();
        registry.register(
            Engine::Redshift,
            RuleType::StatementWhereRequire,
            Box::new(AlwaysFlag),
        );

        let config = config_with(
            Engine::Redshift,
            vec![Rule::new(RuleType::StatementWhereRequire, RuleLevel::Warning)],
        );
        let mut batch = delete_batch();
        batch.engine = Engine::Redshift;

        let report = PlanChecker::with_registry(config, &registry).check_batch(&batch);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.batches[0].result.results[0].content, "flagged");
    }

    #[test]
    fn test_tree_for_another_engine_fails_batch() {
        let mut batch = delete_batch();
        batch.engine = Engine::Snowflake;

        let config = Config::preset("recommended").unwrap();
        let report = PlanChecker::new(config).check_batch(&batch);
        assert_eq!(report.batches_failed, 1);
        assert_eq!(report.rule_failures, 0);
        assert!(report.batches[0].result.results.is_empty());
        assert!(report.batches[0].result.error.contains("SNOWFLAKE"));
        assert_eq!(report.exit_code(), 2);
        assert!(report.rule_timings.is_empty());
    }

    #[test]
    fn test_unreadable_file_fails_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let report = PlanChecker::new(Config::new()).check_files(&[path]);
        assert_eq!(report.batches_failed, 1);
        assert!(report.batches[0].engine.is_none());
        assert!(!report.batches[0].result.error.is_empty());
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_format_timings() {
        let report = CheckReport::default();
        assert_eq!(report.format_timings(), "No timing data available");

        let config = config_with(
            Engine::Postgres,
            vec![Rule::new(RuleType::StatementWhereRequire, RuleLevel::Warning)],
        );
        let report = PlanChecker::new(config).check_batch(&delete_batch());
        let table = report.format_timings();
        assert!(table.contains("Rule Timing Statistics"));
        assert!(table.contains("statement.where.require"));
    }
}
