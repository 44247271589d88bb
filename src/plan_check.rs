//! Plan-check result schema and the projection from advice into it
//!
//! Field names follow the protobuf JSON mapping used by the persisted store:
//! camelCase keys, enum values as their names, default-valued scalars omitted,
//! and the report oneof rendered under `sqlSummaryReport` or `sqlReviewReport`.

use crate::advice::{Advice, Status};
use crate::error::AdvisorError;
use crate::rule::RuleType;
use serde::{Deserialize, Serialize};

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// Status of one plan-check result entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    #[default]
    StatusUnspecified,
    Error,
    Warning,
    Success,
}

impl From<Status> for ResultStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ResultStatus::Success,
            Status::Warning => ResultStatus::Warning,
            Status::Error => ResultStatus::Error,
        }
    }
}

/// Results of running the review policy against one statement batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCheckRunResult {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<CheckResult>,

    /// Set when the run as a whole could not execute
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl PlanCheckRunResult {
    /// Create a run result that failed before any rule ran
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            error: error.into(),
        }
    }
}

/// One entry of a plan-check run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(default)]
    pub status: ResultStatus,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub code: i64,

    #[serde(flatten)]
    pub report: Option<Report>,
}

impl CheckResult {
    /// Entry describing a rule that could not be evaluated
    pub fn failure(rule_type: RuleType, err: &AdvisorError) -> Self {
        Self {
            status: ResultStatus::Error,
            title: rule_type.as_str().to_string(),
            content: err.to_string(),
            code: err.code().value(),
            report: None,
        }
    }

    /// Check if this entry records a failing rule rather than a finding
    pub fn is_failure(&self) -> bool {
        self.status == ResultStatus::Error && self.report.is_none()
    }
}

/// Report attached to a result entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Report {
    SqlSummaryReport(SqlSummaryReport),
    SqlReviewReport(SqlReviewReport),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlSummaryReport {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub code: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statement_types: Vec<String>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub affected_rows: i64,

    #[serde(default, skip_serializing_if = "ChangedResources::is_empty")]
    pub changed_resources: ChangedResources,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlReviewReport {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub line: i64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub column: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub code: i64,
}

/// Database objects touched by a statement batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedResources {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<ChangedDatabase>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedDatabase {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<ChangedSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<ChangedTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedTable {
    pub name: String,
}

impl ChangedResources {
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Record a table, keeping first-seen order and dropping duplicates
    pub fn add_table(&mut self, database: &str, schema: &str, table: &str) {
        let db = match self.databases.iter().position(|d| d.name == database) {
            Some(i) => &mut self.databases[i],
            None => {
                self.databases.push(ChangedDatabase {
                    name: database.to_string(),
                    schemas: Vec::new(),
                });
                let last = self.databases.len() - 1;
                &mut self.databases[last]
            }
        };

        let sch = match db.schemas.iter().position(|s| s.name == schema) {
            Some(i) => &mut db.schemas[i],
            None => {
                db.schemas.push(ChangedSchema {
                    name: schema.to_string(),
                    tables: Vec::new(),
                });
                let last = db.schemas.len() - 1;
                &mut db.schemas[last]
            }
        };

        if !sch.tables.iter().any(|t| t.name == table) {
            sch.tables.push(ChangedTable {
                name: table.to_string(),
            });
        }
    }

    /// Number of distinct tables
    pub fn table_count(&self) -> usize {
        self.databases
            .iter()
            .flat_map(|d| &d.schemas)
            .map(|s| s.tables.len())
            .sum()
    }
}

/// Convert one advice into a result entry
pub fn project(advice: &Advice) -> CheckResult {
    let code = advice.code.value();
    let report = match &advice.summary {
        Some(summary) => Report::SqlSummaryReport(SqlSummaryReport {
            code,
            statement_types: summary.statement_types.clone(),
            affected_rows: summary.affected_rows,
            changed_resources: summary.changed_resources.clone(),
        }),
        None => Report::SqlReviewReport(SqlReviewReport {
            line: advice.line as i64,
            column: advice.column as i64,
            detail: advice.content.clone(),
            code,
        }),
    };

    CheckResult {
        status: advice.status.into(),
        title: advice.title.clone(),
        content: advice.content.clone(),
        code,
        report: Some(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{Code, StatementSummary};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_project_review_advice() {
        let advice = Advice::new(
            Status::Warning,
            Code::StatementAddCheckWithValidation,
            "statement.add-check-not-valid",
            "msg",
        )
        .at_line(3);

        let result = project(&advice);
        assert_eq!(result.status, ResultStatus::Warning);
        assert_eq!(result.code, 212);
        assert_eq!(
            result.report,
            Some(Report::SqlReviewReport(SqlReviewReport {
                line: 3,
                column: 0,
                detail: "msg".to_string(),
                code: 212,
            }))
        );
    }

    #[test]
    fn test_project_summary_advice() {
        let mut summary = StatementSummary::default();
        summary.add_statement_type("INSERT");
        summary.affected_rows = 2;
        summary.changed_resources.add_table("db", "public", "t");

        let result = project(&Advice::summary("builtin.statement.summary-report", summary));
        assert_eq!(result.status, ResultStatus::Success);
        match result.report {
            Some(Report::SqlSummaryReport(report)) => {
                assert_eq!(report.statement_types, vec!["INSERT"]);
                assert_eq!(report.affected_rows, 2);
                assert_eq!(report.changed_resources.table_count(), 1);
            }
            other => panic!("expected summary report, got {:?}", other),
        }
    }

    #[test]
    fn test_result_json_field_names() {
        let advice = Advice::new(Status::Error, Code::VarcharLengthExceedsLimit, "t", "c")
            .at_line(1)
            .with_column(29);
        let value = serde_json::to_value(project(&advice)).unwrap();

        assert_eq!(
            value,
            json!({
                "status": "ERROR",
                "title": "t",
                "content": "c",
                "code": 422,
                "sqlReviewReport": {"line": 1, "column": 29, "detail": "c", "code": 422}
            })
        );
    }

    #[test]
    fn test_ok_advice_omits_defaults() {
        let value = serde_json::to_value(project(&Advice::ok())).unwrap();
        assert_eq!(
            value,
            json!({"status": "SUCCESS", "title": "OK", "sqlReviewReport": {}})
        );
    }

    #[test]
    fn test_run_result_round_trip() {
        let mut resources = ChangedResources::default();
        resources.add_table("db", "PUBLIC", "T");
        let run = PlanCheckRunResult {
            results: vec![
                project(&Advice::ok()),
                CheckResult::failure(
                    RuleType::NamingTable,
                    &AdvisorError::config("missing naming payload"),
                ),
                CheckResult {
                    status: ResultStatus::Success,
                    title: "summary".to_string(),
                    content: String::new(),
                    code: 0,
                    report: Some(Report::SqlSummaryReport(SqlSummaryReport {
                        code: 0,
                        statement_types: vec!["CREATE_TABLE".to_string()],
                        affected_rows: 0,
                        changed_resources: resources,
                    })),
                },
            ],
            error: String::new(),
        };

        let json = serde_json::to_string(&run).unwrap();
        let back: PlanCheckRunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, run);
    }

    #[test]
    fn test_failure_entry() {
        let result = CheckResult::failure(
            RuleType::ColumnMaximumVarcharLength,
            &AdvisorError::config("bad"),
        );
        assert!(result.is_failure());
        assert_eq!(result.title, "column.maximum-varchar-length");
        assert_eq!(result.code, Code::InvalidRuleConfig.value());
    }

    #[test]
    fn test_changed_resources_dedup() {
        let mut resources = ChangedResources::default();
        resources.add_table("db", "public", "a");
        resources.add_table("db", "public", "b");
        resources.add_table("db", "public", "a");
        resources.add_table("db", "sales", "a");

        assert_eq!(resources.databases.len(), 1);
        assert_eq!(resources.databases[0].schemas.len(), 2);
        assert_eq!(resources.table_count(), 3);
        assert_eq!(resources.databases[0].schemas[0].tables[1].name, "b");
    }
}
