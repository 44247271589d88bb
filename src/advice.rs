//! Advice types produced by advisors

use crate::plan_check::ChangedResources;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of an advice
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No violation, or an informational finding
    #[default]
    Success,
    /// Potential issue
    Warning,
    /// Definite policy violation
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Warning => write!(f, "warning"),
            Status::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" | "ok" | "info" => Ok(Status::Success),
            "warning" | "warn" => Ok(Status::Warning),
            "error" | "err" => Ok(Status::Error),
            _ => Err(()),
        }
    }
}

/// Stable numeric advice code, used for machine matching and i18n
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Code {
    Ok,
    Internal,
    RuleNotRegistered,
    InvalidRuleConfig,

    StatementNoWhere,
    StatementSelectAll,
    StatementAddCheckWithValidation,

    NamingTableConventionMismatch,

    DisabledColumnType,
    VarcharLengthExceedsLimit,

    TableNoPK,

    CreateIndexUnconcurrently,
}

impl Code {
    /// Numeric value persisted in plan-check results
    pub fn value(self) -> i64 {
        match self {
            Code::Ok => 0,
            Code::Internal => 1,
            Code::RuleNotRegistered => 2,
            Code::InvalidRuleConfig => 3,

            Code::StatementNoWhere => 202,
            Code::StatementSelectAll => 203,
            Code::StatementAddCheckWithValidation => 212,

            Code::NamingTableConventionMismatch => 301,

            Code::DisabledColumnType => 411,
            Code::VarcharLengthExceedsLimit => 422,

            Code::TableNoPK => 601,

            Code::CreateIndexUnconcurrently => 814,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Aggregate facts about a statement batch, emitted by summary advisors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSummary {
    /// Statement kinds in first-seen order (e.g. "CREATE_TABLE", "UPDATE")
    pub statement_types: Vec<String>,
    /// Estimated number of affected rows
    pub affected_rows: i64,
    /// Database objects touched by the batch
    pub changed_resources: ChangedResources,
}

impl StatementSummary {
    /// Record a statement kind, keeping the first occurrence only
    pub fn add_statement_type(&mut self, kind: &str) {
        if !self.statement_types.iter().any(|t| t == kind) {
            self.statement_types.push(kind.to_string());
        }
    }
}

/// One finding produced by an advisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    /// Severity, mirrors the rule's configured level
    pub status: Status,
    /// Stable identifier of the finding
    pub code: Code,
    /// Human label for the rule type
    pub title: String,
    /// Rendered message
    pub content: String,
    /// Line number (1-based, 0 if unknown)
    pub line: usize,
    /// Column number (1-based, 0 if unknown)
    pub column: usize,
    /// Statement facts, set only by summary advisors
    pub summary: Option<StatementSummary>,
}

impl Advice {
    /// Create a new advice
    pub fn new(status: Status, code: Code, title: &str, content: &str) -> Self {
        Self {
            status,
            code,
            title: title.to_string(),
            content: content.to_string(),
            line: 0,
            column: 0,
            summary: None,
        }
    }

    /// The synthetic advice returned when no violation triggers
    pub fn ok() -> Self {
        Self::new(Status::Success, Code::Ok, "OK", "")
    }

    /// Create a summary advice
    pub fn summary(title: &str, summary: StatementSummary) -> Self {
        Self {
            summary: Some(summary),
            ..Self::new(Status::Success, Code::Ok, title, "")
        }
    }

    /// Set the source line
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Set the source column
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Check if this is the synthetic OK advice
    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok && self.status == Status::Success && self.summary.is_none()
    }

    /// Check if this advice carries statement facts instead of a positional finding
    pub fn is_summary(&self) -> bool {
        self.summary.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(Status::Error > Status::Warning);
        assert!(Status::Warning > Status::Success);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("error".parse::<Status>(), Ok(Status::Error));
        assert_eq!("WARN".parse::<Status>(), Ok(Status::Warning));
        assert_eq!("info".parse::<Status>(), Ok(Status::Success));
        assert!("fatal".parse::<Status>().is_err());
    }

    #[test]
    fn test_code_values() {
        assert_eq!(Code::Ok.value(), 0);
        assert_eq!(Code::StatementAddCheckWithValidation.value(), 212);
        assert_eq!(format!("{}", Code::VarcharLengthExceedsLimit), "422");
    }

    #[test]
    fn test_ok_advice() {
        let advice = Advice::ok();
        assert!(advice.is_ok());
        assert_eq!(advice.title, "OK");
        assert_eq!(advice.content, "");
        assert_eq!(advice.line, 0);
    }

    #[test]
    fn test_advice_builder() {
        let advice = Advice::new(
            Status::Warning,
            Code::StatementNoWhere,
            "statement.where.require",
            "\"DELETE FROM t\" requires WHERE clause",
        )
        .at_line(3)
        .with_column(1);

        assert!(!advice.is_ok());
        assert!(!advice.is_summary());
        assert_eq!(advice.line, 3);
        assert_eq!(advice.column, 1);
    }

    #[test]
    fn test_summary_statement_types_dedup() {
        let mut summary = StatementSummary::default();
        summary.add_statement_type("UPDATE");
        summary.add_statement_type("CREATE_TABLE");
        summary.add_statement_type("UPDATE");
        assert_eq!(summary.statement_types, vec!["UPDATE", "CREATE_TABLE"]);

        let advice = Advice::summary("builtin.statement.summary-report", summary);
        assert!(advice.is_summary());
        assert!(!advice.is_ok());
    }
}
