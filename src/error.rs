//! Error types for advisor dispatch

use crate::advice::Code;
use crate::rule::{Engine, RuleType};
use thiserror::Error;

/// Error raised while dispatching a single rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    /// The rule level or payload cannot be used (a policy-authoring mistake)
    #[error("invalid rule configuration: {0}")]
    Config(String),

    /// The advisor received a tree produced for a different parser
    #[error("advisor {rule_type} for {engine} expects {expected}, got {actual} (at \"{statement}\")")]
    ShapeMismatch {
        engine: Engine,
        rule_type: RuleType,
        expected: &'static str,
        actual: &'static str,
        /// Leading text of the statement being checked
        statement: String,
    },

    /// No advisor is registered for the (engine, rule type) pair
    #[error("no advisor registered for rule {rule_type} on engine {engine}")]
    UnregisteredRule { engine: Engine, rule_type: RuleType },
}

impl AdvisorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        AdvisorError::Config(message.into())
    }

    /// Result code used when the failure is reported as a plan-check entry
    pub fn code(&self) -> Code {
        match self {
            AdvisorError::Config(_) => Code::InvalidRuleConfig,
            AdvisorError::ShapeMismatch { .. } => Code::Internal,
            AdvisorError::UnregisteredRule { .. } => Code::RuleNotRegistered,
        }
    }

    /// Check if this error is caused by the review policy rather than the deployment
    pub fn is_config(&self) -> bool {
        matches!(self, AdvisorError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdvisorError::UnregisteredRule {
            engine: Engine::Mysql,
            rule_type: RuleType::StatementAddCheckNotValid,
        };
        assert_eq!(
            err.to_string(),
            "no advisor registered for rule statement.add-check-not-valid on engine MYSQL"
        );

        let err = AdvisorError::config("missing field `number`");
        assert_eq!(
            err.to_string(),
            "invalid rule configuration: missing field `number`"
        );
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let config = AdvisorError::config("bad");
        let shape = AdvisorError::ShapeMismatch {
            engine: Engine::Postgres,
            rule_type: RuleType::NamingTable,
            expected: "ast",
            actual: "snowflake parse tree",
            statement: "CREATE TABLE t".to_string(),
        };
        let missing = AdvisorError::UnregisteredRule {
            engine: Engine::Oracle,
            rule_type: RuleType::NamingTable,
        };

        assert!(config.is_config());
        assert!(!shape.is_config());
        assert!(shape.to_string().ends_with("(at \"CREATE TABLE t\")"));
        assert_ne!(config.code(), shape.code());
        assert_ne!(config.code(), missing.code());
        assert_ne!(shape.code(), missing.code());
    }
}
