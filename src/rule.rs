//! Engines, rule types and rule configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported database dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Engine {
    Postgres,
    Redshift,
    Snowflake,
    Mysql,
    Tidb,
    Mariadb,
    Oracle,
    Mssql,
}

/// Shape of the tree an engine's parser produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    /// Hand-modeled AST walked with a visitor
    Ast,
    /// Grammar-generated parse tree walked with a listener
    ParseTree,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::Ast => f.write_str("statement AST"),
            TreeKind::ParseTree => f.write_str("grammar parse tree"),
        }
    }
}

impl Engine {
    /// All known engines
    pub const ALL: [Engine; 8] = [
        Engine::Postgres,
        Engine::Redshift,
        Engine::Snowflake,
        Engine::Mysql,
        Engine::Tidb,
        Engine::Mariadb,
        Engine::Oracle,
        Engine::Mssql,
    ];

    /// Wire name (e.g. "POSTGRES")
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Postgres => "POSTGRES",
            Engine::Redshift => "REDSHIFT",
            Engine::Snowflake => "SNOWFLAKE",
            Engine::Mysql => "MYSQL",
            Engine::Tidb => "TIDB",
            Engine::Mariadb => "MARIADB",
            Engine::Oracle => "ORACLE",
            Engine::Mssql => "MSSQL",
        }
    }

    /// Tree discipline of this engine's parser
    pub fn tree_kind(self) -> TreeKind {
        match self {
            Engine::Postgres | Engine::Redshift => TreeKind::Ast,
            _ => TreeKind::ParseTree,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "POSTGRES" | "POSTGRESQL" | "PG" => Ok(Engine::Postgres),
            "REDSHIFT" => Ok(Engine::Redshift),
            "SNOWFLAKE" => Ok(Engine::Snowflake),
            "MYSQL" => Ok(Engine::Mysql),
            "TIDB" => Ok(Engine::Tidb),
            "MARIADB" => Ok(Engine::Mariadb),
            "ORACLE" => Ok(Engine::Oracle),
            "MSSQL" => Ok(Engine::Mssql),
            _ => Err(format!("Unknown engine: {}", s)),
        }
    }
}

/// Schema of a rule's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// The rule takes no parameters
    None,
    /// `{"number": int}`
    Number,
    /// `{"list": [string]}`
    StringArray,
    /// `{"format": regex, "maxLength": int}`
    Naming,
}

/// Identifier of a specific check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleType {
    #[serde(rename = "statement.add-check-not-valid")]
    StatementAddCheckNotValid,
    #[serde(rename = "statement.where.require")]
    StatementWhereRequire,
    #[serde(rename = "statement.select.no-select-all")]
    StatementSelectNoSelectAll,
    #[serde(rename = "statement.create-index-concurrently")]
    StatementCreateIndexConcurrently,
    #[serde(rename = "naming.table")]
    NamingTable,
    #[serde(rename = "table.require-pk")]
    TableRequirePk,
    #[serde(rename = "column.maximum-varchar-length")]
    ColumnMaximumVarcharLength,
    #[serde(rename = "column.type-disallow-list")]
    ColumnTypeDisallowList,
    #[serde(rename = "builtin.statement.summary-report")]
    StatementSummaryReport,
}

impl RuleType {
    /// All known rule types
    pub const ALL: [RuleType; 9] = [
        RuleType::StatementAddCheckNotValid,
        RuleType::StatementWhereRequire,
        RuleType::StatementSelectNoSelectAll,
        RuleType::StatementCreateIndexConcurrently,
        RuleType::NamingTable,
        RuleType::TableRequirePk,
        RuleType::ColumnMaximumVarcharLength,
        RuleType::ColumnTypeDisallowList,
        RuleType::StatementSummaryReport,
    ];

    /// Stable identifier, also used as the advice title
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::StatementAddCheckNotValid => "statement.add-check-not-valid",
            RuleType::StatementWhereRequire => "statement.where.require",
            RuleType::StatementSelectNoSelectAll => "statement.select.no-select-all",
            RuleType::StatementCreateIndexConcurrently => "statement.create-index-concurrently",
            RuleType::NamingTable => "naming.table",
            RuleType::TableRequirePk => "table.require-pk",
            RuleType::ColumnMaximumVarcharLength => "column.maximum-varchar-length",
            RuleType::ColumnTypeDisallowList => "column.type-disallow-list",
            RuleType::StatementSummaryReport => "builtin.statement.summary-report",
        }
    }

    /// Payload schema expected by this rule type
    pub fn payload_kind(self) -> PayloadKind {
        match self {
            RuleType::NamingTable => PayloadKind::Naming,
            RuleType::ColumnMaximumVarcharLength => PayloadKind::Number,
            RuleType::ColumnTypeDisallowList => PayloadKind::StringArray,
            _ => PayloadKind::None,
        }
    }

    /// Payload used by the configuration presets
    pub fn default_payload(self) -> serde_json::Value {
        match self {
            RuleType::NamingTable => serde_json::json!({
                "format": "^[a-z]+(_[a-z]+)*$",
                "maxLength": 64,
            }),
            RuleType::ColumnMaximumVarcharLength => serde_json::json!({ "number": 2048 }),
            RuleType::ColumnTypeDisallowList => serde_json::json!({ "list": ["JSON"] }),
            _ => serde_json::Value::Null,
        }
    }

    /// Short description, shown by `sqlreview rules`
    pub fn description(self) -> &'static str {
        match self {
            RuleType::StatementAddCheckNotValid => {
                "Check constraints must be added NOT VALID and validated separately"
            }
            RuleType::StatementWhereRequire => "UPDATE and DELETE statements require a WHERE clause",
            RuleType::StatementSelectNoSelectAll => "Disallow SELECT *",
            RuleType::StatementCreateIndexConcurrently => {
                "Indexes must be created with CONCURRENTLY"
            }
            RuleType::NamingTable => "Table names must follow the naming convention",
            RuleType::TableRequirePk => "Tables must have a primary key",
            RuleType::ColumnMaximumVarcharLength => "Limit the declared VARCHAR length",
            RuleType::ColumnTypeDisallowList => "Disallow column types from a list",
            RuleType::StatementSummaryReport => {
                "Report statement kinds, affected rows and changed resources"
            }
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown rule type: {}", s))
    }
}

/// Configured level of a rule in a review policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleLevel {
    #[default]
    LevelUnspecified,
    Disabled,
    Info,
    Warning,
    Error,
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLevel::LevelUnspecified => write!(f, "LEVEL_UNSPECIFIED"),
            RuleLevel::Disabled => write!(f, "DISABLED"),
            RuleLevel::Info => write!(f, "INFO"),
            RuleLevel::Warning => write!(f, "WARNING"),
            RuleLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// One rule of a review policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Check to run
    #[serde(rename = "type")]
    pub rule_type: RuleType,

    /// Configured level
    #[serde(default)]
    pub level: RuleLevel,

    /// Rule-specific parameters, decoded by the payload codec
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl Rule {
    /// Create a rule without payload
    pub fn new(rule_type: RuleType, level: RuleLevel) -> Self {
        Self {
            rule_type,
            level,
            payload: serde_json::Value::Null,
        }
    }

    /// Set the payload
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Set the level
    pub fn with_level(mut self, level: RuleLevel) -> Self {
        self.level = level;
        self
    }

    /// Check if the rule is switched off
    pub fn is_disabled(&self) -> bool {
        self.level == RuleLevel::Disabled
    }
}
