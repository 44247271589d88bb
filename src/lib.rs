//! SQL Review - multi-dialect SQL advisor engine
//!
//! Checks parsed SQL statements against a review policy and reports findings
//! as plan-check results.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> PlanChecker -> dispatch -> Registry -> Advisor -> ParsedTree
//! ```
//!
//! Statement batches arrive already parsed: Postgres-family engines hand over a
//! statement list walked with a [`ast::Visitor`], grammar-based engines
//! such as Snowflake hand over a parse tree walked with a listener. For every
//! rule of the engine's policy, the dispatcher looks up the advisor registered
//! for the (engine, rule type) pair, decodes the rule's level and payload, runs
//! the check and projects the resulting advice into [`plan_check::CheckResult`]s.
//!
//! # Policies
//!
//! A policy is configured per engine in `.sqlreviewrc.yaml`:
//!
//! ```yaml
//! extends: [recommended]
//! policy:
//!   SNOWFLAKE:
//!     - type: column.maximum-varchar-length
//!       level: ERROR
//!       payload:
//!         number: 1024
//! ```

pub mod advice;
pub mod advisor;
pub mod advisors;
pub mod ast;
pub mod checker;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod output;
pub mod parse_tree;
pub mod payload;
pub mod plan_check;
pub mod registry;
pub mod rule;

// Re-export main types
pub use advice::{Advice, Code, StatementSummary, Status};
pub use advisor::{Advisor, Context, ParsedTree};
pub use checker::{BatchReport, CheckReport, PlanChecker, RuleTiming};
pub use config::Config;
pub use dispatch::{advise, dispatch};
pub use error::AdvisorError;
pub use input::{InputError, StatementBatch};
pub use output::{GithubFormatter, JsonFormatter, OutputFormatter, TextFormatter};
pub use payload::RulePayload;
pub use plan_check::{CheckResult, PlanCheckRunResult, ResultStatus};
pub use registry::Registry;
pub use rule::{Engine, Rule, RuleLevel, RuleType};
