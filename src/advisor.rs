//! Advisor contract: parsed input, per-call context and the `Advisor` trait

use crate::advice::{Advice, Status};
use crate::ast::StatementNode;
use crate::error::AdvisorError;
use crate::parse_tree::snowflake::SnowflakeTree;
use crate::payload::RulePayload;
use crate::rule::{Engine, RuleType, TreeKind};
use serde::{Deserialize, Serialize};

/// Tree produced by an engine's parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedTree {
    /// Postgres-family statement list
    Ast { statements: Vec<StatementNode> },
    /// Snowflake grammar parse tree
    Snowflake { root: SnowflakeTree },
}

impl ParsedTree {
    /// Tree discipline this tree follows
    pub fn kind(&self) -> TreeKind {
        match self {
            ParsedTree::Ast { .. } => TreeKind::Ast,
            ParsedTree::Snowflake { .. } => TreeKind::ParseTree,
        }
    }

    /// Name used in shape mismatch errors
    pub fn shape(&self) -> &'static str {
        match self {
            ParsedTree::Ast { .. } => "statement list",
            ParsedTree::Snowflake { .. } => "snowflake parse tree",
        }
    }
}

/// Everything an advisor sees during one check
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub engine: Engine,
    pub rule_type: RuleType,
    /// Status to report violations with
    pub level: Status,
    pub payload: &'a RulePayload,
    pub tree: &'a ParsedTree,
    /// Raw statement text of the batch
    pub statement: &'a str,
}

impl<'a> Context<'a> {
    /// Advice title for this rule
    pub fn title(&self) -> &'static str {
        self.rule_type.as_str()
    }

    /// Advice at the configured level with this rule's title
    pub fn advice(&self, code: crate::advice::Code, content: impl Into<String>) -> Advice {
        Advice::new(self.level, code, self.title(), &content.into())
    }

    /// Statement list of a Postgres-family tree
    pub fn statements(&self) -> Result<&'a [StatementNode], AdvisorError> {
        match self.tree {
            ParsedTree::Ast { statements } => Ok(statements),
            other => Err(self.mismatch("statement list", other)),
        }
    }

    /// Root of a Snowflake parse tree
    pub fn snowflake_tree(&self) -> Result<&'a SnowflakeTree, AdvisorError> {
        match self.tree {
            ParsedTree::Snowflake { root } => Ok(root),
            other => Err(self.mismatch("snowflake parse tree", other)),
        }
    }

    /// First line of the statement text, cut to a short prefix
    pub fn statement_excerpt(&self) -> String {
        const MAX_CHARS: usize = 60;

        let line = self
            .statement
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("");
        if line.chars().count() > MAX_CHARS {
            let mut excerpt: String = line.chars().take(MAX_CHARS).collect();
            excerpt.push_str("...");
            excerpt
        } else {
            line.to_string()
        }
    }

    fn mismatch(&self, expected: &'static str, actual: &ParsedTree) -> AdvisorError {
        AdvisorError::ShapeMismatch {
            engine: self.engine,
            rule_type: self.rule_type,
            expected,
            actual: actual.shape(),
            statement: self.statement_excerpt(),
        }
    }
}

/// A check for one (engine, rule type) pair
///
/// Implementations are stateless; all per-call state lives in the visitor or
/// listener they build inside `check`. Returning an empty list means no
/// violation.
pub trait Advisor: Send + Sync {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_tree::snowflake::SnowflakeRule;
    use crate::parse_tree::{ParseTree, RuleNode};

    fn context<'a>(tree: &'a ParsedTree, payload: &'a RulePayload) -> Context<'a> {
        Context {
            engine: Engine::Postgres,
            rule_type: RuleType::StatementAddCheckNotValid,
            level: Status::Warning,
            payload,
            tree,
            statement: "",
        }
    }

    #[test]
    fn test_shape_accessors() {
        let payload = RulePayload::None;
        let ast = ParsedTree::Ast {
            statements: Vec::new(),
        };
        let ctx = context(&ast, &payload);
        assert!(ctx.statements().unwrap().is_empty());

        let err = ctx.snowflake_tree().unwrap_err();
        assert_eq!(
            err,
            AdvisorError::ShapeMismatch {
                engine: Engine::Postgres,
                rule_type: RuleType::StatementAddCheckNotValid,
                expected: "snowflake parse tree",
                actual: "statement list",
                statement: String::new(),
            }
        );
    }

    #[test]
    fn test_statement_excerpt() {
        let payload = RulePayload::None;
        let ast = ParsedTree::Ast {
            statements: Vec::new(),
        };
        let mut ctx = context(&ast, &payload);

        ctx.statement = "\n  ALTER TABLE t\n  ADD CONSTRAINT c CHECK (x > 0)";
        assert_eq!(ctx.statement_excerpt(), "ALTER TABLE t");

        let long = format!("SELECT {} FROM t", "a, ".repeat(40));
        ctx.statement = &long;
        let excerpt = ctx.statement_excerpt();
        assert_eq!(excerpt.chars().count(), 63);
        assert!(excerpt.ends_with("..."));

        let err = ctx.snowflake_tree().unwrap_err();
        assert!(err.to_string().contains(&excerpt));
    }

    #[test]
    fn test_parsed_tree_json_tag() {
        let tree = ParsedTree::Snowflake {
            root: ParseTree::Rule(RuleNode::new(SnowflakeRule::SnowflakeFile, Vec::new())),
        };
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["kind"], "snowflake");

        let back: ParsedTree = serde_json::from_value(value).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_context_advice() {
        let payload = RulePayload::None;
        let ast = ParsedTree::Ast {
            statements: Vec::new(),
        };
        let advice = context(&ast, &payload).advice(
            crate::advice::Code::StatementAddCheckWithValidation,
            "content",
        );
        assert_eq!(advice.status, Status::Warning);
        assert_eq!(advice.title, "statement.add-check-not-valid");
    }
}
