//! statement.where.require

use crate::advice::{Advice, Code};
use crate::advisor::{Advisor, Context};
use crate::ast::{walk_statements, Node, Statement, Visitor};
use crate::error::AdvisorError;

/// Flags UPDATE and DELETE statements without a WHERE clause
pub struct WhereRequirementAdvisor;

impl Advisor for WhereRequirementAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let mut checker = WhereRequirementChecker {
            ctx,
            text: String::new(),
            line: 0,
            advice: Vec::new(),
        };
        walk_statements(&mut checker, ctx.statements()?);
        Ok(checker.advice)
    }
}

struct WhereRequirementChecker<'c, 'a> {
    ctx: &'c Context<'a>,
    text: String,
    line: usize,
    advice: Vec<Advice>,
}

impl Visitor for WhereRequirementChecker<'_, '_> {
    fn visit(&mut self, node: Node<'_>) -> Option<&mut dyn Visitor> {
        match node {
            // Only DML can carry a WHERE clause
            Node::Statement(stmt) if !stmt.stmt.is_dml() => return None,
            Node::Statement(stmt) => {
                self.line = stmt.last_line;
                self.text = stmt.text.trim().to_string();
            }
            Node::Stmt(Statement::Update { where_clause, .. })
            | Node::Stmt(Statement::Delete { where_clause, .. }) => {
                if where_clause.as_deref().map_or(true, |w| w.trim().is_empty()) {
                    let content = format!("\"{}\" requires WHERE clause", self.text);
                    self.advice.push(
                        self.ctx
                            .advice(Code::StatementNoWhere, content)
                            .at_line(self.line),
                    );
                }
                return None;
            }
            _ => return None,
        }
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::advice::Code;
    use crate::advisors::test_util::pg_advise;
    use crate::ast::{Statement, StatementNode, TableName};
    use crate::rule::{RuleLevel, RuleType};

    fn run(statements: Vec<StatementNode>) -> Vec<crate::advice::Advice> {
        pg_advise(
            RuleType::StatementWhereRequire,
            RuleLevel::Warning,
            serde_json::Value::Null,
            statements,
        )
    }

    #[test]
    fn test_delete_without_where() {
        let advice = run(vec![StatementNode::new(
            "DELETE FROM t",
            2,
            Statement::Delete {
                table: TableName::new("t"),
                where_clause: None,
            },
        )]);
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, Code::StatementNoWhere);
        assert_eq!(advice[0].content, "\"DELETE FROM t\" requires WHERE clause");
        assert_eq!(advice[0].line, 2);
    }

    #[test]
    fn test_update_with_where_passes() {
        let advice = run(vec![
            StatementNode::new(
                "UPDATE t SET a = 1 WHERE id = 1",
                1,
                Statement::Update {
                    table: TableName::new("t"),
                    where_clause: Some("id = 1".to_string()),
                },
            ),
            StatementNode::new(
                "SELECT * FROM t",
                2,
                Statement::Select {
                    from: vec![TableName::new("t")],
                },
            ),
        ]);
        assert!(advice[0].is_ok());
    }

    #[test]
    fn test_update_without_where() {
        let advice = run(vec![StatementNode::new(
            "UPDATE public.t SET a = 1",
            1,
            Statement::Update {
                table: TableName::qualified("public", "t"),
                where_clause: Some("  ".to_string()),
            },
        )]);
        assert_eq!(advice[0].content, "\"UPDATE public.t SET a = 1\" requires WHERE clause");
    }
}
