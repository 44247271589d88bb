//! statement.create-index-concurrently

use crate::advice::{Advice, Code};
use crate::advisor::{Advisor, Context};
use crate::ast::{walk_statements, Node, Visitor};
use crate::error::AdvisorError;

/// Flags `CREATE INDEX` without `CONCURRENTLY`
pub struct CreateIndexConcurrentlyAdvisor;

impl Advisor for CreateIndexConcurrentlyAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let mut checker = CreateIndexConcurrentlyChecker {
            ctx,
            line: 0,
            advice: Vec::new(),
        };
        walk_statements(&mut checker, ctx.statements()?);
        Ok(checker.advice)
    }
}

struct CreateIndexConcurrentlyChecker<'c, 'a> {
    ctx: &'c Context<'a>,
    line: usize,
    advice: Vec<Advice>,
}

impl Visitor for CreateIndexConcurrentlyChecker<'_, '_> {
    fn visit(&mut self, node: Node<'_>) -> Option<&mut dyn Visitor> {
        match node {
            Node::Statement(stmt) => self.line = stmt.last_line,
            Node::Index(index) if !index.concurrently => {
                self.advice.push(
                    self.ctx
                        .advice(
                            Code::CreateIndexUnconcurrently,
                            "Creating indexes will block writes on the table, unless use CONCURRENTLY",
                        )
                        .at_line(self.line),
                );
            }
            _ => {}
        }
        Some(self)
    }
}
