//! statement.add-check-not-valid

use crate::advice::{Advice, Code};
use crate::advisor::{Advisor, Context};
use crate::ast::{walk_statements, AlterTableCmd, ConstraintType, Node, Visitor};
use crate::error::AdvisorError;

/// Flags check constraints added without `NOT VALID`
pub struct StatementAddCheckNotValidAdvisor;

impl Advisor for StatementAddCheckNotValidAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let statements = ctx.statements()?;
        let mut checker = AddCheckNotValidChecker {
            ctx,
            line: 0,
            advice: Vec::new(),
        };
        walk_statements(&mut checker, statements);
        Ok(checker.advice)
    }
}

struct AddCheckNotValidChecker<'c, 'a> {
    ctx: &'c Context<'a>,
    line: usize,
    advice: Vec<Advice>,
}

impl Visitor for AddCheckNotValidChecker<'_, '_> {
    fn visit(&mut self, node: Node<'_>) -> Option<&mut dyn Visitor> {
        match node {
            Node::Statement(stmt) => self.line = stmt.last_line,
            Node::AlterCmd(AlterTableCmd::AddConstraint { constraint })
                if constraint.constraint_type == ConstraintType::Check
                    && !constraint.skip_validation =>
            {
                self.advice.push(
                    self.ctx
                        .advice(
                            Code::StatementAddCheckWithValidation,
                            "Adding check constraints with validation will block reads and writes. \
                             You can add check constraints not valid and then validate separately",
                        )
                        .at_line(self.line),
                );
            }
            _ => {}
        }
        Some(self)
    }
}
