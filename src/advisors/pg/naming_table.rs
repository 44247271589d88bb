//! naming.table

use crate::advice::{Advice, Code};
use crate::advisor::{Advisor, Context};
use crate::ast::{walk_statements, AlterTableCmd, Node, Statement, Visitor};
use crate::error::AdvisorError;
use crate::payload::NamingFormat;

/// Checks table names of CREATE TABLE and ALTER TABLE ... RENAME TO
pub struct NamingTableConventionAdvisor;

impl Advisor for NamingTableConventionAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let statements = ctx.statements()?;
        let mut checker = NamingTableConventionChecker {
            ctx,
            naming: ctx.payload.naming()?,
            line: 0,
            advice: Vec::new(),
        };
        walk_statements(&mut checker, statements);
        Ok(checker.advice)
    }
}

struct NamingTableConventionChecker<'c, 'a> {
    ctx: &'c Context<'a>,
    naming: &'a NamingFormat,
    line: usize,
    advice: Vec<Advice>,
}

impl NamingTableConventionChecker<'_, '_> {
    fn check_name(&mut self, name: &str) {
        if !self.naming.format.is_match(name) {
            let content = format!(
                "\"{}\" mismatches table naming convention, naming format should be {:?}",
                name,
                self.naming.format.as_str()
            );
            self.advice.push(
                self.ctx
                    .advice(Code::NamingTableConventionMismatch, content)
                    .at_line(self.line),
            );
        }
        if self.naming.max_length > 0 && name.len() > self.naming.max_length {
            let content = format!(
                "\"{}\" mismatches table naming convention, its length should be within {} characters",
                name, self.naming.max_length
            );
            self.advice.push(
                self.ctx
                    .advice(Code::NamingTableConventionMismatch, content)
                    .at_line(self.line),
            );
        }
    }
}

impl Visitor for NamingTableConventionChecker<'_, '_> {
    fn visit(&mut self, node: Node<'_>) -> Option<&mut dyn Visitor> {
        match node {
            Node::Statement(stmt) => self.line = stmt.last_line,
            Node::Stmt(Statement::CreateTable { table, .. }) => self.check_name(&table.name),
            Node::AlterCmd(AlterTableCmd::RenameTable { new_name }) => self.check_name(new_name),
            _ => {}
        }
        Some(self)
    }
}
