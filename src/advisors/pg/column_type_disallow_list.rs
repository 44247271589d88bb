//! column.type-disallow-list

use crate::advice::{Advice, Code};
use crate::advisor::{Advisor, Context};
use crate::ast::{walk_statements, AlterTableCmd, ColumnDef, Node, Statement, Visitor};
use crate::error::AdvisorError;

/// Flags columns declared with a type from the configured list
pub struct ColumnTypeDisallowListAdvisor;

impl Advisor for ColumnTypeDisallowListAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let statements = ctx.statements()?;
        let disallowed = ctx
            .payload
            .string_list()?
            .iter()
            .map(|t| t.to_uppercase())
            .collect();
        let mut checker = ColumnTypeDisallowListChecker {
            ctx,
            disallowed,
            table: String::new(),
            line: 0,
            advice: Vec::new(),
        };
        walk_statements(&mut checker, statements);
        Ok(checker.advice)
    }
}

struct ColumnTypeDisallowListChecker<'c, 'a> {
    ctx: &'c Context<'a>,
    disallowed: Vec<String>,
    table: String,
    line: usize,
    advice: Vec<Advice>,
}

impl ColumnTypeDisallowListChecker<'_, '_> {
    fn check_type(&mut self, column: &str, type_name: &str) {
        let upper = type_name.to_uppercase();
        if self.disallowed.iter().any(|t| *t == upper) {
            let content = format!(
                "Disallow column type {} but column \"{}\".\"{}\" is",
                upper, self.table, column
            );
            self.advice.push(
                self.ctx
                    .advice(Code::DisabledColumnType, content)
                    .at_line(self.line),
            );
        }
    }
}

impl Visitor for ColumnTypeDisallowListChecker<'_, '_> {
    fn visit(&mut self, node: Node<'_>) -> Option<&mut dyn Visitor> {
        match node {
            Node::Statement(stmt) => self.line = stmt.last_line,
            Node::Stmt(Statement::CreateTable { table, .. })
            | Node::Stmt(Statement::AlterTable { table, .. }) => self.table = table.name.clone(),
            Node::Column(ColumnDef {
                name, data_type, ..
            }) => self.check_type(name, &data_type.name),
            Node::AlterCmd(AlterTableCmd::AlterColumnType { column, data_type }) => {
                self.check_type(column, &data_type.name)
            }
            _ => {}
        }
        Some(self)
    }
}
