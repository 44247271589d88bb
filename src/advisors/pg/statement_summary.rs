//! builtin.statement.summary-report for Postgres-family statements

use crate::advice::{Advice, StatementSummary};
use crate::advisor::{Advisor, Context};
use crate::ast::{walk_statements, Node, Statement, TableName, Visitor};
use crate::error::AdvisorError;

const DEFAULT_SCHEMA: &str = "public";

/// Reports statement kinds, inserted rows and touched tables of a batch
pub struct StatementSummaryAdvisor;

impl Advisor for StatementSummaryAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let mut collector = SummaryCollector::default();
        walk_statements(&mut collector, ctx.statements()?);
        Ok(vec![Advice::summary(ctx.title(), collector.summary)])
    }
}

#[derive(Default)]
struct SummaryCollector {
    summary: StatementSummary,
}

impl SummaryCollector {
    fn touch(&mut self, table: &TableName) {
        let schema = table.schema.as_deref().unwrap_or(DEFAULT_SCHEMA);
        self.summary
            .changed_resources
            .add_table("", schema, &table.name);
    }
}

impl Visitor for SummaryCollector {
    fn visit(&mut self, node: Node<'_>) -> Option<&mut dyn Visitor> {
        let Node::Stmt(stmt) = node else {
            return Some(self);
        };

        self.summary.add_statement_type(stmt.kind());
        match stmt {
            Statement::CreateTable { table, .. }
            | Statement::AlterTable { table, .. }
            | Statement::Update { table, .. }
            | Statement::Delete { table, .. } => self.touch(table),
            Statement::DropTable { tables } => tables.iter().for_each(|t| self.touch(t)),
            Statement::CreateIndex { index } => self.touch(&index.table),
            Statement::Insert {
                table, value_rows, ..
            } => {
                self.touch(table);
                self.summary.affected_rows += *value_rows as i64;
            }
            Statement::Select { .. } => {}
        }
        None
    }
}
