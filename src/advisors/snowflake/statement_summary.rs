//! builtin.statement.summary-report for Snowflake

use crate::advice::{Advice, StatementSummary};
use crate::advisor::{Advisor, Context};
use crate::error::AdvisorError;
use crate::parse_tree::snowflake::{
    object_name_parts, walk_snowflake, SnowflakeListener, SnowflakeNode, SnowflakeRule,
};

const DEFAULT_SCHEMA: &str = "PUBLIC";

/// Reports statement kinds, inserted rows and touched tables of a batch
pub struct StatementSummaryAdvisor;

impl Advisor for StatementSummaryAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let mut collector = SummaryCollector::default();
        walk_snowflake(&mut collector, ctx.snowflake_tree()?);
        Ok(vec![Advice::summary(ctx.title(), collector.summary)])
    }
}

#[derive(Default)]
struct SummaryCollector {
    summary: StatementSummary,
    /// Nesting depth of statement productions, sub-queries are not classified
    depth: usize,
}

impl SummaryCollector {
    fn enter(&mut self, kind: &str, ctx: &SnowflakeNode, changes: bool) {
        if self.depth == 0 {
            self.summary.add_statement_type(kind);
            if changes {
                ctx.children_of(SnowflakeRule::ObjectName)
                    .into_iter()
                    .for_each(|name| self.touch(name));
            }
        }
        self.depth += 1;
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn touch(&mut self, name: &SnowflakeNode) {
        let (database, schema, table) = object_name_parts(name);
        self.summary.changed_resources.add_table(
            database.as_deref().unwrap_or(""),
            schema.as_deref().unwrap_or(DEFAULT_SCHEMA),
            &table,
        );
    }
}

impl SnowflakeListener for SummaryCollector {
    fn enter_create_table(&mut self, ctx: &SnowflakeNode) {
        self.enter("CREATE_TABLE", ctx, true);
    }

    fn exit_create_table(&mut self, _ctx: &SnowflakeNode) {
        self.exit();
    }

    fn enter_alter_table(&mut self, ctx: &SnowflakeNode) {
        self.enter("ALTER_TABLE", ctx, true);
    }

    fn exit_alter_table(&mut self, _ctx: &SnowflakeNode) {
        self.exit();
    }

    fn enter_drop_table(&mut self, ctx: &SnowflakeNode) {
        self.enter("DROP_TABLE", ctx, true);
    }

    fn exit_drop_table(&mut self, _ctx: &SnowflakeNode) {
        self.exit();
    }

    fn enter_insert_statement(&mut self, ctx: &SnowflakeNode) {
        self.enter("INSERT", ctx, true);
    }

    fn exit_insert_statement(&mut self, _ctx: &SnowflakeNode) {
        self.exit();
    }

    fn enter_values_builder(&mut self, ctx: &SnowflakeNode) {
        if self.depth == 1 {
            self.summary.affected_rows += ctx.children_of(SnowflakeRule::ExprList).len() as i64;
        }
    }

    fn enter_update_statement(&mut self, ctx: &SnowflakeNode) {
        self.enter("UPDATE", ctx, true);
    }

    fn exit_update_statement(&mut self, _ctx: &SnowflakeNode) {
        self.exit();
    }

    fn enter_delete_statement(&mut self, ctx: &SnowflakeNode) {
        self.enter("DELETE", ctx, true);
    }

    fn exit_delete_statement(&mut self, _ctx: &SnowflakeNode) {
        self.exit();
    }

    fn enter_select_statement(&mut self, ctx: &SnowflakeNode) {
        self.enter("SELECT", ctx, false);
    }

    fn exit_select_statement(&mut self, _ctx: &SnowflakeNode) {
        self.exit();
    }
}
