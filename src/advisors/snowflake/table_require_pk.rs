//! table.require-pk

use crate::advice::{Advice, Code};
use crate::advisor::{Advisor, Context};
use crate::error::AdvisorError;
use crate::parse_tree::snowflake::{
    object_name_parts, walk_snowflake, SnowflakeListener, SnowflakeNode, SnowflakeRule,
};

/// Flags CREATE TABLE statements that declare no primary key
pub struct TableRequirePkAdvisor;

impl Advisor for TableRequirePkAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let mut checker = TableRequirePkChecker {
            ctx,
            current: None,
            advice: Vec::new(),
        };
        walk_snowflake(&mut checker, ctx.snowflake_tree()?);
        Ok(checker.advice)
    }
}

struct TableRequirePkChecker<'c, 'a> {
    ctx: &'c Context<'a>,
    /// Whether the table being created has a primary key so far
    current: Option<bool>,
    advice: Vec<Advice>,
}

impl TableRequirePkChecker<'_, '_> {
    fn constraint(&mut self, ctx: &SnowflakeNode) {
        if ctx.token("PRIMARY").is_some() {
            if let Some(has_pk) = self.current.as_mut() {
                *has_pk = true;
            }
        }
    }
}

impl SnowflakeListener for TableRequirePkChecker<'_, '_> {
    fn enter_create_table(&mut self, _ctx: &SnowflakeNode) {
        self.current = Some(false);
    }

    fn enter_inline_constraint(&mut self, ctx: &SnowflakeNode) {
        self.constraint(ctx);
    }

    fn enter_out_of_line_constraint(&mut self, ctx: &SnowflakeNode) {
        self.constraint(ctx);
    }

    fn exit_create_table(&mut self, ctx: &SnowflakeNode) {
        if self.current.take() == Some(false) {
            let table = ctx
                .child(SnowflakeRule::ObjectName)
                .map(|name| object_name_parts(name).2)
                .unwrap_or_default();
            self.advice.push(
                self.ctx
                    .advice(Code::TableNoPK, format!("Table {} requires PRIMARY KEY", table))
                    .at_line(ctx.line()),
            );
        }
    }
}
