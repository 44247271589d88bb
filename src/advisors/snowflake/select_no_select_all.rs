//! statement.select.no-select-all

use crate::advice::{Advice, Code};
use crate::advisor::{Advisor, Context};
use crate::error::AdvisorError;
use crate::parse_tree::snowflake::{walk_snowflake, SnowflakeListener, SnowflakeNode};

/// Flags `SELECT *` and `SELECT t.*`
pub struct SelectNoSelectAllAdvisor;

impl Advisor for SelectNoSelectAllAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let mut checker = SelectNoSelectAllChecker {
            ctx,
            advice: Vec::new(),
        };
        walk_snowflake(&mut checker, ctx.snowflake_tree()?);
        Ok(checker.advice)
    }
}

struct SelectNoSelectAllChecker<'c, 'a> {
    ctx: &'c Context<'a>,
    advice: Vec<Advice>,
}

impl SnowflakeListener for SelectNoSelectAllChecker<'_, '_> {
    fn enter_column_elem(&mut self, ctx: &SnowflakeNode) {
        if let Some(star) = ctx.token("STAR") {
            self.advice.push(
                self.ctx
                    .advice(Code::StatementSelectAll, "Avoid using SELECT *.")
                    .at_line(star.line)
                    .with_column(star.column),
            );
        }
    }
}
