//! column.maximum-varchar-length

use crate::advice::{Advice, Code};
use crate::advisor::{Advisor, Context};
use crate::error::AdvisorError;
use crate::parse_tree::snowflake::{walk_snowflake, SnowflakeListener, SnowflakeNode, SnowflakeRule};

/// Implicit length of a VARCHAR declared without one
pub const VARCHAR_DEFAULT_LENGTH: i64 = 16_777_216;

/// Flags VARCHAR columns longer than the configured maximum
pub struct ColumnMaximumVarcharLengthAdvisor;

impl Advisor for ColumnMaximumVarcharLengthAdvisor {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, AdvisorError> {
        let tree = ctx.snowflake_tree()?;
        let maximum = ctx.payload.number()?;

        let mut checker = ColumnMaximumVarcharLengthChecker {
            ctx,
            maximum,
            advice: Vec::new(),
        };
        if maximum > 0 {
            walk_snowflake(&mut checker, tree);
        }
        Ok(checker.advice)
    }
}

struct ColumnMaximumVarcharLengthChecker<'c, 'a> {
    ctx: &'c Context<'a>,
    maximum: i64,
    advice: Vec<Advice>,
}

impl SnowflakeListener for ColumnMaximumVarcharLengthChecker<'_, '_> {
    fn enter_data_type(&mut self, ctx: &SnowflakeNode) {
        if ctx.token("VARCHAR").is_none() {
            return;
        }

        let length = match ctx.child(SnowflakeRule::Num) {
            Some(num) => match num.text().parse::<i64>() {
                Ok(n) => n,
                Err(_) => return,
            },
            None => VARCHAR_DEFAULT_LENGTH,
        };

        if length > self.maximum {
            let content = format!("The maximum varchar length is {}.", self.maximum);
            self.advice.push(
                self.ctx
                    .advice(Code::VarcharLengthExceedsLimit, content)
                    .at_line(ctx.line())
                    .with_column(ctx.column()),
            );
        }
    }
}
