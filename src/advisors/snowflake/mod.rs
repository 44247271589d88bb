//! Advisors for Snowflake, listening to the grammar parse tree

mod column_maximum_varchar_length;
mod select_no_select_all;
mod statement_summary;
mod table_require_pk;

pub use column_maximum_varchar_length::{ColumnMaximumVarcharLengthAdvisor, VARCHAR_DEFAULT_LENGTH};
pub use select_no_select_all::SelectNoSelectAllAdvisor;
pub use statement_summary::StatementSummaryAdvisor;
pub use table_require_pk::TableRequirePkAdvisor;

use crate::registry::Registry;
use crate::rule::{Engine, RuleType};

pub(crate) fn register(registry: &mut Registry) {
    let engine = Engine::Snowflake;
    registry.register(
        engine,
        RuleType::ColumnMaximumVarcharLength,
        Box::new(ColumnMaximumVarcharLengthAdvisor),
    );
    registry.register(
        engine,
        RuleType::StatementSelectNoSelectAll,
        Box::new(SelectNoSelectAllAdvisor),
    );
    registry.register(engine, RuleType::TableRequirePk, Box::new(TableRequirePkAdvisor));
    registry.register(
        engine,
        RuleType::StatementSummaryReport,
        Box::new(StatementSummaryAdvisor),
    );
}
