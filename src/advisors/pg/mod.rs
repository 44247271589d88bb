//! Advisors for Postgres-family engines, walking the statement AST

mod add_check_not_valid;
mod column_type_disallow_list;
mod create_index_concurrently;
mod naming_table;
mod statement_summary;
mod where_require;

pub use add_check_not_valid::StatementAddCheckNotValidAdvisor;
pub use column_type_disallow_list::ColumnTypeDisallowListAdvisor;
pub use create_index_concurrently::CreateIndexConcurrentlyAdvisor;
pub use naming_table::NamingTableConventionAdvisor;
pub use statement_summary::StatementSummaryAdvisor;
pub use where_require::WhereRequirementAdvisor;

use crate::registry::Registry;
use crate::rule::{Engine, RuleType};

pub(crate) fn register(registry: &mut Registry) {
    let engine = Engine::Postgres;
    registry.register(
        engine,
        RuleType::StatementAddCheckNotValid,
        Box::new(StatementAddCheckNotValidAdvisor),
    );
    registry.register(
        engine,
        RuleType::StatementWhereRequire,
        Box::new(WhereRequirementAdvisor),
    );
    registry.register(
        engine,
        RuleType::StatementCreateIndexConcurrently,
        Box::new(CreateIndexConcurrentlyAdvisor),
    );
    registry.register(
        engine,
        RuleType::NamingTable,
        Box::new(NamingTableConventionAdvisor),
    );
    registry.register(
        engine,
        RuleType::ColumnTypeDisallowList,
        Box::new(ColumnTypeDisallowListAdvisor),
    );
    registry.register(
        engine,
        RuleType::StatementSummaryReport,
        Box::new(StatementSummaryAdvisor),
    );
}
