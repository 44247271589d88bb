//! Built-in advisors

pub mod pg;
pub mod snowflake;

use crate::registry::Registry;

/// Register every built-in advisor
pub fn register_builtin(registry: &mut Registry) {
    pg::register(registry);
    snowflake::register(registry);
}
