//! Snowflake grammar productions and listener

use super::{walk, Listener, ParseTree, RuleNode, Token};
use serde::{Deserialize, Serialize};

/// Productions of the Snowflake grammar that advisors look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnowflakeRule {
    SnowflakeFile,
    Batch,
    CreateTable,
    AlterTable,
    DropTable,
    ColumnDeclItem,
    FullColDecl,
    InlineConstraint,
    OutOfLineConstraint,
    DataType,
    Num,
    ObjectName,
    Id,
    SelectStatement,
    SelectListElem,
    ColumnElem,
    InsertStatement,
    ValuesBuilder,
    ExprList,
    UpdateStatement,
    DeleteStatement,
    /// Any production the advisors have no interest in
    #[serde(other)]
    Other,
}

pub type SnowflakeTree = ParseTree<SnowflakeRule>;
pub type SnowflakeNode = RuleNode<SnowflakeRule>;

macro_rules! snowflake_listener {
    ($($rule:ident => $enter:ident, $exit:ident;)*) => {
        /// Listener over Snowflake productions
        ///
        /// Implementors override only the callbacks they need.
        pub trait SnowflakeListener {
            fn enter_every_rule(&mut self, _ctx: &SnowflakeNode) {}

            fn exit_every_rule(&mut self, _ctx: &SnowflakeNode) {}

            fn visit_terminal(&mut self, _token: &Token) {}

            $(
                fn $enter(&mut self, _ctx: &SnowflakeNode) {}

                fn $exit(&mut self, _ctx: &SnowflakeNode) {}
            )*
        }

        impl<L: SnowflakeListener + ?Sized> Listener<SnowflakeRule> for Dispatch<'_, L> {
            fn enter_rule(&mut self, node: &SnowflakeNode) {
                self.0.enter_every_rule(node);
                match node.rule {
                    $(SnowflakeRule::$rule => self.0.$enter(node),)*
                    _ => {}
                }
            }

            fn exit_rule(&mut self, node: &SnowflakeNode) {
                match node.rule {
                    $(SnowflakeRule::$rule => self.0.$exit(node),)*
                    _ => {}
                }
                self.0.exit_every_rule(node);
            }

            fn visit_terminal(&mut self, token: &Token) {
                self.0.visit_terminal(token);
            }
        }
    };
}

/// Routes generic walk events to the per-production callbacks
struct Dispatch<'l, L: ?Sized>(&'l mut L);

snowflake_listener! {
    Batch => enter_batch, exit_batch;
    CreateTable => enter_create_table, exit_create_table;
    AlterTable => enter_alter_table, exit_alter_table;
    DropTable => enter_drop_table, exit_drop_table;
    FullColDecl => enter_full_col_decl, exit_full_col_decl;
    InlineConstraint => enter_inline_constraint, exit_inline_constraint;
    OutOfLineConstraint => enter_out_of_line_constraint, exit_out_of_line_constraint;
    DataType => enter_data_type, exit_data_type;
    ObjectName => enter_object_name, exit_object_name;
    SelectStatement => enter_select_statement, exit_select_statement;
    ColumnElem => enter_column_elem, exit_column_elem;
    InsertStatement => enter_insert_statement, exit_insert_statement;
    ValuesBuilder => enter_values_builder, exit_values_builder;
    UpdateStatement => enter_update_statement, exit_update_statement;
    DeleteStatement => enter_delete_statement, exit_delete_statement;
}

/// Walk a Snowflake tree with a [`SnowflakeListener`]
pub fn walk_snowflake<L: SnowflakeListener + ?Sized>(listener: &mut L, tree: &SnowflakeTree) {
    walk(&mut Dispatch(listener), tree);
}

/// Normalized identifier text: unquoted identifiers fold to upper case,
/// quoted identifiers keep their case without the quotes
pub fn normalize_id(id: &SnowflakeNode) -> String {
    let Some(token) = id.start() else {
        return String::new();
    };
    if token.kind == "DOUBLE_QUOTE_ID" {
        let text = token.text.as_str();
        let inner = text
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text);
        inner.replace("\"\"", "\"")
    } else {
        token.text.to_uppercase()
    }
}

/// Split an `object_name` into its (database, schema, object) parts
pub fn object_name_parts(name: &SnowflakeNode) -> (Option<String>, Option<String>, String) {
    let mut ids: Vec<String> = name
        .children_of(SnowflakeRule::Id)
        .into_iter()
        .map(normalize_id)
        .collect();
    let object = ids.pop().unwrap_or_default();
    let schema = ids.pop();
    let database = ids.pop();
    (database, schema, object)
}
