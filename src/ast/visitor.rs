//! Pre-order AST walk

use super::{Node, StatementNode};

/// AST visitor
///
/// `visit` is called for every node before its children. Returning `None`
/// skips the subtree; returning a visitor walks the children with it, which
/// is usually `Some(self)`.
pub trait Visitor {
    fn visit(&mut self, node: Node<'_>) -> Option<&mut dyn Visitor>;
}

/// Walk `node` and its descendants in document order
pub fn walk(visitor: &mut dyn Visitor, node: Node<'_>) {
    if let Some(next) = visitor.visit(node) {
        for child in node.children() {
            walk(&mut *next, child);
        }
    }
}

/// Walk every statement of a batch in order
pub fn walk_statements(visitor: &mut dyn Visitor, statements: &[StatementNode]) {
    for stmt in statements {
        walk(visitor, Node::Statement(stmt));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        AlterTableCmd, ColumnDef, ConstraintDef, ConstraintType, DataType, Statement, TableName,
    };

    #[derive(Default)]
    struct Recorder {
        seen: Vec<&'static str>,
        prune_alter: bool,
    }

    impl Visitor for Recorder {
        fn visit(&mut self, node: Node<'_>) -> Option<&mut dyn Visitor> {
            let label = match node {
                Node::Statement(_) => "statement",
                Node::Stmt(Statement::AlterTable { .. }) => "alter_table",
                Node::Stmt(_) => "stmt",
                Node::AlterCmd(_) => "cmd",
                Node::Column(_) => "column",
                Node::Constraint(_) => "constraint",
                Node::Index(_) => "index",
            };
            self.seen.push(label);
            if self.prune_alter && label == "alter_table" {
                return None;
            }
            Some(self)
        }
    }

    fn batch() -> Vec<StatementNode> {
        vec![StatementNode::new(
            "ALTER TABLE t ADD COLUMN a int NOT NULL",
            1,
            Statement::AlterTable {
                table: TableName::new("t"),
                cmds: vec![AlterTableCmd::AddColumn {
                    column: ColumnDef {
                        name: "a".to_string(),
                        data_type: DataType::new("int"),
                        constraints: vec![ConstraintDef::new(ConstraintType::NotNull)],
                    },
                }],
            },
        )]
    }

    #[test]
    fn test_walk_pre_order() {
        let mut recorder = Recorder::default();
        walk_statements(&mut recorder, &batch());
        assert_eq!(
            recorder.seen,
            vec!["statement", "alter_table", "cmd", "column", "constraint"]
        );
    }

    #[test]
    fn test_walk_prunes_on_none() {
        let mut recorder = Recorder {
            prune_alter: true,
            ..Default::default()
        };
        walk_statements(&mut recorder, &batch());
        assert_eq!(recorder.seen, vec!["statement", "alter_table"]);
    }
}
