//! Postgres-family statement AST
//!
//! The external parser hands statements over in this shape. Advisors never
//! match on the owned types directly while walking; they receive borrowed
//! [`Node`] views from [`walk`].

mod visitor;

pub use visitor::{walk, walk_statements, Visitor};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed statement plus its source text and position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementNode {
    /// Original statement text
    pub text: String,
    /// Last source line of the statement (1-based)
    pub last_line: usize,
    pub stmt: Statement,
}

impl StatementNode {
    pub fn new(text: &str, last_line: usize, stmt: Statement) -> Self {
        Self {
            text: text.to_string(),
            last_line,
            stmt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    CreateTable {
        table: TableName,
        #[serde(default)]
        columns: Vec<ColumnDef>,
        #[serde(default)]
        constraints: Vec<ConstraintDef>,
    },
    AlterTable {
        table: TableName,
        #[serde(default)]
        cmds: Vec<AlterTableCmd>,
    },
    DropTable {
        tables: Vec<TableName>,
    },
    CreateIndex {
        index: IndexDef,
    },
    Insert {
        table: TableName,
        #[serde(default)]
        columns: Vec<String>,
        /// Number of VALUES rows, 0 for INSERT ... SELECT
        #[serde(default)]
        value_rows: usize,
    },
    Update {
        table: TableName,
        #[serde(default)]
        where_clause: Option<String>,
    },
    Delete {
        table: TableName,
        #[serde(default)]
        where_clause: Option<String>,
    },
    Select {
        #[serde(default)]
        from: Vec<TableName>,
    },
}

impl Statement {
    /// Statement kind as reported in summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::CreateTable { .. } => "CREATE_TABLE",
            Statement::AlterTable { .. } => "ALTER_TABLE",
            Statement::DropTable { .. } => "DROP_TABLE",
            Statement::CreateIndex { .. } => "CREATE_INDEX",
            Statement::Insert { .. } => "INSERT",
            Statement::Update { .. } => "UPDATE",
            Statement::Delete { .. } => "DELETE",
            Statement::Select { .. } => "SELECT",
        }
    }

    /// Check if this is a data-manipulation statement
    pub fn is_dml(&self) -> bool {
        matches!(
            self,
            Statement::Insert { .. } | Statement::Update { .. } | Statement::Delete { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AlterTableCmd {
    AddColumn { column: ColumnDef },
    DropColumn { name: String },
    AddConstraint { constraint: ConstraintDef },
    AlterColumnType { column: String, data_type: DataType },
    SetNotNull { column: String },
    RenameTable { new_name: String },
}

/// Possibly schema-qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl TableName {
    pub fn new(name: &str) -> Self {
        Self {
            schema: None,
            name: name.to_string(),
        }
    }

    pub fn qualified(schema: &str, name: &str) -> Self {
        Self {
            schema: Some(schema.to_string()),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub constraints: Vec<ConstraintDef>,
}

/// Column type name with its modifiers, e.g. `varchar(20)` or `numeric(10, 2)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<i64>,
}

impl DataType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            modifiers: Vec::new(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.modifiers.is_empty() {
            let mods: Vec<String> = self.modifiers.iter().map(|m| m.to_string()).collect();
            write!(f, "({})", mods.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    Check,
    PrimaryKey,
    Unique,
    ForeignKey,
    NotNull,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    /// Set for `NOT VALID` constraints
    #[serde(default)]
    pub skip_validation: bool,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl ConstraintDef {
    pub fn new(constraint_type: ConstraintType) -> Self {
        Self {
            name: None,
            constraint_type,
            skip_validation: false,
            keys: Vec::new(),
            expression: None,
        }
    }

    pub fn not_valid(mut self) -> Self {
        self.skip_validation = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    pub name: String,
    pub table: TableName,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub concurrently: bool,
}

/// Borrowed view of an AST node, handed to visitors
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Statement(&'a StatementNode),
    Stmt(&'a Statement),
    AlterCmd(&'a AlterTableCmd),
    Column(&'a ColumnDef),
    Constraint(&'a ConstraintDef),
    Index(&'a IndexDef),
}

impl<'a> Node<'a> {
    /// Direct children in source order
    pub fn children(self) -> Vec<Node<'a>> {
        match self {
            Node::Statement(s) => vec![Node::Stmt(&s.stmt)],
            Node::Stmt(stmt) => match stmt {
                Statement::CreateTable {
                    columns,
                    constraints,
                    ..
                } => columns
                    .iter()
                    .map(Node::Column)
                    .chain(constraints.iter().map(Node::Constraint))
                    .collect(),
                Statement::AlterTable { cmds, .. } => cmds.iter().map(Node::AlterCmd).collect(),
                Statement::CreateIndex { index } => vec![Node::Index(index)],
                _ => Vec::new(),
            },
            Node::AlterCmd(cmd) => match cmd {
                AlterTableCmd::AddColumn { column } => vec![Node::Column(column)],
                AlterTableCmd::AddConstraint { constraint } => vec![Node::Constraint(constraint)],
                _ => Vec::new(),
            },
            Node::Column(column) => column.constraints.iter().map(Node::Constraint).collect(),
            Node::Constraint(_) | Node::Index(_) => Vec::new(),
        }
    }
}

impl<'a> From<&'a StatementNode> for Node<'a> {
    fn from(node: &'a StatementNode) -> Self {
        Node::Statement(node)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(stmt: &'a Statement) -> Self {
        Node::Stmt(stmt)
    }
}
