//! Catalog rows and the normalized descriptors built from them.
//!
//! The `Db*` types mirror the rows returned by the catalog queries of
//! [`PostgresGrammar`](crate::dialect::PostgresGrammar); the
//! [`Processor`](crate::processor::Processor) turns them into descriptors.

use serde::{Deserialize, Serialize};

/// Raw row of the column query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbColumn {
    /// Column name.
    pub name: String,
    /// Base type name (`int4`, `varchar`, ...).
    pub type_name: String,
    /// Formatted type (`integer`, `character varying(255)`, ...).
    #[serde(rename = "type")]
    pub column_type: String,
    /// Collation, if any.
    pub collation: Option<String>,
    /// Nullability flag as reported by the driver (`true`, `t`, `1`, ...).
    pub nullable: String,
    /// Default expression, if any.
    pub default: Option<String>,
    /// Column comment, if any.
    pub comment: Option<String>,
}

/// Normalized column descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Base type name.
    pub type_name: String,
    /// Formatted type.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Collation, if any.
    pub collation: Option<String>,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default expression, if any.
    pub default: Option<String>,
    /// Column comment, if any.
    pub comment: Option<String>,
    /// Whether the default draws from a sequence.
    pub autoincrement: bool,
}

/// Raw row of the foreign key query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbForeignKey {
    /// Constraint name.
    pub name: String,
    /// Comma-joined referencing columns.
    pub columns: String,
    /// Schema of the referenced table.
    pub foreign_schema: String,
    /// Referenced table.
    pub foreign_table: String,
    /// Comma-joined referenced columns.
    pub foreign_columns: String,
    /// Single-letter `confupdtype` code.
    pub on_update: String,
    /// Single-letter `confdeltype` code.
    pub on_delete: String,
}

/// Normalized foreign key descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Schema of the referenced table.
    pub foreign_schema: String,
    /// Referenced table.
    pub foreign_table: String,
    /// Referenced columns.
    pub foreign_columns: Vec<String>,
    /// Action on update (`cascade`, `restrict`, ...).
    pub on_update: String,
    /// Action on delete.
    pub on_delete: String,
}

/// Raw row of the index query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbIndex {
    /// Index name.
    pub name: String,
    /// Comma-joined indexed columns.
    pub columns: String,
    /// Access method.
    #[serde(rename = "type")]
    pub index_type: String,
    /// Whether the index is unique.
    pub unique: bool,
    /// Whether the index backs the primary key.
    pub primary: bool,
}

/// Normalized index descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Index {
    /// Index name, lower-cased.
    pub name: String,
    /// Indexed columns.
    pub columns: Vec<String>,
    /// Access method, lower-cased.
    #[serde(rename = "type")]
    pub index_type: String,
    /// Whether the index is unique.
    pub unique: bool,
    /// Whether the index backs the primary key.
    pub primary: bool,
}

/// A table as listed by the table query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub schema: String,
    /// Total relation size in bytes.
    pub size: i64,
    pub comment: Option<String>,
}

impl Table {
    /// Creates a table entry with no size or comment.
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            size: 0,
            comment: None,
        }
    }
}

/// A user-defined type as listed by the type query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
    pub schema: String,
    /// Type kind (`domain`, `enum`, ...) or its raw single-letter code.
    #[serde(rename = "type")]
    pub kind: String,
    /// Type category (`string`, `numeric`, ...) or its raw code.
    pub category: String,
    /// Whether the type was created implicitly (array and multirange types).
    pub implicit: bool,
}

impl Type {
    /// Creates an explicit type entry.
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            kind: kind.into(),
            category: String::new(),
            implicit: false,
        }
    }
}

/// A view as listed by the view query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub schema: String,
    pub definition: String,
}

impl View {
    /// Creates a view entry.
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            definition: String::new(),
        }
    }
}
