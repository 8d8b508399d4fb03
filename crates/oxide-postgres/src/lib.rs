//! PostgreSQL dialect for schema migrations and queries.
//!
//! `oxide-postgres` turns dialect-neutral schema blueprints into PostgreSQL
//! DDL and resolves connection settings into read/write endpoints:
//!
//! - **Wrap** - Quotes identifiers and literals, applies the table prefix
//! - **Grammar** - Compiles blueprint commands into DDL and catalog queries
//! - **JSON** - Compiles `column->path` selectors and `jsonb` updates
//! - **Processor** - Normalizes catalog rows into descriptors
//! - **Config** - Resolves read/write endpoints from a configuration store
//!
//! # Example
//!
//! ```rust
//! use oxide_postgres::prelude::*;
//!
//! let grammar = PostgresGrammar::new("goravel_");
//! let blueprint = TableBlueprint::new("users")
//!     .column(ColumnDefinition::id("id"))
//!     .column(ColumnDefinition::string("name", 100).nullable())
//!     .command(Command::Create);
//!
//! assert_eq!(
//!     grammar.to_sql(&blueprint),
//!     vec![
//!         r#"create table "goravel_users" ("id" bigserial primary key not null, "name" varchar(100) null)"#
//!     ]
//! );
//! ```

pub mod blueprint;
pub mod command;
pub mod config;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod introspection;
pub mod json;
pub mod processor;
pub mod query;
pub mod schema;
pub mod wrap;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::blueprint::{Blueprint, TableBlueprint};
    pub use crate::command::{Command, ForeignKeyCommand, IndexCommand};
    pub use crate::config::{
        Config, ConfigBuilder, ConfigStore, FullConfig, MapConfigStore, NameReplacer,
    };
    pub use crate::dialect::{parse_schema_and_table, PostgresGrammar, SchemaGrammar};
    pub use crate::driver::{ConnectionSummary, Postgres};
    pub use crate::error::{PostgresError, Result};
    pub use crate::introspection::{
        Column, DbColumn, DbForeignKey, DbIndex, ForeignKey, Index, Table, Type, View,
    };
    pub use crate::json::{
        ColumnUpdate, Expression, JsonCompiler, JsonEncoder, SerdeJsonEncoder,
    };
    pub use crate::processor::Processor;
    pub use crate::query::Query;
    pub use crate::schema::{
        ColumnDefinition, ColumnType, DefaultValue, ForeignKeyAction, GeneratedAs,
    };
    pub use crate::wrap::Wrap;
}
