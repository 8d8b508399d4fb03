//! Schema grammar implementations.
//!
//! A grammar turns blueprint commands into SQL statements for one database
//! system. [`SchemaGrammar::compile`] dispatches a [`Command`] to the method
//! handling it.

mod postgres;

pub use postgres::{
    parse_schema_and_table, Modifier, PostgresGrammar, RenderedType, TypeRenderer,
};

use tracing::debug;

use crate::blueprint::Blueprint;
use crate::command::{Command, ForeignKeyCommand, IndexCommand};
use crate::schema::ColumnDefinition;

/// Trait for database-specific DDL generation.
pub trait SchemaGrammar: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the commands compiled from column attributes after the
    /// blueprint's own commands.
    fn attribute_commands(&self) -> &'static [&'static str];

    /// `alter table ... add column ...`
    fn compile_add(&self, blueprint: &dyn Blueprint, column: &ColumnDefinition) -> String;

    /// Alters a column in one combined statement.
    fn compile_change(&self, blueprint: &dyn Blueprint, column: &ColumnDefinition)
        -> Vec<String>;

    /// Sets or clears a column comment.
    fn compile_comment(&self, blueprint: &dyn Blueprint, column: &ColumnDefinition) -> String;

    /// Creates the table with all added columns.
    fn compile_create(&self, blueprint: &dyn Blueprint) -> String;

    fn compile_drop(&self, blueprint: &dyn Blueprint) -> String;

    fn compile_drop_if_exists(&self, blueprint: &dyn Blueprint) -> String;

    fn compile_drop_column(&self, blueprint: &dyn Blueprint, columns: &[String]) -> Vec<String>;

    fn compile_drop_foreign(&self, blueprint: &dyn Blueprint, index: &str) -> String;

    fn compile_drop_full_text(&self, blueprint: &dyn Blueprint, index: &str) -> String;

    fn compile_drop_index(&self, blueprint: &dyn Blueprint, index: &str) -> String;

    /// Drops the primary key constraint, whose name is derived from the table.
    fn compile_drop_primary(&self, blueprint: &dyn Blueprint) -> String;

    fn compile_drop_unique(&self, blueprint: &dyn Blueprint, index: &str) -> String;

    fn compile_foreign(&self, blueprint: &dyn Blueprint, command: &ForeignKeyCommand) -> String;

    fn compile_full_text(&self, blueprint: &dyn Blueprint, command: &IndexCommand) -> String;

    fn compile_index(&self, blueprint: &dyn Blueprint, command: &IndexCommand) -> String;

    fn compile_primary(&self, blueprint: &dyn Blueprint, command: &IndexCommand) -> String;

    fn compile_rename(&self, blueprint: &dyn Blueprint, to: &str) -> String;

    fn compile_rename_column(&self, blueprint: &dyn Blueprint, from: &str, to: &str) -> String;

    fn compile_rename_index(&self, blueprint: &dyn Blueprint, from: &str, to: &str)
        -> Vec<String>;

    /// Sets or clears the table comment.
    fn compile_table_comment(&self, blueprint: &dyn Blueprint, value: Option<&str>) -> String;

    fn compile_unique(&self, blueprint: &dyn Blueprint, command: &IndexCommand) -> String;

    /// Compiles a single command. Commands with no SQL yield an empty list.
    fn compile(&self, blueprint: &dyn Blueprint, command: &Command) -> Vec<String> {
        let statements = match command {
            Command::Add(column) => vec![self.compile_add(blueprint, column)],
            Command::Change(column) => self.compile_change(blueprint, column),
            Command::Comment(column) => vec![self.compile_comment(blueprint, column)],
            Command::Create => vec![self.compile_create(blueprint)],
            Command::Default => Vec::new(),
            Command::Drop => vec![self.compile_drop(blueprint)],
            Command::DropIfExists => vec![self.compile_drop_if_exists(blueprint)],
            Command::DropColumn { columns } => self.compile_drop_column(blueprint, columns),
            Command::DropForeign { index } => vec![self.compile_drop_foreign(blueprint, index)],
            Command::DropFullText { index } => {
                vec![self.compile_drop_full_text(blueprint, index)]
            }
            Command::DropIndex { index } => vec![self.compile_drop_index(blueprint, index)],
            Command::DropPrimary => vec![self.compile_drop_primary(blueprint)],
            Command::DropUnique { index } => vec![self.compile_drop_unique(blueprint, index)],
            Command::Foreign(foreign) => vec![self.compile_foreign(blueprint, foreign)],
            Command::FullText(index) => vec![self.compile_full_text(blueprint, index)],
            Command::Index(index) => vec![self.compile_index(blueprint, index)],
            Command::Primary(index) => vec![self.compile_primary(blueprint, index)],
            Command::Rename { to } => vec![self.compile_rename(blueprint, to)],
            Command::RenameColumn { from, to } => {
                vec![self.compile_rename_column(blueprint, from, to)]
            }
            Command::RenameIndex { from, to } => self.compile_rename_index(blueprint, from, to),
            Command::TableComment { value } => {
                vec![self.compile_table_comment(blueprint, value.as_deref())]
            }
            Command::Unique(index) => vec![self.compile_unique(blueprint, index)],
        };

        debug!(
            dialect = self.name(),
            command = command.name(),
            table = blueprint.table(),
            statements = statements.len(),
            "Compiled schema command"
        );

        statements
    }

    /// Compiles every pending command of the blueprint, then the attribute
    /// commands implied by its added columns.
    fn to_sql(&self, blueprint: &dyn Blueprint) -> Vec<String> {
        let mut statements: Vec<String> = blueprint
            .commands()
            .iter()
            .flat_map(|command| self.compile(blueprint, command))
            .collect();

        if self.attribute_commands().contains(&"comment") {
            statements.extend(
                blueprint
                    .added_columns()
                    .iter()
                    .filter(|column| column.comment.is_some())
                    .map(|column| self.compile_comment(blueprint, column)),
            );
        }

        statements
    }
}
