//! PostgreSQL grammar.

mod catalog;
mod modifiers;
mod types;

pub use catalog::parse_schema_and_table;
pub use modifiers::Modifier;
pub use types::{RenderedType, TypeRenderer};

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::SchemaGrammar;
use crate::blueprint::Blueprint;
use crate::command::{ForeignKeyCommand, IndexCommand};
use crate::schema::{ColumnDefinition, ColumnType, DefaultValue};
use crate::wrap::Wrap;

/// PostgreSQL schema grammar.
///
/// The renderer table and the modifier list are built once in
/// [`PostgresGrammar::new`]; compiling never mutates the grammar.
#[derive(Clone)]
pub struct PostgresGrammar {
    wrap: Wrap,
    types: HashMap<ColumnType, TypeRenderer>,
    modifiers: Vec<Modifier>,
}

impl fmt::Debug for PostgresGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresGrammar")
            .field("wrap", &self.wrap)
            .field("types", &self.types.len())
            .field("modifiers", &self.modifiers.len())
            .finish()
    }
}

impl Default for PostgresGrammar {
    fn default() -> Self {
        Self::new("")
    }
}

impl PostgresGrammar {
    /// Creates a grammar applying `prefix` to table names.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            wrap: Wrap::new(prefix),
            types: types::renderers(),
            modifiers: modifiers::modifiers(),
        }
    }

    /// Returns the identifier wrapper.
    #[must_use]
    pub const fn wrap(&self) -> &Wrap {
        &self.wrap
    }

    /// Returns the table prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.wrap.prefix()
    }

    /// Renders the type fragment of a column.
    ///
    /// Tags without a renderer produce an empty fragment.
    #[must_use]
    pub fn render_type(&self, column: &ColumnDefinition) -> RenderedType {
        if let Some(render) = self.types.get(&column.column_type) {
            return render(self, column);
        }

        debug!(
            column = %column.name,
            column_type = %column.column_type,
            "No renderer for column type"
        );
        RenderedType::default()
    }

    /// Renders `"name" <type><modifiers>` for a column being created.
    #[must_use]
    pub fn column_definition(&self, blueprint: &dyn Blueprint, column: &ColumnDefinition) -> String {
        let rendered = self.render_type(column);
        let column = merge_default(column, rendered.default);

        let mut sql = format!("{} {}", self.wrap.column(&column.name), rendered.sql);
        for modifier in &self.modifiers {
            if let Some(fragment) = modifier(self, blueprint, &*column) {
                sql.push_str(&fragment);
            }
        }
        sql
    }

    fn table(&self, blueprint: &dyn Blueprint) -> String {
        self.wrap.table(blueprint.table())
    }

    fn columns(&self, blueprint: &dyn Blueprint) -> Vec<String> {
        blueprint
            .added_columns()
            .iter()
            .map(|column| self.column_definition(blueprint, column))
            .collect()
    }
}

/// Applies a default synthesized by the type renderer to a local copy.
fn merge_default(
    column: &ColumnDefinition,
    default: Option<DefaultValue>,
) -> Cow<'_, ColumnDefinition> {
    match default {
        Some(default) => {
            let mut column = column.clone();
            column.default = Some(default);
            Cow::Owned(column)
        }
        None => Cow::Borrowed(column),
    }
}

impl SchemaGrammar for PostgresGrammar {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn attribute_commands(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn compile_add(&self, blueprint: &dyn Blueprint, column: &ColumnDefinition) -> String {
        format!(
            "alter table {} add column {}",
            self.table(blueprint),
            self.column_definition(blueprint, column)
        )
    }

    fn compile_change(
        &self,
        blueprint: &dyn Blueprint,
        column: &ColumnDefinition,
    ) -> Vec<String> {
        let rendered = self.render_type(column);
        let column = merge_default(column, rendered.default);
        let name = self.wrap.column(&column.name);

        let mut changes = vec![format!("alter column {name} type {}", rendered.sql)];
        changes.extend(
            self.modifiers
                .iter()
                .filter_map(|modifier| modifier(self, blueprint, &*column))
                .map(|fragment| format!("alter column {name}{fragment}")),
        );

        vec![format!(
            "alter table {} {}",
            self.table(blueprint),
            changes.join(", ")
        )]
    }

    fn compile_comment(&self, blueprint: &dyn Blueprint, column: &ColumnDefinition) -> String {
        format!(
            "comment on column {}.{} is {}",
            self.table(blueprint),
            self.wrap.column(&column.name),
            comment_literal(&self.wrap, column.comment.as_deref())
        )
    }

    fn compile_create(&self, blueprint: &dyn Blueprint) -> String {
        format!(
            "create table {} ({})",
            self.table(blueprint),
            self.columns(blueprint).join(", ")
        )
    }

    fn compile_drop(&self, blueprint: &dyn Blueprint) -> String {
        format!("drop table {}", self.table(blueprint))
    }

    fn compile_drop_if_exists(&self, blueprint: &dyn Blueprint) -> String {
        format!("drop table if exists {}", self.table(blueprint))
    }

    fn compile_drop_column(&self, blueprint: &dyn Blueprint, columns: &[String]) -> Vec<String> {
        let columns = self
            .wrap
            .prefix_array("drop column", &self.wrap.columns(columns));

        vec![format!(
            "alter table {} {}",
            self.table(blueprint),
            columns.join(", ")
        )]
    }

    fn compile_drop_foreign(&self, blueprint: &dyn Blueprint, index: &str) -> String {
        format!(
            "alter table {} drop constraint {}",
            self.table(blueprint),
            self.wrap.column(index)
        )
    }

    fn compile_drop_full_text(&self, blueprint: &dyn Blueprint, index: &str) -> String {
        self.compile_drop_index(blueprint, index)
    }

    fn compile_drop_index(&self, _: &dyn Blueprint, index: &str) -> String {
        format!("drop index {}", self.wrap.column(index))
    }

    fn compile_drop_primary(&self, blueprint: &dyn Blueprint) -> String {
        let table = blueprint.table();
        let name = table.rsplit_once('.').map_or(table, |(_, name)| name);
        let index = format!("{}{name}_pkey", self.prefix());

        format!(
            "alter table {} drop constraint {}",
            self.table(blueprint),
            self.wrap.column(&index)
        )
    }

    fn compile_drop_unique(&self, blueprint: &dyn Blueprint, index: &str) -> String {
        self.compile_drop_foreign(blueprint, index)
    }

    fn compile_foreign(&self, blueprint: &dyn Blueprint, command: &ForeignKeyCommand) -> String {
        let mut sql = format!(
            "alter table {} add constraint {} foreign key ({}) references {} ({})",
            self.table(blueprint),
            self.wrap.column(&command.index),
            self.wrap.columnize(&command.columns),
            self.wrap.table(&command.on),
            self.wrap.columnize(&command.references)
        );

        if let Some(action) = command.on_delete {
            sql.push_str(" on delete ");
            sql.push_str(action.to_sql());
        }
        if let Some(action) = command.on_update {
            sql.push_str(" on update ");
            sql.push_str(action.to_sql());
        }

        sql
    }

    fn compile_full_text(&self, blueprint: &dyn Blueprint, command: &IndexCommand) -> String {
        let language = command
            .language
            .as_deref()
            .filter(|language| !language.is_empty())
            .unwrap_or("english");
        let vectors: Vec<String> = command
            .columns
            .iter()
            .map(|column| {
                format!(
                    "to_tsvector({}, {})",
                    self.wrap.quote(language),
                    self.wrap.column(column)
                )
            })
            .collect();

        format!(
            "create index {} on {} using gin({})",
            self.wrap.column(&command.index),
            self.table(blueprint),
            vectors.join(" || ")
        )
    }

    fn compile_index(&self, blueprint: &dyn Blueprint, command: &IndexCommand) -> String {
        let algorithm = command
            .algorithm
            .as_deref()
            .filter(|algorithm| !algorithm.is_empty())
            .map(|algorithm| format!(" using {algorithm}"))
            .unwrap_or_default();

        format!(
            "create index {} on {}{algorithm} ({})",
            self.wrap.column(&command.index),
            self.table(blueprint),
            self.wrap.columnize(&command.columns)
        )
    }

    fn compile_primary(&self, blueprint: &dyn Blueprint, command: &IndexCommand) -> String {
        format!(
            "alter table {} add primary key ({})",
            self.table(blueprint),
            self.wrap.columnize(&command.columns)
        )
    }

    fn compile_rename(&self, blueprint: &dyn Blueprint, to: &str) -> String {
        format!(
            "alter table {} rename to {}",
            self.table(blueprint),
            self.wrap.table(to)
        )
    }

    fn compile_rename_column(&self, blueprint: &dyn Blueprint, from: &str, to: &str) -> String {
        format!(
            "alter table {} rename column {} to {}",
            self.table(blueprint),
            self.wrap.column(from),
            self.wrap.column(to)
        )
    }

    fn compile_rename_index(&self, _: &dyn Blueprint, from: &str, to: &str) -> Vec<String> {
        vec![format!(
            "alter index {} rename to {}",
            self.wrap.column(from),
            self.wrap.column(to)
        )]
    }

    fn compile_table_comment(&self, blueprint: &dyn Blueprint, value: Option<&str>) -> String {
        format!(
            "comment on table {} is {}",
            self.table(blueprint),
            comment_literal(&self.wrap, value)
        )
    }

    fn compile_unique(&self, blueprint: &dyn Blueprint, command: &IndexCommand) -> String {
        let mut sql = format!(
            "alter table {} add constraint {} unique ({})",
            self.table(blueprint),
            self.wrap.column(&command.index),
            self.wrap.columnize(&command.columns)
        );

        if let Some(deferrable) = command.deferrable {
            sql.push_str(if deferrable {
                " deferrable"
            } else {
                " not deferrable"
            });

            if let Some(immediate) = command.initially_immediate {
                sql.push_str(if immediate {
                    " initially immediate"
                } else {
                    " initially deferred"
                });
            }
        }

        sql
    }
}

/// `NULL` clears a comment; an empty comment is kept as `''`.
fn comment_literal(wrap: &Wrap, comment: Option<&str>) -> String {
    match comment {
        None => "NULL".to_string(),
        Some("") => "''".to_string(),
        Some(comment) => wrap.quote(comment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::TableBlueprint;
    use crate::command::{Command, IndexCommand};
    use crate::schema::{ColumnType, DefaultValue, ForeignKeyAction};

    fn grammar() -> PostgresGrammar {
        PostgresGrammar::new("goravel_")
    }

    fn users() -> TableBlueprint {
        TableBlueprint::new("users")
    }

    #[test]
    fn test_compile_add() {
        let column = ColumnDefinition::string("name", 1).default("goravel");
        let sql = grammar().compile_add(&users(), &column);
        assert_eq!(
            sql,
            "alter table \"goravel_users\" add column \"name\" varchar(1) default 'goravel' not null"
        );
    }

    #[test]
    fn test_compile_change() {
        let column = ColumnDefinition::string("name", 100)
            .nullable()
            .default("goravel")
            .change();
        let sql = grammar().compile_change(&users(), &column);
        assert_eq!(
            sql,
            vec![
                "alter table \"goravel_users\" alter column \"name\" type varchar(100), \
                 alter column \"name\" set default 'goravel', \
                 alter column \"name\" drop not null"
            ]
        );
    }

    #[test]
    fn test_compile_change_identity() {
        let column = ColumnDefinition::new("id", ColumnType::Integer)
            .generated_as(true, None)
            .change();
        let sql = grammar().compile_change(&users(), &column);
        assert_eq!(
            sql[0],
            "alter table \"goravel_users\" alter column \"id\" type integer, \
             alter column \"id\" set not null, \
             alter column \"id\" drop identity if exists, \
             alter column \"id\" add generated always as identity"
        );
    }

    #[test]
    fn test_compile_change_auto_increment_keeps_base_type() {
        let column = ColumnDefinition::new("id", ColumnType::Integer)
            .auto_increment()
            .change();
        let sql = grammar().compile_change(&users(), &column);
        assert_eq!(
            sql[0],
            "alter table \"goravel_users\" alter column \"id\" type integer, \
             alter column \"id\" set not null"
        );
    }

    #[test]
    fn test_compile_comment() {
        let column = ColumnDefinition::string("name", 10).comment("It's a comment");
        assert_eq!(
            grammar().compile_comment(&users(), &column),
            "comment on column \"goravel_users\".\"name\" is 'It''s a comment'"
        );

        let column = ColumnDefinition::string("name", 10);
        assert_eq!(
            grammar().compile_comment(&users(), &column),
            "comment on column \"goravel_users\".\"name\" is NULL"
        );
    }

    #[test]
    fn test_compile_create() {
        let blueprint = users()
            .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment())
            .column(ColumnDefinition::string("name", 100).nullable());

        assert_eq!(
            grammar().compile_create(&blueprint),
            "create table \"goravel_users\" (\"id\" serial primary key not null, \"name\" varchar(100) null)"
        );
    }

    #[test]
    fn test_compile_create_with_primary_command() {
        let blueprint = users()
            .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment())
            .command(Command::Create)
            .command(Command::Primary(IndexCommand::new("users_pkey", ["id"])));

        assert_eq!(
            grammar().to_sql(&blueprint),
            vec![
                "create table \"goravel_users\" (\"id\" serial not null)",
                "alter table \"goravel_users\" add primary key (\"id\")",
            ]
        );
    }

    #[test]
    fn test_compile_create_use_current() {
        let blueprint = users().column(
            ColumnDefinition::new("created_at", ColumnType::TimestampTz)
                .precision(3)
                .nullable()
                .use_current(),
        );

        assert_eq!(
            grammar().compile_create(&blueprint),
            "create table \"goravel_users\" (\"created_at\" timestamp(3) with time zone default CURRENT_TIMESTAMP null)"
        );
    }

    #[test]
    fn test_compile_drop() {
        assert_eq!(grammar().compile_drop(&users()), "drop table \"goravel_users\"");
        assert_eq!(
            grammar().compile_drop_if_exists(&users()),
            "drop table if exists \"goravel_users\""
        );
    }

    #[test]
    fn test_compile_drop_column() {
        let sql = grammar().compile_drop_column(&users(), &["id".into(), "email".into()]);
        assert_eq!(
            sql,
            vec!["alter table \"goravel_users\" drop column \"id\", drop column \"email\""]
        );
    }

    #[test]
    fn test_compile_drop_constraints() {
        assert_eq!(
            grammar().compile_drop_foreign(&users(), "fk"),
            "alter table \"goravel_users\" drop constraint \"fk\""
        );
        assert_eq!(
            grammar().compile_drop_unique(&users(), "users_email_unique"),
            "alter table \"goravel_users\" drop constraint \"users_email_unique\""
        );
        assert_eq!(
            grammar().compile_drop_index(&users(), "users_name_index"),
            "drop index \"users_name_index\""
        );
        assert_eq!(
            grammar().compile_drop_full_text(&users(), "users_bio_fulltext"),
            "drop index \"users_bio_fulltext\""
        );
        assert_eq!(
            grammar().compile_drop_primary(&users()),
            "alter table \"goravel_users\" drop constraint \"goravel_users_pkey\""
        );
    }

    #[test]
    fn test_compile_foreign() {
        let command = ForeignKeyCommand::new("fk_users_role", ["role_id", "user_id"], "roles", ["id", "user_id"])
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::Restrict);

        assert_eq!(
            grammar().compile_foreign(&users(), &command),
            "alter table \"goravel_users\" add constraint \"fk_users_role\" foreign key (\"role_id\", \"user_id\") \
             references \"goravel_roles\" (\"id\", \"user_id\") on delete cascade on update restrict"
        );

        let command = ForeignKeyCommand::new("fk", ["role_id"], "roles", ["id"]);
        assert_eq!(
            grammar().compile_foreign(&users(), &command),
            "alter table \"goravel_users\" add constraint \"fk\" foreign key (\"role_id\") references \"goravel_roles\" (\"id\")"
        );
    }

    #[test]
    fn test_compile_full_text() {
        let command = IndexCommand::new("fulltext", ["id", "email"]);
        assert_eq!(
            grammar().compile_full_text(&users(), &command),
            "create index \"fulltext\" on \"goravel_users\" using gin(to_tsvector('english', \"id\") || to_tsvector('english', \"email\"))"
        );

        let command = IndexCommand::new("fulltext", ["bio"]).language("french");
        assert_eq!(
            grammar().compile_full_text(&users(), &command),
            "create index \"fulltext\" on \"goravel_users\" using gin(to_tsvector('french', \"bio\"))"
        );
    }

    #[test]
    fn test_compile_index() {
        let command = IndexCommand::new("users", ["role_id", "user_id"]).algorithm("btree");
        assert_eq!(
            grammar().compile_index(&users(), &command),
            "create index \"users\" on \"goravel_users\" using btree (\"role_id\", \"user_id\")"
        );

        let command = IndexCommand::new("users", ["role_id"]);
        assert_eq!(
            grammar().compile_index(&users(), &command),
            "create index \"users\" on \"goravel_users\" (\"role_id\")"
        );
    }

    #[test]
    fn test_compile_primary() {
        let command = IndexCommand::new("users_pkey", ["role_id", "user_id"]);
        assert_eq!(
            grammar().compile_primary(&users(), &command),
            "alter table \"goravel_users\" add primary key (\"role_id\", \"user_id\")"
        );
    }

    #[test]
    fn test_compile_renames() {
        assert_eq!(
            grammar().compile_rename(&users(), "admins"),
            "alter table \"goravel_users\" rename to \"goravel_admins\""
        );
        assert_eq!(
            grammar().compile_rename_column(&users(), "before", "after"),
            "alter table \"goravel_users\" rename column \"before\" to \"after\""
        );
        assert_eq!(
            grammar().compile_rename_index(&users(), "before", "after"),
            vec!["alter index \"before\" rename to \"after\""]
        );
    }

    #[test]
    fn test_compile_table_comment() {
        assert_eq!(
            grammar().compile_table_comment(&users(), Some("It's a table comment")),
            "comment on table \"goravel_users\" is 'It''s a table comment'"
        );
        assert_eq!(
            grammar().compile_table_comment(&users(), None),
            "comment on table \"goravel_users\" is NULL"
        );
    }

    #[test]
    fn test_compile_unique() {
        let command = IndexCommand::new("unique", ["role_id", "user_id"])
            .deferrable(true)
            .initially_immediate(true);
        assert_eq!(
            grammar().compile_unique(&users(), &command),
            "alter table \"goravel_users\" add constraint \"unique\" unique (\"role_id\", \"user_id\") deferrable initially immediate"
        );

        let command = IndexCommand::new("unique", ["role_id"]).deferrable(false);
        assert_eq!(
            grammar().compile_unique(&users(), &command),
            "alter table \"goravel_users\" add constraint \"unique\" unique (\"role_id\") not deferrable"
        );

        let command = IndexCommand::new("unique", ["role_id"]).initially_immediate(false);
        assert_eq!(
            grammar().compile_unique(&users(), &command),
            "alter table \"goravel_users\" add constraint \"unique\" unique (\"role_id\")"
        );
    }

    #[test]
    fn test_compile_default_emits_nothing() {
        assert!(grammar().compile(&users(), &Command::Default).is_empty());
    }

    #[test]
    fn test_to_sql_appends_comments() {
        let blueprint = users()
            .column(ColumnDefinition::string("name", 10).comment("display name"))
            .column(ColumnDefinition::new("age", ColumnType::Integer).default(DefaultValue::Integer(18)))
            .command(Command::Create);

        assert_eq!(
            grammar().to_sql(&blueprint),
            vec![
                "create table \"goravel_users\" (\"name\" varchar(10) not null, \"age\" integer default '18' not null)",
                "comment on column \"goravel_users\".\"name\" is 'display name'",
            ]
        );
    }
}
