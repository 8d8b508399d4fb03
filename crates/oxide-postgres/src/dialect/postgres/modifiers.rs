//! Column modifiers appended after the type fragment.
//!
//! The order of [`modifiers`] is significant: on `alter column`, an identity
//! has to be dropped before a new one is added.

use super::PostgresGrammar;
use crate::blueprint::Blueprint;
use crate::schema::ColumnDefinition;

/// Renders one suffix of a column definition, or nothing.
pub type Modifier = fn(&PostgresGrammar, &dyn Blueprint, &ColumnDefinition) -> Option<String>;

pub(super) fn modifiers() -> Vec<Modifier> {
    vec![
        modify_default as Modifier,
        modify_increment,
        modify_nullable,
        modify_generated_as_for_change,
        modify_generated_as,
    ]
}

fn modify_default(
    _: &PostgresGrammar,
    _: &dyn Blueprint,
    column: &ColumnDefinition,
) -> Option<String> {
    if !column.change {
        return column
            .default
            .as_ref()
            .map(|default| format!(" default {}", default.to_sql()));
    }

    // Sequence and identity columns own their value.
    if column.auto_increment || column.generated_as.is_some() {
        return None;
    }

    Some(column.default.as_ref().map_or_else(
        || " drop default".to_string(),
        |default| format!(" set default {}", default.to_sql()),
    ))
}

fn modify_increment(
    _: &PostgresGrammar,
    blueprint: &dyn Blueprint,
    column: &ColumnDefinition,
) -> Option<String> {
    let incrementing = column.column_type.is_serial() || column.generated_as.is_some();

    (!column.change && !blueprint.has_command("primary") && incrementing && column.auto_increment)
        .then(|| " primary key".to_string())
}

fn modify_nullable(
    _: &PostgresGrammar,
    _: &dyn Blueprint,
    column: &ColumnDefinition,
) -> Option<String> {
    let sql = match (column.change, column.nullable) {
        (true, true) => " drop not null",
        (true, false) => " set not null",
        (false, true) => " null",
        (false, false) => " not null",
    };

    Some(sql.to_string())
}

fn modify_generated_as_for_change(
    _: &PostgresGrammar,
    _: &dyn Blueprint,
    column: &ColumnDefinition,
) -> Option<String> {
    (column.change && column.generated_as.is_some() && !column.auto_increment)
        .then(|| " drop identity if exists".to_string())
}

fn modify_generated_as(
    _: &PostgresGrammar,
    _: &dyn Blueprint,
    column: &ColumnDefinition,
) -> Option<String> {
    let generated = column.generated_as.as_ref()?;

    let mut sql = String::new();
    if column.change {
        sql.push_str(" add");
    }
    sql.push_str(if generated.always {
        " generated always as identity"
    } else {
        " generated by default as identity"
    });
    if let Some(expression) = generated.expression.as_deref().filter(|e| !e.is_empty()) {
        sql.push_str(&format!(" ({expression})"));
    }

    Some(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::TableBlueprint;
    use crate::command::{Command, IndexCommand};
    use crate::schema::{ColumnType, DefaultValue};

    fn grammar() -> PostgresGrammar {
        PostgresGrammar::new("goravel_")
    }

    fn blueprint() -> TableBlueprint {
        TableBlueprint::new("users")
    }

    #[test]
    fn test_modify_default() {
        let column = ColumnDefinition::string("name", 10).default("goravel");
        assert_eq!(
            modify_default(&grammar(), &blueprint(), &column).as_deref(),
            Some(" default 'goravel'")
        );

        let column = ColumnDefinition::string("name", 10);
        assert_eq!(modify_default(&grammar(), &blueprint(), &column), None);

        let column = ColumnDefinition::string("name", 10).change();
        assert_eq!(
            modify_default(&grammar(), &blueprint(), &column).as_deref(),
            Some(" drop default")
        );

        let column = ColumnDefinition::new("active", ColumnType::Boolean)
            .default(true)
            .change();
        assert_eq!(
            modify_default(&grammar(), &blueprint(), &column).as_deref(),
            Some(" set default '1'")
        );

        let column = ColumnDefinition::id("id").change();
        assert_eq!(modify_default(&grammar(), &blueprint(), &column), None);

        let column = ColumnDefinition::new("at", ColumnType::Timestamp)
            .default(DefaultValue::Expression("now()".into()));
        assert_eq!(
            modify_default(&grammar(), &blueprint(), &column).as_deref(),
            Some(" default now()")
        );
    }

    #[test]
    fn test_modify_increment() {
        let column = ColumnDefinition::id("id");
        assert_eq!(
            modify_increment(&grammar(), &blueprint(), &column).as_deref(),
            Some(" primary key")
        );

        let with_primary =
            blueprint().command(Command::Primary(IndexCommand::new("users_pkey", ["id"])));
        assert_eq!(modify_increment(&grammar(), &with_primary, &column), None);

        let column = ColumnDefinition::id("id").change();
        assert_eq!(modify_increment(&grammar(), &blueprint(), &column), None);

        let column = ColumnDefinition::string("name", 10).auto_increment();
        assert_eq!(modify_increment(&grammar(), &blueprint(), &column), None);
    }

    #[test]
    fn test_modify_nullable() {
        let column = ColumnDefinition::string("name", 10);
        assert_eq!(
            modify_nullable(&grammar(), &blueprint(), &column).as_deref(),
            Some(" not null")
        );
        assert_eq!(
            modify_nullable(&grammar(), &blueprint(), &column.clone().nullable()).as_deref(),
            Some(" null")
        );
        assert_eq!(
            modify_nullable(&grammar(), &blueprint(), &column.clone().change()).as_deref(),
            Some(" set not null")
        );
        assert_eq!(
            modify_nullable(&grammar(), &blueprint(), &column.nullable().change()).as_deref(),
            Some(" drop not null")
        );
    }

    #[test]
    fn test_modify_generated_as() {
        let column =
            ColumnDefinition::new("id", ColumnType::Integer).generated_as(false, None);
        assert_eq!(
            modify_generated_as(&grammar(), &blueprint(), &column).as_deref(),
            Some(" generated by default as identity")
        );

        let column = ColumnDefinition::new("id", ColumnType::Integer)
            .generated_as(true, Some("start with 10 increment by 2"));
        assert_eq!(
            modify_generated_as(&grammar(), &blueprint(), &column).as_deref(),
            Some(" generated always as identity (start with 10 increment by 2)")
        );
        assert_eq!(
            modify_generated_as(&grammar(), &blueprint(), &column.change()).as_deref(),
            Some(" add generated always as identity (start with 10 increment by 2)")
        );

        let column = ColumnDefinition::new("id", ColumnType::Integer);
        assert_eq!(modify_generated_as(&grammar(), &blueprint(), &column), None);
    }

    #[test]
    fn test_modify_generated_as_for_change() {
        let column = ColumnDefinition::new("id", ColumnType::Integer)
            .generated_as(false, None)
            .change();
        assert_eq!(
            modify_generated_as_for_change(&grammar(), &blueprint(), &column).as_deref(),
            Some(" drop identity if exists")
        );

        let column = column.auto_increment();
        assert_eq!(
            modify_generated_as_for_change(&grammar(), &blueprint(), &column),
            None
        );
    }
}
