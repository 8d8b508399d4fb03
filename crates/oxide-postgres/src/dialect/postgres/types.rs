//! Column type renderers.

use std::collections::HashMap;

use super::PostgresGrammar;
use crate::schema::{ColumnDefinition, ColumnType, DefaultValue};

/// Output of a type renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedType {
    /// Type fragment, e.g. `varchar(255)`.
    pub sql: String,
    /// Default the column picks up from its type, e.g. `CURRENT_TIMESTAMP`.
    pub default: Option<DefaultValue>,
}

impl RenderedType {
    fn plain(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            default: None,
        }
    }
}

/// Renders the type fragment of a column.
pub type TypeRenderer = fn(&PostgresGrammar, &ColumnDefinition) -> RenderedType;

/// Builds the renderer table for every known type tag.
pub(super) fn renderers() -> HashMap<ColumnType, TypeRenderer> {
    let entries: [(ColumnType, TypeRenderer); 26] = [
        (ColumnType::BigInteger, big_integer),
        (ColumnType::Boolean, |_, _| RenderedType::plain("boolean")),
        (ColumnType::Char, character),
        (ColumnType::Date, |_, _| RenderedType::plain("date")),
        (ColumnType::DateTime, timestamp),
        (ColumnType::DateTimeTz, timestamp_tz),
        (ColumnType::Decimal, decimal),
        (ColumnType::Double, |_, _| RenderedType::plain("double precision")),
        (ColumnType::Enum, enumeration),
        (ColumnType::Float, float),
        (ColumnType::Integer, integer),
        (ColumnType::Json, |_, _| RenderedType::plain("json")),
        (ColumnType::Jsonb, |_, _| RenderedType::plain("jsonb")),
        (ColumnType::LongText, text),
        (ColumnType::MediumInteger, integer),
        (ColumnType::MediumText, text),
        (ColumnType::SmallInteger, small_integer),
        (ColumnType::String, string),
        (ColumnType::Text, text),
        (ColumnType::Time, time),
        (ColumnType::TimeTz, time_tz),
        (ColumnType::Timestamp, timestamp),
        (ColumnType::TimestampTz, timestamp_tz),
        (ColumnType::TinyInteger, small_integer),
        (ColumnType::TinyText, |_, _| RenderedType::plain("varchar(255)")),
        (ColumnType::Uuid, |_, _| RenderedType::plain("uuid")),
    ];

    entries.into_iter().collect()
}

/// `serial` types are creation-only sugar and conflict with identity columns.
fn uses_serial(column: &ColumnDefinition) -> bool {
    column.auto_increment && !column.change && column.generated_as.is_none()
}

fn integer_type(column: &ColumnDefinition, serial: &str, base: &str) -> RenderedType {
    RenderedType::plain(if uses_serial(column) { serial } else { base })
}

fn big_integer(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    integer_type(column, "bigserial", "bigint")
}

fn integer(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    integer_type(column, "serial", "integer")
}

fn small_integer(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    integer_type(column, "smallserial", "smallint")
}

fn character(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    match column.length {
        Some(length) if length > 0 => RenderedType::plain(format!("char({length})")),
        _ => RenderedType::plain("char"),
    }
}

fn string(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    match column.length {
        Some(length) if length > 0 => RenderedType::plain(format!("varchar({length})")),
        _ => RenderedType::plain("varchar"),
    }
}

fn text(_: &PostgresGrammar, _: &ColumnDefinition) -> RenderedType {
    RenderedType::plain("text")
}

fn decimal(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    RenderedType::plain(format!("decimal({}, {})", column.total, column.places))
}

fn float(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    match column.precision {
        Some(precision) if precision > 0 => RenderedType::plain(format!("float({precision})")),
        _ => RenderedType::plain("float"),
    }
}

fn enumeration(grammar: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    let wrap = grammar.wrap();
    RenderedType::plain(format!(
        "varchar(255) check ({} in ({}))",
        wrap.value(&column.name),
        wrap.quotes(&column.allowed).join(", ")
    ))
}

fn time(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    RenderedType::plain(format!(
        "time({}) without time zone",
        column.precision.unwrap_or_default()
    ))
}

fn time_tz(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    RenderedType::plain(format!(
        "time({}) with time zone",
        column.precision.unwrap_or_default()
    ))
}

fn timestamp_with_zone(column: &ColumnDefinition, zone: &str) -> RenderedType {
    RenderedType {
        sql: format!(
            "timestamp({}) {zone} time zone",
            column.precision.unwrap_or_default()
        ),
        default: column
            .use_current
            .then(|| DefaultValue::Expression("CURRENT_TIMESTAMP".to_string())),
    }
}

fn timestamp(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    timestamp_with_zone(column, "without")
}

fn timestamp_tz(_: &PostgresGrammar, column: &ColumnDefinition) -> RenderedType {
    timestamp_with_zone(column, "with")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> PostgresGrammar {
        PostgresGrammar::new("goravel_")
    }

    fn sql(column: &ColumnDefinition) -> String {
        grammar().render_type(column).sql
    }

    #[test]
    fn test_every_known_type_has_renderer() {
        let table = renderers();
        for column_type in ColumnType::KNOWN {
            assert!(table.contains_key(&column_type), "missing {column_type}");
        }
    }

    #[test]
    fn test_integer_types() {
        let column = ColumnDefinition::new("id", ColumnType::Integer);
        assert_eq!(sql(&column), "integer");
        assert_eq!(sql(&column.clone().auto_increment()), "serial");
        assert_eq!(sql(&column.auto_increment().change()), "integer");

        let column = ColumnDefinition::new("id", ColumnType::BigInteger).auto_increment();
        assert_eq!(sql(&column), "bigserial");
        assert_eq!(sql(&column.generated_as(false, None)), "bigint");

        let column = ColumnDefinition::new("id", ColumnType::TinyInteger).auto_increment();
        assert_eq!(sql(&column), "smallserial");
        assert_eq!(sql(&column.change()), "smallint");

        let column = ColumnDefinition::new("id", ColumnType::MediumInteger);
        assert_eq!(sql(&column), "integer");
    }

    #[test]
    fn test_string_types() {
        assert_eq!(sql(&ColumnDefinition::string("name", 100)), "varchar(100)");
        assert_eq!(
            sql(&ColumnDefinition::new("name", ColumnType::String)),
            "varchar"
        );
        assert_eq!(
            sql(&ColumnDefinition::new("code", ColumnType::Char).length(2)),
            "char(2)"
        );
        assert_eq!(sql(&ColumnDefinition::new("code", ColumnType::Char)), "char");
        assert_eq!(
            sql(&ColumnDefinition::new("bio", ColumnType::TinyText)),
            "varchar(255)"
        );
        assert_eq!(sql(&ColumnDefinition::new("bio", ColumnType::LongText)), "text");
    }

    #[test]
    fn test_numeric_types() {
        assert_eq!(
            sql(&ColumnDefinition::decimal("amount", 10, 3)),
            "decimal(10, 3)"
        );
        assert_eq!(
            sql(&ColumnDefinition::new("amount", ColumnType::Decimal)),
            "decimal(8, 2)"
        );
        assert_eq!(sql(&ColumnDefinition::new("ratio", ColumnType::Float)), "float");
        assert_eq!(
            sql(&ColumnDefinition::new("ratio", ColumnType::Float).precision(53)),
            "float(53)"
        );
        assert_eq!(
            sql(&ColumnDefinition::new("ratio", ColumnType::Double)),
            "double precision"
        );
    }

    #[test]
    fn test_enum_type() {
        let column = ColumnDefinition::enumeration("status", ["active", "it's"]);
        assert_eq!(
            sql(&column),
            "varchar(255) check (\"status\" in ('active', 'it''s'))"
        );
    }

    #[test]
    fn test_time_types() {
        let column = ColumnDefinition::new("at", ColumnType::Time).precision(2);
        assert_eq!(sql(&column), "time(2) without time zone");

        let column = ColumnDefinition::new("at", ColumnType::TimeTz);
        assert_eq!(sql(&column), "time(0) with time zone");

        let column = ColumnDefinition::new("created_at", ColumnType::DateTimeTz).precision(3);
        assert_eq!(sql(&column), "timestamp(3) with time zone");
    }

    #[test]
    fn test_timestamp_use_current() {
        let column = ColumnDefinition::new("created_at", ColumnType::Timestamp)
            .precision(3)
            .use_current();

        let rendered = grammar().render_type(&column);
        assert_eq!(rendered.sql, "timestamp(3) without time zone");
        assert_eq!(
            rendered.default,
            Some(DefaultValue::Expression("CURRENT_TIMESTAMP".into()))
        );
        assert!(column.default.is_none());
    }

    #[test]
    fn test_custom_type_renders_empty() {
        let column = ColumnDefinition::new("shape", "geometry");
        assert_eq!(sql(&column), "");
    }
}
