//! Normalizes catalog rows into descriptors.

use crate::introspection::{
    Column, DbColumn, DbForeignKey, DbIndex, ForeignKey, Index, Type,
};

/// Default expression prefix of sequence-backed columns.
const SEQUENCE_DEFAULT: &str = "nextval(";

/// Turns raw catalog rows into descriptors. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct Processor;

#[allow(clippy::unused_self)]
impl Processor {
    /// Creates a processor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes column rows.
    #[must_use]
    pub fn process_columns(&self, columns: Vec<DbColumn>) -> Vec<Column> {
        columns
            .into_iter()
            .map(|column| Column {
                autoincrement: column
                    .default
                    .as_deref()
                    .is_some_and(|default| default.starts_with(SEQUENCE_DEFAULT)),
                nullable: parse_bool(&column.nullable),
                name: column.name,
                type_name: column.type_name,
                column_type: column.column_type,
                collation: column.collation,
                default: column.default,
                comment: column.comment,
            })
            .collect()
    }

    /// Normalizes foreign key rows, spelling out action codes.
    #[must_use]
    pub fn process_foreign_keys(&self, foreign_keys: Vec<DbForeignKey>) -> Vec<ForeignKey> {
        foreign_keys
            .into_iter()
            .map(|foreign_key| ForeignKey {
                columns: split_columns(&foreign_key.columns),
                foreign_columns: split_columns(&foreign_key.foreign_columns),
                on_update: foreign_key_action(&foreign_key.on_update),
                on_delete: foreign_key_action(&foreign_key.on_delete),
                name: foreign_key.name,
                foreign_schema: foreign_key.foreign_schema,
                foreign_table: foreign_key.foreign_table,
            })
            .collect()
    }

    /// Normalizes index rows.
    #[must_use]
    pub fn process_indexes(&self, indexes: Vec<DbIndex>) -> Vec<Index> {
        indexes
            .into_iter()
            .map(|index| Index {
                name: index.name.to_lowercase(),
                columns: split_columns(&index.columns),
                index_type: index.index_type.to_lowercase(),
                unique: index.unique,
                primary: index.primary,
            })
            .collect()
    }

    /// Spells out type and category codes. Unknown codes become empty.
    #[must_use]
    pub fn process_types(&self, types: Vec<Type>) -> Vec<Type> {
        types
            .into_iter()
            .map(|t| Type {
                kind: type_kind(&t.kind).to_string(),
                category: type_category(&t.category).to_string(),
                ..t
            })
            .collect()
    }
}

fn split_columns(columns: &str) -> Vec<String> {
    columns.split(',').map(ToString::to_string).collect()
}

/// Reads the boolean spellings drivers use for catalog flags.
fn parse_bool(value: &str) -> bool {
    parse_flag(value).unwrap_or(false)
}

/// Parses `1`/`t`/`true` and `0`/`f`/`false` spellings. Anything else is `None`.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn foreign_key_action(code: &str) -> String {
    let code = code.to_lowercase();
    let action = match code.as_str() {
        "a" => "no action",
        "c" => "cascade",
        "d" => "set default",
        "n" => "set null",
        "r" => "restrict",
        _ => return code,
    };
    action.to_string()
}

const fn type_kind_name(code: u8) -> &'static str {
    match code {
        b'b' => "base",
        b'c' => "composite",
        b'd' => "domain",
        b'e' => "enum",
        b'p' => "pseudo",
        b'r' => "range",
        b'm' => "multirange",
        _ => "",
    }
}

const fn type_category_name(code: u8) -> &'static str {
    match code {
        b'a' => "array",
        b'b' => "boolean",
        b'c' => "composite",
        b'd' => "date_time",
        b'e' => "enum",
        b'g' => "geometric",
        b'i' => "network_address",
        b'n' => "numeric",
        b'p' => "pseudo",
        b'r' => "range",
        b's' => "string",
        b't' => "timespan",
        b'u' => "user_defined",
        b'v' => "bit_string",
        b'x' => "unknown",
        b'z' => "internal_use",
        _ => "",
    }
}

fn single_code(code: &str) -> Option<u8> {
    match code.as_bytes() {
        [byte] => Some(*byte),
        _ => None,
    }
}

fn type_kind(code: &str) -> &'static str {
    single_code(code).map_or("", type_kind_name)
}

fn type_category(code: &str) -> &'static str {
    single_code(code).map_or("", type_category_name)
}
