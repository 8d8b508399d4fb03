//! `jsonb` path expressions.
//!
//! Paths use `->` between segments, e.g. `options->languages[0]->name`. A
//! plain selector extracts the last segment as text (`->>`); containment,
//! key, length and update expressions keep every step as `jsonb` (`->`).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::wrap::Wrap;

static TRAILING_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(-?[0-9]+)\]$").expect("valid trailing index regex"));

const SEPARATOR: &str = "->";

/// Encodes values bound into JSON expressions.
pub trait JsonEncoder: Send + Sync {
    /// Encodes `value` as JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be represented as JSON.
    fn encode(&self, value: &Value) -> Result<String>;
}

/// [`JsonEncoder`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonEncoder;

impl JsonEncoder for SerdeJsonEncoder {
    fn encode(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }
}

/// SQL text with `?` placeholders and the values bound to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl Expression {
    /// Creates an expression without bindings.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }
}

/// New value of a column in an update.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnUpdate {
    /// A plain value.
    Value(Value),
    /// A computed expression such as nested `jsonb_set` calls.
    Expression(Expression),
}

/// Compiles JSON path expressions for `jsonb` columns.
#[derive(Debug, Clone, Default)]
pub struct JsonCompiler<E = SerdeJsonEncoder> {
    wrap: Wrap,
    encoder: E,
}

impl<E: JsonEncoder> JsonCompiler<E> {
    /// Creates a compiler quoting with `wrap` and encoding with `encoder`.
    #[must_use]
    pub const fn new(wrap: Wrap, encoder: E) -> Self {
        Self { wrap, encoder }
    }

    /// `data->details->name` becomes `"data"->'details'->>'name'`.
    #[must_use]
    pub fn compile_json_selector(&self, column: &str) -> String {
        self.selector(column, "->>")
    }

    /// Tests whether the value at `column` contains `value`.
    ///
    /// # Errors
    ///
    /// Returns the encoder's error when `value` cannot be encoded.
    pub fn compile_json_contains(
        &self,
        column: &str,
        value: &Value,
        negate: bool,
    ) -> Result<Expression> {
        let binding = self.encoder.encode(value)?;
        let column = self.selector(column, SEPARATOR);

        Ok(Expression {
            sql: self.wrap.not(&format!("({column})::jsonb @> ?"), negate),
            bindings: vec![Value::String(binding)],
        })
    }

    /// Tests whether the path exists.
    ///
    /// When the last segment is an array index (`items[2]` or a bare `2`),
    /// the test checks the array length instead of key presence. Negative
    /// indices count from the end.
    #[must_use]
    pub fn compile_json_contains_key(&self, column: &str, negate: bool) -> String {
        let mut segments: Vec<&str> = column.split(SEPARATOR).collect();
        let last = segments.pop().unwrap_or_default();

        let index = if let Ok(index) = last.parse::<i64>() {
            Some(index)
        } else if let Some(captures) = TRAILING_INDEX.captures(last) {
            segments.push(&last[..last.len() - captures[0].len()]);
            captures[1].parse::<i64>().ok()
        } else {
            None
        };

        let column = self.selector(&segments.join(SEPARATOR), SEPARATOR);

        let sql = match index {
            Some(index) => {
                let length = if index < 0 { -index } else { index + 1 };
                format!(
                    "case when jsonb_typeof(({column})::jsonb) = 'array' \
                     then jsonb_array_length(({column})::jsonb) >= {length} else false end"
                )
            }
            None if last.is_empty() => format!("coalesce(({column})::jsonb ? '', false)"),
            None => format!(
                "coalesce(({column})::jsonb ? {}, false)",
                self.wrap.quote(last)
            ),
        };

        self.wrap.not(&sql, negate)
    }

    /// Length of the array at `column`.
    #[must_use]
    pub fn compile_json_length(&self, column: &str) -> String {
        format!(
            "jsonb_array_length(({})::jsonb)",
            self.selector(column, SEPARATOR)
        )
    }

    /// Rewrites `column->path` keys into `jsonb_set` expressions.
    ///
    /// Several paths into the same column nest in key order. Keys without a
    /// path pass through unchanged, unless a path into the same column
    /// follows, in which case the plain value becomes the `jsonb_set` base.
    ///
    /// # Errors
    ///
    /// Returns the encoder's error when a value cannot be encoded.
    pub fn compile_json_columns_update(
        &self,
        values: &BTreeMap<String, Value>,
    ) -> Result<BTreeMap<String, ColumnUpdate>> {
        let mut compiled = BTreeMap::new();

        for (key, value) in values {
            let Some((column, path)) = key.split_once(SEPARATOR) else {
                compiled.insert(key.clone(), ColumnUpdate::Value(value.clone()));
                continue;
            };

            let segments: Vec<&str> = path.split(SEPARATOR).collect();
            let path = format!(
                "{{{}}}",
                self.wrap.json_path_attributes(&segments, '"').join(",")
            );
            let binding = self.encoder.encode(value)?;

            let target = match compiled.remove(column) {
                Some(ColumnUpdate::Expression(expression)) => expression,
                Some(ColumnUpdate::Value(base)) => Expression {
                    sql: "?::jsonb".to_string(),
                    bindings: vec![Value::String(self.encoder.encode(&base)?)],
                },
                None => Expression::raw(format!("{}::jsonb", self.wrap.column(column))),
            };

            let mut bindings = target.bindings;
            bindings.push(Value::String(path));
            bindings.push(Value::String(binding));

            compiled.insert(
                column.to_string(),
                ColumnUpdate::Expression(Expression {
                    sql: format!("jsonb_set({},?,?)", target.sql),
                    bindings,
                }),
            );
        }

        Ok(compiled)
    }

    /// Converts numbers and booleans to strings so the driver binds them as
    /// text. Arrays are converted element by element.
    #[must_use]
    pub fn compile_json_values(&self, values: &[Value]) -> Vec<Value> {
        values.iter().map(normalize).collect()
    }

    fn selector(&self, column: &str, last_operator: &str) -> String {
        let mut path = column.split(SEPARATOR);
        let field = self.wrap.column(path.next().unwrap_or_default());

        let rest: Vec<&str> = path.collect();
        let attributes = self.wrap.json_path_attributes(&rest, '\'');
        match attributes.split_last() {
            None => field,
            Some((last, [])) => format!("{field}{last_operator}{last}"),
            Some((last, init)) => format!(
                "{field}{SEPARATOR}{}{last_operator}{last}",
                init.join(SEPARATOR)
            ),
        }
    }
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::Number(number) => Value::String(number.to_string()),
        Value::Bool(flag) => Value::String(flag.to_string()),
        Value::Array(items) if !items.is_empty() => {
            Value::Array(items.iter().map(normalize).collect())
        }
        other => other.clone(),
    }
}
