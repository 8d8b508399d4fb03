//! Identifier and literal quoting.
//!
//! [`Wrap`] is the single place where user-supplied names become SQL text.
//! Identifiers are double-quoted, string literals are single-quoted, and the
//! configured table prefix is applied to table references only.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a segment carrying one or more trailing `[key]` suffixes.
static ARRAY_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]+\]+$").expect("valid array suffix regex"));

/// Captures each `[key]` of a segment.
static ARRAY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid array key regex"));

const ALIAS: &str = " as ";

/// Quotes identifiers and literals for PostgreSQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrap {
    prefix: String,
}

#[allow(clippy::unused_self)]
impl Wrap {
    /// Creates a wrapper applying `prefix` to every table name.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the table prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Quotes a column reference, e.g. `users.id` or `name as n`.
    ///
    /// When the reference has more than one segment, the first one is
    /// treated as a table and receives the prefix.
    #[must_use]
    pub fn column(&self, column: &str) -> String {
        if let Some((column, alias)) = column.split_once(ALIAS) {
            return format!("{}{ALIAS}{}", self.column(column), self.prefixed_value(alias));
        }

        let segments: Vec<&str> = column.split('.').collect();
        self.segments(&segments)
    }

    /// Quotes every column of the list.
    #[must_use]
    pub fn columns<S: AsRef<str>>(&self, columns: &[S]) -> Vec<String> {
        columns.iter().map(|c| self.column(c.as_ref())).collect()
    }

    /// Quotes the columns and joins them with `", "`.
    #[must_use]
    pub fn columnize<S: AsRef<str>>(&self, columns: &[S]) -> String {
        self.columns(columns).join(", ")
    }

    /// Re-quotes catalog names segment by segment.
    ///
    /// Quote characters already present around a segment are stripped first,
    /// so `'public'."users"` and `public.users` both become `"public"."users"`.
    #[must_use]
    pub fn escape_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .map(|name| {
                let segments: Vec<&str> = name
                    .as_ref()
                    .split('.')
                    .map(|segment| segment.trim_matches(|c| c == '\'' || c == '"'))
                    .collect();
                format!("\"{}\"", segments.join("\".\""))
            })
            .collect()
    }

    /// Negates `value` when `negate` is set.
    #[must_use]
    pub fn not(&self, value: &str, negate: bool) -> String {
        if negate {
            format!("not ({value})")
        } else {
            value.to_string()
        }
    }

    /// Prepends `prefix` and a space to every value.
    #[must_use]
    pub fn prefix_array<S: AsRef<str>>(&self, prefix: &str, values: &[S]) -> Vec<String> {
        values
            .iter()
            .map(|v| format!("{prefix} {}", v.as_ref()))
            .collect()
    }

    /// Renders a string literal. The empty string passes through unchanged.
    #[must_use]
    pub fn quote(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }

        format!("'{}'", value.replace('\'', "''"))
    }

    /// Renders every value as a string literal.
    #[must_use]
    pub fn quotes<S: AsRef<str>>(&self, values: &[S]) -> Vec<String> {
        values.iter().map(|v| self.quote(v.as_ref())).collect()
    }

    /// Quotes dot-separated segments, prefixing the leading table segment.
    #[must_use]
    pub fn segments(&self, segments: &[&str]) -> String {
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if i == 0 && segments.len() > 1 {
                    self.table(segment)
                } else {
                    self.value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a table reference, applying the prefix to the last segment.
    #[must_use]
    pub fn table(&self, table: &str) -> String {
        if let Some((table, alias)) = table.split_once(ALIAS) {
            return format!("{}{ALIAS}{}", self.table(table), self.prefixed_value(alias));
        }

        match table.rsplit_once('.') {
            Some((schema, name)) => {
                format!("{}.{}", self.value(schema), self.prefixed_value(name))
            }
            None => self.prefixed_value(table),
        }
    }

    /// Quotes a single identifier. `*` is left as is.
    #[must_use]
    pub fn value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }

        format!("\"{}\"", value.replace('"', "\"\""))
    }

    /// Renders JSON path segments as operator operands.
    ///
    /// Segments with `[n]` suffixes expand into the key followed by each
    /// index. Integer parts stay bare, all others are wrapped in `quote`.
    #[must_use]
    pub fn json_path_attributes<S: AsRef<str>>(&self, path: &[S], quote: char) -> Vec<String> {
        path.iter()
            .flat_map(|segment| parse_array_keys(segment.as_ref()))
            .map(|part| {
                if part.parse::<i64>().is_ok() {
                    part
                } else if quote == '\'' {
                    format!("'{}'", part.replace('\'', "''"))
                } else {
                    format!("{quote}{part}{quote}")
                }
            })
            .collect()
    }

    fn prefixed_value(&self, name: &str) -> String {
        self.value(&format!("{}{name}", self.prefix))
    }
}

/// Splits `items[0][1]` into `items`, `0`, `1`.
fn parse_array_keys(attribute: &str) -> Vec<String> {
    if !ARRAY_SUFFIX.is_match(attribute) {
        return vec![attribute.to_string()];
    }

    let key = attribute
        .find('[')
        .map_or(attribute, |position| &attribute[..position]);
    let mut parts = Vec::new();
    if !key.is_empty() {
        parts.push(key.to_string());
    }
    parts.extend(
        ARRAY_KEY
            .captures_iter(attribute)
            .map(|captures| captures[1].to_string()),
    );
    parts
}
