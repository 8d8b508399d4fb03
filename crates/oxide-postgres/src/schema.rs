//! Column descriptors consumed by the grammar.
//!
//! These types are produced by a schema builder and only read by the
//! compiler. A [`ColumnDefinition`] carries an abstract [`ColumnType`] tag
//! plus the parameters each type renderer needs.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Abstract column type tags.
///
/// Tags are written in camelCase (`bigInteger`, `timestampTz`, ...). Any tag
/// outside the known set parses as [`ColumnType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    BigInteger,
    Boolean,
    Char,
    Date,
    DateTime,
    DateTimeTz,
    Decimal,
    Double,
    Enum,
    Float,
    Integer,
    Json,
    Jsonb,
    LongText,
    MediumInteger,
    MediumText,
    SmallInteger,
    String,
    Text,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    TinyInteger,
    TinyText,
    Uuid,
    /// A tag the grammar has no renderer for.
    Custom(String),
}

impl ColumnType {
    /// Every tag with a built-in renderer.
    pub const KNOWN: [Self; 26] = [
        Self::BigInteger,
        Self::Boolean,
        Self::Char,
        Self::Date,
        Self::DateTime,
        Self::DateTimeTz,
        Self::Decimal,
        Self::Double,
        Self::Enum,
        Self::Float,
        Self::Integer,
        Self::Json,
        Self::Jsonb,
        Self::LongText,
        Self::MediumInteger,
        Self::MediumText,
        Self::SmallInteger,
        Self::String,
        Self::Text,
        Self::Time,
        Self::TimeTz,
        Self::Timestamp,
        Self::TimestampTz,
        Self::TinyInteger,
        Self::TinyText,
        Self::Uuid,
    ];

    /// Returns the camelCase tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::BigInteger => "bigInteger",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::DateTimeTz => "dateTimeTz",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Enum => "enum",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::LongText => "longText",
            Self::MediumInteger => "mediumInteger",
            Self::MediumText => "mediumText",
            Self::SmallInteger => "smallInteger",
            Self::String => "string",
            Self::Text => "text",
            Self::Time => "time",
            Self::TimeTz => "timeTz",
            Self::Timestamp => "timestamp",
            Self::TimestampTz => "timestampTz",
            Self::TinyInteger => "tinyInteger",
            Self::TinyText => "tinyText",
            Self::Uuid => "uuid",
            Self::Custom(tag) => tag.as_str(),
        }
    }

    /// Returns whether this is one of the integer types that have a
    /// `serial` counterpart.
    #[must_use]
    pub const fn is_serial(&self) -> bool {
        matches!(
            self,
            Self::BigInteger
                | Self::Integer
                | Self::MediumInteger
                | Self::SmallInteger
                | Self::TinyInteger
        )
    }
}

impl FromStr for ColumnType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::KNOWN
            .iter()
            .find(|known| known.tag() == s)
            .cloned()
            .unwrap_or_else(|| Self::Custom(s.to_string())))
    }
}

impl From<&str> for ColumnType {
    fn from(tag: &str) -> Self {
        match tag.parse() {
            Ok(column_type) => column_type,
            Err(never) => match never {},
        }
    }
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ColumnType> for String {
    fn from(column_type: ColumnType) -> Self {
        column_type.tag().to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default, stored as `'1'` or `'0'`.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`).
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of this default value.
    ///
    /// Literals are single-quoted and left for the server to coerce into the
    /// column type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => (if *b { "'1'" } else { "'0'" }).to_string(),
            Self::Integer(i) => format!("'{i}'"),
            Self::Float(f) => format!("'{f}'"),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ForeignKeyAction {
    /// No action (error if referenced row is deleted/updated).
    #[default]
    NoAction,
    /// Restrict (same as NoAction but checked immediately).
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the foreign key column to NULL.
    SetNull,
    /// Set the foreign key column to its default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of this action.
    #[must_use]
    pub const fn to_sql(self) -> &'static str {
        match self {
            Self::NoAction => "no action",
            Self::Restrict => "restrict",
            Self::Cascade => "cascade",
            Self::SetNull => "set null",
            Self::SetDefault => "set default",
        }
    }
}

/// Identity generation settings of a column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedAs {
    /// `generated always` instead of `generated by default`.
    pub always: bool,
    /// Optional sequence options, e.g. `start with 10 increment by 2`.
    pub expression: Option<String>,
}

/// Abstract description of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Abstract type tag.
    pub column_type: ColumnType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
    /// Length for `string` and `char`.
    pub length: Option<u32>,
    /// Precision for `float`, `time` and `timestamp` types.
    pub precision: Option<u32>,
    /// Total digits for `decimal`.
    pub total: u32,
    /// Digits after the decimal point for `decimal`.
    pub places: u32,
    /// Allowed values for `enum`.
    pub allowed: Vec<String>,
    /// Whether the column is being altered rather than created.
    pub change: bool,
    /// Whether a timestamp column defaults to `CURRENT_TIMESTAMP`.
    pub use_current: bool,
    /// Identity generation settings.
    pub generated_as: Option<GeneratedAs>,
    /// Column comment.
    pub comment: Option<String>,
}

impl ColumnDefinition {
    /// Creates a new NOT NULL column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            nullable: false,
            default: None,
            auto_increment: false,
            length: None,
            precision: None,
            total: 8,
            places: 2,
            allowed: Vec::new(),
            change: false,
            use_current: false,
            generated_as: None,
            comment: None,
        }
    }

    /// Creates an auto-incrementing `bigInteger` column.
    #[must_use]
    pub fn id(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::BigInteger).auto_increment()
    }

    /// Creates a `string` column of the given length.
    #[must_use]
    pub fn string(name: impl Into<String>, length: u32) -> Self {
        Self::new(name, ColumnType::String).length(length)
    }

    /// Creates a `decimal(total, places)` column.
    #[must_use]
    pub fn decimal(name: impl Into<String>, total: u32, places: u32) -> Self {
        let mut column = Self::new(name, ColumnType::Decimal);
        column.total = total;
        column.places = places;
        column
    }

    /// Creates an `enum` column restricted to `allowed`.
    #[must_use]
    pub fn enumeration<S: Into<String>>(
        name: impl Into<String>,
        allowed: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut column = Self::new(name, ColumnType::Enum);
        column.allowed = allowed.into_iter().map(Into::into).collect();
        column
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the column as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the precision.
    #[must_use]
    pub const fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Marks the column as altered.
    #[must_use]
    pub const fn change(mut self) -> Self {
        self.change = true;
        self
    }

    /// Defaults the column to the current timestamp.
    #[must_use]
    pub const fn use_current(mut self) -> Self {
        self.use_current = true;
        self
    }

    /// Makes the column an identity column.
    #[must_use]
    pub fn generated_as(mut self, always: bool, expression: Option<&str>) -> Self {
        self.generated_as = Some(GeneratedAs {
            always,
            expression: expression.map(ToString::to_string),
        });
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
