//! Connection configuration.
//!
//! Settings live under `database.connections.<name>` in a [`ConfigStore`].
//! A connection may list several `write` and `read` endpoints; each entry
//! only overrides what differs from the connection-wide settings:
//!
//! ```json
//! {
//!   "database": {
//!     "connections": {
//!       "postgres": {
//!         "host": "127.0.0.1",
//!         "port": 5432,
//!         "database": "goravel",
//!         "username": "root",
//!         "password": "secret",
//!         "prefix": "goravel_",
//!         "read": [{ "host": "replica" }]
//!       }
//!     }
//!   }
//! }
//! ```

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{PostgresError, Result};
use crate::processor::parse_flag;

/// Schema used when neither the entry nor the connection names one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Nested key-value configuration read through dotted keys.
pub trait ConfigStore: Send + Sync {
    /// Returns the raw value at `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Returns the value at `key` as a string, or `default`.
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(value)) => value,
            Some(Value::Number(value)) => value.to_string(),
            Some(Value::Bool(value)) => value.to_string(),
            _ => default.to_string(),
        }
    }

    /// Returns the value at `key` as an integer, or `default`.
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(Value::Number(value)) => value.as_i64().unwrap_or(default),
            Some(Value::String(value)) => value.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Returns the value at `key` as a boolean, or `default`.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(value)) => value,
            Some(Value::String(value)) => parse_flag(value.trim()).unwrap_or(default),
            Some(Value::Number(value)) => value.as_i64().map_or(default, |n| n != 0),
            _ => default,
        }
    }
}

/// [`ConfigStore`] over an in-memory JSON tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapConfigStore {
    root: Value,
}

impl MapConfigStore {
    /// Wraps a JSON tree.
    #[must_use]
    pub const fn new(root: Value) -> Self {
        Self { root }
    }

    /// Sets `key`, creating intermediate objects as needed.
    pub fn set(&mut self, key: &str, value: Value) {
        let mut node = &mut self.root;
        for segment in key.split('.') {
            if !node.is_object() {
                *node = Value::Object(serde_json::Map::new());
            }
            let Some(map) = node.as_object_mut() else {
                return;
            };
            node = map.entry(segment.to_string()).or_insert(Value::Null);
        }
        *node = value;
    }
}

impl ConfigStore for MapConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        key.split('.')
            .try_fold(&self.root, |node, segment| node.get(segment))
            .filter(|value| !value.is_null())
            .cloned()
    }
}

/// One `read` or `write` entry.
///
/// Empty fields (and a zero port) fall back to the connection-wide value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dsn: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub schema: String,
}

/// Replaces substrings of table and column names.
///
/// Pairs are tried in order at each position and replaced in a single pass,
/// so a replacement is never rescanned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameReplacer {
    pairs: Vec<(String, String)>,
}

impl NameReplacer {
    /// Creates a replacer from `(from, to)` pairs.
    #[must_use]
    pub fn new<F: Into<String>, T: Into<String>>(pairs: impl IntoIterator<Item = (F, T)>) -> Self {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .filter(|(from, _)| !from.is_empty())
                .collect(),
        }
    }

    /// Reads `{"from": "to"}` or `[["from", "to"]]`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(from, to)| to.as_str().map(|to| (from.clone(), to.to_string())))
                .collect::<Option<Vec<_>>>()
                .map(Self::new),
            Value::Array(_) => serde_json::from_value::<Vec<(String, String)>>(value.clone())
                .ok()
                .map(Self::new),
            _ => None,
        }
    }

    /// Applies the replacements to `name`.
    #[must_use]
    pub fn replace(&self, name: &str) -> String {
        let mut replaced = String::with_capacity(name.len());
        let mut rest = name;

        while let Some(first) = rest.chars().next() {
            if let Some((from, to)) = self.pairs.iter().find(|(from, _)| rest.starts_with(from.as_str())) {
                replaced.push_str(to);
                rest = &rest[from.len()..];
            } else {
                replaced.push(first);
                rest = &rest[first.len_utf8()..];
            }
        }

        replaced
    }
}

/// A fully resolved endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FullConfig {
    #[serde(flatten)]
    pub config: Config,
    pub driver: String,
    pub connection: String,
    pub prefix: String,
    pub singular: bool,
    pub sslmode: String,
    pub timezone: String,
    pub no_lower_case: bool,
    pub name_replacer: Option<NameReplacer>,
}

impl FullConfig {
    /// Returns the DSN, building one from the endpoint's own fields when no
    /// literal DSN is set.
    ///
    /// Returns `None` when there is neither a DSN nor a host.
    #[must_use]
    pub fn dsn(&self) -> Option<String> {
        let config = &self.config;
        if !config.dsn.is_empty() {
            return Some(config.dsn.clone());
        }
        if config.host.is_empty() {
            return None;
        }

        let mut dsn = format!(
            "postgres://{}:{}@{}:{}/{}",
            utf8_percent_encode(&config.username, NON_ALPHANUMERIC),
            utf8_percent_encode(&config.password, NON_ALPHANUMERIC),
            config.host,
            config.port,
            config.database
        );

        let params: Vec<String> = [
            ("sslmode", self.sslmode.as_str()),
            ("timezone", self.timezone.as_str()),
            ("search_path", config.schema.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", utf8_percent_encode(value, NON_ALPHANUMERIC)))
        .collect();

        if !params.is_empty() {
            dsn.push('?');
            dsn.push_str(&params.join("&"));
        }

        Some(dsn)
    }
}

/// Resolves the read and write endpoints of one connection.
#[derive(Debug, Clone)]
pub struct ConfigBuilder<S> {
    store: S,
    connection: String,
}

impl<S: ConfigStore> ConfigBuilder<S> {
    /// Creates a resolver for `connection`.
    #[must_use]
    pub fn new(store: S, connection: impl Into<String>) -> Self {
        Self {
            store,
            connection: connection.into(),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the connection name.
    #[must_use]
    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// Resolves the `read` endpoints. Empty when none are configured.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresError::Config`] when `read` is not a list of entries.
    pub fn reads(&self) -> Result<Vec<FullConfig>> {
        Ok(self
            .entries("read")?
            .map(|configs| self.fill_default(configs))
            .unwrap_or_default())
    }

    /// Resolves the `write` endpoints.
    ///
    /// Without a `write` list, a single endpoint is built from the
    /// connection-wide settings, so there is always at least one.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresError::Config`] when `write` is not a list of entries.
    pub fn writes(&self) -> Result<Vec<FullConfig>> {
        let configs = match self.entries("write")? {
            Some(configs) if !configs.is_empty() => configs,
            _ => {
                debug!(connection = %self.connection, "No write endpoints, using connection defaults");
                vec![Config::default()]
            }
        };

        Ok(self.fill_default(configs))
    }

    fn entries(&self, field: &str) -> Result<Option<Vec<Config>>> {
        let key = self.key(field);
        let Some(value) = self.store.get(&key) else {
            return Ok(None);
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| PostgresError::Config {
                key,
                message: e.to_string(),
            })
    }

    fn fill_default(&self, configs: Vec<Config>) -> Vec<FullConfig> {
        let driver = self.store.get_string(&self.key("driver"), "");
        let prefix = self.store.get_string(&self.key("prefix"), "");
        let singular = self.store.get_bool(&self.key("singular"), false);
        let no_lower_case = self.store.get_bool(&self.key("no_lower_case"), false);
        let sslmode = self.store.get_string(&self.key("sslmode"), "");
        let timezone = self.store.get_string(&self.key("timezone"), "");
        let name_replacer = self.name_replacer();

        configs
            .into_iter()
            .map(|mut config| {
                self.fill_string(&mut config.dsn, "dsn", "");
                self.fill_string(&mut config.host, "host", "");
                self.fill_string(&mut config.username, "username", "");
                self.fill_string(&mut config.password, "password", "");
                self.fill_string(&mut config.database, "database", "");
                self.fill_string(&mut config.schema, "schema", DEFAULT_SCHEMA);
                if config.port == 0 {
                    config.port = self.port();
                }

                FullConfig {
                    config,
                    driver: driver.clone(),
                    connection: self.connection.clone(),
                    prefix: prefix.clone(),
                    singular,
                    sslmode: sslmode.clone(),
                    timezone: timezone.clone(),
                    no_lower_case,
                    name_replacer: name_replacer.clone(),
                }
            })
            .collect()
    }

    fn fill_string(&self, field: &mut String, name: &str, default: &str) {
        if field.is_empty() {
            *field = self.store.get_string(&self.key(name), default);
        }
    }

    fn port(&self) -> u16 {
        let key = self.key("port");
        let port = self.store.get_int(&key, 0);
        u16::try_from(port).unwrap_or_else(|_| {
            warn!(key = %key, port, "Port out of range, ignoring");
            0
        })
    }

    fn name_replacer(&self) -> Option<NameReplacer> {
        let key = self.key("name_replacer");
        let value = self.store.get(&key)?;
        let replacer = NameReplacer::from_value(&value);
        if replacer.is_none() {
            warn!(key = %key, "Unsupported name replacer, ignoring");
        }
        replacer
    }

    fn key(&self, field: &str) -> String {
        format!("database.connections.{}.{field}", self.connection)
    }
}
