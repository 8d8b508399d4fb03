//! PostgreSQL driver facade.
//!
//! Ties the configuration resolver, schema grammar, JSON compiler and
//! catalog processor to one named connection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigBuilder, ConfigStore, FullConfig};
use crate::dialect::PostgresGrammar;
use crate::error::Result;
use crate::json::{JsonCompiler, SerdeJsonEncoder};
use crate::processor::Processor;
use crate::query::Query;
use crate::wrap::Wrap;

/// Driver name reported in connection summaries.
pub const DRIVER_NAME: &str = "postgres";

/// Placeholder style of PostgreSQL statements.
pub const PLACEHOLDER_FORMAT: &str = "$";

/// Summary of the primary write endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub connection: String,
    pub driver: String,
    pub dsn: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub prefix: String,
    pub schema: String,
    pub placeholder_format: String,
}

impl From<&FullConfig> for ConnectionSummary {
    fn from(full: &FullConfig) -> Self {
        Self {
            connection: full.connection.clone(),
            driver: DRIVER_NAME.to_string(),
            dsn: full.dsn(),
            host: full.config.host.clone(),
            port: full.config.port,
            database: full.config.database.clone(),
            username: full.config.username.clone(),
            password: full.config.password.clone(),
            prefix: full.prefix.clone(),
            schema: full.config.schema.clone(),
            placeholder_format: PLACEHOLDER_FORMAT.to_string(),
        }
    }
}

/// PostgreSQL driver for one connection.
#[derive(Debug, Clone)]
pub struct Postgres<S> {
    config: ConfigBuilder<S>,
}

impl<S: ConfigStore> Postgres<S> {
    /// Creates a driver for `connection`.
    #[must_use]
    pub fn new(store: S, connection: impl Into<String>) -> Self {
        Self {
            config: ConfigBuilder::new(store, connection),
        }
    }

    /// Returns the connection name.
    #[must_use]
    pub fn connection(&self) -> &str {
        self.config.connection()
    }

    /// Resolves the read endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error when the `read` list is malformed.
    pub fn reads(&self) -> Result<Vec<FullConfig>> {
        self.config.reads()
    }

    /// Resolves the write endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error when the `write` list is malformed.
    pub fn writes(&self) -> Result<Vec<FullConfig>> {
        self.config.writes()
    }

    /// Summarizes the first write endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the `write` list is malformed.
    pub fn config(&self) -> Result<ConnectionSummary> {
        Ok(self
            .primary()?
            .as_ref()
            .map(ConnectionSummary::from)
            .unwrap_or_default())
    }

    /// Returns a schema grammar using the first writer's table prefix.
    ///
    /// # Errors
    ///
    /// Returns an error when the `write` list is malformed.
    pub fn grammar(&self) -> Result<PostgresGrammar> {
        let prefix = self.prefix()?;
        debug!(connection = %self.connection(), prefix = %prefix, "Building schema grammar");
        Ok(PostgresGrammar::new(prefix))
    }

    /// Returns a JSON path compiler using the first writer's table prefix.
    ///
    /// # Errors
    ///
    /// Returns an error when the `write` list is malformed.
    pub fn json(&self) -> Result<JsonCompiler> {
        Ok(JsonCompiler::new(Wrap::new(self.prefix()?), SerdeJsonEncoder))
    }

    /// Returns the catalog row processor.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn processor(&self) -> Processor {
        Processor::new()
    }

    /// Returns the query fragment compiler.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn query(&self) -> Query {
        Query::new()
    }

    fn primary(&self) -> Result<Option<FullConfig>> {
        Ok(self.config.writes()?.into_iter().next())
    }

    fn prefix(&self) -> Result<String> {
        Ok(self.primary()?.map(|full| full.prefix).unwrap_or_default())
    }
}
