#![allow(dead_code)]

use oxide_postgres::prelude::*;
use serde_json::Value;

pub const PREFIX: &str = "goravel_";

pub fn grammar() -> PostgresGrammar {
    PostgresGrammar::new(PREFIX)
}

pub fn users() -> TableBlueprint {
    TableBlueprint::new("users")
}

pub fn compile(blueprint: &TableBlueprint) -> Vec<String> {
    grammar().to_sql(blueprint)
}

pub fn json_compiler() -> JsonCompiler {
    JsonCompiler::new(Wrap::new(PREFIX), SerdeJsonEncoder)
}

/// Wraps `connection` settings in the `database.connections` tree.
pub fn store(connection: &str, settings: Value) -> MapConfigStore {
    let mut store = MapConfigStore::default();
    store.set(&format!("database.connections.{connection}"), settings);
    store
}
