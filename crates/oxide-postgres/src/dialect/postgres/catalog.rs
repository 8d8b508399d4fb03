//! Catalog queries and bulk drops.

use tracing::debug;

use super::PostgresGrammar;
use crate::error::{PostgresError, Result};
use crate::introspection::{Table, Type, View};

/// Tables owned by extensions that a bulk drop must leave alone.
const EXCLUDED_TABLES: [&str; 1] = ["spatial_ref_sys"];

/// Splits `schema.table` into its parts, falling back to `default_schema`.
///
/// # Errors
///
/// Returns [`PostgresError::EmptyReference`] for an empty reference and
/// [`PostgresError::ReferenceFormat`] when it has more than one dot.
pub fn parse_schema_and_table(reference: &str, default_schema: &str) -> Result<(String, String)> {
    if reference.is_empty() {
        return Err(PostgresError::EmptyReference);
    }

    let parts: Vec<&str> = reference.split('.').collect();
    match parts.as_slice() {
        [table] => Ok((default_schema.to_string(), (*table).to_string())),
        [schema, table] => Ok(((*schema).to_string(), (*table).to_string())),
        _ => Err(PostgresError::ReferenceFormat {
            reference: reference.to_string(),
        }),
    }
}

#[allow(clippy::unused_self)]
impl PostgresGrammar {
    /// Lists the columns of a table.
    ///
    /// `table` may be schema-qualified, in which case it overrides `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error when the table reference is malformed.
    pub fn compile_columns(&self, schema: &str, table: &str) -> Result<String> {
        let (schema, table) = self.catalog_target(schema, table)?;

        Ok(format!(
            "select a.attname as name, t.typname as type_name, format_type(a.atttypid, a.atttypmod) as type, \
             (select tc.collcollate from pg_catalog.pg_collation tc where tc.oid = a.attcollation) as collation, \
             not a.attnotnull as nullable, \
             (select pg_get_expr(adbin, adrelid) from pg_attrdef where c.oid = pg_attrdef.adrelid and pg_attrdef.adnum = a.attnum) as default, \
             col_description(c.oid, a.attnum) as comment \
             from pg_attribute a, pg_class c, pg_type t, pg_namespace n \
             where c.relname = {table} and n.nspname = {schema} and a.attnum > 0 and a.attrelid = c.oid \
             and a.atttypid = t.oid and n.oid = c.relnamespace \
             order by a.attnum"
        ))
    }

    /// Lists the foreign keys of a table.
    ///
    /// # Errors
    ///
    /// Returns an error when the table reference is malformed.
    pub fn compile_foreign_keys(&self, schema: &str, table: &str) -> Result<String> {
        let (schema, table) = self.catalog_target(schema, table)?;

        Ok(format!(
            "select c.conname as name, \
             string_agg(la.attname, ',' order by conseq.ord) as columns, \
             fn.nspname as foreign_schema, fc.relname as foreign_table, \
             string_agg(fa.attname, ',' order by conseq.ord) as foreign_columns, \
             c.confupdtype as on_update, c.confdeltype as on_delete \
             from pg_constraint c \
             join pg_class tc on c.conrelid = tc.oid \
             join pg_namespace tn on tn.oid = tc.relnamespace \
             join pg_class fc on c.confrelid = fc.oid \
             join pg_namespace fn on fn.oid = fc.relnamespace \
             join lateral unnest(c.conkey) with ordinality as conseq(num, ord) on true \
             join pg_attribute la on la.attrelid = c.conrelid and la.attnum = conseq.num \
             join pg_attribute fa on fa.attrelid = c.confrelid and fa.attnum = c.confkey[conseq.ord] \
             where c.contype = 'f' and tc.relname = {table} and tn.nspname = {schema} \
             group by c.conname, fn.nspname, fc.relname, c.confupdtype, c.confdeltype"
        ))
    }

    /// Lists the indexes of a table.
    ///
    /// # Errors
    ///
    /// Returns an error when the table reference is malformed.
    pub fn compile_indexes(&self, schema: &str, table: &str) -> Result<String> {
        let (schema, table) = self.catalog_target(schema, table)?;

        Ok(format!(
            "select ic.relname as name, string_agg(a.attname, ',' order by indseq.ord) as columns, \
             am.amname as \"type\", i.indisunique as \"unique\", i.indisprimary as \"primary\" \
             from pg_index i \
             join pg_class tc on tc.oid = i.indrelid \
             join pg_namespace tn on tn.oid = tc.relnamespace \
             join pg_class ic on ic.oid = i.indexrelid \
             join pg_am am on am.oid = ic.relam \
             join lateral unnest(i.indkey) with ordinality as indseq(num, ord) on true \
             left join pg_attribute a on a.attrelid = i.indrelid and a.attnum = indseq.num \
             where tc.relname = {table} and tn.nspname = {schema} \
             group by ic.relname, am.amname, i.indisunique, i.indisprimary"
        ))
    }

    /// Lists ordinary and partitioned tables outside the system schemas.
    #[must_use]
    pub fn compile_tables(&self) -> String {
        "select c.relname as name, n.nspname as schema, pg_total_relation_size(c.oid) as size, \
         obj_description(c.oid, 'pg_class') as comment from pg_class c, pg_namespace n \
         where c.relkind in ('r', 'p') and n.oid = c.relnamespace \
         and n.nspname not in ('pg_catalog', 'information_schema') \
         order by c.relname"
            .to_string()
    }

    /// Lists user-defined types, excluding those owned by extensions.
    #[must_use]
    pub fn compile_types(&self) -> String {
        "select t.typname as name, n.nspname as schema, t.typtype as type, t.typcategory as category, \
         ((t.typinput = 'array_in'::regproc and t.typoutput = 'array_out'::regproc) or t.typtype = 'm') as implicit \
         from pg_type t \
         join pg_namespace n on n.oid = t.typnamespace \
         left join pg_class c on c.oid = t.typrelid \
         left join pg_type el on el.oid = t.typelem \
         left join pg_class ce on ce.oid = el.typrelid \
         where ((t.typrelid = 0 and (ce.relkind = 'c' or ce.relkind is null)) or c.relkind = 'c') \
         and not exists (select 1 from pg_depend d where d.objid in (t.oid, t.typelem) and d.deptype = 'e') \
         and n.nspname not in ('pg_catalog', 'information_schema')"
            .to_string()
    }

    /// Lists views outside the system schemas.
    #[must_use]
    pub fn compile_views(&self) -> String {
        "select viewname as name, schemaname as schema, definition from pg_views \
         where schemaname not in ('pg_catalog', 'information_schema') order by viewname"
            .to_string()
    }

    /// Reads the server version.
    #[must_use]
    pub fn compile_version(&self) -> String {
        "select current_setting('server_version') as value".to_string()
    }

    /// Drops every table of `schema` in one statement.
    ///
    /// Returns no statement when nothing is left after filtering.
    #[must_use]
    pub fn compile_drop_all_tables(&self, schema: &str, tables: &[Table]) -> Vec<String> {
        let excluded = self.wrap.escape_names(&EXCLUDED_TABLES);
        let names: Vec<String> = tables
            .iter()
            .filter(|table| self.in_schema(schema, &table.schema))
            .map(|table| format!("{}.{}", table.schema, table.name))
            .filter(|qualified| {
                let escaped = self.escape_name(qualified);
                let bare = qualified.rsplit_once('.').map_or("", |(_, name)| name);
                !excluded.contains(&escaped) && !excluded.contains(&self.escape_name(bare))
            })
            .collect();

        self.drop_all("table", &names)
    }

    /// Drops every explicit type and domain of `schema`.
    ///
    /// Emits at most two statements: types first, then domains.
    #[must_use]
    pub fn compile_drop_all_types(&self, schema: &str, types: &[Type]) -> Vec<String> {
        let (domains, types): (Vec<&Type>, Vec<&Type>) = types
            .iter()
            .filter(|t| !t.implicit && self.in_schema(schema, &t.schema))
            .partition(|t| t.kind == "domain");

        let qualify = |t: &&Type| format!("{}.{}", t.schema, t.name);
        let types: Vec<String> = types.iter().map(qualify).collect();
        let domains: Vec<String> = domains.iter().map(qualify).collect();

        let mut statements = self.drop_all("type", &types);
        statements.extend(self.drop_all("domain", &domains));
        statements
    }

    /// Drops the given domains.
    #[must_use]
    pub fn compile_drop_all_domains<S: AsRef<str>>(&self, domains: &[S]) -> String {
        format!(
            "drop domain {} cascade",
            self.wrap.escape_names(domains).join(", ")
        )
    }

    /// Drops every view of `schema` in one statement.
    #[must_use]
    pub fn compile_drop_all_views(&self, schema: &str, views: &[View]) -> Vec<String> {
        let names: Vec<String> = views
            .iter()
            .filter(|view| self.in_schema(schema, &view.schema))
            .map(|view| format!("{}.{}", view.schema, view.name))
            .collect();

        self.drop_all("view", &names)
    }

    fn catalog_target(&self, schema: &str, table: &str) -> Result<(String, String)> {
        let (schema, table) = parse_schema_and_table(table, schema)?;
        let table = format!("{}{table}", self.prefix());

        Ok((self.wrap.quote(&schema), self.wrap.quote(&table)))
    }

    fn escape_name(&self, name: &str) -> String {
        self.wrap.escape_names(&[name]).concat()
    }

    fn in_schema(&self, schema: &str, candidate: &str) -> bool {
        self.escape_name(schema) == self.escape_name(candidate)
    }

    fn drop_all(&self, kind: &str, names: &[String]) -> Vec<String> {
        if names.is_empty() {
            debug!(kind, "Nothing to drop");
            return Vec::new();
        }

        vec![format!(
            "drop {kind} {} cascade",
            self.wrap.escape_names(names).join(", ")
        )]
    }
}
