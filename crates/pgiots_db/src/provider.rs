//! [`SchemaProvider`] over a live PostgreSQL database.

use async_trait::async_trait;
use pgiots_core::{
    ColumnDefinition, EnumDefinitions, GenError, Options, SchemaProvider, TableDefinition,
};
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::error::{DbError, Result};
use crate::pool::{create_pool, DbConfig};
use crate::udt::column_type_tag;

/// Schema used when none is requested.
pub const DEFAULT_SCHEMA: &str = "public";

const TABLES_SQL: &str = r#"
    SELECT table_name::text AS table_name
    FROM information_schema.columns
    WHERE table_schema = $1
    GROUP BY table_name
    ORDER BY table_name
"#;

const ENUMS_SQL: &str = r#"
    SELECT t.typname::text AS name, e.enumlabel::text AS value
    FROM pg_type t
    JOIN pg_enum e ON t.oid = e.enumtypid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace
    WHERE n.nspname = $1
    ORDER BY t.typname ASC, e.enumsortorder ASC
"#;

const ENUM_NAMES_SQL: &str = r#"
    SELECT DISTINCT t.typname::text AS name
    FROM pg_type t
    JOIN pg_enum e ON t.oid = e.enumtypid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace
    WHERE n.nspname = $1
"#;

const COLUMNS_SQL: &str = r#"
    SELECT column_name::text AS column_name,
           udt_name::text AS udt_name,
           is_nullable::text AS is_nullable
    FROM information_schema.columns
    WHERE table_name = $1 AND table_schema = $2
    ORDER BY ordinal_position
"#;

/// PostgreSQL-backed schema provider.
#[derive(Debug, Clone)]
pub struct PostgresSchemaProvider {
    pool: PgPool,
}

impl PostgresSchemaProvider {
    /// Connect using the given configuration.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        Ok(Self::from_pool(create_pool(config).await?))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool.
    pub async fn close(self) {
        self.pool.close().await;
    }

    async fn fetch_tables(&self, schema: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(TABLES_SQL)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("table_name").map_err(DbError::from))
            .collect()
    }

    async fn fetch_enums(&self, schema: &str) -> Result<EnumDefinitions> {
        let rows = sqlx::query(ENUMS_SQL)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;

        let mut enums = EnumDefinitions::new();
        for row in &rows {
            let name: String = row.try_get("name")?;
            let value: String = row.try_get("value")?;
            enums.push_member(&name, value);
        }
        Ok(enums)
    }

    async fn fetch_enum_names(&self, schema: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(ENUM_NAMES_SQL)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(DbError::from))
            .collect()
    }

    async fn fetch_columns(
        &self,
        table: &str,
        schema: &str,
        options: &Options,
    ) -> Result<TableDefinition> {
        let enum_names = self.fetch_enum_names(schema).await?;
        let rows = sqlx::query(COLUMNS_SQL)
            .bind(table)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(DbError::not_found(format!(
                "table '{}.{}' has no columns or does not exist",
                schema, table
            )));
        }

        let mut definition = TableDefinition::new();
        for row in &rows {
            let column: String = row.try_get("column_name")?;
            let udt_name: String = row.try_get("udt_name")?;
            let is_nullable: String = row.try_get("is_nullable")?;
            let type_tag = column_type_tag(&udt_name, &enum_names, options, table, &column);
            definition.push(
                column,
                ColumnDefinition {
                    type_tag: Some(type_tag),
                    nullable: is_nullable == "YES",
                },
            );
        }
        debug!(table, schema, columns = definition.len(), "Introspected table");
        Ok(definition)
    }
}

#[async_trait]
impl SchemaProvider for PostgresSchemaProvider {
    async fn default_schema(&self) -> pgiots_core::Result<String> {
        Ok(DEFAULT_SCHEMA.to_string())
    }

    async fn schema_tables(&self, schema: &str) -> pgiots_core::Result<Vec<String>> {
        self.fetch_tables(schema)
            .await
            .map_err(|e| GenError::schema_fetch("schema_tables", e))
    }

    async fn enum_types(&self, schema: &str) -> pgiots_core::Result<EnumDefinitions> {
        self.fetch_enums(schema)
            .await
            .map_err(|e| GenError::schema_fetch("enum_types", e))
    }

    async fn table_types(
        &self,
        table: &str,
        schema: &str,
        options: &Options,
    ) -> pgiots_core::Result<TableDefinition> {
        self.fetch_columns(table, schema, options)
            .await
            .map_err(|e| GenError::schema_fetch("table_types", e))
    }
}
