//! Schema metadata sources.
//!
//! [`SchemaProvider`] is the seam between the generator and whatever knows
//! the database layout. The live PostgreSQL implementation lives in the
//! `pgiots_db` crate; [`StaticSchemaProvider`] serves fixed metadata from
//! memory or from a JSON snapshot file.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::naming::normalize;
use crate::options::{NameKind, Options};
use crate::type_map::TypeTag;
use crate::types::{ColumnDefinition, EnumDefinitions, TableDefinition};

/// Source of schema, table, column and enum metadata.
///
/// Every lookup is a suspension point of a generation run. Failures should be
/// reported as [`GenError::SchemaFetch`].
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Schema used when the caller does not name one.
    async fn default_schema(&self) -> Result<String>;

    /// Tables of `schema`, in the order they should be emitted.
    async fn schema_tables(&self, schema: &str) -> Result<Vec<String>>;

    /// Enum types of `schema` with their members in declaration order.
    async fn enum_types(&self, schema: &str) -> Result<EnumDefinitions>;

    /// Column definitions of one table, in column order.
    ///
    /// `options` lets providers name enum references the way the enum
    /// emitter will name the enum declarations.
    async fn table_types(
        &self,
        table: &str,
        schema: &str,
        options: &Options,
    ) -> Result<TableDefinition>;
}

/// Metadata of a single schema in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Tables in emission order.
    #[serde(default)]
    pub tables: Vec<NamedTable>,
    #[serde(default)]
    pub enums: EnumDefinitions,
}

/// A table name paired with its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTable {
    pub name: String,
    pub columns: TableDefinition,
}

/// Snapshot file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "default_schema_name")]
    pub default_schema: String,
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaSnapshot>,
}

fn default_schema_name() -> String {
    "public".to_string()
}

/// In-memory schema provider.
#[derive(Debug, Clone)]
pub struct StaticSchemaProvider {
    snapshot: Snapshot,
}

impl StaticSchemaProvider {
    /// Create an empty provider whose default schema is `default_schema`.
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            snapshot: Snapshot {
                default_schema: default_schema.into(),
                schemas: BTreeMap::new(),
            },
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a JSON snapshot file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GenError::schema_fetch("load_snapshot", e))?;
        Self::from_json_str(&raw)
    }

    /// Parse a JSON snapshot.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(raw).map_err(|e| GenError::schema_fetch("load_snapshot", e))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Add or replace a table in `schema`, keeping first-insertion position.
    pub fn with_table(
        mut self,
        schema: &str,
        table: impl Into<String>,
        columns: TableDefinition,
    ) -> Self {
        let table = table.into();
        let entry = self.snapshot.schemas.entry(schema.to_string()).or_default();
        match entry.tables.iter_mut().find(|t| t.name == table) {
            Some(existing) => existing.columns = columns,
            None => entry.tables.push(NamedTable {
                name: table,
                columns,
            }),
        }
        self
    }

    /// Add or replace an enum in `schema`.
    pub fn with_enum(mut self, schema: &str, name: impl Into<String>, members: Vec<String>) -> Self {
        self.snapshot
            .schemas
            .entry(schema.to_string())
            .or_default()
            .enums
            .insert(name, members);
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn schema(&self, operation: &'static str, schema: &str) -> Result<&SchemaSnapshot> {
        self.snapshot.schemas.get(schema).ok_or_else(|| {
            GenError::schema_fetch(operation, format!("schema '{}' not found", schema))
        })
    }
}

#[async_trait]
impl SchemaProvider for StaticSchemaProvider {
    async fn default_schema(&self) -> Result<String> {
        Ok(self.snapshot.default_schema.clone())
    }

    async fn schema_tables(&self, schema: &str) -> Result<Vec<String>> {
        let schema = self.schema("schema_tables", schema)?;
        Ok(schema.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn enum_types(&self, schema: &str) -> Result<EnumDefinitions> {
        // A schema without enums is not an error for this lookup.
        Ok(self
            .snapshot
            .schemas
            .get(schema)
            .map(|s| s.enums.clone())
            .unwrap_or_default())
    }

    async fn table_types(
        &self,
        table: &str,
        schema: &str,
        options: &Options,
    ) -> Result<TableDefinition> {
        let snapshot = self.schema("table_types", schema)?;
        let found = snapshot.tables.iter().find(|t| t.name == table).ok_or_else(|| {
            GenError::schema_fetch(
                "table_types",
                format!("table '{}.{}' not found", schema, table),
            )
        })?;

        // Enum references follow the enum declaration's name; recognized
        // primitive tags win over a same-named enum.
        Ok(found
            .columns
            .iter()
            .map(|(name, column)| {
                let type_tag = column.type_tag.as_ref().map(|tag| {
                    if TypeTag::parse(tag).is_enum_reference() && snapshot.enums.contains(tag) {
                        normalize(tag, options, NameKind::Type)
                    } else {
                        tag.clone()
                    }
                });
                (
                    name,
                    ColumnDefinition {
                        type_tag,
                        nullable: column.nullable,
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionValues;

    #[tokio::test]
    async fn test_static_provider_lookups() {
        let provider = StaticSchemaProvider::new("public")
            .with_table(
                "public",
                "users",
                vec![("id", ColumnDefinition::new("number"))].into_iter().collect(),
            )
            .with_table("public", "accounts", TableDefinition::new())
            .with_enum("public", "mood", vec!["sad".to_string()]);

        assert_eq!(provider.default_schema().await.unwrap(), "public");
        assert_eq!(
            provider.schema_tables("public").await.unwrap(),
            vec!["users".to_string(), "accounts".to_string()]
        );
        assert_eq!(provider.enum_types("public").await.unwrap().len(), 1);
        let users = provider
            .table_types("users", "public", &Options::default())
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_enum_tags_follow_enum_naming() {
        let provider = StaticSchemaProvider::new("public")
            .with_enum("public", "order_status", vec!["new".to_string()])
            .with_table(
                "public",
                "orders",
                vec![
                    ("status", ColumnDefinition::nullable("order_status")),
                    ("other", ColumnDefinition::new("unlisted_type")),
                ]
                .into_iter()
                .collect(),
            );
        let options = Options::from_values(&OptionValues { camel_case: true });
        let orders = provider.table_types("orders", "public", &options).await.unwrap();

        assert_eq!(orders.get("status"), Some(&ColumnDefinition::nullable("OrderStatus")));
        assert_eq!(orders.get("other"), Some(&ColumnDefinition::new("unlisted_type")));
    }

    #[tokio::test]
    async fn test_primitive_tag_not_renamed_by_same_named_enum() {
        let provider = StaticSchemaProvider::new("public")
            .with_enum("public", "number", vec!["one".to_string()])
            .with_table(
                "public",
                "counts",
                vec![("total", ColumnDefinition::new("number"))].into_iter().collect(),
            );
        let counts = provider
            .table_types("counts", "public", &Options::default())
            .await
            .unwrap();

        assert_eq!(counts.get("total"), Some(&ColumnDefinition::new("number")));
    }

    #[tokio::test]
    async fn test_static_provider_missing_lookups() {
        let provider = StaticSchemaProvider::new("public");
        assert!(matches!(
            provider.schema_tables("nope").await,
            Err(GenError::SchemaFetch { operation: "schema_tables", .. })
        ));
        assert!(provider.enum_types("nope").await.unwrap().is_empty());
        assert!(provider
            .table_types("users", "nope", &Options::default())
            .await
            .is_err());
    }

    #[test]
    fn test_snapshot_json() {
        let provider = StaticSchemaProvider::from_json_str(
            r#"{
                "defaultSchema": "app",
                "schemas": {
                    "app": {
                        "tables": [
                            {"name": "b_table", "columns": {"id": {"typeTag": "number"}}},
                            {"name": "a_table", "columns": {}}
                        ],
                        "enums": {"mood": ["sad", "happy"]}
                    }
                }
            }"#,
        )
        .unwrap();

        let snapshot = provider.snapshot();
        assert_eq!(snapshot.default_schema, "app");
        let app = &snapshot.schemas["app"];
        assert_eq!(app.tables[0].name, "b_table");
        assert_eq!(app.tables[1].name, "a_table");
        assert!(app.enums.contains("mood"));
    }

    #[test]
    fn test_snapshot_parse_error_is_schema_fetch() {
        let err = StaticSchemaProvider::from_json_str("not json").unwrap_err();
        assert!(matches!(err, GenError::SchemaFetch { operation: "load_snapshot", .. }));
    }
}
