//! Record-validator declarations for tables.

use tracing::debug;

use crate::error::Result;
use crate::naming::normalize;
use crate::options::{NameKind, Options};
use crate::type_map::map_type;
use crate::types::TableDefinition;

/// Prefix of the runtime validator constant emitted for a table.
pub const RUNTIME_PREFIX: &str = "runtime_";

/// Emit the `t.type` validator and its derived static type for one table.
///
/// Columns appear in the table definition's order. Fails if any column has
/// no type tag.
pub fn emit_table(raw_name: &str, table: &TableDefinition, options: &Options) -> Result<String> {
    let name = normalize(raw_name, options, NameKind::Table);

    let mut entries = Vec::with_capacity(table.len());
    for (raw_column, definition) in table.iter() {
        let column = normalize(raw_column, options, NameKind::Column);
        let expression = map_type(raw_name, raw_column, definition)?;
        entries.push(format!("  {}: {},", column, expression));
    }

    debug!(table = %name, columns = entries.len(), "Emitted table validator");

    let body = if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{\n{}\n}}", entries.join("\n"))
    };

    Ok(format!(
        "export const {prefix}{name} = t.type({body});\nexport type {name} = t.TypeOf<typeof {prefix}{name}>;\n\n",
        prefix = RUNTIME_PREFIX,
        name = name,
        body = body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnDefinition;
    use crate::{GenError, OptionValues};

    #[test]
    fn test_emit_table_shape() {
        let table: TableDefinition = vec![
            ("id", ColumnDefinition::new("number")),
            ("email", ColumnDefinition::nullable("string")),
        ]
        .into_iter()
        .collect();

        let out = emit_table("users", &table, &Options::default()).unwrap();
        assert_eq!(
            out,
            "export const runtime_users = t.type({\n  id: t.number,\n  email: t.array([t.string, t.null]),\n});\n\
             export type users = t.TypeOf<typeof runtime_users>;\n\n"
        );
    }

    #[test]
    fn test_column_order_follows_input() {
        let forward: TableDefinition = vec![
            ("a", ColumnDefinition::new("string")),
            ("b", ColumnDefinition::new("number")),
        ]
        .into_iter()
        .collect();
        let reversed: TableDefinition = vec![
            ("b", ColumnDefinition::new("number")),
            ("a", ColumnDefinition::new("string")),
        ]
        .into_iter()
        .collect();

        let out = emit_table("t", &forward, &Options::default()).unwrap();
        assert!(out.find("  a:").unwrap() < out.find("  b:").unwrap());
        let out = emit_table("t", &reversed, &Options::default()).unwrap();
        assert!(out.find("  b:").unwrap() < out.find("  a:").unwrap());
    }

    #[test]
    fn test_reserved_column_escaped() {
        let table: TableDefinition = vec![("string", ColumnDefinition::new("string"))]
            .into_iter()
            .collect();
        let out = emit_table("T", &table, &Options::default()).unwrap();
        assert!(out.contains("  string_: t.string,"));
        assert!(!out.contains("string__"));
    }

    #[test]
    fn test_camel_case_names() {
        let table: TableDefinition = vec![("created_at", ColumnDefinition::new("Date"))]
            .into_iter()
            .collect();
        let options = Options::from_values(&OptionValues { camel_case: true });
        let out = emit_table("user_accounts", &table, &options).unwrap();
        assert!(out.starts_with("export const runtime_UserAccounts = t.type({"));
        assert!(out.contains("  createdAt: t.union([t.array(t.string), t.array(extra.date)]),"));
        assert!(out.contains("export type UserAccounts = t.TypeOf<typeof runtime_UserAccounts>;"));
    }

    #[test]
    fn test_empty_table() {
        let out = emit_table("empty", &TableDefinition::new(), &Options::default()).unwrap();
        assert!(out.starts_with("export const runtime_empty = t.type({});\n"));
    }

    #[test]
    fn test_missing_tag_fails_table() {
        let table: TableDefinition = vec![
            ("id", ColumnDefinition::new("number")),
            ("ghost", ColumnDefinition::untyped()),
        ]
        .into_iter()
        .collect();
        let err = emit_table("things", &table, &Options::default()).unwrap_err();
        assert!(matches!(err, GenError::UnsupportedType { ref column, .. } if column == "ghost"));
    }
}
