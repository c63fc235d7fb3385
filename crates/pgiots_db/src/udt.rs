//! PostgreSQL `udt_name` to column type tag mapping.

use pgiots_core::{normalize, NameKind, Options};
use tracing::warn;

/// Map a PostgreSQL type name to a recognized type tag.
///
/// Array types carry the `_` prefix PostgreSQL gives them in `udt_name`.
/// Returns `None` for types outside the built-in table.
pub fn builtin_type_tag(udt_name: &str) -> Option<&'static str> {
    let tag = match udt_name {
        "bpchar" | "char" | "varchar" | "text" | "citext" | "uuid" | "bytea" | "inet" | "time"
        | "timetz" | "interval" | "name" => "string",
        "int2" | "int4" | "int8" | "float4" | "float8" | "numeric" | "money" | "oid" => "number",
        "bool" => "boolean",
        "json" | "jsonb" => "Object",
        "date" | "timestamp" | "timestamptz" => "Date",
        "_int2" | "_int4" | "_int8" | "_float4" | "_float8" | "_numeric" | "_money" => {
            "Array<number>"
        }
        "_bool" => "Array<boolean>",
        "_varchar" | "_text" | "_citext" | "_uuid" | "_bytea" => "Array<string>",
        "_json" | "_jsonb" => "Array<Object>",
        "_timestamptz" => "Array<Date>",
        _ => return None,
    };
    Some(tag)
}

/// Resolve the type tag for a column.
///
/// Enum types of the schema become references to the enum validator, named
/// exactly as the enum emitter names it. Unknown types degrade to `any`.
pub fn column_type_tag(
    udt_name: &str,
    enum_names: &[String],
    options: &Options,
    table: &str,
    column: &str,
) -> String {
    if let Some(tag) = builtin_type_tag(udt_name) {
        return tag.to_string();
    }
    if enum_names.iter().any(|name| name == udt_name) {
        return normalize(udt_name, options, NameKind::Type);
    }
    warn!(
        table,
        column, udt_name, "Unsupported PostgreSQL type; mapping to 'any'"
    );
    "any".to_string()
}
