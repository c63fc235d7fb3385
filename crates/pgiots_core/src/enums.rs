//! Enum membership-validator declarations.
//!
//! Each enum becomes a `t.keyof` over an object whose keys are the member
//! labels, all mapped to `null`.

use tracing::debug;

use crate::naming::normalize;
use crate::options::{NameKind, Options};
use crate::types::EnumDefinitions;

/// Quote a string as a single-quoted literal.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Emit one enum declaration.
///
/// Duplicate members collapse to a single key at their first position.
pub fn emit_enum(raw_name: &str, members: &[String], options: &Options) -> String {
    let name = normalize(raw_name, options, NameKind::Type);

    let mut seen: Vec<&str> = Vec::with_capacity(members.len());
    for member in members {
        if !seen.contains(&member.as_str()) {
            seen.push(member);
        }
    }

    let keys: Vec<String> = seen
        .iter()
        .map(|member| format!("  {}: null", quote_literal(member)))
        .collect();

    debug!(enum_name = %name, members = keys.len(), "Emitted enum validator");

    if keys.is_empty() {
        return format!("export const {} = t.keyof({{}});\n\n", name);
    }
    format!(
        "export const {} = t.keyof({{\n{}\n}});\n\n",
        name,
        keys.join(",\n")
    )
}

/// Emit every enum in collection order.
pub fn emit_enums(enums: &EnumDefinitions, options: &Options) -> String {
    enums
        .iter()
        .map(|(name, members)| emit_enum(name, members, options))
        .collect()
}
