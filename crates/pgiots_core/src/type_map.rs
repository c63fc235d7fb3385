//! Column type tag to io-ts validator expression mapping.
//!
//! The recognized tags form a closed set; any other present tag is taken to
//! name an enum validator emitted earlier in the same module. Only a missing
//! tag is an error.

use std::fmt;

use crate::error::{GenError, Result};
use crate::types::ColumnDefinition;

/// Null marker used by the nullable wrapping.
pub const NULL_VALIDATOR: &str = "t.null";

const UNKNOWN: &str = "t.unknown";
const STRING: &str = "t.string";
const NUMBER: &str = "t.number";
const BOOLEAN: &str = "t.boolean";
const STRINGS_OR_DATES: &str = "t.union([t.array(t.string), t.array(extra.date)])";
const NUMBER_ARRAY: &str = "t.array(t.number)";
const BOOLEAN_ARRAY: &str = "t.array(t.boolean)";
const STRING_ARRAY: &str = "t.array(t.string)";
const OBJECT_ARRAY: &str = "t.array(t.UnknownRecord)";
const STRINGS_OR_ISO_DATES: &str =
    "t.union([t.array(t.string), t.array(extra.DateFromISOString)])";

/// A resolved column type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Any,
    String,
    Number,
    Boolean,
    Object,
    Date,
    ArrayNumber,
    ArrayBoolean,
    ArrayString,
    ArrayObject,
    ArrayDate,
    Buffer,
    /// Name of a previously emitted enum validator.
    EnumReference(String),
}

impl TypeTag {
    /// Parse a tag string. Total: unrecognized tags become enum references.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "any" => TypeTag::Any,
            "string" => TypeTag::String,
            "number" => TypeTag::Number,
            "boolean" => TypeTag::Boolean,
            "Object" => TypeTag::Object,
            "Date" => TypeTag::Date,
            "Array<number>" => TypeTag::ArrayNumber,
            "Array<boolean>" => TypeTag::ArrayBoolean,
            "Array<string>" => TypeTag::ArrayString,
            "Array<Object>" => TypeTag::ArrayObject,
            "Array<Date>" => TypeTag::ArrayDate,
            "Buffer" => TypeTag::Buffer,
            other => TypeTag::EnumReference(other.to_string()),
        }
    }

    /// The tag string this variant parses from.
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Any => "any",
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Object => "Object",
            TypeTag::Date => "Date",
            TypeTag::ArrayNumber => "Array<number>",
            TypeTag::ArrayBoolean => "Array<boolean>",
            TypeTag::ArrayString => "Array<string>",
            TypeTag::ArrayObject => "Array<Object>",
            TypeTag::ArrayDate => "Array<Date>",
            TypeTag::Buffer => "Buffer",
            TypeTag::EnumReference(name) => name.as_str(),
        }
    }

    /// Base validator expression, before nullable wrapping.
    ///
    /// `Object` and `Date` share the strings-or-dates union; `Array<Date>`
    /// decodes ISO strings rather than date values.
    pub fn validator(&self) -> &str {
        match self {
            TypeTag::Any | TypeTag::Buffer => UNKNOWN,
            TypeTag::String => STRING,
            TypeTag::Number => NUMBER,
            TypeTag::Boolean => BOOLEAN,
            TypeTag::Object | TypeTag::Date => STRINGS_OR_DATES,
            TypeTag::ArrayNumber => NUMBER_ARRAY,
            TypeTag::ArrayBoolean => BOOLEAN_ARRAY,
            TypeTag::ArrayString => STRING_ARRAY,
            TypeTag::ArrayObject => OBJECT_ARRAY,
            TypeTag::ArrayDate => STRINGS_OR_ISO_DATES,
            TypeTag::EnumReference(name) => name.as_str(),
        }
    }

    /// Returns true for tags outside the recognized set.
    pub fn is_enum_reference(&self) -> bool {
        matches!(self, TypeTag::EnumReference(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrap a base expression so it also accepts null.
///
/// The output form is fixed: a two-element tuple handed to `t.array`, not a
/// `t.union`.
pub fn wrap_nullable(base: &str) -> String {
    format!("t.array([{}, {}])", base, NULL_VALIDATOR)
}

/// Map a column to its validator expression.
///
/// Fails with [`GenError::UnsupportedType`] when the column has no type tag;
/// `table` and `column` only label that error.
pub fn map_type(table: &str, column: &str, definition: &ColumnDefinition) -> Result<String> {
    let tag = definition
        .type_tag
        .as_deref()
        .map(TypeTag::parse)
        .ok_or_else(|| GenError::unsupported_type(table, column))?;

    let base = tag.validator();
    Ok(if definition.nullable {
        wrap_nullable(base)
    } else {
        base.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(tag: &str, nullable: bool) -> String {
        let column = ColumnDefinition {
            type_tag: Some(tag.to_string()),
            nullable,
        };
        map_type("t", "c", &column).unwrap()
    }

    #[test]
    fn test_primitive_tags() {
        assert_eq!(expr("any", false), "t.unknown");
        assert_eq!(expr("string", false), "t.string");
        assert_eq!(expr("number", false), "t.number");
        assert_eq!(expr("boolean", false), "t.boolean");
        assert_eq!(expr("Buffer", false), "t.unknown");
    }

    #[test]
    fn test_object_and_date_share_loose_union() {
        let expected = "t.union([t.array(t.string), t.array(extra.date)])";
        assert_eq!(expr("Object", false), expected);
        assert_eq!(expr("Date", false), expected);
    }

    #[test]
    fn test_array_tags() {
        assert_eq!(expr("Array<number>", false), "t.array(t.number)");
        assert_eq!(expr("Array<boolean>", false), "t.array(t.boolean)");
        assert_eq!(expr("Array<string>", false), "t.array(t.string)");
        assert_eq!(expr("Array<Object>", false), "t.array(t.UnknownRecord)");
        assert_eq!(
            expr("Array<Date>", false),
            "t.union([t.array(t.string), t.array(extra.DateFromISOString)])"
        );
    }

    #[test]
    fn test_unknown_tag_passes_through_as_enum_reference() {
        assert_eq!(expr("Mood", false), "Mood");
        assert!(TypeTag::parse("Mood").is_enum_reference());
        // Tags are case-sensitive.
        assert_eq!(TypeTag::parse("object"), TypeTag::EnumReference("object".to_string()));
    }

    #[test]
    fn test_nullable_wraps_exact_base_expression() {
        for tag in [
            "any",
            "string",
            "number",
            "boolean",
            "Object",
            "Date",
            "Array<number>",
            "Array<boolean>",
            "Array<string>",
            "Array<Object>",
            "Array<Date>",
            "Buffer",
            "Mood",
        ] {
            let base = expr(tag, false);
            assert_eq!(expr(tag, true), format!("t.array([{}, t.null])", base));
        }
    }

    #[test]
    fn test_nullable_string() {
        assert_eq!(expr("string", true), "t.array([t.string, t.null])");
    }

    #[test]
    fn test_mapping_is_deterministic() {
        assert_eq!(expr("Array<Date>", true), expr("Array<Date>", true));
    }

    #[test]
    fn test_missing_tag_is_unsupported() {
        let err = map_type("users", "email", &ColumnDefinition::untyped()).unwrap_err();
        match err {
            GenError::UnsupportedType { table, column } => {
                assert_eq!(table, "users");
                assert_eq!(column, "email");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_round_trips_recognized_tags() {
        for tag in ["any", "Object", "Array<Date>", "Buffer"] {
            assert_eq!(TypeTag::parse(tag).as_str(), tag);
        }
    }
}
