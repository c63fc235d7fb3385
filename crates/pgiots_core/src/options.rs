//! Name-transform options threaded through a generation run.
//!
//! An [`Options`] value is built once per run and passed by reference to every
//! emitter. It carries no state besides the two transform functions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A raw-name to output-name transform.
pub type NameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Which kind of identifier is being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Table,
    Column,
    Type,
}

/// User-facing option values, as read from config files or CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValues {
    /// Convert column names to lowerCamelCase and type names to UpperCamelCase.
    #[serde(default)]
    pub camel_case: bool,
}

/// Immutable name-transform configuration for one generation run.
#[derive(Clone)]
pub struct Options {
    transform_type_name: NameFn,
    transform_column_name: NameFn,
}

impl Options {
    /// Build options from user-facing values.
    pub fn from_values(values: &OptionValues) -> Self {
        if values.camel_case {
            Self::custom(|name| upper_first(&camel_case(name)), camel_case)
        } else {
            Self::default()
        }
    }

    /// Build options from arbitrary transform functions.
    pub fn custom<T, C>(type_fn: T, column_fn: C) -> Self
    where
        T: Fn(&str) -> String + Send + Sync + 'static,
        C: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            transform_type_name: Arc::new(type_fn),
            transform_column_name: Arc::new(column_fn),
        }
    }

    /// Apply the type-name transform (tables and enum types).
    pub fn transform_type_name(&self, raw: &str) -> String {
        (self.transform_type_name)(raw)
    }

    /// Apply the column-name transform.
    pub fn transform_column_name(&self, raw: &str) -> String {
        (self.transform_column_name)(raw)
    }

    /// Apply the transform selected by `kind`.
    pub fn transform(&self, raw: &str, kind: NameKind) -> String {
        match kind {
            NameKind::Table | NameKind::Type => self.transform_type_name(raw),
            NameKind::Column => self.transform_column_name(raw),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::custom(|name| name.to_string(), |name| name.to_string())
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options").finish_non_exhaustive()
    }
}

/// Convert `snake_case`, `kebab-case` or `space separated` words to lowerCamelCase.
///
/// Word boundaries are non-alphanumeric characters, lower-to-upper case
/// changes, the last capital of an acronym run followed by lowercase, and
/// digit/letter transitions: `user_ID` becomes `userId`, `HTTPServer`
/// becomes `httpServer` and `address2line` becomes `address2Line`.
pub fn camel_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (idx, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next_lower = chars.get(idx + 1).is_some_and(|next| next.is_lowercase());
            let boundary = prev.is_numeric() != ch.is_numeric()
                || (prev.is_lowercase() && ch.is_uppercase())
                || (prev.is_uppercase() && ch.is_uppercase() && next_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::with_capacity(name.len());
    for (idx, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if idx == 0 {
            out.push_str(&lower);
        } else {
            out.push_str(&upper_first(&lower));
        }
    }
    out
}

/// Uppercase the first character, leaving the rest untouched.
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_identity() {
        let options = Options::default();
        assert_eq!(options.transform_type_name("user_accounts"), "user_accounts");
        assert_eq!(options.transform_column_name("created_at"), "created_at");
    }

    #[test]
    fn test_camel_case_options() {
        let options = Options::from_values(&OptionValues { camel_case: true });
        assert_eq!(options.transform_type_name("user_accounts"), "UserAccounts");
        assert_eq!(options.transform_column_name("created_at"), "createdAt");
        assert_eq!(options.transform("created_at", NameKind::Table), "CreatedAt");
    }

    #[test]
    fn test_camel_case_word_boundaries() {
        assert_eq!(camel_case("user_ID"), "userId");
        assert_eq!(camel_case("first-name"), "firstName");
        assert_eq!(camel_case("already_camelCase"), "alreadyCamelCase");
        assert_eq!(camel_case("__leading"), "leading");
        assert_eq!(camel_case("HTTPServer"), "httpServer");
        assert_eq!(camel_case("parse_XMLHttpRequest"), "parseXmlHttpRequest");
        assert_eq!(camel_case("address2line"), "address2Line");
        assert_eq!(camel_case("created_at2"), "createdAt2");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_option_values_deserialize() {
        let values: OptionValues = serde_json::from_str(r#"{"camelCase": true}"#).unwrap();
        assert!(values.camel_case);
        let values: OptionValues = serde_json::from_str("{}").unwrap();
        assert!(!values.camel_case);
    }
}
