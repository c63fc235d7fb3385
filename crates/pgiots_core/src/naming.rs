//! Identifier normalization for generated declarations.
//!
//! Every raw table, column and enum name passes through [`normalize`] exactly
//! once per run. Applying it twice can double-escape, so later stages must
//! use the normalized name as-is.

use crate::options::{NameKind, Options};

/// Names that would shadow io-ts primitives or are reserved in the output language.
pub const RESERVED_WORDS: &[&str] = &["string", "number", "package"];

/// Suffix appended to an identifier that collides with a reserved word.
pub const ESCAPE_SUFFIX: char = '_';

/// Returns true if `name` collides with a reserved word.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Escape a single identifier if it is reserved.
pub fn escape_reserved(name: String) -> String {
    if is_reserved(&name) {
        let mut escaped = name;
        escaped.push(ESCAPE_SUFFIX);
        escaped
    } else {
        name
    }
}

/// Apply the caller's transform for `kind`, then escape reserved words.
pub fn normalize(raw: &str, options: &Options, kind: NameKind) -> String {
    escape_reserved(options.transform(raw, kind))
}
