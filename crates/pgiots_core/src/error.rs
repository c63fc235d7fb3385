//! Error types for module generation.

use thiserror::Error;

/// Generation result type.
pub type Result<T> = std::result::Result<T, GenError>;

/// Boxed error carried by provider failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a generation run.
///
/// Every variant is fatal: the composer never returns a partial module.
/// Reserved-word collisions are not represented here because the name
/// transformer resolves them by escaping.
#[derive(Error, Debug)]
pub enum GenError {
    /// A schema provider lookup failed.
    #[error("Schema lookup '{operation}' failed: {source}")]
    SchemaFetch {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// A column arrived without a type tag.
    #[error("Column '{column}' of table '{table}' has no type tag; cannot build an io-ts validator")]
    UnsupportedType { table: String, column: String },

    /// The external formatter failed.
    #[error("Formatting '{filename}' failed: {message}")]
    Format { filename: String, message: String },

    /// IO error while talking to a formatter process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Wrap a provider failure for the given lookup.
    pub fn schema_fetch(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::SchemaFetch {
            operation,
            source: source.into(),
        }
    }

    /// Create an unsupported type error for a column.
    pub fn unsupported_type(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnsupportedType {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a formatter error.
    pub fn format(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            filename: filename.into(),
            message: message.into(),
        }
    }
}
