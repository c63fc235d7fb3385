//! Error types for the PostgreSQL provider.

use thiserror::Error;

/// Provider result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error (connection, query, decoding)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Connection URL is not a PostgreSQL URL
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    /// Requested table does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl DbError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
