//! PostgreSQL introspection for the pgiots generator.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pgiots_db::{DbConfig, PostgresSchemaProvider};
//!
//! let config = DbConfig::from_url("postgres://localhost/app")?;
//! let provider = PostgresSchemaProvider::connect(&config).await?;
//! let module = pgiots_core::generate(&provider, &formatter, &request).await?;
//! ```

mod error;
mod pool;
mod provider;
pub mod udt;

pub use error::{DbError, Result};
pub use pool::{create_pool, redact_url, DbConfig};
pub use provider::{PostgresSchemaProvider, DEFAULT_SCHEMA};
