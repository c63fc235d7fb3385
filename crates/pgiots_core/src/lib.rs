//! Schema metadata to io-ts module generator.
//!
//! Converts relational-schema metadata (tables, columns, enum types) into a
//! TypeScript module of io-ts runtime validators: one `t.keyof` validator per
//! enum, and per table a `t.type` record validator plus a derived static type.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pgiots_core::{generate, GenerateRequest, Options, PassthroughFormatter, StaticSchemaProvider};
//!
//! let provider = StaticSchemaProvider::from_json_file("schema.json")?;
//! let request = GenerateRequest::new(Options::default()).with_tables(["users"]);
//! let module = generate(&provider, &PassthroughFormatter, &request).await?;
//! ```
//!
//! # Layout
//!
//! - [`naming`] - reserved-word escaping on top of the caller's name transforms
//! - [`type_map`] - column type tag to validator expression
//! - [`enums`] / [`table`] - declaration emitters
//! - [`compose`] - run orchestration over a [`SchemaProvider`] and a [`Formatter`]

pub mod compose;
pub mod enums;
mod error;
pub mod format;
pub mod naming;
pub mod options;
pub mod provider;
pub mod table;
pub mod type_map;
pub mod types;

pub use compose::{compose, generate, GenerateRequest, MODULE_PROLOGUE, OUTPUT_FILENAME};
pub use error::{BoxError, GenError, Result};
pub use format::{CommandFormatter, FormatStyle, Formatter, PassthroughFormatter};
pub use naming::normalize;
pub use options::{NameKind, OptionValues, Options};
pub use provider::{NamedTable, SchemaProvider, SchemaSnapshot, Snapshot, StaticSchemaProvider};
pub use type_map::{map_type, TypeTag};
pub use types::{ColumnDefinition, EnumDefinitions, TableDefinition};
