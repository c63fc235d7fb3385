//! Module composition: one generation run from provider lookups to formatted text.

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::enums::emit_enums;
use crate::error::Result;
use crate::format::{FormatStyle, Formatter};
use crate::options::Options;
use crate::provider::SchemaProvider;
use crate::table::emit_table;

/// Import header that opens every generated module.
pub const MODULE_PROLOGUE: &str =
    "import * as t from 'io-ts';\nimport * as extra from 'io-ts-types';\n\n";

/// Filename hint handed to the formatter.
pub const OUTPUT_FILENAME: &str = "schema.ts";

/// Inputs of one generation run.
///
/// An empty `tables` list means every table of the resolved schema; a `None`
/// schema means the provider's default schema.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub tables: Vec<String>,
    pub schema: Option<String>,
    pub options: Options,
}

impl GenerateRequest {
    pub fn new(options: Options) -> Self {
        Self {
            tables: Vec::new(),
            schema: None,
            options,
        }
    }

    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Fetch one table's columns and emit its declarations.
async fn table_block(
    provider: &dyn SchemaProvider,
    table: &str,
    schema: &str,
    options: &Options,
) -> Result<String> {
    let definition = provider.table_types(table, schema, options).await?;
    debug!(table, schema, columns = definition.len(), "Fetched table definition");
    emit_table(table, &definition, options)
}

/// Compose the unformatted module text.
///
/// Per-table fetches run concurrently; blocks are joined by request position,
/// so output order equals the resolved table order. The first failure aborts
/// the run.
pub async fn compose(provider: &dyn SchemaProvider, request: &GenerateRequest) -> Result<String> {
    let schema = match &request.schema {
        Some(schema) => schema.clone(),
        None => provider.default_schema().await?,
    };

    let tables = if request.tables.is_empty() {
        provider.schema_tables(&schema).await?
    } else {
        request.tables.clone()
    };
    info!(schema = %schema, tables = tables.len(), "Resolved generation targets");

    let options = &request.options;
    let enums = provider.enum_types(&schema).await?;
    let enum_block = emit_enums(&enums, options);
    debug!(enums = enums.len(), "Emitted enum block");

    let table_blocks = try_join_all(
        tables
            .iter()
            .map(|table| table_block(provider, table, &schema, options)),
    )
    .await?;

    let mut module = String::with_capacity(
        MODULE_PROLOGUE.len()
            + enum_block.len()
            + table_blocks.iter().map(String::len).sum::<usize>(),
    );
    module.push_str(MODULE_PROLOGUE);
    module.push_str(&enum_block);
    for block in &table_blocks {
        module.push_str(block);
    }
    Ok(module)
}

/// Generate the complete, formatted io-ts module.
pub async fn generate(
    provider: &dyn SchemaProvider,
    formatter: &dyn Formatter,
    request: &GenerateRequest,
) -> Result<String> {
    let module = compose(provider, request).await?;
    let formatted = formatter
        .format(OUTPUT_FILENAME, &module, &FormatStyle::fixed())
        .await?;
    info!(bytes = formatted.len(), "Generated io-ts module");
    Ok(formatted)
}
