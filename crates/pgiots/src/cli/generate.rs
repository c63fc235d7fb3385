//! The `generate` command: build a provider and formatter from config, run
//! the generator, write the module.

use std::path::Path;

use anyhow::{Context, Result};
use pgiots_core::{
    generate, Formatter, GenerateRequest, Options, PassthroughFormatter, SchemaProvider,
    StaticSchemaProvider,
};
use pgiots_db::{DbConfig, PostgresSchemaProvider};
use tracing::info;

use super::config::{load_file_config, FormatterChoice, ResolvedConfig, SourceArgs, SourceConfig};

/// Arguments for the generate command
#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

enum Provider {
    Postgres(PostgresSchemaProvider),
    Snapshot(StaticSchemaProvider),
}

impl Provider {
    async fn open(source: &SourceConfig) -> Result<Self> {
        match source {
            SourceConfig::Postgres { url } => {
                let config = DbConfig::from_url(url.as_str())?;
                let provider = PostgresSchemaProvider::connect(&config)
                    .await
                    .context("Failed to connect to PostgreSQL")?;
                Ok(Provider::Postgres(provider))
            }
            SourceConfig::Snapshot { path } => {
                let provider = StaticSchemaProvider::from_json_file(path)
                    .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
                Ok(Provider::Snapshot(provider))
            }
        }
    }

    fn as_dyn(&self) -> &dyn SchemaProvider {
        match self {
            Provider::Postgres(provider) => provider,
            Provider::Snapshot(provider) => provider,
        }
    }

    async fn close(self) {
        if let Provider::Postgres(provider) = self {
            provider.close().await;
        }
    }
}

fn formatter_for(choice: &FormatterChoice) -> Box<dyn Formatter> {
    match choice {
        FormatterChoice::Passthrough => Box::new(PassthroughFormatter),
        FormatterChoice::Command(cmd) => Box::new(cmd.clone()),
    }
}

/// Run the configured generation and return the module text.
pub async fn generate_module(config: &ResolvedConfig) -> Result<String> {
    let provider = Provider::open(&config.source).await?;
    let formatter = formatter_for(&config.formatter);

    let mut request = GenerateRequest::new(Options::from_values(&config.option_values))
        .with_tables(config.tables.iter().cloned());
    if let Some(schema) = &config.schema {
        request = request.with_schema(schema.clone());
    }

    let result = generate(provider.as_dyn(), formatter.as_ref(), &request).await;
    provider.close().await;
    result.context("Generation failed")
}

/// Write the module to `output`, or to stdout when `None`.
pub async fn write_output(output: Option<&Path>, module: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            tokio::fs::write(path, module)
                .await
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(path = %path.display(), bytes = module.len(), "Wrote io-ts module");
        }
        None => print!("{}", module),
    }
    Ok(())
}

/// Run the generate command
pub async fn run(args: GenerateArgs) -> Result<()> {
    let file = load_file_config(args.source.config.as_deref())?;
    let config = ResolvedConfig::resolve(&args.source, file)?;
    let module = generate_module(&config).await?;
    write_output(config.output.as_deref(), &module).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgiots_core::OptionValues;
    use std::path::PathBuf;

    const SNAPSHOT: &str = r#"{
        "defaultSchema": "public",
        "schemas": {
            "public": {
                "tables": [
                    {"name": "user_accounts", "columns": {
                        "id": {"typeTag": "number"},
                        "display_name": {"typeTag": "string", "nullable": true}
                    }}
                ],
                "enums": {"role": ["admin", "member"]}
            }
        }
    }"#;

    fn snapshot_config(dir: &Path, camel_case: bool) -> ResolvedConfig {
        let path = dir.join("schema.json");
        std::fs::write(&path, SNAPSHOT).unwrap();
        ResolvedConfig {
            source: SourceConfig::Snapshot { path },
            schema: None,
            tables: Vec::new(),
            option_values: OptionValues { camel_case },
            output: None,
            formatter: FormatterChoice::Passthrough,
        }
    }

    #[tokio::test]
    async fn test_generate_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let module = generate_module(&snapshot_config(dir.path(), true))
            .await
            .unwrap();
        assert!(module.contains("export const Role = t.keyof({"));
        assert!(module.contains("  displayName: t.array([t.string, t.null]),"));
        assert!(module.contains("export type UserAccounts = t.TypeOf<typeof runtime_UserAccounts>;"));
    }

    #[tokio::test]
    async fn test_missing_snapshot_fails() {
        let config = ResolvedConfig {
            source: SourceConfig::Snapshot {
                path: PathBuf::from("/nonexistent/pgiots/schema.json"),
            },
            ..snapshot_config(tempfile::tempdir().unwrap().path(), false)
        };
        assert!(generate_module(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_write_output_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen").join("schema.ts");
        write_output(Some(&path), "export {};\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "export {};\n");
    }
}
