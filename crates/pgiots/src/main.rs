//! pgiots: generate io-ts runtime validators from a PostgreSQL schema.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pgiots_logging::{init_logging, LogConfig};

mod cli;

#[derive(Parser, Debug)]
#[command(name = "pgiots", version, about = "Generate io-ts validators from database schemas")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the io-ts module
    Generate(cli::generate::GenerateArgs),

    /// Show the resolved configuration as JSON
    Config(cli::config::ConfigArgs),
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => cli::generate::run(args).await,
        Commands::Config(args) => cli::config::run(args),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LogConfig {
        app_name: "pgiots",
        verbose: cli.verbose,
        log_file: cli.log_file.clone(),
    }) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
