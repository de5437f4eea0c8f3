//! airkit CLI - localized site data from Airtable.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod watcher;

#[derive(Parser)]
#[command(name = "airkit")]
#[command(about = "Build localized, multi-tenant site data from Airtable")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to airkit.toml config file
    #[arg(short, long, default_value = "airkit.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create airkit.toml and a sample dataset
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Download tables from Airtable into the data directory
    Fetch {
        /// Tables to fetch (defaults to config)
        #[arg(short, long, value_delimiter = ',')]
        tables: Vec<String>,
    },

    /// Build page props for every locale
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Locales to build (defaults to config)
        #[arg(short, long)]
        locale: Vec<String>,
    },

    /// Build, then rebuild whenever the data or config changes
    Dev,

    /// Print a record sanitized for a locale, with its links expanded
    Inspect {
        /// Table name
        table: String,

        /// Record id
        id: String,

        /// Locale to resolve (defaults to the default locale)
        #[arg(short, long)]
        locale: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Fetch { tables } => {
            commands::fetch::run(&cli.config, tables).await?;
        }
        Commands::Build { output, locale } => {
            commands::build::run(&cli.config, output, locale).await?;
        }
        Commands::Dev => {
            commands::dev::run(&cli.config).await?;
        }
        Commands::Inspect { table, id, locale } => {
            commands::inspect::run(&cli.config, &table, &id, locale.as_deref())?;
        }
    }

    Ok(())
}
