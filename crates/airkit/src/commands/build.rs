//! Static props build command.

use std::path::{Path, PathBuf};

use airkit_static::StaticBuilder;
use anyhow::Result;

use crate::config::load_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, locales: Vec<String>) -> Result<()> {
    tracing::info!("Building page props...");

    let file_config = load_config(config_path)?;

    let mut config = file_config.build_config();
    if let Some(output) = output {
        config.output_dir = output;
    }
    if !locales.is_empty() {
        config.locales = locales;
    }

    let result = StaticBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} pages from {} records in {}ms",
        result.pages,
        result.records,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
