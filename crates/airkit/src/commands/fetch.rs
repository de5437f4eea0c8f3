//! Airtable download command.

use std::env;
use std::path::{Path, PathBuf};

use airkit_airtable::{AirtableClient, AirtableConfig};
use anyhow::{Context, Result};

use crate::config::load_config;

/// Environment variable holding the Airtable token.
const API_KEY_VAR: &str = "AIRTABLE_API_KEY";

/// Environment variable holding the base id when the config has none.
const BASE_ID_VAR: &str = "AIRTABLE_BASE_ID";

/// Run the fetch command.
pub async fn run(config_path: &Path, tables: Vec<String>) -> Result<()> {
    let file_config = load_config(config_path)?;

    let api_key = env::var(API_KEY_VAR).with_context(|| format!("{} is not set", API_KEY_VAR))?;
    let base_id = match file_config.airtable.base_id.clone() {
        Some(id) => id,
        None => env::var(BASE_ID_VAR).with_context(|| {
            format!("No airtable.base_id in config and {} is not set", BASE_ID_VAR)
        })?,
    };

    let tables = if tables.is_empty() {
        file_config.data.tables.clone()
    } else {
        tables
    };

    if tables.is_empty() {
        anyhow::bail!("No tables to fetch. List them under [data] tables or pass --tables.");
    }

    tracing::info!("Fetching {} tables from base {}", tables.len(), base_id);

    let client = AirtableClient::new(AirtableConfig {
        endpoint: file_config.airtable.endpoint.clone(),
        ..AirtableConfig::new(api_key, base_id)
    })?;

    let dataset = client.fetch_tables(&tables).await?;

    let data_dir = PathBuf::from(&file_config.data.dir);
    dataset
        .save(&data_dir)
        .with_context(|| format!("Failed to save snapshots to {}", data_dir.display()))?;

    tracing::info!(
        "Saved {} records to {}",
        dataset.record_count(),
        data_dir.display()
    );

    Ok(())
}
