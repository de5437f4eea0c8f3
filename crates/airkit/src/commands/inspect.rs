//! Record inspection command.

use std::path::{Path, PathBuf};

use airkit_airtable::{Dataset, Resolver};
use airkit_fields::{Locale, LocalePriority};
use airkit_static::resolve_locale;
use anyhow::{Context, Result};

use crate::config::load_config;

/// Run the inspect command.
pub fn run(config_path: &Path, table: &str, id: &str, locale: Option<&str>) -> Result<()> {
    let file_config = load_config(config_path)?;

    let default = Locale::parse(&file_config.site.default_locale)?;
    let supported = file_config
        .site
        .locales
        .iter()
        .map(|code| Locale::parse(code))
        .collect::<Result<Vec<_>, _>>()?;

    let locale = resolve_locale(locale, &supported, &default);
    let priority = LocalePriority::for_active(&locale, &default)?;

    let dataset = Dataset::load(&PathBuf::from(&file_config.data.dir))?;
    let record = dataset
        .record(table, id)
        .with_context(|| format!("Record {} not found in table {}", id, table))?;

    let mapping = file_config.fields_mapping();
    let resolved = Resolver::new(&dataset, &priority, &mapping)
        .with_max_depth(file_config.build.max_depth)
        .resolve(record);

    tracing::debug!("Resolved {}.{} for {}", table, id, locale);
    println!("{}", serde_json::to_string_pretty(&resolved)?);

    Ok(())
}
