//! Configuration file (airkit.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use airkit_airtable::{DEFAULT_ENDPOINT, DEFAULT_MAX_DEPTH};
use airkit_fields::FieldsMapping;
use airkit_static::BuildConfig;

/// Configuration file structure. Every key is optional.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub airtable: AirtableSection,
    #[serde(default)]
    pub build: BuildSettings,
    /// Extra field to table entries, merged over the built-in ones
    #[serde(default)]
    pub fields_mapping: Option<FieldsMapping>,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_customer_ref")]
    pub customer_ref: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
    #[serde(default = "default_tables")]
    pub tables: Vec<String>,
    #[serde(default = "default_customer_table")]
    pub customer_table: String,
}

#[derive(Debug, Deserialize)]
pub struct AirtableSection {
    /// Falls back to the AIRTABLE_BASE_ID environment variable
    pub base_id: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            customer_ref: default_customer_ref(),
            default_locale: default_locale(),
            locales: default_locales(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            tables: default_tables(),
            customer_table: default_customer_table(),
        }
    }
}

impl Default for AirtableSection {
    fn default() -> Self {
        Self {
            base_id: None,
            endpoint: default_endpoint(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_customer_ref() -> String {
    "DEMO".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_locales() -> Vec<String> {
    vec!["en".to_string(), "fr".to_string()]
}
fn default_data_dir() -> String {
    "data".to_string()
}
fn default_tables() -> Vec<String> {
    vec![
        "Customer".to_string(),
        "Product".to_string(),
        "Theme".to_string(),
    ]
}
fn default_customer_table() -> String {
    "Customer".to_string()
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl ConfigFile {
    /// Parse a configuration from TOML.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    /// Built-in field mapping with the configured entries merged over it.
    pub fn fields_mapping(&self) -> FieldsMapping {
        let mut mapping = FieldsMapping::default();
        if let Some(extra) = &self.fields_mapping {
            mapping.merge(extra);
        }
        mapping
    }

    /// Build settings for the static builder.
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            data_dir: PathBuf::from(&self.data.dir),
            output_dir: PathBuf::from(&self.build.output),
            customer_ref: self.site.customer_ref.clone(),
            customer_table: self.data.customer_table.clone(),
            locales: self.site.locales.clone(),
            default_locale: self.site.default_locale.clone(),
            fields_mapping: self.fields_mapping(),
            max_depth: self.build.max_depth,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = ConfigFile::parse(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    tracing::debug!("{} not found, using defaults", path.display());
    Ok(ConfigFile::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ConfigFile::parse("").unwrap();

        assert_eq!(config.site.customer_ref, "DEMO");
        assert_eq!(config.site.locales, vec!["en", "fr"]);
        assert_eq!(config.data.dir, "data");
        assert_eq!(config.airtable.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.build.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn parses_full_file() {
        let config = ConfigFile::parse(
            r#"
[site]
customer_ref = "ACME"
default_locale = "fr"
locales = ["fr", "en", "de"]

[data]
dir = "snapshots"
tables = ["Customer", "Product"]

[airtable]
base_id = "appXYZ"

[build]
output = "public/data"
max_depth = 1

[fields_mapping]
items = "Product"
"#,
        )
        .unwrap();

        let build = config.build_config();

        assert_eq!(build.customer_ref, "ACME");
        assert_eq!(build.default_locale, "fr");
        assert_eq!(build.locales, vec!["fr", "en", "de"]);
        assert_eq!(build.data_dir, PathBuf::from("snapshots"));
        assert_eq!(build.output_dir, PathBuf::from("public/data"));
        assert_eq!(build.max_depth, 1);
        assert_eq!(build.fields_mapping.table_for("items"), Some("Product"));
        assert_eq!(build.fields_mapping.table_for("products"), Some("Product"));
        assert_eq!(config.airtable.base_id.as_deref(), Some("appXYZ"));
    }

    #[test]
    fn rejects_malformed_file() {
        assert!(ConfigFile::parse("[site\ncustomer_ref = ").is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("airkit.toml")).unwrap();

        assert_eq!(config.site.default_locale, "en");
    }
}
