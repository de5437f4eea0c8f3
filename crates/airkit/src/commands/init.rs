//! Initialize airkit in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing airkit...");

    scaffold(config_path, Path::new("data"), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'airkit build' to generate page props from the sample data.");

    Ok(())
}

/// Write the default config and the sample table snapshots.
fn scaffold(config_path: &Path, data_dir: &Path, yes: bool) -> Result<()> {
    if data_dir.exists() {
        if !yes {
            tracing::warn!(
                "{} already exists. Use --yes to overwrite.",
                data_dir.display()
            );
            return Ok(());
        }
    } else {
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;
    }

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    for (table, content) in [
        ("Customer", SAMPLE_CUSTOMERS),
        ("Product", SAMPLE_PRODUCTS),
        ("Theme", SAMPLE_THEMES),
    ] {
        let path = data_dir.join(format!("{}.json", table));
        if !path.exists() || yes {
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Created {}", path.display());
        }
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# airkit configuration

[site]
# Value of the "ref" field of the customer this site is built for
customer_ref = "DEMO"

# Fallback locale for fields without a translation
default_locale = "en"

# One page is generated per locale. All codes must have the same length.
locales = ["en", "fr"]

[data]
# Table snapshots, one <Table>.json per table
dir = "data"
tables = ["Customer", "Product", "Theme"]

[airtable]
# Base to fetch from (or set AIRTABLE_BASE_ID). The token is read from AIRTABLE_API_KEY.
# base_id = "appXXXXXXXXXXXXXX"

[build]
output = "dist"

# Levels of linked records to expand
max_depth = 2

# Fields linking to a table under a name the defaults don't cover
[fields_mapping]
items = "Product"
"#;

const SAMPLE_CUSTOMERS: &str = r##"{
  "records": [
    {
      "id": "recCustomerDemo",
      "fields": {
        "ref": "DEMO",
        "labelEN": "Demo customer",
        "labelFR": "Client de démo",
        "termsDescriptionEN": "Use this site as a starting point.",
        "termsDescriptionFR": "Utilisez ce site comme point de départ.",
        "products": ["recProductChair", "recProductLamp"],
        "theme": ["recThemeDefault"]
      }
    }
  ]
}
"##;

const SAMPLE_PRODUCTS: &str = r##"{
  "records": [
    {
      "id": "recProductChair",
      "fields": {
        "titleEN": "Chair",
        "titleFR": "Chaise",
        "descriptionEN": "A comfortable chair.",
        "price": 49.9,
        "customer": ["recCustomerDemo"]
      }
    },
    {
      "id": "recProductLamp",
      "fields": {
        "titleEN": "Lamp",
        "titleFR": "Lampe",
        "price": 19,
        "customer": ["recCustomerDemo"]
      }
    }
  ]
}
"##;

const SAMPLE_THEMES: &str = r##"{
  "records": [
    {
      "id": "recThemeDefault",
      "fields": {
        "primaryColor": "#0070f3",
        "customer": ["recCustomerDemo"]
      }
    }
  ]
}
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use airkit_airtable::Dataset;
    use airkit_static::StaticBuilder;
    use tempfile::tempdir;

    use crate::config::load_config;

    #[test]
    fn scaffolds_a_buildable_project() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("airkit.toml");
        let data_dir = temp.path().join("data");

        scaffold(&config_path, &data_dir, false).unwrap();

        let dataset = Dataset::load(&data_dir).unwrap();
        assert_eq!(dataset.table_names(), vec!["Customer", "Product", "Theme"]);

        let mut build = load_config(&config_path).unwrap().build_config();
        build.data_dir = data_dir;
        build.output_dir = temp.path().join("dist");

        let result = StaticBuilder::new(build).build_blocking().unwrap();
        assert_eq!(result.pages, 2);

        let fr = fs::read_to_string(temp.path().join("dist/fr/props.json")).unwrap();
        assert!(fr.contains("Client de démo"));
        assert!(fr.contains("Chaise"));
    }

    #[test]
    fn keeps_existing_data_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("airkit.toml");
        let data_dir = temp.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();

        scaffold(&config_path, &data_dir, false).unwrap();

        assert!(!config_path.exists());
        assert!(!data_dir.join("Customer.json").exists());
    }
}
