//! Static props builder.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use airkit_airtable::{DataError, Dataset, Resolver, DEFAULT_MAX_DEPTH};
use airkit_fields::{FieldError, FieldsMapping, Locale, LocalePriority, RawRecord};

use crate::paths::static_paths;
use crate::props::PageProps;

/// Configuration for building the props of a site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding the table snapshots
    pub data_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Value of the `ref` field identifying the site's customer
    pub customer_ref: String,

    /// Table the customer is looked up in
    pub customer_table: String,

    /// Locales to generate pages for
    pub locales: Vec<String>,

    /// Fallback locale for fields missing a translation
    pub default_locale: String,

    /// Field to table mapping used to expand links
    pub fields_mapping: FieldsMapping,

    /// Levels of links to expand
    pub max_depth: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("dist"),
            customer_ref: "DEMO".to_string(),
            customer_table: "Customer".to_string(),
            locales: vec!["en".to_string(), "fr".to_string()],
            default_locale: "en".to_string(),
            fields_mapping: FieldsMapping::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of records in the dataset
    pub records: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load dataset: {0}")]
    Data(#[from] DataError),

    #[error("Invalid locale configuration: {0}")]
    Locale(#[from] FieldError),

    #[error("Customer '{customer_ref}' not found in table {table}")]
    CustomerNotFound { customer_ref: String, table: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Build task failed: {0}")]
    TaskError(String),
}

/// Locales of a build, validated once.
struct SiteLocales {
    supported: Vec<Locale>,
    default: Locale,
}

/// Static props builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the props of every locale.
    ///
    /// Runs on the blocking pool; pages are built in parallel.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let builder = Self::new(self.config.clone());

        tokio::task::spawn_blocking(move || builder.build_blocking())
            .await
            .map_err(|e| BuildError::TaskError(e.to_string()))?
    }

    /// Build synchronously on the current thread and the rayon pool.
    pub fn build_blocking(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let locales = self.site_locales()?;
        let dataset = Dataset::load(&self.config.data_dir)?;
        let customer = self.find_customer(&dataset)?;

        tracing::info!(
            "Building {} locales for customer {} ({} records)",
            locales.supported.len(),
            self.config.customer_ref,
            dataset.record_count()
        );

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Build locales in parallel
        let results: Vec<Result<(), BuildError>> = locales
            .supported
            .par_iter()
            .map(|locale| self.build_locale(&dataset, customer, locale, &locales.default))
            .collect();

        for result in results {
            result?;
        }

        self.write_paths(&locales.supported)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: locales.supported.len(),
            records: dataset.record_count(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Props of the page for `locale`.
    pub fn page_props(&self, dataset: &Dataset, locale: &Locale) -> Result<PageProps, BuildError> {
        let locales = self.site_locales()?;
        let customer = self.find_customer(dataset)?;
        self.props_for(dataset, customer, locale, &locales.default)
    }

    /// Parse the configured locales, failing if their codes differ in length.
    fn site_locales(&self) -> Result<SiteLocales, BuildError> {
        let default = Locale::parse(&self.config.default_locale)?;
        let mut supported: Vec<Locale> = Vec::new();
        for code in &self.config.locales {
            let locale = Locale::parse(code)?;
            if !supported.contains(&locale) {
                supported.push(locale);
            }
        }

        if supported.is_empty() {
            tracing::warn!("No locales configured, building {} only", default);
            supported.push(default.clone());
        }

        // Every code must share one length
        LocalePriority::new(supported.iter().cloned().chain([default.clone()]))?;

        Ok(SiteLocales { supported, default })
    }

    fn find_customer<'d>(&self, dataset: &'d Dataset) -> Result<&'d RawRecord, BuildError> {
        dataset
            .find_by_field(&self.config.customer_table, "ref", &self.config.customer_ref)
            .ok_or_else(|| BuildError::CustomerNotFound {
                customer_ref: self.config.customer_ref.clone(),
                table: self.config.customer_table.clone(),
            })
    }

    fn props_for(
        &self,
        dataset: &Dataset,
        customer: &RawRecord,
        locale: &Locale,
        default: &Locale,
    ) -> Result<PageProps, BuildError> {
        let priority = LocalePriority::for_active(locale, default)?;
        let resolver = Resolver::new(dataset, &priority, &self.config.fields_mapping)
            .with_max_depth(self.config.max_depth);

        Ok(PageProps {
            customer_ref: self.config.customer_ref.clone(),
            locale: locale.clone(),
            locale_priority: priority.locales().to_vec(),
            customer: resolver.resolve(customer),
            is_static_rendering: true,
            is_ready_to_render: true,
        })
    }

    /// Build and write the props of a single locale.
    fn build_locale(
        &self,
        dataset: &Dataset,
        customer: &RawRecord,
        locale: &Locale,
        default: &Locale,
    ) -> Result<(), BuildError> {
        let props = self.props_for(dataset, customer, locale, default)?;

        let dir = self.config.output_dir.join(locale.as_str());
        fs::create_dir_all(&dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let json = serde_json::to_string_pretty(&props)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;
        fs::write(dir.join("props.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::debug!("Wrote props for {}", locale);

        Ok(())
    }

    /// Write the list of generated paths.
    fn write_paths(&self, locales: &[Locale]) -> Result<(), BuildError> {
        let json = serde_json::to_string_pretty(&static_paths(locales))
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("paths.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_dataset(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("Customer.json"),
            r#"{"records": [{
                "id": "recC1",
                "fields": {
                    "ref": "DEMO",
                    "labelEN": "Demo shop",
                    "labelFR": "Boutique démo",
                    "products": ["recP1"]
                }
            }]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("Product.json"),
            r#"[{"id": "recP1", "fields": {"titleEN": "Chair"}}]"#,
        )
        .unwrap();
    }

    fn config(root: &Path) -> BuildConfig {
        BuildConfig {
            data_dir: root.join("data"),
            output_dir: root.join("dist"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_props_per_locale() {
        let temp = tempdir().unwrap();
        write_dataset(&temp.path().join("data"));

        let result = StaticBuilder::new(config(temp.path())).build().await.unwrap();

        assert_eq!(result.pages, 2);
        assert_eq!(result.records, 2);

        let fr = fs::read_to_string(temp.path().join("dist/fr/props.json")).unwrap();
        let fr: PageProps = serde_json::from_str(&fr).unwrap();
        assert_eq!(fr.customer["label"], "Boutique démo");
        assert_eq!(fr.customer["products"][0]["title"], "Chair");
        assert_eq!(fr.locale_priority.len(), 2);
        assert!(fr.is_static_rendering);

        let paths = fs::read_to_string(temp.path().join("dist/paths.json")).unwrap();
        assert!(paths.contains("\"fr\""));
    }

    #[test]
    fn default_locale_props_use_one_locale() {
        let temp = tempdir().unwrap();
        write_dataset(&temp.path().join("data"));
        let builder = StaticBuilder::new(config(temp.path()));
        let dataset = Dataset::load(&temp.path().join("data")).unwrap();

        let props = builder
            .page_props(&dataset, &Locale::parse("en").unwrap())
            .unwrap();

        assert_eq!(props.customer["label"], "Demo shop");
        assert_eq!(props.locale_priority, vec![Locale::parse("en").unwrap()]);
    }

    #[test]
    fn fails_on_unknown_customer() {
        let temp = tempdir().unwrap();
        write_dataset(&temp.path().join("data"));

        let result = StaticBuilder::new(BuildConfig {
            customer_ref: "NOPE".to_string(),
            ..config(temp.path())
        })
        .build_blocking();

        assert!(matches!(result, Err(BuildError::CustomerNotFound { .. })));
    }

    #[test]
    fn fails_loudly_on_mixed_locale_lengths() {
        let temp = tempdir().unwrap();
        write_dataset(&temp.path().join("data"));

        let result = StaticBuilder::new(BuildConfig {
            locales: vec!["en".to_string(), "fil".to_string()],
            ..config(temp.path())
        })
        .build_blocking();

        assert!(matches!(
            result,
            Err(BuildError::Locale(FieldError::UnsupportedLocaleFormat { .. }))
        ));
    }

    #[test]
    fn fails_on_missing_data_dir() {
        let temp = tempdir().unwrap();

        let result = StaticBuilder::new(config(temp.path())).build_blocking();

        assert!(matches!(result, Err(BuildError::Data(DataError::DirectoryNotFound(_)))));
    }
}
