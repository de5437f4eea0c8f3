//! In-memory dataset of Airtable tables, with JSON snapshots on disk.
//!
//! A snapshot directory holds one `<Table>.json` file per table, containing
//! either an Airtable list response (`{"records": [...]}`) or a bare array of
//! records.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use airkit_fields::{FieldValue, RawRecord};

use crate::client::ListResponse;
use crate::error::DataError;

#[derive(Debug, Clone, Default)]
struct Table {
    records: Vec<RawRecord>,
    by_id: HashMap<String, usize>,
}

impl Table {
    fn new(records: Vec<RawRecord>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self { records, by_id }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TableSnapshot {
    Page(ListResponse),
    Records(Vec<RawRecord>),
}

/// Records of several tables, indexed by table name and record id.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tables: BTreeMap<String, Table>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table.
    pub fn insert_table(&mut self, name: impl Into<String>, records: Vec<RawRecord>) {
        self.tables.insert(name.into(), Table::new(records));
    }

    /// Builder-style [`insert_table`](Self::insert_table).
    pub fn with_table(mut self, name: impl Into<String>, records: Vec<RawRecord>) -> Self {
        self.insert_table(name, records);
        self
    }

    /// Records of a table.
    pub fn table(&self, name: &str) -> Option<&[RawRecord]> {
        self.tables.get(name).map(|t| t.records.as_slice())
    }

    /// Look up a record by table and id.
    pub fn record(&self, table: &str, id: &str) -> Option<&RawRecord> {
        let table = self.tables.get(table)?;
        table.by_id.get(id).map(|&i| &table.records[i])
    }

    /// First record of `table` whose text field `field` equals `value`.
    pub fn find_by_field(&self, table: &str, field: &str, value: &str) -> Option<&RawRecord> {
        self.table(table)?
            .iter()
            .find(|r| r.fields.get(field).and_then(FieldValue::as_str) == Some(value))
    }

    /// Table names, sorted.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Total number of records across tables.
    pub fn record_count(&self) -> usize {
        self.tables.values().map(|t| t.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Load every `*.json` table snapshot directly inside `dir`.
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        if !dir.is_dir() {
            return Err(DataError::DirectoryNotFound(dir.display().to_string()));
        }

        let mut dataset = Self::new();

        for entry in WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(path).map_err(|e| DataError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let records = parse_table(&content).map_err(|e| DataError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            tracing::debug!("Loaded {} records from {}", records.len(), path.display());
            dataset.insert_table(name, records);
        }

        Ok(dataset)
    }

    /// Write one snapshot file per table into `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), DataError> {
        fs::create_dir_all(dir).map_err(|e| DataError::WriteError(e.to_string()))?;

        for (name, table) in &self.tables {
            let page = ListResponse {
                records: table.records.clone(),
                offset: None,
            };
            let json = serde_json::to_string_pretty(&page)
                .map_err(|e| DataError::WriteError(e.to_string()))?;

            let path = dir.join(format!("{}.json", name));
            fs::write(&path, json).map_err(|e| DataError::WriteError(e.to_string()))?;
            tracing::debug!("Wrote {}", path.display());
        }

        Ok(())
    }
}

/// Parse a table snapshot.
pub fn parse_table(json: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    let snapshot: TableSnapshot = serde_json::from_str(json)?;

    Ok(match snapshot {
        TableSnapshot::Page(page) => page.records,
        TableSnapshot::Records(records) => records,
    })
}
