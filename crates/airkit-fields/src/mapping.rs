//! Field to table mapping used to recognise relationships.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps a field name to the table its linked records live in.
///
/// The defaults cover the singular and plural names of the built-in tables.
/// Sites with less obvious names extend it, e.g. `items` -> `Product`.
/// Entries are not validated; inserting an existing key replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldsMapping(BTreeMap<String, String>);

impl FieldsMapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, field: impl Into<String>, table: impl Into<String>) {
        self.0.insert(field.into(), table.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, table: impl Into<String>) -> Self {
        self.insert(field, table);
        self
    }

    /// Copy every entry of `other` over this mapping.
    pub fn merge(&mut self, other: &FieldsMapping) {
        for (field, table) in other.iter() {
            self.insert(field, table);
        }
    }

    /// Table linked by `field`, if any.
    pub fn table_for(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` holds links to another table.
    pub fn is_relationship(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Distinct table names referenced by the mapping.
    pub fn tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = self.0.values().map(String::as_str).collect();
        tables.sort_unstable();
        tables.dedup();
        tables
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, t)| (f.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FieldsMapping {
    fn default() -> Self {
        Self::new()
            .with("customer", "Customer")
            .with("customers", "Customer")
            .with("product", "Product")
            .with("products", "Product")
            .with("theme", "Theme")
            .with("themes", "Theme")
    }
}
