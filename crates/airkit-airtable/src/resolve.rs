//! Relationship resolution across tables.

use serde_json::Value;

use airkit_fields::{sanitize_record, FieldsMapping, LocalePriority, RawRecord, SanitizedRecord};

use crate::dataset::Dataset;

/// How many levels of links are expanded by default.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Sanitizes records for a locale priority and expands their links into the
/// linked records themselves.
///
/// Links deeper than the depth limit, or pointing back at a record already
/// being expanded, stay as plain ids. Links to records missing from the
/// dataset are dropped.
pub struct Resolver<'a> {
    dataset: &'a Dataset,
    priority: &'a LocalePriority,
    mapping: &'a FieldsMapping,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(
        dataset: &'a Dataset,
        priority: &'a LocalePriority,
        mapping: &'a FieldsMapping,
    ) -> Self {
        Self {
            dataset,
            priority,
            mapping,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sanitize a single record without touching its links.
    pub fn sanitize(&self, record: &RawRecord) -> SanitizedRecord {
        sanitize_record(record, self.priority, self.mapping)
    }

    /// Sanitize `record` and expand its links.
    pub fn resolve(&self, record: &RawRecord) -> Value {
        let mut path = Vec::new();
        self.resolve_at(record, 0, &mut path)
    }

    fn resolve_at(&self, record: &RawRecord, depth: usize, path: &mut Vec<String>) -> Value {
        let sanitized = self.sanitize(record);
        let mut json = sanitized.to_json();

        if depth >= self.max_depth {
            return json;
        }

        path.push(record.id.clone());

        if let Value::Object(ref mut object) = json {
            for (field, relation) in &sanitized.relations {
                let mut linked = Vec::with_capacity(relation.ids.len());

                for id in &relation.ids {
                    if path.contains(id) {
                        linked.push(Value::String(id.clone()));
                        continue;
                    }

                    match self.dataset.record(&relation.table, id) {
                        Some(target) => linked.push(self.resolve_at(target, depth + 1, path)),
                        None => tracing::warn!(
                            "Record {} linked from {}.{} not found in table {}",
                            id,
                            record.id,
                            field,
                            relation.table
                        ),
                    }
                }

                object.insert(field.clone(), Value::Array(linked));
            }
        }

        path.pop();
        json
    }
}
