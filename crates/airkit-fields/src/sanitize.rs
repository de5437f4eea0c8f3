//! Turning raw records into sanitized records.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::field::{has_generic_localised_field, is_localised_field};
use crate::locale::LocalePriority;
use crate::mapping::FieldsMapping;
use crate::record::{FieldValue, Fields, RawRecord};

/// Linked records held by a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    /// Table the linked records live in
    pub table: String,
    /// Linked record ids, in Airtable order
    pub ids: Vec<String>,
}

/// A record whose localized fields have been collapsed to their generic names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizedRecord {
    pub id: String,

    /// Raw fields plus the collapsed generic fields
    pub fields: Fields,

    /// Relationship fields, keyed by field name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, Relation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

impl SanitizedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Text value of a field, if it holds text.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn relation(&self, field: &str) -> Option<&Relation> {
        self.relations.get(field)
    }

    /// Fields as a JSON object, with the record id under `id`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert("id".to_string(), serde_json::Value::String(self.id.clone()));
        for (name, value) in &self.fields {
            object.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(object)
    }
}

/// Copy localized values to their generic field names, in priority order.
///
/// A generic field that already holds a value is left alone, so the first
/// locale in `priority` wins. Sources are taken from the fields present on
/// entry, and a name that is itself the generic name of another localized
/// field is never a source. Running the pass twice changes nothing, even for
/// stacked suffixes like `aFREN`. Null values and names that collapse to
/// nothing are skipped.
///
/// Returns the number of generic fields written.
pub fn collapse_localised_fields(fields: &mut Fields, priority: &LocalePriority) -> usize {
    let code_len = priority.code_len();

    let localised: Vec<String> = fields
        .iter()
        .filter(|(name, value)| !value.is_null() && is_localised_field(name, priority.locales()))
        .map(|(name, _)| name.clone())
        .collect();
    let derived: BTreeSet<String> = localised
        .iter()
        .map(|name| priority.generic_field_name(name))
        .collect();

    let mut written = 0;
    for locale in priority.locales() {
        for name in &localised {
            if derived.contains(name) || !is_localised_field(name, std::slice::from_ref(locale)) {
                continue;
            }
            if has_generic_localised_field(fields, name, code_len) {
                continue;
            }

            let generic = priority.generic_field_name(name);
            if generic.is_empty() {
                tracing::trace!("Field '{}' has no generic name, skipping", name);
                continue;
            }

            if let Some(value) = fields.get(name).cloned() {
                tracing::trace!("Collapsed '{}' into '{}' ({})", name, generic, locale);
                fields.insert(generic, value);
                written += 1;
            }
        }
    }

    written
}

/// Sanitize a raw record: collapse its localized fields and tag the fields
/// that link to other tables.
pub fn sanitize_record(
    record: &RawRecord,
    priority: &LocalePriority,
    mapping: &FieldsMapping,
) -> SanitizedRecord {
    let mut fields = record.fields.clone();
    collapse_localised_fields(&mut fields, priority);

    let relations = fields
        .iter()
        .filter_map(|(name, value)| {
            let table = mapping.table_for(name)?;
            let ids = value.as_links()?;
            Some((
                name.clone(),
                Relation {
                    table: table.to_string(),
                    ids: ids.to_vec(),
                },
            ))
        })
        .collect();

    SanitizedRecord {
        id: record.id.clone(),
        fields,
        relations,
        created_time: record.created_time.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn priority(codes: &[&str]) -> LocalePriority {
        LocalePriority::parse(codes).unwrap()
    }

    fn greeting() -> RawRecord {
        RawRecord::new("recC1")
            .with_field("labelEN", "Hello")
            .with_field("labelFR", "Bonjour")
    }

    #[test]
    fn first_priority_locale_wins() {
        let record = sanitize_record(
            &greeting(),
            &priority(&["en", "fr"]),
            &FieldsMapping::default(),
        );

        assert_eq!(record.get_str("label"), Some("Hello"));
    }

    #[test]
    fn lower_priority_locale_does_not_overwrite() {
        let record = sanitize_record(
            &greeting(),
            &priority(&["fr", "en"]),
            &FieldsMapping::default(),
        );

        assert_eq!(record.get_str("label"), Some("Bonjour"));
        assert_eq!(record.get_str("labelEN"), Some("Hello"));
    }

    #[test]
    fn falls_back_to_next_locale() {
        let raw = RawRecord::new("recC1")
            .with_field("labelEN", "Hello")
            .with_field("descriptionEN", "English only");

        let record = sanitize_record(&raw, &priority(&["fr", "en"]), &FieldsMapping::default());

        assert_eq!(record.get_str("label"), Some("Hello"));
        assert_eq!(record.get_str("description"), Some("English only"));
    }

    #[test]
    fn existing_generic_field_is_kept() {
        let raw = greeting().with_field("label", "Plain");

        let record = sanitize_record(&raw, &priority(&["en"]), &FieldsMapping::default());

        assert_eq!(record.get_str("label"), Some("Plain"));
    }

    #[test]
    fn null_values_do_not_block_fallback() {
        let raw = RawRecord::new("recC1")
            .with_field("labelFR", FieldValue::Other(serde_json::Value::Null))
            .with_field("labelEN", "Hello");

        let record = sanitize_record(&raw, &priority(&["fr", "en"]), &FieldsMapping::default());

        assert_eq!(record.get_str("label"), Some("Hello"));
    }

    #[test]
    fn collapsing_is_idempotent() {
        let mut once = greeting()
            .with_field("titleFR", "Titre")
            .with_field("EN", "bare")
            .fields;
        let p = priority(&["en", "fr"]);

        collapse_localised_fields(&mut once, &p);
        let mut twice = once.clone();
        let written = collapse_localised_fields(&mut twice, &p);

        assert_eq!(written, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn stacked_suffixes_do_not_cascade() {
        let p = priority(&["fr", "en"]);
        let mut once = RawRecord::new("recC1").with_field("aFREN", "v").fields;

        collapse_localised_fields(&mut once, &p);
        let mut twice = once.clone();
        let written = collapse_localised_fields(&mut twice, &p);

        assert_eq!(once.keys().collect::<Vec<_>>(), vec!["aFR", "aFREN"]);
        assert_eq!(written, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn stacked_suffixes_collapse_one_level_in_any_order() {
        let mut fields = RawRecord::new("recC1").with_field("aFREN", "v").fields;

        let written = collapse_localised_fields(&mut fields, &priority(&["en", "fr"]));

        assert_eq!(written, 1);
        assert!(!fields.contains_key("a"));
    }

    #[test]
    fn empty_string_counts_as_present() {
        let raw = RawRecord::new("recC1")
            .with_field("labelFR", "")
            .with_field("labelEN", "Hello");

        let record = sanitize_record(&raw, &priority(&["fr", "en"]), &FieldsMapping::default());

        assert_eq!(record.get_str("label"), Some(""));
    }

    #[test]
    fn counts_written_fields() {
        let mut fields = greeting().with_field("titleFR", "Titre").fields;

        let written = collapse_localised_fields(&mut fields, &priority(&["en", "fr"]));

        assert_eq!(written, 2);
        assert!(!fields.contains_key(""));
    }

    #[test]
    fn tags_relationship_fields() {
        let raw = RawRecord::new("recC1")
            .with_field("products", vec!["recP1".to_string(), "recP2".to_string()])
            .with_field("items", vec!["recP3".to_string()])
            .with_field("tags", vec!["new".to_string()])
            .with_field("theme", "not a link");

        let mapping = FieldsMapping::default().with("items", "Product");
        let record = sanitize_record(&raw, &priority(&["en"]), &mapping);

        assert_eq!(
            record.relation("products"),
            Some(&Relation {
                table: "Product".to_string(),
                ids: vec!["recP1".to_string(), "recP2".to_string()],
            })
        );
        assert_eq!(record.relation("items").map(|r| r.table.as_str()), Some("Product"));
        assert!(record.relation("tags").is_none());
        assert!(record.relation("theme").is_none());
    }

    #[test]
    fn serializes_to_flat_json() {
        let record = sanitize_record(&greeting(), &priority(&["en"]), &FieldsMapping::default());

        assert_eq!(
            record.to_json(),
            serde_json::json!({
                "id": "recC1",
                "label": "Hello",
                "labelEN": "Hello",
                "labelFR": "Bonjour",
            })
        );
    }
}
