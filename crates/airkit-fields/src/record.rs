//! Raw Airtable records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to value, ordered for deterministic output.
pub type Fields = BTreeMap<String, FieldValue>;

/// A single cell value as returned by Airtable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(serde_json::Number),
    Text(String),
    /// Linked record ids, or the options of a multiple select
    Links(Vec<String>),
    /// Attachments, collaborators, lookups and anything else
    Other(serde_json::Value),
}

impl FieldValue {
    /// Whether the value is JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Other(serde_json::Value::Null))
    }

    /// The text content, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Linked record ids, if this is a list cell.
    pub fn as_links(&self) -> Option<&[String]> {
        match self {
            Self::Links(ids) => Some(ids),
            _ => None,
        }
    }

    /// Convert to a plain JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Links(ids) => serde_json::Value::Array(
                ids.iter().cloned().map(serde_json::Value::String).collect(),
            ),
            Self::Other(v) => v.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(ids: Vec<String>) -> Self {
        Self::Links(ids)
    }
}

/// A row as fetched from an Airtable table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Airtable record id (`recXXXXXXXXXXXXXX`)
    pub id: String,

    /// Cell values by column name
    #[serde(default)]
    pub fields: Fields,

    /// Creation timestamp reported by Airtable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

impl RawRecord {
    /// Create a record with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Fields::new(),
            created_time: None,
        }
    }

    /// Builder-style field insertion, mostly useful for fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_airtable_record() {
        let json = r#"{
            "id": "recA1",
            "createdTime": "2020-04-01T10:00:00.000Z",
            "fields": {
                "ref": "DEMO",
                "labelEN": "Hello",
                "price": 12.5,
                "published": true,
                "products": ["recP1", "recP2"],
                "logo": [{"url": "https://example.com/logo.png"}],
                "notes": null
            }
        }"#;

        let record: RawRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "recA1");
        assert_eq!(record.created_time.as_deref(), Some("2020-04-01T10:00:00.000Z"));
        assert_eq!(record.fields["ref"], FieldValue::from("DEMO"));
        assert_eq!(record.fields["published"], FieldValue::Boolean(true));
        assert!(matches!(record.fields["price"], FieldValue::Number(_)));
        assert_eq!(
            record.fields["products"].as_links(),
            Some(&["recP1".to_string(), "recP2".to_string()][..])
        );
        assert!(matches!(record.fields["logo"], FieldValue::Other(_)));
        assert!(record.fields["notes"].is_null());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let record: RawRecord = serde_json::from_str(r#"{"id": "recEmpty"}"#).unwrap();

        assert!(record.fields.is_empty());
    }

    #[test]
    fn converts_values_to_json() {
        let value = FieldValue::from(vec!["recP1".to_string()]);

        assert_eq!(value.to_json(), serde_json::json!(["recP1"]));
        assert_eq!(FieldValue::from(3_i64).to_json(), serde_json::json!(3));
    }
}
