//! Locale-aware field collapsing for records fetched from Airtable.
//!
//! Airtable tables store translated content in sibling columns that share a
//! generic name and differ by an uppercase locale suffix (`labelEN`,
//! `labelFR`). This crate detects those columns, collapses them to their
//! generic name following an explicit locale priority, and tags the fields
//! that link to other tables so they can be resolved later.

pub mod error;
pub mod field;
pub mod locale;
pub mod mapping;
pub mod record;
pub mod sanitize;

pub use error::FieldError;
pub use field::{generic_field_name, has_generic_localised_field, is_localised_field};
pub use locale::{Locale, LocalePriority};
pub use mapping::FieldsMapping;
pub use record::{FieldValue, Fields, RawRecord};
pub use sanitize::{collapse_localised_fields, sanitize_record, Relation, SanitizedRecord};
