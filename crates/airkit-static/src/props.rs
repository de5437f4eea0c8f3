//! Props handed to a statically generated page.

use serde::{Deserialize, Serialize};

use airkit_fields::Locale;

/// Data a page is rendered from, written as `<locale>/props.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    /// Customer the site is built for
    pub customer_ref: String,

    /// Locale of the page
    pub locale: Locale,

    /// Locales used to collapse localized fields, highest priority first
    pub locale_priority: Vec<Locale>,

    /// The customer record, sanitized for `locale` with links expanded
    pub customer: serde_json::Value,

    /// Props were produced at build time rather than on request
    pub is_static_rendering: bool,

    pub is_ready_to_render: bool,
}
