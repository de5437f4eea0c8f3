//! Minimal Airtable REST client.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use airkit_fields::RawRecord;

use crate::dataset::Dataset;
use crate::error::DataError;

/// Public Airtable API root.
pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com/v0";

/// Connection settings for one Airtable base.
#[derive(Debug, Clone)]
pub struct AirtableConfig {
    /// Personal access token or API key
    pub api_key: String,

    /// Base id (`appXXXXXXXXXXXXXX`)
    pub base_id: String,

    /// API root, overridable for proxies and tests
    pub endpoint: String,
}

impl AirtableConfig {
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_id: base_id.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// One page of the "list records" endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub records: Vec<RawRecord>,

    /// Cursor for the next page; absent on the last one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Airtable API client bound to one base.
pub struct AirtableClient {
    client: reqwest::Client,
    config: AirtableConfig,
}

impl AirtableClient {
    /// Create a client that authenticates every request with the configured key.
    pub fn new(config: AirtableConfig) -> Result<Self, DataError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| DataError::InvalidApiKey)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// URL of the list endpoint for `table`. Table names are percent-encoded.
    pub fn table_url(&self, table: &str) -> Result<Url, DataError> {
        let mut url = Url::parse(&self.config.endpoint)
            .map_err(|e| DataError::InvalidEndpoint(format!("{}: {}", self.config.endpoint, e)))?;

        url.path_segments_mut()
            .map_err(|_| DataError::InvalidEndpoint(self.config.endpoint.clone()))?
            .pop_if_empty()
            .push(&self.config.base_id)
            .push(table);

        Ok(url)
    }

    /// Fetch every record of `table`, following pagination.
    pub async fn list_records(&self, table: &str) -> Result<Vec<RawRecord>, DataError> {
        let url = self.table_url(table)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self.client.get(url.clone());
            if let Some(ref cursor) = offset {
                request = request.query(&[("offset", cursor)]);
            }

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(DataError::Api {
                    table: table.to_string(),
                    status: status.as_u16(),
                    message: api_error_message(&body),
                });
            }

            let page: ListResponse = response.json().await?;
            tracing::debug!("Fetched {} records from {}", page.records.len(), table);
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    /// Fetch several tables into a dataset.
    pub async fn fetch_tables<S: AsRef<str>>(&self, tables: &[S]) -> Result<Dataset, DataError> {
        let mut dataset = Dataset::new();

        for table in tables {
            let table = table.as_ref();
            let records = self.list_records(table).await?;
            tracing::info!("Fetched {} records from table {}", records.len(), table);
            dataset.insert_table(table, records);
        }

        Ok(dataset)
    }
}

/// Extract a readable message from an Airtable error body.
///
/// Airtable answers either `{"error": {"type": .., "message": ..}}` or
/// `{"error": "NOT_FOUND"}`.
fn api_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    match value.get("error") {
        Some(serde_json::Value::String(kind)) => kind.clone(),
        Some(error) => {
            let kind = error.get("type").and_then(|t| t.as_str());
            let message = error.get("message").and_then(|m| m.as_str());
            match (kind, message) {
                (Some(kind), Some(message)) => format!("{}: {}", kind, message),
                (Some(kind), None) => kind.to_string(),
                (None, Some(message)) => message.to_string(),
                (None, None) => error.to_string(),
            }
        }
        None => body.trim().to_string(),
    }
}
