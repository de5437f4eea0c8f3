//! Errors raised while fetching or loading Airtable data.

/// Errors that can occur when reading or fetching a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Airtable API error on table '{table}' ({status}): {message}")]
    Api {
        table: String,
        status: u16,
        message: String,
    },

    #[error("Invalid Airtable endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid API key: not usable as an HTTP header")]
    InvalidApiKey,

    #[error("Dataset directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse table snapshot {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}
