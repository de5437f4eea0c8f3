//! Airtable data access for airkit.
//!
//! Fetches tables over the Airtable REST API, stores them as JSON snapshots
//! on disk, and resolves the links between records once they have been
//! sanitized for a locale.

pub mod client;
pub mod dataset;
pub mod error;
pub mod resolve;

pub use client::{AirtableClient, AirtableConfig, ListResponse, DEFAULT_ENDPOINT};
pub use dataset::Dataset;
pub use error::DataError;
pub use resolve::{Resolver, DEFAULT_MAX_DEPTH};
