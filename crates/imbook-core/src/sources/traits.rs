//! Common traits for provider adapters

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{BookRecord, DataSource};
use crate::http::HttpError;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(HttpError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rate limited")]
    RateLimit,
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl From<HttpError> for SourceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RateLimited => SourceError::RateLimit,
            other => SourceError::Http(other),
        }
    }
}

/// Metadata about a provider
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_url: &'static str,
    pub data_source: DataSource,
    pub supports_keyword_search: bool,
    pub requires_api_key: bool,
}

/// One external catalog provider
///
/// Implementations issue the HTTP call and run their normalizer; the
/// resolver only ever sees `BookRecord`s through this trait.
#[async_trait]
pub trait BookProvider: Send + Sync {
    /// Look up a normalized ISBN
    async fn search_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, SourceError>;

    /// Free-text keyword search
    ///
    /// Providers without keyword search return [`SourceError::Unsupported`].
    async fn search_by_query(&self, query: &str) -> Result<Vec<BookRecord>, SourceError> {
        let _ = query;
        Err(SourceError::Unsupported("keyword search"))
    }

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Provenance stamped on this provider's records
    fn data_source(&self) -> DataSource;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_source_error() {
        let err: SourceError = HttpError::RateLimited.into();
        assert!(matches!(err, SourceError::RateLimit));

        let err: SourceError = HttpError::Status { status: 503 }.into();
        assert_eq!(err.to_string(), "HTTP error: Unexpected status 503");
    }
}
