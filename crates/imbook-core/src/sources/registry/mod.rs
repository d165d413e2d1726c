//! National bibliographic registry provider
//!
//! Single-ISBN lookup returning a JSON array with one element per requested
//! ISBN: `null` when unknown, otherwise an object with a nested ONIX tree
//! (`onix`) and an optional flattened `summary`. Every field prefers the
//! summary and falls back to ONIX when the summary is absent or lacks it.

pub mod onix;

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{BookProvider, SourceError, SourceMetadata};
use crate::config::RegistryConfig;
use crate::domain::{BookRecord, DataSource};
use crate::http::HttpClient;

pub struct RegistrySource {
    client: HttpClient,
    base_url: String,
}

impl RegistrySource {
    pub fn new(client: HttpClient, config: &RegistryConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "registry",
            name: "National Bibliographic Registry",
            description: "ONIX-derived registry records with a flattened summary, ISBN lookup only",
            base_url: "https://api.openbd.jp/v1",
            data_source: DataSource::Registry,
            supports_keyword_search: false,
            requires_api_key: false,
        }
    }
}

#[async_trait]
impl BookProvider for RegistrySource {
    async fn search_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, SourceError> {
        let url = format!("{}/get", self.base_url);
        let body = self.client.get_ok_body(&url, &[("isbn", isbn)]).await?;
        parse_lookup_response(&body)
    }

    fn name(&self) -> &'static str {
        "registry"
    }

    fn data_source(&self) -> DataSource {
        DataSource::Registry
    }
}

/// Parse a lookup response body
///
/// Accepts the usual array form as well as a bare entry object.
pub fn parse_lookup_response(json: &str) -> Result<Vec<BookRecord>, SourceError> {
    let response: Value = serde_json::from_str(json)
        .map_err(|e| SourceError::Parse(format!("Invalid registry JSON: {}", e)))?;

    Ok(match &response {
        Value::Array(entries) => entries.iter().filter_map(normalize_entry).collect(),
        other => normalize_entry(other).into_iter().collect(),
    })
}

/// Normalize one registry entry, `None` for `null` or unrecognizable entries
pub fn normalize_entry(entry: &Value) -> Option<BookRecord> {
    let summary = entry.get("summary").filter(|s| s.is_object());
    let onix_tree = entry.get("onix").filter(|o| o.is_object());
    if summary.is_none() && onix_tree.is_none() {
        return None;
    }

    let pick = |from_summary: fn(&Value) -> Option<String>, from_onix: fn(&Value) -> Option<String>| {
        summary
            .and_then(from_summary)
            .or_else(|| onix_tree.and_then(from_onix))
    };

    let title = pick(onix::summary_title, onix::onix_title);
    let author = pick(onix::summary_author, onix::onix_author);
    let isbn = pick(onix::summary_isbn, onix::onix_isbn);
    if title.is_none() && author.is_none() && isbn.is_none() {
        return None;
    }

    Some(
        BookRecord::new(title, author, DataSource::Registry)
            .with_isbn(isbn)
            .with_publisher(pick(onix::summary_publisher, onix::onix_publisher))
            .with_published_date(pick(onix::summary_published_date, onix::onix_published_date))
            .with_page_count(onix_tree.and_then(onix::onix_page_count))
            .with_description(onix_tree.and_then(onix::onix_description))
            .with_cover_image_url(pick(onix::summary_cover, onix::onix_cover)),
    )
}
