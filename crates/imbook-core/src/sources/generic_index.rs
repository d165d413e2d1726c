//! Generic volume index provider
//!
//! Flat JSON volumes with `industryIdentifiers` and `imageLinks`. ISBN
//! lookups go through the keyword endpoint using `isbn:<value>` syntax.

use async_trait::async_trait;
use serde_json::Value;

use super::fields::{array_field, iso_partial_date, join_names, str_field, u32_field, upgrade_to_https};
use super::traits::{BookProvider, SourceError, SourceMetadata};
use crate::config::GenericIndexConfig;
use crate::domain::{BookRecord, DataSource};
use crate::http::HttpClient;
use crate::identifiers::normalize_isbn;

pub struct GenericIndexSource {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
    max_results: u32,
}

impl GenericIndexSource {
    pub fn new(client: HttpClient, config: &GenericIndexConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            max_results: config.max_results,
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "generic_index",
            name: "Generic Volume Index",
            description: "General-purpose volume index with keyword and isbn: query syntax",
            base_url: "https://www.googleapis.com/books/v1",
            data_source: DataSource::GenericIndex,
            supports_keyword_search: true,
            requires_api_key: false,
        }
    }

    async fn volumes(&self, q: &str) -> Result<Vec<BookRecord>, SourceError> {
        let url = format!("{}/volumes", self.base_url);
        let max_results = self.max_results.to_string();
        let mut params = vec![("q", q), ("maxResults", max_results.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }

        let body = self.client.get_ok_body(&url, &params).await?;
        parse_volumes_response(&body)
    }
}

#[async_trait]
impl BookProvider for GenericIndexSource {
    async fn search_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, SourceError> {
        self.volumes(&isbn_query(isbn)).await
    }

    async fn search_by_query(&self, query: &str) -> Result<Vec<BookRecord>, SourceError> {
        self.volumes(query).await
    }

    fn name(&self) -> &'static str {
        "generic_index"
    }

    fn data_source(&self) -> DataSource {
        DataSource::GenericIndex
    }
}

/// Express an ISBN lookup in the index's query syntax
pub fn isbn_query(isbn: &str) -> String {
    format!("isbn:{}", isbn)
}

/// Parse a `volumes` response body
pub fn parse_volumes_response(json: &str) -> Result<Vec<BookRecord>, SourceError> {
    let response: Value = serde_json::from_str(json)
        .map_err(|e| SourceError::Parse(format!("Invalid volume index JSON: {}", e)))?;

    Ok(array_field(&response, "items").filter_map(normalize_volume).collect())
}

/// Normalize one volume into a `BookRecord`
pub fn normalize_volume(volume: &Value) -> Option<BookRecord> {
    let info = volume.get("volumeInfo")?;
    if !info.is_object() {
        return None;
    }

    let title = str_field(info, "title");
    let author = join_names(array_field(info, "authors").filter_map(Value::as_str));
    let isbn = select_isbn(info);

    if title.is_none() && author.is_none() && isbn.is_none() {
        return None;
    }

    Some(
        BookRecord::new(title, author, DataSource::GenericIndex)
            .with_isbn(isbn)
            .with_publisher(str_field(info, "publisher"))
            .with_published_date(str_field(info, "publishedDate").and_then(|d| iso_partial_date(&d)))
            .with_page_count(u32_field(info, "pageCount"))
            .with_description(str_field(info, "description"))
            .with_cover_image_url(select_image(info)),
    )
}

/// Prefer the ISBN-13 identifier, then ISBN-10
fn select_isbn(info: &Value) -> Option<String> {
    let identifier_of = |kind: &str| {
        array_field(info, "industryIdentifiers")
            .find(|id| id.get("type").and_then(Value::as_str) == Some(kind))
            .and_then(|id| str_field(id, "identifier"))
            .map(|i| normalize_isbn(&i))
            .filter(|i| !i.is_empty())
    };

    identifier_of("ISBN_13").or_else(|| identifier_of("ISBN_10"))
}

/// Largest available image link, upgraded to https
fn select_image(info: &Value) -> Option<String> {
    let links = info.get("imageLinks")?;
    str_field(links, "thumbnail")
        .or_else(|| str_field(links, "smallThumbnail"))
        .map(|url| upgrade_to_https(&url))
}
