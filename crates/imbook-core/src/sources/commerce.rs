//! Commerce catalog provider (books search with affiliate links)
//!
//! Items carry a free-text `size` field that encodes the page count
//! (`"文庫 256p"`) and a localized `salesDate` (`"2002年06月28日"`).
//! Requests use `formatVersion=2`; the older wrapped shape
//! `{"Items":[{"Item":{...}}]}` is accepted as well.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::fields::{join_names, str_field};
use super::traits::{BookProvider, SourceError, SourceMetadata};
use crate::config::CommerceConfig;
use crate::domain::{BookRecord, DataSource};
use crate::http::HttpClient;
use crate::identifiers::normalize_isbn;

lazy_static! {
    static ref PAGE_COUNT: Regex = Regex::new(r"(\d+)\s*[pP]").unwrap();
    static ref SALES_DATE: Regex = Regex::new(r"^\s*(\d{4})年(\d{1,2})月(\d{1,2})日").unwrap();
}

pub struct CommerceSource {
    client: HttpClient,
    base_url: String,
    application_id: String,
    affiliate_id: Option<String>,
}

impl CommerceSource {
    pub fn new(client: HttpClient, config: &CommerceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            application_id: config.application_id.clone(),
            affiliate_id: config.affiliate_id.clone().filter(|id| !id.trim().is_empty()),
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "commerce",
            name: "Commerce Catalog",
            description: "Retail book catalog with affiliate links, keyword and ISBN search",
            base_url: "https://app.rakuten.co.jp/services/api/BooksBook/Search/20170404",
            data_source: DataSource::Commerce,
            supports_keyword_search: true,
            requires_api_key: true,
        }
    }

    async fn fetch(&self, field: &str, value: &str) -> Result<Vec<BookRecord>, SourceError> {
        let mut params = vec![
            ("applicationId", self.application_id.as_str()),
            ("format", "json"),
            ("formatVersion", "2"),
            (field, value),
        ];
        if let Some(affiliate_id) = &self.affiliate_id {
            params.push(("affiliateId", affiliate_id.as_str()));
        }

        let body = self.client.get_ok_body(&self.base_url, &params).await?;
        parse_search_response(&body)
    }
}

#[async_trait]
impl BookProvider for CommerceSource {
    async fn search_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, SourceError> {
        self.fetch("isbn", isbn).await
    }

    async fn search_by_query(&self, query: &str) -> Result<Vec<BookRecord>, SourceError> {
        self.fetch("title", query).await
    }

    fn name(&self) -> &'static str {
        "commerce"
    }

    fn data_source(&self) -> DataSource {
        DataSource::Commerce
    }
}

/// Parse a commerce search response body
///
/// Only a body that is not JSON at all is an error; malformed items are
/// skipped individually.
pub fn parse_search_response(json: &str) -> Result<Vec<BookRecord>, SourceError> {
    let response: Value = serde_json::from_str(json)
        .map_err(|e| SourceError::Parse(format!("Invalid commerce JSON: {}", e)))?;

    Ok(response
        .get("Items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(normalize_item).collect())
        .unwrap_or_default())
}

/// Normalize one commerce item into a `BookRecord`
pub fn normalize_item(item: &Value) -> Option<BookRecord> {
    let item = item.get("Item").unwrap_or(item);
    if !item.is_object() {
        return None;
    }

    let title = str_field(item, "title");
    let author = str_field(item, "author").and_then(|a| join_names(a.split('/')));
    let isbn = str_field(item, "isbn").map(|i| normalize_isbn(&i));

    if title.is_none() && author.is_none() && isbn.is_none() {
        return None;
    }

    let affiliate_url = str_field(item, "affiliateUrl").or_else(|| str_field(item, "itemUrl"));

    Some(
        BookRecord::new(title, author, DataSource::Commerce)
            .with_isbn(isbn)
            .with_publisher(str_field(item, "publisherName"))
            .with_published_date(str_field(item, "salesDate").and_then(|d| parse_sales_date(&d)))
            .with_page_count(str_field(item, "size").and_then(|s| parse_page_count(&s)))
            .with_description(str_field(item, "itemCaption"))
            .with_cover_image_url(str_field(item, "largeImageUrl"))
            .with_affiliate_url(affiliate_url),
    )
}

/// Extract the page count from a free-text size field such as `"B6 256p"`
pub fn parse_page_count(size: &str) -> Option<u32> {
    PAGE_COUNT
        .captures(size)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|n| *n > 0)
}

/// Convert `YYYY年M月D日` into `YYYY-MM-DD`
///
/// Month-only or approximate dates (`"2002年06月"`, `"2002年06月上旬"`)
/// do not match and yield `None`.
pub fn parse_sales_date(date: &str) -> Option<String> {
    let caps = SALES_DATE.captures(date)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;

    chrono::NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}
