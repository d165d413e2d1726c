//! Canonical book record produced by every provider normalizer

use serde::{Deserialize, Serialize};

/// Placeholder used when a provider returns no title
pub const UNKNOWN_TITLE: &str = "unknown title";

/// Placeholder used when a provider returns no author
pub const UNKNOWN_AUTHOR: &str = "unknown author";

/// Provenance of a book record
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DataSource {
    Commerce,
    Registry,
    GenericIndex,
    Manual,
}

impl DataSource {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Commerce => "commerce",
            DataSource::Registry => "registry",
            DataSource::GenericIndex => "genericIndex",
            DataSource::Manual => "manual",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bibliographic metadata for one physical book
///
/// `title` and `author` are never empty: records built through
/// [`BookRecord::new`] substitute [`UNKNOWN_TITLE`] / [`UNKNOWN_AUTHOR`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub data_source: DataSource,
    pub affiliate_url: Option<String>,
}

impl BookRecord {
    /// Create a record with the required fields, substituting placeholders
    /// for blank title or author
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        data_source: DataSource,
    ) -> Self {
        Self {
            isbn: None,
            title: non_blank(title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: non_blank(author).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            publisher: None,
            published_date: None,
            page_count: None,
            description: None,
            cover_image_url: None,
            data_source,
            affiliate_url: None,
        }
    }

    pub fn with_isbn(mut self, isbn: Option<String>) -> Self {
        self.isbn = non_blank(isbn);
        self
    }

    pub fn with_publisher(mut self, publisher: Option<String>) -> Self {
        self.publisher = non_blank(publisher);
        self
    }

    pub fn with_published_date(mut self, date: Option<String>) -> Self {
        self.published_date = non_blank(date);
        self
    }

    pub fn with_page_count(mut self, pages: Option<u32>) -> Self {
        self.page_count = pages;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_blank(description);
        self
    }

    pub fn with_cover_image_url(mut self, url: Option<String>) -> Self {
        self.cover_image_url = non_blank(url);
        self
    }

    pub fn with_affiliate_url(mut self, url: Option<String>) -> Self {
        self.affiliate_url = non_blank(url);
        self
    }

    /// True when the title is the placeholder value
    pub fn has_unknown_title(&self) -> bool {
        self.title == UNKNOWN_TITLE
    }

    /// True when the author is the placeholder value
    pub fn has_unknown_author(&self) -> bool {
        self.author == UNKNOWN_AUTHOR
    }
}

/// Trim a provider string, mapping blank values to `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_for_missing_fields() {
        let record = BookRecord::new(None, Some("   ".to_string()), DataSource::Registry);
        assert_eq!(record.title, UNKNOWN_TITLE);
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert!(record.has_unknown_title());
        assert!(record.has_unknown_author());
    }

    #[test]
    fn test_blank_optionals_are_dropped() {
        let record = BookRecord::new(Some("Kitchen".into()), Some("Banana Yoshimoto".into()), DataSource::Manual)
            .with_publisher(Some("".into()))
            .with_description(Some("  A novella.  ".into()));
        assert_eq!(record.publisher, None);
        assert_eq!(record.description.as_deref(), Some("A novella."));
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = BookRecord::new(Some("Kitchen".into()), None, DataSource::GenericIndex)
            .with_cover_image_url(Some("https://example.com/c.jpg".into()));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dataSource"], "genericIndex");
        assert_eq!(json["coverImageUrl"], "https://example.com/c.jpg");
        assert!(json["publishedDate"].is_null());
    }

    #[test]
    fn test_data_source_as_str() {
        assert_eq!(DataSource::Commerce.as_str(), "commerce");
        assert_eq!(DataSource::GenericIndex.to_string(), "genericIndex");
    }
}
