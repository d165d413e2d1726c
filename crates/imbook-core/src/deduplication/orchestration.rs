//! Record list deduplication
//!
//! Merges provider-ordered record lists into one first-seen-order list.
//! Later duplicates are dropped whole, never merged field by field.

use std::collections::HashSet;

use super::normalization::{normalize_author, normalize_title};
use crate::domain::BookRecord;
use crate::identifiers::isbn_identity;

/// Identity of a record for deduplication
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// Normalized ISBN (ISBN-13 form when derivable)
    Isbn(String),
    /// Normalized title and author, used only when the record has no ISBN
    TitleAuthor(String, String),
}

impl DedupKey {
    pub fn for_record(record: &BookRecord) -> Self {
        match record.isbn.as_deref().map(isbn_identity).filter(|i| !i.is_empty()) {
            Some(isbn) => DedupKey::Isbn(isbn),
            None => DedupKey::TitleAuthor(
                normalize_title(&record.title),
                normalize_author(&record.author),
            ),
        }
    }
}

/// Check if two records represent the same book
///
/// A record with an ISBN never duplicates one without.
pub fn is_duplicate(a: &BookRecord, b: &BookRecord) -> bool {
    DedupKey::for_record(a) == DedupKey::for_record(b)
}

/// Drop later duplicates from a single ordered list
pub fn deduplicate<I>(records: I) -> Vec<BookRecord>
where
    I: IntoIterator<Item = BookRecord>,
{
    let mut seen: HashSet<DedupKey> = HashSet::new();
    let mut unique = Vec::new();

    for record in records {
        if seen.insert(DedupKey::for_record(&record)) {
            unique.push(record);
        } else {
            tracing::trace!(title = %record.title, source = %record.data_source, "dropping duplicate record");
        }
    }

    unique
}

/// Concatenate lists in priority order, then deduplicate
pub fn deduplicate_lists<I>(lists: I) -> Vec<BookRecord>
where
    I: IntoIterator<Item = Vec<BookRecord>>,
{
    deduplicate(lists.into_iter().flatten())
}
