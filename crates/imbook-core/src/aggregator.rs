//! Concurrent breadth search
//!
//! Unlike [`BookResolver`], which stops at the first sufficient provider,
//! the aggregator always asks both the resolver and the generic index and
//! merges what comes back. Useful for interactive search where recall
//! matters more than request count.
//!
//! When the aggregator's index is the resolver's own, the resolver side
//! stops before its generic-index fallback so the index is asked once.

use std::sync::Arc;

use crate::deduplication::deduplicate_lists;
use crate::domain::BookRecord;
use crate::identifiers::parse_isbn;
use crate::resolver::{call_provider, BookResolver, IndexFallback, Lookup};
use crate::sources::BookProvider;

pub struct SearchAggregator {
    resolver: Arc<BookResolver>,
    index: Arc<dyn BookProvider>,
    fallback: IndexFallback,
}

impl SearchAggregator {
    /// Aggregate over the resolver and its own generic index
    pub fn new(resolver: Arc<BookResolver>) -> Self {
        let index = resolver.generic_index().clone();
        Self::with_index(resolver, index)
    }

    /// Aggregate over the resolver and a separately supplied index
    pub fn with_index(resolver: Arc<BookResolver>, index: Arc<dyn BookProvider>) -> Self {
        let fallback = if Arc::ptr_eq(&index, resolver.generic_index()) {
            IndexFallback::Skip
        } else {
            IndexFallback::Include
        };
        Self { resolver, index, fallback }
    }

    /// Search both sides concurrently and deduplicate, resolver results first
    ///
    /// Text that parses as an ISBN takes the ISBN path on both sides.
    pub async fn search(&self, text: &str) -> Vec<BookRecord> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let timeout = self.resolver.timeout();

        let (primary, secondary) = match parse_isbn(text) {
            Some(isbn) => {
                tracing::debug!(isbn = %isbn, "aggregating isbn lookup");
                tokio::join!(
                    async { self.resolver
                        .search_by_isbn_with(&isbn, self.fallback)
                        .await
                        .unwrap_or_default() },
                    call_provider(self.index.as_ref(), Lookup::Isbn(&isbn), timeout),
                )
            }
            None => {
                tracing::debug!(query = text, "aggregating keyword search");
                tokio::join!(
                    self.resolver.search_by_query_with(text, self.fallback),
                    call_provider(self.index.as_ref(), Lookup::Keyword(text), timeout),
                )
            }
        };

        let merged = deduplicate_lists([primary, secondary]);
        tracing::info!(count = merged.len(), "aggregated search complete");
        merged
    }
}
