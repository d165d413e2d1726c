//! imbook-core: book metadata resolution across heterogeneous catalogs
//!
//! This library provides:
//! - Provider adapters for a commerce catalog, a national bibliographic
//!   registry (ONIX) and a generic volume index
//! - Normalization of each provider's schema into one `BookRecord`
//! - Priority-ordered resolution with short-circuiting and per-provider timeouts
//! - ISBN-first deduplication and best-record selection
//! - A bounded TTL result cache and a persisted recent-query history
//!
//! The entry points are [`BookResolver`] for sequential lookups and
//! [`SearchAggregator`] for concurrent breadth search.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod deduplication;
pub mod domain;
pub mod error;
pub mod http;
pub mod identifiers;
pub mod resolver;
pub mod selection;
pub mod sources;

// Re-export main types for convenience
pub use aggregator::SearchAggregator;
pub use cache::{CacheKey, CacheStats, QueryHistory, ResultCache};
pub use config::{
    CacheConfig, CommerceConfig, GenericIndexConfig, HistoryConfig, RegistryConfig, ResolverConfig,
};
pub use deduplication::{deduplicate, deduplicate_lists, is_duplicate, DedupKey};
pub use domain::{BookRecord, DataSource, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
pub use error::{ConfigError, HistoryError, ResolveError, Result};
pub use identifiers::{is_valid_isbn, normalize_isbn, parse_isbn};
pub use resolver::{BookResolver, BookResolverBuilder};
pub use selection::{completeness_score, into_best, select_best};
pub use sources::{BookProvider, SourceError, SourceMetadata};
