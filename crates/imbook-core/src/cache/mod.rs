//! Caching of resolved results and the recent-query history
//!
//! The result cache is process-local and bounded by TTL, entry count and
//! aggregate size. The history is small, persisted to disk and outlives the
//! process.

pub mod history;
pub mod result_cache;

pub use history::QueryHistory;
pub use result_cache::{CacheKey, CacheStats, ResultCache};
