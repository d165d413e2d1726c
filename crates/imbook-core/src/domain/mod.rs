//! Domain models for imbook
//!
//! [`BookRecord`] is the single canonical shape every provider response is
//! normalized into before deduplication, caching and selection.

pub mod book_record;

pub use book_record::{BookRecord, DataSource, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
