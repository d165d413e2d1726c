//! Deduplication of book records gathered from several providers
//!
//! Identity is ISBN-first: two records with ISBNs are the same book when the
//! ISBNs agree. Records without an ISBN fall back to a case-insensitive
//! title + author comparison. Earlier records always win.

mod normalization;
mod orchestration;

pub use normalization::{normalize_author, normalize_query, normalize_title};
pub use orchestration::{deduplicate, deduplicate_lists, is_duplicate, DedupKey};
