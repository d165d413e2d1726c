//! Identifier handling
//!
//! Books are keyed by ISBN. This module owns separator stripping, the lookup
//! validation pattern and the ISBN-10 to ISBN-13 widening used when
//! comparing identifiers from different providers.

pub mod validators;

pub use validators::{is_valid_isbn, isbn10_to_isbn13, isbn_identity, normalize_isbn, parse_isbn};
