//! ISBN normalization and validation

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Accepted lookup shape: optional 978/979 prefix, nine digits, digit or X
    static ref ISBN_PATTERN: Regex = Regex::new(r"^(978|979)?\d{9}[\dX]$").unwrap();
}

/// Strip separators (hyphens, spaces) and upper-case the check character
///
/// No validation is performed; see [`is_valid_isbn`].
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '\u{2010}' | '\u{2011}' | '\u{2212}'))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Check a normalized ISBN against the lookup pattern
pub fn is_valid_isbn(normalized: &str) -> bool {
    ISBN_PATTERN.is_match(normalized)
}

/// Normalize and validate in one step
pub fn parse_isbn(raw: &str) -> Option<String> {
    let normalized = normalize_isbn(raw);
    if is_valid_isbn(&normalized) {
        Some(normalized)
    } else {
        None
    }
}

/// Convert an ISBN-10 to its ISBN-13 form (978 prefix, recomputed check digit)
///
/// Returns `None` if the input is not ten characters of digits with an
/// optional trailing X.
pub fn isbn10_to_isbn13(isbn10: &str) -> Option<String> {
    let normalized = normalize_isbn(isbn10);
    if normalized.len() != 10 || !normalized.is_ascii() {
        return None;
    }
    let body = &normalized[..9];
    let check = normalized.chars().last()?;
    if !body.chars().all(|c| c.is_ascii_digit()) || !(check.is_ascii_digit() || check == 'X') {
        return None;
    }

    let prefixed = format!("978{}", body);
    let sum: u32 = prefixed
        .chars()
        .enumerate()
        .filter_map(|(i, c)| c.to_digit(10).map(|d| if i % 2 == 0 { d } else { d * 3 }))
        .sum();
    let check_digit = (10 - sum % 10) % 10;

    Some(format!("{}{}", prefixed, check_digit))
}

/// Identity key used to compare ISBNs across providers
///
/// Separators are stripped and ISBN-10 values are widened to ISBN-13 so that
/// `4167158051` and `9784167158057` compare equal.
pub fn isbn_identity(isbn: &str) -> String {
    let normalized = normalize_isbn(isbn);
    isbn10_to_isbn13(&normalized).unwrap_or(normalized)
}
