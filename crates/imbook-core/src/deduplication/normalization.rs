//! Text normalization for deduplication comparison and cache keys

use unicode_normalization::UnicodeNormalization;

/// Normalize a title for comparison
///
/// - NFKC folds full-width and compatibility forms
/// - Converts to lowercase
/// - Collapses whitespace
pub fn normalize_title(title: &str) -> String {
    fold(title)
}

/// Normalize a (possibly comma-joined) author string for comparison
pub fn normalize_author(author: &str) -> String {
    fold(author)
}

/// Cache key form of a keyword query: lower-cased, whitespace collapsed
pub fn normalize_query(query: &str) -> String {
    collapse_whitespace(&query.to_lowercase())
}

fn fold(s: &str) -> String {
    let folded: String = s.nfkc().collect();
    collapse_whitespace(&folded.to_lowercase())
}

/// Collapse runs of whitespace into a single space and trim the ends
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_case() {
        assert_eq!(normalize_title("Kitchen"), normalize_title("kitchen"));
        assert_eq!(normalize_title("  The   Lake "), "the lake");
    }

    #[test]
    fn test_normalize_title_full_width() {
        assert_eq!(normalize_title("ＫＩＴＣＨＥＮ"), "kitchen");
        assert_eq!(normalize_title("キッチン"), "キッチン");
    }

    #[test]
    fn test_normalize_author() {
        assert_eq!(normalize_author("Banana  YOSHIMOTO"), "banana yoshimoto");
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Kitchen\t Banana "), "kitchen banana");
        assert_eq!(normalize_query(""), "");
    }
}
