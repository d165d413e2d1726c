//! Field-level helpers shared by the normalizers
//!
//! Every helper returns `Option` and never fails: an unparseable value is
//! simply absent from the resulting record.

use chrono::NaiveDate;
use serde_json::Value;

/// Normalize a date string to ISO precision the source allows
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYYMM` and `YYYYMMDD`.
/// Anything else, or an impossible calendar date, yields `None`.
pub(crate) fn iso_partial_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.is_ascii() {
        return None;
    }
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    match raw.len() {
        4 if all_digits(raw) => Some(raw.to_string()),
        6 if all_digits(raw) => year_month(&raw[..4], &raw[4..6]),
        7 if raw.as_bytes()[4] == b'-' && all_digits(&raw[..4]) && all_digits(&raw[5..]) => {
            year_month(&raw[..4], &raw[5..7])
        }
        8 if all_digits(raw) => {
            full_date(&format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8]))
        }
        10 => full_date(raw),
        _ => None,
    }
}

fn year_month(year: &str, month: &str) -> Option<String> {
    let m: u32 = month.parse().ok()?;
    if (1..=12).contains(&m) {
        Some(format!("{}-{:02}", year, m))
    } else {
        None
    }
}

fn full_date(candidate: &str) -> Option<String> {
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Join contributor names with ", ", skipping blanks
pub(crate) fn join_names<I, S>(names: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Rewrite an insecure `http://` URL to `https://`
pub(crate) fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// Read a non-blank string at `key`
pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read a positive integer at `key`, accepting numeric strings too
pub(crate) fn u32_field(value: &Value, key: &str) -> Option<u32> {
    value.get(key).and_then(value_as_u32)
}

pub(crate) fn value_as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n| *n > 0)
}

/// Iterate the elements of the array at `key`, empty if absent or not an array
pub(crate) fn array_field<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}
