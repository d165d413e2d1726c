//! Field extractors for registry entries
//!
//! Each function reads one field from either the flattened `summary` view or
//! the nested ONIX tree and returns `None` when the path is missing or the
//! value is unusable. The normalizer composes them summary-first.

use serde_json::Value;

use crate::identifiers::normalize_isbn;
use crate::sources::fields::{iso_partial_date, join_names, str_field, value_as_u32};

/// ONIX list 163: publication date, date of first publication
const PUBLICATION_DATE_ROLES: [&str; 2] = ["01", "11"];
/// ONIX list 23: content page count, main content page count
const PAGE_COUNT_EXTENT_TYPES: [&str; 2] = ["11", "00"];
/// ONIX list 153
const TEXT_TYPE_DESCRIPTION: &str = "03";
const TEXT_TYPE_TABLE_OF_CONTENTS: &str = "04";
/// ONIX list 158
const RESOURCE_FRONT_COVER: &str = "01";
/// ONIX list 5
const PRODUCT_ID_ISBN_13: &str = "15";

// === summary view ===

pub fn summary_title(summary: &Value) -> Option<String> {
    str_field(summary, "title")
}

pub fn summary_author(summary: &Value) -> Option<String> {
    str_field(summary, "author")
}

pub fn summary_publisher(summary: &Value) -> Option<String> {
    str_field(summary, "publisher")
}

pub fn summary_published_date(summary: &Value) -> Option<String> {
    str_field(summary, "pubdate").and_then(|d| iso_partial_date(&d))
}

pub fn summary_cover(summary: &Value) -> Option<String> {
    str_field(summary, "cover")
}

pub fn summary_isbn(summary: &Value) -> Option<String> {
    str_field(summary, "isbn").map(|i| normalize_isbn(&i))
}

// === nested ONIX ===

pub fn onix_title(onix: &Value) -> Option<String> {
    let title_detail = first_or_self(path(onix, &["DescriptiveDetail", "TitleDetail"])?)?;
    let element = first_or_self(title_detail.get("TitleElement")?)?;
    text_content(element.get("TitleText")?)
}

pub fn onix_author(onix: &Value) -> Option<String> {
    let contributors = path(onix, &["DescriptiveDetail"])?;
    join_names(
        each_or_self(contributors, "Contributor")
            .filter_map(|c| c.get("PersonName"))
            .filter_map(text_content),
    )
}

pub fn onix_publisher(onix: &Value) -> Option<String> {
    path(onix, &["PublishingDetail", "Imprint", "ImprintName"])
        .and_then(text_content)
        .or_else(|| {
            path(onix, &["PublishingDetail", "Publisher", "PublisherName"]).and_then(text_content)
        })
}

pub fn onix_published_date(onix: &Value) -> Option<String> {
    let detail = path(onix, &["PublishingDetail"])?;
    each_or_self(detail, "PublishingDate")
        .find(|entry| has_code(entry, "PublishingDateRole", &PUBLICATION_DATE_ROLES))
        .and_then(|entry| entry.get("Date"))
        .and_then(text_content)
        .and_then(|d| iso_partial_date(&d))
}

pub fn onix_page_count(onix: &Value) -> Option<u32> {
    let detail = path(onix, &["DescriptiveDetail"])?;
    each_or_self(detail, "Extent")
        .find(|extent| has_code(extent, "ExtentType", &PAGE_COUNT_EXTENT_TYPES))
        .and_then(|extent| extent.get("ExtentValue"))
        .and_then(value_as_u32)
}

pub fn onix_description(onix: &Value) -> Option<String> {
    text_content_of_type(onix, TEXT_TYPE_DESCRIPTION)
        .or_else(|| text_content_of_type(onix, TEXT_TYPE_TABLE_OF_CONTENTS))
}

pub fn onix_cover(onix: &Value) -> Option<String> {
    let detail = path(onix, &["CollateralDetail"])?;
    each_or_self(detail, "SupportingResource")
        .find(|resource| has_code(resource, "ResourceContentType", &[RESOURCE_FRONT_COVER]))
        .and_then(|resource| first_or_self(resource.get("ResourceVersion")?))
        .and_then(|version| str_field(version, "ResourceLink"))
}

pub fn onix_isbn(onix: &Value) -> Option<String> {
    let from_identifier = || {
        each_or_self(onix, "ProductIdentifier")
            .find(|id| has_code(id, "ProductIDType", &[PRODUCT_ID_ISBN_13]))
            .and_then(|id| str_field(id, "IDValue"))
    };

    str_field(onix, "RecordReference")
        .or_else(from_identifier)
        .map(|i| normalize_isbn(&i))
}

// === helpers ===

fn text_content_of_type(onix: &Value, text_type: &str) -> Option<String> {
    let detail = path(onix, &["CollateralDetail"])?;
    each_or_self(detail, "TextContent")
        .find(|content| has_code(content, "TextType", &[text_type]))
        .and_then(|content| content.get("Text"))
        .and_then(text_content)
}

fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(key))
}

/// ONIX composites appear both as single objects and as lists
fn first_or_self(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        Value::Null => None,
        other => Some(other),
    }
}

/// Every occurrence of a repeatable composite, whether listed or single
fn each_or_self<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    let items: &'a [Value] = match value.get(key) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => &[],
        Some(other) => std::slice::from_ref(other),
    };
    items.iter()
}

/// Text nodes are either bare strings or `{"content": ..., "collationkey": ...}`
fn text_content(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Object(_) => value.get("content")?.as_str()?,
        _ => return None,
    };
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn has_code(value: &Value, key: &str, codes: &[&str]) -> bool {
    match value.get(key) {
        Some(Value::String(code)) => codes.contains(&code.as_str()),
        // Some registries wrap single codes in a list
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|code| codes.contains(&code)),
        _ => false,
    }
}
