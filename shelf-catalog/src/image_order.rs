//! Numeric ordering of album images.
//!
//! Album images are exported as `001.jpg`, `002.jpg`, ... in the order given by
//! a number recovered from each source filename. There is deliberately no
//! alphabetical fallback: a filename with no recoverable number is an error
//! and the caller drops that image.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Number in ASCII or full-width parentheses, anywhere in the name.
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[（(]([0-9]+)[)）]").expect("static regex"));
static ALL_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static regex"));
static FIRST_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortKeyError {
    #[error("Unrecognized image filename format: {0}")]
    Unrecognized(String),
    #[error("Image number out of range in {0}")]
    Overflow(String),
}

/// Recover the ordering number from an image filename.
///
/// Priority: `(N)` anywhere in the name, then a stem made only of digits,
/// then the first run of digits in the stem.
///
/// ```
/// use shelf_catalog::image_order::image_sort_key;
///
/// assert_eq!(image_sort_key("IMG(7).png"), Ok(7));
/// assert_eq!(image_sort_key("12.png"), Ok(12));
/// assert_eq!(image_sort_key("DSC00045.png"), Ok(45));
/// assert!(image_sort_key("cover.png").is_err());
/// ```
pub fn image_sort_key(filename: &str) -> Result<u64, SortKeyError> {
    if let Some(caps) = PARENTHESIZED.captures(filename) {
        return parse(&caps[1], filename);
    }

    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    if ALL_DIGITS.is_match(stem) {
        return parse(stem, filename);
    }
    if let Some(m) = FIRST_DIGITS.find(stem) {
        return parse(m.as_str(), filename);
    }
    Err(SortKeyError::Unrecognized(filename.to_string()))
}

fn parse(digits: &str, filename: &str) -> Result<u64, SortKeyError> {
    digits
        .parse()
        .map_err(|_| SortKeyError::Overflow(filename.to_string()))
}

/// Order `(filename, item)` pairs by sort key, ties broken by filename.
///
/// Returns the ordered survivors and the names that had no usable key.
pub fn order_by_sort_key<T>(items: Vec<(String, T)>) -> (Vec<(u64, String, T)>, Vec<(String, SortKeyError)>) {
    let mut ordered = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for (name, item) in items {
        match image_sort_key(&name) {
            Ok(key) => ordered.push((key, name, item)),
            Err(e) => rejected.push((name, e)),
        }
    }
    ordered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    (ordered, rejected)
}
