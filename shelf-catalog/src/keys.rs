//! Identity keys for records.
//!
//! Two schemes coexist:
//!
//! - the **display key** `"{model}-{title}"`, used as the store's map key so
//!   the JSON stays easy to browse and hand-edit;
//! - the **normalized title**, used only to match the same logical title
//!   across stores that format it differently.
//!
//! ```
//! use shelf_catalog::keys::{display_models, normalize_title};
//!
//! assert_eq!(display_models(&[]), "Unknown");
//! assert_eq!(display_models(&["A".into(), "B".into()]), "A, B");
//! assert_eq!(normalize_title("Rope  Work＃3"), "rope work #3");
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::record::Record;
use crate::types::MediaKind;

/// Placeholder used when a record credits no performer.
pub const UNKNOWN_MODEL: &str = "Unknown";

static HASH_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*#\s*").expect("static regex"));
static HYPHEN_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*").expect("static regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

// ── Display key ─────────────────────────────────────────────────────────────

/// Render a performer list the way it appears in keys and directory names.
pub fn display_models(models: &[String]) -> String {
    match models {
        [] => UNKNOWN_MODEL.to_string(),
        [only] => only.clone(),
        many => many.join(", "),
    }
}

/// The store key for a record. Model records are keyed by `name`; videos and
/// albums by `"{model}-{title}"`. Not globally unique: see
/// [`RecordStore::insert`](crate::store::RecordStore::insert).
pub fn display_key(record: &Record, kind: MediaKind) -> String {
    match kind {
        MediaKind::Model => record.get_str("name").to_string(),
        MediaKind::Video | MediaKind::Album => format!(
            "{}-{}",
            display_models(&record.get_list("model")),
            record.get_str("title")
        ),
    }
}

// ── Fuzzy normalization ─────────────────────────────────────────────────────

/// Normalize a title so differently formatted spellings compare equal.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.nfkd().collect::<String>().to_lowercase();

    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => cleaned.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => cleaned.push('"'),
            c if is_invisible_control(c) => {}
            c => cleaned.push(c),
        }
    }

    let spaced = HASH_SPACING.replace_all(&cleaned, " #");
    let spaced = HYPHEN_SPACING.replace_all(&spaced, " - ");
    let collapsed = WHITESPACE_RUN.replace_all(&spaced, " ");
    collapsed.trim().to_string()
}

/// Bidirectional formatting and zero-width characters.
fn is_invisible_control(c: char) -> bool {
    matches!(
        c,
        '\u{061C}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{2069}'
            | '\u{FEFF}'
    )
}

/// The part of a normalized key before its trailing `#...` suffix, or the
/// whole key when there is none.
pub fn fallback_prefix(normalized: &str) -> &str {
    match normalized.rfind('#') {
        Some(pos) => normalized[..pos].trim_end(),
        None => normalized,
    }
}

// ── Matching ────────────────────────────────────────────────────────────────

/// How an incoming record was matched to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Equal non-empty `code`.
    Code,
    /// Identical store key.
    Exact,
    /// Equal normalized titles.
    Normalized,
    /// Prefix before `#` found inside a candidate key.
    Fallback,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMethod::Code => write!(f, "code"),
            MatchMethod::Exact => write!(f, "exact key"),
            MatchMethod::Normalized => write!(f, "normalized key"),
            MatchMethod::Fallback => write!(f, "prefix fallback"),
        }
    }
}

/// Normalized lookup over a set of candidate keys.
///
/// Candidates are kept in lexicographic order of their original key; when
/// several candidates qualify, the first in that order wins.
#[derive(Debug)]
pub struct FuzzyIndex<'a> {
    entries: Vec<(&'a str, String)>,
}

impl<'a> FuzzyIndex<'a> {
    pub fn new(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries: Vec<_> = keys.into_iter().map(|k| (k, normalize_title(k))).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Self { entries }
    }

    /// Find the candidate for `key`: normalized equality first, then the
    /// prefix fallback.
    pub fn find(&self, key: &str) -> Option<(&'a str, MatchMethod)> {
        let normalized = normalize_title(key);
        if let Some((candidate, _)) = self.entries.iter().find(|(_, n)| *n == normalized) {
            return Some((*candidate, MatchMethod::Normalized));
        }

        let prefix = fallback_prefix(&normalized);
        if prefix.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(_, n)| n.contains(prefix))
            .map(|(candidate, _)| (*candidate, MatchMethod::Fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_prefix_strips_suffix() {
        assert_eq!(fallback_prefix("rope work #3"), "rope work");
        assert_eq!(fallback_prefix("rope work"), "rope work");
        assert_eq!(fallback_prefix("#3"), "");
    }

    #[test]
    fn invisible_controls() {
        assert!(is_invisible_control('\u{200B}'));
        assert!(is_invisible_control('\u{202E}'));
        assert!(!is_invisible_control('a'));
    }
}
