use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::MaterializeError;

/// Literal prefix substitution applied to recorded media paths, e.g. a
/// desktop mount rewritten to the media server's mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRewrite {
    pub from: String,
    pub to: String,
}

impl PathRewrite {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Replace a leading `from` with `to`. Paths without the prefix, and every
    /// path when `from` is empty, pass through unchanged.
    pub fn apply(&self, path: &str) -> String {
        match path.strip_prefix(self.from.as_str()) {
            Some(rest) if !self.from.is_empty() => format!("{}{}", self.to, rest),
            _ => path.to_string(),
        }
    }
}

/// Canonical composed form for names that end up on disk.
pub fn nfc(s: &str) -> String {
    s.nfc().collect()
}

/// Join non-empty components with `" - "` and make the result safe as a
/// single path component.
pub fn dir_name(components: &[&str]) -> String {
    let joined = components
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" - ");
    sanitize(&joined)
}

/// Replace path separators so a name cannot escape its directory.
pub fn sanitize(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Base name for an entity's files: `code`, else `title`.
pub fn base_name(code: &str, title: &str) -> Result<String, MaterializeError> {
    [code, title]
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(sanitize)
        .ok_or_else(|| MaterializeError::invalid_record("record has neither code nor title"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_is_prefix_only() {
        let rw = PathRewrite::new("/Volumes/Media/", "/mnt/nas/");
        assert_eq!(rw.apply("/Volumes/Media/a/b.mp4"), "/mnt/nas/a/b.mp4");
        assert_eq!(rw.apply("/other/Volumes/Media/x"), "/other/Volumes/Media/x");
        assert_eq!(PathRewrite::new("", "/x").apply("/a"), "/a");
    }

    #[test]
    fn dir_names_drop_empty_parts() {
        assert_eq!(dir_name(&["BB-001", "Demo"]), "BB-001 - Demo");
        assert_eq!(dir_name(&["", "Demo"]), "Demo");
        assert_eq!(dir_name(&["Mai", "A/B", ""]), "Mai - A_B");
    }

    #[test]
    fn base_name_prefers_code() {
        assert_eq!(base_name("BB-001", "Demo").unwrap(), "BB-001");
        assert_eq!(base_name(" ", "Demo").unwrap(), "Demo");
        assert!(base_name("", "").is_err());
    }

    #[test]
    fn nfc_composes() {
        assert_eq!(nfc("e\u{0301}"), "\u{00e9}");
    }
}
