//! Pulling record fields out of fetched HTML.
//!
//! The pages this tool reads are plain server-rendered listings and detail
//! pages, so extraction is regex-level: `<meta>` tags, anchors, labelled
//! fields and `<div>` blocks located by class. Records produced here carry
//! only the fields a page actually yielded, so merging them into an existing
//! store never blanks a field the page did not have.

use std::collections::HashMap;
use std::sync::LazyLock;

use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use regex::Regex;
use reqwest::Url;
use shelf_catalog::{MediaKind, Record};

use crate::error::ScrapeError;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b([^>]*)>").expect("static regex"));
static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("static regex"));
static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*)>").expect("static regex"));
static DIV_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(/?)div\b([^>]*)>").expect("static regex"));
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("static regex")
});
/// A leaf `field-label` div followed by the bare text that carries its value.
static FIELD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*\bclass\s*=\s*["'][^"']*\bfield-label\b[^"']*["'][^>]*>(.*?)</div\s*>\s*([^<]*)"#)
        .expect("static regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

// ── HTML helpers ────────────────────────────────────────────────────────────

/// Attribute name (lowercased) → decoded value for the inside of one tag.
fn attributes(tag_body: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(tag_body)
        .map(|c| {
            let value = c
                .get(2)
                .or_else(|| c.get(3))
                .or_else(|| c.get(4))
                .map_or("", |m| m.as_str());
            (c[1].to_ascii_lowercase(), decode_entities(value))
        })
        .collect()
}

/// Resolve character references. `&nbsp;` becomes a plain space; unknown
/// named entities leave the text as it was.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    unescape_with(raw, |entity| {
        resolve_predefined_entity(entity).or(match entity {
            "nbsp" => Some(" "),
            _ => None,
        })
    })
    .map(|s| s.into_owned())
    .unwrap_or_else(|_| raw.to_string())
}

/// Visible text of an HTML fragment: tags dropped, entities decoded,
/// whitespace collapsed.
pub fn text_content(fragment: &str) -> String {
    let stripped = TAG.replace_all(fragment, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE_RUN.replace_all(&decoded, " ").trim().to_string()
}

fn has_class(attrs: &HashMap<String, String>, class: &str) -> bool {
    attrs
        .get("class")
        .is_some_and(|c| c.split_whitespace().any(|token| token == class))
}

/// Inner HTML of every `<div>` whose class list contains `class`. Nested
/// divs are balanced; a block that never closes runs to the end of the
/// document. Blocks nested inside an earlier match are not reported twice.
pub fn div_blocks<'h>(html: &'h str, class: &str) -> Vec<&'h str> {
    let tags: Vec<(usize, usize, bool, &str)> = DIV_TAG
        .captures_iter(html)
        .filter_map(|c| {
            let whole = c.get(0)?;
            let closing = !c[1].is_empty();
            let body = c.get(2).map_or("", |m| m.as_str());
            Some((whole.start(), whole.end(), closing, body))
        })
        .collect();

    let mut blocks = Vec::new();
    let mut consumed_to = 0;
    for (i, &(start, inner_start, closing, body)) in tags.iter().enumerate() {
        if closing || start < consumed_to || !has_class(&attributes(body), class) {
            continue;
        }
        let mut depth = 0usize;
        let mut inner_end = html.len();
        for &(tag_start, _, tag_closing, _) in &tags[i + 1..] {
            if !tag_closing {
                depth += 1;
            } else if depth == 0 {
                inner_end = tag_start;
                break;
            } else {
                depth -= 1;
            }
        }
        blocks.push(&html[inner_start..inner_end]);
        consumed_to = inner_end;
    }
    blocks
}

/// `(href, text)` for every anchor in document order.
pub fn anchors(html: &str) -> Vec<(String, String)> {
    ANCHOR
        .captures_iter(html)
        .filter_map(|c| {
            let href = attributes(&c[1]).remove("href")?;
            Some((href, text_content(&c[2])))
        })
        .collect()
}

/// Hrefs starting with any of `prefixes`, in document order, duplicates kept.
pub fn extract_links(html: &str, prefixes: &[String]) -> Vec<String> {
    anchors(html)
        .into_iter()
        .map(|(href, _)| href)
        .filter(|href| prefixes.iter().any(|p| href.starts_with(p.as_str())))
        .collect()
}

/// Value of the first `<meta>` whose `attr` equals `name` (case-insensitive).
pub fn meta_content(html: &str, attr: &str, name: &str) -> Option<String> {
    META_TAG.captures_iter(html).find_map(|c| {
        let attrs = attributes(&c[1]);
        let matches = attrs.get(attr).is_some_and(|v| v.eq_ignore_ascii_case(name));
        if matches { attrs.get("content").cloned() } else { None }
    })
}

/// `label → value` for `field-label` divs followed by bare text, with the
/// label's trailing colon kept (`"Age:"`).
pub fn labelled_fields(html: &str) -> Vec<(String, String)> {
    FIELD_LABEL
        .captures_iter(html)
        .map(|c| (text_content(&c[1]), text_content(&c[2])))
        .collect()
}

fn first_img_src(fragment: &str) -> Option<String> {
    IMG_TAG
        .captures_iter(fragment)
        .find_map(|c| attributes(&c[1]).remove("src"))
}

/// Last non-empty path segment of a URL, ignoring any query or fragment.
fn last_segment(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// `src` resolved against the page URL, with any query string removed.
fn absolute_src(page_url: &str, src: &str) -> String {
    let resolved = Url::parse(page_url)
        .and_then(|base| base.join(src))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| src.to_string());
    resolved.split('?').next().unwrap_or(&resolved).to_string()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn set_text(record: &mut Record, key: &str, value: Option<String>) {
    if let Some(v) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        record.set(key, v);
    }
}

fn set_list(record: &mut Record, key: &str, values: Vec<String>) {
    if !values.is_empty() {
        record.set(key, values);
    }
}

// ── Scrapers ────────────────────────────────────────────────────────────────

/// Turns one fetched detail page into a (sparse) record.
pub trait PageScraper {
    fn scrape(&self, url: &str, html: &str, kind: MediaKind) -> Result<Record, ScrapeError>;
}

/// Reads Open Graph / `<meta>` tags for releases and labelled profile fields
/// for models.
#[derive(Debug, Clone)]
pub struct MetaTagScraper {
    /// Class of the block whose anchors name the performers of a release.
    pub model_block_class: String,
    /// Class of the block holding a model's portrait `<img>`.
    pub avatar_block_class: String,
}

impl Default for MetaTagScraper {
    fn default() -> Self {
        Self {
            model_block_class: "field-name-taxonomy-vocabulary-2".to_string(),
            avatar_block_class: "field-name-field-model-avatar".to_string(),
        }
    }
}

impl MetaTagScraper {
    fn scrape_release(&self, url: &str, html: &str) -> Result<Record, ScrapeError> {
        let mut record = Record::new();
        set_text(&mut record, "title", meta_content(html, "property", "og:title"));
        set_text(&mut record, "description", meta_content(html, "name", "description"));

        let keywords = meta_content(html, "name", "keywords")
            .map(|k| {
                k.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        set_list(&mut record, "keywords", keywords);

        let code = meta_content(html, "property", "og:url")
            .map(|u| last_segment(&u).to_uppercase());
        set_text(&mut record, "code", code);

        let mut models: Vec<String> = Vec::new();
        for block in div_blocks(html, &self.model_block_class) {
            for (_, text) in anchors(block) {
                if !text.is_empty() && !models.contains(&text) {
                    models.push(text);
                }
            }
        }
        set_list(&mut record, "model", models);

        let poster = meta_content(html, "property", "og:image").map(|src| absolute_src(url, &src));
        set_text(&mut record, "poster", poster);

        if record.get_str("title").is_empty() && record.get_str("code").is_empty() {
            return Err(ScrapeError::parse(url, "page has neither og:title nor og:url"));
        }
        Ok(record)
    }

    fn scrape_model(&self, url: &str, html: &str) -> Result<Record, ScrapeError> {
        let name = title_case(last_segment(url));
        if name.is_empty() {
            return Err(ScrapeError::parse(url, "model URL has no name segment"));
        }
        let mut record = Record::new().with("name", name);

        for (label, value) in labelled_fields(html) {
            match label.trim_end_matches(':').trim().to_ascii_lowercase().as_str() {
                "age" => set_text(&mut record, "age", Some(value)),
                "figure" => set_text(&mut record, "figure", Some(value)),
                _ => {}
            }
        }

        let portrait = div_blocks(html, &self.avatar_block_class)
            .into_iter()
            .find_map(first_img_src)
            .or_else(|| meta_content(html, "property", "og:image"))
            .map(|src| absolute_src(url, &src));
        set_text(&mut record, "poster_url", portrait);
        set_text(&mut record, "description", meta_content(html, "name", "description"));
        Ok(record)
    }
}

impl PageScraper for MetaTagScraper {
    fn scrape(&self, url: &str, html: &str, kind: MediaKind) -> Result<Record, ScrapeError> {
        match kind {
            MediaKind::Video | MediaKind::Album => self.scrape_release(url, html),
            MediaKind::Model => self.scrape_model(url, html),
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
