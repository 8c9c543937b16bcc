//! Typed views over metadata records.
//!
//! A [`Record`](crate::Record) is an open field bag; the structs here are the
//! read-only, per-kind shapes the materializer consumes. Unknown keys land in
//! each view's `extra` map so nothing is dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CatalogError;

// ── Media kind ──────────────────────────────────────────────────────────────

/// The three kinds of entity the library knows how to curate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Album,
    Model,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Video, MediaKind::Album, MediaKind::Model];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Album => "album",
            MediaKind::Model => "model",
        }
    }

    /// Root element name of the sidecar document for this kind.
    pub fn sidecar_root(&self) -> &'static str {
        match self {
            MediaKind::Video => "movie",
            MediaKind::Album => "photoalbum",
            MediaKind::Model => "person",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" | "videos" => Ok(MediaKind::Video),
            "album" | "albums" => Ok(MediaKind::Album),
            "model" | "models" => Ok(MediaKind::Model),
            other => Err(CatalogError::UnsupportedKind(other.to_string())),
        }
    }
}

// ── Video ───────────────────────────────────────────────────────────────────

/// A single video asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    /// Stable external identifier (e.g. `BB-001`); may be empty until assigned.
    #[serde(deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    pub keywords: Vec<String>,
    pub studio: Vec<String>,
    /// Performers, in credit order.
    pub model: Vec<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub poster: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub series: String,
    /// Primary media file. Required for materialization.
    #[serde(deserialize_with = "lenient_string")]
    pub path: String,
    /// Optional sidecar fields (`tagline`, `runtime`, `year`, ...) and anything else.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ── Album ───────────────────────────────────────────────────────────────────

/// A photo album: a directory of images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    pub keywords: Vec<String>,
    pub studio: Vec<String>,
    pub model: Vec<String>,
    /// Either a path or, in legacy stores, the `imgs` key of the cover image.
    #[serde(deserialize_with = "lenient_opt_string")]
    pub poster: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub path: String,
    /// Source filename → image reference. Order is recomputed at materialization.
    pub imgs: BTreeMap<String, ImageRef>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One image belonging to an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawImageRef")]
pub struct ImageRef {
    pub path: String,
    #[serde(default)]
    pub is_poster: bool,
}

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_poster: false,
        }
    }

    pub fn poster(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_poster: true,
        }
    }
}

/// Stores written by older tooling map filenames straight to a path string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawImageRef {
    Path(String),
    Full {
        path: String,
        #[serde(default)]
        is_poster: bool,
    },
}

impl From<RawImageRef> for ImageRef {
    fn from(raw: RawImageRef) -> Self {
        match raw {
            RawImageRef::Path(path) => ImageRef::new(path),
            RawImageRef::Full { path, is_poster } => ImageRef { path, is_poster },
        }
    }
}

// ── Model ───────────────────────────────────────────────────────────────────

/// A performer profile. Only a handful of fields are known; everything else
/// (age, figure, scores, free text, nested data) passes through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    pub real_name: Vec<String>,
    pub studio: Vec<String>,
    #[serde(rename = "ID", deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "SNS")]
    pub sns: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub comments: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub poster: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub poster_url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, ExtraValue>,
}

impl ModelRecord {
    /// Where the cover should come from: `poster_url` wins over `poster`.
    pub fn cover_source(&self) -> Option<&str> {
        self.poster_url.as_deref().or(self.poster.as_deref())
    }
}

/// A pass-through attribute on a model record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Text(String),
    Number(serde_json::Number),
    List(Vec<String>),
    Map(Map<String, Value>),
    /// Booleans, nulls and mixed lists.
    Other(Value),
}

impl ExtraValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtraValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Integer reading of the value, accepting numeric text such as `"23"`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ExtraValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            ExtraValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

// ── Lenient field readers ───────────────────────────────────────────────────

/// Accept strings, numbers and null for a string field.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

/// Like [`lenient_string`], but an empty string reads as `None`.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    Ok(if s.trim().is_empty() { None } else { Some(s) })
}
