//! The open metadata record and its per-kind templates.
//!
//! A record is a string-keyed bag of JSON values. Reconciliation works on the
//! bag directly so unknown keys survive every pass; typed views are derived on
//! demand with [`Record::to_video`], [`Record::to_album`] and
//! [`Record::to_model`].
//!
//! List fields are normalized at every entry point (deserialization,
//! [`Record::from_fields`], [`Record::set`]): a scalar string becomes a
//! one-element list and an empty string or null becomes `[]`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

use crate::error::CatalogError;
use crate::types::{AlbumRecord, MediaKind, ModelRecord, VideoRecord};

/// Fields that are always sequences, whatever the source produced.
pub const LIST_FIELDS: &[&str] = &["keywords", "studio", "model", "real_name", "SNS"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from raw fields, normalizing list fields.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        let mut record = Self::new();
        for (key, value) in fields {
            record.set(key, value);
        }
        record
    }

    /// Build a record from an arbitrary JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        match value {
            Value::Object(map) => Ok(Self::from_fields(map)),
            other => Err(CatalogError::invalid_field(format!(
                "record must be a JSON object, found {other}"
            ))),
        }
    }

    /// Set a field, normalizing it if it is a list field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let value = if LIST_FIELDS.contains(&key.as_str()) {
            normalize_list(value)
        } else {
            value
        };
        self.fields.insert(key, value);
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String field, or `""` when absent or not a string.
    pub fn get_str(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// List field as strings, skipping non-string items.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_video(&self) -> Result<VideoRecord, CatalogError> {
        self.typed("video")
    }

    pub fn to_album(&self) -> Result<AlbumRecord, CatalogError> {
        self.typed("album")
    }

    pub fn to_model(&self) -> Result<ModelRecord, CatalogError> {
        self.typed("model")
    }

    fn typed<T: serde::de::DeserializeOwned>(&self, what: &str) -> Result<T, CatalogError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| CatalogError::invalid_field(format!("not a valid {what} record: {e}")))
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Record::from_fields(fields))
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Record::from_fields(fields)
    }
}

fn normalize_list(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Null => Value::Array(Vec::new()),
        Value::String(s) if s.trim().is_empty() => Value::Array(Vec::new()),
        Value::String(s) => Value::Array(vec![Value::String(s)]),
        Value::Number(n) => Value::Array(vec![Value::String(n.to_string())]),
        other => other,
    }
}

// ── Templates ───────────────────────────────────────────────────────────────

fn template(kind: MediaKind) -> Value {
    match kind {
        MediaKind::Video => json!({
            "title": "",
            "description": "",
            "keywords": [],
            "studio": [],
            "code": "",
            "series": "",
            "model": [],
            "poster": "",
            "path": "",
        }),
        MediaKind::Album => json!({
            "title": "",
            "description": "",
            "keywords": [],
            "code": "",
            "model": [],
            "studio": [],
            "path": "",
            "poster": "",
            "imgs": {},
        }),
        MediaKind::Model => json!({
            "name": "",
            "real_name": [],
            "studio": [],
            "ID": "",
            "SNS": [],
            "description": "",
            "comments": "",
            "beauty_score": 0,
            "figure_score": 0,
            "leg_score": 0,
        }),
    }
}

/// A fresh record holding the kind's template. Every call builds a new value,
/// so callers never share mutable defaults.
pub fn new_record(kind: MediaKind) -> Record {
    match template(kind) {
        Value::Object(map) => Record::from_fields(map),
        _ => Record::new(),
    }
}

/// Names of the template fields for a kind.
pub fn template_fields(kind: MediaKind) -> Vec<String> {
    new_record(kind).into_fields().into_iter().map(|(k, _)| k).collect()
}

/// Advisory completeness check: every template field is present and truthy.
pub fn is_complete(record: &Record, kind: MediaKind) -> bool {
    missing_fields(record, kind).is_empty()
}

/// Template fields that are absent or falsy, in key order.
pub fn missing_fields(record: &Record, kind: MediaKind) -> Vec<String> {
    template_fields(kind)
        .into_iter()
        .filter(|field| !record.get(field).is_some_and(is_truthy))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_independent() {
        let mut a = new_record(MediaKind::Video);
        let b = new_record(MediaKind::Video);
        a.set("keywords", json!(["x"]));
        assert_eq!(b.get("keywords"), Some(&json!([])));
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!(0.5)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(["a"])));
    }
}
