//! The persisted record store: one JSON document per collection.
//!
//! The document is a single object mapping identity key → record. Keys are
//! written in lexicographic order with a 4-space indent, so saves are stable
//! and diffs stay readable for hand edits.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::CatalogError;
use crate::keys::display_key;
use crate::record::Record;
use crate::types::MediaKind;

/// An insert that replaced an existing record under the same key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCollision {
    pub key: String,
    /// The record that was overwritten.
    pub previous: Record,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: BTreeMap<String, Record>,
    collisions: Vec<KeyCollision>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from disk. Any read or parse failure is fatal for the batch.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&contents, &path.display().to_string())
    }

    /// Like [`RecordStore::load`], but a missing file yields an empty store.
    pub fn load_or_default(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No store at {}, starting empty", path.display());
            Ok(Self::new())
        }
    }

    /// Parse a store document. `origin` is only used in error messages.
    pub fn from_json_str(contents: &str, origin: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(contents).map_err(|e| CatalogError::Json {
            path: origin.to_string(),
            source: e,
        })?;
        let Value::Object(entries) = value else {
            return Err(CatalogError::malformed(origin, "top level is not an object"));
        };

        let mut records = BTreeMap::new();
        for (key, entry) in entries {
            let record = Record::from_value(entry)
                .map_err(|e| CatalogError::malformed(origin, format!("entry '{key}': {e}")))?;
            records.insert(key, record);
        }
        Ok(Self {
            records,
            collisions: Vec::new(),
        })
    }

    /// Serialize with sorted keys and a 4-space indent.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.records.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the store, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let io_err = |e: std::io::Error| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        };
        let serialized = self.to_json_string().map_err(|e| CatalogError::Json {
            path: path.display().to_string(),
            source: e,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serialized).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }

    /// Insert under an explicit key. Replacing an existing record is recorded
    /// as a [`KeyCollision`] rather than an error.
    pub fn insert(&mut self, key: impl Into<String>, record: Record) -> Option<Record> {
        let key = key.into();
        let previous = self.records.insert(key.clone(), record);
        if let Some(ref prev) = previous {
            log::warn!("Key collision: '{key}' replaced an existing record");
            self.collisions.push(KeyCollision {
                key,
                previous: prev.clone(),
            });
        }
        previous
    }

    /// Insert under the record's display key and return that key.
    pub fn insert_record(&mut self, record: Record, kind: MediaKind) -> String {
        let key = display_key(&record, kind);
        self.insert(key.clone(), record);
        key
    }

    /// Replace a record in place without counting a collision.
    pub fn replace(&mut self, key: &str, record: Record) {
        self.records.insert(key.to_string(), record);
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Record> {
        self.records.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Key of the first record (in key order) whose `code` equals `code`.
    pub fn find_by_code(&self, code: &str) -> Option<&str> {
        if code.trim().is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|(_, r)| r.get_str("code").eq_ignore_ascii_case(code))
            .map(|(k, _)| k.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collisions seen by [`RecordStore::insert`] since load.
    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }

    pub fn take_collisions(&mut self) -> Vec<KeyCollision> {
        std::mem::take(&mut self.collisions)
    }
}
