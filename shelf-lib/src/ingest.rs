//! Folding discovered and scraped records into a persisted store.
//!
//! Discovery output is applied with [`apply_fields`]: a rescan overwrites the
//! fields it found and leaves everything else (manual edits, scraped text)
//! alone, so repeated scans converge. Scraped output goes through the store
//! reconciler, which concatenates list fields; repeats are then dropped.

use serde::Serialize;
use serde_json::Value;
use shelf_catalog::record::LIST_FIELDS;
use shelf_catalog::{
    KeyCollision, MediaKind, Record, RecordStore, ReconcileOptions, ReconcileReport, apply_fields,
    display_key, merge, new_record, reconcile_stores,
};

/// Fields forced onto every discovered record.
#[derive(Debug, Clone, Default)]
pub struct IngestOverrides {
    pub studio: Vec<String>,
    pub model: Vec<String>,
    /// New records without a code get `{prefix}-{NNN}`, numbered after the
    /// highest code already in the store with that prefix.
    pub code_prefix: Option<String>,
}

impl IngestOverrides {
    fn as_record(&self) -> Record {
        let mut record = Record::new();
        if !self.studio.is_empty() {
            record.set("studio", self.studio.clone());
        }
        if !self.model.is_empty() {
            record.set("model", self.model.clone());
        }
        record
    }
}

/// What an ingest pass did to the store.
#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    /// `(key, code)` for every code handed out.
    pub codes_assigned: Vec<(String, String)>,
    /// `(old, new)` for records whose key followed a changed title or model.
    pub rekeyed: Vec<(String, String)>,
    #[serde(skip)]
    pub collisions: Vec<KeyCollision>,
}

/// Key of the stored record that points at the same media path, if any.
fn find_by_path<'s>(store: &'s RecordStore, path: &str) -> Option<&'s str> {
    if path.is_empty() {
        return None;
    }
    store
        .iter()
        .find(|(_, record)| record.get_str("path") == path)
        .map(|(key, _)| key)
}

/// First free number after the highest `{prefix}-NNN` code in the store.
pub fn next_code_number(store: &RecordStore, prefix: &str) -> u32 {
    let lead = format!("{prefix}-");
    store
        .iter()
        .filter_map(|(_, record)| record.get_str("code").strip_prefix(lead.as_str())?.parse::<u32>().ok())
        .max()
        .map_or(1, |n| n.saturating_add(1))
}

/// Merge discovered candidates into `store`.
///
/// A candidate updates the stored record pointing at the same `path`, or
/// failing that the one with the same key. A key held by a different asset
/// is overwritten and reported as a collision. Anything else is added as a
/// full template record.
pub fn ingest_discovered(
    store: &mut RecordStore,
    discovered: Vec<Record>,
    kind: MediaKind,
    overrides: &IngestOverrides,
) -> IngestReport {
    let forced = overrides.as_record();
    let mut report = IngestReport::default();
    let mut next_code = overrides
        .code_prefix
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| (p.to_string(), next_code_number(store, p)));

    for candidate in discovered {
        let mut fresh = apply_fields(&new_record(kind), &candidate, &forced);
        let key = display_key(&fresh, kind);
        let path = candidate.get_str("path");

        if let Some(existing_key) = find_by_path(store, path).map(str::to_string)
            && let Some(existing) = store.get(&existing_key)
        {
            let updated = apply_fields(existing, &candidate, &forced);
            let current_key = display_key(&updated, kind);
            if current_key != existing_key {
                store.remove(&existing_key);
                log::info!("Re-keyed '{existing_key}' as '{current_key}'");
                report.rekeyed.push((existing_key, current_key.clone()));
                store.insert(current_key.clone(), updated);
            } else {
                store.replace(&existing_key, updated);
            }
            log::debug!("Updated '{current_key}'");
            report.updated.push(current_key);
            continue;
        }

        if let Some(existing) = store.get(&key) {
            let held = existing.get_str("path");
            // Same key, different asset: fall through and overwrite.
            if held.is_empty() || path.is_empty() || held == path {
                let updated = apply_fields(existing, &candidate, &forced);
                store.replace(&key, updated);
                log::debug!("Updated '{key}'");
                report.updated.push(key);
                continue;
            }
        }

        if fresh.get_str("code").is_empty()
            && let Some((prefix, n)) = next_code.as_mut()
        {
            let code = format!("{prefix}-{n:03}");
            *n = n.saturating_add(1);
            fresh.set("code", code.clone());
            report.codes_assigned.push((key.clone(), code));
        }
        store.insert(key.clone(), fresh);
        log::debug!("Added '{key}'");
        report.added.push(key);
    }

    report.collisions = store.take_collisions();
    report
}

/// Drop repeated list items, keeping the first occurrence of each.
fn dedup_lists(record: &Record) -> Record {
    let mut out = record.clone();
    for field in LIST_FIELDS {
        if let Some(Value::Array(items)) = record.get(field) {
            let mut unique: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !unique.contains(item) {
                    unique.push(item.clone());
                }
            }
            if unique.len() != items.len() {
                out.set(*field, unique);
            }
        }
    }
    out
}

/// Merge a crawl's sparse records into `store`. Matches are merged in place;
/// the rest are inserted on top of the kind's template. List fields touched
/// by the pass are deduplicated, so rerunning a scrape changes nothing.
pub fn ingest_scraped(store: &mut RecordStore, scraped: &RecordStore, kind: MediaKind) -> ReconcileReport {
    let report = reconcile_stores(
        store,
        scraped,
        &ReconcileOptions {
            insert_unmatched: true,
        },
    );
    for matched in &report.matched {
        if let Some(merged) = store.get(&matched.base_key) {
            let deduped = dedup_lists(merged);
            store.replace(&matched.base_key, deduped);
        }
    }
    let template = new_record(kind);
    for key in &report.inserted {
        if let Some(sparse) = store.get(key) {
            let full = dedup_lists(&merge(&template, sparse));
            store.replace(key, full);
        }
    }
    report
}

#[cfg(test)]
#[path = "tests/ingest_tests.rs"]
mod tests;
