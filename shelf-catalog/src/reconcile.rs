//! Field-level reconciliation of partial records.
//!
//! Two policies exist:
//!
//! - [`merge`] is for cross-batch reconciliation: list fields concatenate,
//!   everything else is overwritten by the incoming side.
//! - [`apply_fields`] is for single-pass ingestion: plain overwrite, then
//!   explicit overrides on top. It never concatenates.
//!
//! Neither function inspects field types beyond "is this a list"; unknown keys
//! pass straight through.

use serde::Serialize;
use serde_json::Value;

use crate::keys::{FuzzyIndex, MatchMethod};
use crate::record::Record;
use crate::store::{KeyCollision, RecordStore};

/// Merge `addition` into a copy of `base`.
///
/// For each field of `addition`: when both sides are lists the result is the
/// base items followed by the addition items (no dedup); otherwise the
/// addition's value wins, even when it is empty. Fields only in `base` are
/// kept. `base` itself is never modified.
pub fn merge(base: &Record, addition: &Record) -> Record {
    let mut merged = base.clone();
    for (key, incoming) in addition.iter() {
        let value = match (merged.get(key), incoming) {
            (Some(Value::Array(existing)), Value::Array(extra)) => {
                let mut items = existing.clone();
                items.extend(extra.iter().cloned());
                Value::Array(items)
            }
            _ => incoming.clone(),
        };
        merged.set(key.clone(), value);
    }
    merged
}

/// Overwrite `original` with every field of `addition`, then with every field
/// of `overrides`. Returns a new record; inputs are untouched.
pub fn apply_fields(original: &Record, addition: &Record, overrides: &Record) -> Record {
    let mut applied = original.clone();
    for (key, value) in addition.iter().chain(overrides.iter()) {
        applied.set(key.clone(), value.clone());
    }
    applied
}

// ── Store reconciliation ────────────────────────────────────────────────────

/// Options for [`reconcile_stores`].
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Insert additions that match nothing in the base store.
    pub insert_unmatched: bool,
}

/// One addition folded into an existing record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRecord {
    pub addition_key: String,
    pub base_key: String,
    pub method: MatchMethod,
}

/// What a reconciliation pass did.
#[derive(Debug, Default, Serialize)]
pub struct ReconcileReport {
    pub matched: Vec<MatchedRecord>,
    /// Addition keys that matched nothing.
    pub unmatched: Vec<String>,
    /// Unmatched additions that were inserted (only with `insert_unmatched`).
    pub inserted: Vec<String>,
    /// Inserts that replaced an existing key.
    #[serde(skip)]
    pub collisions: Vec<KeyCollision>,
}

impl ReconcileReport {
    pub fn count_by(&self, method: MatchMethod) -> usize {
        self.matched.iter().filter(|m| m.method == method).count()
    }
}

/// Merge every record of `additions` into the matching record of `base`.
///
/// Matching order: equal non-empty `code`, identical key, equal normalized
/// key, then the `#`-prefix fallback. Candidates are the base keys as they
/// were before the pass, iterated in lexicographic order.
pub fn reconcile_stores(
    base: &mut RecordStore,
    additions: &RecordStore,
    options: &ReconcileOptions,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    let base_keys: Vec<String> = base.keys().map(str::to_string).collect();
    let index = FuzzyIndex::new(base_keys.iter().map(String::as_str));

    for (key, addition) in additions.iter() {
        let found = base
            .find_by_code(addition.get_str("code"))
            .map(|k| (k.to_string(), MatchMethod::Code))
            .or_else(|| {
                base.contains_key(key)
                    .then(|| (key.to_string(), MatchMethod::Exact))
            })
            .or_else(|| index.find(key).map(|(k, m)| (k.to_string(), m)));

        match found {
            Some((base_key, method)) => {
                if let Some(existing) = base.get(&base_key) {
                    let merged = merge(existing, addition);
                    base.replace(&base_key, merged);
                }
                log::debug!("Merged '{key}' into '{base_key}' by {method}");
                report.matched.push(MatchedRecord {
                    addition_key: key.to_string(),
                    base_key,
                    method,
                });
            }
            None => {
                report.unmatched.push(key.to_string());
                if options.insert_unmatched {
                    base.insert(key, addition.clone());
                    report.inserted.push(key.to_string());
                }
            }
        }
    }

    report.collisions = base.take_collisions();
    report
}
