//! Batch materialization: one store, one kind, one output root.

use std::path::{Path, PathBuf};

use serde::Serialize;
use shelf_catalog::{MediaKind, RecordStore, missing_fields};
use shelf_frontend::{EntityReport, EntityState, Materializer};

use crate::error::ShelfError;

/// Progress events for the batch driver's caller.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started { total: usize },
    EntityStarted { index: usize, key: String },
    EntityFinished { index: usize, report: EntityReport },
    Done,
}

/// Counts over a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub created: usize,
    pub skipped: usize,
    pub recreated: usize,
    pub failed: usize,
    /// Total warnings across all entities.
    pub warnings: usize,
}

impl BatchSummary {
    fn count(&mut self, report: &EntityReport) {
        match report.state {
            EntityState::Created => self.created += 1,
            EntityState::Skipped => self.skipped += 1,
            EntityState::Recreated => self.recreated += 1,
            EntityState::Failed(_) => self.failed += 1,
        }
        self.warnings += report.warnings.len();
    }
}

/// Machine-readable result of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub kind: MediaKind,
    pub out_root: PathBuf,
    pub started_at: String,
    pub summary: BatchSummary,
    pub entities: Vec<EntityReport>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &EntityReport> {
        self.entities.iter().filter(|e| e.state.is_failed())
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ShelfError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ShelfError::io(path, std::io::Error::other(e)))?;
        std::fs::write(path, json).map_err(|e| ShelfError::io(path, e))
    }
}

/// Materialize every record of `store` under `out_root`.
///
/// Only an output root that cannot be created stops the batch; every
/// per-entity error is caught, logged with the record's key and reported.
pub fn run_materialize(
    store: &RecordStore,
    kind: MediaKind,
    out_root: &Path,
    materializer: &Materializer,
    on_event: &mut dyn FnMut(BatchEvent),
) -> Result<BatchReport, ShelfError> {
    std::fs::create_dir_all(out_root).map_err(|source| ShelfError::OutputRoot {
        path: out_root.to_path_buf(),
        source,
    })?;

    let mut report = BatchReport {
        kind,
        out_root: out_root.to_path_buf(),
        started_at: chrono::Local::now().to_rfc3339(),
        summary: BatchSummary::default(),
        entities: Vec::with_capacity(store.len()),
    };

    on_event(BatchEvent::Started { total: store.len() });
    for (index, (key, record)) in store.iter().enumerate() {
        on_event(BatchEvent::EntityStarted {
            index,
            key: key.to_string(),
        });
        let entity = materializer.materialize(key, record, kind, out_root);
        report.summary.count(&entity);
        on_event(BatchEvent::EntityFinished {
            index,
            report: entity.clone(),
        });
        report.entities.push(entity);
    }
    on_event(BatchEvent::Done);

    log::info!(
        "Materialized {} {kind} record(s): {} created, {} skipped, {} recreated, {} failed",
        store.len(),
        report.summary.created,
        report.summary.skipped,
        report.summary.recreated,
        report.summary.failed
    );
    Ok(report)
}

/// A record whose template fields are not all filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteRecord {
    pub key: String,
    pub missing: Vec<String>,
}

/// Advisory completeness pass over a store, in key order.
pub fn check_completeness(store: &RecordStore, kind: MediaKind) -> Vec<IncompleteRecord> {
    store
        .iter()
        .filter_map(|(key, record)| {
            let missing = missing_fields(record, kind);
            (!missing.is_empty()).then(|| IncompleteRecord {
                key: key.to_string(),
                missing,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/batch_tests.rs"]
mod tests;
