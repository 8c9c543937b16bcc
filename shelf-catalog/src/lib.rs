//! Media record model, identity keys, reconciliation, and the JSON store.
//!
//! This crate holds everything about a record that does not touch the output
//! library: templates, typed views, the merge policies, key construction and
//! the persisted `key → record` document. The materializer and the drivers
//! build on these types.

pub mod error;
pub mod image_order;
pub mod keys;
pub mod reconcile;
pub mod record;
pub mod store;
pub mod types;

pub use error::CatalogError;
pub use image_order::{SortKeyError, image_sort_key, order_by_sort_key};
pub use keys::{FuzzyIndex, MatchMethod, display_key, display_models, normalize_title};
pub use reconcile::{ReconcileOptions, ReconcileReport, apply_fields, merge, reconcile_stores};
pub use record::{Record, is_complete, missing_fields, new_record};
pub use store::{KeyCollision, RecordStore};
pub use types::*;
