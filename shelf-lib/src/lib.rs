//! Batch drivers shared by frontends: discovery, ingestion into a store,
//! batch materialization, and user settings.

pub mod batch;
pub mod error;
pub mod ingest;
pub mod scanner;
pub mod settings;

pub use batch::{BatchEvent, BatchReport, BatchSummary, IncompleteRecord, check_completeness, run_materialize};
pub use error::ShelfError;
pub use ingest::{IngestOverrides, IngestReport, ingest_discovered, ingest_scraped, next_code_number};
pub use scanner::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS, discover};
pub use settings::{MaterializeSettings, NetworkSettings, PathSettings, Settings, settings_path};
