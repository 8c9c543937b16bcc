use std::path::{Path, PathBuf};

use shelf_catalog::CatalogError;
use thiserror::Error;

/// Batch-level failures: anything that stops a pass before its entities run.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Invalid settings file {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },

    #[error(transparent)]
    Store(#[from] CatalogError),

    #[error("Cannot create output root {}: {source}", path.display())]
    OutputRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ShelfError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn settings(path: &Path, message: impl Into<String>) -> Self {
        Self::Settings {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
