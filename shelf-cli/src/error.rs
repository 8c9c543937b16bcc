use thiserror::Error;

use shelf_catalog::CatalogError;
use shelf_lib::ShelfError;
use shelf_scraper::ScrapeError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Shelf(#[from] ShelfError),

    /// Record store could not be read or written
    #[error("Store error: {0}")]
    Store(#[from] CatalogError),

    /// Listing fetch or client setup failed
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// The batch ran but some entities failed
    #[error("{0} entit(ies) failed")]
    Failures(usize),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
