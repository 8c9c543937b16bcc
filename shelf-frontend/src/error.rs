use shelf_catalog::CatalogError;

/// Errors that abort materialization of a single entity.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Image error for {path}: {source}")]
    Image {
        path: String,
        source: image::ImageError,
    },

    /// The primary media file does not exist at its (rewritten) location.
    #[error("Source file not found: {0}")]
    MissingSource(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Could not fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Frame extraction failed for {path}: {reason}")]
    Frame { path: String, reason: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl MaterializeError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
