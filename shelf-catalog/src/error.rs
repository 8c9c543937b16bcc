use thiserror::Error;

/// Errors raised by the record model and the persisted store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    /// The store parsed as JSON but its top level is not a key → record mapping.
    #[error("Malformed store {path}: {reason}")]
    MalformedStore { path: String, reason: String },

    #[error("Unsupported media kind: {0}")]
    UnsupportedKind(String),

    /// A field held a value of the wrong shape for the requested typed view.
    #[error("Invalid field: {0}")]
    InvalidField(String),
}

impl CatalogError {
    pub fn invalid_field(msg: impl Into<String>) -> Self {
        Self::InvalidField(msg.into())
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedStore {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
