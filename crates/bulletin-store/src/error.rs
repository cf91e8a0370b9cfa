//! Error types for blob and document storage

use std::path::PathBuf;

/// Errors from a blob backend
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// Key has never been written
    #[error("no such key: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Key cannot be mapped onto the backend
    #[error("invalid key: '{0}'")]
    InvalidKey(String),

    /// IO error on a file-backed store
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl BlobError {
    /// Create not-found error
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors loading or saving a collection document
///
/// A missing document is not an error; it loads as an empty collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend failed reading or writing the blob
    #[error("storage backend failed for '{key}': {source}")]
    Backend {
        key: String,
        #[source]
        source: BlobError,
    },

    /// Stored blob is not a JSON array of the expected records
    #[error("corrupt collection document '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be serialized
    #[error("failed to encode collection '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_flagged() {
        assert!(BlobError::not_found("b", "k").is_not_found());
        assert!(!BlobError::Backend("down".into()).is_not_found());
    }

    #[test]
    fn store_error_names_key() {
        let err = StoreError::Backend {
            key: "events.json".into(),
            source: BlobError::Backend("down".into()),
        };
        assert!(err.to_string().contains("events.json"));
    }
}
