//! Snapshot store errors

use std::io;

use thiserror::Error;

/// Result type for snapshot persistence
pub type StoreResult<T> = Result<T, StoreError>;

/// Snapshot persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the snapshot file failed
    #[error("Snapshot I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The snapshot file is not a valid state document
    #[error("Snapshot at {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot parsed but violates pool accounting
    #[error("Snapshot at {path} is inconsistent: {reason}")]
    Inconsistent { path: String, reason: String },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "LUCKY_STORE_IO",
            StoreError::Corrupt { .. } => "LUCKY_STORE_CORRUPT",
            StoreError::Inconsistent { .. } => "LUCKY_STORE_INCONSISTENT",
        }
    }
}
