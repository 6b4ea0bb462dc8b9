//! Store error types.

use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("insert failed: {0}")]
    Insert(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown store kind: {0}")]
    UnknownKind(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<exhibit_core::Error> for StoreError {
    fn from(e: exhibit_core::Error) -> Self {
        match e {
            exhibit_core::Error::UnknownStoreKind(kind) => Self::UnknownKind(kind),
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(io) => Self::Connection(io.to_string()),
            sqlx::Error::PoolTimedOut => Self::Connection("pool timed out".to_string()),
            other => Self::Insert(other.to_string()),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
