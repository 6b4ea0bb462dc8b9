//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid job id: {0}")]
    InvalidJobId(String),

    #[error("unknown store kind: {0}")]
    UnknownStoreKind(String),

    #[error("unknown chart kind: {0}")]
    UnknownChartKind(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
