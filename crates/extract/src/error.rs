//! Extraction error types.

use std::path::PathBuf;
use thiserror::Error;

/// Extraction pipeline errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("read failure: {0}")]
    Read(#[from] std::io::Error),

    #[error("image parse failure: {0}")]
    Parse(String),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
