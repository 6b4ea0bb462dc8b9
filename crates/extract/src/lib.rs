//! Streaming digest and feature extraction for evidence files.
//!
//! This crate provides:
//! - A single-pass, bounded-memory extractor computing MD5 and SHA-256
//!   concurrently over the same byte stream, with progress reporting
//! - The `ImageParser` collaborator trait for structured metadata
//! - A deterministic extension-based classifier for degraded mode

pub mod error;
pub mod extractor;
pub mod parser;

pub use error::{ExtractError, ExtractResult};
pub use extractor::{ProgressFn, extract};
pub use parser::{ExtensionClassifier, ImageMetadata, ImageParser};
