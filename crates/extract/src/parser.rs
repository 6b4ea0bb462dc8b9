//! The image parser collaborator seam.
//!
//! Real container parsing (EWF, raw images, filesystem walks) lives behind
//! [`ImageParser`]; the core never looks inside evidence bytes itself.
//! [`ExtensionClassifier`] is the built-in degraded mode: a deterministic
//! best-effort classification from the file extension with empty listings.

use crate::error::ExtractResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Structured metadata returned by an image parser.
#[derive(Clone, Debug, Default)]
pub struct ImageMetadata {
    /// Filesystem / container kind label, if the parser can tell.
    pub file_system: Option<String>,
    /// Recently touched paths, most recent first.
    pub recent_files: Vec<String>,
    /// File-type label to occurrence count.
    pub file_types: HashMap<String, u64>,
    /// Free-form case-metadata keys.
    pub case_keys: Vec<String>,
    /// Allocated bytes, if the parser walked the filesystem.
    pub allocated_bytes: Option<u64>,
}

impl ImageMetadata {
    /// Total file count derived from the type distribution.
    pub fn total_files(&self) -> u64 {
        self.file_types.values().sum()
    }
}

/// External collaborator that parses an evidence container.
#[async_trait]
pub trait ImageParser: Send + Sync {
    /// Parse the evidence file at `path` into structured metadata.
    async fn parse(&self, path: &Path) -> ExtractResult<ImageMetadata>;
}

/// Deterministic extension-based classifier (degraded mode).
///
/// Maps known evidence-container extensions to a kind label and returns
/// empty listings: no file walk happens, so file counts stay zero and the
/// count invariant holds trivially.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtensionClassifier;

impl ExtensionClassifier {
    /// Classify the container kind from a filename extension.
    pub fn classify(filename: &str) -> &'static str {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("e01") => "EnCase Evidence File (EWF)",
            Some("001") => "Split Raw Image",
            Some("dd") => "Raw Disk Image (DD)",
            Some("img") => "Raw Disk Image",
            _ => "Unknown",
        }
    }
}

#[async_trait]
impl ImageParser for ExtensionClassifier {
    async fn parse(&self, path: &Path) -> ExtractResult<ImageMetadata> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        Ok(ImageMetadata {
            file_system: Some(Self::classify(filename).to_string()),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_extensions() {
        assert_eq!(
            ExtensionClassifier::classify("case.E01"),
            "EnCase Evidence File (EWF)"
        );
        assert_eq!(ExtensionClassifier::classify("disk.001"), "Split Raw Image");
        assert_eq!(ExtensionClassifier::classify("disk.dd"), "Raw Disk Image (DD)");
        assert_eq!(ExtensionClassifier::classify("disk.img"), "Raw Disk Image");
    }

    #[test]
    fn classify_unknown_extension() {
        assert_eq!(ExtensionClassifier::classify("notes.txt"), "Unknown");
        assert_eq!(ExtensionClassifier::classify("no_extension"), "Unknown");
    }

    #[tokio::test]
    async fn degraded_mode_returns_empty_listings() {
        let meta = ExtensionClassifier
            .parse(Path::new("/evidence/case.e01"))
            .await
            .unwrap();
        assert_eq!(meta.file_system.as_deref(), Some("EnCase Evidence File (EWF)"));
        assert!(meta.recent_files.is_empty());
        assert!(meta.file_types.is_empty());
        assert_eq!(meta.total_files(), 0);
    }
}
