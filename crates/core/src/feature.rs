//! The FeatureRecord summary and the feature normalizer.

use crate::{MAX_RECENT_FILES, NOT_AVAILABLE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw extraction output before normalization.
///
/// Every field is optional: the extractor fills what it can and the
/// normalizer supplies defined defaults for the rest. This mirrors the
/// loosely-typed record the image parser hands back.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawFeatures {
    pub filename: Option<String>,
    pub recent_files: Option<Vec<String>>,
    pub space: Option<String>,
    pub file_system: Option<String>,
    pub hash: Option<String>,
    pub keys: Option<Vec<String>>,
    pub total_files: Option<u64>,
    pub file_types: Option<HashMap<String, u64>>,
    pub size_bytes: Option<u64>,
}

/// Canonical structured summary of one evidence file.
///
/// Created once per completed extraction and immutable afterwards; shared
/// between the job result and the latest-result cache behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Source filename as submitted.
    pub filename: String,
    /// Up to [`MAX_RECENT_FILES`] recently touched paths, most recent first.
    pub recent_files: Vec<String>,
    /// Human-readable space-usage summary.
    pub space: String,
    /// Detected filesystem / evidence-container kind.
    pub file_system: String,
    /// Combined dual-algorithm digest string.
    pub hash: String,
    /// Free-form case-metadata keys.
    pub keys: Vec<String>,
    /// Total file count observed in the image.
    pub total_files: u64,
    /// File-type label to occurrence count.
    pub file_types: HashMap<String, u64>,
    /// Total byte size of the source evidence file.
    pub size_bytes: u64,
}

impl FeatureRecord {
    /// Check the extraction invariant: when both sides come from the same
    /// extraction, the total file count equals the sum of the type counts.
    pub fn counts_consistent(&self) -> bool {
        if self.file_types.is_empty() {
            return true;
        }
        self.total_files == self.file_types.values().sum::<u64>()
    }
}

/// Map a raw extraction result into a fully-populated FeatureRecord.
///
/// Pure and idempotent: absent sequences become empty, absent counts zero,
/// absent strings the `"N/A"` sentinel. The recent-files list is truncated
/// to [`MAX_RECENT_FILES`] entries.
pub fn normalize(raw: RawFeatures) -> FeatureRecord {
    let mut recent_files = raw.recent_files.unwrap_or_default();
    recent_files.truncate(MAX_RECENT_FILES);

    FeatureRecord {
        filename: raw.filename.unwrap_or_else(|| "unknown".to_string()),
        recent_files,
        space: raw.space.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        file_system: raw.file_system.unwrap_or_else(|| "Unknown".to_string()),
        hash: raw.hash.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        keys: raw.keys.unwrap_or_default(),
        total_files: raw.total_files.unwrap_or(0),
        file_types: raw.file_types.unwrap_or_default(),
        size_bytes: raw.size_bytes.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_raw() -> RawFeatures {
        let mut file_types = HashMap::new();
        file_types.insert("PDF".to_string(), 3);
        file_types.insert("JPG".to_string(), 7);

        RawFeatures {
            filename: Some("disk.E01".to_string()),
            recent_files: Some(vec!["Documents/report.pdf".to_string()]),
            space: Some("Allocated: 10.00 MB, Unallocated: 5.00 MB".to_string()),
            file_system: Some("EnCase Evidence File (EWF)".to_string()),
            hash: Some("MD5: aa, SHA256: bb".to_string()),
            keys: Some(vec!["examiner:Forensic_Team".to_string()]),
            total_files: Some(10),
            file_types: Some(file_types),
            size_bytes: Some(1024),
        }
    }

    #[test]
    fn normalize_preserves_populated_fields() {
        let record = normalize(full_raw());
        assert_eq!(record.filename, "disk.E01");
        assert_eq!(record.total_files, 10);
        assert_eq!(record.file_types.len(), 2);
        assert!(record.counts_consistent());
    }

    #[test]
    fn normalize_defaults_absent_fields() {
        let record = normalize(RawFeatures::default());
        assert_eq!(record.filename, "unknown");
        assert!(record.recent_files.is_empty());
        assert_eq!(record.space, NOT_AVAILABLE);
        assert_eq!(record.file_system, "Unknown");
        assert_eq!(record.hash, NOT_AVAILABLE);
        assert!(record.keys.is_empty());
        assert_eq!(record.total_files, 0);
        assert!(record.file_types.is_empty());
        assert_eq!(record.size_bytes, 0);
    }

    #[test]
    fn normalize_truncates_recent_files() {
        let raw = RawFeatures {
            recent_files: Some((0..25).map(|i| format!("file_{i}")).collect()),
            ..Default::default()
        };
        let record = normalize(raw);
        assert_eq!(record.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(record.recent_files[0], "file_0");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(full_raw());
        let again = normalize(RawFeatures {
            filename: Some(once.filename.clone()),
            recent_files: Some(once.recent_files.clone()),
            space: Some(once.space.clone()),
            file_system: Some(once.file_system.clone()),
            hash: Some(once.hash.clone()),
            keys: Some(once.keys.clone()),
            total_files: Some(once.total_files),
            file_types: Some(once.file_types.clone()),
            size_bytes: Some(once.size_bytes),
        });
        assert_eq!(once, again);
    }

    #[test]
    fn counts_consistent_detects_mismatch() {
        let mut record = normalize(full_raw());
        record.total_files = 99;
        assert!(!record.counts_consistent());
    }
}
