//! Core domain types and shared logic for the Exhibit evidence server.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Evidence digests (MD5 + SHA-256) and incremental hashing
//! - The FeatureRecord summary and the feature normalizer
//! - Job identifiers, lifecycle status, and wire views
//! - Chart projection payloads
//! - Configuration types

pub mod chart;
pub mod config;
pub mod error;
pub mod feature;
pub mod hash;
pub mod job;

pub use chart::{ChartKind, ChartPayload};
pub use error::{Error, Result};
pub use feature::{FeatureRecord, RawFeatures, normalize};
pub use hash::{ContentHash, EvidenceDigest, EvidenceHasher, Md5Hash};
pub use job::{CaseDetails, JobId, JobResult, JobStatus, JobView, SharedRecord};

/// Maximum number of recent-file entries carried by a FeatureRecord.
pub const MAX_RECENT_FILES: usize = 10;

/// Sentinel used by the normalizer for absent string fields.
pub const NOT_AVAILABLE: &str = "N/A";
