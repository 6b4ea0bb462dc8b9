//! Job identifiers, lifecycle status, and wire views.

use crate::feature::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque unique identifier of one extraction job.
///
/// Generated at submission, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh job id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from the string form used on the wire.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| crate::Error::InvalidJobId(e.to_string()))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle status.
///
/// Transitions are one-directional with no cycles:
/// `Uploading -> Processing -> {Completed | Error}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Uploading,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// Wire/log representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Whether no further transition can occur from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Uploading, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Error)
                // A job that never got a worker can still fail outright.
                | (Self::Uploading, Self::Error)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case summary embedded in a completed job result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetails {
    pub space: String,
    pub file_system: String,
    pub hash: String,
    pub keys: Vec<String>,
    pub total_files: u64,
}

/// Result payload of a completed job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub success: bool,
    pub message: String,
    pub case_details: CaseDetails,
    pub recent_files: Vec<String>,
}

impl JobResult {
    /// Build the result payload from a completed extraction.
    pub fn from_record(record: &FeatureRecord) -> Self {
        Self {
            success: true,
            message: format!("Extracted data from {}", record.filename),
            case_details: CaseDetails {
                space: record.space.clone(),
                file_system: record.file_system.clone(),
                hash: record.hash.clone(),
                keys: record.keys.clone(),
                total_files: record.total_files,
            },
            recent_files: record.recent_files.clone(),
        }
    }
}

/// Snapshot of a job returned by status queries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A completed FeatureRecord shared without copying.
pub type SharedRecord = Arc<FeatureRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_parse_roundtrip() {
        let id = JobId::generate();
        let parsed = JobId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn job_id_rejects_garbage() {
        assert!(JobId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn status_transitions_are_one_way() {
        use JobStatus::*;
        assert!(Uploading.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Error));
        assert!(Uploading.can_transition_to(Error));

        assert!(!Completed.can_transition_to(Processing));
        assert!(!Error.can_transition_to(Processing));
        assert!(!Processing.can_transition_to(Uploading));
        assert!(!Completed.can_transition_to(Error));
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Uploading.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn job_result_serializes_camel_case() {
        let record = crate::normalize(crate::RawFeatures {
            filename: Some("disk.dd".to_string()),
            total_files: Some(4),
            ..Default::default()
        });
        let result = JobResult::from_record(&record);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["caseDetails"]["totalFiles"], 4);
        assert_eq!(json["caseDetails"]["fileSystem"], "Unknown");
        assert!(json["recentFiles"].is_array());
        assert_eq!(json["message"], "Extracted data from disk.dd");
    }
}
