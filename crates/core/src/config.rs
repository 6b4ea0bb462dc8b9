//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    /// Backend registrations, one per store kind to fan out to.
    #[serde(default)]
    pub stores: Vec<StoreEntry>,
}

impl AppConfig {
    /// Create a test configuration rooted in the given scratch directory.
    ///
    /// **For testing only.**
    pub fn for_testing(root: &std::path::Path) -> Self {
        Self {
            server: ServerConfig::default(),
            upload: UploadConfig {
                dir: root.join("uploads"),
            },
            stores: Vec::new(),
        }
    }
}

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted evidence upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    /// Maximum number of extraction workers running at once.
    /// Submissions beyond this are accepted and queue on the permit.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
    /// How long terminal jobs stay queryable before eviction, in seconds.
    #[serde(default = "default_job_retention_secs")]
    pub job_retention_secs: u64,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_upload_size() -> u64 {
    // Evidence images are large; default to 8 GiB.
    8 * 1024 * 1024 * 1024
}

fn default_max_concurrent_jobs() -> usize {
    4
}

fn default_job_retention_secs() -> u64 {
    3600
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_size: default_max_upload_size(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
            job_retention_secs: default_job_retention_secs(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServerConfig {
    /// Get the job retention window as a Duration.
    pub fn job_retention(&self) -> Duration {
        Duration::from_secs(self.job_retention_secs)
    }
}

/// Upload persistence configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory evidence files are persisted to before extraction.
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./data/uploads")
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
        }
    }
}

/// One store registration: which backend serves which store kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreEntry {
    /// Store kind identifier ("mongodb", "postgres", "neo4j", "vector").
    pub kind: String,
    /// Backend driving the inserts for this kind.
    pub backend: BackendConfig,
}

/// Store backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Local filesystem spool (one JSON document per insert).
    Filesystem {
        /// Root directory for spooled records.
        path: PathBuf,
    },
    /// PostgreSQL via sqlx.
    Postgres {
        /// Connection URL.
        url: String,
        /// Pool size.
        #[serde(default = "default_pg_max_connections")]
        max_connections: u32,
    },
}

fn default_pg_max_connections() -> u32 {
    4
}
