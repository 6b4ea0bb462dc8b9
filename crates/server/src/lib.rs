//! HTTP ingestion server for forensic evidence images.
//!
//! This crate provides the HTTP control plane:
//! - Evidence submission (multipart upload spawning a background job)
//! - Job status polling
//! - Chart projections of the latest completed extraction
//! - Prometheus metrics

pub mod error;
pub mod handlers;
pub mod jobs;
pub mod latest;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use jobs::JobRegistry;
pub use latest::LatestResultCache;
pub use routes::create_router;
pub use state::AppState;
