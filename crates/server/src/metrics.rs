//! Prometheus metrics for the Exhibit server.
//!
//! Exposes metrics for job lifecycle, extraction latency, and store
//! fan-out outcomes.
//!
//! # Security Note
//!
//! The `/metrics` endpoint is unauthenticated to allow Prometheus scraping.
//! Metrics carry no case data (no filenames, digests, or record contents),
//! but they do expose aggregate system usage. Restrict the endpoint to
//! authorized scraper IPs at the infrastructure level; do not expose it on
//! public networks.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    self, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Job lifecycle metrics
pub static JOBS_SUBMITTED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "exhibit_jobs_submitted_total",
        "Total number of extraction jobs submitted",
    )
    .expect("metric creation failed")
});

pub static JOBS_COMPLETED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "exhibit_jobs_completed_total",
        "Total number of extraction jobs that completed successfully",
    )
    .expect("metric creation failed")
});

pub static JOBS_FAILED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "exhibit_jobs_failed_total",
        "Total number of extraction jobs that ended in error",
    )
    .expect("metric creation failed")
});

pub static JOBS_PANICKED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "exhibit_jobs_panicked_total",
        "Total number of extraction tasks that panicked",
    )
    .expect("metric creation failed")
});

pub static JOBS_ACTIVE: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "exhibit_jobs_active",
        "Number of extraction jobs currently queued or running",
    )
    .expect("metric creation failed")
});

// Timing metrics
pub static EXTRACTION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "exhibit_extraction_duration_seconds",
            "Time taken to digest and extract one evidence image",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 3600.0]),
    )
    .expect("metric creation failed")
});

// Store fan-out metrics
pub static STORE_INSERTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "exhibit_store_inserts_total",
            "Store insert attempts by backend and outcome",
        ),
        &["backend", "outcome"],
    )
    .expect("metric creation failed")
});

/// Guard to ensure metrics are only registered once.
static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Idempotent: subsequent calls after the first are no-ops, allowing safe
/// use in integration tests that build multiple routers.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(JOBS_SUBMITTED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(JOBS_COMPLETED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(JOBS_FAILED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(JOBS_PANICKED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(JOBS_ACTIVE.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(EXTRACTION_DURATION.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(STORE_INSERTS.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Record one store insert outcome.
pub fn record_store_outcome(backend: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    STORE_INSERTS.with_label_values(&[backend, outcome]).inc();
}
