//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health check (intentionally unauthenticated for load balancers/k8s probes)
        .route("/v1/health", get(handlers::health_check))
        // Evidence ingestion
        .route("/v1/evidence", post(handlers::submit_evidence))
        .route("/v1/jobs/{job_id}", get(handlers::get_job))
        // Chart projections of the latest completed extraction
        .route("/v1/plots", get(handlers::get_plot));

    let mut router = Router::new().merge(api_routes);

    // Conditionally add metrics endpoint based on config.
    // SECURITY: when enabled, this endpoint must be network-restricted to
    // authorized Prometheus scraper IPs. See crate::metrics for details.
    if state.config.server.metrics_enabled {
        router = router.merge(Router::new().route("/metrics", get(metrics_handler)));
    }

    // Evidence images run to many gigabytes; lift axum's default body
    // limit up to the configured maximum plus multipart framing overhead.
    let body_limit = usize::try_from(state.config.server.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(1024 * 1024);

    router
        .layer(DefaultBodyLimit::max(body_limit))
        // The charting frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
