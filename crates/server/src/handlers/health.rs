//! Health check handler.

use axum::Json;
use serde_json::{Value, json};

/// GET /v1/health - liveness probe.
///
/// Intentionally unauthenticated for load balancers and k8s probes.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
