//! Chart projection handler.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use exhibit_core::{ChartKind, ChartPayload};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PlotQuery {
    /// Chart kind: histogram, bar, pie, or line.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "histogram".to_string()
}

/// GET /v1/plots?type={kind} - project the latest completed extraction.
///
/// Serves from the single-slot cache; no job id is involved. Responds
/// 400 when no extraction has completed yet or the latest one carries
/// no file-type distribution (degraded-mode extractions).
pub async fn get_plot(
    State(state): State<AppState>,
    Query(query): Query<PlotQuery>,
) -> ApiResult<Json<ChartPayload>> {
    let kind: ChartKind = query.kind.parse()?;

    let record = state
        .latest
        .get()
        .ok_or_else(|| ApiError::BadRequest("no completed extraction available".to_string()))?;

    if record.file_types.is_empty() {
        return Err(ApiError::BadRequest(
            "no file type data available".to_string(),
        ));
    }

    Ok(Json(ChartPayload::project(kind, &record)))
}
