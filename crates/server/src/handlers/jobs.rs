//! Job status handler.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use exhibit_core::{JobId, JobView};

/// GET /v1/jobs/{job_id} - poll the status of an extraction job.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobView>> {
    let job_id = JobId::parse(&job_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let view = state
        .jobs
        .view(job_id)
        .ok_or_else(|| ApiError::NotFound(format!("job not found: {job_id}")))?;

    Ok(Json(view))
}
