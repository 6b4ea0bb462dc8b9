//! Evidence submission handler.

use crate::error::{ApiError, ApiResult};
use crate::jobs::spawn_extraction;
use crate::state::AppState;
use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use exhibit_core::JobId;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Response returned immediately on submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub job_id: JobId,
    pub message: &'static str,
}

/// POST /v1/evidence - accept an evidence image and spawn extraction.
///
/// Multipart fields:
/// - `image`: the evidence file (required, must carry a filename and
///   at least one byte)
/// - `databases`: JSON array of store kinds to fan out to (optional)
///
/// Returns once the file is persisted; no job exists if persistence or
/// validation fails. Extraction runs in the background and is observed
/// via the job endpoint.
pub async fn submit_evidence(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<SubmitResponse>> {
    let job_id = JobId::generate();
    let mut spooled: Option<(PathBuf, String)> = None;
    let mut requested: Vec<String> = Vec::new();

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                discard_spool(&spooled).await;
                return Err(ApiError::BadRequest(format!("malformed multipart body: {e}")));
            }
        };

        match field.name() {
            Some("image") => {
                let filename = field
                    .file_name()
                    .map(sanitize_filename)
                    .unwrap_or_default();
                if filename.is_empty() {
                    discard_spool(&spooled).await;
                    return Err(ApiError::BadRequest("no file selected".to_string()));
                }
                // A repeated image field replaces the earlier upload.
                // spool_upload removes its own partial file on failure.
                discard_spool(&spooled).await;
                spooled = None;
                let path = spool_upload(&state, job_id, &filename, &mut field).await?;
                spooled = Some((path, filename));
            }
            Some("databases") => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        discard_spool(&spooled).await;
                        return Err(ApiError::BadRequest(format!(
                            "unreadable databases field: {e}"
                        )));
                    }
                };
                if !text.trim().is_empty() {
                    requested = match serde_json::from_str(&text) {
                        Ok(requested) => requested,
                        Err(e) => {
                            discard_spool(&spooled).await;
                            return Err(ApiError::BadRequest(format!(
                                "invalid databases field: {e}"
                            )));
                        }
                    };
                }
            }
            _ => {}
        }
    }

    let (path, filename) =
        spooled.ok_or_else(|| ApiError::BadRequest("no image file provided".to_string()))?;

    spawn_extraction(&state, job_id, path, filename, requested).await;

    Ok(Json(SubmitResponse {
        success: true,
        job_id,
        message: "Upload successful, processing started",
    }))
}

/// Remove a spooled upload once a later validation step has rejected
/// the request, so failed submissions leave nothing on disk.
async fn discard_spool(spooled: &Option<(PathBuf, String)>) {
    if let Some((path, _)) = spooled {
        let _ = fs::remove_file(path).await;
    }
}

/// Strip any path components from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string()
}

/// Stream the upload field to the spool directory.
///
/// The on-disk name is prefixed with the job id so concurrent uploads
/// of the same filename never collide. Size is enforced while streaming;
/// an oversized or empty upload is deleted and rejected.
async fn spool_upload(
    state: &AppState,
    job_id: JobId,
    filename: &str,
    field: &mut Field<'_>,
) -> ApiResult<PathBuf> {
    fs::create_dir_all(&state.config.upload.dir).await?;
    let path = state
        .config
        .upload
        .dir
        .join(format!("{job_id}_{filename}"));

    let mut file = fs::File::create(&path).await?;
    let mut written: u64 = 0;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(ApiError::BadRequest(format!("upload interrupted: {e}")));
            }
        };

        written += chunk.len() as u64;
        if written > state.config.server.max_upload_size {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(ApiError::PayloadTooLarge(format!(
                "upload exceeds {} bytes",
                state.config.server.max_upload_size
            )));
        }
        if let Err(e) = file.write_all(&chunk).await {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }
    }

    if written == 0 {
        drop(file);
        let _ = fs::remove_file(&path).await;
        return Err(ApiError::BadRequest("empty file uploaded".to_string()));
    }

    if let Err(e) = file.sync_all().await {
        drop(file);
        let _ = fs::remove_file(&path).await;
        return Err(e.into());
    }
    tracing::debug!(path = %path.display(), bytes = written, "Upload spooled");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_filename("disk.E01"), "disk.E01");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/abs/path/case.dd"), "case.dd");
        assert_eq!(sanitize_filename(""), "");
    }
}
