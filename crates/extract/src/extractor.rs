//! Single-pass streaming extraction.
//!
//! Reads the evidence file once, feeding both digest algorithms from the
//! same buffer, then delegates metadata extraction to the image parser.
//! Memory use is bounded by one read buffer regardless of file size.

use crate::error::{ExtractError, ExtractResult};
use crate::parser::ImageParser;
use exhibit_core::{EvidenceHasher, MAX_RECENT_FILES, RawFeatures};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::instrument;

/// Streaming read buffer size (64 KiB).
const READ_BUF_SIZE: usize = 64 * 1024;

/// Progress band reserved for the hashing pass.
const HASH_PROGRESS_START: u8 = 20;
const HASH_PROGRESS_SPAN: u8 = 40;

/// Progress value reported when metadata extraction begins.
const METADATA_PROGRESS: u8 = 65;

/// Progress reporting callback: (progress 0-100, human-readable message).
pub type ProgressFn<'a> = dyn Fn(u8, &str) + Send + Sync + 'a;

fn to_mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// Stream the evidence file at `path`, computing the combined digest and
/// assembling raw features via `parser`.
///
/// Invokes `progress` with values in [20, 60] proportional to bytes
/// consumed, then 65 once metadata extraction starts. Fails with
/// [`ExtractError::SourceNotFound`] if the file is absent and
/// [`ExtractError::Read`] on I/O errors mid-stream.
#[instrument(skip(parser, progress), fields(path = %path.display()))]
pub async fn extract(
    path: &Path,
    parser: &dyn ImageParser,
    progress: &ProgressFn<'_>,
) -> ExtractResult<RawFeatures> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExtractError::SourceNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ExtractError::Read(e)),
    };
    let size = meta.len();
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    progress(
        HASH_PROGRESS_START,
        "Reading file and calculating hashes...",
    );

    let digest = {
        let mut file = File::open(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractError::SourceNotFound(path.to_path_buf())
            } else {
                ExtractError::Read(e)
            }
        })?;

        let mut hasher = EvidenceHasher::new();
        let mut buf = vec![0u8; READ_BUF_SIZE];
        let mut bytes_read: u64 = 0;
        let mut last_reported = HASH_PROGRESS_START;

        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            bytes_read += n as u64;

            if size > 0 {
                let pct = HASH_PROGRESS_START
                    + ((bytes_read as f64 / size as f64) * HASH_PROGRESS_SPAN as f64) as u8;
                // Only report when the integer value moves, to keep the
                // callback cheap on multi-gigabyte images.
                if pct > last_reported {
                    last_reported = pct;
                    progress(
                        pct,
                        &format!("Hashing: {:.1} MB / {:.1} MB", to_mib(bytes_read), to_mib(size)),
                    );
                }
            }
        }

        hasher.finalize()
    };

    progress(METADATA_PROGRESS, "Extracting file metadata...");

    let image = parser.parse(path).await?;

    let allocated = image.allocated_bytes.unwrap_or_else(|| {
        // Without a filesystem walk, assume the common 70/30 split so the
        // summary still gives an order of magnitude.
        (size as f64 * 0.7) as u64
    });
    let unallocated = size.saturating_sub(allocated);

    let mut recent_files = image.recent_files.clone();
    recent_files.truncate(MAX_RECENT_FILES);

    let total_files = image.total_files();

    Ok(RawFeatures {
        filename: Some(filename),
        recent_files: Some(recent_files),
        space: Some(format!(
            "Allocated: {:.2} MB, Unallocated: {:.2} MB",
            to_mib(allocated),
            to_mib(unallocated)
        )),
        file_system: image.file_system.clone(),
        hash: Some(digest.to_combined_string()),
        keys: Some(image.case_keys.clone()),
        total_files: Some(total_files),
        file_types: Some(image.file_types),
        size_bytes: Some(size),
    })
}
