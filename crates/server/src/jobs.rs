//! Job lifecycle tracking and the background extraction worker.

use crate::metrics;
use crate::state::AppState;
use exhibit_core::{JobId, JobResult, JobStatus, JobView, normalize};
use exhibit_stores::dispatch;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// How often the retention sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Mutable state of one extraction job.
#[derive(Debug)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub result: Option<JobResult>,
    pub error: Option<String>,
    /// Set once the job reaches a terminal status; drives retention.
    pub finished_at: Option<Instant>,
}

impl Job {
    fn new(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Uploading,
            progress: 0,
            message: "Uploading file...".to_string(),
            result: None,
            error: None,
            finished_at: None,
        }
    }

    /// Advance progress, never letting it move backwards.
    ///
    /// Progress reports from the extractor race with pipeline milestones,
    /// so a stale lower value is dropped rather than applied.
    pub fn set_progress(&mut self, progress: u8, message: impl Into<String>) {
        if progress >= self.progress {
            self.progress = progress;
            self.message = message.into();
        }
    }

    /// Apply a status transition if the lifecycle allows it.
    pub fn transition(&mut self, next: JobStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        if next.is_terminal() {
            self.finished_at = Some(Instant::now());
        }
        true
    }

    fn complete(&mut self, result: JobResult) {
        if self.transition(JobStatus::Completed) {
            self.progress = 100;
            self.message = "Extraction completed!".to_string();
            self.result = Some(result);
        }
    }

    fn fail(&mut self, error: impl Into<String>) {
        if self.transition(JobStatus::Error) {
            self.message = "Extraction failed".to_string();
            self.error = Some(error.into());
        }
    }

    fn view(&self) -> JobView {
        JobView {
            job_id: self.id,
            status: self.status,
            progress: self.progress,
            message: self.message.clone(),
            result: self.result.clone(),
            error: self.error.clone(),
        }
    }
}

/// One job shared between the worker and status queries.
pub type SharedJob = Arc<RwLock<Job>>;

fn write_job(job: &SharedJob) -> std::sync::RwLockWriteGuard<'_, Job> {
    job.write().unwrap_or_else(PoisonError::into_inner)
}

fn read_job(job: &SharedJob) -> std::sync::RwLockReadGuard<'_, Job> {
    job.read().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory registry of all known jobs.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, SharedJob>>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh job under `id` in the Uploading state.
    ///
    /// The id is generated by the caller so the persisted upload can be
    /// named after it before the job becomes visible.
    pub fn create(&self, id: JobId) -> SharedJob {
        let job = Arc::new(RwLock::new(Job::new(id)));
        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, job.clone());
        job
    }

    /// Look up a job by id.
    pub fn get(&self, id: JobId) -> Option<SharedJob> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Snapshot a job for a status response.
    pub fn view(&self, id: JobId) -> Option<JobView> {
        self.get(id).map(|job| read_job(&job).view())
    }

    /// Mark a job failed, used when its worker dies without reporting.
    pub fn fail(&self, id: JobId, error: &str) {
        if let Some(job) = self.get(id) {
            write_job(&job).fail(error);
        }
    }

    /// Evict terminal jobs whose retention window has passed.
    ///
    /// Returns the number of evicted jobs. In-flight jobs are never
    /// touched regardless of age.
    pub fn sweep_expired(&self, retention: Duration) -> usize {
        let now = Instant::now();
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let before = jobs.len();
        jobs.retain(|_, job| {
            let job = job.read().unwrap_or_else(PoisonError::into_inner);
            match job.finished_at {
                Some(finished) => now.duration_since(finished) < retention,
                None => true,
            }
        });
        before - jobs.len()
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no job is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Register and spawn a background extraction for a persisted upload.
///
/// Returns immediately; the caller polls `job_id` for progress.
pub async fn spawn_extraction(
    state: &AppState,
    job_id: JobId,
    path: PathBuf,
    filename: String,
    requested: Vec<String>,
) {
    let job = state.jobs.create(job_id);
    metrics::JOBS_SUBMITTED.inc();
    metrics::JOBS_ACTIVE.inc();

    tracing::info!(job_id = %job_id, path = %path.display(), stores = ?requested, "Extraction job submitted");

    let handle = tokio::spawn(run_extraction(state.clone(), job, path, filename, requested));
    state.task_registry.register(job_id, handle).await;
}

/// The full pipeline for one submitted evidence file.
///
/// Runs under a concurrency permit; submissions beyond the configured
/// worker limit stay in Uploading until a permit frees up.
async fn run_extraction(
    state: AppState,
    job: SharedJob,
    path: PathBuf,
    filename: String,
    requested: Vec<String>,
) {
    let job_id = read_job(&job).id;

    let _permit = match state.worker_permits.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            write_job(&job).fail("worker pool shut down");
            metrics::JOBS_FAILED.inc();
            metrics::JOBS_ACTIVE.dec();
            return;
        }
    };

    {
        let mut job = write_job(&job);
        job.transition(JobStatus::Processing);
        job.set_progress(10, "Processing evidence image...");
    }

    let started = Instant::now();
    let progress_job = job.clone();
    let progress = move |p: u8, msg: &str| {
        progress_job
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_progress(p, msg);
    };

    let mut raw = match exhibit_extract::extract(&path, state.parser.as_ref(), &progress).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "Extraction failed");
            write_job(&job).fail(e.to_string());
            metrics::JOBS_FAILED.inc();
            metrics::JOBS_ACTIVE.dec();
            return;
        }
    };
    metrics::EXTRACTION_DURATION.observe(started.elapsed().as_secs_f64());

    // The spool name carries the job-id prefix for collision safety;
    // records keep the filename as submitted.
    raw.filename = Some(filename);

    write_job(&job).set_progress(70, "Analyzing features...");
    let record = Arc::new(normalize(raw));

    // Publish before fan-out so charts reflect the newest completion even
    // if a store backend is slow or down.
    state.latest.publish(record.clone());

    write_job(&job).set_progress(80, "Storing results...");
    let outcomes = dispatch(&state.stores, &record, &requested).await;
    for outcome in &outcomes {
        metrics::record_store_outcome(&outcome.backend, outcome.ok);
    }
    let failed = outcomes.iter().filter(|o| !o.ok).count();
    if failed > 0 {
        tracing::warn!(
            job_id = %job_id,
            failed,
            total = outcomes.len(),
            "Some store backends rejected the record"
        );
    }

    write_job(&job).complete(JobResult::from_record(&record));
    metrics::JOBS_COMPLETED.inc();
    metrics::JOBS_ACTIVE.dec();
    tracing::info!(job_id = %job_id, filename = %record.filename, "Extraction job completed");
}

/// Spawn the periodic sweep evicting terminal jobs past retention.
pub fn spawn_retention_sweep(jobs: Arc<JobRegistry>, retention: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = jobs.sweep_expired(retention);
            if evicted > 0 {
                tracing::info!(evicted, "Evicted expired jobs");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_never_goes_backwards() {
        let job = JobRegistry::new().create(JobId::generate());
        let mut job = write_job(&job);
        job.set_progress(40, "Hashing...");
        job.set_progress(25, "stale report");
        assert_eq!(job.progress, 40);
        assert_eq!(job.message, "Hashing...");
        job.set_progress(65, "Extracting file metadata...");
        assert_eq!(job.progress, 65);
    }

    #[test]
    fn terminal_jobs_reject_further_transitions() {
        let job = JobRegistry::new().create(JobId::generate());
        let mut job = write_job(&job);
        assert!(job.transition(JobStatus::Processing));
        job.fail("disk unreadable");
        assert_eq!(job.status, JobStatus::Error);
        assert!(job.finished_at.is_some());

        assert!(!job.transition(JobStatus::Completed));
        assert!(!job.transition(JobStatus::Processing));
        assert_eq!(job.status, JobStatus::Error);
    }

    #[test]
    fn complete_sets_full_progress_and_result() {
        let registry = JobRegistry::new();
        let id = JobId::generate();
        let job = registry.create(id);
        {
            let mut job = write_job(&job);
            job.transition(JobStatus::Processing);
            let record = normalize(exhibit_core::RawFeatures {
                filename: Some("disk.dd".to_string()),
                ..Default::default()
            });
            job.complete(JobResult::from_record(&record));
        }

        let view = registry.view(id).unwrap();
        assert_eq!(view.status, JobStatus::Completed);
        assert_eq!(view.progress, 100);
        assert!(view.result.is_some());
        assert!(view.error.is_none());
    }

    #[test]
    fn sweep_evicts_only_expired_terminal_jobs() {
        let registry = JobRegistry::new();

        let _running = registry.create(JobId::generate());

        let finished_id = JobId::generate();
        let finished = registry.create(finished_id);
        {
            let mut job = write_job(&finished);
            job.transition(JobStatus::Processing);
            job.fail("boom");
            // Age the job past the retention window.
            job.finished_at = Some(Instant::now() - Duration::from_secs(120));
        }

        let fresh_id = JobId::generate();
        let fresh = registry.create(fresh_id);
        {
            let mut job = write_job(&fresh);
            job.transition(JobStatus::Processing);
            job.fail("boom");
        }

        let evicted = registry.sweep_expired(Duration::from_secs(60));
        assert_eq!(evicted, 1);
        assert!(registry.get(finished_id).is_none());
        assert!(registry.get(fresh_id).is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_fail_is_noop_for_terminal_jobs() {
        let registry = JobRegistry::new();
        let id = JobId::generate();
        let job = registry.create(id);
        {
            let mut job = write_job(&job);
            job.transition(JobStatus::Processing);
            let record = normalize(exhibit_core::RawFeatures::default());
            job.complete(JobResult::from_record(&record));
        }

        registry.fail(id, "late panic report");
        let view = registry.view(id).unwrap();
        assert_eq!(view.status, JobStatus::Completed);
        assert!(view.error.is_none());
    }
}
