//! Application state shared across handlers.

use crate::jobs::JobRegistry;
use crate::latest::LatestResultCache;
use exhibit_core::JobId;
use exhibit_core::config::AppConfig;
use exhibit_extract::ImageParser;
use exhibit_stores::StoreRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;

/// Registry tracking spawned extraction tasks and detecting panics.
///
/// A panicking worker never reaches its own error path, leaving the job
/// stuck at its last reported progress forever. This registry keeps the
/// task handles and periodically marks jobs whose task panicked as
/// failed, so pollers see a terminal status within ~10s.
pub struct JobTaskRegistry {
    /// Map of job_id -> task handle
    tasks: Arc<Mutex<HashMap<JobId, JoinHandle<()>>>>,
    /// Job registry for marking panicked jobs failed
    jobs: Arc<JobRegistry>,
}

impl JobTaskRegistry {
    /// Create a new task registry.
    pub fn new(jobs: Arc<JobRegistry>) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
            jobs,
        }
    }

    /// Register a spawned extraction task.
    pub async fn register(&self, job_id: JobId, handle: JoinHandle<()>) {
        self.tasks.lock().await.insert(job_id, handle);
    }

    /// Spawn a watchdog task that periodically checks for panicked tasks.
    /// Returns the watchdog's JoinHandle (caller should keep it to prevent early termination).
    pub fn spawn_watchdog(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(10)).await;
                self.check_tasks().await;
            }
        })
    }

    /// Check all tracked tasks for completion or panics.
    pub async fn check_tasks(&self) {
        let mut finished_handles = Vec::new();

        // Collect finished handles while holding the lock only briefly.
        {
            let mut tasks = self.tasks.lock().await;
            let finished_jobs: Vec<JobId> = tasks
                .iter()
                .filter(|(_, handle)| handle.is_finished())
                .map(|(job_id, _)| *job_id)
                .collect();

            for job_id in finished_jobs {
                if let Some(handle) = tasks.remove(&job_id) {
                    finished_handles.push((job_id, handle));
                }
            }
        }

        for (job_id, handle) in finished_handles {
            match handle.await {
                Err(join_err) if join_err.is_panic() => {
                    tracing::error!(
                        job_id = %job_id,
                        panic = ?join_err,
                        "Extraction task panicked, marking job as failed"
                    );
                    crate::metrics::JOBS_PANICKED.inc();
                    crate::metrics::JOBS_FAILED.inc();
                    crate::metrics::JOBS_ACTIVE.dec();
                    self.jobs.fail(job_id, "extraction task panicked");
                }
                Err(join_err) if join_err.is_cancelled() => {
                    tracing::warn!(job_id = %job_id, "Extraction task was cancelled");
                    crate::metrics::JOBS_ACTIVE.dec();
                    self.jobs.fail(job_id, "extraction task cancelled");
                }
                Ok(_) => {
                    tracing::debug!(job_id = %job_id, "Extraction task finished");
                }
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = ?e, "Extraction task failed with unknown error");
                    crate::metrics::JOBS_ACTIVE.dec();
                    self.jobs.fail(job_id, "extraction task failed");
                }
            }
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// All known jobs.
    pub jobs: Arc<JobRegistry>,
    /// Latest completed extraction, for chart projections.
    pub latest: Arc<LatestResultCache>,
    /// Configured store backends for fan-out.
    pub stores: StoreRegistry,
    /// Image metadata parser.
    pub parser: Arc<dyn ImageParser>,
    /// Task registry for panic detection.
    pub task_registry: Arc<JobTaskRegistry>,
    /// Bounds the number of extractions running at once.
    pub worker_permits: Arc<Semaphore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: AppConfig, stores: StoreRegistry, parser: Arc<dyn ImageParser>) -> Self {
        let jobs = Arc::new(JobRegistry::new());
        let task_registry = Arc::new(JobTaskRegistry::new(jobs.clone()));
        let worker_permits = Arc::new(Semaphore::new(config.server.max_concurrent_jobs));

        Self {
            config: Arc::new(config),
            jobs,
            latest: Arc::new(LatestResultCache::new()),
            stores,
            parser,
            task_registry,
            worker_permits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exhibit_core::JobStatus;

    #[tokio::test]
    async fn watchdog_marks_panicked_job_failed() {
        let jobs = Arc::new(JobRegistry::new());
        let registry = JobTaskRegistry::new(jobs.clone());

        let job_id = JobId::generate();
        let job = jobs.create(job_id);
        {
            let mut job = job.write().unwrap();
            job.transition(JobStatus::Processing);
        }

        let handle = tokio::spawn(async {
            panic!("worker blew up");
        });
        registry.register(job_id, handle).await;

        // Let the panicking task finish before checking.
        tokio::time::sleep(Duration::from_millis(50)).await;
        registry.check_tasks().await;

        let view = jobs.view(job_id).unwrap();
        assert_eq!(view.status, JobStatus::Error);
        assert_eq!(view.error.as_deref(), Some("extraction task panicked"));
    }

    #[tokio::test]
    async fn watchdog_leaves_successful_job_alone() {
        let jobs = Arc::new(JobRegistry::new());
        let registry = JobTaskRegistry::new(jobs.clone());

        let job_id = JobId::generate();
        let job = jobs.create(job_id);
        {
            let mut job = job.write().unwrap();
            job.transition(JobStatus::Processing);
            job.transition(JobStatus::Completed);
        }

        let handle = tokio::spawn(async {});
        registry.register(job_id, handle).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        registry.check_tasks().await;

        let view = jobs.view(job_id).unwrap();
        assert_eq!(view.status, JobStatus::Completed);
    }
}
