//! Upload worker pool
//!
//! Runs one uploader invocation per job, either strictly one after another or
//! through a fixed number of concurrency slots. Each job runs in its own task
//! so a panicking uploader only fails its own job.

use chrono::Utc;
use std::sync::Arc;
use storesync_core::domain::dispatch::{DispatchJob, DispatchReport, UploadOutcome};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::service::Uploader;

/// Worker pool with an optional fixed slot count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// `None` means sequential execution
    slots: Option<usize>,
}

impl WorkerPool {
    /// Creates a pool; `None` or `Some(0)` selects sequential execution
    pub fn new(concurrency: Option<usize>) -> Self {
        Self {
            slots: concurrency.filter(|&n| n > 0),
        }
    }

    pub fn slots(&self) -> Option<usize> {
        self.slots
    }

    /// Runs every job exactly once and collects the outcomes
    pub async fn run(&self, jobs: Vec<DispatchJob>, uploader: Arc<dyn Uploader>) -> DispatchReport {
        let outcomes = match self.slots {
            None => Self::run_sequential(jobs, uploader).await,
            Some(slots) => Self::run_pooled(jobs, uploader, slots).await,
        };
        DispatchReport::new(outcomes)
    }

    /// Runs jobs in list order, waiting for each to finish before the next
    async fn run_sequential(
        jobs: Vec<DispatchJob>,
        uploader: Arc<dyn Uploader>,
    ) -> Vec<UploadOutcome> {
        info!("Uploading {} repositories sequentially", jobs.len());

        let mut outcomes = Vec::with_capacity(jobs.len());
        for job in jobs {
            let handle = Self::spawn_upload(job.clone(), Arc::clone(&uploader), None);
            outcomes.push(Self::join(job, handle).await);
        }
        outcomes
    }

    /// Runs jobs with at most `slots` uploads in flight
    ///
    /// A slot is acquired before a job's task is spawned, so dispatch itself
    /// waits while the pool is full. More slots than jobs are never allocated,
    /// which also keeps the permit count within the semaphore's limit.
    async fn run_pooled(
        jobs: Vec<DispatchJob>,
        uploader: Arc<dyn Uploader>,
        slots: usize,
    ) -> Vec<UploadOutcome> {
        let slots = slots.min(jobs.len()).clamp(1, Semaphore::MAX_PERMITS);
        info!(
            "Uploading {} repositories with {} concurrent slot(s)",
            jobs.len(),
            slots
        );

        let semaphore = Arc::new(Semaphore::new(slots));
        let mut handles = Vec::with_capacity(jobs.len());
        let mut outcomes = Vec::with_capacity(jobs.len());

        for job in jobs {
            match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => {
                    let handle = Self::spawn_upload(job.clone(), Arc::clone(&uploader), Some(permit));
                    handles.push((job, handle));
                }
                Err(e) => {
                    // The semaphore is never closed; keep the job accounted for anyway
                    warn!("No slot available for {}: {}", job.repository, e);
                    outcomes.push(UploadOutcome::failed(
                        job,
                        Utc::now(),
                        None,
                        format!("no worker slot available: {}", e),
                    ));
                }
            }
        }

        for (job, handle) in handles {
            outcomes.push(Self::join(job, handle).await);
        }
        outcomes
    }

    /// Spawns a task for one upload; the permit is released when the task ends
    fn spawn_upload(
        job: DispatchJob,
        uploader: Arc<dyn Uploader>,
        permit: Option<tokio::sync::OwnedSemaphorePermit>,
    ) -> JoinHandle<UploadOutcome> {
        tokio::spawn(async move {
            let _permit = permit;
            debug!("Uploading {} (job {})", job.repository, job.id);

            let outcome = uploader.upload(&job).await;
            if outcome.success {
                info!("Uploaded {}", job.repository);
            } else {
                warn!(
                    "Upload of {} failed: {}",
                    job.repository,
                    outcome.error_message.as_deref().unwrap_or("unknown error")
                );
            }
            outcome
        })
    }

    /// Waits for an upload task, turning a panic into a failed outcome
    async fn join(job: DispatchJob, handle: JoinHandle<UploadOutcome>) -> UploadOutcome {
        let now = Utc::now();
        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Upload task for {} panicked: {}", job.repository, e);
                UploadOutcome::failed(job, now, None, format!("upload task panicked: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use storesync_core::domain::repository::RepositoryIdentifier;

    /// Records invocations and the highest number of concurrent uploads
    #[derive(Default)]
    struct RecordingUploader {
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail: HashSet<String>,
        panic_on: HashSet<String>,
        delay: Duration,
    }

    impl RecordingUploader {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Uploader for RecordingUploader {
        async fn upload(&self, job: &DispatchJob) -> UploadOutcome {
            let started_at = Utc::now();
            let name = job.repository.to_string();
            self.calls.lock().unwrap().push(name.clone());

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panic_on.contains(&name) {
                panic!("uploader crashed on {}", name);
            }
            if self.fail.contains(&name) {
                UploadOutcome::failed(job.clone(), started_at, Some(1), "exit status: 1")
            } else {
                UploadOutcome::succeeded(job.clone(), started_at)
            }
        }
    }

    fn jobs(names: &[&str]) -> Vec<DispatchJob> {
        DispatchJob::from_identifiers(
            names
                .iter()
                .map(|n| RepositoryIdentifier::new(*n).unwrap())
                .collect(),
        )
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("FNNDSC/pl-{i}")).collect()
    }

    #[test]
    fn test_zero_concurrency_is_sequential() {
        assert_eq!(WorkerPool::new(None).slots(), None);
        assert_eq!(WorkerPool::new(Some(0)).slots(), None);
        assert_eq!(WorkerPool::new(Some(3)).slots(), Some(3));
        assert_eq!(WorkerPool::default(), WorkerPool::new(None));
    }

    #[tokio::test]
    async fn test_sequential_preserves_order_one_at_a_time() {
        let uploader = Arc::new(RecordingUploader::with_delay(Duration::from_millis(5)));
        let report = WorkerPool::new(None)
            .run(jobs(&["FNNDSC/a", "FNNDSC/b"]), uploader.clone())
            .await;

        assert_eq!(uploader.calls(), vec!["FNNDSC/a", "FNNDSC/b"]);
        assert_eq!(uploader.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded(), 2);
    }

    #[tokio::test]
    async fn test_sequential_continues_after_failure() {
        let uploader = Arc::new(RecordingUploader {
            fail: HashSet::from(["FNNDSC/a".to_string()]),
            ..Default::default()
        });
        let report = WorkerPool::new(Some(0))
            .run(jobs(&["FNNDSC/a", "FNNDSC/b", "FNNDSC/c"]), uploader.clone())
            .await;

        assert_eq!(uploader.calls(), vec!["FNNDSC/a", "FNNDSC/b", "FNNDSC/c"]);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_respects_slot_limit() {
        let all = names(12);
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        let uploader = Arc::new(RecordingUploader::with_delay(Duration::from_millis(20)));

        let report = WorkerPool::new(Some(3))
            .run(jobs(&refs), uploader.clone())
            .await;

        let max = uploader.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 3, "max in flight was {max}");
        assert!(max >= 2, "pool never ran jobs concurrently");

        let mut calls = uploader.calls();
        calls.sort();
        let mut expected = all.clone();
        expected.sort();
        assert_eq!(calls, expected);
        assert_eq!(report.total(), 12);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pool_runs_both_jobs() {
        let uploader = Arc::new(RecordingUploader::with_delay(Duration::from_millis(5)));
        let report = WorkerPool::new(Some(2))
            .run(jobs(&["FNNDSC/a", "FNNDSC/b"]), uploader.clone())
            .await;

        let mut calls = uploader.calls();
        calls.sort();
        assert_eq!(calls, vec!["FNNDSC/a", "FNNDSC/b"]);
        assert_eq!(report.succeeded(), 2);
    }

    #[tokio::test]
    async fn test_pool_isolates_failures_and_panics() {
        let uploader = Arc::new(RecordingUploader {
            fail: HashSet::from(["FNNDSC/b".to_string()]),
            panic_on: HashSet::from(["FNNDSC/c".to_string()]),
            ..Default::default()
        });
        let report = WorkerPool::new(Some(2))
            .run(
                jobs(&["FNNDSC/a", "FNNDSC/b", "FNNDSC/c", "FNNDSC/d"]),
                uploader.clone(),
            )
            .await;

        assert_eq!(uploader.calls().len(), 4);
        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded(), 2);

        // Report is in discovery order regardless of completion order
        let failed: Vec<_> = report.failures().map(|o| o.repository().as_str()).collect();
        assert_eq!(failed, vec!["FNNDSC/b", "FNNDSC/c"]);
        let panicked = &report.outcomes()[2];
        assert!(
            panicked
                .error_message
                .as_deref()
                .unwrap()
                .contains("panicked")
        );
    }

    #[tokio::test]
    async fn test_empty_job_list() {
        let uploader = Arc::new(RecordingUploader::default());
        let report = WorkerPool::new(Some(4)).run(Vec::new(), uploader.clone()).await;
        assert_eq!(report.total(), 0);
        assert!(uploader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_huge_slot_count_runs_all_jobs() {
        let uploader = Arc::new(RecordingUploader::default());
        let report = WorkerPool::new(Some(usize::MAX / 2))
            .run(jobs(&["FNNDSC/a", "FNNDSC/b"]), uploader.clone())
            .await;

        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(uploader.calls().len(), 2);
    }
}
