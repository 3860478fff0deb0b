//! Fixed-size pool of named worker threads running a batch of jobs.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool needs at least one worker")]
    NoWorkers,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Thread name prefix, also used in logs.
    pub name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            name: "shop-worker".to_string(),
        }
    }
}

impl PoolConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Result of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome<T> {
    Completed(T),
    /// The job panicked; the message is kept when it was a string.
    Panicked(String),
}

impl<T> JobOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            JobOutcome::Completed(value) => Some(value),
            JobOutcome::Panicked(_) => None,
        }
    }
}

/// Runs every job of a batch on a fixed number of threads and waits for all.
#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    config: PoolConfig,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        if config.workers == 0 {
            return Err(PoolError::NoWorkers);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Run all `jobs` and return their outcomes in submission order.
    ///
    /// Workers pull the next pending job until none are left. A panicking job
    /// is reported as [`JobOutcome::Panicked`] and does not stop its worker.
    pub fn invoke_all<T, F>(&self, jobs: Vec<F>) -> Result<Vec<JobOutcome<T>>, PoolError>
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        let total = jobs.len();
        let pending: Vec<Mutex<Option<F>>> = jobs.into_iter().map(|job| Mutex::new(Some(job))).collect();
        let results: Vec<Mutex<Option<JobOutcome<T>>>> = (0..total).map(|_| Mutex::new(None)).collect();
        let cursor = AtomicUsize::new(0);
        let workers = self.config.workers.min(total.max(1));

        info!(pool = %self.config.name, workers, jobs = total, "worker pool started");

        thread::scope(|scope| -> Result<(), PoolError> {
            for n in 0..workers {
                let (pending, results, cursor) = (&pending, &results, &cursor);
                thread::Builder::new()
                    .name(format!("{}-{}", self.config.name, n + 1))
                    .spawn_scoped(scope, move || {
                        loop {
                            let idx = cursor.fetch_add(1, Ordering::SeqCst);
                            if idx >= total {
                                break;
                            }
                            let Some(job) = take(&pending[idx]) else {
                                continue;
                            };

                            debug!(job = idx, "job claimed");
                            let outcome = run(job);
                            if let JobOutcome::Panicked(ref message) = outcome {
                                warn!(job = idx, panic = %message, "job panicked");
                            }
                            put(&results[idx], outcome);
                        }
                    })?;
            }
            Ok(())
        })?;

        info!(pool = %self.config.name, jobs = total, "worker pool drained");

        Ok(results
            .into_iter()
            .map(|slot| {
                slot.into_inner()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .unwrap_or_else(|| JobOutcome::Panicked("job never ran".to_string()))
            })
            .collect())
    }
}

fn run<T, F: FnOnce() -> T>(job: F) -> JobOutcome<T> {
    match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(value) => JobOutcome::Completed(value),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            JobOutcome::Panicked(message)
        }
    }
}

fn take<F>(slot: &Mutex<Option<F>>) -> Option<F> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

fn put<T>(slot: &Mutex<Option<T>>, value: T) {
    match slot.lock() {
        Ok(mut guard) => *guard = Some(value),
        Err(poisoned) => *poisoned.into_inner() = Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn outcomes_keep_submission_order() {
        let pool = WorkerPool::new(PoolConfig::default()).unwrap();
        let jobs: Vec<_> = (0..10).map(|n| move || n * n).collect();

        let outcomes = pool.invoke_all(jobs).unwrap();
        let values: Vec<i32> = outcomes.into_iter().filter_map(JobOutcome::completed).collect();
        assert_eq!(values, (0..10).map(|n| n * n).collect::<Vec<_>>());
    }

    #[test]
    fn jobs_run_on_named_workers_only() {
        let pool = WorkerPool::new(PoolConfig::default().with_workers(2).with_name("test-pool")).unwrap();
        let jobs: Vec<_> = (0..8)
            .map(|_| || thread::current().name().map(str::to_string).unwrap_or_default())
            .collect();

        let names: HashSet<String> = pool
            .invoke_all(jobs)
            .unwrap()
            .into_iter()
            .filter_map(JobOutcome::completed)
            .collect();
        assert!(!names.is_empty() && names.len() <= 2);
        assert!(names.iter().all(|n| n.starts_with("test-pool-")));
    }

    #[test]
    fn panicking_job_is_isolated() {
        let pool = WorkerPool::new(PoolConfig::default().with_workers(1)).unwrap();
        let jobs: Vec<Box<dyn FnOnce() -> u8 + Send>> = vec![
            Box::new(|| 1),
            Box::new(|| panic!("boom")),
            Box::new(|| 3),
        ];

        let outcomes = pool.invoke_all(jobs).unwrap();
        assert_eq!(outcomes[0], JobOutcome::Completed(1));
        assert_eq!(outcomes[1], JobOutcome::Panicked("boom".to_string()));
        assert_eq!(outcomes[2], JobOutcome::Completed(3));
    }

    #[test]
    fn empty_batch_and_zero_workers() {
        let pool = WorkerPool::new(PoolConfig::default()).unwrap();
        let none: Vec<fn()> = Vec::new();
        assert!(pool.invoke_all(none).unwrap().is_empty());

        assert!(matches!(
            WorkerPool::new(PoolConfig::default().with_workers(0)),
            Err(PoolError::NoWorkers)
        ));
    }
}
