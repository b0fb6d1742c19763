//! Concurrent job orchestrator.
//!
//! Runs a batch of URLs with a bounded number of workers. Each URL becomes
//! one task in a `JoinSet`; a semaphore keeps at most `worker_count` of them
//! inside the extractor at a time. Results are collected in completion order.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::core::config::workers;
use crate::core::error::AppError;
use crate::download::format::FormatChoice;
use crate::download::runner::{JobResult, JobRunner};

/// Label shown in progress lines for the job at `index` (0-based)
pub fn job_label(index: usize) -> String {
    format!("Job-{}", index + 1)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("Job panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("Job panicked: {}", s)
    } else {
        "Job panicked".to_string()
    }
}

/// Turns a task that could not be joined into a failed result for its URL.
fn failed_join(pending: &mut HashMap<Id, String>, err: &JoinError) -> Option<JobResult> {
    let url = pending.remove(&err.id())?;
    log::error!("Job task for {} failed to join: {}", url, err);
    Some(JobResult::failed(&url, format!("Job task failed: {}", err)))
}

/// Bounded worker pool over a [`JobRunner`]
pub struct Orchestrator {
    runner: JobRunner,
}

impl Orchestrator {
    pub fn new(runner: JobRunner) -> Self {
        Self { runner }
    }

    /// Runs every URL once and returns one result per URL, in completion order.
    ///
    /// `worker_count` is clamped to `[1, 5]`. Individual failures (including a
    /// panicking job) are reported as failed results and never stop the batch.
    ///
    /// # Errors
    /// Returns [`AppError::Cancelled`] when `cancel` fires; unfinished jobs are
    /// aborted and their extractor processes killed.
    pub async fn run_all(
        &self,
        urls: &[String],
        format: FormatChoice,
        output_dir: &Path,
        worker_count: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<JobResult>, AppError> {
        let workers = workers::clamp(worker_count);
        log::info!("Processing {} job(s) with {} worker(s)", urls.len(), workers);

        let semaphore = Arc::new(Semaphore::new(workers));
        let output_dir: PathBuf = output_dir.to_path_buf();
        let mut set = JoinSet::new();
        let mut pending: HashMap<Id, String> = HashMap::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            let runner = self.runner.clone();
            let semaphore = Arc::clone(&semaphore);
            let output_dir = output_dir.clone();
            let url = url.clone();
            let label = job_label(index);

            let task_url = url.clone();
            let handle = set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return JobResult::failed(&url, format!("Worker pool closed: {}", e)),
                };
                AssertUnwindSafe(runner.run(&label, &url, format, &output_dir))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        let message = panic_message(payload);
                        log::error!("[{}] {}", label, message);
                        JobResult::failed(&url, message)
                    })
            });
            pending.insert(handle.id(), task_url);
        }

        let mut results = Vec::with_capacity(urls.len());
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::warn!("Cancellation requested, aborting {} unfinished job(s)", set.len());
                    set.shutdown().await;
                    return Err(AppError::Cancelled);
                }
                joined = set.join_next_with_id() => match joined {
                    Some(Ok((id, result))) => {
                        pending.remove(&id);
                        results.push(result);
                    }
                    Some(Err(e)) => match failed_join(&mut pending, &e) {
                        Some(result) => results.push(result),
                        None => log::error!("Unknown job task failed to join: {}", e),
                    },
                    None => break,
                },
            }
        }

        Ok(results)
    }
}
