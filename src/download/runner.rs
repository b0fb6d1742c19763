//! Single-job runner.
//!
//! Runs one URL through the extractor and turns whatever happens into a
//! [`JobResult`]. Extractor errors become [`JobOutcome::Failed`] values; the
//! runner itself never fails.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::error::AppError;
use crate::download::builder;
use crate::download::classify::{classify, Classification};
use crate::download::format::FormatChoice;
use crate::download::progress::{ProgressEvent, ProgressHook, ProgressThrottle};
use crate::download::source::Extractor;

/// What happened to one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success {
        /// Resolved output template the job wrote under
        output_path: String,
        /// Final files reported by the extractor
        files: Vec<PathBuf>,
    },
    Failed {
        message: String,
    },
}

/// Result of one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub url: String,
    pub classification: Classification,
    pub outcome: JobOutcome,
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Success { .. })
    }

    /// Failure message, if the job failed
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            JobOutcome::Failed { message } => Some(message),
            JobOutcome::Success { .. } => None,
        }
    }

    /// Produced files (empty on failure)
    pub fn files(&self) -> &[PathBuf] {
        match &self.outcome {
            JobOutcome::Success { files, .. } => files,
            JobOutcome::Failed { .. } => &[],
        }
    }

    /// Builds a failed result, classifying the URL.
    pub fn failed(url: &str, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            classification: classify(url),
            outcome: JobOutcome::Failed {
                message: non_empty_message(message.into()),
            },
        }
    }
}

fn non_empty_message(message: String) -> String {
    if message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        message
    }
}

/// Runs single jobs against an extractor, reporting progress to a hook
#[derive(Clone)]
pub struct JobRunner {
    extractor: Arc<dyn Extractor>,
    hook: Arc<dyn ProgressHook>,
}

impl JobRunner {
    pub fn new(extractor: Arc<dyn Extractor>, hook: Arc<dyn ProgressHook>) -> Self {
        Self { extractor, hook }
    }

    pub fn extractor(&self) -> &Arc<dyn Extractor> {
        &self.extractor
    }

    /// Classifies `url`, builds its descriptor and downloads it into `output_dir`.
    pub async fn run(&self, label: &str, url: &str, format: FormatChoice, output_dir: &Path) -> JobResult {
        let classification = classify(url);
        let descriptor = builder::build(classification, format, output_dir);
        log::info!("[{}] Starting {} ({}, {})", label, url, classification, format);

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<ProgressEvent>();
        let mut throttle = ProgressThrottle::new();
        let result = {
            let download = self.extractor.download(url, &descriptor, progress_tx);
            tokio::pin!(download);
            loop {
                tokio::select! {
                    Some(event) = progress_rx.recv() => {
                        if throttle.should_emit(&event) {
                            self.hook.on_progress(label, &event);
                        }
                    }
                    result = &mut download => break result,
                }
            }
        };

        // Anything sent just before the extractor returned
        while let Ok(event) = progress_rx.try_recv() {
            if throttle.should_emit(&event) {
                self.hook.on_progress(label, &event);
            }
        }

        let outcome = match result {
            Ok(output) => {
                log::info!("[{}] Done {} ({} file(s))", label, url, output.files.len());
                JobOutcome::Success {
                    output_path: descriptor.output_template,
                    files: output.files,
                }
            }
            Err(e) => {
                let message = match e {
                    AppError::Download(message) => message,
                    other => other.to_string(),
                };
                log::warn!("[{}] Failed {}: {}", label, url, message);
                JobOutcome::Failed {
                    message: non_empty_message(message),
                }
            }
        };

        JobResult {
            url: url.to_string(),
            classification,
            outcome,
        }
    }
}
