//! Mock extractor
//!
//! Simulates yt-dlp with configurable delays, failures and panics. A
//! successful run writes a real file of the configured size where the job's
//! output template says it should go, so delivery and cleanup code can be
//! tested against the filesystem.

#![allow(dead_code)] // Not every test binary uses every knob

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use ytgrab::download::builder::JobDescriptor;
use ytgrab::download::progress::{ProgressEvent, ProgressInfo};
use ytgrab::download::source::{DownloadOutput, Extractor, MediaInfo};
use ytgrab::AppError;

/// Configuration for the mock extractor
#[derive(Debug, Clone)]
pub struct MockExtractorConfig {
    /// Delay for every download unless overridden per URL
    pub delay: Duration,
    /// Per-URL delay overrides
    pub delays: HashMap<String, Duration>,
    /// URLs that fail, with the error message to report
    pub fail_with: HashMap<String, String>,
    /// URLs whose download panics
    pub panic_on: Vec<String>,
    /// Size of each produced file, in bytes
    pub file_size: u64,
    /// Files produced per successful job
    pub files_per_job: usize,
}

impl Default for MockExtractorConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(20),
            delays: HashMap::new(),
            fail_with: HashMap::new(),
            panic_on: Vec::new(),
            file_size: 1024,
            files_per_job: 1,
        }
    }
}

impl MockExtractorConfig {
    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.fail_with.insert(url.to_string(), message.to_string());
        self
    }

    pub fn panic_on(mut self, url: &str) -> Self {
        self.panic_on.push(url.to_string());
        self
    }

    pub fn delay_for(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }
}

/// Scripted stand-in for the yt-dlp backend
pub struct MockExtractor {
    config: MockExtractorConfig,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

/// Decrements the in-flight counter even when the download is aborted
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockExtractor {
    pub fn new(config: MockExtractorConfig) -> Self {
        Self {
            config,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Highest number of downloads that ran at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// URLs passed to `download`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Fills in `%(field|default)s` placeholders the way yt-dlp would.
    fn render_template(template: &str, title: &str, ext: &str) -> String {
        let mut out = String::new();
        let mut rest = template;
        while let Some(start) = rest.find("%(") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find(")s") else {
                out.push_str(&rest[start..]);
                return out;
            };
            let field = &after[..end];
            let (name, default) = field.split_once('|').unwrap_or((field, "NA"));
            let value = match name {
                "title" => title,
                "ext" => ext,
                _ => default,
            };
            out.push_str(value);
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn download(
        &self,
        url: &str,
        descriptor: &JobDescriptor,
        progress_tx: mpsc::UnboundedSender<ProgressEvent>,
    ) -> Result<DownloadOutput, AppError> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let delay = self.config.delays.get(url).copied().unwrap_or(self.config.delay);
        for percent in [0.0_f32, 50.0, 100.0] {
            let _ = progress_tx.send(ProgressEvent::Downloading(ProgressInfo {
                percent,
                speed_bytes_sec: None,
                eta_seconds: None,
                downloaded_bytes: None,
                total_bytes: Some(self.config.file_size),
            }));
            tokio::time::sleep(delay / 3).await;
        }

        if self.config.panic_on.iter().any(|u| u == url) {
            panic!("mock extractor exploded on {}", url);
        }
        if let Some(message) = self.config.fail_with.get(url) {
            return Err(AppError::Download(message.clone()));
        }

        let ext = if descriptor.post_processors.is_empty() { "mp4" } else { "mp3" };
        if ext == "mp3" {
            let _ = progress_tx.send(ProgressEvent::PostProcessing);
        }

        let id = url.rsplit('/').next().unwrap_or("clip").replace(['?', '=', '&'], "_");
        let mut files = Vec::new();
        for n in 0..self.config.files_per_job {
            let title = format!("{}-{}", id, n + 1);
            let path = PathBuf::from(Self::render_template(&descriptor.output_template, &title, ext));
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, vec![0u8; self.config.file_size as usize])?;
            files.push(path);
        }

        Ok(DownloadOutput { files })
    }

    async fn probe(&self, url: &str) -> Result<MediaInfo, AppError> {
        Err(AppError::Download(format!("mock cannot probe {}", url)))
    }
}
