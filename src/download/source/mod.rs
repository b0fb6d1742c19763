//! Extractor abstraction layer.
//!
//! Provides the `Extractor` trait: the single seam between this crate and the
//! external media-extraction tool. The runner only ever says "here are the
//! options, download this URL" and gets back either the produced files or an
//! error. Tests substitute a scripted implementation.
//!
//! Built-in backend:
//! - `YtDlpExtractor` — drives the `yt-dlp` binary as a child process

pub mod ytdlp;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::core::error::AppError;
use crate::download::builder::JobDescriptor;
use crate::download::progress::ProgressEvent;

pub use ytdlp::YtDlpExtractor;

/// Output from a successful extractor run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOutput {
    /// Final on-disk paths reported by the extractor, after post-processing
    pub files: Vec<PathBuf>,
}

/// Metadata returned by a probe (no download)
#[derive(Debug, Clone, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatEntry>,
}

/// One downloadable format as reported by yt-dlp `--dump-single-json`
#[derive(Debug, Clone, Deserialize)]
pub struct FormatEntry {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
}

/// Trait for media extractor implementations.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable name of this backend (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Download (and post-process) `url` according to `descriptor`,
    /// sending progress updates through the channel.
    async fn download(
        &self,
        url: &str,
        descriptor: &JobDescriptor,
        progress_tx: mpsc::UnboundedSender<ProgressEvent>,
    ) -> Result<DownloadOutput, AppError>;

    /// Fetch metadata and the list of available formats without downloading.
    async fn probe(&self, url: &str) -> Result<MediaInfo, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_info_tolerates_missing_fields() {
        let json = r#"{
            "title": "Some video",
            "formats": [
                {"format_id": "18", "ext": "mp4", "height": 360, "fps": 30, "filesize": 1048576},
                {"format_id": "sb0", "ext": "mhtml"}
            ]
        }"#;
        let info: MediaInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.title.as_deref(), Some("Some video"));
        assert_eq!(info.formats.len(), 2);
        assert_eq!(info.formats[0].height, Some(360));
        assert_eq!(info.formats[0].fps, Some(30.0));
        assert!(info.formats[1].filesize.is_none());
    }

    #[test]
    fn test_media_info_without_formats() {
        let info: MediaInfo = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(info.title.is_none());
        assert!(info.formats.is_empty());
    }
}
