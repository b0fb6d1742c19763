//! yt-dlp process backend.
//!
//! The typed [`JobDescriptor`] is rendered into command-line flags, the child
//! is spawned with both output streams piped and read concurrently, and the
//! final file paths are recovered from a marker line printed after yt-dlp has
//! moved each file into place.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::core::config::DEFAULT_YTDL_BIN;
use crate::core::error::AppError;
use crate::download::builder::{JobDescriptor, PostProcessor};
use crate::download::progress::{parse_progress, ProgressEvent};
use crate::download::source::{DownloadOutput, Extractor, MediaInfo};

/// Prefix of the stdout line carrying a finished file's path
const FILE_MARKER: &str = "YTGRAB_FILE:";

/// How many stderr lines are kept for error reporting
const STDERR_TAIL_LINES: usize = 200;

/// yt-dlp process backend
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    bin: String,
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_YTDL_BIN)
    }
}

impl YtDlpExtractor {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }
}

/// Renders a descriptor and URL into yt-dlp arguments.
pub fn descriptor_args(descriptor: &JobDescriptor, url: &str) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-o".into(),
        descriptor.output_template.clone(),
        "-f".into(),
        descriptor.format_selector.clone(),
    ];

    if let Some(container) = &descriptor.merge_output_format {
        args.push("--merge-output-format".into());
        args.push(container.clone());
    }
    if descriptor.ignore_errors {
        args.push("--ignore-errors".into());
    }
    if descriptor.quiet {
        args.push("--quiet".into());
    }
    if descriptor.no_warnings {
        args.push("--no-warnings".into());
    }
    // Progress stays on even in quiet mode; one update per line
    args.push("--newline".into());
    args.push("--progress".into());
    args.push("--encoding".into());
    args.push("utf-8".into());

    for post_processor in &descriptor.post_processors {
        match post_processor {
            PostProcessor::ExtractAudio {
                codec,
                bitrate_kbps,
                sample_rate_hz,
            } => {
                args.push("-x".into());
                args.push("--audio-format".into());
                args.push(codec.as_str().into());
                args.push("--audio-quality".into());
                args.push(format!("{}K", bitrate_kbps));
                args.push("--postprocessor-args".into());
                args.push(format!("ExtractAudio:-ar {}", sample_rate_hz));
            }
        }
    }

    // --print implies --simulate unless told otherwise
    args.push("--no-simulate".into());
    args.push("--print".into());
    args.push(format!("after_move:{}%(filepath)s", FILE_MARKER));
    args.push("--".into());
    args.push(url.to_string());
    args
}

/// Picks the most useful line of stderr for a failed run.
fn summarize_failure(stderr_tail: &VecDeque<String>, status: ExitStatus) -> String {
    stderr_tail
        .iter()
        .rev()
        .find(|line| line.trim_start().starts_with("ERROR:"))
        .or_else(|| stderr_tail.iter().rev().find(|line| !line.trim().is_empty()))
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| format!("yt-dlp exited with {}", status))
}

/// Reads the next line, replacing invalid UTF-8 instead of failing.
///
/// Returns `None` at end of stream or on a read error; the pipe has to be read
/// to the end or the child dies of SIGPIPE.
async fn next_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    match reader.read_until(b'\n', buf).await {
        Ok(0) => None,
        Ok(_) => Some(String::from_utf8_lossy(buf).trim_end_matches(['\r', '\n']).to_string()),
        Err(e) => {
            log::warn!("Failed to read yt-dlp output: {}", e);
            None
        }
    }
}

/// Reads stderr to the end, forwarding progress and keeping the tail.
async fn drain_stderr<R>(stream: R, progress_tx: mpsc::UnboundedSender<ProgressEvent>) -> VecDeque<String>
where
    R: AsyncRead + Unpin,
{
    let mut tail = VecDeque::new();
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    while let Some(line) = next_line_lossy(&mut reader, &mut buf).await {
        log::debug!("yt-dlp stderr: {}", line);
        if let Some(event) = parse_progress(&line) {
            let _ = progress_tx.send(event);
        }
        tail.push_back(line);
        if tail.len() > STDERR_TAIL_LINES {
            tail.pop_front();
        }
    }
    tail
}

/// Reads stdout to the end, forwarding progress and collecting file markers.
async fn drain_stdout<R>(stream: R, progress_tx: mpsc::UnboundedSender<ProgressEvent>) -> Vec<PathBuf>
where
    R: AsyncRead + Unpin,
{
    let mut files = Vec::new();
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    while let Some(line) = next_line_lossy(&mut reader, &mut buf).await {
        if let Some(path) = line.strip_prefix(FILE_MARKER) {
            let path = path.trim();
            if !path.is_empty() {
                files.push(PathBuf::from(path));
            }
            continue;
        }
        log::debug!("yt-dlp stdout: {}", line);
        if let Some(event) = parse_progress(&line) {
            let _ = progress_tx.send(event);
        }
    }
    files
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn download(
        &self,
        url: &str,
        descriptor: &JobDescriptor,
        progress_tx: mpsc::UnboundedSender<ProgressEvent>,
    ) -> Result<DownloadOutput, AppError> {
        let args = descriptor_args(descriptor, url);
        log::debug!("Running {} {}", self.bin, args.join(" "));

        let mut child = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Download(format!("Failed to start {}: {}", self.bin, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::Download("yt-dlp stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AppError::Download("yt-dlp stderr was not captured".to_string()))?;

        // Both pipes must be drained together or a chatty stream can block the child
        let (files, stderr_tail) = tokio::join!(
            drain_stdout(stdout, progress_tx.clone()),
            drain_stderr(stderr, progress_tx)
        );
        let status = child.wait().await?;

        if !status.success() {
            let message = summarize_failure(&stderr_tail, status);
            log::warn!("yt-dlp failed for {}: {}", url, message);
            return Err(AppError::Download(message));
        }

        log::info!("yt-dlp finished {} ({} file(s))", url, files.len());
        Ok(DownloadOutput { files })
    }

    async fn probe(&self, url: &str) -> Result<MediaInfo, AppError> {
        let output = Command::new(&self.bin)
            .args(["-J", "--skip-download", "--no-playlist", "--", url])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::Download(format!("Failed to start {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: VecDeque<String> = stderr.lines().map(str::to_string).collect();
            return Err(AppError::Download(summarize_failure(&tail, output.status)));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}
