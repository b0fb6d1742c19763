//! Download progress: parsing yt-dlp output and reporting it.
//!
//! yt-dlp is run with `--newline`, so every progress update arrives as a full
//! line such as `[download]  45.2% of 10.00MiB at 500.00KiB/s ETA 00:10`.
//! Reports are written as whole, label-prefixed lines so concurrent jobs never
//! tear each other's output.

use std::io::Write;

use crate::core::utils::{format_eta, human_bytes};

/// Snapshot of one download's progress
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    pub percent: f32,
    pub speed_bytes_sec: Option<u64>,
    pub eta_seconds: Option<u64>,
    pub downloaded_bytes: Option<u64>,
    pub total_bytes: Option<u64>,
}

/// Event emitted by the extractor while a job runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Downloading(ProgressInfo),
    /// Merging or transcoding has started
    PostProcessing,
}

/// Receives progress for a labelled job.
///
/// Implementations must be cheap: they are called from the job's progress
/// consumer task for every throttled update.
pub trait ProgressHook: Send + Sync {
    fn on_progress(&self, label: &str, event: &ProgressEvent);
}

/// Prints label-prefixed progress lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ProgressHook for ConsoleProgress {
    fn on_progress(&self, label: &str, event: &ProgressEvent) {
        let line = render_progress_line(label, event);
        // One locked write per line keeps lines from different jobs intact
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{}", line);
    }
}

/// Sends progress to the log at debug level (used by the bot)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressHook for LogProgress {
    fn on_progress(&self, label: &str, event: &ProgressEvent) {
        log::debug!("{}", render_progress_line(label, event));
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressHook for SilentProgress {
    fn on_progress(&self, _label: &str, _event: &ProgressEvent) {}
}

/// Formats one progress line, e.g. `[Job-1]  45.2% 4.5 MB/10.0 MB ETA 0:10`
pub fn render_progress_line(label: &str, event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Downloading(info) => format!(
            "[{}] {:>5.1}% {}/{} ETA {}",
            label,
            info.percent,
            human_bytes(info.downloaded_bytes),
            human_bytes(info.total_bytes),
            format_eta(info.eta_seconds)
        ),
        ProgressEvent::PostProcessing => format!("[{}] Download complete, post-processing…", label),
    }
}

/// Rate-limits progress to one update per 10% step.
///
/// yt-dlp emits several lines per second; with five jobs in parallel that
/// would bury the terminal.
#[derive(Debug, Default)]
pub struct ProgressThrottle {
    last_step: Option<u8>,
    post_processing_seen: bool,
}

impl ProgressThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the event should be forwarded.
    pub fn should_emit(&mut self, event: &ProgressEvent) -> bool {
        match event {
            ProgressEvent::Downloading(info) => {
                let step = (info.percent.clamp(0.0, 100.0) / 10.0).floor() as u8;
                // Any step change counts, including the drop back to 0% when a
                // playlist moves on to its next entry
                if self.last_step != Some(step) {
                    self.last_step = Some(step);
                    self.post_processing_seen = false;
                    true
                } else {
                    false
                }
            }
            ProgressEvent::PostProcessing => {
                if self.post_processing_seen {
                    false
                } else {
                    self.post_processing_seen = true;
                    true
                }
            }
        }
    }
}

/// Parses one line of yt-dlp output into a progress event.
///
/// Example: `[download]  45.2% of 10.00MiB at 500.00KiB/s ETA 00:10`
pub fn parse_progress(line: &str) -> Option<ProgressEvent> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("[Merger]") || trimmed.starts_with("[ExtractAudio]") {
        return Some(ProgressEvent::PostProcessing);
    }
    if !trimmed.starts_with("[download]") || !trimmed.contains('%') {
        return None;
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();

    // Only the token right after the tag is the percentage; a '%' elsewhere
    // belongs to a file name
    let percent = parts
        .get(1)
        .and_then(|token| token.strip_suffix('%'))
        .and_then(|number| number.parse::<f32>().ok())?
        .clamp(0.0, 100.0);

    let mut speed_bytes_sec = None;
    let mut eta_seconds = None;
    let mut total_bytes = None;

    for (i, part) in parts.iter().enumerate() {
        // "of 10.00MiB" or "of ~ 10.00MiB" for estimates
        if *part == "of" {
            let next = match parts.get(i + 1) {
                Some(&"~") => parts.get(i + 2),
                other => other,
            };
            if let Some(size) = next.and_then(|s| parse_size(s.trim_start_matches('~'))) {
                total_bytes = Some(size);
            }
        }

        if *part == "at" {
            if let Some(speed) = parts.get(i + 1).and_then(|s| parse_size(s)) {
                speed_bytes_sec = Some(speed);
            }
        }

        if *part == "ETA" {
            if let Some(eta) = parts.get(i + 1).and_then(|s| parse_eta(s)) {
                eta_seconds = Some(eta);
            }
        }
    }

    let downloaded_bytes = total_bytes.map(|total| (total as f64 * (percent as f64 / 100.0)) as u64);

    Some(ProgressEvent::Downloading(ProgressInfo {
        percent,
        speed_bytes_sec,
        eta_seconds,
        downloaded_bytes,
        total_bytes,
    }))
}

/// Parses sizes like "10.00MiB", "500.00KiB/s" or "1.2GiB"
fn parse_size(size_str: &str) -> Option<u64> {
    let size_str = size_str.trim_end_matches("/s");
    let units: [(&str, f64); 4] = [
        ("GiB", 1024.0 * 1024.0 * 1024.0),
        ("MiB", 1024.0 * 1024.0),
        ("KiB", 1024.0),
        ("B", 1.0),
    ];
    for (suffix, multiplier) in units {
        if let Some(number) = size_str.strip_suffix(suffix) {
            return number.parse::<f64>().ok().map(|n| (n * multiplier) as u64);
        }
    }
    None
}

/// Parses an ETA like "00:10", "1:23" or "01:02:03"
fn parse_eta(eta_str: &str) -> Option<u64> {
    let parts: Vec<u64> = eta_str
        .split(':')
        .map(|p| p.parse::<u64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [m, s] => Some(m * 60 + s),
        [h, m, s] => Some(h * 3600 + m * 60 + s),
        _ => None,
    }
}
