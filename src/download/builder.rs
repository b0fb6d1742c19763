//! Job descriptor construction.
//!
//! A [`JobDescriptor`] is the typed replacement for yt-dlp's free-form options
//! dictionary: everything the extractor needs to know about one job, derived
//! deterministically from the URL classification, the format choice and the
//! output directory. Building one has no side effects.

use std::path::Path;

use crate::download::classify::Classification;
use crate::download::format::FormatChoice;

/// Target bitrate for MP3 extraction (kbps)
pub const MP3_BITRATE_KBPS: u32 = 192;

/// Output sample rate for MP3 extraction (Hz)
pub const MP3_SAMPLE_RATE_HZ: u32 = 44_100;

/// Container produced when separate video and audio streams are merged
pub const MERGE_CONTAINER: &str = "mp4";

/// Audio codecs the extractor can transcode to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    Mp3,
}

impl AudioCodec {
    pub fn as_str(self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
        }
    }
}

/// Post-processing step run by the extractor after download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
    /// Drop the video stream and transcode the audio
    ExtractAudio {
        codec: AudioCodec,
        bitrate_kbps: u32,
        sample_rate_hz: u32,
    },
}

/// Options for one extractor invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    /// Output path template, with yt-dlp `%(field|default)s` placeholders
    pub output_template: String,
    /// yt-dlp format-selection expression
    pub format_selector: String,
    /// Container for merged video+audio downloads
    pub merge_output_format: Option<String>,
    pub post_processors: Vec<PostProcessor>,
    /// Skip unavailable playlist entries instead of aborting
    pub ignore_errors: bool,
    pub quiet: bool,
    pub no_warnings: bool,
}

/// Relative naming template for a classification
pub fn output_template(classification: Classification) -> &'static str {
    match classification {
        Classification::Video => "%(title)s.%(ext)s",
        Classification::Playlist => "%(playlist_title|Playlist)s/%(playlist_index|00)s-%(title)s.%(ext)s",
        Classification::Channel => "%(uploader|Channel)s/%(upload_date|00000000)s-%(title)s.%(ext)s",
    }
}

/// Three-tier selector: separate mp4 video + m4a audio under the cap, then a
/// single combined mp4 under the cap, then whatever is best.
pub fn video_format_selector(height_cap: u32) -> String {
    format!(
        "bestvideo[ext=mp4][height<={cap}]+bestaudio[ext=m4a]/best[ext=mp4][height<={cap}]/best",
        cap = height_cap
    )
}

/// Builds the descriptor for one job.
pub fn build(classification: Classification, format: FormatChoice, output_dir: &Path) -> JobDescriptor {
    let output_template = output_dir
        .join(output_template(classification))
        .to_string_lossy()
        .into_owned();

    let (format_selector, merge_output_format, post_processors) = match format.height_cap() {
        Some(cap) => (video_format_selector(cap), Some(MERGE_CONTAINER.to_string()), Vec::new()),
        None => (
            "bestaudio/best".to_string(),
            None,
            vec![PostProcessor::ExtractAudio {
                codec: AudioCodec::Mp3,
                bitrate_kbps: MP3_BITRATE_KBPS,
                sample_rate_hz: MP3_SAMPLE_RATE_HZ,
            }],
        ),
    };

    JobDescriptor {
        output_template,
        format_selector,
        merge_output_format,
        post_processors,
        ignore_errors: true,
        quiet: true,
        no_warnings: false,
    }
}
