//! External tool probing
//!
//! yt-dlp hands muxing and audio extraction to ffmpeg. Its absence is not
//! fatal (single-file formats still download), so it is only reported as an
//! advisory warning before any job runs.

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// How long a `--version` style probe may take
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns true when `bin` can be spawned and exits successfully for `version_flag`.
pub async fn is_tool_available(bin: &str, version_flag: &str) -> bool {
    let mut cmd = Command::new(bin);
    cmd.arg(version_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match tokio::time::timeout(PROBE_TIMEOUT, cmd.status()).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(e)) => {
            log::debug!("Probe of '{}' failed to start: {}", bin, e);
            false
        }
        Err(_) => {
            log::debug!("Probe of '{}' timed out after {}s", bin, PROBE_TIMEOUT.as_secs());
            false
        }
    }
}

/// Checks ffmpeg and logs a warning when it is missing.
///
/// Returns whether ffmpeg was found so callers can also tell the user.
pub async fn check_ffmpeg(ffmpeg_bin: &str) -> bool {
    let found = is_tool_available(ffmpeg_bin, "-version").await;
    if !found {
        log::warn!(
            "FFmpeg ('{}') not found on PATH. yt-dlp will still run but muxing/MP3 extraction may fail.",
            ffmpeg_bin
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_is_not_available() {
        assert!(!is_tool_available("ytgrab-definitely-not-a-real-binary", "--version").await);
    }

    #[tokio::test]
    async fn test_check_ffmpeg_missing_binary() {
        assert!(!check_ffmpeg("ytgrab-no-such-ffmpeg").await);
    }
}
