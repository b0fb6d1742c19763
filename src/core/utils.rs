/// Formats a byte count for humans using binary multiples.
///
/// `None` and zero both render as `?`, which is what yt-dlp reports for
/// formats whose size it cannot estimate.
///
/// # Example
///
/// ```
/// use ytgrab::core::utils::human_bytes;
///
/// assert_eq!(human_bytes(Some(512)), "512.0 B");
/// assert_eq!(human_bytes(Some(1536)), "1.5 KB");
/// assert_eq!(human_bytes(None), "?");
/// ```
pub fn human_bytes(value: Option<u64>) -> String {
    let Some(bytes) = value.filter(|b| *b > 0) else {
        return "?".to_string();
    };

    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut idx = 0;
    while size >= 1024.0 && idx < UNITS.len() - 1 {
        size /= 1024.0;
        idx += 1;
    }
    format!("{:.1} {}", size, UNITS[idx])
}

/// Whole megabytes, rounded down. Used in the bot's size-limit messages.
pub fn whole_megabytes(bytes: u64) -> u64 {
    bytes / (1024 * 1024)
}

/// Formats an ETA in seconds as `m:ss` (or `h:mm:ss`).
pub fn format_eta(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds else {
        return "?".to_string();
    };
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_bytes_units() {
        assert_eq!(human_bytes(Some(1)), "1.0 B");
        assert_eq!(human_bytes(Some(1024)), "1.0 KB");
        assert_eq!(human_bytes(Some(10 * 1024 * 1024)), "10.0 MB");
        assert_eq!(human_bytes(Some(3 * 1024 * 1024 * 1024)), "3.0 GB");
    }

    #[test]
    fn test_human_bytes_caps_at_terabytes() {
        let huge = 5 * 1024_u64.pow(5);
        assert_eq!(human_bytes(Some(huge)), "5120.0 TB");
    }

    #[test]
    fn test_human_bytes_unknown() {
        assert_eq!(human_bytes(None), "?");
        assert_eq!(human_bytes(Some(0)), "?");
    }

    #[test]
    fn test_whole_megabytes_rounds_down() {
        assert_eq!(whole_megabytes(50 * 1024 * 1024 + 1), 50);
        assert_eq!(whole_megabytes(1024 * 1024 - 1), 0);
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(Some(5)), "0:05");
        assert_eq!(format_eta(Some(83)), "1:23");
        assert_eq!(format_eta(Some(3725)), "1:02:05");
        assert_eq!(format_eta(None), "?");
    }
}
