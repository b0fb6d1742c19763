//! Startup configuration
//!
//! Configuration is read once at process start into explicit structs and
//! passed to the components that need it. Each struct has a `from_env`
//! constructor for production and a `from_lookup` constructor that takes a
//! key → value function, so tests never have to mutate the process
//! environment.

use std::path::PathBuf;

use secrecy::SecretString;
use url::Url;

use crate::core::error::AppError;

/// Default yt-dlp binary name (looked up on PATH)
pub const DEFAULT_YTDL_BIN: &str = "yt-dlp";

/// Default ffmpeg binary name (looked up on PATH)
pub const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";

/// Default upload ceiling for the bot, in megabytes.
/// Telegram's public Bot API refuses uploads above 50 MB.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 48;

/// Bytes in one megabyte as used for upload limits
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Default number of bot downloads running at once
pub const DEFAULT_BOT_MAX_JOBS: usize = 1;

/// Default bot log file
pub const DEFAULT_BOT_LOG_FILE: &str = "ytgrab-bot.log";

/// Name of the bot's scratch folder inside the system temp directory
pub const BOT_TEMP_SUBDIR: &str = "ytgrab_bot";

/// Worker pool configuration for the CLI orchestrator
pub mod workers {
    /// Upper bound for concurrent downloads
    pub const MAX_WORKERS: usize = 5;

    /// Worker count offered when the user just presses Enter
    pub const DEFAULT_WORKERS: usize = 3;

    /// Clamp a requested worker count into `[1, MAX_WORKERS]`.
    pub fn clamp(requested: usize) -> usize {
        requested.clamp(1, MAX_WORKERS)
    }
}

/// Network configuration for the bot's HTTP client
pub mod network {
    use std::time::Duration;

    /// Request timeout for Bot API calls (in seconds).
    /// Uploads of ~50 MB files over slow links need a generous budget.
    pub const REQUEST_TIMEOUT_SECS: u64 = 600;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Configuration for the Telegram bot front-end
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot token from @BotFather
    pub token: SecretString,
    /// Largest file the bot will try to upload, in megabytes
    pub max_upload_mb: u64,
    /// Downloads running at once; further requests wait their turn
    pub max_jobs: usize,
    /// Root of the per-request scratch directories
    pub temp_dir: PathBuf,
    /// yt-dlp binary
    pub ytdl_bin: String,
    /// ffmpeg binary, probed at startup for an advisory warning
    pub ffmpeg_bin: String,
    /// Log file path
    pub log_file: String,
    /// Optional self-hosted Bot API server
    pub bot_api_url: Option<Url>,
}

impl BotConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when `BOT_TOKEN`/`TELOXIDE_TOKEN` is missing
    /// or a numeric/URL setting cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = non_empty(lookup("BOT_TOKEN"))
            .or_else(|| non_empty(lookup("TELOXIDE_TOKEN")))
            .ok_or_else(|| AppError::Config("BOT_TOKEN not found in environment or .env".to_string()))?;

        let max_upload_mb = match non_empty(lookup("MAX_UPLOAD_MB")) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("Invalid MAX_UPLOAD_MB '{}': {}", raw, e)))?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };
        if max_upload_mb.checked_mul(BYTES_PER_MB).is_none() {
            return Err(AppError::Config(format!("MAX_UPLOAD_MB {} is too large", max_upload_mb)));
        }

        let max_jobs = match non_empty(lookup("BOT_MAX_JOBS")) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(AppError::Config(format!("Invalid BOT_MAX_JOBS '{}': expected a positive number", raw))),
            },
            None => DEFAULT_BOT_MAX_JOBS,
        };

        let temp_dir = non_empty(lookup("BOT_TEMP_DIR"))
            .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
            .unwrap_or_else(|| std::env::temp_dir().join(BOT_TEMP_SUBDIR));

        let bot_api_url = match non_empty(lookup("BOT_API_URL")) {
            Some(raw) => Some(
                Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid BOT_API_URL '{}': {}", raw, e)))?,
            ),
            None => None,
        };

        Ok(Self {
            token: SecretString::from(token),
            max_upload_mb,
            max_jobs,
            temp_dir,
            ytdl_bin: non_empty(lookup("YTDL_BIN")).unwrap_or_else(|| DEFAULT_YTDL_BIN.to_string()),
            ffmpeg_bin: non_empty(lookup("FFMPEG_BIN")).unwrap_or_else(|| DEFAULT_FFMPEG_BIN.to_string()),
            log_file: non_empty(lookup("LOG_FILE_PATH")).unwrap_or_else(|| DEFAULT_BOT_LOG_FILE.to_string()),
            bot_api_url,
        })
    }

    /// Upload ceiling in bytes
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(BYTES_PER_MB)
    }
}

/// Configuration for the interactive CLI downloader
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// yt-dlp binary
    pub ytdl_bin: String,
    /// ffmpeg binary, probed only to print an advisory warning
    pub ffmpeg_bin: String,
    /// Default output folder offered at the prompt
    pub download_folder: PathBuf,
    /// Optional log file; the CLI logs to the terminal only when unset
    pub log_file: Option<String>,
}

impl DownloaderConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let download_folder = non_empty(lookup("DOWNLOAD_FOLDER"))
            .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
            .unwrap_or_else(|| {
                std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("downloads")
            });

        Self {
            ytdl_bin: non_empty(lookup("YTDL_BIN")).unwrap_or_else(|| DEFAULT_YTDL_BIN.to_string()),
            ffmpeg_bin: non_empty(lookup("FFMPEG_BIN")).unwrap_or_else(|| DEFAULT_FFMPEG_BIN.to_string()),
            download_folder,
            log_file: non_empty(lookup("LOG_FILE_PATH")),
        }
    }
}
