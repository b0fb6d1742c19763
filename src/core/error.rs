use thiserror::Error;

/// Centralized error types for the application
///
/// Per-job download failures are not errors at this level: they are carried
/// as [`crate::download::JobOutcome::Failed`] values. `AppError` covers the
/// things that stop a whole run (bad configuration, cancellation, I/O on our
/// own files, Telegram API failures).
///
/// # Example
///
/// ```no_run
/// use ytgrab::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Download/yt-dlp errors
    #[error("Download error: {0}")]
    Download(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// yt-dlp JSON output could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The run was interrupted by the user
    #[error("Cancelled by user")]
    Cancelled,
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Download(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Download(err.to_string())
    }
}
