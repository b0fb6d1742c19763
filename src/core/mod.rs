//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod logging;
pub mod process;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::{BotConfig, DownloaderConfig};
pub use error::{AppError, AppResult};
pub use logging::init_logger;
