//! Logging initialization
//!
//! Both front-ends log through the `log` facade. The terminal sink level is
//! chosen by the caller; a file sink is added when a log path is given.

use anyhow::Result;
use simplelog::*;

/// Initialize logger for console and (optionally) file output
///
/// # Arguments
/// * `console_level` - Minimum level written to the terminal
/// * `log_file_path` - Path to the log file; `None` disables file logging
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the log file or a logger was already set
pub fn init_logger(console_level: LevelFilter, log_file_path: Option<&str>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        console_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file_path {
        let log_file = fs_err::File::create(path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;
        loggers.push(WriteLogger::new(LevelFilter::Info, Config::default(), log_file));
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}
