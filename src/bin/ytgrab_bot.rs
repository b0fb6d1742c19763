use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use simplelog::LevelFilter;
use teloxide::dispatching::Dispatcher;
use teloxide::error_handlers::LoggingErrorHandler;

use ytgrab::cli::BotCli;
use ytgrab::core::process::check_ffmpeg;
use ytgrab::core::{init_logger, BotConfig};
use ytgrab::download::progress::LogProgress;
use ytgrab::download::{JobRunner, YtDlpExtractor};
use ytgrab::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Entry point for the Telegram bot
///
/// # Errors
/// Returns an error if configuration is missing or the bot cannot be created.
/// Nothing is processed before configuration has been validated.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = BotCli::parse();

    // Load environment variables from the given file, or .env if present
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    let config = BotConfig::from_env()?;
    init_logger(LevelFilter::Info, Some(config.log_file.as_str()))?;

    log::info!("Starting ytgrab bot");
    log::info!(
        "Upload limit: {} MB, scratch folder: {}, yt-dlp: {}",
        config.max_upload_mb,
        config.temp_dir.display(),
        config.ytdl_bin
    );
    check_ffmpeg(&config.ffmpeg_bin).await;

    let bot = create_bot(&config)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let runner = JobRunner::new(
        Arc::new(YtDlpExtractor::new(config.ytdl_bin.clone())),
        Arc::new(LogProgress),
    );
    let handler_deps = HandlerDeps::new(Arc::new(config), Arc::new(runner));

    log::info!("Bot started. Press Ctrl+C to stop.");
    Dispatcher::builder(bot, schema(handler_deps))
        .enable_ctrlc_handler()
        .error_handler(LoggingErrorHandler::with_custom_text("An error from the update handler"))
        .build()
        .dispatch()
        .await;

    log::info!("Bot stopped");
    Ok(())
}
