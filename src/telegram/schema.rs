//! Dispatcher schema and handler chain builders

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;
use tokio::sync::Semaphore;

use crate::core::config::BotConfig;
use crate::core::validation::is_supported_url;
use crate::download::runner::JobRunner;
use crate::telegram::bot::{Command, WELCOME_TEXT};
use crate::telegram::delivery::{downloading_message, handle_queued_choice, ChatReply, TelegramReply};
use crate::telegram::keyboard::{decode_callback, format_keyboard};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Reply to text that is not a supported link
pub const INVALID_URL_TEXT: &str = "Please send a valid YouTube URL.";

/// Reply to a link too long to fit in button data
pub const URL_TOO_LONG_TEXT: &str =
    "This link is too long for the format buttons. Please send a shorter link (for example youtu.be/<id>).";

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub config: Arc<BotConfig>,
    pub runner: Arc<JobRunner>,
    /// One permit per download allowed to run at once
    pub jobs: Arc<Semaphore>,
}

impl HandlerDeps {
    pub fn new(config: Arc<BotConfig>, runner: Arc<JobRunner>) -> Self {
        let jobs = Arc::new(Semaphore::new(config.max_jobs.max(1)));
        Self { config, runner, jobs }
    }
}

/// Text that the link handler should look at: anything but `/commands`
fn is_link_candidate(text: &str) -> bool {
    !text.trim_start().starts_with('/')
}

/// Creates the dispatcher schema for the bot.
///
/// Order matters: commands are matched before free text, so `/start` never
/// reaches the URL handler.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(command_handler())
        .branch(message_handler())
        .branch(callback_handler(deps))
}

/// `/start` and `/help`
fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("Received command {:?} from chat {}", cmd, msg.chat.id);
            match cmd {
                Command::Start | Command::Help => {
                    bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
                }
            }
            Ok(())
        },
    ))
}

/// Free text: a link gets the format keyboard, anything else a hint
fn message_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some_and(is_link_candidate))
        .endpoint(|bot: Bot, msg: Message| async move {
            let url = msg.text().unwrap_or_default().trim();

            if !is_supported_url(url) {
                bot.send_message(msg.chat.id, INVALID_URL_TEXT).await?;
                return Ok(());
            }

            match format_keyboard(url) {
                Some(keyboard) => {
                    bot.send_message(msg.chat.id, "Choose format:")
                        .reply_markup(keyboard)
                        .await?;
                }
                None => {
                    log::info!("Link from chat {} too long for callback data ({} bytes)", msg.chat.id, url.len());
                    bot.send_message(msg.chat.id, URL_TOO_LONG_TEXT).await?;
                }
            }
            Ok(())
        })
}

/// Format button presses
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            // Stop the button's loading spinner first
            bot.answer_callback_query(q.id.clone()).await?;

            let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
                log::warn!("Callback {:?} has no message, ignoring", q.id);
                return Ok(());
            };

            let (format, url) = match decode_callback(q.data.as_deref().unwrap_or_default()) {
                Ok(decoded) => decoded,
                Err(e) => {
                    log::warn!("Bad callback data from chat {}: {}", chat_id, e);
                    bot.send_message(chat_id, format!("Invalid selection: {}", e)).await?;
                    return Ok(());
                }
            };

            let reply = TelegramReply::start(bot, chat_id, &downloading_message(format)).await?;

            // Downloads take minutes; keep the dispatcher free for other updates.
            // The job slots bound how many run at once.
            tokio::spawn(async move {
                let result = handle_queued_choice(
                    &reply,
                    &deps.jobs,
                    &deps.runner,
                    format,
                    &url,
                    &deps.config.temp_dir,
                    deps.config.max_upload_mb,
                )
                .await;
                match result {
                    Ok(report) => log::info!(
                        "Request {} for chat {} done: {} sent, {} too large, {} failed",
                        url,
                        chat_id,
                        report.sent.len(),
                        report.oversized.len(),
                        report.failed.len()
                    ),
                    Err(e) => {
                        log::error!("Request {} for chat {} failed: {}", url, chat_id, e);
                        let _ = reply.status(&format!("Download failed: {}", e)).await;
                    }
                }
            });

            Ok(())
        }
    })
}
