//! Telegram bot front-end: commands, the format keyboard and file delivery

pub mod bot;
pub mod delivery;
pub mod keyboard;
pub mod schema;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use delivery::{deliver, handle_format_choice, handle_queued_choice, ChatReply, DeliveryReport, TelegramReply};
pub use schema::{schema, HandlerDeps, HandlerError};
