//! Format picker keyboard and its callback tokens.
//!
//! A button's callback data is `<format>|<url>`. Telegram caps callback data
//! at 64 bytes, so links too long to fit cannot be offered as buttons.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::error::AppError;
use crate::download::format::FormatChoice;

/// Telegram's limit on `callback_data`, in bytes
pub const MAX_CALLBACK_DATA_BYTES: usize = 64;

const SEPARATOR: char = '|';

/// Builds the callback token for a button, or `None` if it would exceed the limit.
pub fn encode_callback(format: FormatChoice, url: &str) -> Option<String> {
    let token = format!("{}{}{}", format, SEPARATOR, url);
    (token.len() <= MAX_CALLBACK_DATA_BYTES).then_some(token)
}

/// Splits a callback token back into its format and URL.
pub fn decode_callback(data: &str) -> Result<(FormatChoice, String), AppError> {
    let (format, url) = data
        .split_once(SEPARATOR)
        .ok_or_else(|| AppError::Validation(format!("Malformed callback data: {}", data)))?;
    let format = format
        .parse::<FormatChoice>()
        .map_err(|_| AppError::Validation(format!("Unknown format: {}", format)))?;
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("Callback data has no URL".to_string()));
    }
    Ok((format, url.to_string()))
}

/// `[MP4 1080p, MP4 720p] / [MP3 Audio]` for `url`.
///
/// Returns `None` when the link is too long for any button token.
pub fn format_keyboard(url: &str) -> Option<InlineKeyboardMarkup> {
    let button = |format: FormatChoice| -> Option<InlineKeyboardButton> {
        encode_callback(format, url).map(|data| InlineKeyboardButton::callback(format.label(), data))
    };

    Some(InlineKeyboardMarkup::new(vec![
        vec![button(FormatChoice::Mp4FullHd)?, button(FormatChoice::Mp4Hd)?],
        vec![button(FormatChoice::Mp3)?],
    ]))
}
