//! Telegram-related errors.

use thiserror::Error;

/// Errors that can occur when talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed (transport, timeout).
    #[error("Telegram request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse a response body.
    #[error("Telegram response error: {0}")]
    Response(String),

    /// The API answered with `ok: false`.
    #[error("Telegram API error: {0}")]
    Api(String),
}
