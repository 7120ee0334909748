//! Telegram Bot API client.
//!
//! Sends order notifications to a fixed chat and retrieves inbound updates
//! for the remote-administration command loop. Sending is strictly
//! best-effort: failures surface as `false`, never as errors.

mod error;
mod messages;
mod types;

pub use error::TelegramError;
pub use messages::format_order_notification;
pub use types::{Message, Update};

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use crate::config::TelegramConfig;
use types::{ApiResponse, SendMessageRequest, command_menu};

/// Server-side wait bound for `getUpdates` long-polling, in seconds.
const LONG_POLL_TIMEOUT_SECS: u64 = 10;

/// Client timeout; must exceed the long-poll wait.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 5);

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    inner: Arc<TelegramClientInner>,
}

struct TelegramClientInner {
    http: reqwest::Client,
    bot_token: SecretString,
    chat_id: String,
    api_base: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.inner.chat_id)
            .field("api_base", &self.inner.api_base)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Create a new Telegram client.
    #[must_use]
    pub fn new(config: &TelegramConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(TelegramClientInner {
                http,
                bot_token: config.bot_token.clone(),
                chat_id: config.chat_id.clone(),
                api_base: config.api_base.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.inner.api_base,
            self.inner.bot_token.expose_secret()
        )
    }

    /// Send an HTML-formatted message to the configured chat.
    ///
    /// Returns false on any non-success response or transport failure;
    /// never returns an error.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, text: &str) -> bool {
        let request = SendMessageRequest {
            chat_id: self.inner.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "HTML",
        };

        let result = async {
            let resp = self
                .inner
                .http
                .post(self.method_url("sendMessage"))
                .json(&request)
                .send()
                .await?;
            resp.json::<ApiResponse<serde_json::Value>>()
                .await
                .map_err(TelegramError::Request)
        }
        .await;

        match result {
            Ok(body) if body.ok => true,
            Ok(body) => {
                warn!(description = ?body.description, "Telegram rejected message");
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to send Telegram message");
                false
            }
        }
    }

    /// Long-poll for inbound updates past `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an `ok: false` reply; the
    /// polling loop logs and retries on its next cycle.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let url = format!(
            "{}?offset={offset}&timeout={LONG_POLL_TIMEOUT_SECS}",
            self.method_url("getUpdates")
        );

        let body: ApiResponse<Vec<Update>> = self
            .inner
            .http
            .get(url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| TelegramError::Response(e.to_string()))?;

        if !body.ok {
            return Err(TelegramError::Api(
                body.description.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(body.result.unwrap_or_default())
    }

    /// Register the static command menu. Best-effort.
    #[instrument(skip(self))]
    pub async fn set_my_commands(&self) -> bool {
        let body = serde_json::json!({ "commands": command_menu() });

        let result = async {
            let resp = self
                .inner
                .http
                .post(self.method_url("setMyCommands"))
                .json(&body)
                .send()
                .await?;
            resp.json::<ApiResponse<serde_json::Value>>()
                .await
                .map_err(TelegramError::Request)
        }
        .await;

        match result {
            Ok(body) if body.ok => {
                debug!("Telegram command menu registered");
                true
            }
            Ok(body) => {
                warn!(description = ?body.description, "Failed to register command menu");
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to register command menu");
                false
            }
        }
    }

    /// The chat id replies are sent to.
    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.inner.chat_id
    }
}
