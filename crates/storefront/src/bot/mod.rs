//! Remote administration over Telegram.
//!
//! A single long-lived polling loop retrieves inbound messages, parses them
//! as slash-commands, dispatches to handlers that mutate the promo store,
//! and replies to the same chat. The loop runs for the lifetime of the
//! process; per-cycle failures are logged and retried on the next poll.

mod commands;
mod docs;

pub use commands::{CommandHandler, CommandOutcome, ParsedCommand, parse_command};

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::services::telegram::TelegramClient;

/// Fixed delay between poll cycles (and after a failed poll).
const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// The bot polling loop.
pub struct BotPoller {
    telegram: TelegramClient,
    handler: CommandHandler,
    /// Cursor past the last update already processed.
    offset: i64,
}

impl BotPoller {
    #[must_use]
    pub fn new(telegram: TelegramClient, handler: CommandHandler) -> Self {
        Self {
            telegram,
            handler,
            offset: 0,
        }
    }

    /// Run the polling loop forever.
    ///
    /// Transport failures are caught and implicitly retried on the next
    /// scheduled poll; they must never terminate the loop.
    pub async fn run(mut self) {
        info!("Telegram command loop started");
        loop {
            match self.telegram.get_updates(self.offset).await {
                Ok(updates) => {
                    for update in updates {
                        // Advance the watermark past every update seen,
                        // understood or not.
                        if update.update_id >= self.offset {
                            self.offset = update.update_id + 1;
                        }
                        self.process_update(update).await;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Polling for updates failed");
                }
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn process_update(&self, update: crate::services::telegram::Update) {
        let Some(text) = update.message.and_then(|m| m.text) else {
            return;
        };
        let Some(parsed) = parse_command(&text) else {
            return;
        };

        debug!(command = %parsed.command, args = ?parsed.args, "Dispatching bot command");
        let outcome = self.handler.handle(&parsed);
        if !self.telegram.send_message(&outcome.message).await {
            warn!(command = %parsed.command, "Failed to send command reply");
        }
    }
}
