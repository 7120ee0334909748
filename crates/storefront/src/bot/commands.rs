//! Slash-command parsing and dispatch.
//!
//! Commands follow the grammar `/<command>[_<subcommand>] [arg1] [arg2] ...`.
//! Every handler returns a [`CommandOutcome`]; the protocol layer only ever
//! sends `message` back to the chat - `success` is informational.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::bot::docs;
use crate::stores::{PromoError, PromoStore};

/// Result of handling one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: String,
}

impl CommandOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A tokenized slash-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub subcommands: Vec<String>,
    pub args: Vec<String>,
}

/// Tokenize a message into a command, subcommands, and arguments.
///
/// Returns `None` for messages that do not start with the `/` prefix.
#[must_use]
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;

    let mut tokens = rest.split_whitespace();
    let head = tokens.next()?.to_lowercase();
    let args = tokens.map(String::from).collect();

    let mut parts = head.split('_');
    let command = parts.next()?.to_string();
    let subcommands = parts.map(String::from).collect();

    Some(ParsedCommand {
        command,
        subcommands,
        args,
    })
}

/// Command dispatcher bound to the promo store.
pub struct CommandHandler {
    promos: PromoStore,
    store_name: String,
}

impl CommandHandler {
    #[must_use]
    pub fn new(promos: PromoStore, store_name: String) -> Self {
        Self { promos, store_name }
    }

    /// Dispatch a parsed command to its handler.
    #[must_use]
    pub fn handle(&self, parsed: &ParsedCommand) -> CommandOutcome {
        match parsed.command.as_str() {
            "start" => CommandOutcome::ok(docs::welcome(&self.store_name)),
            "help" => CommandOutcome::ok(docs::HELP),
            "admin" => CommandOutcome::ok(docs::ADMIN),
            "createpromo" => self.create_promo(&parsed.args),
            "listpromos" => self.list_promos(),
            "deletepromo" => self.delete_promo(&parsed.args),
            "togglepromo" => self.toggle_promo(&parsed.args),
            // Advertised before completion; not an error.
            "setdiscount" | "products" => CommandOutcome::fail(docs::UNDER_DEVELOPMENT),
            _ => CommandOutcome::fail(docs::UNKNOWN_COMMAND),
        }
    }

    /// `/createpromo CODE DISCOUNT MAXUSES EXPIRYDATE`
    fn create_promo(&self, args: &[String]) -> CommandOutcome {
        let [code, discount_str, max_uses_str, date_parts @ ..] = args else {
            return CommandOutcome::fail(
                "Invalid format. Use: /createpromo CODE DISCOUNT MAX_USES EXPIRY_DATE",
            );
        };
        if date_parts.is_empty() {
            return CommandOutcome::fail(
                "Invalid format. Use: /createpromo CODE DISCOUNT MAX_USES EXPIRY_DATE",
            );
        }

        let Ok(discount) = discount_str.parse::<Decimal>() else {
            return CommandOutcome::fail(
                "Discount must be a number between 0 and 1 (e.g. 0.15 for 15%)",
            );
        };
        if discount <= Decimal::ZERO || discount >= Decimal::ONE {
            return CommandOutcome::fail(
                "Discount must be a number between 0 and 1 (e.g. 0.15 for 15%)",
            );
        }

        let Ok(max_uses) = max_uses_str.parse::<u32>() else {
            return CommandOutcome::fail("Maximum number of uses must be a positive integer");
        };
        if max_uses == 0 {
            return CommandOutcome::fail("Maximum number of uses must be a positive integer");
        }

        let date_str = date_parts.join(" ");
        let Ok(date) = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") else {
            return CommandOutcome::fail("Expiry date must be a calendar date like 2030-09-30");
        };
        let expires_at = Utc
            .from_utc_datetime(&date.and_hms_opt(23, 59, 59).unwrap_or_default());

        match self.promos.create(code, discount, max_uses, expires_at) {
            Ok(promo) => CommandOutcome::ok(format!(
                "Promo code {} created: {}% off, {} uses, valid until {}",
                promo.code,
                promo.discount * Decimal::from(100),
                promo.max_uses,
                date
            )),
            Err(PromoError::Duplicate(code)) => {
                CommandOutcome::fail(format!("Error creating promo code: Promo code {code} already exists"))
            }
            Err(e) => CommandOutcome::fail(format!("Error creating promo code: {e}")),
        }
    }

    /// `/listpromos`
    fn list_promos(&self) -> CommandOutcome {
        let promos = match self.promos.list() {
            Ok(promos) => promos,
            Err(e) => return CommandOutcome::fail(format!("Error listing promo codes: {e}")),
        };

        if promos.is_empty() {
            return CommandOutcome::ok("No promo codes found");
        }

        let lines: Vec<String> = promos
            .iter()
            .map(|p| {
                format!(
                    "{}: {}%, Left: {}/{}, Until: {}, Status: {}",
                    p.code,
                    p.discount * Decimal::from(100),
                    p.uses_left,
                    p.max_uses,
                    p.expires_at.format("%Y-%m-%d"),
                    if p.is_active { "active" } else { "inactive" }
                )
            })
            .collect();

        CommandOutcome::ok(format!("Promo codes:\n{}", lines.join("\n")))
    }

    /// `/deletepromo CODE`
    fn delete_promo(&self, args: &[String]) -> CommandOutcome {
        let Some(code) = args.first() else {
            return CommandOutcome::fail("Invalid format. Use: /deletepromo CODE");
        };

        match self.promos.delete(code) {
            Ok(true) => CommandOutcome::ok(format!("Promo code {code} deleted")),
            Ok(false) => CommandOutcome::fail(format!("Promo code {code} not found")),
            Err(e) => CommandOutcome::fail(format!("Error deleting promo code: {e}")),
        }
    }

    /// `/togglepromo CODE`
    fn toggle_promo(&self, args: &[String]) -> CommandOutcome {
        let Some(code) = args.first() else {
            return CommandOutcome::fail("Invalid format. Use: /togglepromo CODE");
        };

        match self.promos.toggle(code) {
            Ok(Some(active)) => CommandOutcome::ok(format!(
                "Promo code {code} is now {}",
                if active { "active" } else { "inactive" }
            )),
            Ok(None) => CommandOutcome::fail(format!("Promo code {code} not found")),
            Err(e) => CommandOutcome::fail(format!("Error toggling promo code: {e}")),
        }
    }
}
