//! Wire types for the Telegram Bot API.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub result: Option<T>,
}

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: &'static str,
}

/// One inbound update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Option<String>,
    pub chat: Chat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// One entry of the static command menu (`setMyCommands`).
#[derive(Debug, Serialize)]
pub struct BotCommand {
    pub command: &'static str,
    pub description: &'static str,
}

/// The static command menu advertised to Telegram clients.
#[must_use]
pub fn command_menu() -> Vec<BotCommand> {
    vec![
        BotCommand {
            command: "start",
            description: "Activate the bot",
        },
        BotCommand {
            command: "help",
            description: "List available commands",
        },
        BotCommand {
            command: "admin",
            description: "Administrator features",
        },
        BotCommand {
            command: "createpromo",
            description: "Create a promo code. Example: /createpromo CODE 0.15 100 2030-12-31",
        },
        BotCommand {
            command: "listpromos",
            description: "List all promo codes",
        },
        BotCommand {
            command: "deletepromo",
            description: "Delete a promo code. Example: /deletepromo CODE",
        },
        BotCommand {
            command: "togglepromo",
            description: "Enable/disable a promo code. Example: /togglepromo CODE",
        },
        BotCommand {
            command: "setdiscount",
            description: "Set a product discount. Example: /setdiscount PRODUCT_ID 0.2",
        },
        BotCommand {
            command: "products_list",
            description: "List all products",
        },
        BotCommand {
            command: "products_add",
            description: "Add a product",
        },
        BotCommand {
            command: "products_update",
            description: "Update a product",
        },
        BotCommand {
            command: "products_delete",
            description: "Delete a product",
        },
    ]
}
