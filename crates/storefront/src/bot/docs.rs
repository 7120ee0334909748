//! Static documentation texts for the admin bot.

/// Reply to `/start`.
#[must_use]
pub fn welcome(store_name: &str) -> String {
    format!(
        "✅ {store_name} bot activated!\n\n\
         Use /help for the list of available commands or /admin for an \
         overview of the administrator features."
    )
}

/// Reply to `/help`.
pub const HELP: &str = "\
Available commands:\n\
/start - activate the bot\n\
/help - this list\n\
/admin - administrator features\n\
/createpromo CODE DISCOUNT MAX_USES EXPIRY_DATE - create a promo code\n\
/listpromos - list all promo codes\n\
/deletepromo CODE - delete a promo code\n\
/togglepromo CODE - enable/disable a promo code\n\
/setdiscount PRODUCT_ID DISCOUNT - set a product discount\n\
/products_list, /products_add, /products_update, /products_delete - product management";

/// Reply to `/admin`.
pub const ADMIN: &str = "\
Administrator features:\n\
\n\
Promo codes:\n\
  /createpromo SUMMER 0.15 100 2030-09-30 - 15% off, 100 uses, until 2030-09-30\n\
  /listpromos - show every code with uses and expiry\n\
  /deletepromo SUMMER\n\
  /togglepromo SUMMER\n\
\n\
Products (under development):\n\
  /setdiscount, /products_list, /products_add, /products_update, /products_delete";

/// Reply to recognized but unimplemented commands.
pub const UNDER_DEVELOPMENT: &str = "🔧 This feature is under development";

/// Reply to an unrecognized command.
pub const UNKNOWN_COMMAND: &str =
    "Unknown command. Use /help for the list of available commands.";
