//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TELEGRAM_BOT_TOKEN` - Telegram bot token for notifications and admin commands
//! - `TELEGRAM_CHAT_ID` - Chat that receives notifications and command replies
//! - `CDEK_ACCOUNT` - CDEK API client id
//! - `CDEK_PASSWORD` - CDEK API client secret
//!
//! ## Optional
//! - `ROSEWOOD_HOST` - Bind address (default: 127.0.0.1)
//! - `ROSEWOOD_PORT` - Listen port (default: 3000)
//! - `ROSEWOOD_DATA_PATH` - Key-value store file (default: rosewood-data.json)
//! - `ROSEWOOD_STORE_NAME` - Display name (default: ROSEWOOD)
//! - `ROSEWOOD_CURRENCY` - Currency symbol (default: ₽)
//! - `ROSEWOOD_ORIGIN_CITY` - Warehouse city for delivery quotes (default: Москва)
//! - `TELEGRAM_API_BASE` - Bot API base URL (default: https://api.telegram.org)
//! - `CDEK_BASE_URL` - Carrier API base URL (default: CDEK test environment)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Path of the JSON key-value store file
    pub data_path: PathBuf,
    /// Store display name, used in notifications
    pub store_name: String,
    /// Currency symbol, used in notifications
    pub currency: String,
    /// Warehouse city delivery quotes originate from
    pub origin_city: String,
    /// Telegram Bot API configuration
    pub telegram: TelegramConfig,
    /// CDEK carrier API configuration
    pub cdek: CdekConfig,
}

/// Telegram Bot API configuration.
///
/// Implements `Debug` manually to redact the bot token.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: SecretString,
    /// Chat that receives notifications and command replies
    pub chat_id: String,
    /// Bot API base URL
    pub api_base: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// CDEK carrier API configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct CdekConfig {
    /// OAuth2 client id
    pub account: String,
    /// OAuth2 client secret
    pub password: SecretString,
    /// API base URL (the test environment by default)
    pub base_url: String,
}

impl std::fmt::Debug for CdekConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdekConfig")
            .field("account", &self.account)
            .field("password", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ROSEWOOD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROSEWOOD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ROSEWOOD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROSEWOOD_PORT".to_string(), e.to_string()))?;
        let data_path = PathBuf::from(get_env_or_default("ROSEWOOD_DATA_PATH", "rosewood-data.json"));
        let store_name = get_env_or_default("ROSEWOOD_STORE_NAME", "ROSEWOOD");
        let currency = get_env_or_default("ROSEWOOD_CURRENCY", "₽");
        let origin_city = get_env_or_default("ROSEWOOD_ORIGIN_CITY", "Москва");

        Ok(Self {
            host,
            port,
            data_path,
            store_name,
            currency,
            origin_city,
            telegram: TelegramConfig::from_env()?,
            cdek: CdekConfig::from_env()?,
        })
    }

    /// The socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl TelegramConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bot_token: SecretString::from(get_required_env("TELEGRAM_BOT_TOKEN")?),
            chat_id: get_required_env("TELEGRAM_CHAT_ID")?,
            api_base: get_env_or_default("TELEGRAM_API_BASE", "https://api.telegram.org"),
        })
    }
}

impl CdekConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            account: get_required_env("CDEK_ACCOUNT")?,
            password: SecretString::from(get_required_env("CDEK_PASSWORD")?),
            base_url: get_env_or_default("CDEK_BASE_URL", "https://api.edu.cdek.ru/v2"),
        })
    }
}

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let telegram = TelegramConfig {
            bot_token: SecretString::from("123:secret-token".to_string()),
            chat_id: "873712320".to_string(),
            api_base: "https://api.telegram.org".to_string(),
        };
        let rendered = format!("{telegram:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));

        let cdek = CdekConfig {
            account: "acct".to_string(),
            password: SecretString::from("hunter2".to_string()),
            base_url: "https://api.edu.cdek.ru/v2".to_string(),
        };
        let rendered = format!("{cdek:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
