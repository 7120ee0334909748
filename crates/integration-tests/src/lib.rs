//! Integration tests for the Rosewood storefront.
//!
//! Tests drive the real application state (stores, checkout engine, router)
//! over in-memory storage and a manual clock. Carrier and Telegram endpoints
//! point at an unroutable local port, so their calls degrade exactly as they
//! would during a network outage; no test needs the network.
//!
//! Run with: cargo test -p rosewood-integration-tests

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use secrecy::SecretString;

use rosewood_storefront::clock::{Clock, ManualClock};
use rosewood_storefront::config::{CdekConfig, StorefrontConfig, TelegramConfig};
use rosewood_storefront::state::AppState;
use rosewood_storefront::storage::{KeyValueStore, MemoryStore};

/// A fixed, readable point in time tests start from.
#[must_use]
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid date")
}

/// Full application wiring over in-memory storage and a manual clock.
pub struct TestContext {
    pub state: AppState,
    pub clock: ManualClock,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Build over a custom configuration (e.g. pointing a client at a local
    /// stand-in server).
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(test_epoch());
        let clock_arc: Arc<dyn Clock> = Arc::new(clock.clone());
        let state = AppState::with_parts(config, storage, clock_arc);
        Self { state, clock }
    }

    /// The storefront router with state applied, ready for `oneshot`.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        rosewood_storefront::routes::routes().with_state(self.state.clone())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration with external endpoints pointed at an unroutable port.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        data_path: PathBuf::from("unused.json"),
        store_name: "ROSEWOOD".to_string(),
        currency: "₽".to_string(),
        origin_city: "Москва".to_string(),
        telegram: TelegramConfig {
            bot_token: SecretString::from("test-token".to_string()),
            chat_id: "1".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
        },
        cdek: CdekConfig {
            account: "test-account".to_string(),
            password: SecretString::from("test-password".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
        },
    }
}
