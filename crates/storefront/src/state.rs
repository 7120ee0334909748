//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::checkout::CheckoutEngine;
use crate::clock::{Clock, SystemClock};
use crate::config::StorefrontConfig;
use crate::services::cdek::CdekClient;
use crate::services::telegram::TelegramClient;
use crate::storage::{JsonFileStore, KeyValueStore, StorageError};
use crate::stores::{CartStore, OrderStore, PromoStore};

/// Shared application state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    cart: CartStore,
    promos: PromoStore,
    orders: OrderStore,
    cdek: CdekClient,
    telegram: TelegramClient,
    checkout: CheckoutEngine,
}

impl AppState {
    /// Build state from configuration, opening the file-backed store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file exists but cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorageError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&config.data_path)?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Ok(Self::with_parts(config, storage, clock))
    }

    /// Build state over explicit storage and clock implementations.
    ///
    /// This is the seam integration tests use to run the full pipeline over
    /// in-memory storage and a manual clock.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let catalog = Arc::new(Catalog::rosewood());
        let cart = CartStore::new(Arc::clone(&storage));
        let promos = PromoStore::new(Arc::clone(&storage), Arc::clone(&clock));
        let orders = OrderStore::new(Arc::clone(&storage));
        let cdek = CdekClient::new(&config.cdek, Arc::clone(&clock));
        let telegram = TelegramClient::new(&config.telegram);
        let checkout = CheckoutEngine::new(
            Arc::clone(&catalog),
            cart.clone(),
            promos.clone(),
            orders.clone(),
            cdek.clone(),
            telegram.clone(),
            clock,
            config.currency.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
                promos,
                orders,
                cdek,
                telegram,
                checkout,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn promos(&self) -> &PromoStore {
        &self.inner.promos
    }

    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    #[must_use]
    pub fn cdek(&self) -> &CdekClient {
        &self.inner.cdek
    }

    #[must_use]
    pub fn telegram(&self) -> &TelegramClient {
        &self.inner.telegram
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutEngine {
        &self.inner.checkout
    }
}
