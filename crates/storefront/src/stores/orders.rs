//! Append-only order store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rosewood_core::{OrderId, OrderStatus, ProductId};

use crate::storage::{KeyValueStore, KeyValueStoreExt, StorageError, keys};
use crate::stores::cart::CustomerProfile;

/// A product snapshot captured at order time.
///
/// Decoupled from the live catalog so later catalog edits do not
/// retroactively alter historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Courier delivery details chosen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub city: String,
    pub address: String,
    pub delivery_cost: Decimal,
}

/// A placed order. Immutable except for `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
    pub customer: CustomerProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryDetails>,
    /// Customer-facing tracking reference (the carrier number when issued).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_ref: Option<String>,
    /// Carrier-internal shipment uuid; the status endpoint is keyed by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
}

/// Append-only store of placed orders, oldest first.
#[derive(Clone)]
pub struct OrderStore {
    storage: Arc<dyn KeyValueStore>,
}

impl OrderStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// All orders in insertion order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn list(&self) -> Result<Vec<Order>, StorageError> {
        Ok(self.storage.get_json(keys::ORDERS)?.unwrap_or_default())
    }

    /// All orders newest first, for display.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn list_recent_first(&self) -> Result<Vec<Order>, StorageError> {
        let mut orders = self.list()?;
        orders.reverse();
        Ok(orders)
    }

    /// Look up one order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn get(&self, id: &OrderId) -> Result<Option<Order>, StorageError> {
        Ok(self.list()?.into_iter().find(|o| &o.id == id))
    }

    /// Allocate the next order id: store sequence plus a random hex suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn next_id(&self) -> Result<OrderId, StorageError> {
        let sequence = self.list()?.len() as u64 + 1;
        let suffix: u16 = rand::rng().random();
        Ok(OrderId::from_parts(sequence, suffix))
    }

    /// Append a new order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn append(&self, order: Order) -> Result<(), StorageError> {
        let mut orders = self.list()?;
        orders.push(order);
        self.storage.put_json(keys::ORDERS, &orders)
    }

    /// Update an order's status. Returns false if the order is unknown.
    ///
    /// This is the only permitted mutation of a stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<bool, StorageError> {
        let mut orders = self.list()?;
        let Some(order) = orders.iter_mut().find(|o| &o.id == id) else {
            return Ok(false);
        };
        order.status = status;
        self.storage.put_json(keys::ORDERS, &orders)?;
        Ok(true)
    }
}
