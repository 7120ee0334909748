//! Shopping cart, customer profile, and the pending-promo slot.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rosewood_core::ProductId;

use crate::storage::{KeyValueStore, KeyValueStoreExt, StorageError, keys};

/// One cart line, unique by (product, size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
}

/// The single customer profile, overwritten wholesale on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub pickup_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CustomerProfile {
    /// First/last name, falling back to splitting `full_name` on the first
    /// space: first token is the first name, the remainder the last name.
    #[must_use]
    pub fn split_name(&self) -> (String, String) {
        if let (Some(first), Some(last)) = (&self.first_name, &self.last_name) {
            return (first.clone(), last.clone());
        }
        let mut parts = self.full_name.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        (first, last)
    }
}

/// A promo code occupying the pending slot, with its cached discount.
///
/// The discount fraction is cached at apply time; order placement reads this
/// slot rather than re-validating the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromo {
    pub code: String,
    pub discount: Decimal,
}

/// Cart store: line items, the customer profile, and the pending promo.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Current cart lines, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn lines(&self) -> Result<Vec<CartLine>, StorageError> {
        Ok(self.storage.get_json(keys::CART)?.unwrap_or_default())
    }

    /// Add one unit of (product, size); merges into an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn add(&self, product_id: ProductId, size: &str) -> Result<(), StorageError> {
        let mut lines = self.lines()?;
        if let Some(line) = lines
            .iter_mut()
            .find(|l| l.product_id == product_id && l.size == size)
        {
            line.quantity += 1;
        } else {
            lines.push(CartLine {
                product_id,
                size: size.to_string(),
                quantity: 1,
            });
        }
        self.storage.put_json(keys::CART, &lines)
    }

    /// Remove the (product, size) line entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn remove(&self, product_id: &ProductId, size: &str) -> Result<(), StorageError> {
        let mut lines = self.lines()?;
        lines.retain(|l| !(l.product_id == *product_id && l.size == size));
        self.storage.put_json(keys::CART, &lines)
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn update_quantity(
        &self,
        product_id: &ProductId,
        size: &str,
        quantity: u32,
    ) -> Result<(), StorageError> {
        if quantity == 0 {
            return self.remove(product_id, size);
        }
        let mut lines = self.lines()?;
        if let Some(line) = lines
            .iter_mut()
            .find(|l| l.product_id == *product_id && l.size == size)
        {
            line.quantity = quantity;
        }
        self.storage.put_json(keys::CART, &lines)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.put_json::<Vec<CartLine>>(keys::CART, &Vec::new())
    }

    /// The saved customer profile, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn profile(&self) -> Result<Option<CustomerProfile>, StorageError> {
        self.storage.get_json(keys::PROFILE)
    }

    /// Overwrite the customer profile.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn save_profile(&self, profile: &CustomerProfile) -> Result<(), StorageError> {
        self.storage.put_json(keys::PROFILE, profile)
    }

    /// The promo currently occupying the pending slot.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn applied_promo(&self) -> Result<Option<AppliedPromo>, StorageError> {
        self.storage.get_json(keys::APPLIED_PROMO)
    }

    /// Occupy the pending-promo slot.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn apply_promo(&self, code: &str, discount: Decimal) -> Result<(), StorageError> {
        self.storage.put_json(
            keys::APPLIED_PROMO,
            &AppliedPromo {
                code: code.to_string(),
                discount,
            },
        )
    }

    /// Clear the pending-promo slot.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn clear_applied_promo(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::APPLIED_PROMO)
    }
}
