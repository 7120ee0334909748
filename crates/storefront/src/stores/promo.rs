//! Promo code store.
//!
//! Codes are keyed case-insensitively but stored with their original casing.
//! They are created, deleted, and toggled only through the Telegram admin
//! commands; the checkout flow consumes them via [`PromoStore::check`] and
//! [`PromoStore::redeem`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::Clock;
use crate::storage::{KeyValueStore, KeyValueStoreExt, StorageError, keys};

/// A promo code and its redemption limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    /// Discount fraction, strictly between 0 and 1.
    pub discount: Decimal,
    pub max_uses: u32,
    pub uses_left: u32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Errors raised by promo store mutations.
#[derive(Debug, Error)]
pub enum PromoError {
    /// A case-insensitive match for the code already exists.
    #[error("Promo code {0} already exists")]
    Duplicate(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of checking a code against the store, in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoCheck {
    Valid { discount: Decimal },
    NotFound,
    Inactive,
    Exhausted,
    Expired,
}

impl PromoCheck {
    /// Whether the code is redeemable right now.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Human-readable reason, suitable for direct display.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "Promo code applied",
            Self::NotFound => "Promo code not found",
            Self::Inactive => "Promo code is not active",
            Self::Exhausted => "Promo code has reached its maximum number of uses",
            Self::Expired => "Promo code has expired",
        }
    }
}

/// Store of promo codes, persisted as a set keyed by normalized code.
#[derive(Clone)]
pub struct PromoStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl PromoStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// All stored codes.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn list(&self) -> Result<Vec<PromoCode>, StorageError> {
        Ok(self.storage.get_json(keys::PROMO_CODES)?.unwrap_or_default())
    }

    /// Create a new code.
    ///
    /// The caller is responsible for range-validating `discount` (0,1) and
    /// `max_uses` (> 0) before insertion; this method only enforces
    /// uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::Duplicate`] if a case-insensitive match exists.
    pub fn create(
        &self,
        code: &str,
        discount: Decimal,
        max_uses: u32,
        expires_at: DateTime<Utc>,
    ) -> Result<PromoCode, PromoError> {
        let mut codes = self.list()?;
        if codes.iter().any(|p| p.code.eq_ignore_ascii_case(code)) {
            return Err(PromoError::Duplicate(code.to_string()));
        }

        let promo = PromoCode {
            code: code.to_string(),
            discount,
            max_uses,
            uses_left: max_uses,
            expires_at,
            is_active: true,
        };
        codes.push(promo.clone());
        self.save(&codes)?;
        Ok(promo)
    }

    /// Delete a code. Returns false if no match existed.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn delete(&self, code: &str) -> Result<bool, StorageError> {
        let mut codes = self.list()?;
        let before = codes.len();
        codes.retain(|p| !p.code.eq_ignore_ascii_case(code));
        if codes.len() == before {
            return Ok(false);
        }
        self.save(&codes)?;
        Ok(true)
    }

    /// Flip a code's active flag. Returns the new state, or None if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn toggle(&self, code: &str) -> Result<Option<bool>, StorageError> {
        let mut codes = self.list()?;
        let Some(promo) = codes.iter_mut().find(|p| p.code.eq_ignore_ascii_case(code)) else {
            return Ok(None);
        };
        promo.is_active = !promo.is_active;
        let state = promo.is_active;
        self.save(&codes)?;
        Ok(Some(state))
    }

    /// Check whether a code is currently redeemable.
    ///
    /// Rejection reasons are evaluated in a fixed order: not-found, inactive,
    /// exhausted uses, expired.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn check(&self, code: &str) -> Result<PromoCheck, StorageError> {
        let codes = self.list()?;
        let Some(promo) = codes.iter().find(|p| p.code.eq_ignore_ascii_case(code)) else {
            return Ok(PromoCheck::NotFound);
        };
        if !promo.is_active {
            return Ok(PromoCheck::Inactive);
        }
        if promo.uses_left == 0 {
            return Ok(PromoCheck::Exhausted);
        }
        if self.clock.now() > promo.expires_at {
            return Ok(PromoCheck::Expired);
        }
        Ok(PromoCheck::Valid {
            discount: promo.discount,
        })
    }

    /// Consume one use of a code.
    ///
    /// Returns false without mutating anything if the code is absent or has
    /// no uses left; `uses_left` never goes below zero.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails.
    pub fn redeem(&self, code: &str) -> Result<bool, StorageError> {
        let mut codes = self.list()?;
        let Some(promo) = codes.iter_mut().find(|p| p.code.eq_ignore_ascii_case(code)) else {
            return Ok(false);
        };
        if promo.uses_left == 0 {
            return Ok(false);
        }
        promo.uses_left -= 1;
        self.save(&codes)?;
        Ok(true)
    }

    fn save(&self, codes: &[PromoCode]) -> Result<(), StorageError> {
        self.storage.put_json(keys::PROMO_CODES, &codes)
    }
}
