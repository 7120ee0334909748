//! Newtype IDs for type-safe entity references.

use serde::{Deserialize, Serialize};

/// A product identifier from the catalog (e.g. `rosewood-love`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An order identifier, formatted as `ORD-<seq>-<suffix>`.
///
/// The sequence part is a zero-padded per-store counter; the suffix is four
/// random hex characters. The original 4-digit random-only scheme had no
/// collision check, so the sequence widens the space while keeping the
/// `ORD-` prefix for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Build an order ID from a store sequence number and a random suffix.
    #[must_use]
    pub fn from_parts(sequence: u64, suffix: u16) -> Self {
        Self(format!("ORD-{sequence:04}-{suffix:04X}"))
    }

    /// Wrap an existing ID string (e.g. read back from storage).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
