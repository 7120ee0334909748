//! Core types for the Rosewood storefront.

pub mod id;
pub mod money;
pub mod status;

pub use id::{OrderId, ProductId};
pub use money::round_to_unit;
pub use status::OrderStatus;
