//! Persistent domain stores over the key-value storage layer.
//!
//! Each store owns one storage key and exposes typed operations; nothing
//! else touches the raw keys.

pub mod cart;
pub mod orders;
pub mod promo;

pub use cart::{AppliedPromo, CartLine, CartStore, CustomerProfile};
pub use orders::{DeliveryDetails, Order, OrderItem, OrderStore};
pub use promo::{PromoCheck, PromoCode, PromoError, PromoStore};
