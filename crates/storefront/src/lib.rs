//! Rosewood Storefront - single-product apparel shop.
//!
//! # Architecture
//!
//! - Axum JSON API over a small domain library (this crate)
//! - All state lives in a local persistent key-value store (JSON file)
//! - CDEK carrier API for delivery quotes and shipment labels
//! - Telegram Bot API for order notifications and remote administration
//!
//! The library surface exists so integration tests can drive the full order
//! pipeline without going through HTTP.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bot;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;
