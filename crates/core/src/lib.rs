//! Rosewood Core - Shared domain types.
//!
//! This crate provides common types used across the Rosewood storefront:
//! order identifiers, order status, and money with explicit rounding rules.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
