//! Boutique Core - Shared types library.
//!
//! This crate provides common types used across all Boutique components:
//! - `storefront` - Catalog, cart engine and catalog view derivation
//! - `cli` - Terminal storefront that renders the catalog and the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no
//! rendering. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, the category
//!   enum and the product record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
