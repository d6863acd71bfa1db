//! Boutique Storefront library.
//!
//! Holds the storefront's state and logic, independent of any rendering:
//!
//! - [`catalog`] - The fixed product list
//! - [`store`] - Key-value persistence backends
//! - [`cart`] - The cart engine, hydrated from and written through to a store
//! - [`query`] - Filter, search and sort over the catalog
//! - [`session`] - Action dispatch tying the cart and the view together
//!
//! Everything is synchronous and single-threaded: each call runs to
//! completion before the next one starts.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod session;
pub mod store;

pub use cart::{CartChange, CartEngine, CartLine, CartUpdate, CheckoutError, CheckoutReceipt};
pub use catalog::{Catalog, CatalogError};
pub use config::StorefrontConfig;
pub use error::StorefrontError;
pub use query::{CategoryFilter, SortKey, ViewQuery, derive_view};
pub use session::{Action, Notice, StorefrontSession};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
