//! Core types for Boutique.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, CategoryError};
pub use id::*;
pub use price::Price;
pub use product::Product;
