//! Unified error type for storefront setup.
//!
//! Cart and view operations never fail; they degrade to no-ops or report
//! persistence warnings inline. The errors collected here are the ones that
//! can stop a storefront from starting: bad configuration, an unreadable
//! catalog or an unreadable storage file.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Storage backend could not be opened.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use boutique_core::ProductId;

    use super::*;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::from(CatalogError::DuplicateId(ProductId::new(4)));
        assert_eq!(err.to_string(), "Catalog error: Duplicate product id: 4");

        let err = StorefrontError::from(StoreError::QuotaExceeded {
            needed: 20,
            quota: 10,
        });
        assert_eq!(
            err.to_string(),
            "Storage error: Storage quota exceeded: 20 bytes needed, 10 allowed"
        );
    }
}
