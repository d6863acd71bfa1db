//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOUTIQUE_STORE_PATH` - Storage file holding the persisted cart
//!   (default: `.boutique/storage.json`)
//! - `BOUTIQUE_CATALOG_PATH` - JSON catalog to load instead of the built-in one
//! - `BOUTIQUE_STORAGE_QUOTA_BYTES` - Maximum size of the storage file

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::store::{FileStore, StoreError};

const DEFAULT_STORE_PATH: &str = ".boutique/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// File backing the key-value store
    pub store_path: PathBuf,
    /// Catalog file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Maximum storage file size in bytes
    pub storage_quota_bytes: Option<usize>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            catalog_path: None,
            storage_quota_bytes: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_path = lookup("BOUTIQUE_STORE_PATH")
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);
        let catalog_path = lookup("BOUTIQUE_CATALOG_PATH")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let storage_quota_bytes = lookup("BOUTIQUE_STORAGE_QUOTA_BYTES")
            .map(|v| {
                v.parse::<usize>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "BOUTIQUE_STORAGE_QUOTA_BYTES".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            store_path,
            catalog_path,
            storage_quota_bytes,
        })
    }

    /// Load the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the configured catalog file is unreadable
    /// or invalid.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        self.catalog_path
            .as_deref()
            .map_or_else(|| Ok(Catalog::builtin()), Catalog::load)
    }

    /// Open the configured file store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage file exists but cannot be read.
    pub fn open_store(&self) -> Result<FileStore, StoreError> {
        let store = FileStore::open(&self.store_path)?;
        Ok(match self.storage_quota_bytes {
            Some(quota) => store.with_quota(quota),
            None => store,
        })
    }
}
