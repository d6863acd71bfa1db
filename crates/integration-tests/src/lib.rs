//! Integration tests for Boutique.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p boutique-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart engine against the file store, across restarts
//! - `catalog_view` - Catalog loading and view derivation end to end
//!
//! Each test gets its own temporary directory through [`TestContext`], so
//! tests never share a storage file.

use std::path::PathBuf;
use std::sync::Arc;

use boutique_storefront::{Catalog, FileStore, StorefrontConfig, StorefrontSession};
use tempfile::TempDir;

/// A storefront configuration rooted in a fresh temporary directory.
pub struct TestContext {
    pub dir: TempDir,
    pub config: StorefrontConfig,
}

impl TestContext {
    /// Create a context whose store file lives in a new temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StorefrontConfig {
            store_path: dir.path().join("storage.json"),
            ..StorefrontConfig::default()
        };
        Self { dir, config }
    }

    /// Path to a file inside the temporary directory.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Open a session the way the CLI does: configured catalog and store.
    ///
    /// # Panics
    ///
    /// Panics if the catalog or the store cannot be opened.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn open_session(&self) -> StorefrontSession<FileStore> {
        let catalog = self.config.load_catalog().expect("Failed to load catalog");
        let store = self.config.open_store().expect("Failed to open store");
        StorefrontSession::new(Arc::new(catalog), store)
    }

    /// The raw string stored under `key`, read straight from disk.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn stored(&self, key: &str) -> Option<String> {
        use boutique_storefront::KeyValueStore;
        FileStore::open(&self.config.store_path)
            .expect("Failed to open store")
            .get(key)
    }

    /// Shared built-in catalog.
    #[must_use]
    pub fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::builtin())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
