//! CLI command implementations.

pub mod cart;
pub mod products;

use std::io::Write;
use std::sync::Arc;

use boutique_storefront::{FileStore, Notice, StorefrontConfig, StorefrontError, StorefrontSession};

/// Session backed by the configured storage file.
pub type CliSession = StorefrontSession<FileStore>;

/// Load configuration, the catalog and the stored cart.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the catalog cannot be
/// loaded, or the storage file cannot be read.
pub fn open_session() -> Result<CliSession, StorefrontError> {
    let config = StorefrontConfig::from_env()?;
    let catalog = Arc::new(config.load_catalog()?);
    let store = config.open_store()?;
    tracing::debug!(path = %store.path().display(), "Opened storage");
    Ok(StorefrontSession::new(catalog, store))
}

/// Persist the cart a final time, reporting a failed write as a notice.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn close_session(session: CliSession, out: &mut impl Write) -> std::io::Result<()> {
    let (_, warning) = session.close();
    if let Some(e) = warning {
        print_notices(&[Notice::NotSaved(e.to_string())], out)?;
    }
    Ok(())
}

/// Write notices, one per line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn print_notices(notices: &[Notice], out: &mut impl Write) -> std::io::Result<()> {
    for notice in notices {
        writeln!(out, "✔ {}", notice.message())?;
    }
    Ok(())
}
