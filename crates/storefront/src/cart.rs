//! Persistent shopping cart.
//!
//! [`CartEngine`] owns the cart lines for the lifetime of a session. It is
//! hydrated from a [`KeyValueStore`] when constructed and writes the whole
//! cart back after every mutation. The in-memory lines are authoritative: a
//! rejected write is reported to the caller as a warning and never rolls the
//! cart back.
//!
//! # Invariants
//!
//! - Every line has `quantity >= 1`; a line whose quantity would drop to zero
//!   is removed instead.
//! - No two lines share a product id.
//!
//! Hydration enforces both on whatever the store returns, so they hold for
//! every reachable state.

use std::sync::Arc;

use boutique_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::Catalog;
use crate::store::{KeyValueStore, StoreError};

/// Store key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// One product in the cart together with its quantity.
///
/// Serializes as the product's fields plus `quantity` in a single flat
/// object, which is the persisted cart format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Product id of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// What a mutating cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended with quantity 1.
    Added { id: ProductId },
    /// An existing line's quantity went up by one.
    Incremented { id: ProductId, quantity: u32 },
    /// A line's quantity was set to a new positive value.
    QuantityChanged { id: ProductId, quantity: u32 },
    /// A line was removed.
    Removed { id: ProductId },
    /// All lines were removed.
    Cleared,
    /// Nothing matched; the cart and the store are untouched.
    Unchanged,
}

impl CartChange {
    /// Whether a product was put into the cart, which is what shoppers get
    /// a confirmation for.
    #[must_use]
    pub const fn is_addition(self) -> bool {
        matches!(self, Self::Added { .. } | Self::Incremented { .. })
    }
}

/// Result of a mutating cart operation.
#[derive(Debug)]
#[must_use]
pub struct CartUpdate {
    pub change: CartChange,
    /// Set when the write-through to the store failed. The change itself
    /// still applies in memory.
    pub persist_warning: Option<StoreError>,
}

impl CartUpdate {
    const fn unchanged() -> Self {
        Self {
            change: CartChange::Unchanged,
            persist_warning: None,
        }
    }
}

/// Errors returned by [`CartEngine::checkout`].
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Cannot check out an empty cart")]
    EmptyCart,
}

/// Snapshot of a cart taken at checkout, before it was cleared.
#[derive(Debug)]
pub struct CheckoutReceipt {
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    pub total: Price,
    pub persist_warning: Option<StoreError>,
}

/// Owns the cart and keeps the store in sync with it.
#[derive(Debug)]
pub struct CartEngine<S> {
    catalog: Arc<Catalog>,
    store: S,
    lines: Vec<CartLine>,
}

impl<S: KeyValueStore> CartEngine<S> {
    /// Create an engine and hydrate the cart from `store`.
    ///
    /// A missing or malformed cart blob yields an empty cart.
    pub fn new(catalog: Arc<Catalog>, store: S) -> Self {
        let lines = hydrate(&store);
        tracing::info!(lines = lines.len(), "Cart hydrated");
        Self {
            catalog,
            store,
            lines,
        }
    }

    /// Add one unit of a catalog product.
    ///
    /// Unknown product ids are ignored.
    #[instrument(skip(self), level = "debug")]
    pub fn add(&mut self, id: ProductId) -> CartUpdate {
        let Some(product) = self.catalog.get(id) else {
            tracing::debug!(%id, "Ignoring add of unknown product");
            return CartUpdate::unchanged();
        };
        let change = if let Some(line) = self.lines.iter_mut().find(|l| l.id() == id) {
            line.quantity = line.quantity.saturating_add(1);
            CartChange::Incremented {
                id,
                quantity: line.quantity,
            }
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
            CartChange::Added { id }
        };
        self.commit(change)
    }

    /// Remove the line for `id`, if present.
    #[instrument(skip(self), level = "debug")]
    pub fn remove(&mut self, id: ProductId) -> CartUpdate {
        let before = self.lines.len();
        self.lines.retain(|l| l.id() != id);
        if self.lines.len() == before {
            tracing::debug!(%id, "Ignoring remove of product not in cart");
            return CartUpdate::unchanged();
        }
        self.commit(CartChange::Removed { id })
    }

    /// Change the quantity of the line for `id` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line.
    #[instrument(skip(self), level = "debug")]
    pub fn adjust_quantity(&mut self, id: ProductId, delta: i32) -> CartUpdate {
        let Some(line) = self.lines.iter_mut().find(|l| l.id() == id) else {
            tracing::debug!(%id, "Ignoring quantity change for product not in cart");
            return CartUpdate::unchanged();
        };
        if delta == 0 {
            return CartUpdate::unchanged();
        }

        let next = i64::from(line.quantity) + i64::from(delta);
        if next <= 0 {
            return self.remove(id);
        }
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        let quantity = line.quantity;
        self.commit(CartChange::QuantityChanged { id, quantity })
    }

    /// Remove every line.
    #[instrument(skip(self), level = "debug")]
    pub fn clear(&mut self) -> CartUpdate {
        self.lines.clear();
        self.commit(CartChange::Cleared)
    }

    /// Take a snapshot of the cart and empty it.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to check out;
    /// the cart and the store are left untouched.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<CheckoutReceipt, CheckoutError> {
        if self.lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let item_count = self.total_item_count();
        let total = self.total_price();
        let lines = std::mem::take(&mut self.lines);
        let persist_warning = self.persist();
        tracing::info!(
            lines = lines.len(),
            item_count,
            total = total.minor_units(),
            "Checked out cart"
        );
        Ok(CheckoutReceipt {
            lines,
            item_count,
            total,
            persist_warning,
        })
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// The cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The catalog products are resolved against.
    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Persist the cart one last time and hand back the store.
    pub fn close(mut self) -> (S, Option<StoreError>) {
        let warning = self.persist();
        (self.store, warning)
    }

    fn commit(&mut self, change: CartChange) -> CartUpdate {
        CartUpdate {
            change,
            persist_warning: self.persist(),
        }
    }

    fn persist(&mut self) -> Option<StoreError> {
        let result = encode_cart(&self.lines)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(CART_KEY, &json));
        match result {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist cart; keeping in-memory state");
                Some(e)
            }
        }
    }
}

/// Serialize cart lines into the persisted format (a JSON array).
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode_cart(lines: &[CartLine]) -> Result<String, serde_json::Error> {
    serde_json::to_string(lines)
}

/// Parse cart lines from the persisted format.
///
/// The result is not normalized; see [`normalize_lines`].
///
/// # Errors
///
/// Returns `serde_json::Error` if the input is not a JSON array of lines.
pub fn decode_cart(json: &str) -> Result<Vec<CartLine>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Drop zero-quantity lines and merge lines sharing a product id.
///
/// Merged lines keep the position and product data of their first
/// occurrence.
#[must_use]
pub fn normalize_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut normalized: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|l| l.quantity > 0) {
        if let Some(existing) = normalized.iter_mut().find(|l| l.id() == line.id()) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            normalized.push(line);
        }
    }
    normalized
}

fn hydrate(store: &impl KeyValueStore) -> Vec<CartLine> {
    let Some(json) = store.get(CART_KEY) else {
        return Vec::new();
    };
    match decode_cart(&json) {
        Ok(lines) => normalize_lines(lines),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed persisted cart");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::Category;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::store::MemoryStore;

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    fn engine() -> CartEngine<MemoryStore> {
        CartEngine::new(Arc::new(Catalog::builtin()), MemoryStore::new())
    }

    fn stored_lines(engine: &CartEngine<MemoryStore>) -> Vec<CartLine> {
        decode_cart(&engine.store().get(CART_KEY).unwrap()).unwrap()
    }

    fn assert_invariants(engine: &CartEngine<MemoryStore>) {
        let lines = engine.lines();
        assert!(lines.iter().all(|l| l.quantity >= 1));
        for (i, line) in lines.iter().enumerate() {
            let rest = &lines[i + 1..];
            assert!(rest.iter().all(|other| other.id() != line.id()));
        }
        assert_eq!(
            engine.total_item_count(),
            lines.iter().map(|l| u64::from(l.quantity)).sum::<u64>()
        );
        assert_eq!(
            engine.total_price().minor_units(),
            lines
                .iter()
                .map(|l| l.product.price.minor_units() * u64::from(l.quantity))
                .sum::<u64>()
        );
    }

    #[test]
    fn test_add_to_empty_cart() {
        let mut cart = engine();
        let update = cart.add(id(1));

        assert_eq!(update.change, CartChange::Added { id: id(1) });
        assert!(update.change.is_addition());
        assert!(update.persist_warning.is_none());
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.lines()[0].product.name, "Smartphone Premium");
        assert_eq!(cart.total_item_count(), 1);
        assert_eq!(stored_lines(&cart), cart.lines());
    }

    #[test]
    fn test_add_existing_increments() {
        let mut cart = engine();
        let _ = cart.add(id(1));
        let update = cart.add(id(1));

        assert_eq!(
            update.change,
            CartChange::Incremented {
                id: id(1),
                quantity: 2
            }
        );
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(id(1)).unwrap().quantity, 2);
        assert_eq!(stored_lines(&cart)[0].quantity, 2);
    }

    #[test]
    fn test_add_unknown_product_is_noop() {
        let mut cart = engine();
        let update = cart.add(id(404));

        assert_eq!(update.change, CartChange::Unchanged);
        assert!(cart.is_empty());
        assert_eq!(cart.store().get(CART_KEY), None);
    }

    #[test]
    fn test_add_hydrated_line_missing_from_catalog_is_noop() {
        let retired = Product {
            id: id(99),
            name: "Lampe Vintage".to_string(),
            category: Category::Home,
            price: Price::from_minor(12_000),
            image: "images/lampe.jpg".to_string(),
            description: "Retirée du catalogue".to_string(),
        };
        let blob = encode_cart(&[CartLine {
            product: retired,
            quantity: 1,
        }])
        .unwrap();
        let store = MemoryStore::new().with_entry(CART_KEY, &blob);
        let mut cart = CartEngine::new(Arc::new(Catalog::builtin()), store);

        let update = cart.add(id(99));

        assert_eq!(update.change, CartChange::Unchanged);
        assert_eq!(cart.line(id(99)).unwrap().quantity, 1);
        assert_eq!(cart.store().get(CART_KEY).as_deref(), Some(blob.as_str()));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = engine();
        let _ = cart.add(id(5));
        let _ = cart.add(id(2));
        let _ = cart.add(id(5));
        let ids: Vec<_> = cart.lines().iter().map(CartLine::id).collect();
        assert_eq!(ids, vec![id(5), id(2)]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = engine();
        let _ = cart.add(id(1));
        let _ = cart.add(id(2));

        assert_eq!(cart.remove(id(1)).change, CartChange::Removed { id: id(1) });
        let once = cart.lines().to_vec();
        assert_eq!(cart.remove(id(1)).change, CartChange::Unchanged);
        assert_eq!(cart.lines(), once.as_slice());
        assert_eq!(stored_lines(&cart), once);
    }

    #[test]
    fn test_adjust_to_zero_removes_line() {
        let mut cart = engine();
        let _ = cart.add(id(1));
        let update = cart.adjust_quantity(id(1), -1);

        assert_eq!(update.change, CartChange::Removed { id: id(1) });
        assert!(cart.is_empty());
        assert!(stored_lines(&cart).is_empty());
    }

    #[test]
    fn test_adjust_below_zero_removes_line() {
        let mut cart = engine();
        let _ = cart.add(id(3));
        let _ = cart.add(id(3));
        let _ = cart.adjust_quantity(id(3), -5);
        assert!(cart.line(id(3)).is_none());
    }

    #[test]
    fn test_adjust_updates_in_place() {
        let mut cart = engine();
        let _ = cart.add(id(3));
        let _ = cart.add(id(4));
        let update = cart.adjust_quantity(id(3), 4);

        assert_eq!(
            update.change,
            CartChange::QuantityChanged {
                id: id(3),
                quantity: 5
            }
        );
        assert_eq!(cart.lines()[0].id(), id(3));
        assert_eq!(cart.total_item_count(), 6);
        assert_eq!(cart.total_price(), Price::from_minor(5 * 20_000 + 12_000));
    }

    #[test]
    fn test_adjust_missing_line_is_noop() {
        let mut cart = engine();
        assert_eq!(cart.adjust_quantity(id(1), 1).change, CartChange::Unchanged);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_saturates_at_max_quantity() {
        let mut cart = engine();
        let _ = cart.add(id(1));
        let _ = cart.adjust_quantity(id(1), i32::MAX);
        let _ = cart.adjust_quantity(id(1), i32::MAX);
        let _ = cart.adjust_quantity(id(1), i32::MAX);
        assert_eq!(cart.line(id(1)).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_clear_persists_empty_sequence() {
        let mut cart = engine();
        let _ = cart.add(id(1));
        let _ = cart.add(id(7));
        let update = cart.clear();

        assert_eq!(update.change, CartChange::Cleared);
        assert!(cart.is_empty());
        assert_eq!(cart.store().get(CART_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_empty_totals_are_zero() {
        let cart = engine();
        assert_eq!(cart.total_item_count(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_hydrates_from_store() {
        let mut first = engine();
        let _ = first.add(id(2));
        let _ = first.add(id(2));
        let _ = first.add(id(9));
        let (store, warning) = first.close();
        assert!(warning.is_none());

        let second = CartEngine::new(Arc::new(Catalog::builtin()), store);
        assert_eq!(second.lines().len(), 2);
        assert_eq!(second.line(id(2)).unwrap().quantity, 2);
        assert_eq!(
            second.total_price(),
            Price::from_minor(2 * 750_000 + 15_000)
        );
    }

    #[test]
    fn test_malformed_store_yields_empty_cart() {
        let negative = serde_json::json!([{
            "id": 1,
            "name": "x",
            "category": "home",
            "price": 1,
            "image": "",
            "description": "",
            "quantity": -2
        }])
        .to_string();
        for blob in ["not json", "{}", r#"[{"id": 1}]"#, negative.as_str()] {
            let store = MemoryStore::new().with_entry(CART_KEY, blob);
            let cart = CartEngine::new(Arc::new(Catalog::builtin()), store);
            assert!(cart.is_empty(), "blob {blob:?} should hydrate empty");
        }
    }

    #[test]
    fn test_hydration_normalizes_lines() {
        let product = Catalog::builtin().get(id(4)).unwrap().clone();
        let other = Catalog::builtin().get(id(8)).unwrap().clone();
        let raw = vec![
            CartLine {
                product: product.clone(),
                quantity: 2,
            },
            CartLine {
                product: other.clone(),
                quantity: 0,
            },
            CartLine {
                product,
                quantity: 3,
            },
        ];
        let store = MemoryStore::new().with_entry(CART_KEY, &encode_cart(&raw).unwrap());
        let cart = CartEngine::new(Arc::new(Catalog::builtin()), store);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].id(), id(4));
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_round_trip_serialization() {
        let mut cart = engine();
        for n in [1, 3, 3, 10, 12, 3] {
            let _ = cart.add(id(n));
        }
        let _ = cart.adjust_quantity(id(10), 6);

        let json = encode_cart(cart.lines()).unwrap();
        assert_eq!(decode_cart(&json).unwrap(), cart.lines());
    }

    #[test]
    fn test_persisted_format_is_flat() {
        let mut cart = engine();
        let _ = cart.add(id(3));
        let value: serde_json::Value =
            serde_json::from_str(&cart.store().get(CART_KEY).unwrap()).unwrap();

        let line = &value[0];
        assert_eq!(line["id"], 3);
        assert_eq!(line["name"], "Casque Audio");
        assert_eq!(line["category"], "electronics");
        assert_eq!(line["price"], 20_000);
        assert_eq!(line["image"], "images/casque.jpg");
        assert_eq!(line["quantity"], 1);
    }

    #[test]
    fn test_store_failure_keeps_memory_state() {
        let store = MemoryStore::with_quota(16);
        let mut cart = CartEngine::new(Arc::new(Catalog::builtin()), store);
        let update = cart.add(id(1));

        assert_eq!(update.change, CartChange::Added { id: id(1) });
        assert!(matches!(
            update.persist_warning,
            Some(StoreError::QuotaExceeded { .. })
        ));
        assert_eq!(cart.total_item_count(), 1);
        assert_eq!(cart.store().get(CART_KEY), None);

        // Clearing fits in the quota again
        let update = cart.clear();
        assert!(update.persist_warning.is_none());
        assert_eq!(cart.store().get(CART_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut cart = engine();
        assert!(matches!(cart.checkout(), Err(CheckoutError::EmptyCart)));
        assert_eq!(cart.store().get(CART_KEY), None);
    }

    #[test]
    fn test_checkout_snapshots_and_clears() {
        let mut cart = engine();
        let _ = cart.add(id(5));
        let _ = cart.add(id(5));
        let _ = cart.add(id(10));

        let receipt = cart.checkout().unwrap();
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.item_count, 3);
        assert_eq!(receipt.total, Price::from_minor(2 * 4_500 + 5_000));
        assert!(receipt.persist_warning.is_none());
        assert!(cart.is_empty());
        assert_eq!(cart.store().get(CART_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_invariants_hold_over_operation_sequence() {
        let mut cart = engine();
        let mut rng = StdRng::seed_from_u64(0x2545_F491);
        for _ in 0..500 {
            let product = id(rng.random_range(0..14));
            let _ = match rng.random_range(0..6) {
                0 | 1 => cart.add(product),
                2 => cart.remove(product),
                3 => cart.adjust_quantity(product, 1),
                4 => cart.adjust_quantity(product, -1),
                _ if rng.random_ratio(1, 8) => cart.clear(),
                _ => cart.adjust_quantity(product, -2),
            };
            assert_invariants(&cart);
            // Nothing is written until the first effective mutation
            let stored = cart
                .store()
                .get(CART_KEY)
                .map(|json| decode_cart(&json).unwrap())
                .unwrap_or_default();
            assert_eq!(stored, cart.lines());
        }
    }
}
