//! Shopper session: one cart plus the current catalog view.
//!
//! The view layer translates user input into [`Action`] values and hands
//! them to [`StorefrontSession::dispatch`], which routes each one to the
//! cart engine or the view query and returns the [`Notice`]s to show.

use std::sync::Arc;

use boutique_core::{Price, Product, ProductId};

use crate::cart::{CartEngine, CartUpdate, CheckoutError};
use crate::catalog::Catalog;
use crate::query::{CategoryFilter, SortKey, ViewQuery};
use crate::store::{KeyValueStore, StoreError};

/// A user interaction the session understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddToCart(ProductId),
    RemoveFromCart(ProductId),
    AdjustQuantity { id: ProductId, delta: i32 },
    ClearCart,
    Checkout,
    SelectCategory(CategoryFilter),
    Search(String),
    Sort(SortKey),
}

/// A transient message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AddedToCart,
    CartEmpty,
    OrderPlaced { item_count: u64, total: Price },
    /// The cart changed but could not be saved.
    NotSaved(String),
}

impl Notice {
    /// Shopper-facing text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::AddedToCart => "Produit ajouté au panier !".to_string(),
            Self::CartEmpty => "Votre panier est vide !".to_string(),
            Self::OrderPlaced { .. } => "Commande validée avec succès !".to_string(),
            Self::NotSaved(reason) => format!("Panier non sauvegardé : {reason}"),
        }
    }
}

/// Owns the cart engine and the view query for one shopper.
#[derive(Debug)]
pub struct StorefrontSession<S> {
    catalog: Arc<Catalog>,
    cart: CartEngine<S>,
    query: ViewQuery,
}

impl<S: KeyValueStore> StorefrontSession<S> {
    /// Start a session, hydrating the cart from `store`.
    pub fn new(catalog: Arc<Catalog>, store: S) -> Self {
        let cart = CartEngine::new(Arc::clone(&catalog), store);
        Self {
            catalog,
            cart,
            query: ViewQuery::default(),
        }
    }

    /// Apply one action and collect the notices it produced.
    pub fn dispatch(&mut self, action: Action) -> Vec<Notice> {
        tracing::debug!(?action, "Dispatching action");
        match action {
            Action::AddToCart(id) => {
                let update = self.cart.add(id);
                let mut notices = Vec::new();
                if update.change.is_addition() {
                    notices.push(Notice::AddedToCart);
                }
                notices.extend(not_saved(update));
                notices
            }
            Action::RemoveFromCart(id) => not_saved(self.cart.remove(id)).into_iter().collect(),
            Action::AdjustQuantity { id, delta } => {
                not_saved(self.cart.adjust_quantity(id, delta))
                    .into_iter()
                    .collect()
            }
            Action::ClearCart => not_saved(self.cart.clear()).into_iter().collect(),
            Action::Checkout => match self.cart.checkout() {
                Ok(receipt) => {
                    let mut notices = vec![Notice::OrderPlaced {
                        item_count: receipt.item_count,
                        total: receipt.total,
                    }];
                    if let Some(e) = receipt.persist_warning {
                        notices.push(Notice::NotSaved(e.to_string()));
                    }
                    notices
                }
                Err(CheckoutError::EmptyCart) => vec![Notice::CartEmpty],
            },
            Action::SelectCategory(category) => {
                self.query.category = category;
                Vec::new()
            }
            Action::Search(term) => {
                self.query.search = term;
                Vec::new()
            }
            Action::Sort(sort) => {
                self.query.sort = sort;
                Vec::new()
            }
        }
    }

    /// Products visible under the current query.
    #[must_use]
    pub fn view(&self) -> Vec<&Product> {
        self.query.apply(&self.catalog)
    }

    #[must_use]
    pub const fn query(&self) -> &ViewQuery {
        &self.query
    }

    #[must_use]
    pub const fn cart(&self) -> &CartEngine<S> {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// End the session, persisting the cart and returning the store.
    pub fn close(self) -> (S, Option<StoreError>) {
        self.cart.close()
    }
}

fn not_saved(update: CartUpdate) -> Option<Notice> {
    update
        .persist_warning
        .map(|e| Notice::NotSaved(e.to_string()))
}
