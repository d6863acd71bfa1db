//! Catalog view derivation: category filter, text search and sorting.
//!
//! [`derive_view`] is a pure function of its inputs. It runs three stages in
//! a fixed order, each one narrowing or reordering the output of the
//! previous stage:
//!
//! 1. Category filter
//! 2. Case-insensitive search on name or description
//! 3. Sort
//!
//! The catalog is never modified; every call returns a fresh list of
//! references into it.

use std::cmp::Reverse;

use boutique_core::{Category, Product};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::catalog::Catalog;

/// Category stage input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Keep every product.
    #[default]
    All,
    /// Keep products in one category.
    Only(Category),
    /// A category code no product can have; keeps nothing.
    Unknown(String),
}

impl CategoryFilter {
    /// Parse from a filter value such as `"all"` or `"books"`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "all" => Self::All,
            other => other
                .parse::<Category>()
                .map_or_else(|_| Self::Unknown(other.to_string()), Self::Only),
        }
    }

    /// Convert back to the filter value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
            Self::Unknown(code) => code,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
            Self::Unknown(_) => false,
        }
    }
}

/// Sort stage input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Keep catalog order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    /// Alphabetical by name, accents sorting with their base letter.
    Name,
}

impl SortKey {
    /// Parse from a sort selector value. Unrecognized values keep catalog
    /// order.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "name" => Self::Name,
            _ => Self::Default,
        }
    }

    /// Convert to the sort selector value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Name => "name",
        }
    }
}

/// The three inputs of a catalog view, as held by the view layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub category: CategoryFilter,
    pub search: String,
    pub sort: SortKey,
}

impl ViewQuery {
    /// Derive the visible products from `catalog`.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        derive_view(catalog.products(), &self.category, &self.search, self.sort)
    }
}

/// Filter, search and sort `products`.
///
/// A blank `search` disables the search stage; otherwise it is matched
/// as given, surrounding spaces included. Price sorts are stable, so
/// products with equal prices keep their relative order.
#[must_use]
pub fn derive_view<'a>(
    products: &'a [Product],
    category: &CategoryFilter,
    search: &str,
    sort: SortKey,
) -> Vec<&'a Product> {
    let mut view: Vec<&Product> = products.iter().filter(|p| category.matches(p)).collect();

    if !search.trim().is_empty() {
        let term = search.to_lowercase();
        view.retain(|p| {
            p.name.to_lowercase().contains(&term) || p.description.to_lowercase().contains(&term)
        });
    }

    match sort {
        SortKey::PriceAsc => view.sort_by_key(|p| p.price),
        SortKey::PriceDesc => view.sort_by_key(|p| Reverse(p.price)),
        SortKey::Name => view.sort_by_cached_key(|p| CollationKey::new(&p.name)),
        SortKey::Default => {}
    }
    view
}

/// Compare two names in natural alphabetical order.
///
/// Letters compare by base letter first, so `"Écharpe"` sorts between
/// `"Coussin"` and `"Jean"`. Ties are broken by accents (unaccented
/// first), then by case (lowercase first), then by the raw string.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

/// Multi-level sort key; field order is comparison order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    base: String,
    accents: String,
    uppercase: Vec<bool>,
    raw: String,
}

impl CollationKey {
    fn new(s: &str) -> Self {
        let decomposed: String = s.nfd().collect();
        let accents = decomposed.to_lowercase();
        let base = accents.chars().filter(|&c| !is_combining_mark(c)).collect();
        let uppercase = decomposed.chars().map(char::is_uppercase).collect();
        Self {
            base,
            accents,
            uppercase,
            raw: s.to_string(),
        }
    }
}
