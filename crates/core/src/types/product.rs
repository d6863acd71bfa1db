//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// A purchasable product.
///
/// Products are immutable once loaded into a catalog. The field names are
/// part of the persisted cart format, since cart lines embed a full copy of
/// the product they were created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Unit price in minor currency units.
    pub price: Price,
    /// Opaque image reference (path or URL), never dereferenced here.
    pub image: String,
    pub description: String,
}
