//! Product categories.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// Product category.
///
/// Serialized with the lowercase codes used by persisted carts and catalog
/// files (`"electronics"`, `"clothing"`, `"books"`, `"home"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Books,
    Home,
}

impl Category {
    /// Every category, in storefront filter-bar order.
    pub const ALL: [Self; 4] = [Self::Electronics, Self::Clothing, Self::Books, Self::Home];

    /// The wire code for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Books => "books",
            Self::Home => "home",
        }
    }

    /// Human-readable label shown to shoppers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "High-Tech",
            Self::Clothing => "Vêtements",
            Self::Books => "Librairie",
            Self::Home => "Maison",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electronics" => Ok(Self::Electronics),
            "clothing" => Ok(Self::Clothing),
            "books" => Ok(Self::Books),
            "home" => Ok(Self::Home),
            other => Err(CategoryError(other.to_string())),
        }
    }
}
