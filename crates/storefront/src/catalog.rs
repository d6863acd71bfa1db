//! Static product catalog.
//!
//! The catalog is loaded once at startup, either from the built-in product
//! list or from a JSON file, and is never mutated afterwards. It is shared
//! between the cart engine and the view layer behind an `Arc`.

use std::collections::HashMap;
use std::path::Path;

use boutique_core::{Category, Price, Product, ProductId};

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Product id must be positive (got {0})")]
    InvalidId(ProductId),
    #[error("Duplicate product id: {0}")]
    DuplicateId(ProductId),
}

/// A fixed, ordered set of products with id lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from an ordered list of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidId` for a non-positive id and
    /// `CatalogError::DuplicateId` when two products share an id.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if product.id.as_i32() <= 0 {
                return Err(CatalogError::InvalidId(product.id));
            }
            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the products fail
    /// validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are not a
    /// valid catalog.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// The storefront's built-in product list.
    #[must_use]
    pub fn builtin() -> Self {
        let products = BUILTIN_PRODUCTS
            .iter()
            .map(|&(id, name, category, price, image, description)| Product {
                id: ProductId::new(id),
                name: name.to_string(),
                category,
                price: Price::from_minor(price),
                image: image.to_string(),
                description: description.to_string(),
            })
            .collect::<Vec<_>>();
        let index = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id, position))
            .collect();
        Self { products, index }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|&position| self.products.get(position))
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

type ProductRow = (i32, &'static str, Category, u64, &'static str, &'static str);

const BUILTIN_PRODUCTS: &[ProductRow] = &[
    (
        1,
        "Smartphone Premium",
        Category::Electronics,
        350_000,
        "images/smartphone.jpg",
        "Smartphone dernière génération avec écran OLED",
    ),
    (
        2,
        "Laptop Pro",
        Category::Electronics,
        750_000,
        "images/laptop.jpg",
        "Ordinateur portable haute performance",
    ),
    (
        3,
        "Casque Audio",
        Category::Electronics,
        20_000,
        "images/casque.jpg",
        "Casque sans fil avec réduction de bruit",
    ),
    (
        4,
        "T-Shirt Premium",
        Category::Clothing,
        12_000,
        "images/tshirt.jpg",
        "T-shirt en coton bio de qualité supérieure",
    ),
    (
        5,
        "Jean Slim",
        Category::Clothing,
        4_500,
        "images/jean.jpg",
        "Jean confortable et élégant",
    ),
    (
        6,
        "Veste en Cuir",
        Category::Clothing,
        15_000,
        "images/veste.jpg",
        "Veste en cuir véritable",
    ),
    (
        7,
        "Roman Bestseller",
        Category::Books,
        12_000,
        "images/livre.jpg",
        "Le roman le plus vendu de l'année",
    ),
    (
        8,
        "Guide de Cuisine",
        Category::Books,
        9_000,
        "images/cuisine.jpg",
        "Apprenez à cuisiner comme un chef",
    ),
    (
        9,
        "Lampe Design",
        Category::Home,
        15_000,
        "images/lampe.jpg",
        "Lampe moderne pour votre intérieur",
    ),
    (
        10,
        "Coussin Décoratif",
        Category::Home,
        5_000,
        "images/coussin.jpg",
        "Coussin confortable et élégant",
    ),
    (
        11,
        "Montre Connectée",
        Category::Electronics,
        18_000,
        "images/montre.jpg",
        "Montre intelligente avec suivi santé",
    ),
    (
        12,
        "Tapis Moderne",
        Category::Home,
        90_000,
        "images/tapis.jpg",
        "Tapis doux et design pour salon",
    ),
];
