//! The in-memory catalog store.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{Category, Product};

use super::seed;

/// Errors raised while loading or validating a catalog
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    #[error("Product '{product}' references unknown category '{category}'")]
    UnknownCategory { product: String, category: String },

    #[error("Product '{product}' has rating {rating} outside 0-5")]
    InvalidRating { product: String, rating: f64 },

    #[error("Product '{product}' has invalid price {price}")]
    InvalidPrice { product: String, price: f64 },
}

/// On-disk catalog layout: `{ "products": [...], "categories": [...] }`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Immutable product and category data for the lifetime of the process
///
/// Built once at startup and shared by `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl CatalogStore {
    /// Build a store, checking ids are unique and every product reference resolves
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Result<Self, StoreError> {
        let mut category_ids = HashSet::new();
        for root in &categories {
            let mut duplicate = None;
            root.walk(&mut |c| {
                if !category_ids.insert(c.id.clone()) && duplicate.is_none() {
                    duplicate = Some(c.id.clone());
                }
            });
            if let Some(id) = duplicate {
                return Err(StoreError::DuplicateCategory(id));
            }
        }

        let mut product_ids = HashSet::new();
        for product in &products {
            if !product_ids.insert(product.id.as_str()) {
                return Err(StoreError::DuplicateProduct(product.id.clone()));
            }
            let references = std::iter::once(&product.category).chain(product.subcategory.as_ref());
            for category in references {
                if !category_ids.contains(category) {
                    return Err(StoreError::UnknownCategory {
                        product: product.id.clone(),
                        category: category.clone(),
                    });
                }
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(StoreError::InvalidRating {
                    product: product.id.clone(),
                    rating: product.rating,
                });
            }
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(StoreError::InvalidPrice {
                    product: product.id.clone(),
                    price: product.price,
                });
            }
        }

        Ok(Self {
            products,
            categories,
        })
    }

    /// The built-in sample catalog
    pub fn seeded() -> Self {
        Self {
            products: seed::products(),
            categories: seed::categories(),
        }
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        Self::new(file.products, file.categories)
    }

    /// All products in insertion order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Root categories with their subtrees
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find a category anywhere in the forest
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find_map(|root| root.find(id))
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductBuilder;
    use std::io::Write;

    #[test]
    fn test_seeded_catalog_is_valid() {
        let seeded = CatalogStore::seeded();
        let validated = CatalogStore::new(
            seeded.products().to_vec(),
            seeded.categories().to_vec(),
        );
        assert!(validated.is_ok(), "{:?}", validated.err());
        assert!(seeded.product("iphone-15-pro").is_some());
        assert!(seeded.category("smartphones").is_some());
    }

    #[test]
    fn test_rejects_duplicate_product() {
        let categories = vec![Category::new("books", "Books", "")];
        let products = vec![
            ProductBuilder::new("b1", "One", "Pub", "books").build(),
            ProductBuilder::new("b1", "Two", "Pub", "books").build(),
        ];
        let err = CatalogStore::new(products, categories).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateProduct(id) if id == "b1"));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let categories = vec![Category::new("books", "Books", "")];
        let products = vec![ProductBuilder::new("b1", "One", "Pub", "books")
            .subcategory("poetry")
            .build()];
        let err = CatalogStore::new(products, categories).unwrap_err();
        assert!(matches!(err, StoreError::UnknownCategory { category, .. } if category == "poetry"));
    }

    #[test]
    fn test_rejects_duplicate_category_in_subtree() {
        let categories = vec![
            Category::new("books", "Books", "").with_child(Category::new("fiction", "Fiction", "")),
            Category::new("fiction", "Fiction", ""),
        ];
        let err = CatalogStore::new(Vec::new(), categories).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateCategory(id) if id == "fiction"));
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        let categories = vec![Category::new("books", "Books", "")];
        let products = vec![ProductBuilder::new("b1", "One", "Pub", "books")
            .rating(5.5, 1)
            .build()];
        assert!(matches!(
            CatalogStore::new(products, categories),
            Err(StoreError::InvalidRating { .. })
        ));
    }

    #[test]
    fn test_load_from_json_file() {
        let seeded = CatalogStore::seeded();
        let file = CatalogFile {
            products: seeded.products()[..3].to_vec(),
            categories: seeded.categories().to_vec(),
        };

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(serde_json::to_string(&file).unwrap().as_bytes())
            .unwrap();

        let store = CatalogStore::from_json_file(tmp.path()).unwrap();
        assert_eq!(store.products().len(), 3);
        assert_eq!(store.products()[0], seeded.products()[0]);
    }

    #[test]
    fn test_load_from_invalid_json_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"{ not json").unwrap();
        assert!(matches!(
            CatalogStore::from_json_file(tmp.path()),
            Err(StoreError::Parse(_))
        ));
    }
}
