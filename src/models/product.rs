//! Product model representing a single catalog entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A free-form attribute value attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

/// A product in the catalog
///
/// Products are loaded once at startup and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (e.g., "iphone-15-pro")
    pub id: String,

    /// Stock keeping unit
    pub sku: String,

    pub name: String,

    pub description: String,

    pub brand: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Unit price in `currency`
    pub price: f64,

    /// ISO 4217 currency code
    pub currency: String,

    /// Category id
    pub category: String,

    /// Optional subcategory id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    pub in_stock: bool,

    pub stock_quantity: u32,

    /// Average rating between 0.0 and 5.0
    pub rating: f64,

    pub review_count: u32,

    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is classified under the given category id,
    /// either directly or through its subcategory.
    pub fn belongs_to(&self, category_id: &str) -> bool {
        self.category == category_id || self.subcategory.as_deref() == Some(category_id)
    }

    /// Popularity score used for ranking popular products
    pub fn popularity(&self) -> f64 {
        self.rating * f64::from(self.review_count)
    }
}

/// Builder for creating Product instances
#[derive(Debug, Clone)]
pub struct ProductBuilder {
    product: Product,
}

impl ProductBuilder {
    /// Create a new builder with the identifying fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let epoch = DateTime::<Utc>::default();
        Self {
            product: Product {
                sku: id.to_uppercase(),
                id,
                name: name.into(),
                description: String::new(),
                brand: brand.into(),
                tags: Vec::new(),
                price: 0.0,
                currency: "USD".to_string(),
                category: category.into(),
                subcategory: None,
                in_stock: true,
                stock_quantity: 0,
                rating: 0.0,
                review_count: 0,
                attributes: BTreeMap::new(),
                created_at: epoch,
                updated_at: epoch,
            },
        }
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.product.sku = sku.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.product.description = description.into();
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.product.price = price;
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.product.currency = currency.into();
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.product.subcategory = Some(subcategory.into());
        self
    }

    /// Set stock; a zero quantity also marks the product as out of stock
    pub fn stock(mut self, quantity: u32) -> Self {
        self.product.stock_quantity = quantity;
        self.product.in_stock = quantity > 0;
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.product.in_stock = in_stock;
        self
    }

    pub fn rating(mut self, rating: f64, review_count: u32) -> Self {
        self.product.rating = rating;
        self.product.review_count = review_count;
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.product.attributes.insert(key.into(), value.into());
        self
    }

    /// Set both timestamps; `updated_at` never precedes `created_at`
    pub fn timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.product.created_at = created_at;
        self.product.updated_at = updated_at.max(created_at);
        self
    }

    pub fn build(self) -> Product {
        self.product
    }
}
