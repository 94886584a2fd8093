//! Query parameters and derived result types for catalog operations.
//!
//! The `*Params` structs double as the HTTP query-string contract: the REST
//! server deserializes them and the API client serializes them, skipping
//! every absent field.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Sort field for product listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Name,
    Price,
    Rating,
    CreatedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Price => "price",
            SortBy::Rating => "rating",
            SortBy::CreatedAt => "createdAt",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Apply the direction to an ascending comparison result
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Attribute predicates for product listings and searches, ANDed together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Only `Some(true)` restricts the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl ProductFilter {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }

    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Reject non-finite or negative price bounds, then an inverted range
    pub fn validate_prices(&self) -> Result<(), QueryError> {
        for (field, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(value) = bound {
                if !value.is_finite() || value < 0.0 {
                    return Err(QueryError::InvalidPrice { field, value });
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(QueryError::InvalidPriceRange { min, max });
            }
        }
        Ok(())
    }
}

/// Errors raised while building query inputs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("page must be at least 1")]
    InvalidPage,

    #[error("limit must be between 1 and {max}, got {limit}")]
    InvalidLimit { limit: u32, max: u32 },

    #[error("{field} must be a non-negative number, got {value}")]
    InvalidPrice { field: &'static str, value: f64 },

    #[error("min_price ({min}) must not exceed max_price ({max})")]
    InvalidPriceRange { min: f64, max: f64 },

    #[error("min_rating must be between 0 and 5, got {0}")]
    InvalidRating(f64),
}

/// A validated page request; zero pages and zero limits are unrepresentable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: NonZeroU32,
    limit: NonZeroU32,
}

impl PageRequest {
    /// Validate a 1-based page and a page size no larger than `max_limit`
    pub fn new(page: u32, limit: u32, max_limit: u32) -> Result<Self, QueryError> {
        let page = NonZeroU32::new(page).ok_or(QueryError::InvalidPage)?;
        let limit = NonZeroU32::new(limit)
            .filter(|l| l.get() <= max_limit)
            .ok_or(QueryError::InvalidLimit {
                limit,
                max: max_limit,
            })?;
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page.get()
    }

    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page() as usize - 1) * self.limit() as usize
    }
}

/// Typed product listing request
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub page: PageRequest,
}

/// Typed free-text search request
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSearch {
    pub query: String,
    pub filter: ProductFilter,
    pub page: PageRequest,
}

/// Typed popular-products request
#[derive(Debug, Clone, PartialEq)]
pub struct PopularQuery {
    pub category: Option<String>,
    pub min_rating: f64,
    pub limit: usize,
}

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(request: PageRequest, total: usize) -> Self {
        let limit = request.limit() as usize;
        let total_pages = total.div_ceil(limit);
        let page = request.page();
        Self {
            page,
            limit: request.limit(),
            total,
            total_pages,
            has_next: (page as usize) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// A page of items plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

/// A single facet value and how many results carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Facets over a search result set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub categories: Vec<FacetCount>,
    pub brands: Vec<FacetCount>,
}

/// Price statistics for the products of a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub category_id: String,
    pub min: f64,
    pub max: f64,
    /// Mean price rounded to two decimals
    pub average: f64,
    pub count: usize,
    pub currency: String,
}

/// Stock classification of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    InStock,
    LimitedStock,
    OutOfStock,
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AvailabilityStatus::InStock => "in_stock",
            AvailabilityStatus::LimitedStock => "limited_stock",
            AvailabilityStatus::OutOfStock => "out_of_stock",
        };
        f.write_str(label)
    }
}

/// Availability report for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub product_id: String,
    pub product_name: String,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub status: AvailabilityStatus,
}

// ========== HTTP QUERY PARAMETERS ==========

/// `GET /api/v1/products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl ProductListParams {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            category: self.category.clone(),
            brand: self.brand.clone(),
            in_stock: self.in_stock,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// `GET /api/v1/products/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl SearchParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Default::default()
        }
    }

    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            category: self.category.clone(),
            brand: self.brand.clone(),
            in_stock: self.in_stock,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// `GET /api/v1/products/popular`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopularParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

/// `GET /api/v1/categories`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_product_count: Option<bool>,
}

/// `page`/`limit` pair for endpoints that only paginate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// `limit` alone, used by recommendations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
