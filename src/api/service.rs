//! Business operations over the repositories.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::repository::{CategoryRepository, ProductRepository, SearchOutcome};
use crate::models::{
    Availability, Category, Page, PageRequest, PopularQuery, PriceRange, Product, ProductQuery,
    ProductSearch, QueryError,
};

/// Failures of a catalog operation
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("No products found in category: {0}")]
    NoProductsInCategory(String),

    #[error("{0}")]
    InvalidQuery(#[from] QueryError),
}

pub trait ProductService: Send + Sync {
    fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>, ServiceError>;

    fn search_products(&self, search: &ProductSearch) -> Result<SearchOutcome, ServiceError>;

    fn get_product(&self, id: &str) -> Result<Product, ServiceError>;

    fn get_recommendations(&self, id: &str, limit: usize) -> Result<Vec<Product>, ServiceError>;

    fn get_availability(&self, id: &str) -> Result<Availability, ServiceError>;

    fn get_popular_products(&self, query: &PopularQuery) -> Result<Vec<Product>, ServiceError>;
}

pub trait CategoryService: Send + Sync {
    fn get_categories(
        &self,
        parent_id: Option<&str>,
        include_product_count: bool,
    ) -> Result<Vec<Category>, ServiceError>;

    fn get_category(&self, id: &str) -> Result<Category, ServiceError>;

    fn get_category_products(
        &self,
        id: &str,
        page: PageRequest,
    ) -> Result<Page<Product>, ServiceError>;

    fn get_price_range(&self, id: &str) -> Result<PriceRange, ServiceError>;
}

pub struct CatalogProductService {
    repository: Arc<dyn ProductRepository>,
}

impl CatalogProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

impl ProductService for CatalogProductService {
    fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>, ServiceError> {
        query.filter.validate_prices()?;
        Ok(self.repository.list(query))
    }

    fn search_products(&self, search: &ProductSearch) -> Result<SearchOutcome, ServiceError> {
        search.filter.validate_prices()?;
        let outcome = self.repository.search(search);
        debug!(
            "Search '{}' matched {} products",
            search.query, outcome.page.pagination.total
        );
        Ok(outcome)
    }

    fn get_product(&self, id: &str) -> Result<Product, ServiceError> {
        self.repository
            .find_by_id(id)
            .ok_or_else(|| ServiceError::ProductNotFound(id.to_string()))
    }

    fn get_recommendations(&self, id: &str, limit: usize) -> Result<Vec<Product>, ServiceError> {
        self.repository
            .recommendations(id, limit)
            .ok_or_else(|| ServiceError::ProductNotFound(id.to_string()))
    }

    fn get_availability(&self, id: &str) -> Result<Availability, ServiceError> {
        self.repository
            .availability(id)
            .ok_or_else(|| ServiceError::ProductNotFound(id.to_string()))
    }

    fn get_popular_products(&self, query: &PopularQuery) -> Result<Vec<Product>, ServiceError> {
        if !(0.0..=5.0).contains(&query.min_rating) {
            return Err(QueryError::InvalidRating(query.min_rating).into());
        }
        Ok(self.repository.popular(query))
    }
}

pub struct CatalogCategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CatalogCategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }
}

impl CategoryService for CatalogCategoryService {
    fn get_categories(
        &self,
        parent_id: Option<&str>,
        include_product_count: bool,
    ) -> Result<Vec<Category>, ServiceError> {
        self.repository
            .list(parent_id, include_product_count)
            .ok_or_else(|| ServiceError::CategoryNotFound(parent_id.unwrap_or_default().to_string()))
    }

    fn get_category(&self, id: &str) -> Result<Category, ServiceError> {
        self.repository
            .find_by_id(id)
            .ok_or_else(|| ServiceError::CategoryNotFound(id.to_string()))
    }

    fn get_category_products(
        &self,
        id: &str,
        page: PageRequest,
    ) -> Result<Page<Product>, ServiceError> {
        Ok(self.repository.products(id, page))
    }

    fn get_price_range(&self, id: &str) -> Result<PriceRange, ServiceError> {
        self.repository
            .price_range(id)
            .ok_or_else(|| ServiceError::NoProductsInCategory(id.to_string()))
    }
}
