use std::sync::Arc;

use axum::extract::FromRef;

use super::service::{CategoryService, ProductService};
use crate::config::CatalogConfig;
use crate::models::{PageRequest, QueryError};

pub type GuardedProductService = Arc<dyn ProductService>;
pub type GuardedCategoryService = Arc<dyn CategoryService>;

const DEFAULT_RECOMMENDATIONS_LIMIT: u32 = 5;
const DEFAULT_POPULAR_LIMIT: u32 = 10;

/// Defaults applied to absent query-string parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryDefaults {
    pub page_size: u32,
    pub max_page_size: u32,
    pub popular_min_rating: f64,
}

impl QueryDefaults {
    pub fn page(&self, page: Option<u32>, limit: Option<u32>) -> Result<PageRequest, QueryError> {
        PageRequest::new(
            page.unwrap_or(1),
            limit.unwrap_or(self.page_size),
            self.max_page_size,
        )
    }

    fn bounded(&self, limit: Option<u32>, default: u32) -> Result<usize, QueryError> {
        let limit = limit.unwrap_or(default);
        if limit == 0 || limit > self.max_page_size {
            return Err(QueryError::InvalidLimit {
                limit,
                max: self.max_page_size,
            });
        }
        Ok(limit as usize)
    }

    pub fn recommendations_limit(&self, limit: Option<u32>) -> Result<usize, QueryError> {
        self.bounded(limit, DEFAULT_RECOMMENDATIONS_LIMIT)
    }

    pub fn popular_limit(&self, limit: Option<u32>) -> Result<usize, QueryError> {
        self.bounded(limit, DEFAULT_POPULAR_LIMIT)
    }
}

impl From<&CatalogConfig> for QueryDefaults {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            page_size: config.default_page_size,
            max_page_size: config.max_page_size,
            popular_min_rating: config.popular_min_rating,
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self::from(&CatalogConfig::default())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub products: GuardedProductService,
    pub categories: GuardedCategoryService,
    pub defaults: QueryDefaults,
}

impl FromRef<AppState> for GuardedProductService {
    fn from_ref(input: &AppState) -> Self {
        input.products.clone()
    }
}

impl FromRef<AppState> for GuardedCategoryService {
    fn from_ref(input: &AppState) -> Self {
        input.categories.clone()
    }
}

impl FromRef<AppState> for QueryDefaults {
    fn from_ref(input: &AppState) -> Self {
        input.defaults
    }
}
