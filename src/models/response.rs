//! JSON envelopes shared by the REST server and the API client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Facets, PaginationMeta, Product, ProductFilter};

/// `{ "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Response of `GET /api/v1/products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub pagination: PaginationMeta,
    #[serde(default)]
    pub filters: ProductFilter,
}

/// Response of `GET /api/v1/products/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub data: Vec<Product>,
    pub pagination: PaginationMeta,
    pub facets: Facets,
}

/// Response of `GET /api/v1/categories/:id/products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProducts {
    pub data: Vec<Product>,
    pub pagination: PaginationMeta,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Uniform failure body: `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
