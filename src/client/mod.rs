//! HTTP client for the catalog REST API.
//!
//! [`CatalogApi`] is the seam the MCP tools depend on; [`CatalogClient`] is
//! its reqwest implementation.

mod error;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::models::{
    Availability, Category, CategoryListParams, CategoryProducts, DataResponse, ErrorBody,
    LimitParams, PageParams, PopularParams, PriceRange, Product, ProductListParams, ProductPage,
    SearchParams, SearchResults,
};
use crate::utils::HttpClient;

pub use error::ClientError;

/// Operations of the catalog API
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_products(&self, params: &ProductListParams) -> Result<ProductPage, ClientError>;

    async fn search_products(&self, params: &SearchParams) -> Result<SearchResults, ClientError>;

    async fn get_product(&self, id: &str) -> Result<Product, ClientError>;

    async fn get_recommendations(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Product>, ClientError>;

    async fn get_availability(&self, id: &str) -> Result<Availability, ClientError>;

    async fn get_popular_products(
        &self,
        params: &PopularParams,
    ) -> Result<Vec<Product>, ClientError>;

    async fn get_categories(
        &self,
        params: &CategoryListParams,
    ) -> Result<Vec<Category>, ClientError>;

    async fn get_category(&self, id: &str) -> Result<Category, ClientError>;

    async fn get_category_products(
        &self,
        id: &str,
        params: &PageParams,
    ) -> Result<CategoryProducts, ClientError>;

    async fn get_price_range(&self, id: &str) -> Result<PriceRange, ClientError>;

    /// True when the API answers its health probe with a success status
    async fn health(&self) -> bool;
}

/// reqwest-backed [`CatalogApi`]
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: HttpClient,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for `config.base_url` using the configured timeouts
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = HttpClient::new(config)?;
        Self::with_http(http, &config.base_url)
    }

    /// Create a client for `base_url` with default timeouts
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        Self::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    pub fn with_http(http: HttpClient, base_url: &str) -> Result<Self, ClientError> {
        url::Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        self.http.client().get(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            debug!("Catalog API returned {}: {}", status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let envelope: DataResponse<T> = self.send(request).await?;
        Ok(envelope.data)
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_products(&self, params: &ProductListParams) -> Result<ProductPage, ClientError> {
        self.send(self.request("/api/v1/products").query(params))
            .await
    }

    async fn search_products(&self, params: &SearchParams) -> Result<SearchResults, ClientError> {
        self.send(self.request("/api/v1/products/search").query(params))
            .await
    }

    async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        self.data(self.request(&format!("/api/v1/products/{}", segment(id))))
            .await
    }

    async fn get_recommendations(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Product>, ClientError> {
        let path = format!("/api/v1/products/{}/recommendations", segment(id));
        self.data(self.request(&path).query(&LimitParams { limit }))
            .await
    }

    async fn get_availability(&self, id: &str) -> Result<Availability, ClientError> {
        let path = format!("/api/v1/products/{}/availability", segment(id));
        self.data(self.request(&path)).await
    }

    async fn get_popular_products(
        &self,
        params: &PopularParams,
    ) -> Result<Vec<Product>, ClientError> {
        self.data(self.request("/api/v1/products/popular").query(params))
            .await
    }

    async fn get_categories(
        &self,
        params: &CategoryListParams,
    ) -> Result<Vec<Category>, ClientError> {
        self.data(self.request("/api/v1/categories").query(params))
            .await
    }

    async fn get_category(&self, id: &str) -> Result<Category, ClientError> {
        self.data(self.request(&format!("/api/v1/categories/{}", segment(id))))
            .await
    }

    async fn get_category_products(
        &self,
        id: &str,
        params: &PageParams,
    ) -> Result<CategoryProducts, ClientError> {
        let path = format!("/api/v1/categories/{}/products", segment(id));
        self.send(self.request(&path).query(params)).await
    }

    async fn get_price_range(&self, id: &str) -> Result<PriceRange, ClientError> {
        let path = format!("/api/v1/categories/{}/price-range", segment(id));
        self.data(self.request(&path)).await
    }

    async fn health(&self) -> bool {
        match self.request("/health").send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Catalog API health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductBuilder, SortBy, SortOrder};
    use mockito::Matcher;

    fn product(id: &str) -> Product {
        ProductBuilder::new(id, "Widget", "Acme", "gadgets")
            .price(10.0)
            .stock(3)
            .build()
    }

    fn data_body<T: serde::Serialize>(data: T) -> String {
        serde_json::to_string(&DataResponse::new(data)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            CatalogClient::with_base_url("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_product_unwraps_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/products/widget-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(data_body(product("widget-1")))
            .create_async()
            .await;

        let client = CatalogClient::with_base_url(&server.url()).unwrap();
        let found = client.get_product("widget-1").await.unwrap();

        assert_eq!(found.id, "widget-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_path_segments_are_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/products/a%20b%2Fc")
            .with_status(200)
            .with_body(data_body(product("a b/c")))
            .create_async()
            .await;

        let client = CatalogClient::with_base_url(&server.url()).unwrap();
        assert_eq!(client.get_product("a b/c").await.unwrap().id, "a b/c");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_contains_only_present_parameters() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{
            "data": [],
            "pagination": {"page": 1, "limit": 2, "total": 0, "totalPages": 0, "hasNext": false, "hasPrev": false},
            "filters": {"category": "electronics"}
        }"#;
        let mock = server
            .mock("GET", "/api/v1/products")
            .match_query(Matcher::Exact(
                "limit=2&category=electronics&sort_by=price&sort_order=desc".to_string(),
            ))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = CatalogClient::with_base_url(&server.url()).unwrap();
        let params = ProductListParams {
            limit: Some(2),
            category: Some("electronics".to_string()),
            sort_by: Some(SortBy::Price),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let page = client.list_products(&params).await.unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.filters.category.as_deref(), Some("electronics"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_body_becomes_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/products/missing")
            .with_status(404)
            .with_body(r#"{"error": "Product not found: missing"}"#)
            .create_async()
            .await;

        let client = CatalogClient::with_base_url(&server.url()).unwrap();
        let err = client.get_product("missing").await.unwrap_err();

        assert!(err.is_not_found());
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Product not found: missing");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_uses_status_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/categories/books/price-range")
            .with_status(502)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = CatalogClient::with_base_url(&server.url()).unwrap();
        let err = client.get_price_range("books").await.unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/products/widget-1/availability")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = CatalogClient::with_base_url(&server.url()).unwrap();
        let err = client.get_availability("widget-1").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Nothing listens on port 9 of localhost
        let client = CatalogClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client.get_product("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(!client.health().await);
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"ok","timestamp":"2024-01-01T00:00:00Z"}"#)
            .create_async()
            .await;

        let client = CatalogClient::with_base_url(&server.url()).unwrap();
        assert!(client.health().await);
    }

    #[tokio::test]
    async fn test_recommendations_send_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/products/widget-1/recommendations")
            .match_query(Matcher::UrlEncoded("limit".to_string(), "2".to_string()))
            .with_status(200)
            .with_body(data_body(vec![product("widget-2")]))
            .create_async()
            .await;

        let client = CatalogClient::with_base_url(&server.url()).unwrap();
        let related = client.get_recommendations("widget-1", Some(2)).await.unwrap();

        assert_eq!(related.len(), 1);
        mock.assert_async().await;
    }
}
