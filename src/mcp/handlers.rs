//! Tool handlers: typed argument parsing, validation and one API call each.
//!
//! Arguments are validated completely before the API is contacted.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tools::{ToolError, ToolHandler};
use crate::client::{CatalogApi, ClientError};
use crate::models::{
    CategoryListParams, PopularParams, ProductListParams, SearchParams, SortBy, SortOrder,
};

/// Largest page size a tool may request
pub const MAX_LIMIT: u32 = 100;

/// Largest recommendation or popularity list a tool may request
pub const MAX_RANKING_LIMIT: u32 = 50;

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

fn to_output<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Internal(e.to_string()))
}

fn required_id(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidParams(format!("'{}' must not be empty", field)));
    }
    Ok(())
}

fn within(field: &str, value: u32, min: u32, max: u32) -> Result<(), ToolError> {
    if !(min..=max).contains(&value) {
        return Err(ToolError::InvalidParams(format!(
            "'{}' must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

/// Map a client failure; a 404 names the resource that did not resolve
fn client_err(err: ClientError, not_found: impl FnOnce() -> String) -> ToolError {
    if err.is_not_found() {
        ToolError::NotFound(not_found())
    } else {
        tracing::warn!("Catalog API call failed: {}", err);
        ToolError::Internal(err.to_string())
    }
}

fn default_recommendations() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SearchProductsArgs {
    #[serde(default)]
    query: String,
    category: Option<String>,
    brand: Option<String>,
    in_stock: Option<bool>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    sort_by: Option<SortBy>,
    sort_order: Option<SortOrder>,
    page: Option<u32>,
    limit: Option<u32>,
}

impl SearchProductsArgs {
    fn validate(&self) -> Result<(), ToolError> {
        if self.page == Some(0) {
            return Err(ToolError::InvalidParams("'page' must be at least 1".to_string()));
        }
        if let Some(limit) = self.limit {
            within("limit", limit, 1, MAX_LIMIT)?;
        }
        for (field, price) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
                return Err(ToolError::InvalidParams(format!(
                    "'{}' must be a non-negative number",
                    field
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ToolError::InvalidParams(format!(
                    "'min_price' ({}) must not exceed 'max_price' ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

/// `search_products`: keyword search, or a sorted listing when the query is empty
pub struct SearchProductsHandler {
    pub api: Arc<dyn CatalogApi>,
}

#[async_trait]
impl ToolHandler for SearchProductsHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: SearchProductsArgs = parse_args(args)?;
        args.validate()?;

        let query = args.query.trim();
        if query.is_empty() {
            let params = ProductListParams {
                page: args.page,
                limit: args.limit,
                category: args.category,
                brand: args.brand,
                in_stock: args.in_stock,
                sort_by: args.sort_by,
                sort_order: args.sort_order,
                min_price: args.min_price,
                max_price: args.max_price,
            };
            let page = self
                .api
                .list_products(&params)
                .await
                .map_err(|e| client_err(e, || "Products not found".to_string()))?;
            return to_output(&page);
        }

        let params = SearchParams {
            q: query.to_string(),
            page: args.page,
            limit: args.limit,
            category: args.category,
            brand: args.brand,
            in_stock: args.in_stock,
            min_price: args.min_price,
            max_price: args.max_price,
        };
        let results = self
            .api
            .search_products(&params)
            .await
            .map_err(|e| client_err(e, || "Products not found".to_string()))?;
        to_output(&results)
    }
}

#[derive(Debug, Deserialize)]
struct ProductIdArgs {
    product_id: String,
}

/// `get_product_details`
pub struct GetProductDetailsHandler {
    pub api: Arc<dyn CatalogApi>,
}

#[async_trait]
impl ToolHandler for GetProductDetailsHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: ProductIdArgs = parse_args(args)?;
        required_id("product_id", &args.product_id)?;

        let product = self
            .api
            .get_product(&args.product_id)
            .await
            .map_err(|e| client_err(e, || format!("Product not found: {}", args.product_id)))?;
        to_output(&product)
    }
}

#[derive(Debug, Deserialize)]
struct GetCategoriesArgs {
    parent_id: Option<String>,
    #[serde(default = "default_true")]
    include_product_count: bool,
}

/// `get_categories`
pub struct GetCategoriesHandler {
    pub api: Arc<dyn CatalogApi>,
}

#[async_trait]
impl ToolHandler for GetCategoriesHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: GetCategoriesArgs = parse_args(args)?;
        if let Some(parent) = &args.parent_id {
            required_id("parent_id", parent)?;
        }

        let params = CategoryListParams {
            parent_id: args.parent_id.clone(),
            include_product_count: Some(args.include_product_count),
        };
        let categories = self.api.get_categories(&params).await.map_err(|e| {
            client_err(e, || {
                format!(
                    "Category not found: {}",
                    args.parent_id.as_deref().unwrap_or_default()
                )
            })
        })?;
        to_output(&categories)
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationsArgs {
    product_id: Option<String>,
    category: Option<String>,
    #[serde(default = "default_recommendations")]
    limit: u32,
}

/// `get_product_recommendations`: related products, or the best rated of a category
pub struct GetRecommendationsHandler {
    pub api: Arc<dyn CatalogApi>,
}

#[async_trait]
impl ToolHandler for GetRecommendationsHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: RecommendationsArgs = parse_args(args)?;
        within("limit", args.limit, 1, MAX_RANKING_LIMIT)?;

        let product_id = args.product_id.filter(|id| !id.trim().is_empty());
        let category = args.category.filter(|c| !c.trim().is_empty());

        match (product_id, category) {
            (Some(id), _) => {
                let products = self
                    .api
                    .get_recommendations(&id, Some(args.limit))
                    .await
                    .map_err(|e| client_err(e, || format!("Product not found: {}", id)))?;
                to_output(&products)
            }
            (None, Some(category)) => {
                let params = ProductListParams {
                    limit: Some(args.limit),
                    category: Some(category.clone()),
                    sort_by: Some(SortBy::Rating),
                    sort_order: Some(SortOrder::Desc),
                    ..Default::default()
                };
                let page = self
                    .api
                    .list_products(&params)
                    .await
                    .map_err(|e| client_err(e, || format!("Category not found: {}", category)))?;
                to_output(&page.data)
            }
            (None, None) => Err(ToolError::InvalidParams(
                "either 'product_id' or 'category' is required".to_string(),
            )),
        }
    }
}

/// `check_product_availability`
pub struct CheckAvailabilityHandler {
    pub api: Arc<dyn CatalogApi>,
}

#[async_trait]
impl ToolHandler for CheckAvailabilityHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: ProductIdArgs = parse_args(args)?;
        required_id("product_id", &args.product_id)?;

        let availability = self
            .api
            .get_availability(&args.product_id)
            .await
            .map_err(|e| client_err(e, || format!("Product not found: {}", args.product_id)))?;
        to_output(&availability)
    }
}

#[derive(Debug, Deserialize)]
struct PopularArgs {
    category: Option<String>,
    limit: Option<u32>,
    min_rating: Option<f64>,
}

/// `get_popular_products`
pub struct GetPopularProductsHandler {
    pub api: Arc<dyn CatalogApi>,
}

#[async_trait]
impl ToolHandler for GetPopularProductsHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: PopularArgs = parse_args(args)?;
        if let Some(limit) = args.limit {
            within("limit", limit, 1, MAX_RANKING_LIMIT)?;
        }
        if let Some(min_rating) = args.min_rating {
            if !(0.0..=5.0).contains(&min_rating) {
                return Err(ToolError::InvalidParams(format!(
                    "'min_rating' must be between 0 and 5, got {}",
                    min_rating
                )));
            }
        }

        let params = PopularParams {
            category: args.category,
            limit: args.limit,
            min_rating: args.min_rating,
        };
        let products = self
            .api
            .get_popular_products(&params)
            .await
            .map_err(|e| client_err(e, || "No popular products found".to_string()))?;
        to_output(&products)
    }
}

#[derive(Debug, Deserialize)]
struct PriceRangeArgs {
    category_id: String,
}

/// `get_price_range`
pub struct GetPriceRangeHandler {
    pub api: Arc<dyn CatalogApi>,
}

#[async_trait]
impl ToolHandler for GetPriceRangeHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: PriceRangeArgs = parse_args(args)?;
        required_id("category_id", &args.category_id)?;

        let range = self
            .api
            .get_price_range(&args.category_id)
            .await
            .map_err(|e| {
                client_err(e, || {
                    format!("No products found in category: {}", args.category_id)
                })
            })?;
        to_output(&range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::ToolRegistry;
    use crate::models::{
        Availability, AvailabilityStatus, Category, CategoryProducts, PageParams, PageRequest,
        PaginationMeta, PriceRange, Product, ProductBuilder, ProductFilter, ProductPage,
        SearchResults,
    };
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every call and answers from a fixed product list
    #[derive(Default)]
    struct FakeCatalog {
        calls: Mutex<Vec<String>>,
        fail_with: Option<u16>,
    }

    impl FakeCatalog {
        fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Default::default()
            }
        }

        fn record(&self, call: String) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with {
                Some(status) => Err(ClientError::Api {
                    status,
                    message: "upstream says no".to_string(),
                }),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn widget(id: &str) -> Product {
        ProductBuilder::new(id, "Widget", "Acme", "gadgets")
            .price(10.0)
            .rating(4.5, 10)
            .build()
    }

    fn meta() -> PaginationMeta {
        PaginationMeta::new(PageRequest::new(1, 10, 100).unwrap(), 1)
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn list_products(
            &self,
            params: &ProductListParams,
        ) -> Result<ProductPage, ClientError> {
            self.record(format!("list:{}", serde_json::to_string(params).unwrap()))?;
            Ok(ProductPage {
                data: vec![widget("listed")],
                pagination: meta(),
                filters: ProductFilter::default(),
            })
        }

        async fn search_products(
            &self,
            params: &SearchParams,
        ) -> Result<SearchResults, ClientError> {
            self.record(format!("search:{}", params.q))?;
            Ok(SearchResults {
                query: params.q.clone(),
                data: vec![widget("found")],
                pagination: meta(),
                facets: Default::default(),
            })
        }

        async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
            self.record(format!("product:{}", id))?;
            Ok(widget(id))
        }

        async fn get_recommendations(
            &self,
            id: &str,
            limit: Option<u32>,
        ) -> Result<Vec<Product>, ClientError> {
            self.record(format!("recommendations:{}:{:?}", id, limit))?;
            Ok(vec![widget("related")])
        }

        async fn get_availability(&self, id: &str) -> Result<Availability, ClientError> {
            self.record(format!("availability:{}", id))?;
            Ok(Availability {
                product_id: id.to_string(),
                product_name: "Widget".to_string(),
                in_stock: true,
                stock_quantity: 3,
                status: AvailabilityStatus::LimitedStock,
            })
        }

        async fn get_popular_products(
            &self,
            params: &PopularParams,
        ) -> Result<Vec<Product>, ClientError> {
            self.record(format!("popular:{:?}:{:?}", params.limit, params.min_rating))?;
            Ok(vec![widget("popular")])
        }

        async fn get_categories(
            &self,
            params: &CategoryListParams,
        ) -> Result<Vec<Category>, ClientError> {
            self.record(format!("categories:{:?}", params.include_product_count))?;
            Ok(vec![Category::new("gadgets", "Gadgets", "")])
        }

        async fn get_category(&self, id: &str) -> Result<Category, ClientError> {
            self.record(format!("category:{}", id))?;
            Ok(Category::new(id, "Gadgets", ""))
        }

        async fn get_category_products(
            &self,
            id: &str,
            _params: &PageParams,
        ) -> Result<CategoryProducts, ClientError> {
            self.record(format!("category-products:{}", id))?;
            Ok(CategoryProducts {
                data: vec![],
                pagination: meta(),
            })
        }

        async fn get_price_range(&self, id: &str) -> Result<PriceRange, ClientError> {
            self.record(format!("price-range:{}", id))?;
            Ok(PriceRange {
                category_id: id.to_string(),
                min: 10.0,
                max: 30.0,
                average: 20.0,
                count: 3,
                currency: "USD".to_string(),
            })
        }

        async fn health(&self) -> bool {
            true
        }
    }

    fn registry(fake: &Arc<FakeCatalog>) -> ToolRegistry {
        ToolRegistry::new(fake.clone())
    }

    #[test]
    fn test_registry_lists_seven_tools() {
        let fake = Arc::new(FakeCatalog::default());
        let names: Vec<String> = registry(&fake)
            .all()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "check_product_availability",
                "get_categories",
                "get_popular_products",
                "get_price_range",
                "get_product_details",
                "get_product_recommendations",
                "search_products",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let fake = Arc::new(FakeCatalog::default());
        let err = registry(&fake)
            .execute("delete_everything", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ToolError::METHOD_NOT_FOUND);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_the_api() {
        let fake = Arc::new(FakeCatalog::default());
        let tools = registry(&fake);

        let cases = [
            ("get_product_details", json!({})),
            ("get_product_details", json!({"product_id": "  "})),
            ("get_product_details", json!({"product_id": 42})),
            ("search_products", json!({"limit": 0})),
            ("search_products", json!({"limit": 500})),
            ("search_products", json!({"page": 0})),
            ("search_products", json!({"sort_by": "colour"})),
            ("search_products", json!({"min_price": 50, "max_price": 10})),
            ("search_products", json!({"min_price": -1})),
            ("get_product_recommendations", json!({})),
            ("get_product_recommendations", json!({"product_id": "x", "limit": 0})),
            ("get_popular_products", json!({"min_rating": 6})),
            ("get_price_range", json!({})),
            ("check_product_availability", json!(null)),
        ];

        for (tool, args) in cases {
            let err = tools.execute(tool, args.clone()).await.unwrap_err();
            assert_eq!(err.code(), ToolError::INVALID_PARAMS, "{} {}", tool, args);
        }
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_with_query_uses_search_endpoint() {
        let fake = Arc::new(FakeCatalog::default());
        let output = registry(&fake)
            .execute("search_products", json!({"query": " headphones "}))
            .await
            .unwrap();

        assert_eq!(fake.calls(), vec!["search:headphones"]);
        assert_eq!(output["query"], "headphones");
        assert!(output.get("facets").is_some());
        assert!(output.get("pagination").is_some());
    }

    #[tokio::test]
    async fn test_search_without_query_lists_with_sort() {
        let fake = Arc::new(FakeCatalog::default());
        let output = registry(&fake)
            .execute(
                "search_products",
                json!({"category": "gadgets", "sort_by": "price", "sort_order": "desc"}),
            )
            .await
            .unwrap();

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("list:"));
        assert!(calls[0].contains(r#""sort_by":"price""#));
        assert!(calls[0].contains(r#""sort_order":"desc""#));
        assert!(!calls[0].contains(r#""page""#));
        assert!(!calls[0].contains(r#""limit""#));
        assert_eq!(output["data"][0]["id"], "listed");
    }

    #[tokio::test]
    async fn test_product_details_returns_the_product() {
        let fake = Arc::new(FakeCatalog::default());
        let output = registry(&fake)
            .execute("get_product_details", json!({"product_id": "iphone-15-pro"}))
            .await
            .unwrap();
        assert_eq!(output["id"], "iphone-15-pro");
    }

    #[tokio::test]
    async fn test_not_found_is_invalid_request_with_id() {
        let fake = Arc::new(FakeCatalog::failing(404));
        let err = registry(&fake)
            .execute("check_product_availability", json!({"product_id": "ghost"}))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ToolError::INVALID_REQUEST);
        assert!(err.to_string().contains("ghost"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_internal_error() {
        let fake = Arc::new(FakeCatalog::failing(500));
        let err = registry(&fake)
            .execute("get_price_range", json!({"category_id": "gadgets"}))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ToolError::INTERNAL_ERROR);
        assert!(err.to_string().contains("upstream says no"));
    }

    #[tokio::test]
    async fn test_recommendations_by_product() {
        let fake = Arc::new(FakeCatalog::default());
        let output = registry(&fake)
            .execute(
                "get_product_recommendations",
                json!({"product_id": "iphone-15-pro", "limit": 2}),
            )
            .await
            .unwrap();

        assert_eq!(fake.calls(), vec!["recommendations:iphone-15-pro:Some(2)"]);
        assert_eq!(output[0]["id"], "related");
    }

    #[tokio::test]
    async fn test_recommendations_fall_back_to_category() {
        let fake = Arc::new(FakeCatalog::default());
        registry(&fake)
            .execute("get_product_recommendations", json!({"category": "gadgets"}))
            .await
            .unwrap();

        let calls = fake.calls();
        assert!(calls[0].contains(r#""limit":5"#));
        assert!(calls[0].contains(r#""sort_by":"rating""#));
        assert!(calls[0].contains(r#""sort_order":"desc""#));
    }

    #[tokio::test]
    async fn test_defaults_applied() {
        let fake = Arc::new(FakeCatalog::default());
        let tools = registry(&fake);

        tools.execute("get_categories", json!({})).await.unwrap();
        tools.execute("get_popular_products", json!({})).await.unwrap();

        assert_eq!(fake.calls(), vec!["categories:Some(true)", "popular:None:None"]);
    }

    #[tokio::test]
    async fn test_popular_forwards_only_supplied_arguments() {
        let fake = Arc::new(FakeCatalog::default());
        let tools = registry(&fake);

        tools
            .execute("get_popular_products", json!({"limit": 3, "min_rating": 4.5}))
            .await
            .unwrap();
        tools
            .execute("get_popular_products", json!({"min_rating": 0}))
            .await
            .unwrap();

        assert_eq!(
            fake.calls(),
            vec!["popular:Some(3):Some(4.5)", "popular:None:Some(0.0)"]
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ToolError::NotFound("x".into()).code(), -32600);
        assert_eq!(ToolError::UnknownTool("x".into()).code(), -32601);
        assert_eq!(ToolError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(ToolError::Internal("x".into()).code(), -32603);
    }
}
