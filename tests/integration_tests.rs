//! Integration tests for Catalog Bridge
//!
//! These tests run the REST API on an ephemeral port and drive it through the
//! API client and the MCP tool registry.

use catalog_bridge::api::make_app;
use catalog_bridge::client::{CatalogApi, CatalogClient, ClientError};
use catalog_bridge::config::CatalogConfig;
use catalog_bridge::mcp::{McpServer, ToolError, ToolRegistry};
use catalog_bridge::models::{
    CategoryListParams, PageParams, PopularParams, ProductListParams, SearchParams, SortBy,
    SortOrder,
};
use catalog_bridge::CatalogStore;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

/// Start the catalog API over the seed data and return a client for it
async fn spawn_api() -> CatalogClient {
    let app = make_app(Arc::new(CatalogStore::seeded()), &CatalogConfig::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    CatalogClient::with_base_url(&format!("http://{}", addr)).unwrap()
}

#[tokio::test]
async fn test_health_probe() {
    let client = spawn_api().await;
    assert!(client.health().await);
}

#[tokio::test]
async fn test_pages_reconstruct_the_full_listing() {
    let client = spawn_api().await;

    let everything = assert_ok!(
        client
            .list_products(&ProductListParams {
                limit: Some(100),
                ..Default::default()
            })
            .await
    );

    let mut collected = Vec::new();
    let mut page = 1;
    loop {
        let result = assert_ok!(
            client
                .list_products(&ProductListParams {
                    page: Some(page),
                    limit: Some(4),
                    ..Default::default()
                })
                .await
        );
        collected.extend(result.data.into_iter().map(|p| p.id));
        if !result.pagination.has_next {
            break;
        }
        page += 1;
    }

    let expected: Vec<String> = everything.data.into_iter().map(|p| p.id).collect();
    assert_eq!(collected, expected);
    assert_eq!(everything.pagination.total, expected.len());
}

#[tokio::test]
async fn test_descending_sort_reverses_ascending_for_distinct_prices() {
    let client = spawn_api().await;
    let list = |order| {
        let client = client.clone();
        async move {
            client
                .list_products(&ProductListParams {
                    category: Some("clothing".to_string()),
                    sort_by: Some(SortBy::Price),
                    sort_order: Some(order),
                    ..Default::default()
                })
                .await
                .unwrap()
                .data
                .into_iter()
                .map(|p| p.price)
                .collect::<Vec<f64>>()
        }
    };

    let ascending = list(SortOrder::Asc).await;
    let mut descending = list(SortOrder::Desc).await;
    descending.reverse();

    assert!(ascending.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(ascending, descending);
}

#[tokio::test]
async fn test_search_and_facets_over_http() {
    let client = spawn_api().await;
    let results = assert_ok!(
        client
            .search_products(&SearchParams {
                category: Some("electronics".to_string()),
                ..SearchParams::new("pro")
            })
            .await
    );

    assert!(!results.data.is_empty());
    assert!(results.data.iter().all(|p| p.belongs_to("electronics")));
    let faceted: usize = results.facets.categories.iter().map(|f| f.count).sum();
    assert_eq!(faceted, results.pagination.total);
}

#[tokio::test]
async fn test_client_surfaces_not_found() {
    let client = spawn_api().await;

    let err = assert_err!(client.get_product("does-not-exist").await);
    assert!(err.is_not_found());
    match err {
        ClientError::Api { message, .. } => assert!(message.contains("does-not-exist")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_client_surfaces_bad_request() {
    let client = spawn_api().await;
    let err = assert_err!(
        client
            .get_category_products(
                "electronics",
                &PageParams {
                    page: Some(0),
                    limit: None,
                },
            )
            .await
    );
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_category_endpoints() {
    let client = spawn_api().await;

    let roots = assert_ok!(client.get_categories(&CategoryListParams::default()).await);
    assert!(roots.iter().any(|c| c.id == "electronics"));

    let category = assert_ok!(client.get_category("smartphones").await);
    assert_eq!(category.parent_id.as_deref(), Some("electronics"));
    assert_eq!(category.product_count, Some(3));

    let products = assert_ok!(
        client
            .get_category_products("smartphones", &PageParams::default())
            .await
    );
    assert_eq!(products.pagination.total, 3);

    let range = assert_ok!(client.get_price_range("smartphones").await);
    assert!(range.min <= range.max);

    let popular = assert_ok!(
        client
            .get_popular_products(&PopularParams {
                category: Some("electronics".to_string()),
                ..Default::default()
            })
            .await
    );
    assert!(popular.iter().all(|p| p.rating >= 4.0));
}

#[tokio::test]
async fn test_tools_end_to_end() {
    let client = spawn_api().await;
    let tools = ToolRegistry::new(Arc::new(client));

    let details = assert_ok!(
        tools
            .execute("get_product_details", json!({"product_id": "iphone-15-pro"}))
            .await
    );
    assert_eq!(details["id"], "iphone-15-pro");

    let related = assert_ok!(
        tools
            .execute(
                "get_product_recommendations",
                json!({"product_id": "iphone-15-pro", "limit": 2}),
            )
            .await
    );
    let related = related.as_array().unwrap();
    assert_eq!(related.len(), 2);
    assert!(related.iter().all(|p| p["id"] != "iphone-15-pro"));

    let fallback = assert_ok!(
        tools
            .execute(
                "get_product_recommendations",
                json!({"category": "audio", "limit": 3}),
            )
            .await
    );
    let ratings: Vec<f64> = fallback
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["rating"].as_f64().unwrap())
        .collect();
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));

    let availability = assert_ok!(
        tools
            .execute("check_product_availability", json!({"product_id": "pixel-8-pro"}))
            .await
    );
    assert_eq!(availability["status"], "out_of_stock");

    let categories = assert_ok!(tools.execute("get_categories", json!({})).await);
    assert!(categories[0].get("productCount").is_some());

    let listing = assert_ok!(
        tools
            .execute(
                "search_products",
                json!({"sort_by": "price", "sort_order": "desc", "limit": 3}),
            )
            .await
    );
    assert_eq!(listing["data"].as_array().unwrap().len(), 3);
    assert!(listing.get("filters").is_some());
}

#[tokio::test]
async fn test_tool_errors_end_to_end() {
    let client = spawn_api().await;
    let tools = ToolRegistry::new(Arc::new(client));

    let err = assert_err!(
        tools
            .execute("get_product_details", json!({"product_id": "ghost"}))
            .await
    );
    assert_eq!(err.code(), ToolError::INVALID_REQUEST);
    assert!(err.to_string().contains("ghost"));

    let err = assert_err!(
        tools
            .execute("get_price_range", json!({"category_id": "nowhere"}))
            .await
    );
    assert_eq!(err.code(), ToolError::INVALID_REQUEST);
}

#[tokio::test]
async fn test_unreachable_api_is_internal_error() {
    let client = CatalogClient::with_base_url("http://127.0.0.1:9").unwrap();
    let tools = ToolRegistry::new(Arc::new(client));

    let err = assert_err!(
        tools
            .execute("get_product_details", json!({"product_id": "iphone-15-pro"}))
            .await
    );
    assert_eq!(err.code(), ToolError::INTERNAL_ERROR);
}

#[test]
fn test_mcp_server_creation() {
    let client = CatalogClient::with_base_url("http://127.0.0.1:3000").unwrap();
    assert!(McpServer::new(Arc::new(client)).is_ok());
}
