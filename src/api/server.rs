use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::Uri,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::error::ApiError;
use super::repository::{InMemoryCategoryRepository, InMemoryProductRepository};
use super::service::{CatalogCategoryService, CatalogProductService};
use super::state::{AppState, GuardedCategoryService, GuardedProductService, QueryDefaults};
use crate::catalog::CatalogStore;
use crate::config::{CatalogConfig, ServerConfig};
use crate::models::{
    Availability, Category, CategoryListParams, CategoryProducts, DataResponse, HealthStatus,
    LimitParams, PageParams, PopularParams, PopularQuery, PriceRange, Product, ProductListParams,
    ProductPage, ProductQuery, ProductSearch, SearchParams, SearchResults,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ProductListParams>, QueryRejection>,
) -> ApiResult<ProductPage> {
    let Query(params) = params?;
    let query = ProductQuery {
        filter: params.filter(),
        sort_by: params.sort_by.unwrap_or_default(),
        sort_order: params.sort_order.unwrap_or_default(),
        page: state.defaults.page(params.page, params.limit)?,
    };
    let page = state.products.list_products(&query)?;
    Ok(Json(ProductPage {
        data: page.items,
        pagination: page.pagination,
        filters: query.filter,
    }))
}

async fn search_products(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchResults> {
    let Query(params) = params?;
    let search = ProductSearch {
        query: params.q.trim().to_string(),
        filter: params.filter(),
        page: state.defaults.page(params.page, params.limit)?,
    };
    let outcome = state.products.search_products(&search)?;
    Ok(Json(SearchResults {
        query: search.query,
        data: outcome.page.items,
        pagination: outcome.page.pagination,
        facets: outcome.facets,
    }))
}

async fn get_popular_products(
    State(state): State<AppState>,
    params: Result<Query<PopularParams>, QueryRejection>,
) -> ApiResult<DataResponse<Vec<Product>>> {
    let Query(params) = params?;
    let query = PopularQuery {
        category: params.category,
        min_rating: params
            .min_rating
            .unwrap_or(state.defaults.popular_min_rating),
        limit: state.defaults.popular_limit(params.limit)?,
    };
    let products = state.products.get_popular_products(&query)?;
    Ok(Json(DataResponse::new(products)))
}

async fn get_product(
    State(products): State<GuardedProductService>,
    Path(id): Path<String>,
) -> ApiResult<DataResponse<Product>> {
    Ok(Json(DataResponse::new(products.get_product(&id)?)))
}

async fn get_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<DataResponse<Vec<Product>>> {
    let Query(params) = params?;
    let limit = state.defaults.recommendations_limit(params.limit)?;
    let products = state.products.get_recommendations(&id, limit)?;
    Ok(Json(DataResponse::new(products)))
}

async fn get_availability(
    State(products): State<GuardedProductService>,
    Path(id): Path<String>,
) -> ApiResult<DataResponse<Availability>> {
    Ok(Json(DataResponse::new(products.get_availability(&id)?)))
}

async fn get_categories(
    State(categories): State<GuardedCategoryService>,
    params: Result<Query<CategoryListParams>, QueryRejection>,
) -> ApiResult<DataResponse<Vec<Category>>> {
    let Query(params) = params?;
    let list = categories.get_categories(
        params.parent_id.as_deref(),
        params.include_product_count.unwrap_or(false),
    )?;
    Ok(Json(DataResponse::new(list)))
}

async fn get_category(
    State(categories): State<GuardedCategoryService>,
    Path(id): Path<String>,
) -> ApiResult<DataResponse<Category>> {
    Ok(Json(DataResponse::new(categories.get_category(&id)?)))
}

async fn get_category_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<CategoryProducts> {
    let Query(params) = params?;
    let page = state.defaults.page(params.page, params.limit)?;
    let page = state.categories.get_category_products(&id, page)?;
    Ok(Json(CategoryProducts {
        data: page.items,
        pagination: page.pagination,
    }))
}

async fn get_price_range(
    State(categories): State<GuardedCategoryService>,
    Path(id): Path<String>,
) -> ApiResult<DataResponse<PriceRange>> {
    Ok(Json(DataResponse::new(categories.get_price_range(&id)?)))
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route not found: {}", uri.path()))
}

/// Routes of the catalog API over already-wired services
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/search", get(search_products))
        .route("/api/v1/products/popular", get(get_popular_products))
        .route("/api/v1/products/{id}", get(get_product))
        .route(
            "/api/v1/products/{id}/recommendations",
            get(get_recommendations),
        )
        .route("/api/v1/products/{id}/availability", get(get_availability))
        .route("/api/v1/categories", get(get_categories))
        .route("/api/v1/categories/{id}", get(get_category))
        .route(
            "/api/v1/categories/{id}/products",
            get(get_category_products),
        )
        .route("/api/v1/categories/{id}/price-range", get(get_price_range))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire repositories and services over `store` and build the router
pub fn make_app(store: Arc<CatalogStore>, catalog: &CatalogConfig) -> Router {
    let product_repository = Arc::new(InMemoryProductRepository::new(
        store.clone(),
        catalog.limited_stock_threshold,
    ));
    let category_repository = Arc::new(InMemoryCategoryRepository::new(store));

    let state = AppState {
        products: Arc::new(CatalogProductService::new(product_repository)),
        categories: Arc::new(CatalogCategoryService::new(category_repository)),
        defaults: QueryDefaults::from(catalog),
    };
    router(state)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Serve the catalog API until Ctrl-C
pub async fn run_server(
    store: Arc<CatalogStore>,
    server: &ServerConfig,
    catalog: &CatalogConfig,
) -> std::io::Result<()> {
    let app = make_app(store, catalog);
    let listener = TcpListener::bind(server.bind_address()).await?;
    info!("Catalog API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
