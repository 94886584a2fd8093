//! Core data models for the product catalog and its query contracts.

mod category;
mod product;
mod query;
mod response;

pub use category::Category;
pub use product::{AttributeValue, Product, ProductBuilder};
pub use query::{
    Availability, AvailabilityStatus, CategoryListParams, FacetCount, Facets, LimitParams, Page,
    PageParams, PageRequest, PaginationMeta, PopularParams, PopularQuery, PriceRange, ProductFilter,
    ProductListParams, ProductQuery, ProductSearch, QueryError, SearchParams, SortBy, SortOrder,
};
pub use response::{
    CategoryProducts, DataResponse, ErrorBody, HealthStatus, ProductPage, SearchResults,
};
