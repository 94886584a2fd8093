//! In-memory product catalog and the query engine that runs over it.
//!
//! - [`CatalogStore`]: immutable products and category forest, built at startup
//! - [`query`]: filtering, sorting, search, facets, pagination and rankings

pub mod query;
mod seed;
mod store;

pub use store::{CatalogFile, CatalogStore, StoreError};
