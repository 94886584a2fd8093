//! REST catalog API.
//!
//! Layered as repository -> service -> HTTP handlers. Repositories read the
//! shared [`CatalogStore`](crate::catalog::CatalogStore) and report absence as
//! `None`; services turn absence and bad input into [`ServiceError`]; the
//! handlers adapt query strings to typed requests and errors to status codes.

mod error;
pub mod repository;
mod server;
pub mod service;
mod state;

pub use error::ApiError;
pub use server::{make_app, router, run_server};
pub use service::{CategoryService, ProductService, ServiceError};
pub use state::{AppState, QueryDefaults};
