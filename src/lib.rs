//! # Catalog Bridge
//!
//! A product catalog REST API and a Model Context Protocol (MCP) server that
//! exposes it to AI agents as tools.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Product, Category, pagination, query params)
//! - [`catalog`]: In-memory catalog store and the query engine
//! - [`api`]: REST API (repositories, services, axum handlers)
//! - [`client`]: HTTP client for the REST API
//! - [`mcp`]: MCP tool registry and server
//! - [`utils`]: Shared HTTP client setup
//! - [`config`]: Configuration management

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod mcp;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use catalog::CatalogStore;
pub use client::{CatalogApi, CatalogClient, ClientError};
pub use models::{Category, Product};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
