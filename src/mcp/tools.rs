//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use super::handlers::{
    CheckAvailabilityHandler, GetCategoriesHandler, GetPopularProductsHandler,
    GetPriceRangeHandler, GetProductDetailsHandler, GetRecommendationsHandler,
    SearchProductsHandler, MAX_LIMIT, MAX_RANKING_LIMIT,
};
use crate::client::CatalogApi;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "search_products")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Failure of a tool call, carrying its JSON-RPC error class
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The referenced resource does not exist
    #[error("{0}")]
    NotFound(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidParams(String),

    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    /// JSON-RPC error code
    pub fn code(&self) -> i32 {
        match self {
            ToolError::NotFound(_) => Self::INVALID_REQUEST,
            ToolError::UnknownTool(_) => Self::METHOD_NOT_FOUND,
            ToolError::InvalidParams(_) => Self::INVALID_PARAMS,
            ToolError::Internal(_) => Self::INTERNAL_ERROR,
        }
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, ToolError>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry with every catalog tool bound to `api`
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };
        registry.register_catalog_tools(&api);
        registry
    }

    fn register_catalog_tools(&mut self, api: &Arc<dyn CatalogApi>) {
        self.register(Tool {
            name: "search_products".to_string(),
            description: "Search the product catalog by keyword with optional filters. Without a query it lists products, honouring the sort options.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Keywords matched against product name, description and tags",
                        "default": ""
                    },
                    "category": {
                        "type": "string",
                        "description": "Category or subcategory id (e.g., 'electronics', 'smartphones')"
                    },
                    "brand": {
                        "type": "string",
                        "description": "Brand name, case-insensitive"
                    },
                    "in_stock": {
                        "type": "boolean",
                        "description": "Only return products that are in stock"
                    },
                    "min_price": {
                        "type": "number",
                        "description": "Minimum price (inclusive)",
                        "minimum": 0
                    },
                    "max_price": {
                        "type": "number",
                        "description": "Maximum price (inclusive)",
                        "minimum": 0
                    },
                    "sort_by": {
                        "type": "string",
                        "description": "Sort field, used when no query is given",
                        "enum": ["name", "price", "rating", "createdAt"],
                        "default": "name"
                    },
                    "sort_order": {
                        "type": "string",
                        "description": "Sort direction, used when no query is given",
                        "enum": ["asc", "desc"],
                        "default": "asc"
                    },
                    "page": {
                        "type": "integer",
                        "description": "1-based page number (defaults to 1)",
                        "minimum": 1
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Results per page (defaults to the API's configured page size)",
                        "minimum": 1,
                        "maximum": MAX_LIMIT
                    }
                }
            }),
            handler: Arc::new(SearchProductsHandler { api: api.clone() }),
        });

        self.register(Tool {
            name: "get_product_details".to_string(),
            description: "Get full details of a product by id".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "product_id": {
                        "type": "string",
                        "description": "Product identifier (e.g., 'iphone-15-pro')",
                        "minLength": 1
                    }
                },
                "required": ["product_id"]
            }),
            handler: Arc::new(GetProductDetailsHandler { api: api.clone() }),
        });

        self.register(Tool {
            name: "get_categories".to_string(),
            description: "List root categories, or the subcategories of a parent category".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "parent_id": {
                        "type": "string",
                        "description": "Parent category id. If not specified, root categories are returned."
                    },
                    "include_product_count": {
                        "type": "boolean",
                        "description": "Include the number of products in each category",
                        "default": true
                    }
                }
            }),
            handler: Arc::new(GetCategoriesHandler { api: api.clone() }),
        });

        self.register(Tool {
            name: "get_product_recommendations".to_string(),
            description: "Recommend products related to a product, or the top-rated products of a category. Provide product_id or category.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "product_id": {
                        "type": "string",
                        "description": "Product to find related products for"
                    },
                    "category": {
                        "type": "string",
                        "description": "Category to recommend from when no product_id is given"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of recommendations",
                        "minimum": 1,
                        "maximum": MAX_RANKING_LIMIT,
                        "default": 5
                    }
                }
            }),
            handler: Arc::new(GetRecommendationsHandler { api: api.clone() }),
        });

        self.register(Tool {
            name: "check_product_availability".to_string(),
            description: "Check stock status of a product: in_stock, limited_stock or out_of_stock".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "product_id": {
                        "type": "string",
                        "description": "Product identifier",
                        "minLength": 1
                    }
                },
                "required": ["product_id"]
            }),
            handler: Arc::new(CheckAvailabilityHandler { api: api.clone() }),
        });

        self.register(Tool {
            name: "get_popular_products".to_string(),
            description: "Get the most popular well-rated products, optionally within a category".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Category or subcategory id"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of products (defaults to 10)",
                        "minimum": 1,
                        "maximum": MAX_RANKING_LIMIT
                    },
                    "min_rating": {
                        "type": "number",
                        "description": "Minimum average rating (defaults to the API's configured threshold)",
                        "minimum": 0,
                        "maximum": 5
                    }
                }
            }),
            handler: Arc::new(GetPopularProductsHandler { api: api.clone() }),
        });

        self.register(Tool {
            name: "get_price_range".to_string(),
            description: "Get minimum, maximum and average price of the products in a category".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category_id": {
                        "type": "string",
                        "description": "Category or subcategory id",
                        "minLength": 1
                    }
                },
                "required": ["category_id"]
            }),
            handler: Arc::new(GetPriceRangeHandler { api: api.clone() }),
        });
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// All tools, ordered by name
    pub fn all(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        tracing::debug!("Executing tool {}", name);
        tool.handler.execute(args).await
    }
}
