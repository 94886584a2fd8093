//! MCP (Model Context Protocol) tool bridge over the catalog API.

mod handlers;
pub mod server;
mod tools;

pub use server::McpServer;
pub use tools::{Tool, ToolError, ToolHandler, ToolRegistry};
