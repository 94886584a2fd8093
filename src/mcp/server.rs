//! MCP server implementation using pmcp.
//!
//! Serves the catalog tools over stdio or streamable HTTP.

use crate::client::CatalogApi;
use crate::mcp::tools::{ToolError, ToolRegistry};
use async_trait::async_trait;
use pmcp::{
    server::streamable_http_server::StreamableHttpServer, Error, ErrorCode, RequestHandlerExtra,
    Server, ServerCapabilities, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// The catalog MCP server
#[derive(Debug, Clone)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
}

impl McpServer {
    /// Create a server whose tools call `api`
    pub fn new(api: Arc<dyn CatalogApi>) -> Result<Self, pmcp::Error> {
        let tools = ToolRegistry::new(api);
        let server = Self::build_server_impl(tools)?;
        Ok(Self {
            server: Arc::new(Mutex::new(server)),
        })
    }

    fn build_server_impl(tools: ToolRegistry) -> Result<Server, pmcp::Error> {
        let mut builder = Server::builder()
            .name("catalog-bridge")
            .version(env!("CARGO_PKG_VERSION"))
            .capabilities(ServerCapabilities::default());

        for tool in tools.all() {
            let wrapper = ToolWrapper {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: tool.input_schema.clone(),
                handler: tool.handler.clone(),
            };
            builder = builder.tool(wrapper.name.clone(), wrapper);
        }

        builder.build()
    }

    /// Run the server over stdio
    pub async fn run(self) -> Result<(), pmcp::Error> {
        tracing::info!("Starting MCP server in stdio mode");

        // run_stdio() takes ownership of the Server
        let server = Arc::try_unwrap(self.server)
            .map_err(|_| Error::internal("MCP server is shared with another transport"))?
            .into_inner();

        server.run_stdio().await
    }

    /// Run the server over streamable HTTP
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), pmcp::Error> {
        tracing::info!("Starting MCP server in HTTP mode on {}", addr);

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid address: {}", e)))?;

        StreamableHttpServer::new(socket_addr, self.server.clone())
            .start()
            .await
    }
}

/// Convert a tool failure into the matching JSON-RPC error
fn protocol_error(err: ToolError) -> Error {
    match &err {
        ToolError::NotFound(message) => {
            Error::protocol(ErrorCode::INVALID_REQUEST, message.clone())
        }
        ToolError::UnknownTool(name) => Error::method_not_found(name.clone()),
        ToolError::InvalidParams(_) => Error::invalid_params(err.to_string()),
        ToolError::Internal(message) => Error::internal(message.clone()),
    }
}

/// Adapts a registry [`Tool`](crate::mcp::Tool) to pmcp's ToolHandler
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    handler: Arc<dyn crate::mcp::tools::ToolHandler>,
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        self.handler.execute(args).await.map_err(|e| {
            tracing::debug!("Tool {} failed ({}): {}", self.name, e.code(), e);
            protocol_error(e)
        })
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}
