use anyhow::{Context, Result};
use catalog_bridge::api::run_server;
use catalog_bridge::client::{CatalogApi, CatalogClient};
use catalog_bridge::config::{find_config_file, load_config, Config, LoggingConfig, ENV_PREFIX};
use catalog_bridge::mcp::{McpServer, ToolRegistry};
use catalog_bridge::models::{
    Category, CategoryListParams, Product, ProductListParams, SearchParams, SortBy, SortOrder,
};
use catalog_bridge::CatalogStore;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Attribute, Cell, Table};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Catalog Bridge - product catalog REST API and MCP tool server
#[derive(Parser, Debug)]
#[command(name = "catalog-bridge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Product catalog REST API and MCP tool bridge", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog API base URL (overrides api.base_url)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

/// Sort field for product listings
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortField {
    Name,
    Price,
    Rating,
    Created,
}

impl From<SortField> for SortBy {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Name => SortBy::Name,
            SortField::Price => SortBy::Price,
            SortField::Rating => SortBy::Rating,
            SortField::Created => SortBy::CreatedAt,
        }
    }
}

/// Sort order
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Order {
    Asc,
    Desc,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortOrder::Asc,
            Order::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the catalog REST API
    Api {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port)
        #[arg(long, short)]
        port: Option<u16>,

        /// JSON catalog file (overrides catalog.data_file)
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Run the MCP server against the catalog API
    Serve {
        /// Serve over streamable HTTP instead of stdio
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short, default_value_t = 3001)]
        port: u16,

        /// Host for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Check that the catalog API is reachable
    Health,

    /// List products
    #[command(alias = "ls")]
    Products {
        #[arg(long, short)]
        category: Option<String>,

        #[arg(long, short)]
        brand: Option<String>,

        /// Only products in stock
        #[arg(long)]
        in_stock: bool,

        #[arg(long, value_enum)]
        sort_by: Option<SortField>,

        #[arg(long, value_enum)]
        order: Option<Order>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, short, default_value_t = 10)]
        limit: u32,
    },

    /// Search products by keyword
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        #[arg(long, short)]
        category: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, short, default_value_t = 10)]
        limit: u32,
    },

    /// List categories
    Categories {
        /// Only the children of this category
        #[arg(long)]
        parent: Option<String>,

        /// Include product counts
        #[arg(long)]
        counts: bool,
    },

    /// List the MCP tools
    Tools,

    /// Print the effective configuration as TOML
    Config,
}

fn print_env_vars() {
    println!("Catalog Bridge - Environment Variables");
    println!();
    println!("Configuration (prefix {}, '__' between section and key):", ENV_PREFIX);
    println!("  {}_SERVER__HOST                      REST API bind host (default: 127.0.0.1)", ENV_PREFIX);
    println!("  {}_SERVER__PORT                      REST API bind port (default: 3000)", ENV_PREFIX);
    println!("  {}_API__BASE_URL                     Catalog API URL used by the MCP server", ENV_PREFIX);
    println!("  {}_API__TIMEOUT_SECS                 Request timeout (default: 30)", ENV_PREFIX);
    println!("  {}_API__CONNECT_TIMEOUT_SECS         Connect timeout (default: 10)", ENV_PREFIX);
    println!("  {}_CATALOG__DATA_FILE                JSON catalog to load", ENV_PREFIX);
    println!("  {}_CATALOG__DEFAULT_PAGE_SIZE        Default page size (default: 10)", ENV_PREFIX);
    println!("  {}_CATALOG__MAX_PAGE_SIZE            Largest page size accepted (default: 100)", ENV_PREFIX);
    println!("  {}_CATALOG__LIMITED_STOCK_THRESHOLD  Limited stock threshold (default: 10)", ENV_PREFIX);
    println!("  {}_CATALOG__POPULAR_MIN_RATING       Popular products rating floor (default: 4.0)", ENV_PREFIX);
    println!("  {}_LOGGING__LEVEL                    Log level (default: info)", ENV_PREFIX);
    println!("  {}_LOGGING__FORMAT                   'text' or 'json'", ENV_PREFIX);
    println!();
    println!("Logging:");
    println!("  RUST_LOG                    Overrides the log filter entirely");
    std::process::exit(0);
}

fn init_tracing(verbose: u8, quiet: bool, logging: &LoggingConfig) {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let level = if quiet { "error" } else { level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("catalog_bridge={},tower_http={}", level, level)),
    );

    // stdout carries the MCP stdio transport
    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn product_table(products: &[Product]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Brand", "Category", "Price", "Rating", "Stock"]);

    for product in products {
        table.add_row(vec![
            Cell::new(&product.id),
            Cell::new(truncate(&product.name, 40)).add_attribute(Attribute::Bold),
            Cell::new(&product.brand),
            Cell::new(&product.category),
            Cell::new(format!("{:.2} {}", product.price, product.currency)),
            Cell::new(format!("{:.1} ({})", product.rating, product.review_count)),
            Cell::new(product.stock_quantity),
        ]);
    }
    table
}

fn add_category_rows(table: &mut Table, category: &Category, depth: usize) {
    let count = category
        .product_count
        .map(|c| c.to_string())
        .unwrap_or_default();
    table.add_row(vec![
        Cell::new(format!("{}{}", "  ".repeat(depth), category.id)),
        Cell::new(&category.name),
        Cell::new(count),
    ]);
    for child in &category.children {
        add_category_rows(table, child, depth + 1);
    }
}

fn category_table(categories: &[Category]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Products"]);
    for category in categories {
        add_category_rows(&mut table, category, 0);
    }
    table
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config: Config = load_config(config_path.as_deref()).with_context(|| {
        format!(
            "Failed to load configuration{}",
            config_path
                .as_ref()
                .map(|p| format!(" from {}", p.display()))
                .unwrap_or_default()
        )
    })?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_tracing(cli.verbose, cli.quiet, &config.logging);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let format = resolve_format(cli.output);

    match cli.command {
        Some(Commands::Api {
            host,
            port,
            data_file,
        }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let data_file = data_file.or_else(|| config.catalog.data_file.clone());

            let store = match &data_file {
                Some(path) => {
                    tracing::info!("Loading catalog from {}", path.display());
                    CatalogStore::from_json_file(path)
                        .with_context(|| format!("Failed to load catalog {}", path.display()))?
                }
                None => CatalogStore::seeded(),
            };
            tracing::info!(
                "Catalog ready: {} products, {} root categories",
                store.products().len(),
                store.categories().len()
            );

            run_server(Arc::new(store), &config.server, &config.catalog).await?;
        }

        Some(Commands::Serve { http, port, host }) => {
            let client = CatalogClient::new(&config.api)?;
            if !client.health().await {
                tracing::warn!(
                    "Catalog API at {} is not reachable; tool calls will fail until it is",
                    client.base_url()
                );
            }
            let server = McpServer::new(Arc::new(client))?;

            if http {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Some(Commands::Health) => {
            let client = CatalogClient::new(&config.api)?;
            if !client.health().await {
                anyhow::bail!("Catalog API at {} is not reachable", client.base_url());
            }
            if !cli.quiet {
                println!("Catalog API at {} is healthy", client.base_url());
            }
        }

        Some(Commands::Products {
            category,
            brand,
            in_stock,
            sort_by,
            order,
            page,
            limit,
        }) => {
            let client = CatalogClient::new(&config.api)?;
            let params = ProductListParams {
                page: Some(page),
                limit: Some(limit),
                category,
                brand,
                in_stock: in_stock.then_some(true),
                sort_by: sort_by.map(SortBy::from),
                sort_order: order.map(SortOrder::from),
                ..Default::default()
            };
            let result = client.list_products(&params).await?;

            if format == OutputFormat::Json {
                print_json(&result)?;
            } else {
                println!("{}", product_table(&result.data));
                println!(
                    "Page {} of {} ({} products)",
                    result.pagination.page, result.pagination.total_pages, result.pagination.total
                );
            }
        }

        Some(Commands::Search {
            query,
            category,
            page,
            limit,
        }) => {
            let client = CatalogClient::new(&config.api)?;
            let params = SearchParams {
                page: Some(page),
                limit: Some(limit),
                category,
                ..SearchParams::new(query)
            };
            let result = client.search_products(&params).await?;

            if format == OutputFormat::Json {
                print_json(&result)?;
            } else {
                println!("{}", product_table(&result.data));
                println!(
                    "{} matches for '{}'",
                    result.pagination.total, result.query
                );
            }
        }

        Some(Commands::Categories { parent, counts }) => {
            let client = CatalogClient::new(&config.api)?;
            let params = CategoryListParams {
                parent_id: parent,
                include_product_count: counts.then_some(true),
            };
            let categories = client.get_categories(&params).await?;

            if format == OutputFormat::Json {
                print_json(&categories)?;
            } else {
                println!("{}", category_table(&categories));
            }
        }

        Some(Commands::Tools) => {
            let client = CatalogClient::new(&config.api)?;
            let registry = ToolRegistry::new(Arc::new(client));
            let tools = registry.all();

            if format == OutputFormat::Json {
                let listing: Vec<serde_json::Value> = tools
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "name": t.name,
                            "description": t.description,
                            "inputSchema": t.input_schema,
                        })
                    })
                    .collect();
                print_json(&listing)?;
            } else {
                for tool in tools {
                    println!("{:<30} {}", tool.name, tool.description);
                }
            }
        }

        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
        }

        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["catalog-bridge"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.api_url.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["catalog-bridge", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_api_command() {
        let cli = Cli::parse_from(["catalog-bridge", "api", "--port", "8080"]);
        match cli.command {
            Some(Commands::Api { host, port, data_file }) => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
                assert!(data_file.is_none());
            }
            _ => panic!("Expected Api command"),
        }
    }

    #[test]
    fn test_cli_serve_defaults_to_stdio() {
        let cli = Cli::parse_from(["catalog-bridge", "serve"]);
        match cli.command {
            Some(Commands::Serve { http, port, host }) => {
                assert!(!http);
                assert_eq!(port, 3001);
                assert_eq!(host, "127.0.0.1");
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_products_with_sort() {
        let cli = Cli::parse_from([
            "catalog-bridge",
            "products",
            "--category",
            "electronics",
            "--sort-by",
            "price",
            "--order",
            "desc",
            "--output",
            "json",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Some(Commands::Products {
                category,
                sort_by,
                order,
                limit,
                ..
            }) => {
                assert_eq!(category.as_deref(), Some("electronics"));
                assert_eq!(sort_by.map(SortBy::from), Some(SortBy::Price));
                assert_eq!(order.map(SortOrder::from), Some(SortOrder::Desc));
                assert_eq!(limit, 10);
            }
            _ => panic!("Expected Products command"),
        }
    }

    #[test]
    fn test_cli_search_alias() {
        let cli = Cli::parse_from(["catalog-bridge", "s", "headphones"]);
        assert!(matches!(cli.command, Some(Commands::Search { query, .. }) if query == "headphones"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ÄÖÜäöüßÄÖÜ", 6), "ÄÖÜ...");
    }

    #[test]
    fn test_tables_render_catalog() {
        let store = CatalogStore::seeded();
        let rendered = product_table(store.products()).to_string();
        assert!(rendered.contains("iphone-15-pro"));

        let rendered = category_table(store.categories()).to_string();
        assert!(rendered.contains("  smartphones"));
    }
}
