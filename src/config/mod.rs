//! Configuration management.
//!
//! Settings come from an optional TOML file layered under environment
//! variables prefixed with `CATALOG_BRIDGE`, using `__` between section and
//! key:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [api]
//! base_url = "http://127.0.0.1:3000"
//! timeout_secs = 30
//!
//! [catalog]
//! data_file = "./catalog.json"
//! limited_stock_threshold = 10
//! popular_min_rating = 4.0
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! `CATALOG_BRIDGE_API__BASE_URL=http://catalog:8080` overrides `api.base_url`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CATALOG_BRIDGE";

/// Config file name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "catalog-bridge.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// REST server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Settings for reaching the REST API from the MCP bridge
    #[serde(default)]
    pub api: ApiConfig,

    /// Catalog data and query defaults
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// REST server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// API client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Catalog data source and query defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog to load instead of the built-in sample data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Stock at or below this count is reported as limited
    #[serde(default = "default_limited_stock_threshold")]
    pub limited_stock_threshold: u32,

    #[serde(default = "default_popular_min_rating")]
    pub popular_min_rating: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            limited_stock_threshold: default_limited_stock_threshold(),
            popular_min_rating: default_popular_min_rating(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_limited_stock_threshold() -> u32 {
    10
}

fn default_popular_min_rating() -> f64 {
    4.0
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "text" (default) or "json"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject settings the query layer cannot work with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let catalog = &self.catalog;
        if catalog.max_page_size == 0 {
            return Err(config::ConfigError::Message(
                "catalog.max_page_size must be at least 1".to_string(),
            ));
        }
        if catalog.default_page_size == 0 || catalog.default_page_size > catalog.max_page_size {
            return Err(config::ConfigError::Message(format!(
                "catalog.default_page_size must be between 1 and {}",
                catalog.max_page_size
            )));
        }
        if !(0.0..=5.0).contains(&catalog.popular_min_rating) {
            return Err(config::ConfigError::Message(
                "catalog.popular_min_rating must be between 0 and 5".to_string(),
            ));
        }
        url::Url::parse(&self.api.base_url).map_err(|e| {
            config::ConfigError::Message(format!("api.base_url is not a valid URL: {}", e))
        })?;
        Ok(())
    }
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("catalog-bridge").join("config.toml"))
        .filter(|path| path.is_file())
}
