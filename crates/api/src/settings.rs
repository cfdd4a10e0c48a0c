//! Application configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `AUTOSCAN__*` environment variables (`AUTOSCAN__SELECTOR__LIMIT=50`).

use comparable_selector::SelectorConfig;
use config::{Config, ConfigError, Environment, File};
use price_estimator::EstimatorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default config file name looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "autoscan";

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// SQLite URL (`sqlite://vehicles.db?mode=rwc`); in-memory store when absent
    pub database_url: Option<String>,

    pub max_connections: u32,

    /// JSON array of listings loaded into the store at startup
    pub seed_file: Option<PathBuf>,

    /// Required `x-api-key` header value; auth disabled when absent
    pub api_key: Option<String>,

    /// CORS origins; `*` allows any
    pub allowed_origins: Vec<String>,

    /// Default scrape-age window (hours) for candidate pools
    pub fresh_hours_default: u32,

    /// Upper bound on listings fetched per request
    pub max_pool: usize,

    pub log_level: String,

    pub log_json: bool,

    /// Prometheus exporter listen address
    pub metrics_addr: Option<String>,

    pub selector: SelectorConfig,

    pub estimator: EstimatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_url: None,
            max_connections: 4,
            seed_file: None,
            api_key: None,
            allowed_origins: vec!["*".to_string()],
            fresh_hours_default: 720,
            max_pool: 5_000,
            log_level: "info".to_string(),
            log_json: false,
            metrics_addr: None,
            selector: SelectorConfig::default(),
            estimator: EstimatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration. An explicit `path` must exist; the default
    /// `autoscan.toml` is optional.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("AUTOSCAN")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }

    /// Whether CORS should accept any origin
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o.trim() == "*")
    }
}
