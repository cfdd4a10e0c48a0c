//! Vehicle Price Estimation API Server
//!
//! Thin HTTP surface over the comparable selector and price estimator. The
//! listing repository and estimator are built once at startup and shared
//! through [`AppState`].

use anyhow::Context;
use axum::{
    http::{HeaderMap, HeaderValue},
    routing::{get, post},
    Router,
};
use listing::{RawListing, RecordBounds};
use price_estimator::{EstimateError, Estimator};
use std::str::FromStr;
use std::sync::Arc;
use storage::Repository;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;
mod settings;

pub use error::ApiError;
pub use settings::AppConfig;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Application state shared across handlers
pub struct AppState {
    /// Listing repository
    pub repository: Repository,
    /// Estimator bound to the configured strategy
    pub estimator: Estimator,
    pub config: AppConfig,
    /// Record plausibility bounds used when parsing pools
    pub bounds: RecordBounds,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state around an already opened repository
    pub fn new(config: AppConfig, repository: Repository) -> Result<Self, EstimateError> {
        let estimator = Estimator::new(config.estimator)?;
        info!(
            "Estimator strategy: {} (backend: {})",
            estimator.config().strategy.name(),
            repository.backend_name()
        );

        Ok(Self {
            repository,
            estimator,
            config,
            bounds: RecordBounds::current(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }

    /// Open the configured repository, load seed data and build the state
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let repository = match &config.database_url {
            Some(url) => Repository::with_sqlite(url, config.max_connections)
                .await
                .with_context(|| format!("opening listing database {url}"))?,
            None => Repository::new(),
        };

        if let Some(path) = &config.seed_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading seed file {}", path.display()))?;
            let rows: Vec<RawListing> = serde_json::from_str(&text)
                .with_context(|| format!("parsing seed file {}", path.display()))?;
            let count = rows.len();
            for row in rows {
                repository.insert_listing(row).await?;
            }
            info!("Seeded {} listings from {}", count, path.display());
        }

        Ok(Self::new(config, repository)?)
    }

    /// Check the `x-api-key` header when a key is configured
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return Ok(());
        };

        let provided = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
        if provided == Some(expected) {
            Ok(())
        } else {
            debug!("Rejected request with invalid API key");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/comps", get(routes::comps::get_comps))
        .route("/price/estimate", post(routes::estimate::price_estimate))
        .route("/debug/count", get(routes::debug::count))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o.trim()) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Initialize logging
pub fn init_logging(config: &AppConfig) {
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);

    let installed = if config.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    if installed.is_err() {
        debug!("Tracing subscriber already installed");
    }
}

/// Install the Prometheus exporter when configured
pub fn init_metrics(config: &AppConfig) -> anyhow::Result<()> {
    let Some(addr) = &config.metrics_addr else {
        return Ok(());
    };

    let addr: std::net::SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid metrics_addr {addr}"))?;
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("installing Prometheus exporter")?;

    info!("Prometheus metrics on {}", addr);
    Ok(())
}

/// Run the server until Ctrl-C, then release the repository
pub async fn run_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.bind_addr.clone();
    let app = create_router(state.clone());

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.repository.close().await;
    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(api_key: Option<&str>) -> AppState {
        let config = AppConfig {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        };
        AppState::new(config, Repository::new()).unwrap()
    }

    #[test]
    fn test_authorize_without_key() {
        assert!(state(None).authorize(&HeaderMap::new()).is_ok());
        assert!(state(Some("")).authorize(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_authorize_with_key() {
        let state = state(Some("secret"));
        let mut headers = HeaderMap::new();
        assert!(matches!(state.authorize(&headers), Err(ApiError::Unauthorized)));

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("wrong"));
        assert!(state.authorize(&headers).is_err());

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("secret"));
        assert!(state.authorize(&headers).is_ok());
    }

    #[test]
    fn test_invalid_estimator_config_rejected() {
        let mut config = AppConfig::default();
        config.estimator.weights.mileage_scale_km = -1.0;
        assert!(AppState::new(config, Repository::new()).is_err());
    }
}
