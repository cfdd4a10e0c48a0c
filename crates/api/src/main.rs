//! AutoScan Price Estimation Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, init_metrics, run_server, AppConfig, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional config file path as the first argument
    let path = std::env::args().nth(1);
    let config = AppConfig::load(path.as_deref()).context("loading configuration")?;

    init_logging(&config);
    info!("=== AutoScan backend v{} ===", env!("CARGO_PKG_VERSION"));

    init_metrics(&config)?;

    let state = AppState::from_config(config).await?;
    run_server(Arc::new(state)).await
}
