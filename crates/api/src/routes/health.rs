//! Health Route

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApiError, AppState};

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "autoscan-backend";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Storage backend in use
    pub backend: String,
    /// Stored listings
    pub listings: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let listings = state.repository.count().await?;

    Ok(Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        backend: state.repository.backend_name().to_string(),
        listings,
    }))
}
