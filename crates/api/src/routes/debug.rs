//! Debug Routes

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use comparable_selector::select;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{load_pool, Search};
use crate::{ApiError, AppState};

/// Query parameters for the count endpoint; windows default wider than `/comps`
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub mileage: u32,
    #[serde(default = "default_window_km")]
    pub window_km: i64,
    #[serde(default = "default_window_year")]
    pub window_year: i64,
    pub fresh_hours: Option<u32>,
}

fn default_window_km() -> i64 {
    60_000
}

fn default_window_year() -> i64 {
    3
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    /// Rows passing the storage prefilter
    pub count: usize,
    /// Rows surviving brand/model matching
    pub matched: usize,
    pub backend: String,
}

pub async fn count(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CountQuery>,
) -> Result<Json<CountResponse>, ApiError> {
    state.authorize(&headers)?;

    let search = Search {
        brand: &params.brand,
        model: &params.model,
        year: params.year,
        mileage: params.mileage,
        fuel: None,
        motor: None,
        window_km: Some(params.window_km),
        window_year: Some(params.window_year),
        fresh_hours: params.fresh_hours,
        limit: None,
    };

    let (target, criteria, pool) = load_pool(&state, &search).await?;
    let count = state
        .repository
        .count_window(&search.pool_query(&state, &criteria))
        .await?;
    let matched = select(&target, &pool, &criteria)?.matched();

    Ok(Json(CountResponse {
        count,
        matched,
        backend: state.repository.backend_name().to_string(),
    }))
}
