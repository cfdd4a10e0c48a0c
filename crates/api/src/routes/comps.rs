//! Comparable Listing Routes

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use comparable_selector::select;
use listing::VehicleDescriptor;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::{load_pool, Search};
use crate::{ApiError, AppState};

/// Query parameters for the comps endpoint
#[derive(Debug, Deserialize)]
pub struct CompsQuery {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub mileage: u32,
    pub fuel: Option<String>,
    pub motor: Option<String>,
    /// Kilometers either side of `mileage`
    pub window_km: Option<i64>,
    /// Model years either side of `year`
    pub window_year: Option<i64>,
    /// Maximum scrape age in hours; 0 disables
    pub fresh_hours: Option<u32>,
    pub limit: Option<usize>,
}

impl CompsQuery {
    fn search(&self) -> Search<'_> {
        Search {
            brand: &self.brand,
            model: &self.model,
            year: self.year,
            mileage: self.mileage,
            fuel: self.fuel.as_deref(),
            motor: self.motor.as_deref(),
            window_km: self.window_km,
            window_year: self.window_year,
            fresh_hours: self.fresh_hours,
            limit: self.limit,
        }
    }
}

/// Comparable listings, closest first
pub async fn get_comps(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CompsQuery>,
) -> Result<Json<Vec<VehicleDescriptor>>, ApiError> {
    state.authorize(&headers)?;
    metrics::counter!("autoscan_comps_requests_total").increment(1);

    let (target, criteria, pool) = load_pool(&state, &params.search()).await?;
    let selected = select(&target, &pool, &criteria)?;

    debug!(
        "comps {} {} {}: {} of {} pooled",
        params.brand,
        params.model,
        params.year,
        selected.len(),
        pool.len()
    );

    Ok(Json(selected.into_records()))
}
