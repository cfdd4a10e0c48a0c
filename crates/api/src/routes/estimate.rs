//! Price Estimate Routes

use axum::{extract::State, http::HeaderMap, Json};
use listing::{parse_pool, RawListing};
use price_estimator::{appraise, Estimate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::{load_pool, Search};
use crate::{ApiError, AppState};

/// Message returned when no comparable carried a price
pub const NO_DATA_MESSAGE: &str = "No comparable rows";

/// Estimate request body
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub mileage: u32,
    #[serde(default)]
    pub fuel: Option<String>,
    #[serde(default)]
    pub motor: Option<String>,
    /// Caller-supplied comparables; used as-is instead of storage when non-empty
    #[serde(default)]
    pub rows: Option<Vec<RawListing>>,
    pub window_km: Option<i64>,
    pub window_year: Option<i64>,
    pub fresh_hours: Option<u32>,
    pub limit: Option<usize>,
}

impl EstimateRequest {
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

/// Estimate response; price fields are omitted when there is no data
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EstimateResponse {
    /// Comparables considered, priced or not
    pub found: usize,
    /// Priced comparables behind the estimate
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_czk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_czk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_czk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_czk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_czk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_czk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EstimateResponse {
    pub fn new(found: usize, estimate: &Estimate) -> Self {
        match estimate.price() {
            Some(p) => Self {
                found,
                count: p.sample_count,
                price_czk: Some(p.median),
                low_czk: Some(p.low),
                high_czk: Some(p.high),
                mean_czk: Some(p.mean),
                min_czk: Some(p.min),
                max_czk: Some(p.max),
                strategy: Some(p.strategy.clone()),
                message: None,
            },
            None => Self {
                found,
                count: 0,
                price_czk: None,
                low_czk: None,
                high_czk: None,
                mean_czk: None,
                min_czk: None,
                max_czk: None,
                strategy: None,
                message: Some(NO_DATA_MESSAGE.to_string()),
            },
        }
    }
}

/// Estimate a price from stored comparables or from the posted `rows`
pub async fn price_estimate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, ApiError> {
    state.authorize(&headers)?;
    let search = body.search();

    let (found, estimate) = match body.rows.as_deref() {
        Some(rows) if !rows.is_empty() => {
            let parsed = parse_pool(rows.iter().cloned(), &state.bounds);
            let target = search.target();
            let motor_hint = target.motor.as_deref().unwrap_or_default();
            let estimate = state
                .estimator
                .estimate(&parsed.records, target.year, target.mileage, motor_hint);
            debug!("Estimating from {} posted rows", parsed.records.len());
            (parsed.records.len(), estimate)
        }
        _ => {
            let (target, criteria, pool) = load_pool(&state, &search).await?;
            let appraisal = appraise(&target, &pool, &criteria, &state.estimator)?;
            (appraisal.found(), appraisal.estimate)
        }
    };

    let outcome = if estimate.is_no_data() { "no_data" } else { "priced" };
    metrics::counter!("autoscan_estimates_total", "outcome" => outcome).increment(1);

    info!(
        "estimate {} {} {} / {} km: {} found, {} priced",
        body.brand,
        body.model,
        body.year,
        body.mileage,
        found,
        estimate.sample_count()
    );

    Ok(Json(EstimateResponse::new(found, &estimate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_response_omits_prices() {
        let response = EstimateResponse::new(2, &Estimate::NoData);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"found": 2, "count": 0, "message": "No comparable rows"})
        );
    }
}
