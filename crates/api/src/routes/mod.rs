//! HTTP Routes

pub mod comps;
pub mod debug;
pub mod estimate;
pub mod health;

use crate::{ApiError, AppState};
use comparable_selector::{Matcher, SelectCriteria};
use listing::{parse_pool, VehicleDescriptor};
use storage::PoolQuery;

/// Target and window parameters shared by the search endpoints
#[derive(Debug, Clone)]
pub(crate) struct Search<'a> {
    pub brand: &'a str,
    pub model: &'a str,
    pub year: i32,
    pub mileage: u32,
    pub fuel: Option<&'a str>,
    pub motor: Option<&'a str>,
    pub window_km: Option<i64>,
    pub window_year: Option<i64>,
    pub fresh_hours: Option<u32>,
    pub limit: Option<usize>,
}

impl Search<'_> {
    pub fn target(&self) -> VehicleDescriptor {
        let mut target = VehicleDescriptor::new(self.brand, self.model, self.year, self.mileage);
        if let Some(fuel) = non_blank(self.fuel) {
            target = target.with_fuel(fuel);
        }
        if let Some(motor) = non_blank(self.motor) {
            target = target.with_motor(motor);
        }
        target
    }

    /// Request overrides on top of the configured selector defaults
    pub fn criteria(&self, state: &AppState) -> SelectCriteria {
        let defaults = &state.config.selector;
        let mut criteria = SelectCriteria::from_config(defaults);
        criteria.year_window = self.window_year.unwrap_or(defaults.year_window);
        criteria.mileage_window = self.window_km.unwrap_or(defaults.mileage_window);
        criteria.limit = self.limit.unwrap_or(defaults.limit);
        criteria.fuel = non_blank(self.fuel).map(str::to_string);
        criteria.motor = non_blank(self.motor).map(str::to_string);
        criteria
    }

    pub fn pool_query(&self, state: &AppState, criteria: &SelectCriteria) -> PoolQuery {
        let fresh_hours = self.fresh_hours.unwrap_or(state.config.fresh_hours_default);
        let query = PoolQuery::new(
            self.brand,
            self.year,
            criteria.year_window,
            self.mileage,
            criteria.mileage_window,
        )
        .with_max_pool(state.config.max_pool);

        // 0 disables the freshness filter
        if fresh_hours > 0 {
            query.with_fresh_hours(fresh_hours)
        } else {
            query
        }
    }
}

/// Validate the search, then fetch and parse the coarse pool from storage
pub(crate) async fn load_pool(
    state: &AppState,
    search: &Search<'_>,
) -> Result<(VehicleDescriptor, SelectCriteria, Vec<VehicleDescriptor>), ApiError> {
    let target = search.target();
    let criteria = search.criteria(state);
    Matcher::new(&target, &criteria)?;

    let raw = state
        .repository
        .fetch_pool(&search.pool_query(state, &criteria))
        .await?;
    let parsed = parse_pool(raw, &state.bounds);

    Ok((target, criteria, parsed.records))
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
