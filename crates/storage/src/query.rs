//! Coarse candidate pool query

use crate::freshness::is_fresh;
use chrono::{DateTime, Utc};
use listing::RawListing;
use text_normalizer::fold;

/// Numeric prefilter handed to the repository.
///
/// Only year/mileage windows, brand containment and freshness are applied
/// here; the selector does the precise matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolQuery {
    /// Folded brand the stored brand must contain; `None` disables
    pub brand_key: Option<String>,
    pub year: i32,
    pub year_window: i64,
    pub mileage: u32,
    pub mileage_window: i64,
    /// Hours of scrape age accepted; `None` disables
    pub fresh_hours: Option<u32>,
    /// Upper bound on rows returned, closest mileage first
    pub max_pool: usize,
}

impl PoolQuery {
    pub fn new(brand: &str, year: i32, year_window: i64, mileage: u32, mileage_window: i64) -> Self {
        let brand_key = Some(fold(brand)).filter(|b| !b.is_empty());
        Self {
            brand_key,
            year,
            year_window: year_window.max(0),
            mileage,
            mileage_window: mileage_window.max(0),
            fresh_hours: None,
            max_pool: 5_000,
        }
    }

    pub fn with_fresh_hours(mut self, hours: u32) -> Self {
        self.fresh_hours = Some(hours);
        self
    }

    pub fn with_max_pool(mut self, max_pool: usize) -> Self {
        self.max_pool = max_pool;
        self
    }

    pub fn year_range(&self) -> (i64, i64) {
        let year = self.year as i64;
        (
            year.saturating_sub(self.year_window),
            year.saturating_add(self.year_window),
        )
    }

    pub fn mileage_range(&self) -> (i64, i64) {
        let mileage = self.mileage as i64;
        (
            mileage.saturating_sub(self.mileage_window).max(0),
            mileage.saturating_add(self.mileage_window),
        )
    }

    /// In-memory equivalent of the SQL prefilter
    pub(crate) fn admits(&self, row: &RawListing, now: DateTime<Utc>) -> bool {
        let Some(year) = row.year.as_ref().and_then(|v| v.as_int()) else {
            return false;
        };
        let Some(mileage) = row.mileage.as_ref().and_then(|v| v.as_int()) else {
            return false;
        };

        let (year_lo, year_hi) = self.year_range();
        let (km_lo, km_hi) = self.mileage_range();

        let brand_ok = match &self.brand_key {
            Some(key) => fold(row.brand.as_deref().unwrap_or_default()).contains(key.as_str()),
            None => true,
        };

        brand_ok
            && (year_lo..=year_hi).contains(&year)
            && (km_lo..=km_hi).contains(&mileage)
            && is_fresh(row.scraped_at.as_deref(), self.fresh_hours, now)
    }

    /// Sort key matching the SQL `ORDER BY`
    pub(crate) fn closeness(&self, row: &RawListing) -> (i64, i64) {
        let year = row.year.as_ref().and_then(|v| v.as_int()).unwrap_or_default();
        let mileage = row.mileage.as_ref().and_then(|v| v.as_int()).unwrap_or_default();
        (
            (mileage - self.mileage as i64).abs(),
            (year - self.year as i64).abs(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listing::RawValue;

    fn row(brand: &str, year: i64, mileage: i64) -> RawListing {
        RawListing {
            brand: Some(brand.to_string()),
            model: Some("Octavia".to_string()),
            year: Some(RawValue::Int(year)),
            mileage: Some(RawValue::Int(mileage)),
            ..Default::default()
        }
    }

    #[test]
    fn test_ranges() {
        let q = PoolQuery::new("Škoda", 2020, 3, 10_000, 20_000);
        assert_eq!(q.year_range(), (2017, 2023));
        assert_eq!(q.mileage_range(), (0, 30_000));
        assert_eq!(q.brand_key.as_deref(), Some("skoda"));
    }

    #[test]
    fn test_unbounded_windows_saturate() {
        let q = PoolQuery::new("Škoda", 2020, i64::MAX, 130_000, i64::MAX);
        assert_eq!(q.year_range(), (2020 - i64::MAX, i64::MAX));
        assert_eq!(q.mileage_range(), (0, i64::MAX));
        assert!(q.admits(&row("Škoda", 1950, u32::MAX as i64), Utc::now()));
    }

    #[test]
    fn test_admits() {
        let q = PoolQuery::new("Škoda", 2020, 1, 100_000, 10_000);
        let now = Utc::now();
        assert!(q.admits(&row("SKODA", 2021, 110_000), now));
        assert!(!q.admits(&row("SKODA", 2022, 100_000), now));
        assert!(!q.admits(&row("Seat", 2020, 100_000), now));

        let mut malformed = row("Škoda", 2020, 100_000);
        malformed.year = Some(RawValue::from("n/a"));
        assert!(!q.admits(&malformed, now));
    }
}
