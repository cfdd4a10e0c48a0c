//! Listing freshness checks

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Marker used by seeded data that has no scrape time
pub(crate) const NO_SCRAPE_TIME: &str = "n/a";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a scrape timestamp (RFC 3339 or naive ISO, taken as UTC)
pub(crate) fn parse_scraped_at(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Seed rows (`n/a` or no timestamp) are always fresh; unparseable
/// timestamps are stale.
pub(crate) fn is_fresh(scraped_at: Option<&str>, fresh_hours: Option<u32>, now: DateTime<Utc>) -> bool {
    let Some(hours) = fresh_hours else {
        return true;
    };

    match scraped_at.map(str::trim) {
        None | Some("") | Some(NO_SCRAPE_TIME) => true,
        Some(text) => parse_scraped_at(text)
            .map(|at| at >= now - Duration::hours(hours as i64))
            .unwrap_or(false),
    }
}
