//! Raw Listing Parsing
//!
//! Rows arrive from scrapers, seeded dumps and API callers with numbers as
//! integers, floats or formatted text ("450 000 Kč"). Parsing turns them into
//! [`VehicleDescriptor`]s or rejects them as malformed.

use crate::descriptor::VehicleDescriptor;
use crate::error::RecordError;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Unit and currency suffixes stripped from numeric text
const NUMERIC_SUFFIXES: &[&str] = &["kč", "kc", "czk", "km", ",-", ".-"];

/// Loosely typed numeric field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Parse into an integer. Blank text counts as absent.
    fn to_int(&self, field: &'static str) -> Result<Option<i64>, RecordError> {
        match self {
            RawValue::Int(v) => Ok(Some(*v)),
            RawValue::Float(f) if f.is_finite() => Ok(Some(f.round() as i64)),
            RawValue::Float(f) => Err(RecordError::Unparseable {
                field,
                value: f.to_string(),
            }),
            RawValue::Text(s) => parse_numeric_text(field, s),
        }
    }

    /// Lenient integer view; `None` when absent or unparseable
    pub fn as_int(&self) -> Option<i64> {
        self.to_int("value").ok().flatten()
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

fn parse_numeric_text(field: &'static str, text: &str) -> Result<Option<i64>, RecordError> {
    let mut cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if cleaned.is_empty() {
        return Ok(None);
    }

    for suffix in NUMERIC_SUFFIXES {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.to_string();
        }
    }

    if let Ok(v) = cleaned.parse::<i64>() {
        return Ok(Some(v));
    }

    if let Some(v) = ungroup_thousands(&cleaned).and_then(|d| d.parse::<i64>().ok()) {
        return Ok(Some(v));
    }

    match cleaned.replace(',', ".").parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Some(f.round() as i64)),
        _ => Err(RecordError::Unparseable {
            field,
            value: text.to_string(),
        }),
    }
}

/// Digits of a number written with `.` or `,` thousands separators
/// ("1.250.000" -> "1250000"). `None` unless every group after the first
/// has exactly three digits and one separator is used throughout.
fn ungroup_thousands(text: &str) -> Option<String> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let sep = body.chars().find(|c| *c == '.' || *c == ',')?;
    let groups: Vec<&str> = body.split(sep).collect();

    let (head, tail) = groups.split_first()?;
    let digits = |g: &str| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit());
    if !digits(head) || head.len() > 3 || tail.is_empty() {
        return None;
    }
    if !tail.iter().all(|g| g.len() == 3 && digits(g)) {
        return None;
    }

    Some(format!("{sign}{}", groups.concat()))
}

/// Plausibility bounds applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordBounds {
    pub min_year: i32,
    pub max_year: i32,
}

impl RecordBounds {
    /// 1900 up to next model year
    pub fn current() -> Self {
        Self {
            min_year: 1900,
            max_year: Utc::now().year() + 1,
        }
    }

    fn check(&self, field: &'static str, value: i64, min: i64, max: i64) -> Result<(), RecordError> {
        if value < min || value > max {
            Err(RecordError::OutOfRange { field, value, min, max })
        } else {
            Ok(())
        }
    }
}

impl Default for RecordBounds {
    fn default() -> Self {
        Self::current()
    }
}

/// A listing row before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawListing {
    pub source: Option<String>,
    pub url: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<RawValue>,
    pub mileage: Option<RawValue>,
    pub fuel: Option<String>,
    pub motor: Option<String>,
    pub transmission: Option<String>,
    pub drive: Option<String>,
    #[serde(alias = "price")]
    pub price_czk: Option<RawValue>,
    pub scraped_at: Option<String>,
}

impl RawListing {
    /// Validate and convert into a descriptor.
    ///
    /// A missing price is allowed (the record can still be matched); a price
    /// that is present but unparseable rejects the whole record.
    pub fn into_descriptor(self, bounds: &RecordBounds) -> Result<VehicleDescriptor, RecordError> {
        let brand = required_text("brand", self.brand)?;
        let model = required_text("model", self.model)?;

        let year = required_int("year", self.year.as_ref())?;
        bounds.check("year", year, bounds.min_year as i64, bounds.max_year as i64)?;

        let mileage = required_int("mileage", self.mileage.as_ref())?;
        bounds.check("mileage", mileage, 0, u32::MAX as i64)?;

        let price = match self.price_czk.as_ref() {
            Some(raw) => raw.to_int("price")?,
            None => None,
        };

        Ok(VehicleDescriptor {
            brand,
            model,
            year: year as i32,
            mileage: mileage as u32,
            fuel: non_blank(self.fuel),
            motor: non_blank(self.motor),
            price,
            transmission: non_blank(self.transmission),
            drive: non_blank(self.drive),
            source: self.source,
            url: self.url,
            scraped_at: self.scraped_at,
        })
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn required_text(field: &'static str, text: Option<String>) -> Result<String, RecordError> {
    non_blank(text).ok_or(RecordError::MissingField(field))
}

fn required_int(field: &'static str, raw: Option<&RawValue>) -> Result<i64, RecordError> {
    match raw {
        Some(v) => v.to_int(field)?.ok_or(RecordError::MissingField(field)),
        None => Err(RecordError::MissingField(field)),
    }
}

/// Result of parsing a batch of raw listings
#[derive(Debug, Clone, Default)]
pub struct ParsedPool {
    pub records: Vec<VehicleDescriptor>,
    /// Malformed rows dropped during parsing
    pub skipped: usize,
}

/// Parse a batch, skipping malformed rows instead of failing
pub fn parse_pool<I>(raw: I, bounds: &RecordBounds) -> ParsedPool
where
    I: IntoIterator<Item = RawListing>,
{
    let mut pool = ParsedPool::default();

    for row in raw {
        let url = row.url.clone();
        match row.into_descriptor(bounds) {
            Ok(record) => pool.records.push(record),
            Err(e) => {
                debug!("Skipping malformed listing {:?}: {}", url, e);
                pool.skipped += 1;
            }
        }
    }

    if pool.skipped > 0 {
        warn!(
            "Skipped {} malformed listings ({} usable)",
            pool.skipped,
            pool.records.len()
        );
    }

    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> RecordBounds {
        RecordBounds {
            min_year: 1900,
            max_year: 2026,
        }
    }

    fn raw(year: RawValue, mileage: RawValue, price: Option<RawValue>) -> RawListing {
        RawListing {
            brand: Some("Škoda".into()),
            model: Some("Octavia".into()),
            year: Some(year),
            mileage: Some(mileage),
            price_czk: price,
            ..Default::default()
        }
    }

    #[test]
    fn test_formatted_text_numbers() {
        let record = raw("2019".into(), "152 000 km".into(), Some("450\u{a0}000 Kč".into()))
            .into_descriptor(&bounds())
            .unwrap();
        assert_eq!(record.year, 2019);
        assert_eq!(record.mileage, 152_000);
        assert_eq!(record.price, Some(450_000));
    }

    #[test]
    fn test_dot_thousands_separator_keeps_all_digits() {
        let record = raw(RawValue::Int(2019), "152.000 km".into(), Some("450.000 Kč".into()))
            .into_descriptor(&bounds())
            .unwrap();
        assert_eq!(record.mileage, 152_000);
        assert_eq!(record.price, Some(450_000));

        assert_eq!(RawValue::from("1.250.000,-").as_int(), Some(1_250_000));
        assert_eq!(RawValue::from("1,250,000").as_int(), Some(1_250_000));
        assert_eq!(RawValue::from("1,5").as_int(), Some(2));
        assert_eq!(RawValue::from("99999.6").as_int(), Some(100_000));
    }

    #[test]
    fn test_float_values_are_rounded() {
        let record = raw(RawValue::Float(2020.0), RawValue::Float(99_999.6), None)
            .into_descriptor(&bounds())
            .unwrap();
        assert_eq!(record.mileage, 100_000);
    }

    #[test]
    fn test_missing_price_is_allowed() {
        let record = raw(RawValue::Int(2020), RawValue::Int(100_000), None)
            .into_descriptor(&bounds())
            .unwrap();
        assert_eq!(record.price, None);

        let blank = raw(RawValue::Int(2020), RawValue::Int(100_000), Some("  ".into()))
            .into_descriptor(&bounds())
            .unwrap();
        assert_eq!(blank.price, None);
    }

    #[test]
    fn test_unparseable_fields_are_malformed() {
        let err = raw(RawValue::Int(2020), RawValue::Int(100_000), Some("dohodou".into()))
            .into_descriptor(&bounds())
            .unwrap_err();
        assert!(matches!(err, RecordError::Unparseable { field: "price", .. }));

        let err = raw("n/a".into(), RawValue::Int(100_000), None)
            .into_descriptor(&bounds())
            .unwrap_err();
        assert!(matches!(err, RecordError::Unparseable { field: "year", .. }));
    }

    #[test]
    fn test_out_of_range() {
        let err = raw(RawValue::Int(1850), RawValue::Int(100_000), None)
            .into_descriptor(&bounds())
            .unwrap_err();
        assert!(matches!(err, RecordError::OutOfRange { field: "year", .. }));

        let err = raw(RawValue::Int(2020), RawValue::Int(-5), None)
            .into_descriptor(&bounds())
            .unwrap_err();
        assert!(matches!(err, RecordError::OutOfRange { field: "mileage", .. }));
    }

    #[test]
    fn test_missing_brand() {
        let mut row = raw(RawValue::Int(2020), RawValue::Int(100_000), None);
        row.brand = Some(" ".into());
        assert_eq!(
            row.into_descriptor(&bounds()).unwrap_err(),
            RecordError::MissingField("brand")
        );
    }

    #[test]
    fn test_json_rows_accept_price_alias() {
        let rows: Vec<RawListing> = serde_json::from_str(
            r#"[
                {"brand": "skoda", "model": "octavia", "year": 2019, "mileage": 120000, "price_czk": 420000},
                {"brand": "skoda", "model": "octavia", "year": "2021", "mileage": 90000.0, "price": "510000"},
                {"brand": "skoda", "model": "octavia", "year": null, "mileage": 90000}
            ]"#,
        )
        .unwrap();

        let pool = parse_pool(rows, &bounds());
        assert_eq!(pool.records.len(), 2);
        assert_eq!(pool.skipped, 1);
        assert_eq!(pool.records[1].price, Some(510_000));
    }

    #[test]
    fn test_lenient_int_view() {
        assert_eq!(RawValue::from("120 000 km").as_int(), Some(120_000));
        assert_eq!(RawValue::Float(1.6).as_int(), Some(2));
        assert_eq!(RawValue::from("n/a").as_int(), None);
        assert_eq!(RawValue::from("").as_int(), None);
    }

    #[test]
    fn test_current_bounds_allow_next_model_year() {
        let b = RecordBounds::current();
        assert_eq!(b.max_year, Utc::now().year() + 1);
    }
}
