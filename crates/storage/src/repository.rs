//! Repository Implementation

use crate::query::PoolQuery;
use crate::StorageError;
use chrono::Utc;
use listing::{RawListing, RawValue};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::sync::Mutex;
use text_normalizer::fold;
use tracing::{debug, info};

const CREATE_LISTINGS: &str = "
CREATE TABLE IF NOT EXISTS listings (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    source       TEXT,
    url          TEXT UNIQUE,
    brand        TEXT NOT NULL,
    brand_key    TEXT NOT NULL,
    model        TEXT NOT NULL,
    year         INTEGER,
    mileage      INTEGER,
    fuel         TEXT,
    motor        TEXT,
    transmission TEXT,
    drive        TEXT,
    price_czk    INTEGER,
    scraped_at   TEXT
)";

const CREATE_WINDOW_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_listings_window ON listings (brand_key, year, mileage)";

const UPSERT_LISTING: &str = "
INSERT INTO listings
    (source, url, brand, brand_key, model, year, mileage, fuel, motor, transmission, drive, price_czk, scraped_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(url) DO UPDATE SET
    source = excluded.source, brand = excluded.brand, brand_key = excluded.brand_key,
    model = excluded.model, year = excluded.year, mileage = excluded.mileage,
    fuel = excluded.fuel, motor = excluded.motor, transmission = excluded.transmission,
    drive = excluded.drive, price_czk = excluded.price_czk, scraped_at = excluded.scraped_at";

/// Shared WHERE clause; binds: brand_key x2, year lo/hi, mileage lo/hi, fresh_hours x2
const WINDOW_FILTER: &str = "
WHERE (? IS NULL OR brand_key LIKE '%' || ? || '%')
  AND year BETWEEN ? AND ?
  AND mileage BETWEEN ? AND ?
  AND (? IS NULL OR scraped_at IS NULL OR scraped_at IN ('', 'n/a')
       OR datetime(scraped_at) >= datetime('now', '-' || ? || ' hours'))";

/// Storage backend
enum Backend {
    Memory(Mutex<Vec<RawListing>>),
    Sqlite(SqlitePool),
}

/// Repository for listing data
pub struct Repository {
    backend: Backend,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory listing repository");
        Self {
            backend: Backend::Memory(Mutex::new(Vec::new())),
        }
    }

    /// Open a SQLite repository, creating the listings table if missing
    pub async fn with_sqlite(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        info!("Opening SQLite listing repository at {}", database_url);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;

        sqlx::query(CREATE_LISTINGS).execute(&pool).await?;
        sqlx::query(CREATE_WINDOW_INDEX).execute(&pool).await?;

        Ok(Self {
            backend: Backend::Sqlite(pool),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::Sqlite(_) => "sqlite",
        }
    }

    /// Insert or replace (by url) a listing
    pub async fn insert_listing(&self, listing: RawListing) -> Result<(), StorageError> {
        match &self.backend {
            Backend::Memory(rows) => {
                let mut rows = rows
                    .lock()
                    .map_err(|e| StorageError::LockError(e.to_string()))?;

                let existing = listing
                    .url
                    .as_ref()
                    .and_then(|url| rows.iter().position(|r| r.url.as_ref() == Some(url)));
                match existing {
                    Some(i) => rows[i] = listing,
                    None => rows.push(listing),
                }
                Ok(())
            }
            Backend::Sqlite(pool) => {
                let brand = listing.brand.clone().unwrap_or_default();
                sqlx::query(UPSERT_LISTING)
                    .bind(&listing.source)
                    .bind(&listing.url)
                    .bind(&brand)
                    .bind(fold(&brand))
                    .bind(listing.model.clone().unwrap_or_default())
                    .bind(column_value(&listing.year))
                    .bind(column_value(&listing.mileage))
                    .bind(&listing.fuel)
                    .bind(&listing.motor)
                    .bind(&listing.transmission)
                    .bind(&listing.drive)
                    .bind(column_value(&listing.price_czk))
                    .bind(&listing.scraped_at)
                    .execute(pool)
                    .await?;
                Ok(())
            }
        }
    }

    /// Fetch the coarse candidate pool for a query, closest mileage first
    pub async fn fetch_pool(&self, query: &PoolQuery) -> Result<Vec<RawListing>, StorageError> {
        let (year_lo, year_hi) = query.year_range();
        let (km_lo, km_hi) = query.mileage_range();

        let rows = match &self.backend {
            Backend::Memory(rows) => {
                let rows = rows
                    .lock()
                    .map_err(|e| StorageError::LockError(e.to_string()))?;
                let now = Utc::now();

                let mut pool: Vec<RawListing> =
                    rows.iter().filter(|r| query.admits(r, now)).cloned().collect();
                pool.sort_by_key(|r| query.closeness(r));
                pool.truncate(query.max_pool);
                pool
            }
            Backend::Sqlite(pool) => {
                let sql = format!(
                    "SELECT source, url, brand, model,
                            CAST(year AS TEXT) AS year, CAST(mileage AS TEXT) AS mileage,
                            fuel, motor, transmission, drive,
                            CAST(price_czk AS TEXT) AS price_czk, scraped_at
                     FROM listings {WINDOW_FILTER}
                     ORDER BY ABS(mileage - ?), ABS(year - ?)
                     LIMIT ?"
                );
                let fresh = query.fresh_hours.map(i64::from);

                sqlx::query(&sql)
                    .bind(&query.brand_key)
                    .bind(&query.brand_key)
                    .bind(year_lo)
                    .bind(year_hi)
                    .bind(km_lo)
                    .bind(km_hi)
                    .bind(fresh)
                    .bind(fresh)
                    .bind(query.mileage as i64)
                    .bind(query.year as i64)
                    .bind(query.max_pool.min(i64::MAX as usize) as i64)
                    .fetch_all(pool)
                    .await?
                    .iter()
                    .map(listing_from_row)
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        debug!(
            "Fetched pool of {} listings (year {}..={}, km {}..={})",
            rows.len(),
            year_lo,
            year_hi,
            km_lo,
            km_hi
        );
        Ok(rows)
    }

    /// Count listings inside the query window (ignores `max_pool`)
    pub async fn count_window(&self, query: &PoolQuery) -> Result<usize, StorageError> {
        match &self.backend {
            Backend::Memory(rows) => {
                let rows = rows
                    .lock()
                    .map_err(|e| StorageError::LockError(e.to_string()))?;
                let now = Utc::now();
                Ok(rows.iter().filter(|r| query.admits(r, now)).count())
            }
            Backend::Sqlite(pool) => {
                let (year_lo, year_hi) = query.year_range();
                let (km_lo, km_hi) = query.mileage_range();
                let fresh = query.fresh_hours.map(i64::from);
                let sql = format!("SELECT COUNT(*) FROM listings {WINDOW_FILTER}");

                let count: i64 = sqlx::query_scalar(&sql)
                    .bind(&query.brand_key)
                    .bind(&query.brand_key)
                    .bind(year_lo)
                    .bind(year_hi)
                    .bind(km_lo)
                    .bind(km_hi)
                    .bind(fresh)
                    .bind(fresh)
                    .fetch_one(pool)
                    .await?;
                Ok(count.max(0) as usize)
            }
        }
    }

    /// Total stored listings
    pub async fn count(&self) -> Result<usize, StorageError> {
        match &self.backend {
            Backend::Memory(rows) => rows
                .lock()
                .map(|r| r.len())
                .map_err(|e| StorageError::LockError(e.to_string())),
            Backend::Sqlite(pool) => {
                let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings")
                    .fetch_one(pool)
                    .await?;
                Ok(count.max(0) as usize)
            }
        }
    }

    /// Release database connections
    pub async fn close(&self) {
        if let Backend::Sqlite(pool) = &self.backend {
            info!("Closing SQLite listing repository");
            pool.close().await;
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric column value: normalized digits when parseable, raw text otherwise
fn column_value(value: &Option<RawValue>) -> Option<String> {
    value.as_ref().map(|v| match v.as_int() {
        Some(n) => n.to_string(),
        None => match v {
            RawValue::Text(s) => s.clone(),
            RawValue::Int(n) => n.to_string(),
            RawValue::Float(f) => f.to_string(),
        },
    })
}

fn listing_from_row(row: &SqliteRow) -> Result<RawListing, StorageError> {
    let raw = |name: &str| -> Result<Option<RawValue>, StorageError> {
        Ok(row.try_get::<Option<String>, _>(name)?.map(RawValue::Text))
    };

    Ok(RawListing {
        source: row.try_get("source")?,
        url: row.try_get("url")?,
        brand: row.try_get("brand")?,
        model: row.try_get("model")?,
        year: raw("year")?,
        mileage: raw("mileage")?,
        fuel: row.try_get("fuel")?,
        motor: row.try_get("motor")?,
        transmission: row.try_get("transmission")?,
        drive: row.try_get("drive")?,
        price_czk: raw("price_czk")?,
        scraped_at: row.try_get("scraped_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use listing::{parse_pool, RecordBounds};

    fn listing(url: &str, brand: &str, year: i64, mileage: i64, price: Option<RawValue>) -> RawListing {
        RawListing {
            source: Some("seed".to_string()),
            url: Some(url.to_string()),
            brand: Some(brand.to_string()),
            model: Some("Octavia".to_string()),
            year: Some(RawValue::Int(year)),
            mileage: Some(RawValue::Int(mileage)),
            price_czk: price,
            scraped_at: Some("n/a".to_string()),
            ..Default::default()
        }
    }

    async fn seed(repo: &Repository) {
        let rows = vec![
            listing("a", "Škoda", 2019, 150_000, Some(RawValue::Int(420_000))),
            listing("b", "SKODA", 2020, 128_000, Some(RawValue::from("480 000 Kč"))),
            listing("c", "Škoda", 2020, 131_000, Some(RawValue::from("dohodou"))),
            listing("d", "Seat", 2020, 130_000, Some(RawValue::Int(300_000))),
            listing("e", "Škoda", 2012, 130_000, Some(RawValue::Int(150_000))),
        ];
        for row in rows {
            repo.insert_listing(row).await.unwrap();
        }
    }

    async fn sqlite() -> Repository {
        Repository::with_sqlite("sqlite::memory:", 1).await.unwrap()
    }

    #[tokio::test]
    async fn test_memory_pool_prefilter() {
        let repo = Repository::new();
        seed(&repo).await;

        let query = PoolQuery::new("škoda", 2020, 1, 130_000, 30_000);
        let pool = repo.fetch_pool(&query).await.unwrap();
        let urls: Vec<_> = pool.iter().filter_map(|r| r.url.as_deref()).collect();
        assert_eq!(urls, vec!["c", "b", "a"]);
        assert_eq!(repo.count_window(&query).await.unwrap(), 3);
        assert_eq!(repo.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_memory_upsert_by_url() {
        let repo = Repository::new();
        repo.insert_listing(listing("a", "Škoda", 2019, 150_000, None)).await.unwrap();
        repo.insert_listing(listing("a", "Škoda", 2019, 151_000, None)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_pool_prefilter() {
        let repo = sqlite().await;
        assert_eq!(repo.backend_name(), "sqlite");
        seed(&repo).await;

        let query = PoolQuery::new("Škoda", 2020, 1, 130_000, 30_000).with_max_pool(2);
        let pool = repo.fetch_pool(&query).await.unwrap();
        let urls: Vec<_> = pool.iter().filter_map(|r| r.url.as_deref()).collect();
        assert_eq!(urls, vec!["c", "b"]);
        assert_eq!(repo.count_window(&query).await.unwrap(), 3);

        let parsed = parse_pool(pool, &RecordBounds::current());
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records[0].price, Some(480_000));
        repo.close().await;
    }

    #[tokio::test]
    async fn test_sqlite_upsert_and_freshness() {
        let repo = sqlite().await;
        let mut stale = listing("x", "Škoda", 2020, 130_000, Some(RawValue::Int(1)));
        stale.scraped_at = Some("2001-01-01T00:00:00".to_string());
        repo.insert_listing(stale.clone()).await.unwrap();
        repo.insert_listing(stale).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        let query = PoolQuery::new("Škoda", 2020, 0, 130_000, 0);
        assert_eq!(repo.count_window(&query).await.unwrap(), 1);
        assert_eq!(repo.count_window(&query.with_fresh_hours(720)).await.unwrap(), 0);
    }
}
