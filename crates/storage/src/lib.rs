//! Storage Layer
//!
//! Listing repository with in-memory and SQLite backends. Supplies coarse
//! candidate pools; all text matching happens in the selector.

mod freshness;
mod query;
mod repository;

pub use query::PoolQuery;
pub use repository::Repository;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Lock error: {0}")]
    LockError(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}
