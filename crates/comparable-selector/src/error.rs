//! Selection Error Types

use thiserror::Error;

/// Invalid selection arguments; never retried, surfaced to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// A year or mileage window below zero
    #[error("{field} must not be negative, got {value}")]
    NegativeWindow { field: &'static str, value: i64 },

    /// Result limit of zero
    #[error("limit must be greater than zero")]
    ZeroLimit,

    /// Target descriptor cannot be matched against
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}
