//! Estimator Error Types

use thiserror::Error;

/// Invalid estimator configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// Weighting constant outside its valid range
    #[error("Invalid weight setting {field}: {value}")]
    InvalidWeight { field: &'static str, value: f64 },

    /// Mean band fraction outside [0, 1)
    #[error("Mean band must be within [0, 1), got {0}")]
    InvalidBand(f64),
}
