//! Price Estimation Engine
//!
//! Turns a set of comparable listings into a robust price estimate: median
//! with a low/high band, plus mean, min and max.

mod appraisal;
mod config;
mod error;
mod estimate;
mod percentile;
mod weight;

pub use appraisal::{appraise, Appraisal};
pub use config::{EstimatorConfig, EstimatorStrategy, WeightConfig};
pub use error::EstimateError;
pub use estimate::{Estimate, Estimator, PriceEstimate};
pub use percentile::{percentile, weighted_percentile};
pub use weight::relevance_weight;
