//! Price Estimate Computation

use crate::config::{EstimatorConfig, EstimatorStrategy};
use crate::error::EstimateError;
use crate::percentile::{percentile, weighted_percentile};
use crate::weight::relevance_weight;
use listing::VehicleDescriptor;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Robust price estimate in CZK, rounded to whole crowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub median: i64,
    pub low: i64,
    pub high: i64,
    pub mean: i64,
    pub min: i64,
    pub max: i64,
    /// Priced comparables used (always > 0)
    pub sample_count: usize,
    /// Strategy that produced `low` / `median` / `high`
    pub strategy: String,
}

/// Outcome of an estimation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate {
    Priced(PriceEstimate),
    /// No comparable carried a usable price
    NoData,
}

impl Estimate {
    pub fn sample_count(&self) -> usize {
        match self {
            Estimate::Priced(p) => p.sample_count,
            Estimate::NoData => 0,
        }
    }

    pub fn price(&self) -> Option<&PriceEstimate> {
        match self {
            Estimate::Priced(p) => Some(p),
            Estimate::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Estimate::NoData)
    }
}

/// Price estimator bound to one validated configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct Estimator {
    config: EstimatorConfig,
}

impl Estimator {
    /// Create an estimator, rejecting invalid weighting settings
    pub fn new(config: EstimatorConfig) -> Result<Self, EstimateError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate a price from comparables.
    ///
    /// Candidates without a positive price are dropped first; if none remain
    /// the result is [`Estimate::NoData`].
    pub fn estimate<'a, I>(
        &self,
        candidates: I,
        target_year: i32,
        target_mileage: u32,
        motor_hint: &str,
    ) -> Estimate
    where
        I: IntoIterator<Item = &'a VehicleDescriptor>,
    {
        let weights = &self.config.weights;
        let mut priced: Vec<(f64, f64)> = candidates
            .into_iter()
            .filter_map(|c| {
                c.usable_price().map(|price| {
                    let w = relevance_weight(c, target_year, target_mileage, motor_hint, weights);
                    (price as f64, w)
                })
            })
            .collect();

        if priced.is_empty() {
            debug!("No priced comparables for {} / {} km", target_year, target_mileage);
            return Estimate::NoData;
        }

        priced.sort_by(|a, b| a.0.total_cmp(&b.0));
        let prices: Vec<f64> = priced.iter().map(|(p, _)| *p).collect();

        let n = prices.len();
        let mean = prices.iter().sum::<f64>() / n as f64;
        let min = prices[0];
        let max = prices[n - 1];

        let (low, median, high) = match self.config.strategy {
            EstimatorStrategy::WeightedPercentile => (
                weighted_percentile(&priced, 0.25),
                weighted_percentile(&priced, 0.5),
                weighted_percentile(&priced, 0.75),
            ),
            EstimatorStrategy::UnweightedPercentile => (
                percentile(&prices, 0.25),
                percentile(&prices, 0.5),
                percentile(&prices, 0.75),
            ),
            // Band and central value are both the mean, so low <= median <= high
            EstimatorStrategy::MeanBand { band } => (
                Some(mean * (1.0 - band)),
                Some(mean),
                Some(mean * (1.0 + band)),
            ),
        };

        // Non-empty input always yields percentiles
        let (Some(low), Some(median), Some(high)) = (low, median, high) else {
            return Estimate::NoData;
        };

        debug!(
            "Estimated median {:.0} [{:.0}, {:.0}] from {} comparables ({})",
            median,
            low,
            high,
            n,
            self.config.strategy.name()
        );

        Estimate::Priced(PriceEstimate {
            median: round_czk(median),
            low: round_czk(low),
            high: round_czk(high),
            mean: round_czk(mean),
            min: round_czk(min),
            max: round_czk(max),
            sample_count: n,
            strategy: self.config.strategy.name().to_string(),
        })
    }
}

/// Nearest whole crown, halves away from zero
fn round_czk(value: f64) -> i64 {
    value.round() as i64
}
