//! Estimator configuration

use crate::error::EstimateError;
use serde::{Deserialize, Serialize};

/// Which statistic produces the price range.
///
/// One deployment runs exactly one strategy; outputs differ between them
/// for the same comparables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorStrategy {
    /// Percentiles over relevance-weighted prices
    WeightedPercentile,
    /// Plain percentiles (p25 / p50 / p75) over prices
    #[default]
    UnweightedPercentile,
    /// Median, with low/high at mean -/+ `band` (fraction of the mean)
    MeanBand { band: f64 },
}

impl EstimatorStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            EstimatorStrategy::WeightedPercentile => "weighted_percentile",
            EstimatorStrategy::UnweightedPercentile => "unweighted_percentile",
            EstimatorStrategy::MeanBand { .. } => "mean_band",
        }
    }
}

/// Relevance weighting constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Weight lost per model year of difference
    pub year_decay: f64,
    /// Mileage difference (km) that halves the weight
    pub mileage_scale_km: f64,
    /// Multiplier when the candidate's motor matches the hint
    pub motor_bonus: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            year_decay: 0.1,
            mileage_scale_km: 50_000.0,
            motor_bonus: 1.15,
        }
    }
}

/// Estimator settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub strategy: EstimatorStrategy,
    pub weights: WeightConfig,
}

impl EstimatorConfig {
    pub fn with_strategy(strategy: EstimatorStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Reject settings that would produce non-positive or NaN weights
    pub fn validate(&self) -> Result<(), EstimateError> {
        let w = &self.weights;
        if !(w.year_decay.is_finite() && w.year_decay >= 0.0) {
            return Err(EstimateError::InvalidWeight {
                field: "year_decay",
                value: w.year_decay,
            });
        }
        if !(w.mileage_scale_km.is_finite() && w.mileage_scale_km > 0.0) {
            return Err(EstimateError::InvalidWeight {
                field: "mileage_scale_km",
                value: w.mileage_scale_km,
            });
        }
        if !(w.motor_bonus.is_finite() && w.motor_bonus > 0.0) {
            return Err(EstimateError::InvalidWeight {
                field: "motor_bonus",
                value: w.motor_bonus,
            });
        }
        if let EstimatorStrategy::MeanBand { band } = self.strategy {
            if !(0.0..1.0).contains(&band) {
                return Err(EstimateError::InvalidBand(band));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EstimatorConfig::default();
        assert_eq!(config.strategy, EstimatorStrategy::UnweightedPercentile);
        assert_eq!(config.weights.year_decay, 0.1);
        assert_eq!(config.weights.mileage_scale_km, 50_000.0);
        assert_eq!(config.weights.motor_bonus, 1.15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = EstimatorConfig::default();
        config.weights.mileage_scale_km = 0.0;
        assert!(matches!(
            config.validate(),
            Err(EstimateError::InvalidWeight { field: "mileage_scale_km", .. })
        ));

        let config = EstimatorConfig::with_strategy(EstimatorStrategy::MeanBand { band: 1.5 });
        assert_eq!(config.validate(), Err(EstimateError::InvalidBand(1.5)));

        let mut config = EstimatorConfig::default();
        config.weights.year_decay = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(EstimatorStrategy::WeightedPercentile.name(), "weighted_percentile");
        assert_eq!(EstimatorStrategy::MeanBand { band: 0.1 }.name(), "mean_band");
    }
}
