//! Selector configuration

use serde::{Deserialize, Serialize};

/// How the brand text of a candidate is compared to the target's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandMatch {
    /// Candidate brand contains the target brand ("skoda auto" ~ "skoda")
    #[default]
    Contains,
    /// Folded brands must be equal
    Exact,
}

/// Deployment defaults for selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Model years either side of the target
    pub year_window: i64,

    /// Kilometers either side of the target mileage
    pub mileage_window: i64,

    /// Maximum comparables returned
    pub limit: usize,

    pub brand_match: BrandMatch,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            year_window: 1,
            mileage_window: 20_000,
            limit: 120,
            brand_match: BrandMatch::Contains,
        }
    }
}

impl SelectorConfig {
    /// Wide windows for sparse markets
    pub fn lenient() -> Self {
        Self {
            year_window: 3,
            mileage_window: 60_000,
            ..Default::default()
        }
    }
}

/// Per-call selection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectCriteria {
    pub year_window: i64,
    pub mileage_window: i64,
    /// Free-text fuel filter; blank means no filter
    pub fuel: Option<String>,
    /// Free-text motor filter; blank means no filter
    pub motor: Option<String>,
    pub limit: usize,
    pub brand_match: BrandMatch,
}

impl SelectCriteria {
    pub fn new(year_window: i64, mileage_window: i64, limit: usize) -> Self {
        Self {
            year_window,
            mileage_window,
            fuel: None,
            motor: None,
            limit,
            brand_match: BrandMatch::Contains,
        }
    }

    /// Criteria seeded from deployment defaults
    pub fn from_config(config: &SelectorConfig) -> Self {
        Self {
            brand_match: config.brand_match,
            ..Self::new(config.year_window, config.mileage_window, config.limit)
        }
    }

    pub fn with_fuel(mut self, fuel: impl Into<String>) -> Self {
        self.fuel = Some(fuel.into());
        self
    }

    pub fn with_motor(mut self, motor: impl Into<String>) -> Self {
        self.motor = Some(motor.into());
        self
    }

    pub fn with_brand_match(mut self, brand_match: BrandMatch) -> Self {
        self.brand_match = brand_match;
        self
    }
}

impl Default for SelectCriteria {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SelectorConfig::default();
        assert_eq!(config.year_window, 1);
        assert_eq!(config.mileage_window, 20_000);
        assert_eq!(config.limit, 120);
        assert_eq!(config.brand_match, BrandMatch::Contains);
    }

    #[test]
    fn test_criteria_from_lenient_config() {
        let criteria = SelectCriteria::from_config(&SelectorConfig::lenient())
            .with_brand_match(BrandMatch::Exact)
            .with_fuel("nafta");
        assert_eq!(criteria.year_window, 3);
        assert_eq!(criteria.mileage_window, 60_000);
        assert_eq!(criteria.brand_match, BrandMatch::Exact);
        assert_eq!(criteria.fuel.as_deref(), Some("nafta"));
    }
}
