//! Vehicle Descriptor

use serde::{Deserialize, Serialize};
use text_normalizer::NormalizedKey;

/// A vehicle: either the query subject or a candidate listing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleDescriptor {
    pub brand: String,
    pub model: String,
    /// Model year
    pub year: i32,
    /// Odometer reading (km)
    pub mileage: u32,
    pub fuel: Option<String>,
    /// Engine code or displacement string ("2.0 TDI")
    pub motor: Option<String>,
    /// Asking price in CZK; optional on the query subject
    #[serde(rename = "price_czk")]
    pub price: Option<i64>,
    pub transmission: Option<String>,
    pub drive: Option<String>,
    /// Listing origin ("seed", "sauto", ...)
    pub source: Option<String>,
    pub url: Option<String>,
    pub scraped_at: Option<String>,
}

impl VehicleDescriptor {
    /// Create a descriptor with the matched fields only
    pub fn new(brand: impl Into<String>, model: impl Into<String>, year: i32, mileage: u32) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            year,
            mileage,
            ..Default::default()
        }
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_fuel(mut self, fuel: impl Into<String>) -> Self {
        self.fuel = Some(fuel.into());
        self
    }

    pub fn with_motor(mut self, motor: impl Into<String>) -> Self {
        self.motor = Some(motor.into());
        self
    }

    /// Normalized comparison key for this vehicle
    pub fn key(&self) -> NormalizedKey {
        NormalizedKey::new(
            &self.brand,
            &self.model,
            self.fuel.as_deref(),
            self.motor.as_deref(),
        )
    }

    /// Price usable for estimation (present and positive)
    pub fn usable_price(&self) -> Option<i64> {
        self.price.filter(|p| *p > 0)
    }
}
