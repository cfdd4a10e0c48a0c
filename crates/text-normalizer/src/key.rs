//! Normalized Comparison Key

use crate::fold::{fold, fold_compact, model_base};
use crate::fuel::{classify_fuel, FuelClass};
use serde::{Deserialize, Serialize};

/// Canonical keys derived from a vehicle's text fields.
///
/// Never stored on its own; always recomputed from the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizedKey {
    pub brand_fold: String,
    pub model_fold: String,
    /// Model with trim/body suffixes removed
    pub model_base_fold: String,
    pub fuel_class: FuelClass,
    /// Motor text, alphanumerics only
    pub motor_fold: String,
}

impl NormalizedKey {
    /// Build the key from raw text fields
    pub fn new(brand: &str, model: &str, fuel: Option<&str>, motor: Option<&str>) -> Self {
        Self {
            brand_fold: fold(brand),
            model_fold: fold(model),
            model_base_fold: model_base(model),
            fuel_class: classify_fuel(fuel.unwrap_or_default()),
            motor_fold: fold_compact(motor.unwrap_or_default()),
        }
    }

    /// Re-derive the key from its own fields
    pub fn renormalize(&self) -> Self {
        Self {
            brand_fold: fold(&self.brand_fold),
            model_fold: fold(&self.model_fold),
            model_base_fold: model_base(&self.model_base_fold),
            fuel_class: classify_fuel(self.fuel_class.as_str()),
            motor_fold: fold_compact(&self.motor_fold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_listing_text() {
        let key = NormalizedKey::new("Škoda", "Octavia Combi", Some("Nafta"), Some("2.0 TDI"));
        assert_eq!(key.brand_fold, "skoda");
        assert_eq!(key.model_fold, "octavia combi");
        assert_eq!(key.model_base_fold, "octavia");
        assert_eq!(key.fuel_class, FuelClass::Diesel);
        assert_eq!(key.motor_fold, "20tdi");
    }

    #[test]
    fn test_key_missing_optional_fields() {
        let key = NormalizedKey::new("Ford", "Focus", None, None);
        assert_eq!(key.fuel_class, FuelClass::Unknown);
        assert!(key.motor_fold.is_empty());
    }

    #[test]
    fn test_key_is_idempotent() {
        let key = NormalizedKey::new(" VOLKSWAGEN ", "Golf Variant", Some("Benzín"), Some("1,5 TSI"));
        assert_eq!(key.renormalize(), key);
    }
}
