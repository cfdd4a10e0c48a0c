//! Relevance Weighting

use crate::config::WeightConfig;
use listing::VehicleDescriptor;
use text_normalizer::motor_matches;

/// Soft relevance of a comparable to the target.
///
/// `1 / (1 + year_decay * |dy|) * 1 / (1 + |dkm| / mileage_scale_km)`,
/// times `motor_bonus` when a non-blank motor hint matches the candidate.
pub fn relevance_weight(
    candidate: &VehicleDescriptor,
    target_year: i32,
    target_mileage: u32,
    motor_hint: &str,
    config: &WeightConfig,
) -> f64 {
    let dy = (candidate.year as f64 - target_year as f64).abs();
    let dkm = (candidate.mileage as f64 - target_mileage as f64).abs();

    let mut weight = 1.0 / (1.0 + config.year_decay * dy);
    weight *= 1.0 / (1.0 + dkm / config.mileage_scale_km);

    let motor = candidate.motor.as_deref().unwrap_or_default();
    if !motor_hint.trim().is_empty() && !motor.is_empty() && motor_matches(motor, motor_hint) {
        weight *= config.motor_bonus;
    }

    weight
}
