//! Selection plus estimation in one call

use crate::estimate::{Estimate, Estimator};
use comparable_selector::{select, CandidateSet, SelectCriteria, SelectError};
use listing::VehicleDescriptor;

/// Comparables chosen for a target and the estimate built from them
#[derive(Debug, Clone)]
pub struct Appraisal {
    /// Ordered comparables, priced or not
    pub comparables: CandidateSet,
    pub estimate: Estimate,
}

impl Appraisal {
    /// Comparables returned, including unpriced ones
    pub fn found(&self) -> usize {
        self.comparables.len()
    }
}

/// Select comparables for `target` from `pool` and estimate its price.
///
/// The motor filter doubles as the weighting hint; without one the target's
/// own motor text is used.
pub fn appraise<'a, I>(
    target: &VehicleDescriptor,
    pool: I,
    criteria: &SelectCriteria,
    estimator: &Estimator,
) -> Result<Appraisal, SelectError>
where
    I: IntoIterator<Item = &'a VehicleDescriptor>,
{
    let comparables = select(target, pool, criteria)?;

    let motor_hint = criteria
        .motor
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .or(target.motor.as_deref())
        .unwrap_or_default();

    let estimate = estimator.estimate(comparables.records(), target.year, target.mileage, motor_hint);

    Ok(Appraisal {
        comparables,
        estimate,
    })
}
