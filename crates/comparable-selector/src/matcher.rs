//! Matching predicate and selection

use crate::candidate::{Candidate, CandidateSet, Distance};
use crate::config::{BrandMatch, SelectCriteria};
use crate::error::SelectError;
use listing::VehicleDescriptor;
use text_normalizer::{classify_fuel, fold, motor_matches, FuelClass, NormalizedKey};
use tracing::debug;

/// Matching predicate with the target's keys folded once up front
#[derive(Debug, Clone)]
pub struct Matcher {
    target: VehicleDescriptor,
    brand: String,
    model: String,
    brand_match: BrandMatch,
    year_window: i64,
    mileage_window: i64,
    /// Folded fuel filter text and its class
    fuel: Option<(String, FuelClass)>,
    motor: Option<String>,
}

impl Matcher {
    /// Validate criteria and prepare the target keys
    pub fn new(target: &VehicleDescriptor, criteria: &SelectCriteria) -> Result<Self, SelectError> {
        if criteria.year_window < 0 {
            return Err(SelectError::NegativeWindow {
                field: "year_window",
                value: criteria.year_window,
            });
        }
        if criteria.mileage_window < 0 {
            return Err(SelectError::NegativeWindow {
                field: "mileage_window",
                value: criteria.mileage_window,
            });
        }
        if criteria.limit == 0 {
            return Err(SelectError::ZeroLimit);
        }

        let key = target.key();
        if key.brand_fold.is_empty() {
            return Err(SelectError::InvalidTarget("brand is empty".to_string()));
        }
        if key.model_fold.is_empty() {
            return Err(SelectError::InvalidTarget("model is empty".to_string()));
        }

        let fuel = criteria
            .fuel
            .as_deref()
            .map(fold)
            .filter(|f| !f.is_empty())
            .map(|f| {
                let class = classify_fuel(&f);
                (f, class)
            });

        let motor = criteria
            .motor
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string);

        Ok(Self {
            target: target.clone(),
            brand: key.brand_fold,
            model: key.model_fold,
            brand_match: criteria.brand_match,
            year_window: criteria.year_window,
            mileage_window: criteria.mileage_window,
            fuel,
            motor,
        })
    }

    /// True when the candidate passes every filter
    pub fn matches(&self, candidate: &VehicleDescriptor) -> bool {
        let key = candidate.key();

        self.brand_matches(&key)
            && self.model_matches(&key)
            && self.year_in_window(candidate.year)
            && self.mileage_in_window(candidate.mileage)
            && self.fuel_matches(candidate, &key)
            && self.motor_matches(candidate)
    }

    fn brand_matches(&self, key: &NormalizedKey) -> bool {
        match self.brand_match {
            BrandMatch::Contains => key.brand_fold.contains(&self.brand),
            BrandMatch::Exact => key.brand_fold == self.brand,
        }
    }

    fn model_matches(&self, key: &NormalizedKey) -> bool {
        key.model_fold.contains(&self.model) || key.model_base_fold.contains(&self.model)
    }

    fn year_in_window(&self, year: i32) -> bool {
        (year as i64 - self.target.year as i64).abs() <= self.year_window
    }

    fn mileage_in_window(&self, mileage: u32) -> bool {
        let target = self.target.mileage as i64;
        let low = target.saturating_sub(self.mileage_window).max(0);
        let high = target.saturating_add(self.mileage_window);
        (low..=high).contains(&(mileage as i64))
    }

    /// Class equality when both sides classify; otherwise substring fallback
    /// over the candidate's fuel and motor text.
    fn fuel_matches(&self, candidate: &VehicleDescriptor, key: &NormalizedKey) -> bool {
        let Some((filter_text, filter_class)) = &self.fuel else {
            return true;
        };

        let candidate_class = if key.fuel_class.is_known() {
            key.fuel_class
        } else {
            classify_fuel(candidate.motor.as_deref().unwrap_or_default())
        };

        if filter_class.is_known() && candidate_class.is_known() {
            return *filter_class == candidate_class;
        }

        let haystack = fold(&format!(
            "{} {}",
            candidate.fuel.as_deref().unwrap_or_default(),
            candidate.motor.as_deref().unwrap_or_default()
        ));
        haystack.contains(filter_text.as_str())
    }

    fn motor_matches(&self, candidate: &VehicleDescriptor) -> bool {
        match &self.motor {
            Some(filter) => motor_matches(candidate.motor.as_deref().unwrap_or_default(), filter),
            None => true,
        }
    }

    fn distance(&self, candidate: &VehicleDescriptor) -> Distance {
        Distance::between(&self.target, candidate)
    }
}

/// Select comparables for `target` from `pool`.
///
/// Every matching record is ranked before the result is cut to
/// `criteria.limit`. An empty pool gives an empty set.
pub fn select<'a, I>(
    target: &VehicleDescriptor,
    pool: I,
    criteria: &SelectCriteria,
) -> Result<CandidateSet, SelectError>
where
    I: IntoIterator<Item = &'a VehicleDescriptor>,
{
    let matcher = Matcher::new(target, criteria)?;

    let mut scanned = 0usize;
    let matched: Vec<Candidate> = pool
        .into_iter()
        .inspect(|_| scanned += 1)
        .filter(|c| matcher.matches(c))
        .map(|c| Candidate {
            record: c.clone(),
            distance: matcher.distance(c),
        })
        .collect();

    let set = CandidateSet::ranked(matched, criteria.limit);
    debug!(
        "Selected {} comparables ({} matched of {} scanned) for {} {} {}",
        set.len(),
        set.matched(),
        scanned,
        target.brand,
        target.model,
        target.year
    );

    Ok(set)
}
