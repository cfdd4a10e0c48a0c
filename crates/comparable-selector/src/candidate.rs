//! Candidate set produced by selection

use listing::VehicleDescriptor;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Closeness of a candidate to the target.
///
/// Field order is the sort order: mileage gap first, then year gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Distance {
    /// |candidate.mileage - target.mileage| in km
    pub mileage_km: u64,
    /// |candidate.year - target.year|
    pub years: u64,
}

impl Distance {
    pub fn between(target: &VehicleDescriptor, candidate: &VehicleDescriptor) -> Self {
        Self {
            mileage_km: (candidate.mileage as i64 - target.mileage as i64).unsigned_abs(),
            years: (candidate.year as i64 - target.year as i64).unsigned_abs(),
        }
    }
}

/// A matched listing with its distance to the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub record: VehicleDescriptor,
    pub distance: Distance,
}

impl Candidate {
    /// Total order: distance, then price ascending, unpriced last
    pub fn closeness_cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| match (self.record.price, other.record.price) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

/// Ordered, bounded sequence of comparables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    /// Candidates that passed matching before truncation to the limit
    matched: usize,
}

impl CandidateSet {
    /// Sort by closeness and keep the first `limit`
    pub(crate) fn ranked(mut candidates: Vec<Candidate>, limit: usize) -> Self {
        let matched = candidates.len();
        candidates.sort_by(Candidate::closeness_cmp);
        candidates.truncate(limit);
        Self { candidates, matched }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Listings in closeness order
    pub fn records(&self) -> impl Iterator<Item = &VehicleDescriptor> {
        self.candidates.iter().map(|c| &c.record)
    }

    /// Listings carrying a usable price
    pub fn priced_count(&self) -> usize {
        self.records().filter(|r| r.usable_price().is_some()).count()
    }

    pub fn into_records(self) -> Vec<VehicleDescriptor> {
        self.candidates.into_iter().map(|c| c.record).collect()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(mileage_km: u64, years: u64, price: Option<i64>) -> Candidate {
        let mut record = VehicleDescriptor::new("Škoda", "Octavia", 2020, 100_000);
        record.price = price;
        Candidate {
            record,
            distance: Distance { mileage_km, years },
        }
    }

    #[test]
    fn test_distance_between() {
        let target = VehicleDescriptor::new("Škoda", "Octavia", 2020, 130_000);
        let other = VehicleDescriptor::new("Škoda", "Octavia", 2018, 90_000);
        let d = Distance::between(&target, &other);
        assert_eq!(d.mileage_km, 40_000);
        assert_eq!(d.years, 2);
    }

    #[test]
    fn test_distance_at_extreme_years() {
        let target = VehicleDescriptor::new("Škoda", "Octavia", i32::MIN, 0);
        let other = VehicleDescriptor::new("Škoda", "Octavia", i32::MAX, u32::MAX);
        let d = Distance::between(&target, &other);
        assert_eq!(d.years, u32::MAX as u64);
        assert_eq!(d.mileage_km, u32::MAX as u64);
    }

    #[test]
    fn test_mileage_gap_sorts_before_year_gap() {
        let near_km = candidate(1_000, 3, Some(500));
        let near_year = candidate(2_000, 0, Some(100));
        assert_eq!(near_km.closeness_cmp(&near_year), Ordering::Less);
    }

    #[test]
    fn test_price_breaks_ties_and_unpriced_last() {
        let set = CandidateSet::ranked(
            vec![
                candidate(500, 1, None),
                candidate(500, 1, Some(300_000)),
                candidate(500, 1, Some(250_000)),
            ],
            10,
        );
        let prices: Vec<_> = set.records().map(|r| r.price).collect();
        assert_eq!(prices, vec![Some(250_000), Some(300_000), None]);
        assert_eq!(set.priced_count(), 2);
    }

    #[test]
    fn test_truncation_after_ordering() {
        let set = CandidateSet::ranked(
            vec![candidate(9_000, 0, Some(1)), candidate(10, 0, Some(2)), candidate(500, 0, Some(3))],
            2,
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.matched(), 3);
        assert_eq!(set.candidates()[0].distance.mileage_km, 10);
        assert_eq!(set.candidates()[1].distance.mileage_km, 500);
    }
}
