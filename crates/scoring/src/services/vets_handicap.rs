use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{Result, ScoringError};

pub const MIN_VETS_BUCKET: u8 = 1;
pub const MAX_VETS_BUCKET: u8 = 40;

/// Outcome of applying an age standard to a raw finish time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandicapAdjustment {
    pub handicap_seconds: Decimal,
    pub adjusted_total_seconds: Decimal,
}

/// Looks up age allowances for veterans.
pub trait VetsHandicapProvider {
    fn handicap_seconds(&self, distance_miles: Decimal, is_female: bool, vets_bucket: u8) -> Result<Decimal>;

    fn adjusted_time(
        &self,
        raw_seconds: Decimal,
        distance_miles: Decimal,
        is_female: bool,
        vets_bucket: u8,
    ) -> Result<HandicapAdjustment> {
        let handicap_seconds = self.handicap_seconds(distance_miles, is_female, vets_bucket)?;
        Ok(HandicapAdjustment {
            handicap_seconds,
            adjusted_total_seconds: raw_seconds - handicap_seconds,
        })
    }
}

type BucketTable = BTreeMap<u8, Decimal>;

/// Age standards for one standards year: distance and gender to a per-bucket
/// allowance in seconds. The allowance is subtracted from the raw time as is.
#[derive(Debug, Clone, Default)]
pub struct VetsStandards {
    year: i32,
    male: BTreeMap<Decimal, BucketTable>,
    female: BTreeMap<Decimal, BucketTable>,
}

impl VetsStandards {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn insert(&mut self, distance_miles: Decimal, is_female: bool, vets_bucket: u8, seconds: Decimal) {
        let table = if is_female { &mut self.female } else { &mut self.male };
        table
            .entry(distance_miles.normalize())
            .or_default()
            .insert(vets_bucket, seconds);
    }

    pub fn supported_distances(&self, is_female: bool) -> Vec<Decimal> {
        let table = if is_female { &self.female } else { &self.male };
        table.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.male.is_empty() && self.female.is_empty()
    }
}

impl VetsHandicapProvider for VetsStandards {
    fn handicap_seconds(&self, distance_miles: Decimal, is_female: bool, vets_bucket: u8) -> Result<Decimal> {
        if !(MIN_VETS_BUCKET..=MAX_VETS_BUCKET).contains(&vets_bucket) {
            return Err(ScoringError::VetsBucketOutOfRange(vets_bucket));
        }

        let table = if is_female { &self.female } else { &self.male };
        let distance = distance_miles.normalize();

        let buckets = table.get(&distance).ok_or_else(|| ScoringError::UnsupportedDistance {
            distance,
            supported: self
                .supported_distances(is_female)
                .iter()
                .map(Decimal::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })?;

        buckets
            .get(&vets_bucket)
            .copied()
            .ok_or(ScoringError::NoStandardForBucket {
                bucket: vets_bucket,
                distance,
            })
    }
}

/// Picks the latest available standards year not after the season.
pub fn effective_standards_year(season: i32, available: impl IntoIterator<Item = i32>) -> Result<i32> {
    available
        .into_iter()
        .filter(|year| *year <= season)
        .max()
        .ok_or(ScoringError::NoStandardsForSeason(season))
}

/// Every loaded standards year, resolved per season with year fallback.
#[derive(Debug, Clone, Default)]
pub struct StandardsCatalog {
    by_year: BTreeMap<i32, VetsStandards>,
}

impl StandardsCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, standards: VetsStandards) {
        self.by_year.insert(standards.year(), standards);
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    pub fn for_season(&self, season: i32) -> Result<&VetsStandards> {
        let year = effective_standards_year(season, self.years())?;
        self.by_year
            .get(&year)
            .ok_or(ScoringError::NoStandardsForSeason(season))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standards() -> VetsStandards {
        let mut s = VetsStandards::new(2025);
        s.insert(Decimal::from(10), false, 1, Decimal::from(36));
        s.insert(Decimal::from(10), false, 5, Decimal::from(59));
        s.insert(Decimal::from(10), false, 10, Decimal::from(96));
        s.insert(Decimal::from(25), false, 1, Decimal::from(94));
        s.insert(Decimal::new(95, 1), false, 1, Decimal::from(35));
        s.insert(Decimal::from(10), true, 1, Decimal::from(167));
        s
    }

    #[test]
    fn test_handicap_lookup_by_distance_gender_and_bucket() {
        let s = standards();
        assert_eq!(s.handicap_seconds(Decimal::from(10), false, 1).unwrap(), Decimal::from(36));
        assert_eq!(s.handicap_seconds(Decimal::from(10), false, 10).unwrap(), Decimal::from(96));
        assert_eq!(s.handicap_seconds(Decimal::from(25), false, 1).unwrap(), Decimal::from(94));
        assert_eq!(s.handicap_seconds(Decimal::from(10), true, 1).unwrap(), Decimal::from(167));
        assert_eq!(s.handicap_seconds(Decimal::new(95, 1), false, 1).unwrap(), Decimal::from(35));
    }

    #[test]
    fn test_distance_scale_is_ignored() {
        let s = standards();
        assert_eq!(s.handicap_seconds(Decimal::new(100, 1), false, 5).unwrap(), Decimal::from(59));
    }

    #[test]
    fn test_adjusted_time_subtracts_handicap() {
        let s = standards();
        let adjustment = s.adjusted_time(Decimal::from(1500), Decimal::from(10), false, 5).unwrap();
        assert_eq!(adjustment.handicap_seconds, Decimal::from(59));
        assert_eq!(adjustment.adjusted_total_seconds, Decimal::from(1441));
    }

    #[test]
    fn test_bucket_out_of_range() {
        let s = standards();
        let err = s.handicap_seconds(Decimal::from(10), false, 41).unwrap_err();
        assert_eq!(err.to_string(), "vetsBucket must be between 1 and 40 (inclusive), got 41");
        assert!(s.handicap_seconds(Decimal::from(10), false, 0).is_err());
    }

    #[test]
    fn test_unsupported_distance_lists_supported() {
        let s = standards();
        let err = s.handicap_seconds(Decimal::from(50), false, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported distance 50. Supported distances: 9.5, 10, 25."
        );
    }

    #[test]
    fn test_missing_bucket() {
        let s = standards();
        let err = s.handicap_seconds(Decimal::from(25), false, 7).unwrap_err();
        assert_eq!(err.to_string(), "No standard found for bucket 7 at distance 25.");
    }

    #[test]
    fn test_effective_year_falls_back() {
        assert_eq!(effective_standards_year(2025, [2019, 2023, 2026]).unwrap(), 2023);
        assert_eq!(effective_standards_year(2023, [2019, 2023]).unwrap(), 2023);
        assert!(matches!(
            effective_standards_year(2018, [2019]),
            Err(ScoringError::NoStandardsForSeason(2018))
        ));
    }

    #[test]
    fn test_catalog_resolves_season() {
        let mut catalog = StandardsCatalog::new();
        catalog.add(VetsStandards::new(2020));
        catalog.add(standards());
        assert_eq!(catalog.for_season(2024).unwrap().year(), 2020);
        assert_eq!(catalog.for_season(2030).unwrap().year(), 2025);
    }
}
