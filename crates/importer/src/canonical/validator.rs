use super::models::{CanonicalSeason, FORMAT_VERSION};
use super::transformer::{parse_age_group, parse_claim_status, parse_league, parse_ride_status};
use crate::{ImporterError, Result};
use scoring::models::{AgeGroup, DecoratedName};
use scoring::services::points_table::MAX_POSITION;
use scoring::services::vets_handicap::{MAX_VETS_BUCKET, MIN_VETS_BUCKET};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

pub struct CanonicalValidator;

impl CanonicalValidator {
    pub fn validate(canonical: &CanonicalSeason) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if canonical.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                canonical.format_version, FORMAT_VERSION
            ));
        }

        if !(1900..=2200).contains(&canonical.season) {
            report
                .errors
                .push(format!("Season {} is out of range", canonical.season));
        }

        if canonical.calendar.is_empty() {
            report
                .errors
                .push("At least one calendar event is required".to_string());
        }

        let mut event_counts: BTreeMap<u32, usize> = BTreeMap::new();
        for event in &canonical.calendar {
            *event_counts.entry(event.event_number).or_default() += 1;

            if event.event_name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Event {} has an empty name", event.event_number));
            }
            if event.miles <= rust_decimal::Decimal::ZERO {
                report.errors.push(format!(
                    "Event {} has invalid distance: {}. Miles must be > 0",
                    event.event_number, event.miles
                ));
            }
            if event.event_date.format("%Y").to_string() != canonical.season.to_string() {
                report.warnings.push(format!(
                    "Event {} is dated {}, outside season {}",
                    event.event_number, event.event_date, canonical.season
                ));
            }
        }
        for (event_number, count) in &event_counts {
            if *count > 1 {
                report.errors.push(format!(
                    "Duplicate event number: {} (count={})",
                    event_number, count
                ));
            }
        }

        if !canonical.calendar.iter().any(|e| e.is_club_championship && !e.is_cancelled) {
            report
                .warnings
                .push("Calendar has no championship events".to_string());
        }

        let mut club_numbers = HashSet::new();
        for competitor in &canonical.competitors {
            let label = format!(
                "{} {} (club number {})",
                competitor.given_name, competitor.surname, competitor.club_number
            );
            club_numbers.insert(competitor.club_number);

            if competitor.surname.trim().is_empty() {
                report
                    .errors
                    .push(format!("Competitor with club number {} has empty surname", competitor.club_number));
            }
            if parse_claim_status(&competitor.claim_status).is_none() {
                report.errors.push(format!(
                    "Competitor '{}' has invalid claim status: '{}'",
                    label, competitor.claim_status
                ));
            }
            match parse_age_group(&competitor.age_group) {
                None => report.errors.push(format!(
                    "Competitor '{}' has invalid age group: '{}'",
                    label, competitor.age_group
                )),
                Some(AgeGroup::Veteran) if competitor.vets_bucket.is_none() => report
                    .warnings
                    .push(format!("Veteran '{}' has no vets bucket", label)),
                _ => {}
            }
            if let Some(bucket) = competitor.vets_bucket {
                if !(MIN_VETS_BUCKET..=MAX_VETS_BUCKET).contains(&bucket) {
                    report.errors.push(format!(
                        "Competitor '{}' has vets bucket {}. Must be {}-{}",
                        label, bucket, MIN_VETS_BUCKET, MAX_VETS_BUCKET
                    ));
                }
            }
            if parse_league(competitor.league.as_deref()).is_none() {
                report.errors.push(format!(
                    "Competitor '{}' has invalid league: '{}'",
                    label,
                    competitor.league.as_deref().unwrap_or_default()
                ));
            }
        }

        let mut rides_per_event: HashMap<u32, usize> = HashMap::new();
        for ride in &canonical.rides {
            let label = format!("{} (event {})", ride.name, ride.event_number);
            *rides_per_event.entry(ride.event_number).or_default() += 1;

            if !event_counts.contains_key(&ride.event_number) {
                report
                    .errors
                    .push(format!("Ride '{}' references unknown event", label));
            }
            if ride.name.trim().is_empty() {
                report.errors.push(format!(
                    "Ride in event {} has empty name",
                    ride.event_number
                ));
            }
            if ride.total_seconds.is_sign_negative() {
                report
                    .errors
                    .push(format!("Ride '{}' has negative total time", label));
            }
            match parse_ride_status(&ride.status) {
                None => report.errors.push(format!(
                    "Ride '{}' has invalid status: '{}'",
                    label, ride.status
                )),
                Some(scoring::models::RideStatus::Valid) if ride.total_seconds.is_zero() => report
                    .warnings
                    .push(format!("Valid ride '{}' has a zero total time", label)),
                _ => {}
            }
            if let Some(club_number) = ride.club_number {
                if !club_numbers.contains(&club_number) {
                    report.warnings.push(format!(
                        "Ride '{}' has club number {} with no competitor snapshot",
                        label, club_number
                    ));
                }
            }
        }

        for event in canonical.calendar.iter().filter(|e| !e.is_cancelled) {
            if !rides_per_event.contains_key(&event.event_number) {
                report
                    .warnings
                    .push(format!("Event {} has no rides", event.event_number));
            }
        }

        let mut rider_names = HashSet::new();
        for rider in &canonical.round_robin_riders {
            if rider.name.trim().is_empty() || rider.round_robin_club.trim().is_empty() {
                report
                    .errors
                    .push("Round robin rider name and club are required".to_string());
                continue;
            }
            let decorated = DecoratedName::new(&rider.name, &rider.round_robin_club);
            if !rider_names.insert(decorated.key().to_string()) {
                report
                    .warnings
                    .push(format!("Duplicate round robin rider: '{}'", decorated));
            }
        }

        if let Some(allocations) = &canonical.points_allocations {
            for allocation in allocations {
                if allocation.position < 1 || allocation.position > MAX_POSITION {
                    report.errors.push(format!(
                        "Points allocation has invalid position {}. Must be 1-{}",
                        allocation.position, MAX_POSITION
                    ));
                }
                if allocation.points.is_sign_negative() {
                    report.errors.push(format!(
                        "Points allocation for position {}: negative points",
                        allocation.position
                    ));
                }
            }
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(rides: &str) -> CanonicalSeason {
        let json = format!(
            r#"{{
                "format_version": "1.0.0",
                "season": 2025,
                "calendar": [
                    {{ "event_number": 1, "event_name": "Evening 10", "event_date": "2025-05-01",
                       "miles": "10", "is_evening10": true, "is_club_championship": true }},
                    {{ "event_number": 2, "event_name": "Hilly 25", "event_date": "2025-06-01",
                       "miles": "25", "is_club_championship": true }}
                ],
                "competitors": [
                    {{ "club_number": 1, "surname": "Smith", "given_name": "Sam", "claim_status": "first_claim",
                       "is_female": false, "age_group": "veteran", "created_utc": "2025-01-01T00:00:00Z" }}
                ],
                "rides": {}
            }}"#,
            rides
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_valid_season_reports_warnings_only() {
        let canonical = season(
            r#"[ { "event_number": 1, "club_number": 1, "name": "Sam Smith", "total_seconds": "1400", "status": "VALID" } ]"#,
        );
        let report = CanonicalValidator::validate(&canonical).unwrap();
        assert!(report.errors.is_empty());
        assert!(report.warnings.iter().any(|w| w.contains("no vets bucket")));
        assert!(report.warnings.iter().any(|w| w == "Event 2 has no rides"));
    }

    #[test]
    fn test_errors_are_combined() {
        let mut canonical = season(
            r#"[ { "event_number": 9, "club_number": 1, "name": "Sam Smith", "total_seconds": "-1", "status": "FINISHED" } ]"#,
        );
        canonical.format_version = "0.9.0".to_string();

        let err = CanonicalValidator::validate(&canonical).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Validation failed with 4 error(s)"));
        assert!(message.contains("Unsupported format version: 0.9.0"));
        assert!(message.contains("references unknown event"));
        assert!(message.contains("negative total time"));
        assert!(message.contains("invalid status: 'FINISHED'"));
    }

    #[test]
    fn test_duplicate_event_numbers() {
        let mut canonical = season("[]");
        let duplicate = canonical.calendar[0].clone();
        canonical.calendar.push(duplicate);

        let err = CanonicalValidator::validate(&canonical).unwrap_err();
        assert!(err.to_string().contains("Duplicate event number: 1 (count=2)"));
    }
}
