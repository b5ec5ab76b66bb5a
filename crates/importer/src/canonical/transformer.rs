use super::models::*;
use crate::pipeline::SeasonInput;
use crate::{ImporterError, Result};
use scoring::models::{
    AgeGroup, CalendarEvent, ClaimStatus, CompetitorSnapshot, League, Ride, RideStatus, RoundRobinRider,
};
use scoring::services::points_table::{PointsAllocation, PointsTable};
use scoring::ScoringOptions;
use tracing::info;

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

pub(crate) fn parse_claim_status(value: &str) -> Option<ClaimStatus> {
    match normalize(value).as_str() {
        "" | "unknown" => Some(ClaimStatus::Unknown),
        "first" | "firstclaim" => Some(ClaimStatus::FirstClaim),
        "second" | "secondclaim" => Some(ClaimStatus::SecondClaim),
        "honorary" => Some(ClaimStatus::Honorary),
        _ => None,
    }
}

pub(crate) fn parse_age_group(value: &str) -> Option<AgeGroup> {
    match normalize(value).as_str() {
        "" | "undefined" => Some(AgeGroup::Undefined),
        "juvenile" => Some(AgeGroup::Juvenile),
        "junior" => Some(AgeGroup::Junior),
        "senior" => Some(AgeGroup::Senior),
        "vet" | "veteran" => Some(AgeGroup::Veteran),
        _ => None,
    }
}

pub(crate) fn parse_ride_status(value: &str) -> Option<RideStatus> {
    match normalize(value).as_str() {
        "undefined" => Some(RideStatus::Undefined),
        "valid" => Some(RideStatus::Valid),
        "dns" => Some(RideStatus::Dns),
        "dnf" => Some(RideStatus::Dnf),
        "dq" => Some(RideStatus::Dq),
        _ => None,
    }
}

pub(crate) fn parse_league(value: Option<&str>) -> Option<League> {
    match value {
        Some(value) => value.parse().ok(),
        None => Some(League::Undefined),
    }
}

/// Converts a validated canonical season into engine inputs.
pub struct CanonicalTransformer<'a> {
    base_options: &'a ScoringOptions,
}

impl<'a> CanonicalTransformer<'a> {
    pub fn new(base_options: &'a ScoringOptions) -> Self {
        Self { base_options }
    }

    pub fn transform(&self, canonical: CanonicalSeason) -> Result<SeasonInput> {
        let calendar: Vec<CalendarEvent> = canonical.calendar.into_iter().map(Self::calendar_event).collect();

        let competitors = canonical
            .competitors
            .into_iter()
            .map(Self::competitor)
            .collect::<Result<Vec<_>>>()?;

        let rides = canonical
            .rides
            .into_iter()
            .map(Self::ride)
            .collect::<Result<Vec<_>>>()?;

        let round_robin_riders = canonical
            .round_robin_riders
            .into_iter()
            .map(|r| RoundRobinRider {
                name: r.name.trim().to_string(),
                round_robin_club: r.round_robin_club.trim().to_string(),
                is_female: r.is_female,
            })
            .collect();

        let mut options = self.base_options.clone();
        if let Some(allocations) = canonical.points_allocations {
            let allocations: Vec<PointsAllocation> = allocations
                .into_iter()
                .map(|a| PointsAllocation {
                    position: a.position,
                    points: a.points,
                })
                .collect();
            options.points_table = PointsTable::from_allocations(&allocations)?;
            info!("Using custom points table ({} positions)", allocations.len());
        }
        if let Some(overrides) = canonical.eligibility_overrides {
            options.eligibility_overrides.extend(overrides);
        }

        info!(
            "Transformed season {}: {} events, {} snapshots, {} rides",
            canonical.season,
            calendar.len(),
            competitors.len(),
            rides.len()
        );

        Ok(SeasonInput {
            season: canonical.season,
            calendar,
            competitors,
            rides,
            round_robin_riders,
            options,
        })
    }

    fn calendar_event(event: CalendarEventData) -> CalendarEvent {
        CalendarEvent {
            event_number: event.event_number,
            event_name: event.event_name,
            event_date: event.event_date,
            miles: event.miles,
            is_evening10: event.is_evening10,
            is_club_championship: event.is_club_championship,
            is_round_robin_event: event.is_round_robin_event,
            is_cancelled: event.is_cancelled,
            is_hard_ride_series: event.is_hard_ride_series,
            is_non_standard_10: event.is_non_standard_10,
            round_robin_club: event.round_robin_club.filter(|c| !c.trim().is_empty()),
        }
    }

    fn competitor(data: CompetitorData) -> Result<CompetitorSnapshot> {
        let claim_status = parse_claim_status(&data.claim_status).ok_or_else(|| {
            ImporterError::TransformationError(format!(
                "Club number {}: unknown claim status '{}'",
                data.club_number, data.claim_status
            ))
        })?;
        let age_group = parse_age_group(&data.age_group).ok_or_else(|| {
            ImporterError::TransformationError(format!(
                "Club number {}: unknown age group '{}'",
                data.club_number, data.age_group
            ))
        })?;
        let league = parse_league(data.league.as_deref()).ok_or_else(|| {
            ImporterError::TransformationError(format!(
                "Club number {}: unknown league '{}'",
                data.club_number,
                data.league.as_deref().unwrap_or_default()
            ))
        })?;

        Ok(CompetitorSnapshot {
            club_number: data.club_number,
            surname: data.surname.trim().to_string(),
            given_name: data.given_name.trim().to_string(),
            claim_status,
            is_female: data.is_female,
            age_group,
            vets_bucket: data.vets_bucket,
            league,
            created_utc: data.created_utc,
        })
    }

    fn ride(data: RideData) -> Result<Ride> {
        let status = parse_ride_status(&data.status).ok_or_else(|| {
            ImporterError::TransformationError(format!(
                "Ride '{}' in event {}: unknown status '{}'",
                data.name, data.event_number, data.status
            ))
        })?;

        Ok(Ride {
            event_number: data.event_number,
            club_number: data.club_number,
            name: data.name.trim().to_string(),
            round_robin_club: data.round_robin_club.filter(|c| !c.trim().is_empty()),
            total_seconds: data.total_seconds,
            is_road_bike: data.is_road_bike,
            status,
            scores: Default::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_textual_fields() {
        assert_eq!(parse_claim_status("First Claim"), Some(ClaimStatus::FirstClaim));
        assert_eq!(parse_claim_status("second_claim"), Some(ClaimStatus::SecondClaim));
        assert_eq!(parse_claim_status("lapsed"), None);
        assert_eq!(parse_age_group("Vet"), Some(AgeGroup::Veteran));
        assert_eq!(parse_ride_status("DNF"), Some(RideStatus::Dnf));
        assert_eq!(parse_ride_status(""), None);
        assert_eq!(parse_league(Some("Prem")), Some(League::Premier));
        assert_eq!(parse_league(None), Some(League::Undefined));
        assert_eq!(parse_league(Some("7")), None);
    }

    #[test]
    fn test_transform_applies_season_options() {
        let canonical: CanonicalSeason = serde_json::from_str(
            r#"{
                "format_version": "1.0.0",
                "season": 2025,
                "calendar": [
                    { "event_number": 1, "event_name": "Evening 10", "event_date": "2025-05-01",
                      "miles": "10", "is_evening10": true, "is_club_championship": true }
                ],
                "competitors": [
                    { "club_number": 7, "surname": " Smith ", "given_name": "Sam", "claim_status": "second_claim",
                      "is_female": false, "age_group": "senior", "league": "2",
                      "created_utc": "2025-01-01T00:00:00Z" }
                ],
                "rides": [
                    { "event_number": 1, "club_number": 7, "name": "Sam Smith",
                      "total_seconds": "1400", "status": "VALID" }
                ],
                "points_allocations": [ { "position": 1, "points": "10" } ],
                "eligibility_overrides": [7]
            }"#,
        )
        .unwrap();

        let options = ScoringOptions::default();
        let input = CanonicalTransformer::new(&options).transform(canonical).unwrap();

        assert_eq!(input.competitors[0].surname, "Smith");
        assert_eq!(input.competitors[0].league, League::League2);
        assert_eq!(input.rides[0].status, RideStatus::Valid);
        assert_eq!(input.options.eligibility_overrides, vec![7]);
        assert_eq!(input.options.points_table.points_for_position(1).to_string(), "10");
        assert_eq!(input.options.points_table.points_for_position(2).to_string(), "0");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let data = RideData {
            event_number: 1,
            club_number: None,
            name: "Alex Jones".to_string(),
            round_robin_club: None,
            total_seconds: rust_decimal::Decimal::from(1500),
            is_road_bike: false,
            status: "finished".to_string(),
        };
        assert!(matches!(
            CanonicalTransformer::ride(data),
            Err(ImporterError::TransformationError(_))
        ));
    }
}
