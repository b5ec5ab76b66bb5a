use crate::Result;
use scoring::dto::{ProcessingSummary, SeasonStandings};
use scoring::models::{CalendarEvent, CompetitorSnapshot, Ride, RoundRobinRider};
use scoring::repository::{CalendarRepository, CompetitorRepository};
use scoring::services::rules::{CompetitionRules, CompetitionRulesProvider};
use scoring::services::vets_handicap::{StandardsCatalog, VetsStandards};
use scoring::{CompetitionResultsAggregator, RideProcessingCoordinator, ScoringOptions};
use serde::Serialize;
use tracing::{info, warn};

/// Engine inputs for one season.
#[derive(Debug, Clone)]
pub struct SeasonInput {
    pub season: i32,
    pub calendar: Vec<CalendarEvent>,
    pub competitors: Vec<CompetitorSnapshot>,
    pub rides: Vec<Ride>,
    pub round_robin_riders: Vec<RoundRobinRider>,
    pub options: ScoringOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonOutput {
    pub season: i32,
    pub standards_year: Option<i32>,
    pub rules: CompetitionRules,
    pub summary: ProcessingSummary,
    pub rides: Vec<Ride>,
    pub standings: SeasonStandings,
}

/// Scores every ride of the season, then builds all standings.
pub fn score_season(
    input: SeasonInput,
    rules: &CompetitionRulesProvider,
    standards: &StandardsCatalog,
) -> Result<SeasonOutput> {
    let SeasonInput {
        season,
        calendar,
        competitors,
        mut rides,
        round_robin_riders,
        options,
    } = input;

    let empty_standards = VetsStandards::new(season);
    let handicaps = if standards.years().next().is_none() {
        warn!("No VTTA standards loaded; veterans rides cannot be handicapped");
        &empty_standards
    } else {
        standards.for_season(season)?
    };
    let standards_year = (!handicaps.is_empty()).then(|| handicaps.year());
    if let Some(year) = standards_year {
        info!("Season {} uses VTTA standards from {}", season, year);
    }

    let calendar_repository = CalendarRepository::new(&calendar)?;
    let season_rules = rules.rules_for(
        season,
        calendar_repository.championship_events().len(),
        calendar_repository.round_robin_events().len(),
    )?;

    let competitor_repository = CompetitorRepository::new(&competitors);
    let coordinator = RideProcessingCoordinator::new(&options, handicaps);
    let summary = coordinator.process_all(&mut rides, &competitor_repository, &calendar, &round_robin_riders)?;

    let aggregator =
        CompetitionResultsAggregator::new(&competitor_repository, &calendar_repository, &options.home_club);
    let standings = aggregator.build_all(&rides, &season_rules);

    Ok(SeasonOutput {
        season,
        standards_year,
        rules: season_rules,
        summary,
        rides,
        standings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{CanonicalSeason, CanonicalTransformer, CanonicalValidator};
    use crate::standards::StandardsLoader;
    use rust_decimal::Decimal;

    const RULES: &str = r#"{ "seasons": [
        { "year": 2024, "tenMile": { "count": 2 }, "mixedDistance": { "count": 3, "nonTenMinimum": 1 } }
    ] }"#;

    const STANDARDS: &str = "Age,m10,m25,f10\n50,0:00:36,0:01:34,0:02:47\n";

    fn season() -> CanonicalSeason {
        serde_json::from_str(
            r#"{
                "format_version": "1.0.0",
                "season": 2025,
                "calendar": [
                    { "event_number": 1, "event_name": "Evening 10 #1", "event_date": "2025-05-01",
                      "miles": "10", "is_evening10": true, "is_club_championship": true },
                    { "event_number": 2, "event_name": "Evening 10 #2", "event_date": "2025-05-08",
                      "miles": "10", "is_evening10": true, "is_club_championship": true },
                    { "event_number": 3, "event_name": "Hilly 25", "event_date": "2025-06-01",
                      "miles": "25", "is_club_championship": true }
                ],
                "competitors": [
                    { "club_number": 1, "surname": "Smith", "given_name": "Sam", "claim_status": "first_claim",
                      "is_female": false, "age_group": "veteran", "vets_bucket": 1,
                      "created_utc": "2025-01-01T00:00:00Z" },
                    { "club_number": 2, "surname": "Jones", "given_name": "Alex", "claim_status": "first_claim",
                      "is_female": false, "age_group": "senior", "created_utc": "2025-01-01T00:00:00Z" }
                ],
                "rides": [
                    { "event_number": 1, "club_number": 1, "name": "Sam Smith", "total_seconds": "1400", "status": "VALID" },
                    { "event_number": 1, "club_number": 2, "name": "Alex Jones", "total_seconds": "1380", "status": "VALID" },
                    { "event_number": 2, "club_number": 1, "name": "Sam Smith", "total_seconds": "1390", "status": "VALID" },
                    { "event_number": 2, "club_number": 2, "name": "Alex Jones", "total_seconds": "1395", "status": "VALID" },
                    { "event_number": 3, "club_number": 1, "name": "Sam Smith", "total_seconds": "3600", "status": "VALID" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_scores_a_season_end_to_end() {
        let canonical = season();
        CanonicalValidator::validate(&canonical).unwrap();

        let options = ScoringOptions::default();
        let input = CanonicalTransformer::new(&options).transform(canonical).unwrap();
        let rules = CompetitionRulesProvider::from_json(RULES).unwrap();
        let mut standards = StandardsCatalog::new();
        standards.add(StandardsLoader::from_reader(2024, STANDARDS.as_bytes()).unwrap());

        let output = score_season(input, &rules, &standards).unwrap();

        assert_eq!(output.standards_year, Some(2024));
        assert_eq!(output.rules.rules_year, 2024);
        assert_eq!(output.summary.events_scored, 3);

        let vet = &output.rides[0];
        assert_eq!(vet.scores.handicap_seconds, Some(Decimal::from(36)));
        assert_eq!(vet.scores.handicap_total_seconds, Some(Decimal::from(1364)));

        let seniors = output
            .standings
            .competitions
            .iter()
            .find(|c| c.code == "seniors")
            .unwrap();
        assert_eq!(seniors.results.len(), 1);
        assert_eq!(seniors.results[0].display_name, "Alex Jones");
        assert!(!seniors.results[0].qualified);
        assert_eq!(seniors.results[0].full.rank, None);

        let veterans = output
            .standings
            .competitions
            .iter()
            .find(|c| c.code == "veterans")
            .unwrap();
        assert_eq!(veterans.results[0].club_number, Some(1));
        assert_eq!(veterans.results[0].full.rank, Some(1));
        assert_eq!(veterans.results[0].events_completed_other, 1);
    }

    #[test]
    fn test_invalid_rules_reported_before_scoring() {
        let mut canonical = season();
        canonical.rides[0].club_number = Some(99);
        let options = ScoringOptions::default();
        let input = CanonicalTransformer::new(&options).transform(canonical).unwrap();
        let rules = CompetitionRulesProvider::from_json(
            r#"{ "seasons": [
                { "year": 2024, "tenMile": { "count": 8, "formula": "calendarEvents/2+1" },
                  "mixedDistance": { "count": 3 } }
            ] }"#,
        )
        .unwrap();
        let mut standards = StandardsCatalog::new();
        standards.add(StandardsLoader::from_reader(2024, STANDARDS.as_bytes()).unwrap());

        let err = score_season(input, &rules, &standards).unwrap_err();

        assert!(matches!(
            err,
            crate::ImporterError::ScoringError(scoring::ScoringError::InvalidRule { ref rule, .. }) if rule == "tenMile"
        ));
    }

    #[test]
    fn test_missing_standards_year_is_fatal() {
        let options = ScoringOptions::default();
        let input = CanonicalTransformer::new(&options).transform(season()).unwrap();
        let rules = CompetitionRulesProvider::from_json(RULES).unwrap();
        let mut standards = StandardsCatalog::new();
        standards.add(StandardsLoader::from_reader(2030, STANDARDS.as_bytes()).unwrap());

        assert!(matches!(
            score_season(input, &rules, &standards),
            Err(crate::ImporterError::ScoringError(scoring::ScoringError::NoStandardsForSeason(2025)))
        ));
    }
}
