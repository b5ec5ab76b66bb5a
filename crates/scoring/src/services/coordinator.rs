use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

use super::calculators::{EventEntry, rank_calculators, standard_calculators};
use super::nev_brooks::{DEFAULT_BASELINE_SECONDS, NevBrooksGenerator};
use super::points_table::PointsTable;
use super::vets_handicap::{HandicapAdjustment, VetsHandicapProvider};
use crate::dto::ProcessingSummary;
use crate::error::{MissingCompetitor, Result, ScoringError};
use crate::models::{CalendarEvent, CompetitorSnapshot, DecoratedName, Ride, RoundRobinRider};
use crate::repository::{CalendarRepository, CompetitorRepository, RoundRobinRiderRepository};

pub const HOME_CLUB: &str = "WVCC";

/// Engine options that may vary by club or season.
#[derive(Debug, Clone)]
pub struct ScoringOptions {
    pub points_table: PointsTable,
    pub nev_brooks_baseline_seconds: Decimal,
    /// Second claim members scored as if first claim.
    pub eligibility_overrides: Vec<u32>,
    /// Club code of the host club; riders listed under it are never round robin guests.
    pub home_club: String,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            points_table: PointsTable::club_default(),
            nev_brooks_baseline_seconds: Decimal::from(DEFAULT_BASELINE_SECONDS),
            eligibility_overrides: Vec::new(),
            home_club: HOME_CLUB.to_string(),
        }
    }
}

/// Everything resolved for one ride before any scoring field is touched.
#[derive(Default)]
struct ResolvedRide<'a> {
    competitor: Option<&'a CompetitorSnapshot>,
    round_robin_rider: Option<&'a RoundRobinRider>,
    eligible: bool,
    handicap: Option<HandicapAdjustment>,
}

/// Scores a whole season in place. Either every ride is scored or none is.
pub struct RideProcessingCoordinator<'a> {
    options: &'a ScoringOptions,
    handicaps: &'a dyn VetsHandicapProvider,
}

impl<'a> RideProcessingCoordinator<'a> {
    pub fn new(options: &'a ScoringOptions, handicaps: &'a dyn VetsHandicapProvider) -> Self {
        Self { options, handicaps }
    }

    pub fn process_all(
        &self,
        rides: &mut [Ride],
        competitors: &CompetitorRepository<'_>,
        calendar: &[CalendarEvent],
        round_robin_riders: &[RoundRobinRider],
    ) -> Result<ProcessingSummary> {
        let calendar = CalendarRepository::new(calendar)?;
        let round_robin = RoundRobinRiderRepository::new(round_robin_riders);

        info!(
            "Scoring {} rides across {} calendar events ({} competitors, {} round robin riders)",
            rides.len(),
            calendar.len(),
            competitors.len(),
            round_robin.len()
        );

        let resolved = self.resolve_rides(rides, competitors, &calendar, &round_robin)?;

        let mut by_event: HashMap<u32, Vec<(usize, &mut Ride)>> = HashMap::new();
        for (idx, ride) in rides.iter_mut().enumerate() {
            ride.clear_scores();
            if let Some(handicap) = resolved[idx].handicap {
                ride.scores.handicap_seconds = Some(handicap.handicap_seconds);
                ride.scores.handicap_total_seconds = Some(handicap.adjusted_total_seconds);
            }
            by_event.entry(ride.event_number).or_default().push((idx, ride));
        }

        let calculators = standard_calculators();
        let ranks = rank_calculators();
        let mut nev_brooks = NevBrooksGenerator::new(self.options.nev_brooks_baseline_seconds);
        let table = &self.options.points_table;
        let mut summary = ProcessingSummary::default();

        for event in calendar.in_date_order() {
            let event_rides = by_event.remove(&event.event_number).unwrap_or_default();
            if event.is_cancelled {
                summary.events_cancelled += 1;
                continue;
            }
            if event_rides.is_empty() {
                debug!("Event {} ({}) has no rides", event.event_number, event.event_name);
                continue;
            }

            let mut entries: Vec<EventEntry<'_>> = event_rides
                .into_iter()
                .map(|(idx, ride)| EventEntry {
                    ride,
                    competitor: resolved[idx].competitor,
                    round_robin_rider: resolved[idx].round_robin_rider,
                    eligible: resolved[idx].eligible,
                })
                .collect();

            debug!(
                "Scoring event {} ({}, {}) with {} rides",
                event.event_number,
                event.event_name,
                event.event_date,
                entries.len()
            );

            for calculator in &calculators {
                let scored = calculator.score(table, event, &mut entries);
                summary.placings_awarded += scored;
                if scored > 0 {
                    debug!("  {}: {} placings", calculator.category, scored);
                }
            }

            let scored = nev_brooks.score_event(table, event, &mut entries);
            summary.placings_awarded += scored;

            for rank in &ranks {
                rank.rank(&mut entries);
            }

            summary.events_scored += 1;
            summary.rides_processed += entries.len();
        }

        info!(
            "Scored {} events ({} cancelled): {} rides, {} placings",
            summary.events_scored, summary.events_cancelled, summary.rides_processed, summary.placings_awarded
        );

        Ok(summary)
    }

    /// Resolves snapshots, round robin riders and handicaps for every ride,
    /// collecting every missing reference before failing.
    fn resolve_rides<'s>(
        &self,
        rides: &[Ride],
        competitors: &CompetitorRepository<'s>,
        calendar: &CalendarRepository<'_>,
        round_robin: &RoundRobinRiderRepository<'s>,
    ) -> Result<Vec<ResolvedRide<'s>>> {
        let unknown_events: BTreeSet<u32> = rides
            .iter()
            .filter(|r| calendar.get(r.event_number).is_none())
            .map(|r| r.event_number)
            .collect();
        if !unknown_events.is_empty() {
            return Err(ScoringError::UnknownCalendarEvents(unknown_events.into_iter().collect()));
        }

        let mut missing_competitors = Vec::new();
        let mut missing_riders = BTreeSet::new();
        let mut handicap_failures = Vec::new();
        let mut resolved = Vec::with_capacity(rides.len());

        for ride in rides {
            let Some(event) = calendar.get(ride.event_number) else {
                resolved.push(ResolvedRide::default());
                continue;
            };
            let mut entry = ResolvedRide::default();

            if let Some(club_number) = ride.club_number {
                match competitors.resolve(club_number, event.event_date_utc()) {
                    Some(competitor) => {
                        entry.competitor = Some(competitor);
                        entry.eligible = competitor.is_eligible(&self.options.eligibility_overrides);
                        if entry.eligible && competitor.is_second_claim() {
                            warn!(
                                "Second claim override applied for club number {} (event {})",
                                club_number, event.event_number
                            );
                        }
                    }
                    None => missing_competitors.push(MissingCompetitor {
                        club_number,
                        event_number: event.event_number,
                    }),
                }
            } else if let Some(club) = self.guest_club(ride) {
                match round_robin.find(&ride.name, club) {
                    Some(rider) => entry.round_robin_rider = Some(rider),
                    None => {
                        missing_riders.insert(DecoratedName::new(&ride.name, club).to_string());
                    }
                }
            }

            if let Some(competitor) = entry.competitor {
                if entry.eligible && competitor.is_veteran() && ride.is_valid() && !event.is_cancelled {
                    match self.handicap_for(ride, event, competitor) {
                        Ok(handicap) => entry.handicap = Some(handicap),
                        Err(err) => handicap_failures.push(err),
                    }
                }
            }

            resolved.push(entry);
        }

        if !missing_competitors.is_empty() {
            return Err(ScoringError::MissingCompetitors(missing_competitors));
        }
        if !missing_riders.is_empty() {
            return Err(ScoringError::MissingRoundRobinRiders(missing_riders.into_iter().collect()));
        }
        if let Some(err) = handicap_failures.into_iter().next() {
            return Err(err);
        }

        Ok(resolved)
    }

    fn guest_club<'r>(&self, ride: &'r Ride) -> Option<&'r str> {
        ride.round_robin_club
            .as_deref()
            .map(str::trim)
            .filter(|club| !club.is_empty() && !club.eq_ignore_ascii_case(&self.options.home_club))
    }

    fn handicap_for(
        &self,
        ride: &Ride,
        event: &CalendarEvent,
        competitor: &CompetitorSnapshot,
    ) -> Result<HandicapAdjustment> {
        let bucket = competitor.vets_bucket.ok_or(ScoringError::MissingVetsBucket {
            club_number: competitor.club_number,
            event_number: event.event_number,
        })?;
        self.handicaps
            .adjusted_time(ride.total_seconds, event.miles, competitor.is_female, bucket)
            .map_err(|source| ScoringError::HandicapFailed {
                club_number: competitor.club_number,
                event_number: event.event_number,
                source: Box::new(source),
            })
    }
}
