use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use super::calculators::EventEntry;
use super::points_table::PointsTable;
use super::ranking::allocate_placings;
use crate::models::CalendarEvent;

/// Seconds subtracted from a rider's first ten to produce their handicap.
pub const DEFAULT_BASELINE_SECONDS: i64 = 995;

/// Dynamic handicap seeded by each rider's first qualifying ten of the season.
///
/// Events must be fed in date order. The first eligible ten for a club number
/// records `seconds_generated`; every later ten applies that value and is
/// ranked on the adjusted time. Seeds are never recomputed.
#[derive(Debug, Clone)]
pub struct NevBrooksGenerator {
    baseline_seconds: Decimal,
    seeds: HashMap<u32, Decimal>,
}

impl Default for NevBrooksGenerator {
    fn default() -> Self {
        Self::new(Decimal::from(DEFAULT_BASELINE_SECONDS))
    }
}

impl NevBrooksGenerator {
    pub fn new(baseline_seconds: Decimal) -> Self {
        Self {
            baseline_seconds,
            seeds: HashMap::new(),
        }
    }

    pub fn seed_for(&self, club_number: u32) -> Option<Decimal> {
        self.seeds.get(&club_number).copied()
    }

    /// Scores one event; returns the number of rides that received a placing.
    pub fn score_event(&mut self, table: &PointsTable, event: &CalendarEvent, entries: &mut [EventEntry<'_>]) -> usize {
        if !event.is_ten_mile() || event.is_cancelled {
            return 0;
        }

        let mut field = Vec::new();
        for (idx, entry) in entries.iter_mut().enumerate() {
            let Some(competitor) = entry.eligible_member() else {
                continue;
            };
            if !entry.ride.is_valid() {
                continue;
            }

            let total = entry.ride.total_seconds;
            let nev_brooks = &mut entry.ride.scores.nev_brooks;
            match self.seeds.get(&competitor.club_number) {
                None => {
                    let generated = total - self.baseline_seconds;
                    debug!(
                        "Nev Brooks seed for club number {}: {}s (event {})",
                        competitor.club_number, generated, event.event_number
                    );
                    self.seeds.insert(competitor.club_number, generated);
                    nev_brooks.seconds_generated = Some(generated);
                }
                Some(&applied) => {
                    let adjusted = total - applied;
                    nev_brooks.seconds_applied = Some(applied);
                    nev_brooks.seconds_adjusted_time = Some(adjusted);
                    field.push((idx, adjusted));
                }
            }
        }

        let placings = allocate_placings(table, field);
        let scored = placings.len();
        for (idx, placing) in placings {
            entries[idx].ride.scores.nev_brooks.placing = Some(placing);
        }
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeGroup, ClaimStatus, CompetitorSnapshot, NevBrooksHandicap, Placing, Ride};
    use crate::services::calculators::tests::{event, member, ride};

    fn score(
        generator: &mut NevBrooksGenerator,
        event: &CalendarEvent,
        rides: &mut [Ride],
        members: &[CompetitorSnapshot],
    ) -> usize {
        let table = PointsTable::club_default();
        let mut entries: Vec<EventEntry<'_>> = rides
            .iter_mut()
            .zip(members.iter())
            .map(|(ride, competitor)| EventEntry {
                ride,
                competitor: Some(competitor),
                round_robin_rider: None,
                eligible: competitor.is_eligible(&[]),
            })
            .collect();
        generator.score_event(&table, event, &mut entries)
    }

    #[test]
    fn test_first_ten_seeds_and_second_applies() {
        let mut generator = NevBrooksGenerator::default();
        let members = vec![member(1, AgeGroup::Senior, false), member(2, AgeGroup::Senior, false)];

        let mut first = vec![ride(Some(1), 1400), ride(Some(2), 1300)];
        let scored = score(&mut generator, &event(1), &mut first, &members);
        assert_eq!(scored, 0);
        for r in &first {
            let nb = &r.scores.nev_brooks;
            assert!(nb.seconds_applied.is_none());
            assert!(nb.seconds_adjusted_time.is_none());
            assert!(nb.placing.is_none());
        }
        assert_eq!(first[0].scores.nev_brooks.seconds_generated, Some(Decimal::from(405)));
        assert_eq!(first[1].scores.nev_brooks.seconds_generated, Some(Decimal::from(305)));

        let mut second = vec![ride(Some(1), 1390), ride(Some(2), 1310)];
        let scored = score(&mut generator, &event(2), &mut second, &members);
        assert_eq!(scored, 2);

        let rider_one = &second[0].scores.nev_brooks;
        assert_eq!(rider_one.seconds_applied, first[0].scores.nev_brooks.seconds_generated);
        assert_eq!(rider_one.seconds_adjusted_time, Some(Decimal::from(985)));
        assert_eq!(rider_one.placing, Some(Placing { position: 1, points: Decimal::from(60) }));
        assert_eq!(second[1].scores.nev_brooks.placing.unwrap().position, 2);
        assert!(second[0].scores.nev_brooks.seconds_generated.is_none());
    }

    #[test]
    fn test_seed_is_not_recomputed() {
        let mut generator = NevBrooksGenerator::default();
        let members = vec![member(1, AgeGroup::Senior, false)];

        score(&mut generator, &event(1), &mut [ride(Some(1), 1400)], &members);
        score(&mut generator, &event(2), &mut [ride(Some(1), 1200)], &members);
        let mut third = [ride(Some(1), 1500)];
        score(&mut generator, &event(3), &mut third, &members);

        assert_eq!(generator.seed_for(1), Some(Decimal::from(405)));
        assert_eq!(third[0].scores.nev_brooks.seconds_applied, Some(Decimal::from(405)));
    }

    #[test]
    fn test_non_ten_events_are_ignored() {
        let mut generator = NevBrooksGenerator::default();
        let members = vec![member(1, AgeGroup::Senior, false)];
        let mut hilly = event(1);
        hilly.is_evening10 = false;

        let mut rides = [ride(Some(1), 3000)];
        score(&mut generator, &hilly, &mut rides, &members);

        assert_eq!(rides[0].scores.nev_brooks, NevBrooksHandicap::default());
        assert!(generator.seed_for(1).is_none());
    }

    #[test]
    fn test_second_claim_rides_do_not_seed() {
        let mut generator = NevBrooksGenerator::default();
        let mut second_claim = member(1, AgeGroup::Senior, false);
        second_claim.claim_status = ClaimStatus::SecondClaim;

        let mut rides = [ride(Some(1), 1400)];
        score(&mut generator, &event(1), &mut rides, &[second_claim]);

        assert!(generator.seed_for(1).is_none());
        assert!(rides[0].scores.nev_brooks.seconds_generated.is_none());
    }
}
