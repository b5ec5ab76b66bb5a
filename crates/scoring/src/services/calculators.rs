use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::points_table::PointsTable;
use super::ranking::{allocate_placings, assign_ranks};
use crate::models::{CalendarEvent, Category, CompetitorSnapshot, League, Ride, RideScores, RoundRobinRider};

/// A ride paired with the attributes resolved for its event date.
pub struct EventEntry<'a> {
    pub ride: &'a mut Ride,
    pub competitor: Option<&'a CompetitorSnapshot>,
    pub round_robin_rider: Option<&'a RoundRobinRider>,
    /// Whether the member's claim status allows category scoring.
    pub eligible: bool,
}

impl<'a> EventEntry<'a> {
    pub fn eligible_member(&self) -> Option<&'a CompetitorSnapshot> {
        self.competitor.filter(|_| self.eligible)
    }

    fn is_female_member(&self) -> bool {
        self.eligible_member().is_some_and(|c| c.is_female)
    }

    fn is_male_member(&self) -> bool {
        self.eligible_member().is_some_and(|c| !c.is_female)
    }
}

type Eligibility = fn(&CalendarEvent, &EventEntry<'_>) -> bool;
type OrderingTime = fn(&Ride) -> Option<Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Partition {
    Whole,
    ByLeague,
}

/// Scores one category for one event: filter, rank, write the placing.
pub struct CategoryCalculator {
    pub category: Category,
    eligibility: Eligibility,
    ordering_time: OrderingTime,
    partition: Partition,
}

fn raw_time(ride: &Ride) -> Option<Decimal> {
    Some(ride.total_seconds)
}

fn handicap_time(ride: &Ride) -> Option<Decimal> {
    ride.scores.handicap_total_seconds
}

impl CategoryCalculator {
    fn new(category: Category, eligibility: Eligibility) -> Self {
        Self {
            category,
            eligibility,
            ordering_time: raw_time,
            partition: Partition::Whole,
        }
    }

    /// Writes placings for every eligible valid ride and returns how many were scored.
    pub fn score(&self, table: &PointsTable, event: &CalendarEvent, entries: &mut [EventEntry<'_>]) -> usize {
        let mut fields: BTreeMap<League, Vec<(usize, Decimal)>> = BTreeMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            if !entry.ride.is_valid() || !(self.eligibility)(event, entry) {
                continue;
            }
            let Some(time) = (self.ordering_time)(&*entry.ride) else {
                continue;
            };
            let key = match self.partition {
                Partition::Whole => League::Undefined,
                Partition::ByLeague => entry.competitor.map(|c| c.league).unwrap_or_default(),
            };
            fields.entry(key).or_default().push((idx, time));
        }

        let mut scored = 0;
        for field in fields.into_values() {
            for (idx, placing) in allocate_placings(table, field) {
                *entries[idx].ride.placing_mut(self.category) = Some(placing);
                scored += 1;
            }
        }
        scored
    }
}

/// Every per-event category except Nev Brooks, which carries state across events.
pub fn standard_calculators() -> Vec<CategoryCalculator> {
    vec![
        CategoryCalculator::new(Category::Juveniles, |_, e| {
            e.eligible_member().is_some_and(|c| c.is_juvenile())
        }),
        CategoryCalculator::new(Category::Juniors, |_, e| {
            e.eligible_member().is_some_and(|c| c.is_junior())
        }),
        CategoryCalculator::new(Category::Seniors, |_, e| {
            e.eligible_member().is_some_and(|c| c.is_senior())
        }),
        CategoryCalculator::new(Category::Women, |_, e| e.is_female_member()),
        CategoryCalculator::new(Category::RoadBikeMen, |_, e| {
            e.is_male_member() && e.ride.is_road_bike
        }),
        CategoryCalculator::new(Category::RoadBikeWomen, |_, e| {
            e.is_female_member() && e.ride.is_road_bike
        }),
        CategoryCalculator {
            ordering_time: handicap_time,
            ..CategoryCalculator::new(Category::Veterans, |_, e| {
                e.eligible_member().is_some_and(|c| c.is_veteran())
            })
        },
        CategoryCalculator {
            partition: Partition::ByLeague,
            ..CategoryCalculator::new(Category::League, |event, e| {
                event.is_club_championship
                    && e.eligible_member().is_some_and(|c| c.league != League::Undefined)
            })
        },
        CategoryCalculator::new(Category::RoundRobinOpen, |event, e| {
            event.is_round_robin_event && (e.eligible_member().is_some() || e.round_robin_rider.is_some())
        }),
        CategoryCalculator::new(Category::RoundRobinWomen, |event, e| {
            event.is_round_robin_event
                && (e.is_female_member() || e.round_robin_rider.is_some_and(|r| r.is_female))
        }),
    ]
}

/// Overall event ranking; awards a rank but no points.
pub struct RankCalculator {
    pub name: &'static str,
    include: fn(&EventEntry<'_>) -> bool,
    slot: fn(&mut RideScores) -> &mut Option<u32>,
}

impl RankCalculator {
    pub fn rank(&self, entries: &mut [EventEntry<'_>]) {
        let field = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.ride.is_valid() && (self.include)(e))
            .map(|(idx, e)| (idx, e.ride.total_seconds))
            .collect();

        for (idx, rank) in assign_ranks(field) {
            *(self.slot)(&mut entries[idx].ride.scores) = Some(rank);
        }
    }
}

pub fn rank_calculators() -> Vec<RankCalculator> {
    vec![
        RankCalculator {
            name: "event",
            include: |_| true,
            slot: |s| &mut s.event_rank,
        },
        RankCalculator {
            name: "eligible riders",
            include: |e| e.eligible_member().is_some(),
            slot: |s| &mut s.event_eligible_riders_rank,
        },
        RankCalculator {
            name: "road bike",
            include: |e| e.ride.is_road_bike,
            slot: |s| &mut s.event_road_bike_rank,
        },
        RankCalculator {
            name: "eligible road bike riders",
            include: |e| e.eligible_member().is_some() && e.ride.is_road_bike,
            slot: |s| &mut s.event_eligible_road_bike_riders_rank,
        },
    ]
}
