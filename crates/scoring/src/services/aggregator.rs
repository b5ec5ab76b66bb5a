use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

use super::rules::CompetitionRules;
use crate::dto::{
    CompetitionScore, CompetitionStandings, CompetitorResult, SeasonStandings, TeamResult, TeamStandings,
};
use crate::models::{CalendarEvent, Category, CompetitorSnapshot, DecoratedName, League, Ride};
use crate::repository::{CalendarRepository, CompetitorRepository};

/// How a competitor's per-event points combine into season scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringRule {
    /// Best `ten_mile_count` tens; full score is the best `non_ten_minimum`
    /// non-tens plus the best of the rest up to `mixed_event_count` rides.
    TenMileAndMixed {
        ten_mile_count: u32,
        non_ten_minimum: u32,
        mixed_event_count: u32,
    },
    /// Best `count` rides; fewer than `minimum` rides leaves the competitor unranked.
    BestOf { count: u32, minimum: u32 },
}

pub type RideFilter<'c> = Box<dyn Fn(&Ride, Option<&CompetitorSnapshot>) -> bool + 'c>;

/// One season competition: which events count, whose rides, which points, which rule.
pub struct CompetitionDefinition<'c> {
    pub code: String,
    pub title: String,
    pub events: Vec<&'c CalendarEvent>,
    pub category: Category,
    pub filter: RideFilter<'c>,
    pub rule: ScoringRule,
}

impl<'c> CompetitionDefinition<'c> {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        events: Vec<&'c CalendarEvent>,
        category: Category,
        rule: ScoringRule,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            events,
            category,
            filter: Box::new(|_, _| true),
            rule,
        }
    }

    pub fn with_filter(
        mut self,
        filter: impl Fn(&Ride, Option<&CompetitorSnapshot>) -> bool + 'c,
    ) -> Self {
        self.filter = Box::new(filter);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ResultKey {
    Member(u32),
    Guest(String),
}

#[derive(Debug, Clone)]
struct ScoredRide<'r> {
    event_number: u32,
    points: Decimal,
    is_ten: bool,
    ride: &'r Ride,
}

#[derive(Debug, Default)]
struct Scores {
    ten_mile: Option<Decimal>,
    full: Option<Decimal>,
    all_events: Option<Decimal>,
    scoring_events: Vec<u32>,
    qualified: bool,
}

/// Splits a display name into `(surname, given names)`; the surname is the last word.
pub fn split_name(name: &str) -> (String, String) {
    let mut parts: Vec<&str> = name.split_whitespace().collect();
    match parts.pop() {
        Some(surname) => (surname.to_string(), parts.join(" ")),
        None => (String::new(), String::new()),
    }
}

fn sum(points: impl Iterator<Item = Decimal>) -> Decimal {
    points.sum()
}

fn by_points_desc(a: &&ScoredRide<'_>, b: &&ScoredRide<'_>) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| a.event_number.cmp(&b.event_number))
}

fn score_rides(rides: &[ScoredRide<'_>], rule: ScoringRule) -> Scores {
    if rides.is_empty() {
        return Scores::default();
    }

    let mut ordered: Vec<&ScoredRide<'_>> = rides.iter().collect();
    ordered.sort_by(by_points_desc);
    let all_events = Some(sum(ordered.iter().map(|r| r.points)));

    match rule {
        ScoringRule::TenMileAndMixed {
            ten_mile_count,
            non_ten_minimum,
            mixed_event_count,
        } => {
            let tens: Vec<&ScoredRide<'_>> = ordered.iter().copied().filter(|r| r.is_ten).collect();
            let non_tens: Vec<&ScoredRide<'_>> = ordered.iter().copied().filter(|r| !r.is_ten).collect();

            let ten_mile = (!tens.is_empty())
                .then(|| sum(tens.iter().take(ten_mile_count as usize).map(|r| r.points)));

            let required: Vec<&ScoredRide<'_>> =
                non_tens.iter().copied().take(non_ten_minimum as usize).collect();
            let consumed: BTreeSet<u32> = required.iter().map(|r| r.event_number).collect();
            let remaining_slots = mixed_event_count.saturating_sub(non_ten_minimum) as usize;
            let best_of_rest: Vec<&ScoredRide<'_>> = ordered
                .iter()
                .copied()
                .filter(|r| !consumed.contains(&r.event_number))
                .take(remaining_slots)
                .collect();

            let counted: Vec<&ScoredRide<'_>> = required.into_iter().chain(best_of_rest).collect();

            Scores {
                ten_mile,
                full: Some(sum(counted.iter().map(|r| r.points))),
                all_events,
                scoring_events: counted.iter().map(|r| r.event_number).collect(),
                qualified: non_tens.len() >= non_ten_minimum as usize,
            }
        }
        ScoringRule::BestOf { count, minimum } => {
            let counted: Vec<&ScoredRide<'_>> = ordered.iter().copied().take(count as usize).collect();
            Scores {
                ten_mile: None,
                full: Some(sum(counted.iter().map(|r| r.points))),
                all_events,
                scoring_events: counted.iter().map(|r| r.event_number).collect(),
                qualified: rides.len() >= minimum as usize,
            }
        }
    }
}

fn desc_nulls_last(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_name(a: &CompetitorResult, b: &CompetitorResult) -> Ordering {
    a.surname
        .to_lowercase()
        .cmp(&b.surname.to_lowercase())
        .then_with(|| a.given_name.to_lowercase().cmp(&b.given_name.to_lowercase()))
}

fn full_value(r: &CompetitorResult) -> Option<Decimal> {
    r.full.points.filter(|_| r.qualified)
}

fn by_full(a: &CompetitorResult, b: &CompetitorResult) -> Ordering {
    desc_nulls_last(full_value(a), full_value(b))
        .then_with(|| desc_nulls_last(a.ten_mile.points, b.ten_mile.points))
        .then_with(|| by_name(a, b))
}

/// Walks rows in order; equal values share the previous rank, otherwise the
/// rank is the row number. Rows without a value get no rank.
pub fn assign_ranks_in_order(values: &[Option<Decimal>]) -> Vec<Option<u32>> {
    let mut last: Option<(Decimal, u32)> = None;
    values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            let value = (*value)?;
            let rank = match last {
                Some((previous, rank)) if previous == value => rank,
                _ => (row + 1) as u32,
            };
            last = Some((value, rank));
            Some(rank)
        })
        .collect()
}

fn rank_view(
    results: &mut [CompetitorResult],
    compare: fn(&CompetitorResult, &CompetitorResult) -> Ordering,
    value: fn(&CompetitorResult) -> Option<Decimal>,
    slot: fn(&mut CompetitorResult) -> &mut CompetitionScore,
) {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| compare(&results[a], &results[b]));

    let values: Vec<Option<Decimal>> = order.iter().map(|&idx| value(&results[idx])).collect();
    for (idx, rank) in order.into_iter().zip(assign_ranks_in_order(&values)) {
        slot(&mut results[idx]).rank = rank;
    }
}

/// Ranks every view, then orders rows by the full-season view.
pub fn sort_results(results: &mut [CompetitorResult]) {
    rank_view(
        results,
        |a, b| desc_nulls_last(a.ten_mile.points, b.ten_mile.points).then_with(|| by_name(a, b)),
        |r| r.ten_mile.points,
        |r| &mut r.ten_mile,
    );
    rank_view(
        results,
        |a, b| desc_nulls_last(a.all_events.points, b.all_events.points).then_with(|| by_name(a, b)),
        |r| r.all_events.points,
        |r| &mut r.all_events,
    );
    rank_view(results, by_full, full_value, |r| &mut r.full);
    results.sort_by(by_full);
}

/// Builds season standings from scored rides.
pub struct CompetitionResultsAggregator<'a> {
    competitors: &'a CompetitorRepository<'a>,
    calendar: &'a CalendarRepository<'a>,
    home_club: &'a str,
}

impl<'a> CompetitionResultsAggregator<'a> {
    pub fn new(
        competitors: &'a CompetitorRepository<'a>,
        calendar: &'a CalendarRepository<'a>,
        home_club: &'a str,
    ) -> Self {
        Self {
            competitors,
            calendar,
            home_club,
        }
    }

    pub fn build(&self, definition: &CompetitionDefinition<'_>, rides: &[Ride]) -> CompetitionStandings {
        let events: HashMap<u32, &CalendarEvent> =
            definition.events.iter().map(|e| (e.event_number, *e)).collect();

        let mut groups: BTreeMap<ResultKey, Vec<ScoredRide<'_>>> = BTreeMap::new();
        for ride in rides.iter().filter(|r| r.is_valid()) {
            let Some(event) = events.get(&ride.event_number) else {
                continue;
            };
            let Some(points) = ride.points(definition.category) else {
                continue;
            };
            let snapshot = ride
                .club_number
                .and_then(|club| self.competitors.resolve(club, event.event_date_utc()));
            if !(definition.filter)(ride, snapshot) {
                continue;
            }

            let key = match ride.club_number {
                Some(club) => ResultKey::Member(club),
                None => ResultKey::Guest(self.guest_name(ride).key().to_string()),
            };
            groups.entry(key).or_default().push(ScoredRide {
                event_number: ride.event_number,
                points,
                is_ten: event.is_ten_mile(),
                ride,
            });
        }

        let mut results: Vec<CompetitorResult> = groups
            .into_iter()
            .map(|(key, scored)| self.competitor_result(&key, &scored, definition.rule))
            .collect();
        sort_results(&mut results);

        debug!("{}: {} competitors", definition.title, results.len());

        CompetitionStandings {
            code: definition.code.clone(),
            title: definition.title.clone(),
            event_numbers: definition.events.iter().map(|e| e.event_number).collect(),
            results,
        }
    }

    fn guest_name(&self, ride: &Ride) -> DecoratedName {
        match ride.round_robin_club.as_deref() {
            Some(club) if !club.trim().is_empty() => DecoratedName::new(&ride.name, club),
            _ => DecoratedName::parse(&ride.name),
        }
    }

    fn competitor_result(&self, key: &ResultKey, scored: &[ScoredRide<'_>], rule: ScoringRule) -> CompetitorResult {
        let first_ride = scored[0].ride;
        let (club_number, display_name, surname, given_name) = match key {
            ResultKey::Member(club) => match self.competitors.latest(*club) {
                Some(snapshot) => (
                    Some(*club),
                    snapshot.full_name(),
                    snapshot.surname.clone(),
                    snapshot.given_name.clone(),
                ),
                None => {
                    let (surname, given) = split_name(&first_ride.name);
                    (Some(*club), first_ride.name.clone(), surname, given)
                }
            },
            ResultKey::Guest(_) => {
                let bare = match first_ride.round_robin_club.as_deref() {
                    Some(club) => DecoratedName::bare_name(&first_ride.name, club),
                    None => first_ride.name.as_str(),
                };
                let (surname, given) = split_name(bare);
                (None, self.guest_name(first_ride).to_string(), surname, given)
            }
        };

        let scores = score_rides(scored, rule);
        let events_completed_tens = scored.iter().filter(|r| r.is_ten).count() as u32;

        CompetitorResult {
            club_number,
            display_name,
            surname,
            given_name,
            event_points: scored.iter().map(|r| (r.event_number, r.points)).collect(),
            scoring_events: scores.scoring_events,
            events_completed_tens,
            events_completed_other: scored.len() as u32 - events_completed_tens,
            qualified: scores.qualified,
            ten_mile: CompetitionScore {
                points: scores.ten_mile,
                rank: None,
            },
            full: CompetitionScore {
                points: scores.full,
                rank: None,
            },
            all_events: CompetitionScore {
                points: scores.all_events,
                rank: None,
            },
        }
    }

    /// Per event, each club scores its best open points plus its best women's points.
    pub fn build_team(&self, rides: &[Ride], rules: &CompetitionRules) -> TeamStandings {
        let events = self.calendar.round_robin_events();
        let event_numbers: BTreeSet<u32> = events.iter().map(|e| e.event_number).collect();
        let team = &rules.round_robin;

        let mut clubs: BTreeMap<String, Vec<&Ride>> = BTreeMap::new();
        for ride in rides.iter().filter(|r| r.is_valid() && event_numbers.contains(&r.event_number)) {
            if ride.scores.round_robin.is_none() && ride.scores.round_robin_women.is_none() {
                continue;
            }
            let club = match (ride.club_number, ride.round_robin_club.as_deref()) {
                (Some(_), _) => self.home_club.to_string(),
                (None, Some(club)) => club.trim().to_uppercase(),
                (None, None) => continue,
            };
            clubs.entry(club).or_default().push(ride);
        }

        let mut results: Vec<TeamResult> = clubs
            .into_iter()
            .map(|(club, club_rides)| {
                let mut per_event: BTreeMap<u32, Vec<&Ride>> = BTreeMap::new();
                for ride in club_rides.iter().copied() {
                    per_event.entry(ride.event_number).or_default().push(ride);
                }

                let event_points: BTreeMap<u32, Decimal> = per_event
                    .into_iter()
                    .map(|(event_number, event_rides)| {
                        let best = |category: Category, count: u32| {
                            let mut points: Vec<Decimal> =
                                event_rides.iter().filter_map(|r| r.points(category)).collect();
                            points.sort_by(|a, b| b.cmp(a));
                            sum(points.into_iter().take(count as usize))
                        };
                        let score = best(Category::RoundRobinOpen, team.team_open_count)
                            + best(Category::RoundRobinWomen, team.team_women_count);
                        (event_number, score)
                    })
                    .collect();

                let riders: BTreeSet<String> = club_rides.iter().map(|r| r.name.trim().to_string()).collect();
                let total = (!event_points.is_empty()).then(|| sum(event_points.values().copied()));

                TeamResult {
                    club,
                    riders: riders.into_iter().collect(),
                    event_points,
                    events_completed: club_rides.len() as u32,
                    total: CompetitionScore {
                        points: total,
                        rank: None,
                    },
                }
            })
            .collect();

        results.sort_by(|a, b| desc_nulls_last(a.total.points, b.total.points).then_with(|| a.club.cmp(&b.club)));
        let values: Vec<Option<Decimal>> = results.iter().map(|r| r.total.points).collect();
        for (result, rank) in results.iter_mut().zip(assign_ranks_in_order(&values)) {
            result.total.rank = rank;
        }

        TeamStandings {
            code: "rr-team".to_string(),
            title: "Round Robin Team".to_string(),
            event_numbers: event_numbers.into_iter().collect(),
            results,
        }
    }

    /// Builds every standard competition for the season.
    pub fn build_all(&self, rides: &[Ride], rules: &CompetitionRules) -> SeasonStandings {
        let definitions = standard_competitions(self.calendar, rules);
        let competitions: Vec<CompetitionStandings> =
            definitions.iter().map(|d| self.build(d, rides)).collect();
        let round_robin_team = self.build_team(rides, rules);

        info!(
            "Built {} competitions and {} round robin teams",
            competitions.len(),
            round_robin_team.results.len()
        );

        SeasonStandings {
            competitions,
            round_robin_team,
        }
    }
}

/// The club's competitions for a season, configured from resolved rules.
pub fn standard_competitions<'c>(
    calendar: &CalendarRepository<'c>,
    rules: &CompetitionRules,
) -> Vec<CompetitionDefinition<'c>> {
    let championship = calendar.championship_events();
    let club_rule = ScoringRule::TenMileAndMixed {
        ten_mile_count: rules.ten_mile_count,
        non_ten_minimum: rules.non_ten_minimum,
        mixed_event_count: rules.mixed_event_count,
    };

    let mut definitions = vec![
        CompetitionDefinition::new("juveniles", "Juveniles", championship.clone(), Category::Juveniles, club_rule)
            .with_filter(|_, c| c.is_some_and(|c| c.is_juvenile())),
        CompetitionDefinition::new("juniors", "Juniors", championship.clone(), Category::Juniors, club_rule)
            .with_filter(|_, c| c.is_some_and(|c| c.is_junior())),
        CompetitionDefinition::new("seniors", "Seniors", championship.clone(), Category::Seniors, club_rule)
            .with_filter(|_, c| c.is_some_and(|c| c.is_senior())),
        CompetitionDefinition::new("women", "Women", championship.clone(), Category::Women, club_rule)
            .with_filter(|_, c| c.is_some_and(|c| c.is_female)),
        CompetitionDefinition::new("veterans", "Veterans", championship.clone(), Category::Veterans, club_rule)
            .with_filter(|_, c| c.is_some_and(|c| c.is_veteran())),
        CompetitionDefinition::new(
            "road-bike-men",
            "Road Bike Men",
            championship.clone(),
            Category::RoadBikeMen,
            club_rule,
        )
        .with_filter(|ride, c| ride.is_road_bike && c.is_some_and(|c| !c.is_female)),
        CompetitionDefinition::new(
            "road-bike-women",
            "Road Bike Women",
            championship.clone(),
            Category::RoadBikeWomen,
            club_rule,
        )
        .with_filter(|ride, c| ride.is_road_bike && c.is_some_and(|c| c.is_female)),
    ];

    for league in League::ALL {
        let title = match rules.league_sponsor.as_deref() {
            Some(sponsor) => format!("{} League - {}", sponsor, league),
            None => format!("League - {}", league),
        };
        definitions.push(
            CompetitionDefinition::new(
                format!("league-{}", league.code()),
                title,
                championship.clone(),
                Category::League,
                club_rule,
            )
            .with_filter(move |_, c| c.is_some_and(|c| c.league == league)),
        );
    }

    let nev_brooks_events: Vec<&CalendarEvent> = championship
        .iter()
        .copied()
        .filter(|e| e.is_ten_mile())
        .skip(1)
        .collect();
    definitions.push(CompetitionDefinition::new(
        "nev-brooks",
        "Nev Brooks",
        nev_brooks_events,
        Category::NevBrooks,
        ScoringRule::BestOf {
            count: rules.ten_mile_count,
            minimum: 0,
        },
    ));

    let round_robin_events = calendar.round_robin_events();
    let round_robin_rule = ScoringRule::BestOf {
        count: rules.round_robin.count,
        minimum: rules.round_robin.minimum,
    };
    definitions.push(CompetitionDefinition::new(
        "rr-open",
        "Round Robin Open",
        round_robin_events.clone(),
        Category::RoundRobinOpen,
        round_robin_rule,
    ));
    definitions.push(CompetitionDefinition::new(
        "rr-women",
        "Round Robin Women",
        round_robin_events,
        Category::RoundRobinWomen,
        round_robin_rule,
    ));

    definitions
}
