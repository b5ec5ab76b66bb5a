use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points and rank for one view of a competition. A `None` rank means unranked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionScore {
    pub points: Option<Decimal>,
    pub rank: Option<u32>,
}

/// Season aggregate for one competitor in one competition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorResult {
    /// `None` for round robin guests.
    pub club_number: Option<u32>,
    pub display_name: String,
    pub surname: String,
    pub given_name: String,
    /// Points per event number for every counted ride.
    pub event_points: BTreeMap<u32, Decimal>,
    /// Event numbers whose points make up the full score, best first.
    pub scoring_events: Vec<u32>,
    pub events_completed_tens: u32,
    pub events_completed_other: u32,
    /// Met the minimum qualifying event count for a full season rank.
    pub qualified: bool,
    pub ten_mile: CompetitionScore,
    pub full: CompetitionScore,
    pub all_events: CompetitionScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionStandings {
    pub code: String,
    pub title: String,
    pub event_numbers: Vec<u32>,
    pub results: Vec<CompetitorResult>,
}

/// Round robin team score for one club.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResult {
    pub club: String,
    pub riders: Vec<String>,
    pub event_points: BTreeMap<u32, Decimal>,
    pub events_completed: u32,
    pub total: CompetitionScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStandings {
    pub code: String,
    pub title: String,
    pub event_numbers: Vec<u32>,
    pub results: Vec<TeamResult>,
}

/// Every standings table produced for a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonStandings {
    pub competitions: Vec<CompetitionStandings>,
    pub round_robin_team: TeamStandings,
}
