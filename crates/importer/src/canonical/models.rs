use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "1.0.0";

/// One season of club results as exchanged between tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSeason {
    pub format_version: String,
    pub season: i32,
    pub calendar: Vec<CalendarEventData>,
    pub competitors: Vec<CompetitorData>,
    pub rides: Vec<RideData>,
    #[serde(default)]
    pub round_robin_riders: Vec<RoundRobinRiderData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_allocations: Option<Vec<PointsAllocationData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility_overrides: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventData {
    pub event_number: u32,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub miles: Decimal,
    #[serde(default)]
    pub is_evening10: bool,
    #[serde(default)]
    pub is_club_championship: bool,
    #[serde(default)]
    pub is_round_robin_event: bool,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub is_hard_ride_series: bool,
    #[serde(default)]
    pub is_non_standard_10: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_robin_club: Option<String>,
}

/// A membership snapshot. Enum-like fields stay textual until transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorData {
    pub club_number: u32,
    pub surname: String,
    pub given_name: String,
    pub claim_status: String,
    pub is_female: bool,
    pub age_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vets_bucket: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideData {
    pub event_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_number: Option<u32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_robin_club: Option<String>,
    pub total_seconds: Decimal,
    #[serde(default)]
    pub is_road_bike: bool,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRobinRiderData {
    pub name: String,
    pub round_robin_club: String,
    #[serde(default)]
    pub is_female: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsAllocationData {
    pub position: u32,
    pub points: Decimal,
}
