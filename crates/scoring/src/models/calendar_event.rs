use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One event in the season calendar. Event numbers are unique within a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
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
    /// Host club code for round robin events.
    #[serde(default)]
    pub round_robin_club: Option<String>,
}

impl CalendarEvent {
    /// Start of the event day in UTC; snapshots created at or before this instant apply.
    pub fn event_date_utc(&self) -> DateTime<Utc> {
        self.event_date.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn is_ten_mile(&self) -> bool {
        self.is_evening10
    }
}
