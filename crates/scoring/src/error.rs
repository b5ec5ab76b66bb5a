use rust_decimal::Decimal;
use thiserror::Error;

/// A ride whose club number has no snapshot in effect on the event date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCompetitor {
    pub club_number: u32,
    pub event_number: u32,
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(
        "Scoring aborted: missing competitors detected. Club numbers: [{}]. Affected rides: {}",
        join_club_numbers(.0),
        describe_missing(.0)
    )]
    MissingCompetitors(Vec<MissingCompetitor>),

    #[error("Rides reference event numbers missing from the calendar: [{}]", join_numbers(.0))]
    UnknownCalendarEvents(Vec<u32>),

    #[error("Duplicate calendar event numbers: {}", describe_duplicates(.0))]
    DuplicateCalendarEvents(Vec<(u32, usize)>),

    #[error("Round robin riders not found: {}", .0.join(", "))]
    MissingRoundRobinRiders(Vec<String>),

    #[error("Veteran with club number {club_number} has no vets bucket (event {event_number})")]
    MissingVetsBucket { club_number: u32, event_number: u32 },

    #[error("vetsBucket must be between 1 and 40 (inclusive), got {0}")]
    VetsBucketOutOfRange(u8),

    #[error("Unsupported distance {distance}. Supported distances: {supported}.")]
    UnsupportedDistance { distance: Decimal, supported: String },

    #[error("No standard found for bucket {bucket} at distance {distance}.")]
    NoStandardForBucket { bucket: u8, distance: Decimal },

    #[error("Veterans handicap failed for club number {club_number} in event {event_number}: {source}")]
    HandicapFailed {
        club_number: u32,
        event_number: u32,
        #[source]
        source: Box<ScoringError>,
    },

    #[error("No standards available for season {0}")]
    NoStandardsForSeason(i32),

    #[error("No competition rules configured for {0} or earlier.")]
    NoRulesForSeason(i32),

    #[error("Competition rules defined more than once for {0}")]
    DuplicateRules(i32),

    #[error("Invalid rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("Unsupported formula: {0}")]
    UnsupportedFormula(String),

    #[error("Invalid points table: {0}")]
    InvalidPointsTable(String),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, ScoringError>;

impl ScoringError {
    pub fn is_fatal_precondition(&self) -> bool {
        matches!(
            self,
            ScoringError::MissingCompetitors(_)
                | ScoringError::UnknownCalendarEvents(_)
                | ScoringError::DuplicateCalendarEvents(_)
                | ScoringError::MissingRoundRobinRiders(_)
        )
    }
}

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_club_numbers(missing: &[MissingCompetitor]) -> String {
    let mut clubs: Vec<u32> = missing.iter().map(|m| m.club_number).collect();
    clubs.sort_unstable();
    clubs.dedup();
    join_numbers(&clubs)
}

fn describe_missing(missing: &[MissingCompetitor]) -> String {
    missing
        .iter()
        .map(|m| format!("club {} in event {}", m.club_number, m.event_number))
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_duplicates(duplicates: &[(u32, usize)]) -> String {
    duplicates
        .iter()
        .map(|(number, count)| format!("{} (count={})", number, count))
        .collect::<Vec<_>>()
        .join(", ")
}
