pub mod standings;
pub mod summary;

pub use standings::{
    CompetitionScore, CompetitionStandings, CompetitorResult, SeasonStandings, TeamResult, TeamStandings,
};
pub use summary::ProcessingSummary;
