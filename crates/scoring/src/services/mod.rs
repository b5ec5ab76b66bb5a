pub mod aggregator;
pub mod calculators;
pub mod coordinator;
pub mod nev_brooks;
pub mod points_table;
pub mod ranking;
pub mod rules;
pub mod vets_handicap;

pub use aggregator::{CompetitionDefinition, CompetitionResultsAggregator, ScoringRule, standard_competitions};
pub use coordinator::{HOME_CLUB, RideProcessingCoordinator, ScoringOptions};
pub use nev_brooks::NevBrooksGenerator;
pub use points_table::{PointsAllocation, PointsTable};
pub use rules::{CompetitionRules, CompetitionRulesProvider, SeasonRules};
pub use vets_handicap::{StandardsCatalog, VetsHandicapProvider, VetsStandards};
