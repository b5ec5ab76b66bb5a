pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use error::{Result, ScoringError};
pub use services::{CompetitionResultsAggregator, RideProcessingCoordinator, ScoringOptions};
