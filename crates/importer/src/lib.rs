pub mod canonical;
pub mod error;
pub mod pipeline;
pub mod standards;

pub use error::{ImporterError, Result};
pub use pipeline::{SeasonInput, SeasonOutput, score_season};
pub use standards::StandardsLoader;
