use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to read CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Scoring error: {0}")]
    ScoringError(#[from] scoring::ScoringError),

    #[error("Data transformation error: {0}")]
    TransformationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
