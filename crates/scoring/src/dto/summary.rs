use serde::{Deserialize, Serialize};

/// Counts reported after a scoring run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub events_scored: usize,
    pub events_cancelled: usize,
    pub rides_processed: usize,
    pub placings_awarded: usize,
}
