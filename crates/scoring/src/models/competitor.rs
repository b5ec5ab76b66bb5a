use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AgeGroup, ClaimStatus, League};

/// One version of a club member's attributes, effective from `created_utc`.
///
/// Snapshots are never mutated by the engine; scoring selects the version
/// in effect on each event date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSnapshot {
    pub club_number: u32,
    pub surname: String,
    pub given_name: String,
    pub claim_status: ClaimStatus,
    pub is_female: bool,
    pub age_group: AgeGroup,
    /// Present only for veterans.
    pub vets_bucket: Option<u8>,
    #[serde(default)]
    pub league: League,
    pub created_utc: DateTime<Utc>,
}

impl CompetitorSnapshot {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }

    pub fn is_juvenile(&self) -> bool {
        self.age_group == AgeGroup::Juvenile
    }

    pub fn is_junior(&self) -> bool {
        self.age_group == AgeGroup::Junior
    }

    pub fn is_senior(&self) -> bool {
        self.age_group == AgeGroup::Senior
    }

    pub fn is_veteran(&self) -> bool {
        self.age_group == AgeGroup::Veteran
    }

    pub fn is_second_claim(&self) -> bool {
        self.claim_status == ClaimStatus::SecondClaim
    }

    /// Second claim members are excluded unless their club number is listed in `overrides`.
    pub fn is_eligible(&self, overrides: &[u32]) -> bool {
        !self.is_second_claim() || overrides.contains(&self.club_number)
    }
}
