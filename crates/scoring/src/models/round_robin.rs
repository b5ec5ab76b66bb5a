use serde::{Deserialize, Serialize};

use super::decorated_name::DecoratedName;

/// A non-member riding in the inter-club round robin series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinRider {
    pub name: String,
    pub round_robin_club: String,
    #[serde(default)]
    pub is_female: bool,
}

impl RoundRobinRider {
    pub fn decorated_name(&self) -> DecoratedName {
        DecoratedName::new(&self.name, &self.round_robin_club)
    }
}
