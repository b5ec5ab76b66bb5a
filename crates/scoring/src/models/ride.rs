use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::enums::RideStatus;

/// Position and points earned in one category for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placing {
    pub position: u32,
    pub points: Decimal,
}

/// Dynamic handicap fields for the Nev Brooks competition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NevBrooksHandicap {
    pub seconds_generated: Option<Decimal>,
    pub seconds_applied: Option<Decimal>,
    pub seconds_adjusted_time: Option<Decimal>,
    pub placing: Option<Placing>,
}

/// Everything the engine writes onto a ride. A default value means "not scored".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RideScores {
    pub juveniles: Option<Placing>,
    pub juniors: Option<Placing>,
    pub seniors: Option<Placing>,
    pub women: Option<Placing>,
    pub veterans: Option<Placing>,
    pub road_bike_men: Option<Placing>,
    pub road_bike_women: Option<Placing>,
    pub league: Option<Placing>,
    pub round_robin: Option<Placing>,
    pub round_robin_women: Option<Placing>,

    pub event_rank: Option<u32>,
    pub event_eligible_riders_rank: Option<u32>,
    pub event_road_bike_rank: Option<u32>,
    pub event_eligible_road_bike_riders_rank: Option<u32>,

    pub handicap_seconds: Option<Decimal>,
    pub handicap_total_seconds: Option<Decimal>,

    pub nev_brooks: NevBrooksHandicap,
}

/// One rider's result in one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    pub event_number: u32,
    /// `None` for guests who are not club members.
    pub club_number: Option<u32>,
    pub name: String,
    /// Club code of a non-member riding in a round robin event.
    #[serde(default)]
    pub round_robin_club: Option<String>,
    pub total_seconds: Decimal,
    #[serde(default)]
    pub is_road_bike: bool,
    pub status: RideStatus,
    #[serde(default)]
    pub scores: RideScores,
}

impl Ride {
    pub fn is_valid(&self) -> bool {
        self.status == RideStatus::Valid
    }

    pub fn clear_scores(&mut self) {
        self.scores = RideScores::default();
    }

    pub fn placing(&self, category: Category) -> Option<Placing> {
        match category {
            Category::Juveniles => self.scores.juveniles,
            Category::Juniors => self.scores.juniors,
            Category::Seniors => self.scores.seniors,
            Category::Women => self.scores.women,
            Category::Veterans => self.scores.veterans,
            Category::RoadBikeMen => self.scores.road_bike_men,
            Category::RoadBikeWomen => self.scores.road_bike_women,
            Category::League => self.scores.league,
            Category::NevBrooks => self.scores.nev_brooks.placing,
            Category::RoundRobinOpen => self.scores.round_robin,
            Category::RoundRobinWomen => self.scores.round_robin_women,
        }
    }

    pub fn placing_mut(&mut self, category: Category) -> &mut Option<Placing> {
        match category {
            Category::Juveniles => &mut self.scores.juveniles,
            Category::Juniors => &mut self.scores.juniors,
            Category::Seniors => &mut self.scores.seniors,
            Category::Women => &mut self.scores.women,
            Category::Veterans => &mut self.scores.veterans,
            Category::RoadBikeMen => &mut self.scores.road_bike_men,
            Category::RoadBikeWomen => &mut self.scores.road_bike_women,
            Category::League => &mut self.scores.league,
            Category::NevBrooks => &mut self.scores.nev_brooks.placing,
            Category::RoundRobinOpen => &mut self.scores.round_robin,
            Category::RoundRobinWomen => &mut self.scores.round_robin_women,
        }
    }

    pub fn points(&self, category: Category) -> Option<Decimal> {
        self.placing(category).map(|p| p.points)
    }
}
