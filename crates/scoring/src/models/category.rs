use serde::{Deserialize, Serialize};
use std::fmt;

/// A per-event scoring category. Each one owns a position/points slot on `Ride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Juveniles,
    Juniors,
    Seniors,
    Women,
    Veterans,
    RoadBikeMen,
    RoadBikeWomen,
    League,
    NevBrooks,
    RoundRobinOpen,
    RoundRobinWomen,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Juveniles => "Juveniles",
            Category::Juniors => "Juniors",
            Category::Seniors => "Seniors",
            Category::Women => "Women",
            Category::Veterans => "Veterans",
            Category::RoadBikeMen => "Road Bike Men",
            Category::RoadBikeWomen => "Road Bike Women",
            Category::League => "League",
            Category::NevBrooks => "Nev Brooks",
            Category::RoundRobinOpen => "Round Robin Open",
            Category::RoundRobinWomen => "Round Robin Women",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
