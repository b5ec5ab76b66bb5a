pub mod calendar_event;
pub mod category;
pub mod competitor;
pub mod decorated_name;
pub mod enums;
pub mod ride;
pub mod round_robin;

pub use calendar_event::CalendarEvent;
pub use category::Category;
pub use competitor::CompetitorSnapshot;
pub use decorated_name::DecoratedName;
pub use enums::{AgeGroup, ClaimStatus, League, RideStatus};
pub use ride::{NevBrooksHandicap, Placing, Ride, RideScores};
pub use round_robin::RoundRobinRider;
