pub mod calendar;
pub mod competitor;
pub mod round_robin;

pub use calendar::CalendarRepository;
pub use competitor::CompetitorRepository;
pub use round_robin::RoundRobinRiderRepository;
