// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod weights;

pub use domain::{
    DaySchedule, GeoPoint, JobProfileEntry, MatchResult, PayRange, Profile, Skill, TimeSlot,
    Weekday, WeeklyAvailability,
};
pub use requests::CalculateMatchRequest;
pub use responses::{ErrorResponse, HealthResponse};
pub use weights::{Factor, ScoreGroup, ScoringWeights, WeightsError, MAX_SCORE};
