//! Achievement definitions, requirement evaluation, and progress records.
//!
//! Definitions are read from the data store and validated on the way in:
//! category and rank must come from a fixed set, every requirement carries
//! a positive threshold for its declared kind, and free-text fields must be
//! non-empty. Unknown extra fields are tolerated so catalogue rows can grow
//! without breaking older readers.

mod model;
mod notification;
mod progress;
mod requirement;
mod validation;
pub mod weekly;

pub use model::{
    Achievement, AchievementCategory, AchievementDraft, AchievementId, AchievementRank,
};
pub use notification::AchievementNotification;
pub use progress::{AchievementProgress, ProgressUpdate};
pub use requirement::{
    CountSource, Requirement, RequirementKind, RequirementProgress, UserStatistics,
};
pub use validation::{parse_achievement, parse_catalogue};

use super::Error;

/// Validation errors returned by achievement constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AchievementValidationError {
    #[error("{field} must contain lowercase ASCII letters, digits, hyphens, or underscores")]
    InvalidId { field: &'static str },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("unknown achievement category: {value}")]
    UnknownCategory { value: String },
    #[error("unknown achievement rank: {value}")]
    UnknownRank { value: String },
    #[error("requirement {field} must be greater than zero")]
    ZeroThreshold { field: &'static str },
    #[error("malformed achievement: {message}")]
    Malformed { message: String },
    #[error("achievement {id} is defined more than once")]
    DuplicateId { id: String },
    #[error("catalogue entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<AchievementValidationError>,
    },
}

impl From<AchievementValidationError> for Error {
    fn from(value: AchievementValidationError) -> Self {
        Error::validation(value.to_string())
    }
}
