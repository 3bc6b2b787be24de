//! Path parameter validation for inbound HTTP adapters.

use serde_json::json;

use crate::domain::achievements::AchievementId;
use crate::domain::{Error, UserId, WorkoutId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    InvalidUuid,
    InvalidId,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidId => "invalid_id",
        }
    }
}

fn invalid_field(field: &str, value: &str, message: String, code: ValidationCode) -> Error {
    Error::validation(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| {
        invalid_field("userId", raw, err.to_string(), ValidationCode::InvalidUuid)
    })
}

pub(crate) fn parse_workout_id(raw: &str) -> Result<WorkoutId, Error> {
    WorkoutId::new(raw).map_err(|err| {
        invalid_field(
            "workoutId",
            raw,
            err.message().to_owned(),
            ValidationCode::InvalidUuid,
        )
    })
}

pub(crate) fn parse_achievement_id(raw: &str) -> Result<AchievementId, Error> {
    AchievementId::new(raw).map_err(|err| {
        invalid_field("achievementId", raw, err.to_string(), ValidationCode::InvalidId)
    })
}
