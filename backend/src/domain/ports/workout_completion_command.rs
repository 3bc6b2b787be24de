//! Driving port for completing a workout.
//!
//! Completing a workout computes its XP, applies the user's class bonus,
//! credits the result once per workout, and then evaluates achievements.
//! Achievement processing is best-effort: its failures are reported in the
//! response and never fail the completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::class_bonus::ClassBonusResult;
use crate::domain::coordinator::AchievementCheckReport;
use crate::domain::xp::XpComponents;
use crate::domain::{Error, UserId, UserProfile, WorkoutId};

/// Request to complete a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWorkoutRequest {
    pub user_id: UserId,
    pub workout_id: WorkoutId,
}

/// Result of a workout completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCompletionOutcome {
    pub workout_id: WorkoutId,
    pub components: XpComponents,
    pub class_bonus: ClassBonusResult,
    /// XP added by this call; zero when the workout was credited before.
    pub xp_awarded: u32,
    pub already_credited: bool,
    pub profile: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<AchievementCheckReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievement_error: Option<Error>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutCompletionCommand: Send + Sync {
    /// # Errors
    ///
    /// - `NotFound` when the workout or profile does not exist.
    /// - `Validation` when the workout has not been marked completed.
    /// - `Database`/`Network` when the XP credit cannot be persisted.
    async fn complete_workout(
        &self,
        request: CompleteWorkoutRequest,
    ) -> Result<WorkoutCompletionOutcome, Error>;
}
