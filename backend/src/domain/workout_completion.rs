//! Workout completion: XP calculation, class bonus, credit, achievements.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use super::class_bonus::apply_class_bonus;
use super::ports::{
    AchievementCheckCommand, CompleteWorkoutRequest, PersonalRecordRepository, ProfileRepository,
    WorkoutCompletionCommand, WorkoutCompletionOutcome, WorkoutRepository, XpCreditOutcome,
};
use super::retry::RetryExecutor;
use super::xp::{calculate_xp_components, personal_record_bonus};
use super::Error;

/// Port bundle required by [`WorkoutCompletionService`].
#[derive(Clone)]
pub struct WorkoutCompletionPorts {
    pub workouts: Arc<dyn WorkoutRepository>,
    pub records: Arc<dyn PersonalRecordRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub achievements: Arc<dyn AchievementCheckCommand>,
}

/// Completion service implementing [`WorkoutCompletionCommand`].
pub struct WorkoutCompletionService {
    ports: WorkoutCompletionPorts,
    retry: RetryExecutor,
}

impl WorkoutCompletionService {
    pub fn new(ports: WorkoutCompletionPorts, retry: RetryExecutor) -> Self {
        Self { ports, retry }
    }
}

#[async_trait]
impl WorkoutCompletionCommand for WorkoutCompletionService {
    #[instrument(skip_all, fields(user_id = %request.user_id, workout_id = %request.workout_id))]
    async fn complete_workout(
        &self,
        request: CompleteWorkoutRequest,
    ) -> Result<WorkoutCompletionOutcome, Error> {
        let CompleteWorkoutRequest {
            user_id,
            workout_id,
        } = request;

        let workout = self
            .ports
            .workouts
            .find_by_id(&user_id, &workout_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("workout {workout_id} not found")))?;
        if !workout.is_completed() {
            return Err(Error::validation(format!(
                "workout {workout_id} has not been completed"
            )));
        }

        let records = self
            .ports
            .records
            .count_for_workout(&user_id, &workout_id)
            .await?;
        let profile = self
            .ports
            .profiles
            .find(&user_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("no profile exists for user {user_id}")))?;

        let components = calculate_xp_components(&workout.snapshot, personal_record_bonus(records));
        let class_bonus = apply_class_bonus(
            &components,
            &workout.snapshot,
            profile.class.as_deref(),
            profile.streak,
        );

        let credit = self
            .retry
            .execute(
                "credit_workout_xp",
                || {
                    self.ports
                        .profiles
                        .credit_workout_xp(&user_id, &workout_id, class_bonus.total_xp)
                },
                |err| err.is_transient(),
            )
            .await?;

        let (xp_awarded, already_credited, profile) = match credit {
            XpCreditOutcome::Credited(profile) => (class_bonus.total_xp, false, profile),
            XpCreditOutcome::AlreadyCredited(profile) => (0, true, profile),
        };
        info!(xp_awarded, already_credited, level = profile.level, "workout xp processed");

        let (achievements, achievement_error) =
            match self.ports.achievements.check_achievements(&user_id).await {
                Ok(report) => (Some(report), None),
                Err(error) => {
                    warn!(%error, "achievement processing failed; completion stands");
                    (None, Some(error))
                }
            };

        Ok(WorkoutCompletionOutcome {
            workout_id,
            components,
            class_bonus,
            xp_awarded,
            already_credited,
            profile,
            achievements,
            achievement_error,
        })
    }
}

#[cfg(test)]
mod tests;
