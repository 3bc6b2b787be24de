//! Port for personal record counts.

use async_trait::async_trait;

use crate::domain::{UserId, WorkoutId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by personal record repository adapters.
    pub enum PersonalRecordRepositoryError {
        Connection { message: String } @ Database =>
            "personal record repository connection failed: {message}",
        Query { message: String } @ Database =>
            "personal record repository query failed: {message}",
        Timeout { message: String } @ Network =>
            "personal record repository timed out: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonalRecordRepository: Send + Sync {
    /// Lifetime personal records for the user.
    async fn count_for_user(&self, user_id: &UserId) -> Result<u32, PersonalRecordRepositoryError>;

    /// Personal records set during one workout.
    async fn count_for_workout(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
    ) -> Result<u32, PersonalRecordRepositoryError>;
}

/// Fixture implementation: the user has never set a record.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePersonalRecordRepository;

#[async_trait]
impl PersonalRecordRepository for FixturePersonalRecordRepository {
    async fn count_for_user(&self, _user_id: &UserId) -> Result<u32, PersonalRecordRepositoryError> {
        Ok(0)
    }

    async fn count_for_workout(
        &self,
        _user_id: &UserId,
        _workout_id: &WorkoutId,
    ) -> Result<u32, PersonalRecordRepositoryError> {
        Ok(0)
    }
}
