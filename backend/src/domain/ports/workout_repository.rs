//! Port for reading completed workouts.
//!
//! Checkers only need aggregates (counts, timestamps, distinct activity
//! labels), so the port exposes those directly instead of whole workout
//! lists.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{UserId, Workout, WorkoutId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by workout repository adapters.
    pub enum WorkoutRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } @ Database =>
            "workout repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } @ Database =>
            "workout repository query failed: {message}",
        /// The store did not answer in time.
        Timeout { message: String } @ Network =>
            "workout repository timed out: {message}",
        /// A stored row could not be decoded.
        Corrupt { message: String } @ Processing =>
            "stored workout is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Fetch one workout owned by `user_id`.
    async fn find_by_id(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
    ) -> Result<Option<Workout>, WorkoutRepositoryError>;

    /// Number of completed workouts.
    async fn count_completed(&self, user_id: &UserId) -> Result<u32, WorkoutRepositoryError>;

    /// Number of completed workouts logged manually.
    async fn count_manual(&self, user_id: &UserId) -> Result<u32, WorkoutRepositoryError>;

    /// Completion timestamps of every completed workout, oldest first.
    async fn list_completion_times(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DateTime<Utc>>, WorkoutRepositoryError>;

    /// Number of distinct activity types across completed workouts.
    async fn distinct_activity_types(&self, user_id: &UserId)
    -> Result<u32, WorkoutRepositoryError>;
}

/// Fixture implementation for tests where workouts are not under test.
///
/// The user has no workouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWorkoutRepository;

#[async_trait]
impl WorkoutRepository for FixtureWorkoutRepository {
    async fn find_by_id(
        &self,
        _user_id: &UserId,
        _workout_id: &WorkoutId,
    ) -> Result<Option<Workout>, WorkoutRepositoryError> {
        Ok(None)
    }

    async fn count_completed(&self, _user_id: &UserId) -> Result<u32, WorkoutRepositoryError> {
        Ok(0)
    }

    async fn count_manual(&self, _user_id: &UserId) -> Result<u32, WorkoutRepositoryError> {
        Ok(0)
    }

    async fn list_completion_times(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<DateTime<Utc>>, WorkoutRepositoryError> {
        Ok(Vec::new())
    }

    async fn distinct_activity_types(
        &self,
        _user_id: &UserId,
    ) -> Result<u32, WorkoutRepositoryError> {
        Ok(0)
    }
}
