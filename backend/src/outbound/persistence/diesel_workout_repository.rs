//! PostgreSQL-backed `WorkoutRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_distinct;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{WorkoutRepository, WorkoutRepositoryError};
use crate::domain::{Exercise, UserId, Workout, WorkoutId, WorkoutSnapshot};

use super::diesel_basic_error_mapping::{self as mapping, count_to_u32, to_unsigned};
use super::models::WorkoutRow;
use super::pool::{DbPool, PoolError};
use super::schema::workouts;

#[derive(Clone)]
pub struct DieselWorkoutRepository {
    pool: DbPool,
}

impl DieselWorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WorkoutRepositoryError {
    mapping::map_pool_error(
        error,
        WorkoutRepositoryError::connection,
        WorkoutRepositoryError::timeout,
    )
}

fn map_diesel_error(error: diesel::result::Error) -> WorkoutRepositoryError {
    mapping::map_diesel_error(
        error,
        WorkoutRepositoryError::query,
        WorkoutRepositoryError::connection,
    )
}

fn row_to_workout(row: WorkoutRow) -> Result<Workout, WorkoutRepositoryError> {
    let exercises: Vec<Exercise> = serde_json::from_value(row.exercises).map_err(|err| {
        WorkoutRepositoryError::corrupt(format!("workout {}: {err}", row.id))
    })?;
    Ok(Workout {
        id: WorkoutId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        started_at: row.started_at,
        completed_at: row.completed_at,
        activity_type: row.activity_type,
        is_manual: row.is_manual,
        snapshot: WorkoutSnapshot::new(exercises, to_unsigned(row.duration_seconds)),
    })
}

#[async_trait]
impl WorkoutRepository for DieselWorkoutRepository {
    async fn find_by_id(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
    ) -> Result<Option<Workout>, WorkoutRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<WorkoutRow> = workouts::table
            .filter(workouts::id.eq(workout_id.as_uuid()))
            .filter(workouts::user_id.eq(user_id.as_uuid()))
            .select(WorkoutRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_workout).transpose()
    }

    async fn count_completed(&self, user_id: &UserId) -> Result<u32, WorkoutRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = workouts::table
            .filter(workouts::user_id.eq(user_id.as_uuid()))
            .filter(workouts::completed_at.is_not_null())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u32(count))
    }

    async fn count_manual(&self, user_id: &UserId) -> Result<u32, WorkoutRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = workouts::table
            .filter(workouts::user_id.eq(user_id.as_uuid()))
            .filter(workouts::completed_at.is_not_null())
            .filter(workouts::is_manual.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u32(count))
    }

    async fn list_completion_times(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DateTime<Utc>>, WorkoutRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let times: Vec<Option<DateTime<Utc>>> = workouts::table
            .filter(workouts::user_id.eq(user_id.as_uuid()))
            .filter(workouts::completed_at.is_not_null())
            .select(workouts::completed_at)
            .order_by(workouts::completed_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(times.into_iter().flatten().collect())
    }

    async fn distinct_activity_types(
        &self,
        user_id: &UserId,
    ) -> Result<u32, WorkoutRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = workouts::table
            .filter(workouts::user_id.eq(user_id.as_uuid()))
            .filter(workouts::completed_at.is_not_null())
            .select(count_distinct(workouts::activity_type))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u32(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    fn row(exercises: serde_json::Value) -> WorkoutRow {
        WorkoutRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            activity_type: Some("strength".into()),
            is_manual: false,
            duration_seconds: 1_800,
            exercises,
        }
    }

    #[rstest]
    fn rows_decode_exercise_json() {
        let workout = row_to_workout(row(json!([
            { "id": "squat", "kind": "strength", "sets": [{ "weight": 80.0, "reps": 5, "completed": true }] }
        ])))
        .expect("decodes");
        assert_eq!(workout.snapshot.completed_sets(), 1);
        assert_eq!(workout.snapshot.duration_minutes(), 30);
    }

    #[rstest]
    fn malformed_exercise_json_is_corrupt() {
        let err = row_to_workout(row(json!({ "not": "a list" }))).expect_err("corrupt");
        assert!(matches!(err, WorkoutRepositoryError::Corrupt { .. }));
        assert!(!err.is_transient());
    }

    #[rstest]
    fn pool_timeouts_are_transient() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(err.is_transient());
    }
}
