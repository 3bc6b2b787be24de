//! PostgreSQL-backed `PersonalRecordRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersonalRecordRepository, PersonalRecordRepositoryError};
use crate::domain::{UserId, WorkoutId};

use super::diesel_basic_error_mapping::{self as mapping, count_to_u32};
use super::pool::{DbPool, PoolError};
use super::schema::personal_records;

#[derive(Clone)]
pub struct DieselPersonalRecordRepository {
    pool: DbPool,
}

impl DieselPersonalRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PersonalRecordRepositoryError {
    mapping::map_pool_error(
        error,
        PersonalRecordRepositoryError::connection,
        PersonalRecordRepositoryError::timeout,
    )
}

fn map_diesel_error(error: diesel::result::Error) -> PersonalRecordRepositoryError {
    mapping::map_diesel_error(
        error,
        PersonalRecordRepositoryError::query,
        PersonalRecordRepositoryError::connection,
    )
}

#[async_trait]
impl PersonalRecordRepository for DieselPersonalRecordRepository {
    async fn count_for_user(&self, user_id: &UserId) -> Result<u32, PersonalRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = personal_records::table
            .filter(personal_records::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u32(count))
    }

    async fn count_for_workout(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
    ) -> Result<u32, PersonalRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = personal_records::table
            .filter(personal_records::user_id.eq(user_id.as_uuid()))
            .filter(personal_records::workout_id.eq(workout_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u32(count))
    }
}
