//! PostgreSQL-backed `ProfileRepository` with idempotent workout XP credit.
//!
//! The credit runs in one transaction: the profile row is locked, a
//! `workout_xp_credits` row keyed on the workout id is inserted with
//! `ON CONFLICT DO NOTHING`, and only a fresh insert updates XP, level, and
//! workout count.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError, XpCreditOutcome};
use crate::domain::{UserId, UserProfile, WorkoutId};

use super::diesel_basic_error_mapping::{self as mapping, to_i32, to_i64, to_unsigned};
use super::models::{NewWorkoutXpCreditRow, ProfileRow, ProfileXpUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{profiles, workout_xp_credits};

#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    mapping::map_pool_error(
        error,
        ProfileRepositoryError::connection,
        ProfileRepositoryError::timeout,
    )
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    mapping::map_diesel_error(
        error,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

pub(super) fn row_to_profile(row: ProfileRow) -> UserProfile {
    UserProfile {
        user_id: UserId::from_uuid(row.user_id),
        level: u32::try_from(row.level).unwrap_or(1).max(1),
        xp: to_unsigned(row.xp),
        streak: u32::try_from(row.streak).unwrap_or_default(),
        class: row.class,
        workouts_count: u32::try_from(row.workouts_count).unwrap_or_default(),
    }
}

pub(super) fn xp_update(profile: &UserProfile) -> ProfileXpUpdate {
    ProfileXpUpdate {
        level: to_i32(profile.level),
        xp: to_i64(profile.xp),
        workouts_count: to_i32(profile.workouts_count),
        updated_at: Utc::now(),
    }
}

enum CreditFailure {
    Diesel(diesel::result::Error),
    MissingProfile,
}

impl From<diesel::result::Error> for CreditFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::user_id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn credit_workout_xp(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
        xp: u32,
    ) -> Result<XpCreditOutcome, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user_id.as_uuid();
        let workout_uuid = *workout_id.as_uuid();

        let outcome = conn
            .transaction::<_, CreditFailure, _>(|conn| {
                async move {
                    let row: Option<ProfileRow> = profiles::table
                        .filter(profiles::user_id.eq(user_uuid))
                        .select(ProfileRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let mut profile = row.map(row_to_profile).ok_or(CreditFailure::MissingProfile)?;

                    let inserted = diesel::insert_into(workout_xp_credits::table)
                        .values(&NewWorkoutXpCreditRow {
                            workout_id: workout_uuid,
                            user_id: user_uuid,
                            xp: to_i32(xp),
                            credited_at: Utc::now(),
                        })
                        .on_conflict(workout_xp_credits::workout_id)
                        .do_nothing()
                        .execute(conn)
                        .await?;
                    if inserted == 0 {
                        return Ok(XpCreditOutcome::AlreadyCredited(profile));
                    }

                    profile.credit_xp(u64::from(xp));
                    profile.workouts_count = profile.workouts_count.saturating_add(1);
                    diesel::update(profiles::table.filter(profiles::user_id.eq(user_uuid)))
                        .set(&xp_update(&profile))
                        .execute(conn)
                        .await?;
                    Ok(XpCreditOutcome::Credited(profile))
                }
                .scope_boxed()
            })
            .await
            .map_err(|failure| match failure {
                CreditFailure::Diesel(err) => map_diesel_error(err),
                CreditFailure::MissingProfile => {
                    ProfileRepositoryError::missing_profile(user_id.to_string())
                }
            })?;

        debug!(%user_id, %workout_id, credited = outcome.is_credited(), "xp credit settled");
        Ok(outcome)
    }
}
