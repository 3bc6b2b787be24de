//! PostgreSQL-backed `AchievementAwardRepository`.
//!
//! An award is one transaction: lock the profile, insert into
//! `user_achievements` with `ON CONFLICT DO NOTHING`, and credit the reward
//! only when the insert created a row. Two concurrent awards of the same
//! achievement therefore credit XP once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::UserId;
use crate::domain::achievements::{Achievement, AchievementId};
use crate::domain::ports::{
    AchievementAwardRepository, AchievementAwardRepositoryError, AwardOutcome,
};

use super::diesel_basic_error_mapping as mapping;
use super::diesel_profile_repository::{row_to_profile, xp_update};
use super::models::{NewUserAchievementRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{profiles, user_achievements};

#[derive(Clone)]
pub struct DieselAchievementAwardRepository {
    pool: DbPool,
}

impl DieselAchievementAwardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AchievementAwardRepositoryError {
    mapping::map_pool_error(
        error,
        AchievementAwardRepositoryError::connection,
        AchievementAwardRepositoryError::timeout,
    )
}

fn map_diesel_error(error: diesel::result::Error) -> AchievementAwardRepositoryError {
    mapping::map_diesel_error(
        error,
        AchievementAwardRepositoryError::query,
        AchievementAwardRepositoryError::connection,
    )
}

enum AwardFailure {
    Diesel(diesel::result::Error),
    MissingProfile,
}

impl From<diesel::result::Error> for AwardFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

#[async_trait]
impl AchievementAwardRepository for DieselAchievementAwardRepository {
    async fn awarded_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AchievementId>, AchievementAwardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<String> = user_achievements::table
            .filter(user_achievements::user_id.eq(user_id.as_uuid()))
            .select(user_achievements::achievement_id)
            .order_by(user_achievements::achievement_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        // Award rows reference validated definitions, so parse failures mean
        // the definition was since removed; such ids cannot be re-awarded.
        Ok(ids
            .into_iter()
            .filter_map(|id| AchievementId::new(id).ok())
            .collect())
    }

    async fn award(
        &self,
        user_id: &UserId,
        achievement: &Achievement,
        awarded_at: DateTime<Utc>,
    ) -> Result<AwardOutcome, AchievementAwardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user_id.as_uuid();
        let achievement_id = achievement.id().as_ref();
        let xp_reward = achievement.xp_reward();

        let outcome = conn
            .transaction::<_, AwardFailure, _>(|conn| {
                async move {
                    let row: Option<ProfileRow> = profiles::table
                        .filter(profiles::user_id.eq(user_uuid))
                        .select(ProfileRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let mut profile = row.map(row_to_profile).ok_or(AwardFailure::MissingProfile)?;

                    let inserted = diesel::insert_into(user_achievements::table)
                        .values(&NewUserAchievementRow {
                            user_id: user_uuid,
                            achievement_id,
                            awarded_at,
                        })
                        .on_conflict((user_achievements::user_id, user_achievements::achievement_id))
                        .do_nothing()
                        .execute(conn)
                        .await?;
                    if inserted == 0 {
                        return Ok(AwardOutcome::AlreadyAwarded);
                    }

                    if xp_reward > 0 {
                        profile.credit_xp(u64::from(xp_reward));
                        diesel::update(profiles::table.filter(profiles::user_id.eq(user_uuid)))
                            .set(&xp_update(&profile))
                            .execute(conn)
                            .await?;
                    }
                    Ok(AwardOutcome::Awarded {
                        xp_credited: xp_reward,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(|failure| match failure {
                AwardFailure::Diesel(err) => map_diesel_error(err),
                AwardFailure::MissingProfile => {
                    AchievementAwardRepositoryError::missing_profile(user_id.to_string())
                }
            })?;

        debug!(%user_id, achievement_id, ?outcome, "award settled");
        Ok(outcome)
    }
}
