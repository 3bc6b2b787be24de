//! PostgreSQL-backed `AchievementProgressRepository`.
//!
//! Writes use `ON CONFLICT (user_id, achievement_id) DO UPDATE`, keeping
//! `is_complete` sticky with `achievement_progress.is_complete OR
//! excluded.is_complete`. A batch is checked against the catalogue and
//! written in one transaction.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::UserId;
use crate::domain::achievements::{AchievementId, AchievementProgress, ProgressUpdate};
use crate::domain::ports::{AchievementProgressRepository, AchievementProgressRepositoryError};

use super::diesel_basic_error_mapping::{self as mapping, to_i64, to_unsigned};
use super::models::{AchievementProgressRow, NewAchievementProgressRow};
use super::pool::{DbPool, PoolError};
use super::schema::{achievement_progress, achievements};

#[derive(Clone)]
pub struct DieselAchievementProgressRepository {
    pool: DbPool,
}

impl DieselAchievementProgressRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AchievementProgressRepositoryError {
    mapping::map_pool_error(
        error,
        AchievementProgressRepositoryError::connection,
        AchievementProgressRepositoryError::timeout,
    )
}

fn map_diesel_error(error: diesel::result::Error) -> AchievementProgressRepositoryError {
    mapping::map_diesel_error(
        error,
        AchievementProgressRepositoryError::query,
        AchievementProgressRepositoryError::connection,
    )
}

enum BatchFailure {
    Diesel(diesel::result::Error),
    Unknown(String),
}

impl From<diesel::result::Error> for BatchFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

/// First id in `requested` that is missing from `known`.
fn first_unknown<'a>(requested: &[&'a str], known: &[String]) -> Option<&'a str> {
    let known: BTreeSet<&str> = known.iter().map(String::as_str).collect();
    requested.iter().copied().find(|id| !known.contains(id))
}

#[async_trait]
impl AchievementProgressRepository for DieselAchievementProgressRepository {
    async fn find(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<Option<AchievementProgress>, AchievementProgressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AchievementProgressRow> = achievement_progress::table
            .filter(achievement_progress::user_id.eq(user_id.as_uuid()))
            .filter(achievement_progress::achievement_id.eq(achievement_id.as_ref()))
            .select(AchievementProgressRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| AchievementProgress {
            current: to_unsigned(row.current_value),
            total: to_unsigned(row.target_value),
            is_complete: row.is_complete,
        }))
    }

    async fn upsert(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), AchievementProgressRepositoryError> {
        self.upsert_batch(user_id, std::slice::from_ref(update)).await
    }

    async fn upsert_batch(
        &self,
        user_id: &UserId,
        updates: &[ProgressUpdate],
    ) -> Result<(), AchievementProgressRepositoryError> {
        if updates.is_empty() {
            return Ok(());
        }
        let now = Utc::now();
        let user_uuid = *user_id.as_uuid();
        let rows: Vec<NewAchievementProgressRow<'_>> = updates
            .iter()
            .map(|update| NewAchievementProgressRow {
                user_id: user_uuid,
                achievement_id: update.achievement_id.as_ref(),
                current_value: to_i64(update.current_value),
                target_value: to_i64(update.target_value),
                is_complete: update.is_complete,
                updated_at: now,
            })
            .collect();
        let requested: Vec<&str> = rows.iter().map(|row| row.achievement_id).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, BatchFailure, _>(|conn| {
            async move {
                let known: Vec<String> = achievements::table
                    .filter(achievements::id.eq_any(requested.clone()))
                    .select(achievements::id)
                    .load(conn)
                    .await?;
                if let Some(unknown) = first_unknown(&requested, &known) {
                    return Err(BatchFailure::Unknown(unknown.to_owned()));
                }

                diesel::insert_into(achievement_progress::table)
                    .values(&rows)
                    .on_conflict((
                        achievement_progress::user_id,
                        achievement_progress::achievement_id,
                    ))
                    .do_update()
                    .set((
                        achievement_progress::current_value
                            .eq(excluded(achievement_progress::current_value)),
                        achievement_progress::target_value
                            .eq(excluded(achievement_progress::target_value)),
                        achievement_progress::is_complete.eq(achievement_progress::is_complete
                            .or(excluded(achievement_progress::is_complete))),
                        achievement_progress::updated_at
                            .eq(excluded(achievement_progress::updated_at)),
                    ))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| match failure {
            BatchFailure::Diesel(err) => map_diesel_error(err),
            BatchFailure::Unknown(id) => AchievementProgressRepositoryError::unknown_achievement(id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["streak-3", "streak-7"], &["streak-3", "streak-7"], None)]
    #[case(&["streak-3", "ghost"], &["streak-3"], Some("ghost"))]
    #[case(&[], &[], None)]
    fn unknown_ids_are_detected(
        #[case] requested: &[&str],
        #[case] known: &[&str],
        #[case] expected: Option<&str>,
    ) {
        let known: Vec<String> = known.iter().map(|id| (*id).to_owned()).collect();
        assert_eq!(first_unknown(requested, &known), expected);
    }
}
