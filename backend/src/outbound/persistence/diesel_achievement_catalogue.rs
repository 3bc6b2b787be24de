//! PostgreSQL-backed `AchievementCatalogue`.
//!
//! Rows are validated into [`Achievement`] on read; a row that fails
//! validation fails the read rather than being dropped silently.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::achievements::{Achievement, AchievementDraft, AchievementId};
use crate::domain::ports::{AchievementCatalogue, AchievementCatalogueError};

use super::diesel_basic_error_mapping::{self as mapping, to_i32};
use super::models::{AchievementRow, NewAchievementRow};
use super::pool::{DbPool, PoolError};
use super::schema::achievements;

#[derive(Clone)]
pub struct DieselAchievementCatalogue {
    pool: DbPool,
}

impl DieselAchievementCatalogue {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AchievementCatalogueError {
    mapping::map_pool_error(
        error,
        AchievementCatalogueError::connection,
        AchievementCatalogueError::timeout,
    )
}

fn map_diesel_error(error: diesel::result::Error) -> AchievementCatalogueError {
    mapping::map_diesel_error(
        error,
        AchievementCatalogueError::query,
        AchievementCatalogueError::connection,
    )
}

fn row_to_achievement(row: AchievementRow) -> Result<Achievement, AchievementCatalogueError> {
    let invalid = |id: &str, message: String| AchievementCatalogueError::invalid_definition(id, message);
    let requirements = serde_json::from_value(row.requirements)
        .map_err(|err| invalid(&row.id, format!("requirements: {err}")))?;
    let id = row.id.clone();
    Achievement::new(AchievementDraft {
        id: row.id,
        name: row.name,
        description: row.description,
        category: row.category,
        rank: row.rank,
        points: u32::try_from(row.points).unwrap_or_default(),
        xp_reward: u32::try_from(row.xp_reward).unwrap_or_default(),
        icon_name: row.icon_name,
        requirements,
    })
    .map_err(|err| invalid(&id, err.to_string()))
}

fn achievement_to_row(
    achievement: &Achievement,
) -> Result<NewAchievementRow<'_>, AchievementCatalogueError> {
    let requirements = serde_json::to_value(achievement.requirements()).map_err(|err| {
        AchievementCatalogueError::invalid_definition(achievement.id().as_ref(), err.to_string())
    })?;
    Ok(NewAchievementRow {
        id: achievement.id().as_ref(),
        name: achievement.name(),
        description: achievement.description(),
        category: achievement.category().as_str(),
        rank: achievement.rank().as_str(),
        points: to_i32(achievement.points()),
        xp_reward: to_i32(achievement.xp_reward()),
        icon_name: achievement.icon_name(),
        requirements,
        updated_at: Utc::now(),
    })
}

#[async_trait]
impl AchievementCatalogue for DieselAchievementCatalogue {
    async fn list_all(&self) -> Result<Vec<Achievement>, AchievementCatalogueError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AchievementRow> = achievements::table
            .select(AchievementRow::as_select())
            .order_by(achievements::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_achievement).collect()
    }

    async fn find_by_ids(
        &self,
        ids: &[AchievementId],
    ) -> Result<Vec<Achievement>, AchievementCatalogueError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AchievementRow> = achievements::table
            .filter(achievements::id.eq_any(wanted))
            .select(AchievementRow::as_select())
            .order_by(achievements::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_achievement).collect()
    }

    async fn upsert(&self, definitions: &[Achievement]) -> Result<usize, AchievementCatalogueError> {
        if definitions.is_empty() {
            return Ok(0);
        }
        let rows = definitions
            .iter()
            .map(achievement_to_row)
            .collect::<Result<Vec<_>, _>>()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(achievements::table)
                    .values(&rows)
                    .on_conflict(achievements::id)
                    .do_update()
                    .set((
                        achievements::name.eq(excluded(achievements::name)),
                        achievements::description.eq(excluded(achievements::description)),
                        achievements::category.eq(excluded(achievements::category)),
                        achievements::rank.eq(excluded(achievements::rank)),
                        achievements::points.eq(excluded(achievements::points)),
                        achievements::xp_reward.eq(excluded(achievements::xp_reward)),
                        achievements::icon_name.eq(excluded(achievements::icon_name)),
                        achievements::requirements.eq(excluded(achievements::requirements)),
                        achievements::updated_at.eq(excluded(achievements::updated_at)),
                    ))
                    .execute(conn)
                    .await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
