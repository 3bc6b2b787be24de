//! PostgreSQL-backed `GuildMembershipRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{GuildMembershipRepository, GuildMembershipRepositoryError};

use super::diesel_basic_error_mapping::{self as mapping, count_to_u32};
use super::pool::DbPool;
use super::schema::guild_members;

#[derive(Clone)]
pub struct DieselGuildMembershipRepository {
    pool: DbPool,
}

impl DieselGuildMembershipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildMembershipRepository for DieselGuildMembershipRepository {
    async fn count_memberships(
        &self,
        user_id: &UserId,
    ) -> Result<u32, GuildMembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            mapping::map_pool_error(
                err,
                GuildMembershipRepositoryError::connection,
                GuildMembershipRepositoryError::timeout,
            )
        })?;
        let count: i64 = guild_members::table
            .filter(guild_members::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                mapping::map_diesel_error(
                    err,
                    GuildMembershipRepositoryError::query,
                    GuildMembershipRepositoryError::connection,
                )
            })?;
        Ok(count_to_u32(count))
    }
}
