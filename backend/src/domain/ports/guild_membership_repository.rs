//! Port for guild membership counts.

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by guild membership adapters.
    pub enum GuildMembershipRepositoryError {
        Connection { message: String } @ Database =>
            "guild membership repository connection failed: {message}",
        Query { message: String } @ Database =>
            "guild membership repository query failed: {message}",
        Timeout { message: String } @ Network =>
            "guild membership repository timed out: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuildMembershipRepository: Send + Sync {
    /// Number of guilds the user belongs to.
    async fn count_memberships(&self, user_id: &UserId)
    -> Result<u32, GuildMembershipRepositoryError>;
}

/// Fixture implementation: the user belongs to no guild.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGuildMembershipRepository;

#[async_trait]
impl GuildMembershipRepository for FixtureGuildMembershipRepository {
    async fn count_memberships(
        &self,
        _user_id: &UserId,
    ) -> Result<u32, GuildMembershipRepositoryError> {
        Ok(0)
    }
}
