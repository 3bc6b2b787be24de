//! Driving port for reading achievement progress.

use async_trait::async_trait;

use crate::domain::achievements::{AchievementId, AchievementProgress};
use crate::domain::{Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementProgressQuery: Send + Sync {
    /// Stored progress, or `None` when the pair is not tracked yet.
    async fn get_progress(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<Option<AchievementProgress>, Error>;
}

/// Fixture implementation: nothing is tracked.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementProgressQuery;

#[async_trait]
impl AchievementProgressQuery for FixtureAchievementProgressQuery {
    async fn get_progress(
        &self,
        _user_id: &UserId,
        _achievement_id: &AchievementId,
    ) -> Result<Option<AchievementProgress>, Error> {
        Ok(None)
    }
}
