//! Port for per-user achievement progress.
//!
//! Writes are upserts keyed on (user, achievement). Completion is sticky:
//! adapters never move `is_complete` back from `true` to `false`. A batch
//! write applies in full or not at all.

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::achievements::{AchievementId, AchievementProgress, ProgressUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by progress repository adapters.
    pub enum AchievementProgressRepositoryError {
        Connection { message: String } @ Database =>
            "achievement progress connection failed: {message}",
        Query { message: String } @ Database =>
            "achievement progress query failed: {message}",
        Timeout { message: String } @ Network =>
            "achievement progress timed out: {message}",
        /// The progress row references an achievement that does not exist.
        UnknownAchievement { id: String } @ NotFound =>
            "achievement {id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementProgressRepository: Send + Sync {
    /// Stored progress, or `None` when not yet tracked.
    async fn find(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<Option<AchievementProgress>, AchievementProgressRepositoryError>;

    /// Insert or update one record.
    async fn upsert(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), AchievementProgressRepositoryError>;

    /// Insert or update several records atomically.
    async fn upsert_batch(
        &self,
        user_id: &UserId,
        updates: &[ProgressUpdate],
    ) -> Result<(), AchievementProgressRepositoryError>;
}

/// Fixture implementation that tracks nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementProgressRepository;

#[async_trait]
impl AchievementProgressRepository for FixtureAchievementProgressRepository {
    async fn find(
        &self,
        _user_id: &UserId,
        _achievement_id: &AchievementId,
    ) -> Result<Option<AchievementProgress>, AchievementProgressRepositoryError> {
        Ok(None)
    }

    async fn upsert(
        &self,
        _user_id: &UserId,
        _update: &ProgressUpdate,
    ) -> Result<(), AchievementProgressRepositoryError> {
        Ok(())
    }

    async fn upsert_batch(
        &self,
        _user_id: &UserId,
        _updates: &[ProgressUpdate],
    ) -> Result<(), AchievementProgressRepositoryError> {
        Ok(())
    }
}
