//! Port for issuing achievement awards.
//!
//! An award inserts the (user, achievement) record and credits the
//! achievement's XP reward in one atomic step. The insert is conditional:
//! an existing award is reported as [`AwardOutcome::AlreadyAwarded`], never
//! as an error and never as a second row or a second XP credit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::UserId;
use crate::domain::achievements::{Achievement, AchievementId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by award repository adapters.
    pub enum AchievementAwardRepositoryError {
        Connection { message: String } @ Database =>
            "achievement award connection failed: {message}",
        Query { message: String } @ Database =>
            "achievement award query failed: {message}",
        Timeout { message: String } @ Network =>
            "achievement award timed out: {message}",
        /// The user has no profile to credit XP to.
        MissingProfile { user_id: String } @ NotFound =>
            "no profile exists for user {user_id}",
    }
}

/// Result of an award attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    /// A new award was recorded and its XP credited.
    Awarded { xp_credited: u32 },
    /// The user already held the achievement; nothing changed.
    AlreadyAwarded,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementAwardRepository: Send + Sync {
    /// Ids of achievements the user already holds.
    async fn awarded_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AchievementId>, AchievementAwardRepositoryError>;

    /// Award `achievement` to the user at `awarded_at`.
    async fn award(
        &self,
        user_id: &UserId,
        achievement: &Achievement,
        awarded_at: DateTime<Utc>,
    ) -> Result<AwardOutcome, AchievementAwardRepositoryError>;
}

/// Fixture implementation: nothing held, every award succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementAwardRepository;

#[async_trait]
impl AchievementAwardRepository for FixtureAchievementAwardRepository {
    async fn awarded_ids(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<AchievementId>, AchievementAwardRepositoryError> {
        Ok(Vec::new())
    }

    async fn award(
        &self,
        _user_id: &UserId,
        achievement: &Achievement,
        _awarded_at: DateTime<Utc>,
    ) -> Result<AwardOutcome, AchievementAwardRepositoryError> {
        Ok(AwardOutcome::Awarded {
            xp_credited: achievement.xp_reward(),
        })
    }
}
