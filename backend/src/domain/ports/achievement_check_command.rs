//! Driving port for running every achievement checker for a user.

use async_trait::async_trait;

use crate::domain::coordinator::AchievementCheckReport;
use crate::domain::{Error, UserId};

/// Consumed by inbound adapters and by workout completion.
///
/// `Err` means coordination itself failed (for example the award store is
/// unreachable). Individual checker or award failures are listed in the
/// report instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementCheckCommand: Send + Sync {
    async fn check_achievements(&self, user_id: &UserId) -> Result<AchievementCheckReport, Error>;
}

/// Fixture implementation that awards nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementCheckCommand;

#[async_trait]
impl AchievementCheckCommand for FixtureAchievementCheckCommand {
    async fn check_achievements(&self, user_id: &UserId) -> Result<AchievementCheckReport, Error> {
        Ok(AchievementCheckReport::empty(user_id.clone()))
    }
}
