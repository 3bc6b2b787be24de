//! Consecutive-day streak milestones.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AchievementChecker, CheckerScope, evaluate_scope};
use crate::domain::achievements::{AchievementId, UserStatistics};
use crate::domain::ports::{AchievementCatalogue, ProfileRepository};
use crate::domain::{Error, UserId};

/// Reads the externally maintained streak from the profile.
pub struct StreakChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    profiles: Arc<dyn ProfileRepository>,
}

impl StreakChecker {
    pub fn new(
        catalogue: Arc<dyn AchievementCatalogue>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            catalogue,
            profiles,
        }
    }
}

#[async_trait]
impl AchievementChecker for StreakChecker {
    fn name(&self) -> &'static str {
        "streak"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        evaluate_scope(self.catalogue.as_ref(), CheckerScope::Streak, move || async move {
            let streak = self
                .profiles
                .find(user_id)
                .await?
                .map_or(0, |profile| profile.streak);
            Ok(UserStatistics {
                streak,
                ..UserStatistics::default()
            })
        })
        .await
    }
}
