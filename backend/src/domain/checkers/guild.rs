//! Guild participation.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AchievementChecker, CheckerScope, evaluate_scope};
use crate::domain::achievements::{AchievementId, UserStatistics};
use crate::domain::ports::{AchievementCatalogue, GuildMembershipRepository};
use crate::domain::{Error, UserId};

pub struct GuildChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    guilds: Arc<dyn GuildMembershipRepository>,
}

impl GuildChecker {
    pub fn new(
        catalogue: Arc<dyn AchievementCatalogue>,
        guilds: Arc<dyn GuildMembershipRepository>,
    ) -> Self {
        Self { catalogue, guilds }
    }
}

#[async_trait]
impl AchievementChecker for GuildChecker {
    fn name(&self) -> &'static str {
        "guild"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        evaluate_scope(self.catalogue.as_ref(), CheckerScope::Guild, move || async move {
            Ok(UserStatistics {
                guild_count: self.guilds.count_memberships(user_id).await?,
                ..UserStatistics::default()
            })
        })
        .await
    }
}
