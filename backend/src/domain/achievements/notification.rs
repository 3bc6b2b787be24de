//! Payload handed to the notification sink after an award.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Achievement, AchievementId, AchievementRank};

/// A queued "achievement unlocked" message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementNotification {
    pub achievement_id: AchievementId,
    pub title: String,
    pub description: String,
    pub rank: AchievementRank,
    pub points: u32,
    pub xp_reward: u32,
    pub timestamp: DateTime<Utc>,
}

impl AchievementNotification {
    /// Build the notification for `achievement` awarded at `timestamp`.
    pub fn for_award(achievement: &Achievement, timestamp: DateTime<Utc>) -> Self {
        Self {
            achievement_id: achievement.id().clone(),
            title: achievement.name().to_owned(),
            description: achievement.description().to_owned(),
            rank: achievement.rank(),
            points: achievement.points(),
            xp_reward: achievement.xp_reward(),
            timestamp,
        }
    }
}
