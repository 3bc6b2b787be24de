//! Profile subset read by the XP and achievement rules.

use serde::{Deserialize, Serialize};

use super::{UserId, xp};

/// Progress-relevant slice of a user's profile.
///
/// `streak` is maintained elsewhere and only read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub level: u32,
    pub xp: u64,
    pub streak: u32,
    pub class: Option<String>,
    pub workouts_count: u32,
}

impl UserProfile {
    /// A fresh level-one profile.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            level: 1,
            xp: 0,
            streak: 0,
            class: None,
            workouts_count: 0,
        }
    }

    /// Set the selected class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set the externally maintained streak.
    pub fn with_streak(mut self, streak: u32) -> Self {
        self.streak = streak;
        self
    }

    /// Add XP and recompute the level from the lifetime total.
    pub fn credit_xp(&mut self, amount: u64) {
        self.xp = self.xp.saturating_add(amount);
        self.level = xp::level_for_xp(self.xp);
    }
}
