//! Per-user achievement progress records.

use serde::{Deserialize, Serialize};

use super::AchievementId;

/// Stored progress for one (user, achievement) pair.
///
/// `is_complete` only ever moves from `false` to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub current: u64,
    pub total: u64,
    pub is_complete: bool,
}

impl AchievementProgress {
    /// Result of writing `update` over `existing`.
    ///
    /// Values are replaced but completion is sticky.
    pub fn merge(existing: Option<&Self>, update: &ProgressUpdate) -> Self {
        let was_complete = existing.is_some_and(|progress| progress.is_complete);
        Self {
            current: update.current_value,
            total: update.target_value,
            is_complete: was_complete || update.is_complete,
        }
    }
}

/// One entry of a progress write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub achievement_id: AchievementId,
    pub current_value: u64,
    pub target_value: u64,
    pub is_complete: bool,
}

impl ProgressUpdate {
    pub fn new(
        achievement_id: AchievementId,
        current_value: u64,
        target_value: u64,
        is_complete: bool,
    ) -> Self {
        Self {
            achievement_id,
            current_value,
            target_value,
            is_complete,
        }
    }
}
