//! Result types for a coordinated achievement check.

use serde::{Deserialize, Serialize};

use crate::domain::achievements::AchievementId;
use crate::domain::{Error, UserId};

/// A checker that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerFailure {
    pub checker: String,
    pub error: Error,
}

/// An award attempt that failed after retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardFailure {
    pub achievement_id: AchievementId,
    pub error: Error,
}

/// A newly issued award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardedAchievement {
    pub achievement_id: AchievementId,
    pub xp_credited: u32,
}

/// Outcome of one coordinated run.
///
/// A report is a success even when some checkers or awards failed; those
/// partial failures are listed alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementCheckReport {
    pub user_id: UserId,
    /// Every id a checker reported, de-duplicated, in checker order.
    pub candidates: Vec<AchievementId>,
    /// Awards issued by this run.
    pub awarded: Vec<AwardedAchievement>,
    pub failed_checkers: Vec<CheckerFailure>,
    /// Reported ids with no catalogue definition.
    pub unknown: Vec<AchievementId>,
    pub failed_awards: Vec<AwardFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_error: Option<Error>,
}

impl AchievementCheckReport {
    /// A report with nothing in it.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            candidates: Vec::new(),
            awarded: Vec::new(),
            failed_checkers: Vec::new(),
            unknown: Vec::new(),
            failed_awards: Vec::new(),
            progress_error: None,
        }
    }

    /// Ids awarded by this run.
    pub fn awarded_ids(&self) -> Vec<AchievementId> {
        self.awarded
            .iter()
            .map(|award| award.achievement_id.clone())
            .collect()
    }

    /// Total XP credited by this run's awards.
    pub fn xp_credited(&self) -> u64 {
        self.awarded
            .iter()
            .map(|award| u64::from(award.xp_credited))
            .sum()
    }
}
