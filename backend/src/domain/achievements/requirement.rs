//! Declarative achievement requirements and their evaluation.

use serde::{Deserialize, Serialize};

use super::{AchievementCategory, AchievementValidationError};
use super::validation::ensure_positive;

/// Requirement descriptor, tagged by `type`.
///
/// `count` is accepted as a legacy spelling of `total_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    #[serde(alias = "count")]
    TotalCount { count: u32 },
    WeeklyCount { count: u32 },
    Streak { days: u32 },
    /// Satisfied once the user has picked a class; when `class` is set the
    /// pick must match it (case-insensitively).
    Class {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
    },
    Guild { guild_count: u32 },
    Xp { value: u64 },
    Level { value: u32 },
}

/// Discriminant of a [`Requirement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    TotalCount,
    WeeklyCount,
    Streak,
    Class,
    Guild,
    Xp,
    Level,
}

/// Observed values the requirement kinds are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total_workouts: u32,
    pub manual_workouts: u32,
    pub personal_records: u32,
    /// Distinct activity types across completed workouts.
    pub distinct_activities: u32,
    /// Most completed workouts in any single ISO week.
    pub best_weekly_count: u32,
    pub streak: u32,
    pub class: Option<String>,
    pub guild_count: u32,
    pub xp: u64,
    pub level: u32,
}

/// Current and target values for a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProgress {
    /// Observed value, clamped to `target`.
    pub current: u64,
    pub target: u64,
}

impl RequirementProgress {
    fn of(observed: u64, target: u64) -> Self {
        Self {
            current: observed.min(target),
            target,
        }
    }

    /// Whether the target has been reached.
    pub const fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

impl Requirement {
    /// Discriminant for routing.
    pub const fn kind(&self) -> RequirementKind {
        match self {
            Self::TotalCount { .. } => RequirementKind::TotalCount,
            Self::WeeklyCount { .. } => RequirementKind::WeeklyCount,
            Self::Streak { .. } => RequirementKind::Streak,
            Self::Class { .. } => RequirementKind::Class,
            Self::Guild { .. } => RequirementKind::Guild,
            Self::Xp { .. } => RequirementKind::Xp,
            Self::Level { .. } => RequirementKind::Level,
        }
    }

    /// Reject zero thresholds and blank class targets.
    pub fn validate(&self) -> Result<(), AchievementValidationError> {
        match self {
            Self::TotalCount { count } => ensure_positive(*count, "total_count.count"),
            Self::WeeklyCount { count } => ensure_positive(*count, "weekly_count.count"),
            Self::Streak { days } => ensure_positive(*days, "streak.days"),
            Self::Class { class: Some(class) } if class.trim().is_empty() => {
                Err(AchievementValidationError::EmptyField {
                    field: "class.class",
                })
            }
            Self::Class { .. } => Ok(()),
            Self::Guild { guild_count } => ensure_positive(*guild_count, "guild.guild_count"),
            Self::Xp { value } => ensure_positive(*value, "xp.value"),
            Self::Level { value } => ensure_positive(*value, "level.value"),
        }
    }

    /// Whether `stats` meets this requirement.
    ///
    /// # Examples
    /// ```
    /// use fitquest::domain::achievements::{Requirement, UserStatistics};
    ///
    /// let stats = UserStatistics { streak: 7, ..UserStatistics::default() };
    /// assert!(Requirement::Streak { days: 7 }.is_satisfied(&stats));
    /// assert!(!Requirement::Streak { days: 30 }.is_satisfied(&stats));
    /// ```
    pub fn is_satisfied(&self, stats: &UserStatistics) -> bool {
        self.progress(stats).is_complete()
    }

    /// Progress of `stats` toward this requirement.
    pub fn progress(&self, stats: &UserStatistics) -> RequirementProgress {
        match self {
            Self::TotalCount { count } => {
                RequirementProgress::of(stats.total_workouts.into(), (*count).into())
            }
            Self::WeeklyCount { count } => {
                RequirementProgress::of(stats.best_weekly_count.into(), (*count).into())
            }
            Self::Streak { days } => RequirementProgress::of(stats.streak.into(), (*days).into()),
            Self::Class { class } => {
                RequirementProgress::of(u64::from(class_matches(class.as_deref(), stats)), 1)
            }
            Self::Guild { guild_count } => {
                RequirementProgress::of(stats.guild_count.into(), (*guild_count).into())
            }
            Self::Xp { value } => RequirementProgress::of(stats.xp, *value),
            Self::Level { value } => RequirementProgress::of(stats.level.into(), (*value).into()),
        }
    }

    /// Progress where a `total_count` counts what `category` tracks (see
    /// [`CountSource::for_category`]).
    pub fn progress_for(
        &self,
        category: AchievementCategory,
        stats: &UserStatistics,
    ) -> RequirementProgress {
        let Self::TotalCount { count } = self else {
            return self.progress(stats);
        };
        let counted = match CountSource::for_category(category) {
            CountSource::PersonalRecords => stats.personal_records,
            CountSource::DistinctActivities => stats.distinct_activities,
            CountSource::ManualWorkouts => stats.manual_workouts,
            CountSource::CompletedWorkouts => stats.total_workouts,
        };
        RequirementProgress::of(counted.into(), (*count).into())
    }
}

/// What a `total_count` requirement counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountSource {
    CompletedWorkouts,
    PersonalRecords,
    DistinctActivities,
    ManualWorkouts,
}

impl CountSource {
    /// Personal records for `RECORD`, distinct activities for `VARIETY`,
    /// manual logs for `MANUAL`, and completed workouts otherwise.
    pub const fn for_category(category: AchievementCategory) -> Self {
        match category {
            AchievementCategory::Record => Self::PersonalRecords,
            AchievementCategory::Variety => Self::DistinctActivities,
            AchievementCategory::Manual => Self::ManualWorkouts,
            _ => Self::CompletedWorkouts,
        }
    }
}

fn class_matches(target: Option<&str>, stats: &UserStatistics) -> bool {
    match (target, stats.class.as_deref()) {
        (_, None) => false,
        (None, Some(chosen)) => !chosen.trim().is_empty(),
        (Some(target), Some(chosen)) => target.trim().eq_ignore_ascii_case(chosen.trim()),
    }
}
