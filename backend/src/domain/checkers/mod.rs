//! Category-specific achievement checkers.
//!
//! A checker decides which achievement ids a user's current data
//! satisfies. Thresholds come from the catalogue: each checker picks the
//! definitions in its [`CheckerScope`], reads the one observed value that
//! scope needs, and evaluates every definition's requirement against it.
//! It never looks at existing awards: de-duplication belongs to the award
//! step, so every checker is safe to re-run. Data-access failures come back
//! as `Err` for the coordinator to record; checkers never mutate shared
//! state.

mod counts;
mod guild;
mod profile_milestones;
mod streak;
mod weekly_pattern;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

pub use counts::{
    ManualWorkoutChecker, PersonalRecordChecker, VarietyChecker, WorkoutCountChecker,
};
pub use guild::GuildChecker;
pub use profile_milestones::{ClassChecker, MilestoneChecker};
pub use streak::StreakChecker;
pub use weekly_pattern::WeeklyPatternChecker;

use super::achievements::{
    Achievement, AchievementId, CountSource, RequirementKind, UserStatistics,
};
use super::ports::{
    AchievementCatalogue, GuildMembershipRepository, PersonalRecordRepository, ProfileRepository,
    WorkoutRepository,
};
use super::{Error, UserId};

/// One category rule module.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementChecker: Send + Sync {
    /// Stable label used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Ids whose stored requirements the user currently meets.
    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error>;
}

/// The catalogue definitions a checker is responsible for.
///
/// Every requirement kind belongs to exactly one scope, so each
/// definition is evaluated by exactly one checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerScope {
    /// `total_count` definitions whose category counts `source`.
    Count(CountSource),
    WeeklyCount,
    Streak,
    /// Lifetime XP and level.
    Milestones,
    Guild,
    Class,
}

impl CheckerScope {
    pub fn covers(self, achievement: &Achievement) -> bool {
        match (self, achievement.requirements().kind()) {
            (Self::Count(source), RequirementKind::TotalCount) => {
                CountSource::for_category(achievement.category()) == source
            }
            (Self::WeeklyCount, RequirementKind::WeeklyCount)
            | (Self::Streak, RequirementKind::Streak)
            | (Self::Milestones, RequirementKind::Xp | RequirementKind::Level)
            | (Self::Guild, RequirementKind::Guild)
            | (Self::Class, RequirementKind::Class) => true,
            _ => false,
        }
    }
}

/// Evaluate the definitions in `scope` against the values `observe`
/// returns.
///
/// `observe` only runs when the catalogue holds at least one definition in
/// scope, so a checker with nothing to evaluate issues no data queries.
pub async fn evaluate_scope<F, Fut>(
    catalogue: &dyn AchievementCatalogue,
    scope: CheckerScope,
    observe: F,
) -> Result<Vec<AchievementId>, Error>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<UserStatistics, Error>>,
{
    let definitions: Vec<Achievement> = catalogue
        .list_all()
        .await?
        .into_iter()
        .filter(|achievement| scope.covers(achievement))
        .collect();
    if definitions.is_empty() {
        return Ok(Vec::new());
    }

    let observed = observe().await?;
    Ok(definitions
        .iter()
        .filter(|achievement| achievement.progress(&observed).is_complete())
        .map(|achievement| achievement.id().clone())
        .collect())
}

/// Ports the built-in checkers read from.
#[derive(Clone)]
pub struct CheckerPorts {
    pub workouts: Arc<dyn WorkoutRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub records: Arc<dyn PersonalRecordRepository>,
    pub guilds: Arc<dyn GuildMembershipRepository>,
    pub catalogue: Arc<dyn AchievementCatalogue>,
}

/// Every built-in checker, in the order results are reported.
pub fn default_checkers(ports: &CheckerPorts) -> Vec<Arc<dyn AchievementChecker>> {
    let catalogue = &ports.catalogue;
    vec![
        Arc::new(WorkoutCountChecker::new(catalogue.clone(), ports.workouts.clone())),
        Arc::new(StreakChecker::new(catalogue.clone(), ports.profiles.clone())),
        Arc::new(PersonalRecordChecker::new(catalogue.clone(), ports.records.clone())),
        Arc::new(VarietyChecker::new(catalogue.clone(), ports.workouts.clone())),
        Arc::new(WeeklyPatternChecker::new(catalogue.clone(), ports.workouts.clone())),
        Arc::new(ManualWorkoutChecker::new(catalogue.clone(), ports.workouts.clone())),
        Arc::new(MilestoneChecker::new(catalogue.clone(), ports.profiles.clone())),
        Arc::new(GuildChecker::new(catalogue.clone(), ports.guilds.clone())),
        Arc::new(ClassChecker::new(catalogue.clone(), ports.profiles.clone())),
    ]
}
