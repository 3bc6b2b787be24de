//! Checkers driven by a single count from the data store.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AchievementChecker, CheckerScope, evaluate_scope};
use crate::domain::achievements::{AchievementId, CountSource, UserStatistics};
use crate::domain::ports::{AchievementCatalogue, PersonalRecordRepository, WorkoutRepository};
use crate::domain::{Error, UserId};

/// Completed-workout milestones.
pub struct WorkoutCountChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    workouts: Arc<dyn WorkoutRepository>,
}

impl WorkoutCountChecker {
    pub fn new(
        catalogue: Arc<dyn AchievementCatalogue>,
        workouts: Arc<dyn WorkoutRepository>,
    ) -> Self {
        Self {
            catalogue,
            workouts,
        }
    }
}

#[async_trait]
impl AchievementChecker for WorkoutCountChecker {
    fn name(&self) -> &'static str {
        "workout_count"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        let scope = CheckerScope::Count(CountSource::CompletedWorkouts);
        evaluate_scope(self.catalogue.as_ref(), scope, move || async move {
            Ok(UserStatistics {
                total_workouts: self.workouts.count_completed(user_id).await?,
                ..UserStatistics::default()
            })
        })
        .await
    }
}

pub struct PersonalRecordChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    records: Arc<dyn PersonalRecordRepository>,
}

impl PersonalRecordChecker {
    pub fn new(
        catalogue: Arc<dyn AchievementCatalogue>,
        records: Arc<dyn PersonalRecordRepository>,
    ) -> Self {
        Self { catalogue, records }
    }
}

#[async_trait]
impl AchievementChecker for PersonalRecordChecker {
    fn name(&self) -> &'static str {
        "personal_record"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        let scope = CheckerScope::Count(CountSource::PersonalRecords);
        evaluate_scope(self.catalogue.as_ref(), scope, move || async move {
            Ok(UserStatistics {
                personal_records: self.records.count_for_user(user_id).await?,
                ..UserStatistics::default()
            })
        })
        .await
    }
}

/// Rewards trying different activity types.
pub struct VarietyChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    workouts: Arc<dyn WorkoutRepository>,
}

impl VarietyChecker {
    pub fn new(
        catalogue: Arc<dyn AchievementCatalogue>,
        workouts: Arc<dyn WorkoutRepository>,
    ) -> Self {
        Self {
            catalogue,
            workouts,
        }
    }
}

#[async_trait]
impl AchievementChecker for VarietyChecker {
    fn name(&self) -> &'static str {
        "variety"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        let scope = CheckerScope::Count(CountSource::DistinctActivities);
        evaluate_scope(self.catalogue.as_ref(), scope, move || async move {
            Ok(UserStatistics {
                distinct_activities: self.workouts.distinct_activity_types(user_id).await?,
                ..UserStatistics::default()
            })
        })
        .await
    }
}

pub struct ManualWorkoutChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    workouts: Arc<dyn WorkoutRepository>,
}

impl ManualWorkoutChecker {
    pub fn new(
        catalogue: Arc<dyn AchievementCatalogue>,
        workouts: Arc<dyn WorkoutRepository>,
    ) -> Self {
        Self {
            catalogue,
            workouts,
        }
    }
}

#[async_trait]
impl AchievementChecker for ManualWorkoutChecker {
    fn name(&self) -> &'static str {
        "manual_workout"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        let scope = CheckerScope::Count(CountSource::ManualWorkouts);
        evaluate_scope(self.catalogue.as_ref(), scope, move || async move {
            Ok(UserStatistics {
                manual_workouts: self.workouts.count_manual(user_id).await?,
                ..UserStatistics::default()
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{bundled, catalogue, definition, ids};
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::achievements::Requirement;
    use crate::domain::ports::{
        MockPersonalRecordRepository, MockWorkoutRepository, WorkoutRepositoryError,
    };
    use rstest::rstest;

    #[rstest]
    #[case(0, &[])]
    #[case(1, &["first-workout"])]
    #[case(26, &["first-workout", "workouts-10", "workouts-25"])]
    #[tokio::test]
    async fn workout_count_follows_bundled_tiers(#[case] count: u32, #[case] expected: &[&str]) {
        let mut repo = MockWorkoutRepository::new();
        repo.expect_count_completed().return_once(move |_| Ok(count));
        let checker = WorkoutCountChecker::new(catalogue(bundled()), Arc::new(repo));

        let found = checker.check(&UserId::random()).await.expect("check");

        assert_eq!(ids(found), expected);
    }

    #[tokio::test]
    async fn special_tiers_count_completed_workouts() {
        let mut repo = MockWorkoutRepository::new();
        repo.expect_count_completed().return_once(|_| Ok(100));
        let definitions = vec![
            definition("centurion", "SPECIAL", Requirement::TotalCount { count: 100 }),
            definition("pr-100", "RECORD", Requirement::TotalCount { count: 1 }),
        ];
        let checker = WorkoutCountChecker::new(catalogue(definitions), Arc::new(repo));

        let found = checker.check(&UserId::random()).await.expect("check");

        assert_eq!(ids(found), ["centurion"]);
    }

    #[tokio::test]
    async fn first_personal_record_awards_pr_first() {
        let mut repo = MockPersonalRecordRepository::new();
        repo.expect_count_for_user().return_once(|_| Ok(1));
        let checker = PersonalRecordChecker::new(catalogue(bundled()), Arc::new(repo));

        let found = checker.check(&UserId::random()).await.expect("check");

        assert_eq!(ids(found), ["pr-first"]);
    }

    #[rstest]
    #[case(4, &["variety-3"])]
    #[case(5, &["variety-3", "variety-5"])]
    #[tokio::test]
    async fn variety_follows_bundled_tiers(#[case] distinct: u32, #[case] expected: &[&str]) {
        let mut repo = MockWorkoutRepository::new();
        repo.expect_distinct_activity_types()
            .return_once(move |_| Ok(distinct));
        let checker = VarietyChecker::new(catalogue(bundled()), Arc::new(repo));

        assert_eq!(ids(checker.check(&UserId::random()).await.expect("check")), expected);
    }

    #[tokio::test]
    async fn manual_checker_counts_manual_workouts_only() {
        let mut repo = MockWorkoutRepository::new();
        repo.expect_count_manual().return_once(|_| Ok(10));
        repo.expect_count_completed().never();
        let checker = ManualWorkoutChecker::new(catalogue(bundled()), Arc::new(repo));

        let found = checker.check(&UserId::random()).await.expect("check");

        assert_eq!(ids(found), ["manual-first", "manual-10"]);
    }

    #[tokio::test]
    async fn empty_catalogue_skips_the_count_query() {
        let mut repo = MockWorkoutRepository::new();
        repo.expect_count_completed().never();
        let checker = WorkoutCountChecker::new(catalogue(Vec::new()), Arc::new(repo));

        assert!(checker.check(&UserId::random()).await.expect("check").is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_returned_not_panicked() {
        let mut repo = MockWorkoutRepository::new();
        repo.expect_count_completed()
            .return_once(|_| Err(WorkoutRepositoryError::connection("refused")));
        let checker = WorkoutCountChecker::new(catalogue(bundled()), Arc::new(repo));

        let err = checker.check(&UserId::random()).await.expect_err("failure");

        assert_eq!(err.code(), ErrorCode::Database);
    }
}
