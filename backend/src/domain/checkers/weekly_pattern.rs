//! Weekly consistency: several workouts inside one ISO week.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AchievementChecker, CheckerScope, evaluate_scope};
use crate::domain::achievements::weekly::best_week_count;
use crate::domain::achievements::{AchievementId, UserStatistics};
use crate::domain::ports::{AchievementCatalogue, WorkoutRepository};
use crate::domain::{Error, UserId};

/// Groups completion times by ISO week and checks the busiest week.
///
/// Workouts spread one per week never add up across weeks.
pub struct WeeklyPatternChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    workouts: Arc<dyn WorkoutRepository>,
}

impl WeeklyPatternChecker {
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
impl AchievementChecker for WeeklyPatternChecker {
    fn name(&self) -> &'static str {
        "weekly_pattern"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        evaluate_scope(self.catalogue.as_ref(), CheckerScope::WeeklyCount, move || async move {
            let times = self.workouts.list_completion_times(user_id).await?;
            Ok(UserStatistics {
                best_weekly_count: best_week_count(&times),
                ..UserStatistics::default()
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{bundled, catalogue};
    use super::*;
    use crate::domain::ports::MockWorkoutRepository;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, d, 18, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    async fn run(times: Vec<DateTime<Utc>>) -> Vec<AchievementId> {
        let mut repo = MockWorkoutRepository::new();
        repo.expect_list_completion_times()
            .return_once(move |_| Ok(times));
        WeeklyPatternChecker::new(catalogue(bundled()), Arc::new(repo))
            .check(&UserId::random())
            .await
            .expect("check")
    }

    #[rstest]
    #[tokio::test]
    async fn three_in_one_week_triggers() {
        // 2024-04-01 is a Monday.
        let found = run(vec![day(1), day(3), day(5)]).await;
        assert_eq!(found, vec![AchievementId::from_static("weekly-3")]);
    }

    #[rstest]
    #[tokio::test]
    async fn three_across_three_weeks_does_not_trigger() {
        let found = run(vec![day(1), day(8), day(15)]).await;
        assert!(found.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn no_workouts_yields_empty_result() {
        assert!(run(Vec::new()).await.is_empty());
    }
}
