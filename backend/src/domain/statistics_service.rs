//! Collects the values achievement requirements are evaluated against.

use std::sync::Arc;

use tracing::instrument;

use super::achievements::UserStatistics;
use super::achievements::weekly::best_week_count;
use super::ports::{
    GuildMembershipRepository, PersonalRecordRepository, ProfileRepository, WorkoutRepository,
};
use super::{Error, UserId};

/// Gathers [`UserStatistics`] from the workout, profile, record, and guild
/// ports.
#[derive(Clone)]
pub struct UserStatisticsService {
    workouts: Arc<dyn WorkoutRepository>,
    profiles: Arc<dyn ProfileRepository>,
    records: Arc<dyn PersonalRecordRepository>,
    guilds: Arc<dyn GuildMembershipRepository>,
}

impl UserStatisticsService {
    pub fn new(
        workouts: Arc<dyn WorkoutRepository>,
        profiles: Arc<dyn ProfileRepository>,
        records: Arc<dyn PersonalRecordRepository>,
        guilds: Arc<dyn GuildMembershipRepository>,
    ) -> Self {
        Self {
            workouts,
            profiles,
            records,
            guilds,
        }
    }

    /// Query every statistic concurrently. A user without a profile has
    /// zero XP, level zero, and no class.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn collect(&self, user_id: &UserId) -> Result<UserStatistics, Error> {
        let (
            total_workouts,
            manual_workouts,
            distinct_activities,
            completion_times,
            personal_records,
            profile,
            guild_count,
        ) = tokio::try_join!(
            async { self.workouts.count_completed(user_id).await.map_err(Error::from) },
            async { self.workouts.count_manual(user_id).await.map_err(Error::from) },
            async {
                self.workouts
                    .distinct_activity_types(user_id)
                    .await
                    .map_err(Error::from)
            },
            async {
                self.workouts
                    .list_completion_times(user_id)
                    .await
                    .map_err(Error::from)
            },
            async { self.records.count_for_user(user_id).await.map_err(Error::from) },
            async { self.profiles.find(user_id).await.map_err(Error::from) },
            async { self.guilds.count_memberships(user_id).await.map_err(Error::from) },
        )?;

        let mut stats = UserStatistics {
            total_workouts,
            manual_workouts,
            personal_records,
            distinct_activities,
            best_weekly_count: best_week_count(&completion_times),
            guild_count,
            ..UserStatistics::default()
        };
        if let Some(profile) = profile {
            stats.streak = profile.streak;
            stats.class = profile.class;
            stats.xp = profile.xp;
            stats.level = profile.level;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::UserProfile;
    use crate::domain::ports::{
        MockGuildMembershipRepository, MockPersonalRecordRepository, MockProfileRepository,
        MockWorkoutRepository, WorkoutRepositoryError,
    };
    use chrono::{TimeZone, Utc};

    fn service(
        workouts: MockWorkoutRepository,
        profiles: MockProfileRepository,
        guilds: MockGuildMembershipRepository,
    ) -> UserStatisticsService {
        let mut records = MockPersonalRecordRepository::new();
        records.expect_count_for_user().returning(|_| Ok(6));
        UserStatisticsService::new(
            Arc::new(workouts),
            Arc::new(profiles),
            Arc::new(records),
            Arc::new(guilds),
        )
    }

    #[tokio::test]
    async fn combines_all_sources() {
        let user = UserId::random();
        let mut workouts = MockWorkoutRepository::new();
        workouts.expect_count_completed().return_once(|_| Ok(4));
        workouts.expect_count_manual().return_once(|_| Ok(1));
        workouts.expect_distinct_activity_types().return_once(|_| Ok(3));
        workouts.expect_list_completion_times().return_once(|_| {
            let monday = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).single().expect("time");
            Ok(vec![monday, monday, monday + chrono::Duration::days(8)])
        });
        let mut profiles = MockProfileRepository::new();
        let profile = UserProfile {
            xp: 450,
            level: 3,
            ..UserProfile::new(user.clone()).with_class("ranger").with_streak(5)
        };
        profiles.expect_find().return_once(move |_| Ok(Some(profile)));
        let mut guilds = MockGuildMembershipRepository::new();
        guilds.expect_count_memberships().return_once(|_| Ok(2));

        let stats = service(workouts, profiles, guilds)
            .collect(&user)
            .await
            .expect("statistics");

        assert_eq!(
            stats,
            UserStatistics {
                total_workouts: 4,
                manual_workouts: 1,
                personal_records: 6,
                distinct_activities: 3,
                best_weekly_count: 2,
                streak: 5,
                class: Some("ranger".into()),
                guild_count: 2,
                xp: 450,
                level: 3,
            }
        );
    }

    #[tokio::test]
    async fn storage_failure_is_reported_with_its_code() {
        let mut workouts = MockWorkoutRepository::new();
        workouts
            .expect_count_completed()
            .return_once(|_| Err(WorkoutRepositoryError::timeout("slow")));
        workouts
            .expect_list_completion_times()
            .returning(|_| Ok(Vec::new()));
        workouts.expect_count_manual().returning(|_| Ok(0));
        workouts.expect_distinct_activity_types().returning(|_| Ok(0));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().returning(|_| Ok(None));
        let mut guilds = MockGuildMembershipRepository::new();
        guilds.expect_count_memberships().returning(|_| Ok(0));

        let err = service(workouts, profiles, guilds)
            .collect(&UserId::random())
            .await
            .expect_err("timeout surfaces");
        assert_eq!(err.code(), ErrorCode::Network);
    }
}
