//! Coordinator scenarios over the in-memory store.

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fitquest::composition::{DrivenPorts, seed_catalogue};
use fitquest::domain::achievements::AchievementId;
use fitquest::domain::ports::{WorkoutRepository, WorkoutRepositoryError};
use fitquest::domain::{UserId, UserProfile, Workout, WorkoutId};
use fitquest::outbound::memory::InMemoryFitnessStore;
use fitquest::test_support::completed_workout;
use rstest::rstest;

use support::Harness;

fn id(raw: &str) -> AchievementId {
    AchievementId::new(raw).expect("valid id")
}

fn at(day: u32) -> DateTime<Utc> {
    // March 2025: the 3rd is a Monday.
    Utc.with_ymd_and_hms(2025, 3, day, 18, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[rstest]
#[case::same_iso_week(&[3, 5, 7], true)]
#[case::spread_over_weeks(&[3, 10, 17], false)]
#[case::sunday_to_monday_split(&[8, 9, 10], false)]
#[tokio::test]
async fn weekly_achievement_needs_one_busy_iso_week(
    #[case] days: &[u32],
    #[case] expect_weekly: bool,
) {
    let harness = Harness::new().await;
    let user_id = harness.new_user();
    for day in days {
        harness.store.insert_workout(completed_workout(&user_id, at(*day)));
    }

    let report = harness
        .services
        .coordinator
        .check_user(&user_id)
        .await
        .expect("check succeeds");

    assert_eq!(report.awarded_ids().contains(&id("weekly-3")), expect_weekly);
    assert!(report.awarded_ids().contains(&id("first-workout")));
}

#[rstest]
#[tokio::test]
async fn streak_thresholds_award_together() {
    let harness = Harness::new().await;
    let user_id = UserId::random();
    let mut profile = UserProfile::new(user_id.clone());
    profile.streak = 7;
    harness.store.insert_profile(profile);

    let report = harness
        .services
        .coordinator
        .check_user(&user_id)
        .await
        .expect("check succeeds");

    let awarded = report.awarded_ids();
    assert!(awarded.contains(&id("streak-3")));
    assert!(awarded.contains(&id("streak-7")));
    assert!(!awarded.contains(&id("streak-30")));
    assert_eq!(report.xp_credited(), 30 + 75);
}

#[rstest]
#[tokio::test]
async fn concurrent_checks_award_once() {
    let harness = Harness::new().await;
    let user_id = harness.new_user();
    harness.store.insert_workout(completed_workout(&user_id, at(3)));

    let coordinator = &harness.services.coordinator;
    let (left, right) = tokio::join!(
        coordinator.check_user(&user_id),
        coordinator.check_user(&user_id)
    );
    let left = left.expect("left check");
    let right = right.expect("right check");

    let first_workout_awards = [left, right]
        .iter()
        .flat_map(|report| report.awarded_ids())
        .filter(|awarded| *awarded == id("first-workout"))
        .count();
    assert_eq!(first_workout_awards, 1);
    assert_eq!(harness.store.award_count(&user_id), 1);
    assert_eq!(harness.store.profile(&user_id).expect("profile").xp, 25);
}

#[rstest]
#[tokio::test]
async fn rerunning_a_check_awards_nothing_new() {
    let harness = Harness::new().await;
    let user_id = harness.new_user();
    harness.store.insert_workout(completed_workout(&user_id, at(3)));

    let first = harness.services.coordinator.check_user(&user_id).await.expect("first");
    let second = harness.services.coordinator.check_user(&user_id).await.expect("second");

    assert!(!first.awarded.is_empty());
    assert!(second.awarded.is_empty());
    assert_eq!(second.candidates, first.candidates);
}

/// Workout store whose completed-count query always fails.
struct CountlessWorkouts(Arc<InMemoryFitnessStore>);

#[async_trait]
impl WorkoutRepository for CountlessWorkouts {
    async fn find_by_id(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
    ) -> Result<Option<Workout>, WorkoutRepositoryError> {
        self.0.find_by_id(user_id, workout_id).await
    }

    async fn count_completed(&self, _user_id: &UserId) -> Result<u32, WorkoutRepositoryError> {
        Err(WorkoutRepositoryError::query("count unavailable"))
    }

    async fn count_manual(&self, user_id: &UserId) -> Result<u32, WorkoutRepositoryError> {
        self.0.count_manual(user_id).await
    }

    async fn list_completion_times(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DateTime<Utc>>, WorkoutRepositoryError> {
        self.0.list_completion_times(user_id).await
    }

    async fn distinct_activity_types(
        &self,
        user_id: &UserId,
    ) -> Result<u32, WorkoutRepositoryError> {
        self.0.distinct_activity_types(user_id).await
    }
}

#[rstest]
#[tokio::test]
async fn failing_checker_does_not_block_other_awards() {
    let store = Arc::new(InMemoryFitnessStore::new());
    let mut ports = DrivenPorts::in_memory(&store);
    ports.workouts = Arc::new(CountlessWorkouts(store.clone()));
    let harness = Harness::with_ports(store, ports).await;

    let user_id = UserId::random();
    let mut profile = UserProfile::new(user_id.clone());
    profile.streak = 3;
    harness.store.insert_profile(profile);
    for offset in 0..3 {
        harness
            .store
            .insert_workout(completed_workout(&user_id, at(3) + Duration::days(offset)));
    }

    let report = harness
        .services
        .coordinator
        .check_user(&user_id)
        .await
        .expect("partial failure still reports");

    assert!(
        report
            .failed_checkers
            .iter()
            .any(|failure| failure.checker == "workout_count")
    );
    let awarded = report.awarded_ids();
    assert!(awarded.contains(&id("streak-3")));
    assert!(awarded.contains(&id("weekly-3")));
    assert!(!awarded.contains(&id("first-workout")));
}

fn streak_tier(id: &str, rank: &str, days: u32) -> String {
    format!(
        r#"[{{
            "id": "{id}",
            "name": "Unbroken {days}",
            "description": "Train {days} days in a row.",
            "category": "STREAK",
            "rank": "{rank}",
            "points": 60,
            "xpReward": 400,
            "iconName": "flame",
            "requirements": {{ "type": "streak", "days": {days} }}
        }}]"#
    )
}

fn user_with_streak(harness: &Harness, streak: u32) -> UserId {
    let user_id = UserId::random();
    harness
        .store
        .insert_profile(UserProfile::new(user_id.clone()).with_streak(streak));
    user_id
}

#[rstest]
#[tokio::test]
async fn seeded_higher_tier_is_awarded_from_its_stored_requirement() {
    let harness = Harness::new().await;
    seed_catalogue(harness.services.catalogue.as_ref(), &streak_tier("streak-60", "C", 60))
        .await
        .expect("tier seeds");
    let user_id = user_with_streak(&harness, 90);

    let report = harness
        .services
        .coordinator
        .check_user(&user_id)
        .await
        .expect("check succeeds");

    let awarded = report.awarded_ids();
    for tier in ["streak-3", "streak-7", "streak-30", "streak-60"] {
        assert!(awarded.contains(&id(tier)), "{tier} missing from {awarded:?}");
    }
    let progress = harness
        .services
        .progress
        .get_progress(&user_id, &id("streak-60"))
        .await
        .expect("progress readable")
        .expect("progress tracked");
    assert!(progress.is_complete);
    assert_eq!((progress.current, progress.total), (60, 60));
}

#[rstest]
#[tokio::test]
async fn raised_threshold_is_not_awarded_early() {
    let harness = Harness::new().await;
    seed_catalogue(harness.services.catalogue.as_ref(), &streak_tier("streak-7", "E", 14))
        .await
        .expect("tier reseeds");
    let user_id = user_with_streak(&harness, 7);

    let report = harness
        .services
        .coordinator
        .check_user(&user_id)
        .await
        .expect("check succeeds");

    assert_eq!(report.awarded_ids(), vec![id("streak-3")]);
    let progress = harness
        .services
        .progress
        .get_progress(&user_id, &id("streak-7"))
        .await
        .expect("progress readable")
        .expect("progress tracked");
    assert!(!progress.is_complete);
    assert_eq!((progress.current, progress.total), (7, 14));
}

#[rstest]
#[tokio::test]
async fn upper_case_user_id_reaches_the_same_profile() {
    let harness = Harness::new().await;
    let user_id = user_with_streak(&harness, 7);
    let shouted = UserId::new(user_id.to_string().to_uppercase()).expect("valid id");

    let report = harness
        .services
        .coordinator
        .check_user(&shouted)
        .await
        .expect("check succeeds");

    let awarded = report.awarded_ids();
    assert!(awarded.contains(&id("streak-3")));
    assert!(awarded.contains(&id("streak-7")));
    assert_eq!(harness.store.award_count(&user_id), 2);
}
