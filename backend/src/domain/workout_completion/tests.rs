//! Tests for the workout completion service.

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::coordinator::AchievementCheckReport;
use crate::domain::ports::{
    MockAchievementCheckCommand, MockPersonalRecordRepository, MockProfileRepository,
    MockWorkoutRepository, ProfileRepositoryError,
};
use crate::domain::{
    ErrorCode, Exercise, ExerciseKind, ExerciseSet, UserId, UserProfile, Workout, WorkoutId,
    WorkoutSnapshot,
};
use crate::test_support::instant_retry;

#[fixture]
fn user() -> UserId {
    UserId::random()
}

fn worked_example(user: &UserId, id: WorkoutId) -> Workout {
    let start = Utc
        .with_ymd_and_hms(2025, 3, 3, 7, 0, 0)
        .single()
        .expect("valid timestamp");
    Workout {
        id,
        user_id: user.clone(),
        started_at: start,
        completed_at: Some(start + chrono::Duration::minutes(30)),
        activity_type: Some("strength".into()),
        is_manual: false,
        snapshot: WorkoutSnapshot::new(
            vec![
                Exercise::new(
                    "squat",
                    ExerciseKind::Strength,
                    vec![ExerciseSet::new(80.0, 5, true), ExerciseSet::new(80.0, 5, true)],
                ),
                Exercise::new(
                    "press",
                    ExerciseKind::Strength,
                    vec![ExerciseSet::new(40.0, 8, true), ExerciseSet::new(40.0, 8, false)],
                ),
            ],
            30 * 60,
        ),
    }
}

struct Mocks {
    workouts: MockWorkoutRepository,
    records: MockPersonalRecordRepository,
    profiles: MockProfileRepository,
    achievements: MockAchievementCheckCommand,
}

impl Mocks {
    fn new(user: &UserId, workout: Option<Workout>, profile: Option<UserProfile>) -> Self {
        let mut workouts = MockWorkoutRepository::new();
        workouts
            .expect_find_by_id()
            .return_once(move |_, _| Ok(workout));
        let mut records = MockPersonalRecordRepository::new();
        records.expect_count_for_workout().returning(|_, _| Ok(0));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().return_once(move |_| Ok(profile));
        let mut achievements = MockAchievementCheckCommand::new();
        let report_user = user.clone();
        achievements
            .expect_check_achievements()
            .returning(move |_| Ok(AchievementCheckReport::empty(report_user.clone())));
        Self {
            workouts,
            records,
            profiles,
            achievements,
        }
    }

    fn service(self) -> WorkoutCompletionService {
        WorkoutCompletionService::new(
            WorkoutCompletionPorts {
                workouts: Arc::new(self.workouts),
                records: Arc::new(self.records),
                profiles: Arc::new(self.profiles),
                achievements: Arc::new(self.achievements),
            },
            instant_retry(3),
        )
    }
}

fn request(user: &UserId, workout_id: WorkoutId) -> CompleteWorkoutRequest {
    CompleteWorkoutRequest {
        user_id: user.clone(),
        workout_id,
    }
}

#[rstest]
#[tokio::test]
async fn worked_example_credits_fifty_six_xp(user: UserId) {
    let workout_id = WorkoutId::random();
    let mut mocks = Mocks::new(
        &user,
        Some(worked_example(&user, workout_id)),
        Some(UserProfile::new(user.clone())),
    );
    let credited_user = user.clone();
    mocks
        .profiles
        .expect_credit_workout_xp()
        .times(1)
        .withf(|_, _, xp| *xp == 56)
        .return_once(move |_, _, xp| {
            let mut profile = UserProfile::new(credited_user);
            profile.credit_xp(xp.into());
            Ok(XpCreditOutcome::Credited(profile))
        });

    let outcome = mocks
        .service()
        .complete_workout(request(&user, workout_id))
        .await
        .expect("completion");

    assert_eq!(outcome.components.time_xp, 40);
    assert_eq!(outcome.components.exercise_xp, 10);
    assert_eq!(outcome.components.sets_xp, 6);
    assert_eq!(outcome.components.total_base_xp, 56);
    assert_eq!(outcome.xp_awarded, 56);
    assert!(!outcome.already_credited);
    assert!(outcome.achievements.is_some());
}

#[rstest]
#[tokio::test]
async fn warrior_class_bonus_is_credited(user: UserId) {
    let workout_id = WorkoutId::random();
    let mut mocks = Mocks::new(
        &user,
        Some(worked_example(&user, workout_id)),
        Some(UserProfile::new(user.clone()).with_class("warrior")),
    );
    let credited_user = user.clone();
    mocks
        .profiles
        .expect_credit_workout_xp()
        .withf(|_, _, xp| *xp == 67)
        .return_once(move |_, _, _| Ok(XpCreditOutcome::Credited(UserProfile::new(credited_user))));

    let outcome = mocks
        .service()
        .complete_workout(request(&user, workout_id))
        .await
        .expect("completion");

    assert_eq!(outcome.class_bonus.total_xp, 67);
    assert_eq!(outcome.class_bonus.bonus_breakdown.len(), 1);
}

#[rstest]
#[tokio::test]
async fn repeated_completion_awards_nothing_twice(user: UserId) {
    let workout_id = WorkoutId::random();
    let mut mocks = Mocks::new(
        &user,
        Some(worked_example(&user, workout_id)),
        Some(UserProfile::new(user.clone())),
    );
    let credited_user = user.clone();
    mocks
        .profiles
        .expect_credit_workout_xp()
        .return_once(move |_, _, _| {
            Ok(XpCreditOutcome::AlreadyCredited(UserProfile::new(credited_user)))
        });

    let outcome = mocks
        .service()
        .complete_workout(request(&user, workout_id))
        .await
        .expect("completion");

    assert_eq!(outcome.xp_awarded, 0);
    assert!(outcome.already_credited);
}

#[rstest]
#[tokio::test]
async fn missing_workout_is_not_found(user: UserId) {
    let mocks = Mocks::new(&user, None, Some(UserProfile::new(user.clone())));

    let err = mocks
        .service()
        .complete_workout(request(&user, WorkoutId::random()))
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn unfinished_workout_is_rejected(user: UserId) {
    let workout_id = WorkoutId::random();
    let mut workout = worked_example(&user, workout_id);
    workout.completed_at = None;
    let mocks = Mocks::new(&user, Some(workout), Some(UserProfile::new(user.clone())));

    let err = mocks
        .service()
        .complete_workout(request(&user, workout_id))
        .await
        .expect_err("not completed");

    assert_eq!(err.code(), ErrorCode::Validation);
}

#[rstest]
#[tokio::test]
async fn credit_retries_transient_failures(user: UserId) {
    let workout_id = WorkoutId::random();
    let mut mocks = Mocks::new(
        &user,
        Some(worked_example(&user, workout_id)),
        Some(UserProfile::new(user.clone())),
    );
    let credited_user = user.clone();
    let mut calls = 0;
    mocks
        .profiles
        .expect_credit_workout_xp()
        .times(2)
        .returning(move |_, _, _| {
            calls += 1;
            if calls == 1 {
                Err(ProfileRepositoryError::timeout("slow"))
            } else {
                Ok(XpCreditOutcome::Credited(UserProfile::new(credited_user.clone())))
            }
        });

    let outcome = mocks
        .service()
        .complete_workout(request(&user, workout_id))
        .await
        .expect("completion");

    assert_eq!(outcome.xp_awarded, 56);
}

#[rstest]
#[tokio::test]
async fn achievement_failure_does_not_fail_completion(user: UserId) {
    let workout_id = WorkoutId::random();
    let mut mocks = Mocks::new(
        &user,
        Some(worked_example(&user, workout_id)),
        Some(UserProfile::new(user.clone())),
    );
    let credited_user = user.clone();
    mocks
        .profiles
        .expect_credit_workout_xp()
        .return_once(move |_, _, _| Ok(XpCreditOutcome::Credited(UserProfile::new(credited_user))));
    mocks.achievements.checkpoint();
    mocks
        .achievements
        .expect_check_achievements()
        .return_once(|_| Err(Error::network("award store timed out")));

    let outcome = mocks
        .service()
        .complete_workout(request(&user, workout_id))
        .await
        .expect("completion still succeeds");

    assert!(outcome.achievements.is_none());
    assert_eq!(
        outcome.achievement_error.map(|error| error.code()),
        Some(ErrorCode::Network)
    );
}
