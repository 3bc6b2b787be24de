//! Shared test doubles for unit tests (in `src/`) and integration tests
//! (in `tests/`).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::achievements::{Achievement, AchievementDraft, Requirement};
use crate::domain::retry::{NoJitter, RetryPolicy, RetrySleeper};
use crate::domain::{RetryExecutor, UserId, Workout, WorkoutId, WorkoutSnapshot};

/// Clock whose reading only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => panic!("duration out of range for TimeDelta: {error}; delta={delta:?}"),
        };
        *self.lock_clock() += delta;
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Sleeper that returns at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl RetrySleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that records each requested delay.
#[derive(Default)]
pub struct RecordingSleeper(pub Mutex<Vec<Duration>>);

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        match self.0.lock() {
            Ok(entries) => entries.clone(),
            Err(_) => panic!("sleeper mutex"),
        }
    }
}

#[async_trait]
impl RetrySleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        let mut entries = match self.0.lock() {
            Ok(entries) => entries,
            Err(_) => panic!("sleeper mutex"),
        };
        entries.push(duration);
    }
}

/// Retry executor with `max_attempts` attempts and no real waiting.
pub fn instant_retry(max_attempts: u32) -> RetryExecutor {
    RetryExecutor::with_runtime(
        RetryPolicy::new(max_attempts, Duration::from_millis(1), Duration::from_millis(4)),
        Arc::new(ImmediateSleeper),
        Arc::new(NoJitter),
    )
}

/// Valid `WORKOUT`/`E` definition with the given reward and requirement.
pub fn achievement(id: &str, xp_reward: u32, requirements: Requirement) -> Achievement {
    match Achievement::new(AchievementDraft {
        id: id.into(),
        name: format!("{id} name"),
        description: format!("{id} description"),
        category: "WORKOUT".into(),
        rank: "E".into(),
        points: 10,
        xp_reward,
        icon_name: "trophy".into(),
        requirements,
    }) {
        Ok(achievement) => achievement,
        Err(error) => panic!("invalid test achievement {id}: {error}"),
    }
}

/// Completed, tracked workout with an empty snapshot.
pub fn completed_workout(user_id: &UserId, completed_at: DateTime<Utc>) -> Workout {
    Workout {
        id: WorkoutId::random(),
        user_id: user_id.clone(),
        started_at: completed_at - TimeDelta::minutes(30),
        completed_at: Some(completed_at),
        activity_type: None,
        is_manual: false,
        snapshot: WorkoutSnapshot::default(),
    }
}
