//! Shared harness for end-to-end tests over the in-memory store.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use fitquest::composition::{
    BUNDLED_CATALOGUE, DrivenPorts, ServiceRuntime, Services, build_services, seed_catalogue,
};
use fitquest::domain::{
    Exercise, ExerciseKind, ExerciseSet, UserId, UserProfile, Workout, WorkoutId, WorkoutSnapshot,
};
use fitquest::outbound::cache::InMemoryCatalogueCache;
use fitquest::outbound::memory::InMemoryFitnessStore;
use fitquest::outbound::queue::{NotificationQueue, notification_channel};
use fitquest::test_support::{MutableClock, instant_retry};
use std::time::Duration;

/// Fixed instant used as "now" by the harness clock.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Services wired over a seeded in-memory store.
pub struct Harness {
    pub store: Arc<InMemoryFitnessStore>,
    pub services: Services,
    pub queue: NotificationQueue,
}

impl Harness {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryFitnessStore::new());
        let ports = DrivenPorts::in_memory(&store);
        Self::with_ports(store, ports).await
    }

    /// Harness over custom ports; `store` still receives the catalogue.
    pub async fn with_ports(store: Arc<InMemoryFitnessStore>, ports: DrivenPorts) -> Self {
        seed_catalogue(store.as_ref(), BUNDLED_CATALOGUE)
            .await
            .expect("bundled catalogue seeds");
        let clock = Arc::new(MutableClock::new(now()));
        let (sink, queue) = notification_channel();
        let services = build_services(
            &ports,
            ServiceRuntime {
                retry: instant_retry(3),
                cache: Arc::new(InMemoryCatalogueCache::new(clock.clone())),
                cache_ttl: Duration::from_secs(300),
                notifications: Arc::new(sink),
                clock,
            },
        );
        Self {
            store,
            services,
            queue,
        }
    }

    /// Register a fresh profile and return its user id.
    pub fn new_user(&self) -> UserId {
        let user_id = UserId::random();
        self.store.insert_profile(UserProfile::new(user_id.clone()));
        user_id
    }
}

/// A 30 minute workout with two exercises and three completed sets,
/// worth 56 base XP.
pub fn worked_example(user_id: &UserId, completed_at: DateTime<Utc>) -> Workout {
    Workout {
        id: WorkoutId::random(),
        user_id: user_id.clone(),
        started_at: completed_at - chrono::Duration::minutes(30),
        completed_at: Some(completed_at),
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
