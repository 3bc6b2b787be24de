//! In-process store implementing every driven persistence port.
//!
//! Backs local development when no database URL is configured and gives
//! integration tests a deterministic store. Writes honour the same
//! idempotency rules as the PostgreSQL adapters: an XP credit or an award
//! is recorded at most once per key, checked and written under one lock.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::achievements::{
    Achievement, AchievementId, AchievementProgress, ProgressUpdate,
};
use crate::domain::ports::{
    AchievementAwardRepository, AchievementAwardRepositoryError, AchievementCatalogue,
    AchievementCatalogueError, AchievementProgressRepository, AchievementProgressRepositoryError,
    AwardOutcome, GuildMembershipRepository, GuildMembershipRepositoryError,
    PersonalRecordRepository, PersonalRecordRepositoryError, ProfileRepository,
    ProfileRepositoryError, WorkoutRepository, WorkoutRepositoryError, XpCreditOutcome,
};
use crate::domain::{PersonalRecord, UserId, UserProfile, Workout, WorkoutId};

#[derive(Default)]
struct State {
    workouts: HashMap<WorkoutId, Workout>,
    records: Vec<PersonalRecord>,
    guilds: HashMap<UserId, u32>,
    profiles: HashMap<UserId, UserProfile>,
    credited_workouts: HashSet<(UserId, WorkoutId)>,
    catalogue: BTreeMap<AchievementId, Achievement>,
    awards: HashMap<UserId, BTreeMap<AchievementId, DateTime<Utc>>>,
    progress: HashMap<(UserId, AchievementId), AchievementProgress>,
}

/// Mutex-guarded store of workouts, profiles, and achievement state.
#[derive(Default)]
pub struct InMemoryFitnessStore {
    state: Mutex<State>,
}

impl InMemoryFitnessStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind; keep serving.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a workout.
    pub fn insert_workout(&self, workout: Workout) {
        self.lock().workouts.insert(workout.id, workout);
    }

    pub fn insert_personal_record(&self, record: PersonalRecord) {
        self.lock().records.push(record);
    }

    /// Set the number of guilds `user_id` belongs to.
    pub fn set_guild_memberships(&self, user_id: &UserId, count: u32) {
        self.lock().guilds.insert(user_id.clone(), count);
    }

    /// Insert or replace a profile.
    pub fn insert_profile(&self, profile: UserProfile) {
        self.lock().profiles.insert(profile.user_id.clone(), profile);
    }

    /// Current copy of a profile.
    pub fn profile(&self, user_id: &UserId) -> Option<UserProfile> {
        self.lock().profiles.get(user_id).cloned()
    }

    /// Number of awards held by `user_id`.
    pub fn award_count(&self, user_id: &UserId) -> usize {
        self.lock().awards.get(user_id).map_or(0, BTreeMap::len)
    }
}

fn completed_for<'a>(state: &'a State, user_id: &'a UserId) -> impl Iterator<Item = &'a Workout> {
    state
        .workouts
        .values()
        .filter(move |workout| &workout.user_id == user_id && workout.is_completed())
}

fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[async_trait]
impl WorkoutRepository for InMemoryFitnessStore {
    async fn find_by_id(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
    ) -> Result<Option<Workout>, WorkoutRepositoryError> {
        Ok(self
            .lock()
            .workouts
            .get(workout_id)
            .filter(|workout| &workout.user_id == user_id)
            .cloned())
    }

    async fn count_completed(&self, user_id: &UserId) -> Result<u32, WorkoutRepositoryError> {
        let state = self.lock();
        Ok(saturating_count(completed_for(&state, user_id).count()))
    }

    async fn count_manual(&self, user_id: &UserId) -> Result<u32, WorkoutRepositoryError> {
        let state = self.lock();
        Ok(saturating_count(
            completed_for(&state, user_id)
                .filter(|workout| workout.is_manual)
                .count(),
        ))
    }

    async fn list_completion_times(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DateTime<Utc>>, WorkoutRepositoryError> {
        let state = self.lock();
        let mut times: Vec<_> = completed_for(&state, user_id)
            .filter_map(|workout| workout.completed_at)
            .collect();
        times.sort_unstable();
        Ok(times)
    }

    async fn distinct_activity_types(
        &self,
        user_id: &UserId,
    ) -> Result<u32, WorkoutRepositoryError> {
        let state = self.lock();
        let kinds: HashSet<&str> = completed_for(&state, user_id)
            .filter_map(|workout| workout.activity_type.as_deref())
            .collect();
        Ok(saturating_count(kinds.len()))
    }
}

#[async_trait]
impl PersonalRecordRepository for InMemoryFitnessStore {
    async fn count_for_user(&self, user_id: &UserId) -> Result<u32, PersonalRecordRepositoryError> {
        let state = self.lock();
        Ok(saturating_count(
            state
                .records
                .iter()
                .filter(|record| &record.user_id == user_id)
                .count(),
        ))
    }

    async fn count_for_workout(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
    ) -> Result<u32, PersonalRecordRepositoryError> {
        let state = self.lock();
        Ok(saturating_count(
            state
                .records
                .iter()
                .filter(|record| &record.user_id == user_id && &record.workout_id == workout_id)
                .count(),
        ))
    }
}

#[async_trait]
impl GuildMembershipRepository for InMemoryFitnessStore {
    async fn count_memberships(
        &self,
        user_id: &UserId,
    ) -> Result<u32, GuildMembershipRepositoryError> {
        Ok(self.lock().guilds.get(user_id).copied().unwrap_or_default())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryFitnessStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        Ok(self.profile(user_id))
    }

    async fn credit_workout_xp(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
        xp: u32,
    ) -> Result<XpCreditOutcome, ProfileRepositoryError> {
        let mut state = self.lock();
        let first_credit = !state
            .credited_workouts
            .contains(&(user_id.clone(), *workout_id));
        let profile = state
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| ProfileRepositoryError::missing_profile(user_id.to_string()))?;
        if !first_credit {
            return Ok(XpCreditOutcome::AlreadyCredited(profile.clone()));
        }
        profile.credit_xp(u64::from(xp));
        profile.workouts_count = profile.workouts_count.saturating_add(1);
        let updated = profile.clone();
        state.credited_workouts.insert((user_id.clone(), *workout_id));
        debug!(%user_id, %workout_id, xp, "workout xp credited");
        Ok(XpCreditOutcome::Credited(updated))
    }
}

#[async_trait]
impl AchievementCatalogue for InMemoryFitnessStore {
    async fn list_all(&self) -> Result<Vec<Achievement>, AchievementCatalogueError> {
        Ok(self.lock().catalogue.values().cloned().collect())
    }

    async fn find_by_ids(
        &self,
        ids: &[AchievementId],
    ) -> Result<Vec<Achievement>, AchievementCatalogueError> {
        let state = self.lock();
        let wanted: HashSet<&AchievementId> = ids.iter().collect();
        Ok(state
            .catalogue
            .values()
            .filter(|achievement| wanted.contains(achievement.id()))
            .cloned()
            .collect())
    }

    async fn upsert(&self, achievements: &[Achievement]) -> Result<usize, AchievementCatalogueError> {
        let mut state = self.lock();
        for achievement in achievements {
            state
                .catalogue
                .insert(achievement.id().clone(), achievement.clone());
        }
        Ok(achievements.len())
    }
}

#[async_trait]
impl AchievementProgressRepository for InMemoryFitnessStore {
    async fn find(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<Option<AchievementProgress>, AchievementProgressRepositoryError> {
        Ok(self
            .lock()
            .progress
            .get(&(user_id.clone(), achievement_id.clone()))
            .copied())
    }

    async fn upsert(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), AchievementProgressRepositoryError> {
        self.upsert_batch(user_id, std::slice::from_ref(update)).await
    }

    async fn upsert_batch(
        &self,
        user_id: &UserId,
        updates: &[ProgressUpdate],
    ) -> Result<(), AchievementProgressRepositoryError> {
        let mut state = self.lock();
        // Validate the whole batch before touching anything.
        if let Some(unknown) = updates
            .iter()
            .find(|update| !state.catalogue.contains_key(&update.achievement_id))
        {
            return Err(AchievementProgressRepositoryError::unknown_achievement(
                unknown.achievement_id.to_string(),
            ));
        }
        for update in updates {
            let key = (user_id.clone(), update.achievement_id.clone());
            let merged = AchievementProgress::merge(state.progress.get(&key), update);
            state.progress.insert(key, merged);
        }
        Ok(())
    }
}

#[async_trait]
impl AchievementAwardRepository for InMemoryFitnessStore {
    async fn awarded_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AchievementId>, AchievementAwardRepositoryError> {
        Ok(self
            .lock()
            .awards
            .get(user_id)
            .map(|held| held.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn award(
        &self,
        user_id: &UserId,
        achievement: &Achievement,
        awarded_at: DateTime<Utc>,
    ) -> Result<AwardOutcome, AchievementAwardRepositoryError> {
        let mut state = self.lock();
        if !state.profiles.contains_key(user_id) {
            return Err(AchievementAwardRepositoryError::missing_profile(
                user_id.to_string(),
            ));
        }
        let held = state.awards.entry(user_id.clone()).or_default();
        if held.contains_key(achievement.id()) {
            return Ok(AwardOutcome::AlreadyAwarded);
        }
        held.insert(achievement.id().clone(), awarded_at);

        let xp_credited = achievement.xp_reward();
        if let Some(profile) = state.profiles.get_mut(user_id) {
            profile.credit_xp(u64::from(xp_credited));
        }
        Ok(AwardOutcome::Awarded { xp_credited })
    }
}
