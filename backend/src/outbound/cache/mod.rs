//! In-process TTL cache for catalogue snapshots.
//!
//! Entries carry an absolute expiry computed from the injected [`Clock`], so
//! tests can step time forward without sleeping. Expired entries are dropped
//! on read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::achievements::Achievement;
use crate::domain::ports::{
    AchievementCatalogueCache, AchievementCatalogueCacheError, CatalogueCacheKey,
};

struct Entry {
    achievements: Vec<Achievement>,
    expires_at: DateTime<Utc>,
}

/// Memory-backed [`AchievementCatalogueCache`].
pub struct InMemoryCatalogueCache {
    entries: Mutex<HashMap<CatalogueCacheKey, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCatalogueCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CatalogueCacheKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AchievementCatalogueCache for InMemoryCatalogueCache {
    async fn get(
        &self,
        key: &CatalogueCacheKey,
    ) -> Result<Option<Vec<Achievement>>, AchievementCatalogueCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.achievements.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &CatalogueCacheKey,
        achievements: Vec<Achievement>,
        ttl: Duration,
    ) -> Result<(), AchievementCatalogueCacheError> {
        let ttl = TimeDelta::from_std(ttl).map_err(|err| {
            AchievementCatalogueCacheError::backend(format!("ttl out of range: {err}"))
        })?;
        let expires_at = self.clock.utc() + ttl;
        self.lock().insert(
            key.clone(),
            Entry {
                achievements,
                expires_at,
            },
        );
        Ok(())
    }

    async fn clear(&self, key: &CatalogueCacheKey) -> Result<(), AchievementCatalogueCacheError> {
        self.lock().remove(key);
        Ok(())
    }
}
