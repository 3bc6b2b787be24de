//! Read-through caching for the achievement catalogue.
//!
//! [`CachedAchievementCatalogue`] implements [`AchievementCatalogue`] itself,
//! so consumers take it wherever they would take the plain port. The cache
//! is injected, never global. Cache faults are logged and fall through to
//! the underlying store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::achievements::{Achievement, AchievementId};
use super::ports::{
    AchievementCatalogue, AchievementCatalogueCache, AchievementCatalogueError, CatalogueCacheKey,
};

/// Default lifetime of a cached catalogue snapshot.
pub const DEFAULT_CATALOGUE_TTL: Duration = Duration::from_secs(300);

pub struct CachedAchievementCatalogue {
    inner: Arc<dyn AchievementCatalogue>,
    cache: Arc<dyn AchievementCatalogueCache>,
    ttl: Duration,
}

impl CachedAchievementCatalogue {
    pub fn new(
        inner: Arc<dyn AchievementCatalogue>,
        cache: Arc<dyn AchievementCatalogueCache>,
        ttl: Duration,
    ) -> Self {
        Self { inner, cache, ttl }
    }

    /// Drop the cached snapshot so the next read goes to the store.
    pub async fn invalidate(&self) {
        let key = CatalogueCacheKey::all_achievements();
        if let Err(error) = self.cache.clear(&key).await {
            warn!(%error, key = %key, "catalogue cache clear failed");
        }
    }
}

#[async_trait]
impl AchievementCatalogue for CachedAchievementCatalogue {
    async fn list_all(&self) -> Result<Vec<Achievement>, AchievementCatalogueError> {
        let key = CatalogueCacheKey::all_achievements();
        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!(entries = cached.len(), "catalogue cache hit");
                return Ok(cached);
            }
            Ok(None) => debug!("catalogue cache miss"),
            Err(error) => warn!(%error, "catalogue cache read failed"),
        }

        let achievements = self.inner.list_all().await?;
        if let Err(error) = self.cache.set(&key, achievements.clone(), self.ttl).await {
            warn!(%error, "catalogue cache write failed");
        }
        Ok(achievements)
    }

    async fn find_by_ids(
        &self,
        ids: &[AchievementId],
    ) -> Result<Vec<Achievement>, AchievementCatalogueError> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|achievement| ids.contains(achievement.id()))
            .collect())
    }

    async fn upsert(&self, achievements: &[Achievement]) -> Result<usize, AchievementCatalogueError> {
        let written = self.inner.upsert(achievements).await?;
        self.invalidate().await;
        Ok(written)
    }
}
