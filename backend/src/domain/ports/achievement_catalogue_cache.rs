//! Port for caching catalogue snapshots with a time-to-live.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::achievements::Achievement;

use super::{CatalogueCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum AchievementCatalogueCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } @ Network =>
            "catalogue cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } @ Processing =>
            "catalogue cache serialisation failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementCatalogueCache: Send + Sync {
    /// Read a live entry; expired entries read as `None`.
    async fn get(
        &self,
        key: &CatalogueCacheKey,
    ) -> Result<Option<Vec<Achievement>>, AchievementCatalogueCacheError>;

    /// Store an entry that expires after `ttl`.
    async fn set(
        &self,
        key: &CatalogueCacheKey,
        achievements: Vec<Achievement>,
        ttl: Duration,
    ) -> Result<(), AchievementCatalogueCacheError>;

    /// Drop an entry.
    async fn clear(&self, key: &CatalogueCacheKey) -> Result<(), AchievementCatalogueCacheError>;
}

/// Fixture implementation that never holds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementCatalogueCache;

#[async_trait]
impl AchievementCatalogueCache for FixtureAchievementCatalogueCache {
    async fn get(
        &self,
        _key: &CatalogueCacheKey,
    ) -> Result<Option<Vec<Achievement>>, AchievementCatalogueCacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &CatalogueCacheKey,
        _achievements: Vec<Achievement>,
        _ttl: Duration,
    ) -> Result<(), AchievementCatalogueCacheError> {
        Ok(())
    }

    async fn clear(&self, _key: &CatalogueCacheKey) -> Result<(), AchievementCatalogueCacheError> {
        Ok(())
    }
}
