//! Port for achievement definitions.
//!
//! Definitions live in the data store; adapters validate rows on read and
//! report invalid ones as [`AchievementCatalogueError::InvalidDefinition`].

use async_trait::async_trait;

use crate::domain::achievements::{Achievement, AchievementId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by achievement catalogue adapters.
    pub enum AchievementCatalogueError {
        Connection { message: String } @ Database =>
            "achievement catalogue connection failed: {message}",
        Query { message: String } @ Database =>
            "achievement catalogue query failed: {message}",
        Timeout { message: String } @ Network =>
            "achievement catalogue timed out: {message}",
        /// A stored definition failed validation.
        InvalidDefinition { id: String, message: String } @ Processing =>
            "achievement {id} is invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementCatalogue: Send + Sync {
    /// Every definition, ordered by id.
    async fn list_all(&self) -> Result<Vec<Achievement>, AchievementCatalogueError>;

    /// Definitions for the given ids; unknown ids are omitted.
    async fn find_by_ids(
        &self,
        ids: &[AchievementId],
    ) -> Result<Vec<Achievement>, AchievementCatalogueError>;

    /// Insert or replace definitions. Returns the number written.
    async fn upsert(&self, achievements: &[Achievement]) -> Result<usize, AchievementCatalogueError>;
}

/// Fixture implementation with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementCatalogue;

#[async_trait]
impl AchievementCatalogue for FixtureAchievementCatalogue {
    async fn list_all(&self) -> Result<Vec<Achievement>, AchievementCatalogueError> {
        Ok(Vec::new())
    }

    async fn find_by_ids(
        &self,
        _ids: &[AchievementId],
    ) -> Result<Vec<Achievement>, AchievementCatalogueError> {
        Ok(Vec::new())
    }

    async fn upsert(&self, achievements: &[Achievement]) -> Result<usize, AchievementCatalogueError> {
        Ok(achievements.len())
    }
}
