//! Composition root shared by the server, the admin CLI, and integration
//! tests.
//!
//! Driven ports come either from PostgreSQL (when a database URL is
//! configured) or from the in-memory store. Services are then assembled the
//! same way over whichever set was chosen.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use serde_json::Value;
use tracing::info;

use crate::domain::achievements::parse_catalogue;
use crate::domain::checkers::{CheckerPorts, default_checkers};
use crate::domain::ports::{
    AchievementAwardRepository, AchievementCatalogue, AchievementCatalogueCache,
    AchievementNotificationSink, AchievementProgressRepository, GuildMembershipRepository,
    PersonalRecordRepository, ProfileRepository, WorkoutRepository,
};
use crate::domain::{
    AchievementProgressService, CachedAchievementCatalogue, CoordinatorPorts, Error, RetryExecutor,
    UnifiedAchievementChecker, UserStatisticsService, WorkoutCompletionPorts,
    WorkoutCompletionService,
};
use crate::outbound::memory::InMemoryFitnessStore;
use crate::outbound::persistence::{
    DbPool, DieselAchievementAwardRepository, DieselAchievementCatalogue,
    DieselAchievementProgressRepository, DieselGuildMembershipRepository,
    DieselPersonalRecordRepository, DieselProfileRepository, DieselWorkoutRepository,
    MigrationError, PoolConfig, PoolError, run_pending_migrations,
};

/// Achievement definitions shipped with the crate.
pub const BUNDLED_CATALOGUE: &str = include_str!("../fixtures/achievements.json");

/// Validate a catalogue document and upsert every definition.
///
/// Nothing is written unless the whole document validates.
pub async fn seed_catalogue(
    catalogue: &dyn AchievementCatalogue,
    document: &str,
) -> Result<usize, Error> {
    let value: Value = serde_json::from_str(document)
        .map_err(|err| Error::validation(format!("catalogue is not valid JSON: {err}")))?;
    let achievements = parse_catalogue(value)?;
    let written = catalogue.upsert(&achievements).await?;
    info!(written, "achievement catalogue seeded");
    Ok(written)
}

/// Every driven persistence port.
#[derive(Clone)]
pub struct DrivenPorts {
    pub workouts: Arc<dyn WorkoutRepository>,
    pub records: Arc<dyn PersonalRecordRepository>,
    pub guilds: Arc<dyn GuildMembershipRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub catalogue: Arc<dyn AchievementCatalogue>,
    pub progress: Arc<dyn AchievementProgressRepository>,
    pub awards: Arc<dyn AchievementAwardRepository>,
}

impl DrivenPorts {
    /// All ports served by one in-memory store.
    pub fn in_memory(store: &Arc<InMemoryFitnessStore>) -> Self {
        Self {
            workouts: store.clone(),
            records: store.clone(),
            guilds: store.clone(),
            profiles: store.clone(),
            catalogue: store.clone(),
            progress: store.clone(),
            awards: store.clone(),
        }
    }

    /// All ports served by PostgreSQL through one pool.
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            workouts: Arc::new(DieselWorkoutRepository::new(pool.clone())),
            records: Arc::new(DieselPersonalRecordRepository::new(pool.clone())),
            guilds: Arc::new(DieselGuildMembershipRepository::new(pool.clone())),
            profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
            catalogue: Arc::new(DieselAchievementCatalogue::new(pool.clone())),
            progress: Arc::new(DieselAchievementProgressRepository::new(pool.clone())),
            awards: Arc::new(DieselAchievementAwardRepository::new(pool.clone())),
        }
    }
}

/// Failure choosing or preparing the driven ports.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database migrations failed: {0}")]
    Migration(#[from] MigrationError),
    #[error("database pool unavailable: {0}")]
    Pool(#[from] PoolError),
    #[error("bundled catalogue rejected: {0}")]
    Seed(#[from] Error),
}

/// PostgreSQL ports when `database_url` is set, after applying pending
/// migrations. Otherwise an in-memory store seeded with the bundled
/// catalogue.
///
/// # Errors
///
/// [`StartupError`] when migrations, the pool, or seeding fail.
pub async fn connect_driven_ports(database_url: Option<&str>) -> Result<DrivenPorts, StartupError> {
    match database_url {
        Some(url) => {
            run_pending_migrations(url).await?;
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            info!("using PostgreSQL store");
            Ok(DrivenPorts::diesel(&pool))
        }
        None => {
            let store = Arc::new(InMemoryFitnessStore::new());
            seed_catalogue(store.as_ref(), BUNDLED_CATALOGUE).await?;
            info!("no database configured; using in-memory store");
            Ok(DrivenPorts::in_memory(&store))
        }
    }
}

/// Runtime collaborators that are not persistence ports.
pub struct ServiceRuntime {
    pub retry: RetryExecutor,
    pub cache: Arc<dyn AchievementCatalogueCache>,
    pub cache_ttl: Duration,
    pub notifications: Arc<dyn AchievementNotificationSink>,
    pub clock: Arc<dyn Clock>,
}

/// Assembled domain services.
pub struct Services {
    pub catalogue: Arc<CachedAchievementCatalogue>,
    pub coordinator: Arc<UnifiedAchievementChecker>,
    pub completions: Arc<WorkoutCompletionService>,
    pub progress: Arc<AchievementProgressService>,
}

/// Wire services over `ports`. Every catalogue read goes through the cache.
pub fn build_services(ports: &DrivenPorts, runtime: ServiceRuntime) -> Services {
    let ServiceRuntime {
        retry,
        cache,
        cache_ttl,
        notifications,
        clock,
    } = runtime;

    let catalogue = Arc::new(CachedAchievementCatalogue::new(
        ports.catalogue.clone(),
        cache,
        cache_ttl,
    ));
    let cached: Arc<dyn AchievementCatalogue> = catalogue.clone();

    let checkers = default_checkers(&CheckerPorts {
        workouts: ports.workouts.clone(),
        profiles: ports.profiles.clone(),
        records: ports.records.clone(),
        guilds: ports.guilds.clone(),
        catalogue: cached.clone(),
    });
    let progress = AchievementProgressService::new(ports.progress.clone(), retry.clone());
    let statistics = UserStatisticsService::new(
        ports.workouts.clone(),
        ports.profiles.clone(),
        ports.records.clone(),
        ports.guilds.clone(),
    );

    let coordinator = Arc::new(UnifiedAchievementChecker::new(
        checkers,
        CoordinatorPorts {
            catalogue: cached,
            awards: ports.awards.clone(),
            notifications,
            progress: progress.clone(),
            statistics,
        },
        retry.clone(),
        clock,
    ));

    let completions = Arc::new(WorkoutCompletionService::new(
        WorkoutCompletionPorts {
            workouts: ports.workouts.clone(),
            records: ports.records.clone(),
            profiles: ports.profiles.clone(),
            achievements: coordinator.clone(),
        },
        retry,
    ));

    Services {
        catalogue,
        coordinator,
        completions,
        progress: Arc::new(progress),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[tokio::test]
    async fn bundled_catalogue_seeds_the_store() {
        let store = Arc::new(InMemoryFitnessStore::new());

        let written = seed_catalogue(store.as_ref(), BUNDLED_CATALOGUE)
            .await
            .expect("bundled catalogue seeds");

        let listed = store.list_all().await.expect("catalogue lists");
        assert_eq!(written, listed.len());
        assert!(listed.len() >= 16);
    }

    #[rstest]
    #[tokio::test]
    async fn without_a_database_the_store_is_seeded() {
        let ports = connect_driven_ports(None).await.expect("in-memory ports");

        let catalogue = ports.catalogue.list_all().await.expect("catalogue lists");
        assert!(catalogue.iter().any(|a| a.id().as_ref() == "first-workout"));
    }

    #[rstest]
    #[case("{ not json")]
    #[case(r#"[{"id": "BAD ID"}]"#)]
    #[tokio::test]
    async fn invalid_documents_write_nothing(#[case] document: &str) {
        let store = Arc::new(InMemoryFitnessStore::new());

        let err = seed_catalogue(store.as_ref(), document)
            .await
            .expect_err("document rejected");

        assert_eq!(err.code(), ErrorCode::Validation);
        assert!(store.list_all().await.expect("catalogue lists").is_empty());
    }
}
