//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod achievement_award_repository;
mod achievement_catalogue;
mod achievement_catalogue_cache;
mod achievement_check_command;
mod achievement_notification_sink;
mod achievement_progress_query;
mod achievement_progress_repository;
mod cache_key;
mod guild_membership_repository;
mod personal_record_repository;
mod profile_repository;
mod workout_completion_command;
mod workout_repository;

#[cfg(test)]
pub use achievement_award_repository::MockAchievementAwardRepository;
pub use achievement_award_repository::{
    AchievementAwardRepository, AchievementAwardRepositoryError, AwardOutcome,
    FixtureAchievementAwardRepository,
};
#[cfg(test)]
pub use achievement_catalogue::MockAchievementCatalogue;
pub use achievement_catalogue::{
    AchievementCatalogue, AchievementCatalogueError, FixtureAchievementCatalogue,
};
#[cfg(test)]
pub use achievement_catalogue_cache::MockAchievementCatalogueCache;
pub use achievement_catalogue_cache::{
    AchievementCatalogueCache, AchievementCatalogueCacheError, FixtureAchievementCatalogueCache,
};
#[cfg(test)]
pub use achievement_check_command::MockAchievementCheckCommand;
pub use achievement_check_command::{AchievementCheckCommand, FixtureAchievementCheckCommand};
#[cfg(test)]
pub use achievement_notification_sink::MockAchievementNotificationSink;
pub use achievement_notification_sink::{
    AchievementNotificationSink, FixtureAchievementNotificationSink, NotificationSinkError,
};
#[cfg(test)]
pub use achievement_progress_query::MockAchievementProgressQuery;
pub use achievement_progress_query::{AchievementProgressQuery, FixtureAchievementProgressQuery};
#[cfg(test)]
pub use achievement_progress_repository::MockAchievementProgressRepository;
pub use achievement_progress_repository::{
    AchievementProgressRepository, AchievementProgressRepositoryError,
    FixtureAchievementProgressRepository,
};
pub use cache_key::{CatalogueCacheKey, CatalogueCacheKeyValidationError};
#[cfg(test)]
pub use guild_membership_repository::MockGuildMembershipRepository;
pub use guild_membership_repository::{
    FixtureGuildMembershipRepository, GuildMembershipRepository, GuildMembershipRepositoryError,
};
#[cfg(test)]
pub use personal_record_repository::MockPersonalRecordRepository;
pub use personal_record_repository::{
    FixturePersonalRecordRepository, PersonalRecordRepository, PersonalRecordRepositoryError,
};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{
    FixtureProfileRepository, ProfileRepository, ProfileRepositoryError, XpCreditOutcome,
};
#[cfg(test)]
pub use workout_completion_command::MockWorkoutCompletionCommand;
pub use workout_completion_command::{
    CompleteWorkoutRequest, WorkoutCompletionCommand, WorkoutCompletionOutcome,
};
#[cfg(test)]
pub use workout_repository::MockWorkoutRepository;
pub use workout_repository::{
    FixtureWorkoutRepository, WorkoutRepository, WorkoutRepositoryError,
};
