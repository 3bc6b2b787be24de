//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters translate between row structs (`models.rs`) and domain types and
//! map every Diesel or pool failure into the port's error enum. Rows and
//! schema stay private to this module.

mod diesel_achievement_award_repository;
mod diesel_achievement_catalogue;
mod diesel_achievement_progress_repository;
mod diesel_basic_error_mapping;
mod diesel_guild_membership_repository;
mod diesel_personal_record_repository;
mod diesel_profile_repository;
mod diesel_workout_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_achievement_award_repository::DieselAchievementAwardRepository;
pub use diesel_achievement_catalogue::DieselAchievementCatalogue;
pub use diesel_achievement_progress_repository::DieselAchievementProgressRepository;
pub use diesel_guild_membership_repository::DieselGuildMembershipRepository;
pub use diesel_personal_record_repository::DieselPersonalRecordRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_workout_repository::DieselWorkoutRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
