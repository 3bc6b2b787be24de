//! Domain primitives, rules, and services.
//!
//! Purpose: hold the XP arithmetic, class bonuses, achievement model and
//! checkers, and the services that coordinate them through ports. Nothing
//! here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserId, WorkoutId, Workout, UserProfile: core entities.
//! - `xp`, `class_bonus`, `achievements`: pure rules.
//! - `ports`: driving and driven port traits.
//! - Services: [`UnifiedAchievementChecker`], [`WorkoutCompletionService`],
//!   [`AchievementProgressService`], [`CachedAchievementCatalogue`].

pub mod achievements;
pub mod catalogue_service;
pub mod checkers;
pub mod class_bonus;
pub mod coordinator;
pub mod error;
pub mod ports;
pub mod profile;
pub mod progress_service;
pub mod retry;
pub mod statistics_service;
pub mod user;
pub mod workout;
pub mod workout_completion;
pub mod xp;

pub use self::catalogue_service::{CachedAchievementCatalogue, DEFAULT_CATALOGUE_TTL};
pub use self::coordinator::{CoordinatorPorts, UnifiedAchievementChecker};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile::UserProfile;
pub use self::progress_service::AchievementProgressService;
pub use self::retry::{RetryExecutor, RetryPolicy};
pub use self::statistics_service::UserStatisticsService;
pub use self::user::{UserId, UserValidationError};
pub use self::workout::{
    Exercise, ExerciseKind, ExerciseSet, PersonalRecord, Workout, WorkoutId, WorkoutSnapshot,
};
pub use self::workout_completion::{WorkoutCompletionPorts, WorkoutCompletionService};
