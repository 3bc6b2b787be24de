//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Conversions to domain
//! types live next to the adapter that needs them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    achievement_progress, achievements, profiles, user_achievements, workout_xp_credits, workouts,
};

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub user_id: Uuid,
    pub level: i32,
    pub xp: i64,
    pub streak: i32,
    pub class: Option<String>,
    pub workouts_count: i32,
}

/// Changeset written after an XP credit.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profiles)]
pub(crate) struct ProfileXpUpdate {
    pub level: i32,
    pub xp: i64,
    pub workouts_count: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workout_xp_credits)]
pub(crate) struct NewWorkoutXpCreditRow {
    pub workout_id: Uuid,
    pub user_id: Uuid,
    pub xp: i32,
    pub credited_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Workouts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workouts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkoutRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub activity_type: Option<String>,
    pub is_manual: bool,
    pub duration_seconds: i64,
    pub exercises: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = achievements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AchievementRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub rank: String,
    pub points: i32,
    pub xp_reward: i32,
    pub icon_name: String,
    pub requirements: serde_json::Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = achievements)]
pub(crate) struct NewAchievementRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub rank: &'a str,
    pub points: i32,
    pub xp_reward: i32,
    pub icon_name: &'a str,
    pub requirements: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = achievement_progress)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AchievementProgressRow {
    pub current_value: i64,
    pub target_value: i64,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = achievement_progress)]
pub(crate) struct NewAchievementProgressRow<'a> {
    pub user_id: Uuid,
    pub achievement_id: &'a str,
    pub current_value: i64,
    pub target_value: i64,
    pub is_complete: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_achievements)]
pub(crate) struct NewUserAchievementRow<'a> {
    pub user_id: Uuid,
    pub achievement_id: &'a str,
    pub awarded_at: DateTime<Utc>,
}
