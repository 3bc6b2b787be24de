//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Progress-relevant slice of each user's profile.
    profiles (user_id) {
        user_id -> Uuid,
        level -> Int4,
        /// Lifetime XP.
        xp -> Int8,
        /// Consecutive-day streak, maintained outside this service.
        streak -> Int4,
        class -> Nullable<Varchar>,
        workouts_count -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Workout sessions; exercises and sets are stored as one JSONB array.
    workouts (id) {
        id -> Uuid,
        user_id -> Uuid,
        started_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
        activity_type -> Nullable<Varchar>,
        is_manual -> Bool,
        duration_seconds -> Int8,
        exercises -> Jsonb,
    }
}

diesel::table! {
    /// One row per workout whose XP has been credited.
    ///
    /// The primary key makes the credit idempotent.
    workout_xp_credits (workout_id) {
        workout_id -> Uuid,
        user_id -> Uuid,
        xp -> Int4,
        credited_at -> Timestamptz,
    }
}

diesel::table! {
    personal_records (id) {
        id -> Uuid,
        user_id -> Uuid,
        workout_id -> Uuid,
        exercise_id -> Varchar,
        weight -> Float8,
        reps -> Int4,
        achieved_at -> Timestamptz,
    }
}

diesel::table! {
    guild_members (guild_id, user_id) {
        guild_id -> Uuid,
        user_id -> Uuid,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Achievement definitions.
    achievements (id) {
        id -> Varchar,
        name -> Varchar,
        description -> Text,
        category -> Varchar,
        rank -> Varchar,
        points -> Int4,
        xp_reward -> Int4,
        icon_name -> Varchar,
        /// Tagged requirement descriptor.
        requirements -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    achievement_progress (user_id, achievement_id) {
        user_id -> Uuid,
        achievement_id -> Varchar,
        current_value -> Int8,
        target_value -> Int8,
        is_complete -> Bool,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Awarded achievements. The composite primary key is what keeps an
    /// achievement from being awarded twice.
    user_achievements (user_id, achievement_id) {
        user_id -> Uuid,
        achievement_id -> Varchar,
        awarded_at -> Timestamptz,
    }
}

diesel::joinable!(achievement_progress -> achievements (achievement_id));
diesel::joinable!(user_achievements -> achievements (achievement_id));

diesel::allow_tables_to_appear_in_same_query!(
    achievement_progress,
    achievements,
    guild_members,
    personal_records,
    profiles,
    user_achievements,
    workout_xp_credits,
    workouts,
);
