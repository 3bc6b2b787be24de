//! Completed workout sessions as read by the XP calculator and checkers.
//!
//! A [`Workout`] is immutable once `completed_at` is set. The
//! [`WorkoutSnapshot`] is the part the XP rules look at: the ordered
//! exercise list and the total duration.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{Error, UserId};

/// Stable workout identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(Uuid);

impl WorkoutId {
    /// Parse a workout id from its textual UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, Error> {
        let raw = id.as_ref();
        if raw.trim().is_empty() {
            return Err(Error::validation("workout id must not be empty"));
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| Error::validation("workout id must be a valid UUID"))
    }

    /// Generate a new random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already parsed UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Broad exercise family used by class bonus triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ExerciseKind {
    Strength,
    Cardio,
    Mobility,
    Bodyweight,
    #[default]
    Other,
}

impl From<String> for ExerciseKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "strength" => Self::Strength,
            "cardio" => Self::Cardio,
            "mobility" => Self::Mobility,
            "bodyweight" => Self::Bodyweight,
            _ => Self::Other,
        }
    }
}

/// One set within an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub completed: bool,
}

impl ExerciseSet {
    /// Convenience constructor.
    pub const fn new(weight: f64, reps: u32, completed: bool) -> Self {
        Self {
            weight,
            reps,
            completed,
        }
    }
}

/// An exercise and its ordered sets.
///
/// A missing or `null` `sets` array deserialises as no sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    #[serde(default)]
    pub kind: ExerciseKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sets: Vec<ExerciseSet>,
}

impl Exercise {
    /// Build an exercise from its parts.
    pub fn new(id: impl Into<String>, kind: ExerciseKind, sets: Vec<ExerciseSet>) -> Self {
        Self {
            id: id.into(),
            kind,
            sets,
        }
    }

    /// Number of sets flagged as completed.
    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|set| set.completed).count()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw workout data fed to the XP calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSnapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub duration_seconds: u64,
}

impl WorkoutSnapshot {
    /// Build a snapshot from its parts.
    pub fn new(exercises: Vec<Exercise>, duration_seconds: u64) -> Self {
        Self {
            exercises,
            duration_seconds,
        }
    }

    /// Whole minutes of training, rounded down.
    pub const fn duration_minutes(&self) -> u64 {
        self.duration_seconds / 60
    }

    /// Completed sets across every exercise.
    pub fn completed_sets(&self) -> usize {
        self.exercises.iter().map(Exercise::completed_sets).sum()
    }

    /// Whether any exercise in the session is of the given kind.
    pub fn contains_kind(&self, kind: ExerciseKind) -> bool {
        self.exercises.iter().any(|exercise| exercise.kind == kind)
    }
}

/// A workout session belonging to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: WorkoutId,
    pub user_id: UserId,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form activity label ("running", "yoga", ...) used by the
    /// variety checker.
    pub activity_type: Option<String>,
    /// Logged after the fact rather than tracked live.
    #[serde(default)]
    pub is_manual: bool,
    #[serde(flatten)]
    pub snapshot: WorkoutSnapshot,
}

impl Workout {
    /// Whether the session has been marked complete.
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A personal record set by a user during a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    pub user_id: UserId,
    pub workout_id: WorkoutId,
    pub exercise_id: String,
    pub weight: f64,
    pub reps: u32,
    pub achieved_at: DateTime<Utc>,
}
