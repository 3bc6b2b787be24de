//! Class bonus application.
//!
//! Each [`HeroClass`] carries a fixed table of [`BonusRule`]s. Matching
//! rules contribute additively; the final total is clamped to
//! [`DAILY_XP_CAP`] no matter how the bonuses stack.

mod classes;

pub use classes::{HeroClass, UnknownClass};

use serde::{Deserialize, Serialize};

use super::xp::{DAILY_XP_CAP, XpComponents};
use super::{ExerciseKind, WorkoutSnapshot};

/// Condition under which a bonus rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusTrigger {
    /// The session contains at least one exercise of this kind.
    ExerciseKind(ExerciseKind),
    /// At least this many completed sets across the session.
    MinCompletedSets(u32),
    /// The session lasted at least this many whole minutes.
    MinDurationMinutes(u64),
    /// The session lasted at most this many whole minutes.
    MaxDurationMinutes(u64),
    /// The user's current streak is at least this many days.
    MinStreak(u32),
}

impl BonusTrigger {
    fn matches(self, snapshot: &WorkoutSnapshot, streak: u32) -> bool {
        match self {
            Self::ExerciseKind(kind) => snapshot.contains_kind(kind),
            Self::MinCompletedSets(sets) => {
                u32::try_from(snapshot.completed_sets()).unwrap_or(u32::MAX) >= sets
            }
            Self::MinDurationMinutes(minutes) => snapshot.duration_minutes() >= minutes,
            Self::MaxDurationMinutes(minutes) => snapshot.duration_minutes() <= minutes,
            Self::MinStreak(days) => streak >= days,
        }
    }
}

/// Size of a bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusAmount {
    /// Whole-number percentage of the base total, rounded down.
    Percent(u32),
    /// Fixed XP.
    Flat(u32),
}

impl BonusAmount {
    fn resolve(self, total_base_xp: u32) -> u32 {
        match self {
            Self::Percent(percent) => {
                let scaled = u64::from(total_base_xp) * u64::from(percent) / 100;
                u32::try_from(scaled).unwrap_or(u32::MAX)
            }
            Self::Flat(xp) => xp,
        }
    }
}

/// One named rule in a class's bonus table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusRule {
    pub source: &'static str,
    pub trigger: BonusTrigger,
    pub amount: BonusAmount,
}

/// An applied bonus, reported for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusEntry {
    pub source: String,
    pub amount: u32,
}

/// Outcome of applying a class to base XP.
///
/// ## Invariants
/// - `total_xp <= DAILY_XP_CAP`.
/// - `bonus_breakdown` has one entry per applied rule, including rules
///   worth 0 XP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBonusResult {
    #[serde(rename = "totalXP")]
    pub total_xp: u32,
    pub bonus_breakdown: Vec<BonusEntry>,
}

/// Apply the named class's bonuses to `components`.
///
/// `None` or an unrecognised class name yields no bonuses, but the cap
/// still applies.
///
/// # Examples
/// ```
/// use fitquest::domain::class_bonus::apply_class_bonus;
/// use fitquest::domain::xp::XpComponents;
/// use fitquest::domain::WorkoutSnapshot;
///
/// let components = XpComponents::new(90, 60, 20, 40);
/// let result = apply_class_bonus(&components, &WorkoutSnapshot::default(), None, 0);
/// assert_eq!(result.total_xp, 200);
/// assert!(result.bonus_breakdown.is_empty());
/// ```
pub fn apply_class_bonus(
    components: &XpComponents,
    snapshot: &WorkoutSnapshot,
    class: Option<&str>,
    streak: u32,
) -> ClassBonusResult {
    let rules = class
        .and_then(|name| name.parse::<HeroClass>().ok())
        .map_or(&[][..], HeroClass::rules);

    let base = components.total_base_xp;
    let bonus_breakdown: Vec<BonusEntry> = rules
        .iter()
        .filter(|rule| rule.trigger.matches(snapshot, streak))
        .map(|rule| BonusEntry {
            source: rule.source.to_owned(),
            amount: rule.amount.resolve(base),
        })
        .collect();

    let bonus_total = bonus_breakdown
        .iter()
        .fold(0_u32, |sum, entry| sum.saturating_add(entry.amount));

    ClassBonusResult {
        total_xp: base.saturating_add(bonus_total).min(DAILY_XP_CAP),
        bonus_breakdown,
    }
}
