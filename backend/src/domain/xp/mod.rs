//! XP component calculation.
//!
//! Pure functions turning a completed workout into its base XP parts. No
//! rule here can fail: malformed input (missing sets, zero duration)
//! contributes zero.

mod level;

pub use level::{level_for_xp, xp_for_level};

use serde::{Deserialize, Serialize};

use super::WorkoutSnapshot;

/// XP granted per exercise in the session.
pub const BASE_EXERCISE_XP: u32 = 5;
/// XP granted per completed set, up to [`MAX_XP_CONTRIBUTING_SETS`].
pub const BASE_SET_XP: u32 = 2;
/// Completed sets beyond this count earn nothing.
pub const MAX_XP_CONTRIBUTING_SETS: u32 = 10;
/// XP granted per personal record set during the workout.
pub const PR_BONUS_XP: u32 = 10;
/// Ceiling on the XP a single completion can award after class bonuses.
pub const DAILY_XP_CAP: u32 = 200;
/// Time XP never exceeds this value.
pub const MAX_TIME_XP: u32 = 90;

const FAST_RATE_MINUTES: u64 = 30;

/// Base XP parts of one workout.
///
/// ## Invariants
/// - `total_base_xp == time_xp + exercise_xp + sets_xp + pr_bonus`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpComponents {
    #[serde(rename = "timeXP")]
    pub time_xp: u32,
    #[serde(rename = "exerciseXP")]
    pub exercise_xp: u32,
    #[serde(rename = "setsXP")]
    pub sets_xp: u32,
    pub pr_bonus: u32,
    #[serde(rename = "totalBaseXP")]
    pub total_base_xp: u32,
}

impl XpComponents {
    /// Assemble components and derive the total.
    pub const fn new(time_xp: u32, exercise_xp: u32, sets_xp: u32, pr_bonus: u32) -> Self {
        Self {
            time_xp,
            exercise_xp,
            sets_xp,
            pr_bonus,
            total_base_xp: time_xp
                .saturating_add(exercise_xp)
                .saturating_add(sets_xp)
                .saturating_add(pr_bonus),
        }
    }
}

/// XP earned for time spent training.
///
/// The first 30 minutes earn four XP per three minutes; after that one XP
/// per further three minutes, saturating at [`MAX_TIME_XP`] from 180
/// minutes.
///
/// # Examples
/// ```
/// use fitquest::domain::xp::time_xp;
///
/// assert_eq!(time_xp(30 * 60), 40);
/// assert_eq!(time_xp(180 * 60), 90);
/// assert_eq!(time_xp(600 * 60), 90);
/// ```
pub fn time_xp(duration_seconds: u64) -> u32 {
    let minutes = duration_seconds / 60;
    let raw = if minutes <= FAST_RATE_MINUTES {
        minutes * 4 / 3
    } else {
        FAST_RATE_MINUTES * 4 / 3 + (minutes - FAST_RATE_MINUTES) / 3
    };
    u32::try_from(raw).map_or(MAX_TIME_XP, |xp| xp.min(MAX_TIME_XP))
}

/// XP earned for the number of exercises.
pub fn exercise_xp(snapshot: &WorkoutSnapshot) -> u32 {
    u32::try_from(snapshot.exercises.len())
        .unwrap_or(u32::MAX)
        .saturating_mul(BASE_EXERCISE_XP)
}

/// XP earned for completed sets, capped at [`MAX_XP_CONTRIBUTING_SETS`].
pub fn sets_xp(snapshot: &WorkoutSnapshot) -> u32 {
    let completed = u32::try_from(snapshot.completed_sets()).unwrap_or(u32::MAX);
    completed.min(MAX_XP_CONTRIBUTING_SETS) * BASE_SET_XP
}

/// Bonus for personal records set during the workout.
pub const fn personal_record_bonus(records: u32) -> u32 {
    records.saturating_mul(PR_BONUS_XP)
}

/// Compute every base XP component for a workout.
///
/// `pr_bonus` is supplied by the caller, typically from
/// [`personal_record_bonus`].
pub fn calculate_xp_components(snapshot: &WorkoutSnapshot, pr_bonus: u32) -> XpComponents {
    XpComponents::new(
        time_xp(snapshot.duration_seconds),
        exercise_xp(snapshot),
        sets_xp(snapshot),
        pr_bonus,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Exercise, ExerciseKind, ExerciseSet};
    use rstest::rstest;
    use serde_json::json;

    fn sets(completed: usize, skipped: usize) -> Vec<ExerciseSet> {
        std::iter::repeat_n(ExerciseSet::new(20.0, 10, true), completed)
            .chain(std::iter::repeat_n(ExerciseSet::new(20.0, 10, false), skipped))
            .collect()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(30, 40)]
    #[case(33, 41)]
    #[case(60, 50)]
    #[case(179, 89)]
    #[case(180, 90)]
    #[case(240, 90)]
    #[case(10_000, 90)]
    fn time_xp_rises_then_saturates(#[case] minutes: u64, #[case] expected: u32) {
        assert_eq!(time_xp(minutes * 60), expected);
    }

    #[rstest]
    fn time_xp_is_monotonic() {
        let mut previous = 0;
        for minutes in 0..=400 {
            let xp = time_xp(minutes * 60);
            assert!(xp >= previous, "time XP dropped at {minutes} minutes");
            previous = xp;
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(3, 6)]
    #[case(10, 20)]
    #[case(18, 20)]
    fn sets_xp_is_capped(#[case] completed: usize, #[case] expected: u32) {
        let snapshot = WorkoutSnapshot::new(
            vec![Exercise::new("row", ExerciseKind::Strength, sets(completed, 4))],
            0,
        );
        assert_eq!(sets_xp(&snapshot), expected);
        assert!(sets_xp(&snapshot) <= MAX_XP_CONTRIBUTING_SETS * BASE_SET_XP);
    }

    #[rstest]
    fn worked_example_totals_fifty_six() {
        let snapshot = WorkoutSnapshot::new(
            vec![
                Exercise::new("squat", ExerciseKind::Strength, sets(2, 0)),
                Exercise::new("lunge", ExerciseKind::Strength, sets(1, 1)),
            ],
            30 * 60,
        );

        let components = calculate_xp_components(&snapshot, 0);

        assert_eq!(components, XpComponents::new(40, 10, 6, 0));
        assert_eq!(components.total_base_xp, 56);
    }

    #[rstest]
    fn pr_bonus_adds_to_total() {
        let snapshot = WorkoutSnapshot::new(Vec::new(), 0);
        let components = calculate_xp_components(&snapshot, personal_record_bonus(2));
        assert_eq!(components.pr_bonus, 20);
        assert_eq!(components.total_base_xp, 20);
    }

    #[rstest]
    fn serialises_with_xp_suffixes() {
        let value = serde_json::to_value(XpComponents::new(40, 10, 6, 0)).expect("serialise");
        assert_eq!(
            value,
            json!({
                "timeXP": 40,
                "exerciseXP": 10,
                "setsXP": 6,
                "prBonus": 0,
                "totalBaseXP": 56
            })
        );
    }
}
