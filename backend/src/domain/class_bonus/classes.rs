//! Bonus tables for the selectable classes.

use std::fmt;
use std::str::FromStr;

use super::{BonusAmount, BonusRule, BonusTrigger};
use crate::domain::ExerciseKind;

/// Selectable RPG class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroClass {
    Warrior,
    Ranger,
    Monk,
    Paladin,
    Rogue,
}

/// Returned when a class name matches no [`HeroClass`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown class: {0}")]
pub struct UnknownClass(pub String);

const WARRIOR: &[BonusRule] = &[
    BonusRule {
        source: "warrior_strength",
        trigger: BonusTrigger::ExerciseKind(ExerciseKind::Strength),
        amount: BonusAmount::Percent(20),
    },
    BonusRule {
        source: "warrior_volume",
        trigger: BonusTrigger::MinCompletedSets(12),
        amount: BonusAmount::Flat(10),
    },
];

const RANGER: &[BonusRule] = &[
    BonusRule {
        source: "ranger_cardio",
        trigger: BonusTrigger::ExerciseKind(ExerciseKind::Cardio),
        amount: BonusAmount::Percent(20),
    },
    BonusRule {
        source: "ranger_endurance",
        trigger: BonusTrigger::MinDurationMinutes(60),
        amount: BonusAmount::Flat(15),
    },
];

const MONK: &[BonusRule] = &[
    BonusRule {
        source: "monk_mobility",
        trigger: BonusTrigger::ExerciseKind(ExerciseKind::Mobility),
        amount: BonusAmount::Percent(25),
    },
    BonusRule {
        source: "monk_discipline",
        trigger: BonusTrigger::MinStreak(7),
        amount: BonusAmount::Percent(10),
    },
];

const PALADIN: &[BonusRule] = &[
    BonusRule {
        source: "paladin_devotion",
        trigger: BonusTrigger::MinStreak(3),
        amount: BonusAmount::Percent(10),
    },
    BonusRule {
        source: "paladin_zeal",
        trigger: BonusTrigger::MinStreak(14),
        amount: BonusAmount::Percent(15),
    },
];

const ROGUE: &[BonusRule] = &[
    BonusRule {
        source: "rogue_quick_strike",
        trigger: BonusTrigger::MaxDurationMinutes(30),
        amount: BonusAmount::Flat(10),
    },
    BonusRule {
        source: "rogue_agility",
        trigger: BonusTrigger::ExerciseKind(ExerciseKind::Bodyweight),
        amount: BonusAmount::Percent(15),
    },
];

impl HeroClass {
    /// Every class, in display order.
    pub const ALL: [Self; 5] = [
        Self::Warrior,
        Self::Ranger,
        Self::Monk,
        Self::Paladin,
        Self::Rogue,
    ];

    /// Lower-case class name as stored on profiles.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Ranger => "ranger",
            Self::Monk => "monk",
            Self::Paladin => "paladin",
            Self::Rogue => "rogue",
        }
    }

    /// Bonus rules for this class.
    pub const fn rules(self) -> &'static [BonusRule] {
        match self {
            Self::Warrior => WARRIOR,
            Self::Ranger => RANGER,
            Self::Monk => MONK,
            Self::Paladin => PALADIN,
            Self::Rogue => ROGUE,
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeroClass {
    type Err = UnknownClass;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownClass(value.to_owned()))
    }
}
