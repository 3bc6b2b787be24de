//! Achievement definition entity and its enumerated attributes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AchievementValidationError;
use super::requirement::{Requirement, RequirementProgress, UserStatistics};
use super::validation::{is_valid_id, validate_non_empty_field};

/// Stable achievement identifier such as `first-workout` or `pr_first`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AchievementId(String);

impl AchievementId {
    /// Validate and construct an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, AchievementValidationError> {
        let id = id.into();
        if !is_valid_id(&id) {
            return Err(AchievementValidationError::InvalidId {
                field: "achievement.id",
            });
        }
        Ok(Self(id))
    }

    /// Construct an identifier known at compile time to be valid.
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(is_valid_id(id), "static achievement id {id} is invalid");
        Self(id.to_owned())
    }
}

impl AsRef<str> for AchievementId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AchievementId> for String {
    fn from(value: AchievementId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AchievementId {
    type Error = AchievementValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

macro_rules! string_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident : $error:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $label:literal ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Canonical stored label.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AchievementValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let needle = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| AchievementValidationError::$error {
                        value: value.to_owned(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = AchievementValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_owned()
            }
        }
    };
}

string_enum! {
    /// Grouping used for display and checker routing.
    pub enum AchievementCategory: UnknownCategory {
        Workout => "WORKOUT",
        Streak => "STREAK",
        Record => "RECORD",
        Variety => "VARIETY",
        Guild => "GUILD",
        Level => "LEVEL",
        Xp => "XP",
        Manual => "MANUAL",
        Special => "SPECIAL",
        Weekly => "WEEKLY",
        Class => "CLASS",
    }
}

string_enum! {
    /// Difficulty rank, ordered from `E` (easiest) to `S`.
    #[derive(PartialOrd, Ord)]
    pub enum AchievementRank: UnknownRank {
        E => "E",
        D => "D",
        C => "C",
        B => "B",
        A => "A",
        S => "S",
    }
}

/// Input payload for [`Achievement::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDraft {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub rank: String,
    pub points: u32,
    pub xp_reward: u32,
    pub icon_name: String,
    pub requirements: Requirement,
}

/// Immutable achievement definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    id: AchievementId,
    name: String,
    description: String,
    category: AchievementCategory,
    rank: AchievementRank,
    points: u32,
    xp_reward: u32,
    icon_name: String,
    requirements: Requirement,
}

impl Achievement {
    /// Validate and construct an achievement.
    pub fn new(draft: AchievementDraft) -> Result<Self, AchievementValidationError> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> &AchievementId {
        &self.id
    }
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
    pub fn category(&self) -> AchievementCategory {
        self.category
    }
    pub fn rank(&self) -> AchievementRank {
        self.rank
    }
    pub fn points(&self) -> u32 {
        self.points
    }
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }
    pub fn icon_name(&self) -> &str {
        self.icon_name.as_str()
    }
    pub fn requirements(&self) -> &Requirement {
        &self.requirements
    }

    /// Progress of `stats` toward this achievement, counting what its
    /// category tracks.
    pub fn progress(&self, stats: &UserStatistics) -> RequirementProgress {
        self.requirements.progress_for(self.category, stats)
    }
}

impl TryFrom<AchievementDraft> for Achievement {
    type Error = AchievementValidationError;

    fn try_from(draft: AchievementDraft) -> Result<Self, Self::Error> {
        let id = AchievementId::new(draft.id)?;
        let name = validate_non_empty_field(draft.name, "achievement.name")?;
        let description = validate_non_empty_field(draft.description, "achievement.description")?;
        let icon_name = validate_non_empty_field(draft.icon_name, "achievement.icon_name")?;
        let category = draft.category.parse()?;
        let rank = draft.rank.parse()?;
        draft.requirements.validate()?;

        Ok(Self {
            id,
            name,
            description,
            category,
            rank,
            points: draft.points,
            xp_reward: draft.xp_reward,
            icon_name,
            requirements: draft.requirements,
        })
    }
}

impl From<Achievement> for AchievementDraft {
    fn from(value: Achievement) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            description: value.description,
            category: value.category.into(),
            rank: value.rank.into(),
            points: value.points,
            xp_reward: value.xp_reward,
            icon_name: value.icon_name,
            requirements: value.requirements,
        }
    }
}

impl<'de> Deserialize<'de> for Achievement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        AchievementDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}
