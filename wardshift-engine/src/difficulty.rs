//! Difficulty ladder and per-tier unlock gates
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clinical seniority tiers, ordered from easiest to hardest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Intern,
    Resident,
    Attending,
}

/// Ladder order used for prefix-gated unlocks.
pub const DIFFICULTY_LADDER: [DifficultyLevel; 3] = [
    DifficultyLevel::Intern,
    DifficultyLevel::Resident,
    DifficultyLevel::Attending,
];

impl DifficultyLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intern => "intern",
            Self::Resident => "resident",
            Self::Attending => "attending",
        }
    }

    /// Seconds allowed per question at this tier.
    #[must_use]
    pub const fn time_limit_secs(self) -> u32 {
        match self {
            Self::Intern => 45,
            Self::Resident => 35,
            Self::Attending => 25,
        }
    }

    /// Next harder tier, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Intern => Some(Self::Resident),
            Self::Resident => Some(Self::Attending),
            Self::Attending => None,
        }
    }

    /// Tier immediately below this one, if any.
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self {
            Self::Intern => None,
            Self::Resident => Some(Self::Intern),
            Self::Attending => Some(Self::Resident),
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intern" => Ok(Self::Intern),
            "resident" => Ok(Self::Resident),
            "attending" => Ok(Self::Attending),
            _ => Err(()),
        }
    }
}

impl From<DifficultyLevel> for String {
    fn from(value: DifficultyLevel) -> Self {
        value.as_str().to_string()
    }
}

/// Gate for one ladder tier beyond the first.
///
/// Only fields that are present are evaluated; they AND together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shifts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
}

/// One rung of the unlockable ladder together with its gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderStep {
    pub level: DifficultyLevel,
    #[serde(default)]
    pub requirement: DifficultyRequirement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_ordered_and_linked() {
        assert_eq!(DIFFICULTY_LADDER[0], DifficultyLevel::Intern);
        for pair in DIFFICULTY_LADDER.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert_eq!(pair[1].prev(), Some(pair[0]));
        }
        assert_eq!(DifficultyLevel::Attending.next(), None);
        assert_eq!(DifficultyLevel::Intern.prev(), None);
    }

    #[test]
    fn time_limits_shrink_with_seniority() {
        assert_eq!(DifficultyLevel::Intern.time_limit_secs(), 45);
        assert_eq!(DifficultyLevel::Resident.time_limit_secs(), 35);
        assert_eq!(DifficultyLevel::Attending.time_limit_secs(), 25);
    }

    #[test]
    fn level_names_round_trip() {
        for level in DIFFICULTY_LADDER {
            assert_eq!(level.as_str().parse::<DifficultyLevel>(), Ok(level));
        }
        assert!("chief".parse::<DifficultyLevel>().is_err());
    }
}
