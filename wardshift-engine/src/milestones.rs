//! One-shot milestone achievements over cumulative stats
use serde::{Deserialize, Serialize};

/// Predicate fields over cumulative stats. Present fields AND together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shifts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
}

impl MilestoneRequirement {
    /// True when every present predicate passes.
    #[must_use]
    pub fn met(&self, shifts: u32, accuracy: f32, best_streak: u32) -> bool {
        self.shifts.is_none_or(|n| shifts >= n)
            && self.accuracy.is_none_or(|threshold| accuracy >= threshold)
            && self.streak.is_none_or(|streak| best_streak >= streak)
    }
}

/// Permanent achievement entry. The achieved flag lives in the profile
/// state, not here; once recorded it never re-fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    /// Reward description surfaced by the shell when the milestone lands.
    pub reward: String,
    #[serde(default)]
    pub requirement: MilestoneRequirement,
}

impl Milestone {
    #[must_use]
    pub fn new(id: &str, reward: &str, requirement: MilestoneRequirement) -> Self {
        Self {
            id: id.to_string(),
            reward: reward.to_string(),
            requirement,
        }
    }
}
