//! Shift result payloads and typed session outcomes
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

use crate::difficulty::DifficultyLevel;

/// Difficulty unlocks reported by a single session.
pub type DifficultyUnlocks = SmallVec<[DifficultyLevel; 2]>;
/// Specialty unlocks reported by a single session.
pub type SpecialtyUnlocks = SmallVec<[String; 2]>;
/// Milestone ids reached by a single session.
pub type MilestoneHits = SmallVec<[String; 4]>;

/// Per-specialty slice of a finished shift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyBreakdown {
    #[serde(default)]
    pub questions: u32,
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub missed_topics: Vec<String>,
}

/// One graded question from a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub topic: String,
    pub correct: bool,
}

impl QuestionOutcome {
    #[must_use]
    pub fn new(topic: &str, correct: bool) -> Self {
        Self {
            topic: topic.to_string(),
            correct,
        }
    }
}

/// Everything the game shell reports when a shift ends.
///
/// Every field is optional or defaults to empty; absent fields simply skip
/// their update step rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_answered: Option<u32>,
    /// Session accuracy in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
    #[serde(default)]
    pub specialty_breakdown: HashMap<String, SpecialtyBreakdown>,
    #[serde(default)]
    pub question_results: Vec<QuestionOutcome>,
}

/// Direction of a global difficulty-scaling nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    IncreaseDifficulty,
    DecreaseDifficulty,
}

impl AdjustmentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncreaseDifficulty => "increase_difficulty",
            Self::DecreaseDifficulty => "decrease_difficulty",
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scaling nudge together with the value it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveAdjustment {
    pub kind: AdjustmentKind,
    pub scaling: f32,
}

/// Everything that changed as a result of one completed shift.
///
/// Returned from `complete_session` so collaborators (UI, audio, telemetry)
/// can react without the engine broadcasting anything itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    #[serde(default)]
    pub difficulty_unlocks: DifficultyUnlocks,
    #[serde(default)]
    pub specialty_unlocks: SpecialtyUnlocks,
    #[serde(default)]
    pub milestones: MilestoneHits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<AdaptiveAdjustment>,
}

impl SessionOutcome {
    /// True when the session unlocked nothing and adjusted nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.difficulty_unlocks.is_empty()
            && self.specialty_unlocks.is_empty()
            && self.milestones.is_empty()
            && self.adjustment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_deserializes_to_defaults() {
        let result: SessionResult = serde_json::from_str("{}").expect("empty payload parses");
        assert_eq!(result, SessionResult::default());
        assert!(result.questions_answered.is_none());
        assert!(result.specialty_breakdown.is_empty());
    }

    #[test]
    fn outcome_emptiness_tracks_contents() {
        let mut outcome = SessionOutcome::default();
        assert!(outcome.is_empty());
        outcome.milestones.push("first-shift".to_string());
        assert!(!outcome.is_empty());
    }

    #[test]
    fn adjustment_kind_names_are_wire_stable() {
        assert_eq!(
            AdjustmentKind::IncreaseDifficulty.as_str(),
            "increase_difficulty"
        );
        assert_eq!(
            serde_json::to_string(&AdjustmentKind::DecreaseDifficulty).expect("serializes"),
            "\"decrease_difficulty\""
        );
    }
}
