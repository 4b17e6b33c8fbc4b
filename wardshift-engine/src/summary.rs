//! Display-facing progression summaries
use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyLevel;
use crate::unlocks::RequirementProgress;

/// The single next-closest unlock target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockTarget {
    Difficulty(DifficultyLevel),
    Specialty(String),
}

/// Progress toward the next unlock, one entry per present gate field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextUnlockInfo {
    pub target: UnlockTarget,
    pub requirements: Vec<RequirementProgress>,
}

/// Flat snapshot of the profile for HUD display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSummary {
    pub current_difficulty: DifficultyLevel,
    pub unlocked_difficulties: usize,
    pub unlocked_specialties: usize,
    pub shifts_completed: u32,
    pub overall_accuracy: f32,
    pub best_streak: u32,
    pub total_questions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_unlock: Option<NextUnlockInfo>,
}
