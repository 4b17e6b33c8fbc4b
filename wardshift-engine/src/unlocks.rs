//! Requirement gating over cumulative performance
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::difficulty::{DifficultyLevel, DifficultyRequirement};
use crate::specialty::{SpecialtyPerformance, SpecialtyRequirement};

/// Cumulative counters the gates evaluate against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CumulativeStats {
    pub shifts: u32,
    pub questions: u32,
    pub accuracy: f32,
    pub best_streak: u32,
}

/// Progress toward one gate field, with the ratio clamped to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProgress {
    pub label: String,
    pub current: f32,
    pub required: f32,
    pub ratio: f32,
}

impl RequirementProgress {
    fn new(label: &str, current: f32, required: f32) -> Self {
        let ratio = if required <= 0.0 {
            1.0
        } else {
            (current / required).clamp(0.0, 1.0)
        };
        Self {
            label: label.to_string(),
            current,
            required,
            ratio,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn counted(label: &str, current: u32, required: u32) -> Self {
        Self::new(label, current as f32, required as f32)
    }
}

/// True when every present ladder-gate field passes.
#[must_use]
pub fn difficulty_gate_met(requirement: &DifficultyRequirement, stats: CumulativeStats) -> bool {
    requirement.shifts.is_none_or(|n| stats.shifts >= n)
        && requirement
            .accuracy
            .is_none_or(|threshold| stats.accuracy >= threshold)
        && requirement
            .min_questions
            .is_none_or(|q| stats.questions >= q)
        && requirement
            .streak
            .is_none_or(|streak| stats.best_streak >= streak)
}

/// One progress record per present ladder-gate field.
#[must_use]
pub fn difficulty_gate_progress(
    requirement: &DifficultyRequirement,
    stats: CumulativeStats,
) -> Vec<RequirementProgress> {
    let mut progress = Vec::new();
    if let Some(shifts) = requirement.shifts {
        progress.push(RequirementProgress::counted("shifts", stats.shifts, shifts));
    }
    if let Some(accuracy) = requirement.accuracy {
        progress.push(RequirementProgress::new("accuracy", stats.accuracy, accuracy));
    }
    if let Some(questions) = requirement.min_questions {
        progress.push(RequirementProgress::counted(
            "questions",
            stats.questions,
            questions,
        ));
    }
    if let Some(streak) = requirement.streak {
        progress.push(RequirementProgress::counted(
            "streak",
            stats.best_streak,
            streak,
        ));
    }
    progress
}

/// True when every present specialty-gate field passes.
///
/// An empty gate passes trivially.
#[must_use]
pub fn specialty_gate_met(
    requirement: &SpecialtyRequirement,
    stats: CumulativeStats,
    unlocked_difficulties: &[DifficultyLevel],
    performance: &HashMap<String, SpecialtyPerformance>,
) -> bool {
    requirement.shifts.is_none_or(|n| stats.shifts >= n)
        && requirement
            .accuracy
            .is_none_or(|threshold| stats.accuracy >= threshold)
        && requirement
            .required_difficulty
            .is_none_or(|level| unlocked_difficulties.contains(&level))
        && requirement.required_mastery.as_ref().is_none_or(|gate| {
            performance
                .get(&gate.specialty)
                .is_some_and(|record| record.mastery >= gate.threshold)
        })
}

/// One progress record per present specialty-gate field.
#[must_use]
pub fn specialty_gate_progress(
    requirement: &SpecialtyRequirement,
    stats: CumulativeStats,
    unlocked_difficulties: &[DifficultyLevel],
    performance: &HashMap<String, SpecialtyPerformance>,
) -> Vec<RequirementProgress> {
    let mut progress = Vec::new();
    if let Some(shifts) = requirement.shifts {
        progress.push(RequirementProgress::counted("shifts", stats.shifts, shifts));
    }
    if let Some(accuracy) = requirement.accuracy {
        progress.push(RequirementProgress::new("accuracy", stats.accuracy, accuracy));
    }
    if let Some(level) = requirement.required_difficulty {
        let unlocked = u32::from(unlocked_difficulties.contains(&level));
        progress.push(RequirementProgress::counted("difficulty", unlocked, 1));
    }
    if let Some(gate) = &requirement.required_mastery {
        let mastery = performance
            .get(&gate.specialty)
            .map_or(0.0, |record| record.mastery);
        progress.push(RequirementProgress::new("mastery", mastery, gate.threshold));
    }
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specialty::MasteryGate;

    const fn stats(shifts: u32, questions: u32, accuracy: f32, best_streak: u32) -> CumulativeStats {
        CumulativeStats {
            shifts,
            questions,
            accuracy,
            best_streak,
        }
    }

    #[test]
    fn ladder_gate_requires_every_present_field() {
        let requirement = DifficultyRequirement {
            shifts: Some(5),
            accuracy: Some(0.70),
            min_questions: Some(50),
            streak: None,
        };
        assert!(!difficulty_gate_met(&requirement, stats(5, 49, 0.9, 0)));
        assert!(!difficulty_gate_met(&requirement, stats(5, 50, 0.6, 0)));
        assert!(difficulty_gate_met(&requirement, stats(5, 50, 0.70, 0)));
    }

    #[test]
    fn empty_specialty_gate_passes_trivially() {
        let performance = HashMap::new();
        assert!(specialty_gate_met(
            &SpecialtyRequirement::default(),
            stats(0, 0, 0.0, 0),
            &[DifficultyLevel::Intern],
            &performance,
        ));
    }

    #[test]
    fn mastery_gate_reads_named_specialty() {
        let requirement = SpecialtyRequirement {
            required_mastery: Some(MasteryGate::new("Internal Medicine")),
            ..SpecialtyRequirement::default()
        };
        let mut performance = HashMap::new();
        performance.insert(
            "Internal Medicine".to_string(),
            SpecialtyPerformance {
                mastery: 0.79,
                ..SpecialtyPerformance::default()
            },
        );
        let unlocked = [DifficultyLevel::Intern];
        assert!(!specialty_gate_met(
            &requirement,
            stats(100, 1_000, 1.0, 50),
            &unlocked,
            &performance,
        ));
        performance.get_mut("Internal Medicine").unwrap().mastery = 0.8;
        assert!(specialty_gate_met(
            &requirement,
            stats(0, 0, 0.0, 0),
            &unlocked,
            &performance,
        ));
    }

    #[test]
    fn progress_ratios_are_normalized_and_clamped() {
        let requirement = DifficultyRequirement {
            shifts: Some(5),
            accuracy: Some(0.70),
            min_questions: None,
            streak: None,
        };
        let progress = difficulty_gate_progress(&requirement, stats(10, 0, 0.35, 0));
        assert_eq!(progress.len(), 2);
        assert!((progress[0].ratio - 1.0).abs() < f32::EPSILON, "overshoot clamps");
        assert!((progress[1].ratio - 0.5).abs() < 1e-6);
    }
}
