//! Specialty definitions, per-specialty performance, and mastery
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::{MASTERY_GATE_DEFAULT, MASTERY_RECENCY_FACTOR, MASTERY_VOLUME_TARGET};
use crate::difficulty::DifficultyLevel;
use crate::session::SpecialtyBreakdown;

/// Mastery gate on another specialty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryGate {
    pub specialty: String,
    #[serde(default = "default_mastery_threshold")]
    pub threshold: f32,
}

fn default_mastery_threshold() -> f32 {
    MASTERY_GATE_DEFAULT
}

impl MasteryGate {
    #[must_use]
    pub fn new(specialty: &str) -> Self {
        Self {
            specialty: specialty.to_string(),
            threshold: default_mastery_threshold(),
        }
    }
}

/// Gate for one locked specialty.
///
/// Only fields that are present are evaluated; they AND together. A gate
/// with no fields at all unlocks trivially.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shifts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_difficulty: Option<DifficultyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_mastery: Option<MasteryGate>,
}

impl SpecialtyRequirement {
    /// True when no gate fields are present at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shifts.is_none()
            && self.accuracy.is_none()
            && self.required_difficulty.is_none()
            && self.required_mastery.is_none()
    }
}

/// One rotation in the catalog: a name, its topic pool, and its gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyDef {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub requirement: SpecialtyRequirement,
    #[serde(default)]
    pub starts_unlocked: bool,
}

/// Rolling per-specialty record. Created at profile initialization for every
/// catalog specialty and never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyPerformance {
    #[serde(default)]
    pub questions_seen: u32,
    #[serde(default)]
    pub correct_answers: u32,
    /// Derived correct/seen ratio; 0 until any question is seen.
    #[serde(default)]
    pub accuracy: f32,
    #[serde(default)]
    pub last_practiced_ms: i64,
    /// Topics recorded as missed at least once.
    #[serde(default)]
    pub weak_topics: HashSet<String>,
    /// Derived 0..1 score combining practice volume and accuracy.
    #[serde(default)]
    pub mastery: f32,
}

impl SpecialtyPerformance {
    /// Fold one shift's slice into the record and refresh derived scores.
    pub fn record(&mut self, slice: &SpecialtyBreakdown, now_ms: i64) {
        self.questions_seen += slice.questions;
        self.correct_answers += slice.correct;
        self.accuracy = if self.questions_seen == 0 {
            0.0
        } else {
            ratio(self.correct_answers, self.questions_seen)
        };
        self.last_practiced_ms = now_ms;
        for topic in &slice.missed_topics {
            if !self.weak_topics.contains(topic) {
                self.weak_topics.insert(topic.clone());
            }
        }
        self.recompute_mastery();
    }

    /// Volume-damped accuracy. The recency factor is a fixed hook until time
    /// decay lands.
    pub fn recompute_mastery(&mut self) {
        #[allow(clippy::cast_precision_loss)]
        let volume = (self.questions_seen as f32 / MASTERY_VOLUME_TARGET).min(1.0);
        self.mastery = volume * self.accuracy * MASTERY_RECENCY_FACTOR;
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: u32, denominator: u32) -> f32 {
    numerator as f32 / denominator as f32
}
