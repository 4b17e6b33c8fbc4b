//! Adaptive per-topic weighting and the global difficulty scaling scalar
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{
    DIFFICULTY_SCALING_DEFAULT, DIFFICULTY_SCALING_MAX, DIFFICULTY_SCALING_MIN,
    DIFFICULTY_SCALING_STEP_DOWN, DIFFICULTY_SCALING_STEP_UP, ERROR_FREQUENCY_HIT_DECAY,
    ERROR_FREQUENCY_MAX, ERROR_FREQUENCY_MIN, ERROR_FREQUENCY_MISS_STEP, SCALING_LOWER_MARGIN,
    SCALING_RAISE_MARGIN, TARGET_SESSION_ACCURACY, TOPIC_WEIGHT_DEFAULT, TOPIC_WEIGHT_HIT_FACTOR,
    TOPIC_WEIGHT_MAX, TOPIC_WEIGHT_MIN, TOPIC_WEIGHT_MISS_FACTOR,
};
use crate::session::AdjustmentKind;

/// Parallel per-topic maps plus the global scaling scalar.
///
/// Keys are append-only: topics are registered from the catalog at profile
/// creation and results for unregistered topics are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveWeights {
    #[serde(default)]
    pub topic_weight: HashMap<String, f32>,
    #[serde(default)]
    pub last_seen_ms: HashMap<String, i64>,
    #[serde(default)]
    pub error_frequency: HashMap<String, f32>,
    /// Global multiplier nudged toward the target-accuracy band.
    #[serde(default = "default_scaling")]
    pub difficulty_scaling: f32,
}

fn default_scaling() -> f32 {
    DIFFICULTY_SCALING_DEFAULT
}

impl Default for AdaptiveWeights {
    fn default() -> Self {
        Self {
            topic_weight: HashMap::new(),
            last_seen_ms: HashMap::new(),
            error_frequency: HashMap::new(),
            difficulty_scaling: default_scaling(),
        }
    }
}

impl AdaptiveWeights {
    /// Register topics at default weight without disturbing existing entries.
    pub fn seed_topics<'a>(&mut self, topics: impl IntoIterator<Item = &'a str>) {
        for topic in topics {
            self.topic_weight
                .entry(topic.to_string())
                .or_insert(TOPIC_WEIGHT_DEFAULT);
            self.last_seen_ms.entry(topic.to_string()).or_insert(0);
            self.error_frequency
                .entry(topic.to_string())
                .or_insert(ERROR_FREQUENCY_MIN);
        }
    }

    #[must_use]
    pub fn knows_topic(&self, topic: &str) -> bool {
        self.topic_weight.contains_key(topic)
    }

    /// Current weight for a topic, default when unregistered.
    #[must_use]
    pub fn weight(&self, topic: &str) -> f32 {
        self.topic_weight
            .get(topic)
            .copied()
            .unwrap_or(TOPIC_WEIGHT_DEFAULT)
    }

    /// Accumulated miss frequency for a topic, zero when unregistered.
    #[must_use]
    pub fn error_frequency_for(&self, topic: &str) -> f32 {
        self.error_frequency
            .get(topic)
            .copied()
            .unwrap_or(ERROR_FREQUENCY_MIN)
    }

    /// When the topic was last answered; never-seen reads as time zero.
    #[must_use]
    pub fn last_seen(&self, topic: &str) -> i64 {
        self.last_seen_ms.get(topic).copied().unwrap_or(0)
    }

    /// Fold one graded question in. Unregistered topics are ignored.
    pub fn record_result(&mut self, topic: &str, correct: bool, now_ms: i64) {
        if !self.knows_topic(topic) {
            return;
        }
        self.last_seen_ms.insert(topic.to_string(), now_ms);

        let weight = self
            .topic_weight
            .entry(topic.to_string())
            .or_insert(TOPIC_WEIGHT_DEFAULT);
        let frequency = self
            .error_frequency
            .entry(topic.to_string())
            .or_insert(ERROR_FREQUENCY_MIN);
        if correct {
            *weight *= TOPIC_WEIGHT_HIT_FACTOR;
            *frequency *= ERROR_FREQUENCY_HIT_DECAY;
        } else {
            *frequency += ERROR_FREQUENCY_MISS_STEP;
            *weight *= TOPIC_WEIGHT_MISS_FACTOR;
        }
        *weight = weight.clamp(TOPIC_WEIGHT_MIN, TOPIC_WEIGHT_MAX);
        *frequency = frequency.clamp(ERROR_FREQUENCY_MIN, ERROR_FREQUENCY_MAX);
    }

    /// Nudge the global scaling toward the target-accuracy band.
    ///
    /// Returns the direction of the nudge, or `None` when the session landed
    /// inside the dead band.
    pub fn adjust_scaling(&mut self, session_accuracy: f32) -> Option<AdjustmentKind> {
        let diff = session_accuracy - TARGET_SESSION_ACCURACY;
        let kind = if diff > SCALING_RAISE_MARGIN {
            self.difficulty_scaling *= DIFFICULTY_SCALING_STEP_UP;
            AdjustmentKind::IncreaseDifficulty
        } else if diff < -SCALING_LOWER_MARGIN {
            self.difficulty_scaling *= DIFFICULTY_SCALING_STEP_DOWN;
            AdjustmentKind::DecreaseDifficulty
        } else {
            return None;
        };
        self.difficulty_scaling = self
            .difficulty_scaling
            .clamp(DIFFICULTY_SCALING_MIN, DIFFICULTY_SCALING_MAX);
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(topics: &[&str]) -> AdaptiveWeights {
        let mut weights = AdaptiveWeights::default();
        weights.seed_topics(topics.iter().copied());
        weights
    }

    #[test]
    fn two_misses_compound_weight_and_frequency() {
        let mut weights = seeded(&["Pneumonia"]);
        weights.record_result("Pneumonia", false, 1_000);
        weights.record_result("Pneumonia", false, 2_000);
        assert!((weights.weight("Pneumonia") - 2.25).abs() < 1e-6);
        assert!((weights.error_frequency_for("Pneumonia") - 0.2).abs() < 1e-6);
        assert_eq!(weights.last_seen("Pneumonia"), 2_000);
    }

    #[test]
    fn hits_decay_weight_and_frequency() {
        let mut weights = seeded(&["Sepsis"]);
        weights.record_result("Sepsis", false, 0);
        weights.record_result("Sepsis", true, 0);
        assert!((weights.weight("Sepsis") - 1.5 * 0.95).abs() < 1e-6);
        assert!((weights.error_frequency_for("Sepsis") - 0.09).abs() < 1e-6);
    }

    #[test]
    fn unregistered_topics_are_ignored() {
        let mut weights = seeded(&["Sepsis"]);
        weights.record_result("Phrenology", false, 5_000);
        assert!(!weights.knows_topic("Phrenology"));
        assert_eq!(weights.last_seen("Phrenology"), 0);
    }

    #[test]
    fn weight_and_frequency_stay_clamped() {
        let mut weights = seeded(&["COPD"]);
        for _ in 0..64 {
            weights.record_result("COPD", false, 0);
            let weight = weights.weight("COPD");
            let frequency = weights.error_frequency_for("COPD");
            assert!((0.1..=5.0).contains(&weight), "weight escaped: {weight}");
            assert!(
                (0.0..=2.0).contains(&frequency),
                "frequency escaped: {frequency}"
            );
        }
        for _ in 0..256 {
            weights.record_result("COPD", true, 0);
            assert!(weights.weight("COPD") >= 0.1);
            assert!(weights.error_frequency_for("COPD") >= 0.0);
        }
    }

    #[test]
    fn scaling_band_is_asymmetric() {
        let mut weights = AdaptiveWeights::default();
        assert_eq!(weights.adjust_scaling(0.84), None);
        assert_eq!(weights.adjust_scaling(0.61), None);
        assert!((weights.difficulty_scaling - 1.0).abs() < f32::EPSILON);

        assert_eq!(
            weights.adjust_scaling(0.86),
            Some(AdjustmentKind::IncreaseDifficulty)
        );
        assert!((weights.difficulty_scaling - 1.05).abs() < 1e-6);

        assert_eq!(
            weights.adjust_scaling(0.59),
            Some(AdjustmentKind::DecreaseDifficulty)
        );
        assert!((weights.difficulty_scaling - 1.05 * 0.95).abs() < 1e-6);
    }

    #[test]
    fn scaling_never_escapes_bounds() {
        let mut weights = AdaptiveWeights::default();
        for _ in 0..64 {
            let _ = weights.adjust_scaling(1.0);
        }
        assert!((weights.difficulty_scaling - 2.0).abs() < 1e-6);
        for _ in 0..128 {
            let _ = weights.adjust_scaling(0.0);
        }
        assert!((weights.difficulty_scaling - 0.5).abs() < 1e-6);
    }
}
