//! Priority scoring for next-topic selection
//!
//! Pure functions over the adaptive weights: the caller picks the topic
//! (randomly, weighted, however it likes); this module only says how urgently
//! each candidate needs practice.
use std::collections::HashMap;

use crate::catalog::ProgressionCatalog;
use crate::constants::{
    MS_PER_HOUR, PRIORITY_BASE, RECENCY_HOURS_WINDOW, RECENCY_MULTIPLIER_CAP,
    WEAK_TOPIC_MULTIPLIER,
};
use crate::specialty::SpecialtyPerformance;
use crate::weights::AdaptiveWeights;

/// Multiplier favoring topics that keep getting missed.
#[must_use]
pub fn error_multiplier(weights: &AdaptiveWeights, topic: &str) -> f32 {
    1.0 + weights.error_frequency_for(topic)
}

/// Multiplier favoring topics not seen recently, capped.
///
/// Never-seen topics read as last seen at time zero, so the cap bounds them.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn recency_multiplier(last_seen_ms: i64, now_ms: i64) -> f32 {
    let hours = (now_ms - last_seen_ms).max(0) as f32 / MS_PER_HOUR;
    (1.0 + hours / RECENCY_HOURS_WINDOW).min(RECENCY_MULTIPLIER_CAP)
}

/// Multiplier for topics the owning specialty has flagged weak.
#[must_use]
pub fn weak_topic_multiplier(
    catalog: &ProgressionCatalog,
    performance: &HashMap<String, SpecialtyPerformance>,
    topic: &str,
) -> f32 {
    let is_weak = catalog
        .owning_specialty(topic)
        .and_then(|name| performance.get(name))
        .is_some_and(|record| record.weak_topics.contains(topic));
    if is_weak { WEAK_TOPIC_MULTIPLIER } else { 1.0 }
}

/// Score every candidate topic; higher means more urgently needs practice.
///
/// Pure with respect to all inputs: identical state and candidates yield an
/// identical map.
#[must_use]
pub fn score_topics(
    weights: &AdaptiveWeights,
    catalog: &ProgressionCatalog,
    performance: &HashMap<String, SpecialtyPerformance>,
    candidates: &[String],
    now_ms: i64,
) -> HashMap<String, f32> {
    candidates
        .iter()
        .map(|topic| {
            let priority = PRIORITY_BASE
                * error_multiplier(weights, topic)
                * recency_multiplier(weights.last_seen(topic), now_ms)
                * weak_topic_multiplier(catalog, performance, topic)
                * weights.difficulty_scaling;
            (topic.clone(), priority)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    #[test]
    fn recency_grows_then_caps() {
        assert!((recency_multiplier(0, 0) - 1.0).abs() < f32::EPSILON);
        assert!((recency_multiplier(0, 12 * HOUR_MS) - 1.5).abs() < 1e-6);
        assert!((recency_multiplier(0, 24 * HOUR_MS) - 2.0).abs() < 1e-6);
        // Far beyond the window the cap holds.
        assert!((recency_multiplier(0, 400 * 24 * HOUR_MS) - 2.0).abs() < f32::EPSILON);
        // A stale clock never produces a sub-1 multiplier.
        assert!((recency_multiplier(HOUR_MS, 0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_topics_score_at_base_times_cap() {
        let weights = AdaptiveWeights::default();
        let catalog = ProgressionCatalog::built_in();
        let performance = HashMap::new();
        let candidates = vec!["Phrenology".to_string()];
        let scores = score_topics(&weights, catalog, &performance, &candidates, 24 * HOUR_MS);
        assert!((scores["Phrenology"] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn scoring_is_pure() {
        let mut weights = AdaptiveWeights::default();
        weights.seed_topics(["Pneumonia", "Sepsis"]);
        weights.record_result("Pneumonia", false, HOUR_MS);
        let catalog = ProgressionCatalog::built_in();
        let performance = HashMap::new();
        let candidates = vec!["Pneumonia".to_string(), "Sepsis".to_string()];

        let first = score_topics(&weights, catalog, &performance, &candidates, 2 * HOUR_MS);
        let second = score_topics(&weights, catalog, &performance, &candidates, 2 * HOUR_MS);
        assert_eq!(first, second);
        assert!(
            first["Pneumonia"] > first["Sepsis"],
            "missed topic should outrank untouched topic seeded at the same time"
        );
    }
}
