#![allow(clippy::float_cmp)]

use std::collections::HashMap;
use wardshift_engine::{
    DifficultyLevel, ProgressionState, QuestionOutcome, SessionResult, SpecialtyBreakdown,
};

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;

fn breakdown_session(
    specialty: &str,
    questions: u32,
    correct: u32,
    missed: &[&str],
) -> SessionResult {
    let mut specialty_breakdown = HashMap::new();
    specialty_breakdown.insert(
        specialty.to_string(),
        SpecialtyBreakdown {
            questions,
            correct,
            missed_topics: missed.iter().map(ToString::to_string).collect(),
        },
    );
    SessionResult {
        specialty_breakdown,
        ..SessionResult::default()
    }
}

#[test]
fn long_haul_weights_stay_in_bounds() {
    let mut state = ProgressionState::new();
    for shift in 0..200i64 {
        let result = SessionResult {
            accuracy: Some(if shift % 3 == 0 { 0.95 } else { 0.45 }),
            question_results: vec![
                QuestionOutcome::new("Pneumonia", shift % 4 == 0),
                QuestionOutcome::new("Sepsis", shift % 2 == 0),
                QuestionOutcome::new("Arrhythmia", false),
            ],
            ..SessionResult::default()
        };
        state.complete_session(&result, shift * HOUR_MS);

        for (topic, weight) in &state.adaptive.topic_weight {
            assert!(
                (0.1..=5.0).contains(weight),
                "weight for {topic} escaped bounds: {weight}"
            );
        }
        for (topic, frequency) in &state.adaptive.error_frequency {
            assert!(
                (0.0..=2.0).contains(frequency),
                "error frequency for {topic} escaped bounds: {frequency}"
            );
        }
        assert!(
            (0.5..=2.0).contains(&state.adaptive.difficulty_scaling),
            "scaling escaped bounds: {}",
            state.adaptive.difficulty_scaling
        );
    }
}

#[test]
fn weak_topics_boost_their_owning_specialty() {
    let mut state = ProgressionState::new();
    state.complete_session(
        &breakdown_session("Internal Medicine", 4, 3, &["Pneumonia"]),
        0,
    );

    let candidates = vec!["Pneumonia".to_string(), "Sepsis".to_string()];
    let scores = state.score_topics(&candidates, 0);
    assert!(
        (scores["Pneumonia"] / scores["Sepsis"] - 1.5).abs() < 1e-6,
        "weak-topic boost should be exactly 1.5x against an otherwise identical topic"
    );
}

#[test]
fn unseen_topics_outrank_freshly_answered_ones() {
    let mut state = ProgressionState::new();
    let now = 2 * DAY_MS;
    state.complete_session(
        &SessionResult {
            question_results: vec![QuestionOutcome::new("Sepsis", true)],
            ..SessionResult::default()
        },
        now,
    );

    let candidates = vec!["Pneumonia".to_string(), "Sepsis".to_string()];
    let scores = state.score_topics(&candidates, now);
    assert_eq!(scores["Pneumonia"], 2.0, "never-seen topics hit the recency cap");
    assert!(scores["Pneumonia"] > scores["Sepsis"]);
}

#[test]
fn internal_medicine_mastery_opens_pediatrics() {
    let mut state = ProgressionState::new();
    for shift in 1..=8i64 {
        let outcome = state.complete_session(
            &breakdown_session("Internal Medicine", 10, 9, &[]),
            shift * DAY_MS,
        );
        if shift < 8 {
            assert!(
                !outcome.specialty_unlocks.iter().any(|n| n == "Pediatrics"),
                "pediatrics needs eight shifts"
            );
        } else {
            assert!(outcome.specialty_unlocks.iter().any(|n| n == "Pediatrics"));
        }
    }

    let record = state
        .performance_for("Internal Medicine")
        .expect("seeded at creation");
    assert_eq!(record.questions_seen, 80);
    assert!((record.mastery - 0.9).abs() < 1e-6);
}

#[test]
fn progress_accessors_report_normalized_ratios() {
    let mut state = ProgressionState::new();
    for shift in 1..=2i64 {
        state.complete_session(
            &SessionResult {
                questions_answered: Some(60),
                accuracy: Some(0.8),
                ..SessionResult::default()
            },
            shift * DAY_MS,
        );
    }

    let progress = state
        .difficulty_progress(DifficultyLevel::Resident)
        .expect("resident tier is gated");
    let by_label: HashMap<&str, f32> = progress
        .iter()
        .map(|entry| (entry.label.as_str(), entry.ratio))
        .collect();
    assert!((by_label["shifts"] - 0.4).abs() < 1e-6);
    assert_eq!(by_label["accuracy"], 1.0, "overshoot clamps to 1.0");
    assert_eq!(by_label["questions"], 1.0);

    assert!(state.difficulty_progress(DifficultyLevel::Intern).is_none());
}

#[test]
fn scoring_reflects_but_never_mutates_state() {
    let mut state = ProgressionState::new();
    state.complete_session(
        &SessionResult {
            question_results: vec![QuestionOutcome::new("Pneumonia", false)],
            ..SessionResult::default()
        },
        HOUR_MS,
    );
    let before = serde_json::to_string(&state).expect("serializes");

    let candidates = vec!["Pneumonia".to_string(), "Toxicology".to_string()];
    let first = state.score_topics(&candidates, 6 * HOUR_MS);
    let second = state.score_topics(&candidates, 6 * HOUR_MS);
    assert_eq!(first, second);

    let after = serde_json::to_string(&state).expect("serializes");
    assert_eq!(before, after, "scoring must not touch the profile");
}
