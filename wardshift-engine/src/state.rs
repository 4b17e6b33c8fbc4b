//! Progression state aggregate and the shift-completion pipeline
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::catalog::ProgressionCatalog;
use crate::difficulty::DifficultyLevel;
use crate::scoring;
use crate::session::{AdaptiveAdjustment, SessionOutcome, SessionResult};
use crate::specialty::SpecialtyPerformance;
use crate::summary::{NextUnlockInfo, ProgressionSummary, UnlockTarget};
use crate::unlocks::{self, CumulativeStats};
use crate::weights::AdaptiveWeights;

/// All progression state for one learner profile.
///
/// The aggregate persists flat: every field carries a serde default, so a
/// save payload missing any field restores that field to its default rather
/// than failing. Mutation funnels through [`ProgressionState::complete_session`]
/// and [`ProgressionState::set_current_difficulty`]; everything else reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionState {
    #[serde(default)]
    pub current_difficulty: DifficultyLevel,
    /// Always a prefix of the ladder ordering.
    #[serde(default = "default_unlocked_difficulties")]
    pub unlocked_difficulties: Vec<DifficultyLevel>,
    #[serde(default = "default_unlocked_specialties")]
    pub unlocked_specialties: Vec<String>,
    #[serde(default)]
    pub shifts_completed: u32,
    #[serde(default)]
    pub total_questions_answered: u32,
    /// Weighted running average over session accuracies; 0 until the first
    /// session reports accuracy.
    #[serde(default)]
    pub overall_accuracy: f32,
    #[serde(default)]
    pub current_streak: u32,
    /// Historical max, folded in with `max()` every session.
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default = "default_specialty_performance")]
    pub specialty_performance: HashMap<String, SpecialtyPerformance>,
    #[serde(default = "default_adaptive")]
    pub adaptive: AdaptiveWeights,
    #[serde(default)]
    pub achieved_milestones: HashSet<String>,
    /// Catalog override; `None` means the shared built-in catalog. Not
    /// persisted, reattached on load.
    #[serde(skip)]
    pub catalog_override: Option<ProgressionCatalog>,
}

fn default_unlocked_difficulties() -> Vec<DifficultyLevel> {
    vec![DifficultyLevel::Intern]
}

fn default_unlocked_specialties() -> Vec<String> {
    ProgressionCatalog::built_in()
        .starting_specialties()
        .map(ToString::to_string)
        .collect()
}

fn default_specialty_performance() -> HashMap<String, SpecialtyPerformance> {
    ProgressionCatalog::built_in()
        .specialties
        .iter()
        .map(|def| (def.name.clone(), SpecialtyPerformance::default()))
        .collect()
}

fn default_adaptive() -> AdaptiveWeights {
    let mut weights = AdaptiveWeights::default();
    weights.seed_topics(ProgressionCatalog::built_in().topics());
    weights
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionState {
    /// Fresh profile on the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(None)
    }

    /// Fresh profile on a custom catalog (`None` falls back to the built-in).
    #[must_use]
    pub fn with_catalog(catalog_override: Option<ProgressionCatalog>) -> Self {
        let mut state = Self {
            current_difficulty: DifficultyLevel::Intern,
            unlocked_difficulties: vec![DifficultyLevel::Intern],
            unlocked_specialties: Vec::new(),
            shifts_completed: 0,
            total_questions_answered: 0,
            overall_accuracy: 0.0,
            current_streak: 0,
            best_streak: 0,
            specialty_performance: HashMap::new(),
            adaptive: AdaptiveWeights::default(),
            achieved_milestones: HashSet::new(),
            catalog_override,
        };
        state.seed_from_catalog();
        state
    }

    /// Active catalog: the override when present, else the built-in.
    #[must_use]
    pub fn catalog(&self) -> &ProgressionCatalog {
        match &self.catalog_override {
            Some(catalog) => catalog,
            None => ProgressionCatalog::built_in(),
        }
    }

    /// Reattach a catalog after load and register any entries the persisted
    /// maps are missing. Keys are append-only; existing records are kept.
    #[must_use]
    pub fn rehydrate(mut self, catalog_override: Option<ProgressionCatalog>) -> Self {
        self.catalog_override = catalog_override;
        self.seed_from_catalog();
        self
    }

    fn seed_from_catalog(&mut self) {
        let catalog = self.catalog();
        let names: Vec<String> = catalog
            .specialties
            .iter()
            .map(|def| def.name.clone())
            .collect();
        let topics: Vec<String> = catalog.topics().map(ToString::to_string).collect();
        let starting: Vec<String> = catalog
            .starting_specialties()
            .map(ToString::to_string)
            .collect();

        for name in names {
            self.specialty_performance.entry(name).or_default();
        }
        self.adaptive.seed_topics(topics.iter().map(String::as_str));
        for name in starting {
            if !self.unlocked_specialties.contains(&name) {
                self.unlocked_specialties.push(name);
            }
        }
    }

    /// Fold one finished shift into the profile.
    ///
    /// Steps run in a fixed order: counters, the accuracy average, streaks,
    /// the per-specialty fold, adaptive weights, unlock evaluation
    /// (difficulty before specialty, since specialty gates may depend on a
    /// just-unlocked tier), milestones, and finally the global scaling
    /// nudge. Absent payload fields skip their step; nothing here fails.
    pub fn complete_session(&mut self, result: &SessionResult, now_ms: i64) -> SessionOutcome {
        let mut outcome = SessionOutcome::default();

        self.shifts_completed += 1;
        if let Some(questions) = result.questions_answered {
            self.total_questions_answered += questions;
        }
        if let Some(accuracy) = result.accuracy {
            self.fold_session_accuracy(accuracy.clamp(0.0, 1.0));
        }
        if let Some(streak) = result.streak {
            self.current_streak = streak;
            self.best_streak = self.best_streak.max(streak);
        }

        for (name, slice) in &result.specialty_breakdown {
            if let Some(record) = self.specialty_performance.get_mut(name) {
                record.record(slice, now_ms);
            }
        }

        for question in &result.question_results {
            self.adaptive
                .record_result(&question.topic, question.correct, now_ms);
        }

        self.evaluate_difficulty_unlocks(&mut outcome);
        self.evaluate_specialty_unlocks(&mut outcome);
        self.evaluate_milestones(&mut outcome);

        if let Some(accuracy) = result.accuracy {
            if let Some(kind) = self.adaptive.adjust_scaling(accuracy.clamp(0.0, 1.0)) {
                debug!(
                    "adaptive scaling {kind} -> {:.3}",
                    self.adaptive.difficulty_scaling
                );
                outcome.adjustment = Some(AdaptiveAdjustment {
                    kind,
                    scaling: self.adaptive.difficulty_scaling,
                });
            }
        }

        outcome
    }

    /// Weighted running average: session `n` carries weight `1/n`, so early
    /// shifts dominate the long-run value. Intentionally not a per-question
    /// lifetime mean.
    #[allow(clippy::cast_precision_loss)]
    fn fold_session_accuracy(&mut self, session_accuracy: f32) {
        let shifts = self.shifts_completed;
        if shifts <= 1 {
            self.overall_accuracy = session_accuracy;
            return;
        }
        let keep = (shifts - 1) as f32 / shifts as f32;
        self.overall_accuracy = self.overall_accuracy * keep + session_accuracy * (1.0 - keep);
    }

    fn evaluate_difficulty_unlocks(&mut self, outcome: &mut SessionOutcome) {
        let stats = self.cumulative_stats();
        let ladder = self.catalog().ladder.clone();
        for step in &ladder {
            if self.unlocked_difficulties.contains(&step.level) {
                continue;
            }
            let predecessor_unlocked = step
                .level
                .prev()
                .is_none_or(|level| self.unlocked_difficulties.contains(&level));
            if !predecessor_unlocked {
                continue;
            }
            if unlocks::difficulty_gate_met(&step.requirement, stats) {
                debug!("difficulty unlocked: {}", step.level);
                self.unlocked_difficulties.push(step.level);
                outcome.difficulty_unlocks.push(step.level);
            }
        }
    }

    fn evaluate_specialty_unlocks(&mut self, outcome: &mut SessionOutcome) {
        let stats = self.cumulative_stats();
        let newly: Vec<String> = self
            .catalog()
            .specialties
            .iter()
            .filter(|def| !self.unlocked_specialties.contains(&def.name))
            .filter(|def| {
                unlocks::specialty_gate_met(
                    &def.requirement,
                    stats,
                    &self.unlocked_difficulties,
                    &self.specialty_performance,
                )
            })
            .map(|def| def.name.clone())
            .collect();
        for name in newly {
            debug!("specialty unlocked: {name}");
            self.unlocked_specialties.push(name.clone());
            outcome.specialty_unlocks.push(name);
        }
    }

    fn evaluate_milestones(&mut self, outcome: &mut SessionOutcome) {
        let stats = self.cumulative_stats();
        let newly: Vec<String> = self
            .catalog()
            .milestones
            .iter()
            .filter(|milestone| !self.achieved_milestones.contains(&milestone.id))
            .filter(|milestone| {
                milestone
                    .requirement
                    .met(stats.shifts, stats.accuracy, stats.best_streak)
            })
            .map(|milestone| milestone.id.clone())
            .collect();
        for id in newly {
            debug!("milestone reached: {id}");
            self.achieved_milestones.insert(id.clone());
            outcome.milestones.push(id);
        }
    }

    /// Switch the active tier. Returns false, and changes nothing, when the
    /// requested tier is still locked.
    pub fn set_current_difficulty(&mut self, level: DifficultyLevel) -> bool {
        if !self.unlocked_difficulties.contains(&level) {
            return false;
        }
        self.current_difficulty = level;
        true
    }

    /// Priority scores for candidate topics. Pure with respect to `self`.
    #[must_use]
    pub fn score_topics(&self, candidates: &[String], now_ms: i64) -> HashMap<String, f32> {
        scoring::score_topics(
            &self.adaptive,
            self.catalog(),
            &self.specialty_performance,
            candidates,
            now_ms,
        )
    }

    #[must_use]
    pub fn is_difficulty_unlocked(&self, level: DifficultyLevel) -> bool {
        self.unlocked_difficulties.contains(&level)
    }

    #[must_use]
    pub fn is_specialty_unlocked(&self, name: &str) -> bool {
        self.unlocked_specialties.iter().any(|entry| entry == name)
    }

    /// Rolling record for one specialty.
    #[must_use]
    pub fn performance_for(&self, specialty: &str) -> Option<&SpecialtyPerformance> {
        self.specialty_performance.get(specialty)
    }

    /// Per-question time limit at the active tier.
    #[must_use]
    pub const fn time_limit_secs(&self) -> u32 {
        self.current_difficulty.time_limit_secs()
    }

    /// Flat snapshot for HUD display.
    #[must_use]
    pub fn summary(&self) -> ProgressionSummary {
        ProgressionSummary {
            current_difficulty: self.current_difficulty,
            unlocked_difficulties: self.unlocked_difficulties.len(),
            unlocked_specialties: self.unlocked_specialties.len(),
            shifts_completed: self.shifts_completed,
            overall_accuracy: self.overall_accuracy,
            best_streak: self.best_streak,
            total_questions: self.total_questions_answered,
            next_unlock: self.next_unlock_info(),
        }
    }

    /// The next-closest unlock: the first locked ladder tier, then the first
    /// locked specialty in catalog order.
    #[must_use]
    pub fn next_unlock_info(&self) -> Option<NextUnlockInfo> {
        let stats = self.cumulative_stats();
        let catalog = self.catalog();
        for step in &catalog.ladder {
            if !self.unlocked_difficulties.contains(&step.level) {
                return Some(NextUnlockInfo {
                    target: UnlockTarget::Difficulty(step.level),
                    requirements: unlocks::difficulty_gate_progress(&step.requirement, stats),
                });
            }
        }
        for def in &catalog.specialties {
            if !self.unlocked_specialties.contains(&def.name) {
                return Some(NextUnlockInfo {
                    target: UnlockTarget::Specialty(def.name.clone()),
                    requirements: unlocks::specialty_gate_progress(
                        &def.requirement,
                        stats,
                        &self.unlocked_difficulties,
                        &self.specialty_performance,
                    ),
                });
            }
        }
        None
    }

    /// Progress toward one ladder tier's gate, if that tier is gated.
    #[must_use]
    pub fn difficulty_progress(&self, level: DifficultyLevel) -> Option<Vec<unlocks::RequirementProgress>> {
        let stats = self.cumulative_stats();
        self.catalog()
            .requirement_for(level)
            .map(|requirement| unlocks::difficulty_gate_progress(requirement, stats))
    }

    /// Progress toward one specialty's gate.
    #[must_use]
    pub fn specialty_progress(&self, name: &str) -> Option<Vec<unlocks::RequirementProgress>> {
        let stats = self.cumulative_stats();
        self.catalog().specialty(name).map(|def| {
            unlocks::specialty_gate_progress(
                &def.requirement,
                stats,
                &self.unlocked_difficulties,
                &self.specialty_performance,
            )
        })
    }

    const fn cumulative_stats(&self) -> CumulativeStats {
        CumulativeStats {
            shifts: self.shifts_completed,
            questions: self.total_questions_answered,
            accuracy: self.overall_accuracy,
            best_streak: self.best_streak,
        }
    }
}
