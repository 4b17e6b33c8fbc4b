//! Wardshift Progression Engine
//!
//! Platform-agnostic progression, unlock-gating, and adaptive-difficulty
//! logic for the Wardshift clinical training game. This crate tracks learner
//! performance across shifts without any UI or platform-specific
//! dependencies: the surrounding game shell reports finished shifts through
//! [`ProgressionState::complete_session`] and reads back summaries and
//! priority scores for display and question selection.

pub mod catalog;
pub mod constants;
pub mod difficulty;
pub mod milestones;
pub mod scoring;
pub mod session;
pub mod specialty;
pub mod state;
pub mod summary;
pub mod unlocks;
pub mod weights;

// Re-export commonly used types
pub use catalog::{CatalogError, ProgressionCatalog};
pub use difficulty::{DIFFICULTY_LADDER, DifficultyLevel, DifficultyRequirement, LadderStep};
pub use milestones::{Milestone, MilestoneRequirement};
pub use scoring::{error_multiplier, recency_multiplier, score_topics, weak_topic_multiplier};
pub use session::{
    AdaptiveAdjustment, AdjustmentKind, QuestionOutcome, SessionOutcome, SessionResult,
    SpecialtyBreakdown,
};
pub use specialty::{MasteryGate, SpecialtyDef, SpecialtyPerformance, SpecialtyRequirement};
pub use state::ProgressionState;
pub use summary::{NextUnlockInfo, ProgressionSummary, UnlockTarget};
pub use unlocks::{
    CumulativeStats, RequirementProgress, difficulty_gate_met, difficulty_gate_progress,
    specialty_gate_met, specialty_gate_progress,
};
pub use weights::AdaptiveWeights;

/// Trait for abstracting profile persistence.
/// Platform-specific implementations should provide this.
pub trait ProfileStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a progression profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be saved.
    fn save_profile(&self, profile_name: &str, state: &ProgressionState)
    -> Result<(), Self::Error>;

    /// Load a progression profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be loaded.
    fn load_profile(&self, profile_name: &str) -> Result<Option<ProgressionState>, Self::Error>;

    /// Delete a saved profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be deleted.
    fn delete_profile(&self, profile_name: &str) -> Result<(), Self::Error>;
}

/// Engine binding a storage backend to the profile lifecycle.
///
/// In-memory mutation always completes before serialization starts; a failed
/// save leaves the in-memory profile authoritative and is never rolled back.
pub struct ProgressionEngine<S>
where
    S: ProfileStorage,
{
    storage: S,
    catalog: Option<ProgressionCatalog>,
}

impl<S> ProgressionEngine<S>
where
    S: ProfileStorage,
{
    /// Create an engine on the built-in catalog.
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            catalog: None,
        }
    }

    /// Create an engine with a custom catalog, validating it first.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the catalog violates its invariants.
    pub fn with_catalog(storage: S, catalog: ProgressionCatalog) -> Result<Self, CatalogError> {
        catalog.validate()?;
        Ok(Self {
            storage,
            catalog: Some(catalog),
        })
    }

    /// Create a fresh profile seeded from the engine's catalog.
    #[must_use]
    pub fn new_profile(&self) -> ProgressionState {
        ProgressionState::with_catalog(self.catalog.clone())
    }

    /// Save a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be saved.
    pub fn save_profile(&self, profile_name: &str, state: &ProgressionState) -> Result<(), S::Error> {
        self.storage.save_profile(profile_name, state)
    }

    /// Load a profile and reattach the engine's catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be loaded.
    pub fn load_profile(&self, profile_name: &str) -> Result<Option<ProgressionState>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        if let Some(state) = self.storage.load_profile(profile_name).map_err(Into::into)? {
            Ok(Some(state.rehydrate(self.catalog.clone())))
        } else {
            Ok(None)
        }
    }

    /// Delete a saved profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be deleted.
    pub fn delete_profile(&self, profile_name: &str) -> Result<(), S::Error> {
        self.storage.delete_profile(profile_name)
    }
}
