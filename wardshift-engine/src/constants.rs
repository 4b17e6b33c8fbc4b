//! Centralized balance and tuning constants for Wardshift progression logic.
//!
//! These values define the deterministic math for unlock gating, adaptive
//! weighting, and priority scoring. Keeping them together ensures that
//! progression tuning can only be adjusted via code changes reviewed in
//! version control, rather than through external assets.

// Mastery tuning -----------------------------------------------------------
pub(crate) const MASTERY_VOLUME_TARGET: f32 = 50.0;
/// Reserved hook for time decay; mastery is volume * accuracy until it lands.
pub(crate) const MASTERY_RECENCY_FACTOR: f32 = 1.0;
pub(crate) const MASTERY_GATE_DEFAULT: f32 = 0.8;

// Adaptive weight tuning ---------------------------------------------------
pub(crate) const TOPIC_WEIGHT_DEFAULT: f32 = 1.0;
pub(crate) const TOPIC_WEIGHT_MIN: f32 = 0.1;
pub(crate) const TOPIC_WEIGHT_MAX: f32 = 5.0;
pub(crate) const TOPIC_WEIGHT_MISS_FACTOR: f32 = 1.5;
pub(crate) const TOPIC_WEIGHT_HIT_FACTOR: f32 = 0.95;
pub(crate) const ERROR_FREQUENCY_MIN: f32 = 0.0;
pub(crate) const ERROR_FREQUENCY_MAX: f32 = 2.0;
pub(crate) const ERROR_FREQUENCY_MISS_STEP: f32 = 0.1;
pub(crate) const ERROR_FREQUENCY_HIT_DECAY: f32 = 0.9;

// Difficulty scaling tuning ------------------------------------------------
pub(crate) const DIFFICULTY_SCALING_DEFAULT: f32 = 1.0;
pub(crate) const DIFFICULTY_SCALING_MIN: f32 = 0.5;
pub(crate) const DIFFICULTY_SCALING_MAX: f32 = 2.0;
pub(crate) const DIFFICULTY_SCALING_STEP_UP: f32 = 1.05;
pub(crate) const DIFFICULTY_SCALING_STEP_DOWN: f32 = 0.95;
pub(crate) const TARGET_SESSION_ACCURACY: f32 = 0.75;
// The raise and lower margins differ on purpose: the dead band keeps the
// scaling from oscillating around the target.
pub(crate) const SCALING_RAISE_MARGIN: f32 = 0.10;
pub(crate) const SCALING_LOWER_MARGIN: f32 = 0.15;

// Priority scoring tuning --------------------------------------------------
pub(crate) const PRIORITY_BASE: f32 = 1.0;
pub(crate) const RECENCY_MULTIPLIER_CAP: f32 = 2.0;
pub(crate) const RECENCY_HOURS_WINDOW: f32 = 24.0;
pub(crate) const WEAK_TOPIC_MULTIPLIER: f32 = 1.5;
pub(crate) const MS_PER_HOUR: f32 = 3_600_000.0;
