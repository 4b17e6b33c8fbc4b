//! Static progression catalogs: specialties, difficulty ladder, milestones
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

use crate::difficulty::{DIFFICULTY_LADDER, DifficultyLevel, DifficultyRequirement, LadderStep};
use crate::milestones::{Milestone, MilestoneRequirement};
use crate::specialty::{MasteryGate, SpecialtyDef, SpecialtyRequirement};

static BUILT_IN: OnceLock<ProgressionCatalog> = OnceLock::new();

/// Requirement and content tables driving unlock gating.
///
/// The catalog is data, not code: games extend specialties, gates, and
/// milestones without touching the engine. The built-in catalog ships the
/// default Wardshift rotation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionCatalog {
    #[serde(default)]
    pub specialties: Vec<SpecialtyDef>,
    /// Gates for every ladder tier beyond the first, in ladder order.
    #[serde(default)]
    pub ladder: Vec<LadderStep>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Default for ProgressionCatalog {
    fn default() -> Self {
        Self {
            specialties: vec![
                SpecialtyDef {
                    name: "Internal Medicine".to_string(),
                    topics: topic_list(&[
                        "Pneumonia",
                        "Sepsis",
                        "Diabetes Management",
                        "Hypertension",
                        "COPD",
                        "Anemia",
                    ]),
                    requirement: SpecialtyRequirement::default(),
                    starts_unlocked: true,
                },
                SpecialtyDef {
                    name: "Cardiology".to_string(),
                    topics: topic_list(&[
                        "Heart Failure",
                        "Arrhythmia",
                        "Myocardial Infarction",
                        "Valvular Disease",
                    ]),
                    requirement: SpecialtyRequirement {
                        shifts: Some(3),
                        accuracy: Some(0.65),
                        ..SpecialtyRequirement::default()
                    },
                    starts_unlocked: false,
                },
                SpecialtyDef {
                    name: "Emergency Medicine".to_string(),
                    topics: topic_list(&[
                        "Trauma Assessment",
                        "Toxicology",
                        "Shock",
                        "Airway Management",
                    ]),
                    requirement: SpecialtyRequirement {
                        shifts: Some(6),
                        accuracy: Some(0.70),
                        required_difficulty: Some(DifficultyLevel::Resident),
                        ..SpecialtyRequirement::default()
                    },
                    starts_unlocked: false,
                },
                SpecialtyDef {
                    name: "Pediatrics".to_string(),
                    topics: topic_list(&[
                        "Bronchiolitis",
                        "Febrile Seizure",
                        "Neonatal Jaundice",
                        "Dehydration",
                    ]),
                    requirement: SpecialtyRequirement {
                        shifts: Some(8),
                        required_mastery: Some(MasteryGate::new("Internal Medicine")),
                        ..SpecialtyRequirement::default()
                    },
                    starts_unlocked: false,
                },
                SpecialtyDef {
                    name: "Surgery".to_string(),
                    topics: topic_list(&[
                        "Appendicitis",
                        "Bowel Obstruction",
                        "Postoperative Care",
                        "Wound Management",
                    ]),
                    requirement: SpecialtyRequirement {
                        shifts: Some(10),
                        accuracy: Some(0.72),
                        required_difficulty: Some(DifficultyLevel::Resident),
                        ..SpecialtyRequirement::default()
                    },
                    starts_unlocked: false,
                },
            ],
            ladder: vec![
                LadderStep {
                    level: DifficultyLevel::Resident,
                    requirement: DifficultyRequirement {
                        shifts: Some(5),
                        accuracy: Some(0.70),
                        min_questions: Some(50),
                        streak: None,
                    },
                },
                LadderStep {
                    level: DifficultyLevel::Attending,
                    requirement: DifficultyRequirement {
                        shifts: Some(12),
                        accuracy: Some(0.75),
                        min_questions: Some(150),
                        streak: Some(10),
                    },
                },
            ],
            milestones: vec![
                Milestone::new(
                    "first-shift",
                    "Locker nameplate",
                    MilestoneRequirement {
                        shifts: Some(1),
                        ..MilestoneRequirement::default()
                    },
                ),
                Milestone::new(
                    "settling-in",
                    "Ward coffee card",
                    MilestoneRequirement {
                        shifts: Some(5),
                        ..MilestoneRequirement::default()
                    },
                ),
                Milestone::new(
                    "charge-ready",
                    "Charge pager privileges",
                    MilestoneRequirement {
                        shifts: Some(15),
                        ..MilestoneRequirement::default()
                    },
                ),
                Milestone::new(
                    "sharp-diagnostician",
                    "Grand rounds shout-out",
                    MilestoneRequirement {
                        shifts: Some(5),
                        accuracy: Some(0.85),
                        ..MilestoneRequirement::default()
                    },
                ),
                Milestone::new(
                    "hot-streak",
                    "Break-room high five",
                    MilestoneRequirement {
                        streak: Some(5),
                        ..MilestoneRequirement::default()
                    },
                ),
                Milestone::new(
                    "unshakeable",
                    "Night-shift legend plaque",
                    MilestoneRequirement {
                        streak: Some(15),
                        ..MilestoneRequirement::default()
                    },
                ),
            ],
        }
    }
}

fn topic_list(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

impl ProgressionCatalog {
    /// Shared built-in catalog.
    #[must_use]
    pub fn built_in() -> &'static Self {
        BUILT_IN.get_or_init(Self::default)
    }

    /// Find a specialty by name.
    #[must_use]
    pub fn specialty(&self, name: &str) -> Option<&SpecialtyDef> {
        self.specialties.iter().find(|def| def.name == name)
    }

    /// The specialty whose topic pool contains the given topic.
    #[must_use]
    pub fn owning_specialty(&self, topic: &str) -> Option<&str> {
        self.specialties
            .iter()
            .find(|def| def.topics.iter().any(|candidate| candidate == topic))
            .map(|def| def.name.as_str())
    }

    /// Every topic across all specialties.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.specialties
            .iter()
            .flat_map(|def| def.topics.iter().map(String::as_str))
    }

    /// Names of specialties open from profile creation.
    pub fn starting_specialties(&self) -> impl Iterator<Item = &str> {
        self.specialties
            .iter()
            .filter(|def| def.starts_unlocked)
            .map(|def| def.name.as_str())
    }

    /// Gate for a ladder tier, if the tier is gated at all.
    #[must_use]
    pub fn requirement_for(&self, level: DifficultyLevel) -> Option<&DifficultyRequirement> {
        self.ladder
            .iter()
            .find(|step| step.level == level)
            .map(|step| &step.requirement)
    }

    /// Check catalog invariants.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when any table violates the documented bounds.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.validate_specialties()?;
        self.validate_ladder()?;
        self.validate_milestones()
    }

    fn validate_specialties(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        let mut topics = HashSet::new();
        for def in &self.specialties {
            if !names.insert(def.name.as_str()) {
                return Err(CatalogError::DuplicateSpecialty(def.name.clone()));
            }
            if def.topics.is_empty() {
                return Err(CatalogError::EmptyTopics(def.name.clone()));
            }
            for topic in &def.topics {
                if !topics.insert(topic.as_str()) {
                    return Err(CatalogError::DuplicateTopic(topic.clone()));
                }
            }
            if let Some(accuracy) = def.requirement.accuracy {
                if !(0.0..=1.0).contains(&accuracy) {
                    return Err(CatalogError::AccuracyRange {
                        scope: def.name.clone(),
                        value: accuracy,
                    });
                }
            }
            if let Some(gate) = &def.requirement.required_mastery {
                if self.specialty(&gate.specialty).is_none() {
                    return Err(CatalogError::UnknownMasterySpecialty {
                        gate: def.name.clone(),
                        target: gate.specialty.clone(),
                    });
                }
                if !(gate.threshold > 0.0 && gate.threshold <= 1.0) {
                    return Err(CatalogError::MasteryRange {
                        gate: def.name.clone(),
                        value: gate.threshold,
                    });
                }
            }
        }
        if !self.specialties.iter().any(|def| def.starts_unlocked) {
            return Err(CatalogError::NoStartingSpecialty);
        }
        Ok(())
    }

    fn validate_ladder(&self) -> Result<(), CatalogError> {
        let expected = &DIFFICULTY_LADDER[1..];
        for (index, level) in expected.iter().enumerate() {
            match self.ladder.get(index) {
                None => return Err(CatalogError::MissingLadderStep(*level)),
                Some(step) if step.level != *level => {
                    return Err(CatalogError::LadderOrder(step.level));
                }
                Some(step) => {
                    if let Some(accuracy) = step.requirement.accuracy {
                        if !(0.0..=1.0).contains(&accuracy) {
                            return Err(CatalogError::AccuracyRange {
                                scope: step.level.to_string(),
                                value: accuracy,
                            });
                        }
                    }
                }
            }
        }
        if let Some(extra) = self.ladder.get(expected.len()) {
            return Err(CatalogError::LadderOrder(extra.level));
        }
        Ok(())
    }

    fn validate_milestones(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        for milestone in &self.milestones {
            if !ids.insert(milestone.id.as_str()) {
                return Err(CatalogError::DuplicateMilestone(milestone.id.clone()));
            }
            if let Some(accuracy) = milestone.requirement.accuracy {
                if !(0.0..=1.0).contains(&accuracy) {
                    return Err(CatalogError::AccuracyRange {
                        scope: milestone.id.clone(),
                        value: accuracy,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Errors raised when catalog invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate specialty \"{0}\"")]
    DuplicateSpecialty(String),
    #[error("specialty \"{0}\" has no topics")]
    EmptyTopics(String),
    #[error("topic \"{0}\" appears in more than one specialty")]
    DuplicateTopic(String),
    #[error("{scope}: accuracy threshold {value:.2} outside [0, 1]")]
    AccuracyRange { scope: String, value: f32 },
    #[error("mastery gate on \"{gate}\" references unknown specialty \"{target}\"")]
    UnknownMasterySpecialty { gate: String, target: String },
    #[error("mastery threshold {value:.2} on \"{gate}\" outside (0, 1]")]
    MasteryRange { gate: String, value: f32 },
    #[error("ladder step missing for {0}")]
    MissingLadderStep(DifficultyLevel),
    #[error("ladder step for {0} out of order or duplicated")]
    LadderOrder(DifficultyLevel),
    #[error("duplicate milestone id \"{0}\"")]
    DuplicateMilestone(String),
    #[error("no specialty starts unlocked")]
    NoStartingSpecialty,
}
