use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// UrgencyTier
// ---------------------------------------------------------------------------

/// How quickly a condition needs clinical attention.
/// Ordering matters: `Critical > Urgent > Routine`, so tier comparisons
/// and pattern overrides can use `max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    /// Can be evaluated in a routine appointment.
    Routine,
    /// Needs evaluation within 24 hours.
    Urgent,
    /// Needs emergency evaluation now.
    Critical,
}

impl UrgencyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Urgent => "urgent",
            Self::Critical => "critical",
        }
    }
}

// ---------------------------------------------------------------------------
// Symptom
// ---------------------------------------------------------------------------

/// A canonical clinical sign. Defined only by the knowledge base;
/// never constructed at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    /// Canonical identifier, e.g. `abdominal_pain_rlq`.
    pub id: String,
    /// Display label, e.g. "Right lower quadrant pain".
    pub label: String,
    /// Anatomical location tag this symptom implies, if any.
    pub location: Option<String>,
}

// ---------------------------------------------------------------------------
// Disease
// ---------------------------------------------------------------------------

/// A candidate diagnosis with its probabilistic symptom profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disease {
    /// Canonical identifier, e.g. `appendicitis`.
    pub id: String,
    /// Display name, e.g. "Appendicitis".
    pub name: String,
    /// Prior probability P(disease), in (0, 1]. Priors are independent
    /// hypotheses and need not sum to 1 across diseases.
    pub prior: f64,
    /// P(symptom | disease) for each symptom in this disease's profile.
    pub likelihoods: BTreeMap<String, f64>,
    /// Baseline urgency when this disease tops the differential.
    pub urgency: UrgencyTier,
    /// Clinical workup recommendations surfaced when this disease tops
    /// the differential.
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// CriticalPattern
// ---------------------------------------------------------------------------

/// A hand-authored pathognomonic symptom/location combination.
///
/// Patterns exist to correct false negatives on dangerous conditions:
/// a firing pattern adds probability mass and can force a minimum
/// urgency regardless of the Bayesian rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalPattern {
    /// Stable identifier for the audit trail, e.g. `appendicitis_classic`.
    pub id: String,
    /// Disease this pattern boosts. Must exist in the knowledge base.
    pub disease_id: String,
    /// Required symptom ids. Must all exist in the knowledge base.
    pub symptoms: Vec<String>,
    /// Required anatomical location tags.
    #[serde(default)]
    pub locations: Vec<String>,
    /// The pattern fires once this many required items are present.
    pub min_matches: usize,
    /// Probability mass added when the pattern fires at full match,
    /// in (0, 1]. Scaled down for partial matches.
    pub boost: f64,
    /// Minimum urgency forced when this pattern fires.
    #[serde(default)]
    pub urgency_override: Option<UrgencyTier>,
}

impl CriticalPattern {
    /// Total number of required items (symptoms + locations).
    pub fn required_count(&self) -> usize {
        self.symptoms.len() + self.locations.len()
    }
}

// ---------------------------------------------------------------------------
// KnowledgeBase
// ---------------------------------------------------------------------------

/// The immutable disease model: symptoms, diseases, and critical patterns.
///
/// Constructed once at startup and shared read-only across concurrent
/// diagnosis calls. All structural invariants are enforced here at
/// construction; once built, the model is trusted and no per-request
/// validation occurs.
#[derive(Debug)]
pub struct KnowledgeBase {
    symptoms: BTreeMap<String, Symptom>,
    diseases: BTreeMap<String, Disease>,
    patterns: Vec<CriticalPattern>,
}

impl KnowledgeBase {
    /// Build and validate a knowledge base. Fails fast on any structural
    /// violation; a corrupt model must never enter service.
    pub fn new(
        symptoms: Vec<Symptom>,
        diseases: Vec<Disease>,
        patterns: Vec<CriticalPattern>,
    ) -> Result<Self, KnowledgeBaseError> {
        let symptoms: BTreeMap<String, Symptom> =
            symptoms.into_iter().map(|s| (s.id.clone(), s)).collect();
        let diseases: BTreeMap<String, Disease> =
            diseases.into_iter().map(|d| (d.id.clone(), d)).collect();

        let kb = Self {
            symptoms,
            diseases,
            patterns,
        };
        kb.validate()?;
        Ok(kb)
    }

    fn validate(&self) -> Result<(), KnowledgeBaseError> {
        if self.diseases.is_empty() {
            return Err(KnowledgeBaseError::EmptyModel);
        }

        for disease in self.diseases.values() {
            if !(disease.prior > 0.0 && disease.prior <= 1.0) {
                return Err(KnowledgeBaseError::InvalidPrior {
                    disease_id: disease.id.clone(),
                    value: disease.prior,
                });
            }
            for (symptom_id, likelihood) in &disease.likelihoods {
                if !self.symptoms.contains_key(symptom_id) {
                    return Err(KnowledgeBaseError::UnknownSymptom {
                        symptom_id: symptom_id.clone(),
                        referenced_by: format!("disease '{}'", disease.id),
                    });
                }
                if !(0.0..=1.0).contains(likelihood) {
                    return Err(KnowledgeBaseError::InvalidLikelihood {
                        disease_id: disease.id.clone(),
                        symptom_id: symptom_id.clone(),
                        value: *likelihood,
                    });
                }
            }
        }

        for pattern in &self.patterns {
            if !self.diseases.contains_key(&pattern.disease_id) {
                return Err(KnowledgeBaseError::UnknownDisease {
                    disease_id: pattern.disease_id.clone(),
                    referenced_by: format!("pattern '{}'", pattern.id),
                });
            }
            for symptom_id in &pattern.symptoms {
                if !self.symptoms.contains_key(symptom_id) {
                    return Err(KnowledgeBaseError::UnknownSymptom {
                        symptom_id: symptom_id.clone(),
                        referenced_by: format!("pattern '{}'", pattern.id),
                    });
                }
            }
            if pattern.min_matches == 0 || pattern.min_matches > pattern.required_count() {
                return Err(KnowledgeBaseError::InvalidPattern {
                    pattern_id: pattern.id.clone(),
                    reason: format!(
                        "min_matches {} out of range 1..={}",
                        pattern.min_matches,
                        pattern.required_count()
                    ),
                });
            }
            if !(pattern.boost > 0.0 && pattern.boost <= 1.0) {
                return Err(KnowledgeBaseError::InvalidPattern {
                    pattern_id: pattern.id.clone(),
                    reason: format!("boost {} out of range (0, 1]", pattern.boost),
                });
            }
        }

        Ok(())
    }

    pub fn symptom(&self, id: &str) -> Option<&Symptom> {
        self.symptoms.get(id)
    }

    pub fn disease(&self, id: &str) -> Option<&Disease> {
        self.diseases.get(id)
    }

    /// Diseases in deterministic (id) order.
    pub fn diseases(&self) -> impl Iterator<Item = &Disease> {
        self.diseases.values()
    }

    pub fn patterns(&self) -> &[CriticalPattern] {
        &self.patterns
    }

    pub fn symptom_count(&self) -> usize {
        self.symptoms.len()
    }

    pub fn disease_count(&self) -> usize {
        self.diseases.len()
    }
}

// ---------------------------------------------------------------------------
// KnowledgeBaseError
// ---------------------------------------------------------------------------

/// Fatal model-loading errors. These abort startup; they are never
/// produced per request.
#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model defines no diseases")]
    EmptyModel,

    #[error("Unknown symptom '{symptom_id}' referenced by {referenced_by}")]
    UnknownSymptom {
        symptom_id: String,
        referenced_by: String,
    },

    #[error("Unknown disease '{disease_id}' referenced by {referenced_by}")]
    UnknownDisease {
        disease_id: String,
        referenced_by: String,
    },

    #[error("Disease '{disease_id}' has prior {value}, expected (0, 1]")]
    InvalidPrior { disease_id: String, value: f64 },

    #[error("Disease '{disease_id}' has likelihood {value} for '{symptom_id}', expected [0, 1]")]
    InvalidLikelihood {
        disease_id: String,
        symptom_id: String,
        value: f64,
    },

    #[error("Pattern '{pattern_id}' is invalid: {reason}")]
    InvalidPattern { pattern_id: String, reason: String },

    #[error("Synonym phrase '{phrase}' maps to both '{first}' and '{second}'")]
    SynonymConflict {
        phrase: String,
        first: String,
        second: String,
    },
}
