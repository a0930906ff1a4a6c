//! Probabilistic core: naive-Bayes scoring, critical-pattern boosting,
//! and confidence/urgency assessment over the resulting ranking.

pub mod bayes;
pub mod confidence;
pub mod patterns;

pub use bayes::{compute_posteriors, supporting_symptoms, PROBABILITY_FLOOR};
pub use confidence::{
    assess, effective_urgency, urgency_score, ConfidenceAssessment, ConfidenceBand,
};
pub use patterns::{apply_boosts, match_patterns, strongest_override, PatternMatch};
