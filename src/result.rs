//! Result payload types. A `DiagnosticResult` is assembled once at the
//! end of a run and never mutated afterwards; callers serialize it or
//! read it, nothing writes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ENGINE_VERSION;
use crate::inference::{ConfidenceAssessment, ConfidenceBand};
use crate::knowledge::UrgencyTier;
use crate::vitals::{RiskScore, VitalsAnalysis};

/// Bumped whenever the serialized result shape changes incompatibly.
pub const RESULT_SCHEMA_VERSION: u32 = 1;

/// Outcome of a diagnosis run. Unusable input is a status, not an
/// error: the caller still gets a well-formed payload explaining why
/// no ranking was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStatus {
    Completed,
    InsufficientInput,
}

/// Result of an optional analysis stage. Distinguishes a stage that
/// was switched off from one that ran without usable input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Computed<T> {
    Disabled,
    NoInput,
    Computed(T),
}

impl<T> Computed<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Computed(v) => Some(v),
            _ => None,
        }
    }
}

/// One profile symptom that supported a candidate, with its
/// conditional probability in the disease profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomScore {
    pub symptom_id: String,
    pub likelihood: f64,
}

/// One ranked hypothesis in the differential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisCandidate {
    pub disease_id: String,
    pub name: String,
    /// Post-boost probability in [0, 1]. Boosted values no longer sum
    /// to one across candidates.
    pub probability: f64,
    pub urgency: UrgencyTier,
    /// Evidence from the input that this disease's profile expects,
    /// strongest first.
    pub supporting: Vec<SymptomScore>,
    pub recommendations: Vec<String>,
}

/// Immutable output of one diagnosis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    pub schema_version: u32,
    pub engine_version: String,
    pub status: DiagnosticStatus,
    /// Canonical symptom ids recognized in the text, vitals-derived
    /// evidence included.
    pub recognized_symptoms: Vec<String>,
    /// Anatomical location tags recognized in the text.
    pub locations: Vec<String>,
    /// Symptoms mentioned but negated, excluded from inference.
    pub negated_symptoms: Vec<String>,
    /// Ranked differential, best first.
    pub candidates: Vec<DiagnosisCandidate>,
    pub confidence: ConfidenceAssessment,
    pub urgency: UrgencyTier,
    /// 0-10 numeric urgency alongside the tier.
    pub urgency_score: f64,
    /// Ids of critical patterns that fired.
    pub patterns_fired: Vec<String>,
    pub warnings: Vec<String>,
    /// Merged care recommendations for the leading candidates.
    pub recommendations: Vec<String>,
    pub vitals: Computed<VitalsAnalysis>,
    pub risk_scores: Computed<Vec<RiskScore>>,
    pub processing_time_ms: u64,
    pub generated_at: DateTime<Utc>,
}

impl DiagnosticResult {
    /// Payload for input that produced no usable evidence. Stage
    /// markers are the caller's, so disabled capabilities read the
    /// same here as on the completed path.
    pub fn insufficient(
        negated_symptoms: Vec<String>,
        vitals: Computed<VitalsAnalysis>,
        risk_scores: Computed<Vec<RiskScore>>,
        processing_time_ms: u64,
    ) -> Self {
        let mut warnings = vec![
            "No recognizable symptoms were found in the input; no diagnosis was attempted"
                .to_string(),
        ];
        if !negated_symptoms.is_empty() {
            warnings.push(format!(
                "All recognized symptoms were negated: {}",
                negated_symptoms.join(", ")
            ));
        }
        Self {
            schema_version: RESULT_SCHEMA_VERSION,
            engine_version: ENGINE_VERSION.to_string(),
            status: DiagnosticStatus::InsufficientInput,
            recognized_symptoms: Vec::new(),
            locations: Vec::new(),
            negated_symptoms,
            candidates: Vec::new(),
            confidence: ConfidenceAssessment {
                score: 0.0,
                band: ConfidenceBand::VeryLow,
                top_probability: 0.0,
                separation: 0.0,
                symptom_count: 0,
                penalized: false,
            },
            urgency: UrgencyTier::Routine,
            urgency_score: 0.0,
            patterns_fired: Vec::new(),
            warnings,
            recommendations: vec![
                "Describe the symptoms in more detail, or consult a clinician directly"
                    .to_string(),
            ],
            vitals,
            risk_scores,
            processing_time_ms,
            generated_at: Utc::now(),
        }
    }

    pub fn top_candidate(&self) -> Option<&DiagnosisCandidate> {
        self.candidates.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_result_is_well_formed() {
        let r = DiagnosticResult::insufficient(vec![], Computed::Disabled, Computed::NoInput, 2);
        assert_eq!(r.status, DiagnosticStatus::InsufficientInput);
        assert!(r.candidates.is_empty());
        assert_eq!(r.confidence.band, ConfidenceBand::VeryLow);
        assert_eq!(r.urgency, UrgencyTier::Routine);
        assert!(!r.warnings.is_empty());
        assert_eq!(r.schema_version, RESULT_SCHEMA_VERSION);
    }

    #[test]
    fn fully_negated_input_is_called_out() {
        let r = DiagnosticResult::insufficient(
            vec!["chest_pain".to_string()],
            Computed::NoInput,
            Computed::NoInput,
            1,
        );
        assert!(r.warnings.iter().any(|w| w.contains("negated")));
    }

    #[test]
    fn insufficient_result_keeps_caller_stage_markers() {
        let r = DiagnosticResult::insufficient(vec![], Computed::Disabled, Computed::Disabled, 1);
        assert_eq!(r.vitals, Computed::Disabled);
        assert_eq!(r.risk_scores, Computed::Disabled);
    }

    #[test]
    fn computed_tags_distinguish_disabled_from_no_input() {
        let disabled: Computed<u32> = Computed::Disabled;
        let no_input: Computed<u32> = Computed::NoInput;
        let value = Computed::Computed(7u32);
        assert_eq!(serde_json::to_string(&disabled).unwrap(), r#"{"status":"disabled"}"#);
        assert_eq!(serde_json::to_string(&no_input).unwrap(), r#"{"status":"no_input"}"#);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"status":"computed","value":7}"#
        );
        assert_eq!(value.value(), Some(&7));
        assert_eq!(disabled.value(), None);
    }

    #[test]
    fn result_round_trips_through_json() {
        let r = DiagnosticResult::insufficient(vec![], Computed::Disabled, Computed::NoInput, 3);
        let json = serde_json::to_string(&r).unwrap();
        let back: DiagnosticResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, r.status);
        assert_eq!(back.engine_version, r.engine_version);
    }
}
