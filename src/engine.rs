//! Diagnosis orchestration: normalize, infer, boost, score, assemble.
//!
//! The engine owns nothing mutable. Knowledge and synonym tables are
//! shared `Arc`s, so one engine can serve concurrent callers; every
//! `diagnose` call works on its own `NormalizedInput` and returns a
//! fresh immutable result.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::config::EngineConfig;
use crate::inference::{self, ConfidenceBand};
use crate::knowledge::{
    builtin_knowledge, builtin_locations, builtin_synonyms, KnowledgeBase, KnowledgeBaseError,
    LoadedModel, SynonymTable, UrgencyTier,
};
use crate::normalize::{NormalizedInput, Normalizer};
use crate::result::{
    Computed, DiagnosisCandidate, DiagnosticResult, DiagnosticStatus, SymptomScore,
    RESULT_SCHEMA_VERSION,
};
use crate::vitals::{self, RiskScore, VitalSigns, VitalsAnalysis};

pub struct DiagnosticEngine {
    knowledge: Arc<KnowledgeBase>,
    synonyms: Arc<SynonymTable>,
    locations: Arc<SynonymTable>,
    config: EngineConfig,
}

impl DiagnosticEngine {
    /// Engine over the built-in clinical model with default tuning.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            knowledge: builtin_knowledge(),
            synonyms: builtin_synonyms(),
            locations: builtin_locations(),
            config,
        }
    }

    /// Engine over an already-loaded model, e.g. one parsed from a
    /// JSON string or assembled programmatically.
    pub fn with_model(model: LoadedModel, config: EngineConfig) -> Self {
        Self {
            knowledge: model.knowledge,
            synonyms: model.synonyms,
            locations: builtin_locations(),
            config,
        }
    }

    /// Engine over an external model file. The file is validated on
    /// load; a broken model never produces a partially working engine.
    pub fn from_model_file(path: &Path, config: EngineConfig) -> Result<Self, KnowledgeBaseError> {
        Ok(Self::with_model(LoadedModel::from_file(path)?, config))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one diagnosis over free text and optional vitals.
    ///
    /// Never returns an error: unusable input yields a result with
    /// `InsufficientInput` status. Repeated calls with the same input
    /// produce the same ranking.
    pub fn diagnose(&self, text: &str, vitals: Option<&VitalSigns>) -> DiagnosticResult {
        let started = Instant::now();

        let normalizer = Normalizer::new(
            Arc::clone(&self.synonyms),
            Arc::clone(&self.locations),
            self.config.negation_window,
        );
        let mut input = normalizer.normalize(text);

        let vitals_analysis = self.analyze_vitals(vitals, &mut input);

        if input.is_empty() {
            let elapsed = started.elapsed().as_millis() as u64;
            info!(elapsed_ms = elapsed, "no usable evidence in input");
            let risk_scores = if self.config.capabilities.risk_scoring {
                Computed::NoInput
            } else {
                Computed::Disabled
            };
            return DiagnosticResult::insufficient(
                input.negated.into_iter().collect(),
                vitals_analysis,
                risk_scores,
                elapsed,
            );
        }

        let evidence = input.evidence();
        let mut posteriors = inference::compute_posteriors(&self.knowledge, &evidence);

        let fired = inference::match_patterns(&self.knowledge, &input);
        inference::apply_boosts(&mut posteriors, &fired, self.config.boost_scale);

        // Rank descending; equal probabilities break by disease id so
        // identical inputs always yield identical orderings.
        let mut ranked: Vec<(String, f64)> = posteriors.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.config.max_candidates);

        let confidence = inference::assess(&ranked, evidence.len(), &self.config.confidence);

        let candidates = self.build_candidates(&ranked, &evidence);
        let top_tier = candidates
            .first()
            .map(|c| c.urgency)
            .unwrap_or(UrgencyTier::Routine);
        let urgency =
            inference::effective_urgency(top_tier, inference::strongest_override(&fired));
        let urgency_score = inference::urgency_score(urgency, confidence.score);

        let risk_scores = self.score_risks(vitals, &evidence, &candidates);

        let warnings = self.collect_warnings(&confidence, urgency, &vitals_analysis);
        let recommendations = collect_recommendations(&candidates, urgency);

        let elapsed = started.elapsed().as_millis() as u64;
        info!(
            symptoms = evidence.len(),
            candidates = candidates.len(),
            patterns = fired.len(),
            confidence = confidence.band.as_str(),
            urgency = urgency.as_str(),
            elapsed_ms = elapsed,
            "diagnosis complete"
        );

        DiagnosticResult {
            schema_version: RESULT_SCHEMA_VERSION,
            engine_version: crate::config::ENGINE_VERSION.to_string(),
            status: DiagnosticStatus::Completed,
            recognized_symptoms: evidence.into_iter().collect(),
            locations: input.locations.into_iter().collect(),
            negated_symptoms: input.negated.into_iter().collect(),
            candidates,
            confidence,
            urgency,
            urgency_score,
            patterns_fired: fired.into_iter().map(|m| m.pattern_id).collect(),
            warnings,
            recommendations,
            vitals: vitals_analysis,
            risk_scores,
            processing_time_ms: elapsed,
            generated_at: chrono::Utc::now(),
        }
    }

    fn analyze_vitals(
        &self,
        vitals: Option<&VitalSigns>,
        input: &mut NormalizedInput,
    ) -> Computed<VitalsAnalysis> {
        if !self.config.capabilities.vitals_analysis {
            return Computed::Disabled;
        }
        match vitals {
            Some(v) if !v.is_empty() => {
                input.vitals_evidence = vitals::evidence(v);
                Computed::Computed(vitals::analyze(v))
            }
            _ => Computed::NoInput,
        }
    }

    fn score_risks(
        &self,
        vitals: Option<&VitalSigns>,
        evidence: &std::collections::BTreeSet<String>,
        candidates: &[DiagnosisCandidate],
    ) -> Computed<Vec<RiskScore>> {
        if !self.config.capabilities.risk_scoring {
            return Computed::Disabled;
        }
        let Some(v) = vitals.filter(|v| !v.is_empty()) else {
            return Computed::NoInput;
        };

        let altered =
            evidence.contains("confusion") || evidence.contains("altered_mental_status");
        let mut scores = Vec::new();
        if candidates.iter().any(|c| c.disease_id == "sepsis") {
            scores.push(vitals::qsofa(v, altered));
        }
        if candidates.iter().any(|c| c.disease_id == "pneumonia") {
            scores.push(vitals::curb65(v, altered));
        }

        if scores.is_empty() {
            Computed::NoInput
        } else {
            Computed::Computed(scores)
        }
    }

    fn build_candidates(
        &self,
        ranked: &[(String, f64)],
        evidence: &std::collections::BTreeSet<String>,
    ) -> Vec<DiagnosisCandidate> {
        ranked
            .iter()
            .filter_map(|(disease_id, probability)| {
                let disease = self.knowledge.disease(disease_id)?;
                let supporting = inference::supporting_symptoms(&self.knowledge, disease_id, evidence)
                    .into_iter()
                    .map(|(symptom_id, likelihood)| SymptomScore {
                        symptom_id,
                        likelihood,
                    })
                    .collect();
                Some(DiagnosisCandidate {
                    disease_id: disease_id.clone(),
                    name: disease.name.clone(),
                    probability: *probability,
                    urgency: disease.urgency,
                    supporting,
                    recommendations: disease.recommendations.clone(),
                })
            })
            .collect()
    }

    fn collect_warnings(
        &self,
        confidence: &inference::ConfidenceAssessment,
        urgency: UrgencyTier,
        vitals: &Computed<VitalsAnalysis>,
    ) -> Vec<String> {
        let mut warnings = Vec::new();
        if urgency == UrgencyTier::Critical {
            warnings.push(
                "Critical presentation suspected; seek emergency care immediately".to_string(),
            );
        }
        if confidence.penalized {
            warnings.push(format!(
                "Only {} recognized symptom(s); confidence is reduced",
                confidence.symptom_count
            ));
        }
        if confidence.band == ConfidenceBand::VeryLow {
            warnings.push(
                "Evidence is too weak to distinguish between candidates".to_string(),
            );
        }
        if let Some(analysis) = vitals.value() {
            warnings.extend(analysis.red_flags.iter().cloned());
        }
        warnings
    }
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Top candidate's recommendations, prefixed with the emergency
/// directive when the overall urgency is critical.
fn collect_recommendations(candidates: &[DiagnosisCandidate], urgency: UrgencyTier) -> Vec<String> {
    let mut out = Vec::new();
    if urgency == UrgencyTier::Critical {
        out.push("Call emergency services or go to the nearest emergency department".to_string());
    }
    if let Some(top) = candidates.first() {
        for r in &top.recommendations {
            if !out.contains(r) {
                out.push(r.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Capabilities, ConfidenceThresholds};

    fn engine() -> DiagnosticEngine {
        DiagnosticEngine::new()
    }

    // ======== SCENARIOS ========

    #[test]
    fn classic_appendicitis_presentation_ranks_appendicitis_first() {
        let result = engine().diagnose(
            "Severe pain in my lower right abdomen, fever of 102, nausea, \
             and the pain started near my belly button",
            None,
        );
        assert_eq!(result.status, DiagnosticStatus::Completed);
        assert_eq!(result.top_candidate().unwrap().disease_id, "appendicitis");
        assert_eq!(result.urgency, UrgencyTier::Urgent);
        assert!(result
            .patterns_fired
            .iter()
            .any(|p| p == "appendicitis_classic"));
        assert!(result.confidence.band >= ConfidenceBand::Moderate);
        assert!(result.locations.contains(&"rlq".to_string()));
    }

    #[test]
    fn headache_alone_completes_with_reduced_confidence() {
        let result = engine().diagnose("I have a headache", None);
        assert_eq!(result.status, DiagnosticStatus::Completed);
        assert_eq!(
            result.top_candidate().unwrap().disease_id,
            "tension_headache"
        );
        assert!(result.confidence.penalized);
        assert_eq!(result.confidence.band, ConfidenceBand::Low);
        assert_eq!(result.urgency, UrgencyTier::Routine);
        assert!(result.patterns_fired.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("confidence is reduced")));
    }

    #[test]
    fn gibberish_is_insufficient_input_not_an_error() {
        let result = engine().diagnose("asdf qwerty zzz blorp", None);
        assert_eq!(result.status, DiagnosticStatus::InsufficientInput);
        assert!(result.candidates.is_empty());
        assert_eq!(result.confidence.band, ConfidenceBand::VeryLow);
        assert_eq!(result.urgency, UrgencyTier::Routine);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn stroke_signs_force_critical_urgency() {
        let result = engine().diagnose("face drooping and slurred speech", None);
        assert_eq!(result.urgency, UrgencyTier::Critical);
        assert!(result.urgency_score >= 8.0);
        assert!(result.patterns_fired.iter().any(|p| p == "stroke_fast"));
        assert!(result
            .recommendations
            .first()
            .unwrap()
            .contains("emergency"));
    }

    // ======== NORMALIZATION THROUGH THE ENGINE ========

    #[test]
    fn breathlessness_variants_deduplicate() {
        let result = engine().diagnose("short of breath and sob, cant breathe", None);
        let hits: Vec<_> = result
            .recognized_symptoms
            .iter()
            .filter(|s| *s == "breathlessness")
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(result.recognized_symptoms.len(), 1);
    }

    #[test]
    fn negated_symptoms_are_excluded_and_reported() {
        let result = engine().diagnose("no fever but I have a bad cough", None);
        assert!(!result.recognized_symptoms.contains(&"high_fever".to_string()));
        assert!(result.negated_symptoms.contains(&"high_fever".to_string()));
        assert!(result.recognized_symptoms.contains(&"cough".to_string()));
    }

    // ======== DETERMINISM AND ORDERING ========

    #[test]
    fn repeated_diagnosis_is_identical_apart_from_timing() {
        let e = engine();
        let text = "chest pain radiating to left arm, sweating and nausea";
        let a = e.diagnose(text, None);
        let b = e.diagnose(text, None);
        assert_eq!(a.candidates, b.candidates);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.urgency, b.urgency);
        assert_eq!(a.patterns_fired, b.patterns_fired);
    }

    #[test]
    fn candidates_are_sorted_descending() {
        let result = engine().diagnose("fever, cough, and a sore throat", None);
        let probs: Vec<f64> = result.candidates.iter().map(|c| c.probability).collect();
        for pair in probs.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert!(result.candidates.len() <= engine().config.max_candidates);
    }

    // ======== VITALS INTEGRATION ========

    #[test]
    fn measured_fever_feeds_evidence_and_analysis() {
        let vitals = VitalSigns {
            temperature_c: Some(39.2),
            ..Default::default()
        };
        let result = engine().diagnose("cough and chills", Some(&vitals));
        assert!(result.recognized_symptoms.contains(&"high_fever".to_string()));
        let analysis = result.vitals.value().expect("vitals analysis present");
        assert!(analysis.news_score > 0);
    }

    #[test]
    fn vitals_alone_support_a_diagnosis() {
        // No recognizable text symptoms, but vitals inject evidence.
        let vitals = VitalSigns {
            temperature_c: Some(39.5),
            heart_rate_bpm: Some(120.0),
            respiratory_rate_bpm: Some(24.0),
            ..Default::default()
        };
        let result = engine().diagnose("feeling terrible", Some(&vitals));
        assert_eq!(result.status, DiagnosticStatus::Completed);
        assert!(!result.candidates.is_empty());
    }

    #[test]
    fn sepsis_candidate_triggers_qsofa() {
        let vitals = VitalSigns {
            temperature_c: Some(39.0),
            respiratory_rate_bpm: Some(24.0),
            systolic_bp_mmhg: Some(88.0),
            ..Default::default()
        };
        let result = engine().diagnose("fever and confusion", Some(&vitals));
        assert!(result
            .candidates
            .iter()
            .any(|c| c.disease_id == "sepsis"));
        let scores = result.risk_scores.value().expect("risk scores present");
        let qsofa = scores.iter().find(|s| s.name == "qSOFA").unwrap();
        // RR 24, SBP 88, and reported confusion all score.
        assert_eq!(qsofa.score, 3);
    }

    #[test]
    fn disabled_capabilities_mark_stages_disabled() {
        let config = EngineConfig {
            capabilities: Capabilities {
                vitals_analysis: false,
                risk_scoring: false,
            },
            ..Default::default()
        };
        let vitals = VitalSigns {
            temperature_c: Some(39.0),
            ..Default::default()
        };
        let engine = DiagnosticEngine::with_config(config);
        let result = engine.diagnose("a bad cough", Some(&vitals));
        assert_eq!(result.vitals, Computed::Disabled);
        assert_eq!(result.risk_scores, Computed::Disabled);
        // Disabled vitals stage must not inject evidence either.
        assert!(!result.recognized_symptoms.contains(&"high_fever".to_string()));

        // The insufficient-input path reports the same stage markers.
        let empty = engine.diagnose("asdf qwerty", None);
        assert_eq!(empty.status, DiagnosticStatus::InsufficientInput);
        assert_eq!(empty.vitals, Computed::Disabled);
        assert_eq!(empty.risk_scores, Computed::Disabled);
    }

    #[test]
    fn zero_boost_scale_disables_pattern_influence_on_probability() {
        let text = "lower right abdomen pain, fever, nausea";
        let boosted = engine().diagnose(text, None);
        let config = EngineConfig {
            boost_scale: 0.0,
            ..Default::default()
        };
        let unboosted = DiagnosticEngine::with_config(config).diagnose(text, None);
        let with_boost = boosted
            .candidates
            .iter()
            .find(|c| c.disease_id == "appendicitis")
            .unwrap();
        let without_boost = unboosted
            .candidates
            .iter()
            .find(|c| c.disease_id == "appendicitis")
            .unwrap();
        assert!(with_boost.probability > without_boost.probability);
    }

    #[test]
    fn supporting_symptoms_come_from_the_input() {
        let result = engine().diagnose("diarrhea, vomiting and nausea", None);
        let top = result.top_candidate().unwrap();
        assert_eq!(top.disease_id, "gastroenteritis");
        assert!(top
            .supporting
            .iter()
            .any(|s| s.symptom_id == "diarrhea"));
        // Strongest evidence first.
        for pair in top.supporting.windows(2) {
            assert!(pair[0].likelihood >= pair[1].likelihood);
        }
    }

    // ======== EXTERNAL MODELS ========

    #[test]
    fn engine_runs_over_a_model_loaded_from_json() {
        let json = r#"{
            "symptoms": [
                {"id": "fever", "label": "Fever", "location": null},
                {"id": "cough", "label": "Cough", "location": null}
            ],
            "diseases": [
                {
                    "id": "flu",
                    "name": "Influenza",
                    "prior": 0.1,
                    "likelihoods": {"fever": 0.7, "cough": 0.6},
                    "urgency": "routine",
                    "recommendations": ["Rest and fluids"]
                }
            ],
            "synonyms": {"the shivers": "fever"}
        }"#;
        let model = LoadedModel::from_json_str(json).unwrap();
        let engine = DiagnosticEngine::with_model(model, EngineConfig::default());
        let result = engine.diagnose("the shivers and a cough", None);
        assert_eq!(result.status, DiagnosticStatus::Completed);
        assert_eq!(result.top_candidate().unwrap().disease_id, "flu");
    }

    // ======== CONFIGURABLE THRESHOLDS ========

    #[test]
    fn stricter_thresholds_lower_the_band() {
        let text = "Severe pain in my lower right abdomen, fever, nausea, \
             and the pain started near my belly button";
        let default_band = engine().diagnose(text, None).confidence.band;
        let strict = EngineConfig {
            confidence: ConfidenceThresholds {
                high: 0.99,
                moderate: 0.97,
                low: 0.95,
                ..Default::default()
            },
            ..Default::default()
        };
        let strict_band = DiagnosticEngine::with_config(strict)
            .diagnose(text, None)
            .confidence
            .band;
        assert!(strict_band < default_band);
    }
}
