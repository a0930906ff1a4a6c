//! Pattern-boosting stage: rescan normalized evidence against the
//! hand-authored critical patterns.
//!
//! A pathognomonic combination must never be suppressed by a low raw
//! posterior. This stage trades specificity for sensitivity: a firing
//! pattern adds probability mass after Bayesian normalization and can
//! force a minimum urgency regardless of rank.

use std::collections::BTreeMap;

use crate::knowledge::{KnowledgeBase, UrgencyTier};
use crate::normalize::NormalizedInput;

/// A critical pattern that fired for this input.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub pattern_id: String,
    pub disease_id: String,
    /// Required items present (symptoms + locations).
    pub matched: usize,
    /// Required symptoms present, excluding location tags. A pattern
    /// needs at least one to fire, so a location mention alone can
    /// never conjure a disease with no symptom evidence.
    pub matched_symptoms: usize,
    /// Total required items.
    pub required: usize,
    /// Authored boost magnitude, before partial-match scaling.
    pub boost: f64,
    pub urgency_override: Option<UrgencyTier>,
}

impl PatternMatch {
    /// Boost scaled by the fraction of required items present, so a
    /// minimal match moves the ranking less than a full presentation.
    pub fn effective_boost(&self, boost_scale: f64) -> f64 {
        self.boost * (self.matched as f64 / self.required as f64) * boost_scale
    }
}

/// Scan all patterns against the normalized evidence.
pub fn match_patterns(knowledge: &KnowledgeBase, input: &NormalizedInput) -> Vec<PatternMatch> {
    let evidence = input.evidence();
    let mut fired = Vec::new();

    for pattern in knowledge.patterns() {
        let matched_symptoms = pattern
            .symptoms
            .iter()
            .filter(|s| evidence.contains(*s))
            .count();
        let matched_locations = pattern
            .locations
            .iter()
            .filter(|l| input.locations.contains(*l))
            .count();
        let matched = matched_symptoms + matched_locations;

        if matched >= pattern.min_matches && matched_symptoms > 0 {
            fired.push(PatternMatch {
                pattern_id: pattern.id.clone(),
                disease_id: pattern.disease_id.clone(),
                matched,
                matched_symptoms,
                required: pattern.required_count(),
                boost: pattern.boost,
                urgency_override: pattern.urgency_override,
            });
        }
    }

    fired
}

/// Apply fired-pattern boosts to the normalized posteriors, clamping
/// each result to [0, 1]. Boosts accumulate when several patterns hit
/// the same disease. A fired pattern also admits its disease into the
/// candidate map if Bayes alone excluded it; matched_symptoms > 0
/// guarantees the zero-evidence invariant holds.
pub fn apply_boosts(
    posteriors: &mut BTreeMap<String, f64>,
    fired: &[PatternMatch],
    boost_scale: f64,
) {
    for m in fired {
        let entry = posteriors.entry(m.disease_id.clone()).or_insert(0.0);
        *entry = (*entry + m.effective_boost(boost_scale)).clamp(0.0, 1.0);
    }
}

/// Highest urgency override among fired patterns, if any.
pub fn strongest_override(fired: &[PatternMatch]) -> Option<UrgencyTier> {
    fired.iter().filter_map(|m| m.urgency_override).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::builtin_knowledge;

    fn input(symptoms: &[&str], locations: &[&str]) -> NormalizedInput {
        NormalizedInput {
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            locations: locations.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn appendicitis_classic_fires_on_full_presentation() {
        let kb = builtin_knowledge();
        let fired = match_patterns(
            &kb,
            &input(
                &["abdominal_pain_rlq", "high_fever", "nausea", "migrating_pain"],
                &["rlq", "periumbilical"],
            ),
        );
        assert!(fired.iter().any(|m| m.pattern_id == "appendicitis_classic"));
        assert!(fired.iter().any(|m| m.pattern_id == "appendicitis_migration"));
    }

    #[test]
    fn below_min_matches_does_not_fire() {
        let kb = builtin_knowledge();
        // Two of the classic pattern's requirements; min is three.
        let fired = match_patterns(&kb, &input(&["nausea", "vomiting"], &[]));
        assert!(!fired.iter().any(|m| m.pattern_id == "appendicitis_classic"));
    }

    #[test]
    fn locations_count_toward_min_matches() {
        let kb = builtin_knowledge();
        // Two symptoms + rlq location tag reach the classic threshold.
        let fired = match_patterns(
            &kb,
            &input(&["abdominal_pain_rlq", "high_fever"], &["rlq"]),
        );
        assert!(fired.iter().any(|m| m.pattern_id == "appendicitis_classic"));
    }

    #[test]
    fn location_alone_cannot_fire() {
        let kb = builtin_knowledge();
        // appendicitis_migration requires 2 matches; periumbilical +
        // rlq tags alone reach the count but carry no symptom evidence.
        let fired = match_patterns(&kb, &input(&[], &["periumbilical", "rlq"]));
        assert!(fired.is_empty());
    }

    #[test]
    fn vitals_evidence_counts_for_patterns() {
        let kb = builtin_knowledge();
        let mut i = input(&["abdominal_pain_rlq"], &["rlq"]);
        i.vitals_evidence.insert("high_fever".to_string());
        let fired = match_patterns(&kb, &i);
        assert!(fired.iter().any(|m| m.pattern_id == "appendicitis_classic"));
    }

    #[test]
    fn effective_boost_scales_with_match_fraction() {
        let full = PatternMatch {
            pattern_id: "p".into(),
            disease_id: "d".into(),
            matched: 4,
            matched_symptoms: 4,
            required: 4,
            boost: 0.4,
            urgency_override: None,
        };
        let partial = PatternMatch {
            matched: 2,
            ..full.clone()
        };
        assert!((full.effective_boost(1.0) - 0.4).abs() < 1e-12);
        assert!((partial.effective_boost(1.0) - 0.2).abs() < 1e-12);
        assert!((partial.effective_boost(0.5) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn boosts_accumulate_and_clamp() {
        let mut posteriors = BTreeMap::new();
        posteriors.insert("appendicitis".to_string(), 0.9);
        let m = PatternMatch {
            pattern_id: "p".into(),
            disease_id: "appendicitis".into(),
            matched: 4,
            matched_symptoms: 4,
            required: 4,
            boost: 0.4,
            urgency_override: None,
        };
        apply_boosts(&mut posteriors, &[m.clone(), m], 1.0);
        assert_eq!(posteriors["appendicitis"], 1.0);
    }

    #[test]
    fn boost_admits_missing_disease() {
        let mut posteriors: BTreeMap<String, f64> = BTreeMap::new();
        let m = PatternMatch {
            pattern_id: "p".into(),
            disease_id: "stroke".into(),
            matched: 2,
            matched_symptoms: 2,
            required: 3,
            boost: 0.4,
            urgency_override: Some(UrgencyTier::Critical),
        };
        apply_boosts(&mut posteriors, &[m], 1.0);
        assert!(posteriors["stroke"] > 0.0);
    }

    #[test]
    fn strongest_override_takes_max() {
        let urgent = PatternMatch {
            pattern_id: "a".into(),
            disease_id: "d".into(),
            matched: 2,
            matched_symptoms: 2,
            required: 2,
            boost: 0.3,
            urgency_override: Some(UrgencyTier::Urgent),
        };
        let critical = PatternMatch {
            pattern_id: "b".into(),
            urgency_override: Some(UrgencyTier::Critical),
            ..urgent.clone()
        };
        assert_eq!(
            strongest_override(&[urgent.clone(), critical]),
            Some(UrgencyTier::Critical)
        );
        assert_eq!(strongest_override(&[urgent]), Some(UrgencyTier::Urgent));
        assert_eq!(strongest_override(&[]), None);
    }
}
