//! Bayesian stage: posterior probability per candidate disease.
//!
//! For each disease the unnormalized score is
//! `prior × ∏ P(s|d)` over input symptoms in the disease profile,
//! `× ∏ (1 − P(s|d))` over profile symptoms absent from the input.
//! Input symptoms outside a disease's profile neither help nor hurt it:
//! penalizing unknown evidence would unfairly punish diseases with
//! incomplete profiles.
//!
//! Diseases with zero matching symptoms never enter the candidate map.
//! That is a correctness invariant, not an optimization: a disease with
//! no supporting evidence must not receive probability mass.

use std::collections::{BTreeMap, BTreeSet};

use crate::knowledge::KnowledgeBase;

/// Probabilities below this are treated as zero to keep floating-point
/// underflow artifacts out of the ranking.
pub const PROBABILITY_FLOOR: f64 = 1e-6;

/// Compute normalized posteriors over all diseases with at least one
/// matching symptom. Returned values are in [0, 1] and sum to 1 unless
/// the map is empty.
pub fn compute_posteriors(
    knowledge: &KnowledgeBase,
    evidence: &BTreeSet<String>,
) -> BTreeMap<String, f64> {
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();

    for disease in knowledge.diseases() {
        let mut score = disease.prior;
        let mut matches = 0usize;

        for (symptom_id, likelihood) in &disease.likelihoods {
            if evidence.contains(symptom_id) {
                score *= likelihood;
                matches += 1;
            } else {
                score *= 1.0 - likelihood;
            }
        }

        if matches == 0 {
            continue;
        }
        if score > 0.0 {
            scores.insert(disease.id.clone(), score);
        }
    }

    normalize(&mut scores);
    scores
}

/// Sum-normalize to [0, 1] and drop floored values.
fn normalize(scores: &mut BTreeMap<String, f64>) {
    let total: f64 = scores.values().sum();
    if total <= 0.0 {
        scores.clear();
        return;
    }
    for value in scores.values_mut() {
        *value /= total;
    }
    scores.retain(|_, value| *value >= PROBABILITY_FLOOR);
}

/// Symptoms from the input that support a given disease, with their
/// likelihoods, strongest first. Used for candidate explanations.
pub fn supporting_symptoms(
    knowledge: &KnowledgeBase,
    disease_id: &str,
    evidence: &BTreeSet<String>,
) -> Vec<(String, f64)> {
    let Some(disease) = knowledge.disease(disease_id) else {
        return Vec::new();
    };

    let mut supporting: Vec<(String, f64)> = disease
        .likelihoods
        .iter()
        .filter(|(symptom_id, likelihood)| evidence.contains(*symptom_id) && **likelihood > 0.0)
        .map(|(symptom_id, likelihood)| (symptom_id.clone(), *likelihood))
        .collect();

    // Strongest first; tie-break on symptom id for determinism.
    supporting.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    supporting
}
