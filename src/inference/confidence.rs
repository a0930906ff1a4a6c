//! Confidence and urgency scoring over a ranked differential.
//!
//! Confidence blends how dominant the top candidate is, how well it is
//! separated from the runner-up, and how much evidence backed the run.
//! The composite maps onto four coarse bands rather than being shown
//! raw: a 0.62 and a 0.64 read the same to a clinician.

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceThresholds;
use crate::knowledge::UrgencyTier;

/// Coarse confidence band reported alongside the numeric composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceBand {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl ConfidenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
            Self::Low => "LOW",
            Self::VeryLow => "VERY LOW",
        }
    }
}

/// Confidence assessment for one ranked differential.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    /// Composite score in [0, 1].
    pub score: f64,
    pub band: ConfidenceBand,
    /// Top candidate's probability.
    pub top_probability: f64,
    /// Probability gap to the runner-up (top probability when there is
    /// only one candidate).
    pub separation: f64,
    /// Recognized symptoms that fed the run.
    pub symptom_count: usize,
    /// Whether the thin-evidence penalty applied.
    pub penalized: bool,
}

/// Score a ranked differential. `ranked` must be sorted descending by
/// probability; an empty slice yields a VERY LOW zero assessment.
pub fn assess(
    ranked: &[(String, f64)],
    symptom_count: usize,
    thresholds: &ConfidenceThresholds,
) -> ConfidenceAssessment {
    let Some(&(_, top)) = ranked.first() else {
        return ConfidenceAssessment {
            score: 0.0,
            band: ConfidenceBand::VeryLow,
            top_probability: 0.0,
            separation: 0.0,
            symptom_count,
            penalized: false,
        };
    };

    let separation = match ranked.get(1) {
        Some(&(_, second)) => top - second,
        None => top,
    };

    let gap_credit = (separation / thresholds.separation_saturation).min(1.0);
    let evidence_credit = (symptom_count as f64 / thresholds.evidence_saturation).min(1.0);
    let mut score = thresholds.top_weight * top
        + thresholds.separation_weight * gap_credit
        + thresholds.evidence_weight * evidence_credit;

    let penalized = symptom_count < thresholds.min_symptoms;
    if penalized {
        score *= thresholds.symptom_penalty;
    }
    let score = score.clamp(0.0, 1.0);

    ConfidenceAssessment {
        score,
        band: band_for(score, thresholds),
        top_probability: top,
        separation,
        symptom_count,
        penalized,
    }
}

fn band_for(score: f64, thresholds: &ConfidenceThresholds) -> ConfidenceBand {
    if score >= thresholds.high {
        ConfidenceBand::High
    } else if score >= thresholds.moderate {
        ConfidenceBand::Moderate
    } else if score >= thresholds.low {
        ConfidenceBand::Low
    } else {
        ConfidenceBand::VeryLow
    }
}

/// Effective urgency for a result: the top candidate's tier lifted by
/// the strongest pattern override. Overrides only ever raise urgency.
pub fn effective_urgency(top_tier: UrgencyTier, pattern_override: Option<UrgencyTier>) -> UrgencyTier {
    match pattern_override {
        Some(o) => top_tier.max(o),
        None => top_tier,
    }
}

/// Numeric 0-10 urgency score carried alongside the tier. Critical
/// presentations never drop below 8 and urgent ones never below 6,
/// however thin the evidence.
pub fn urgency_score(tier: UrgencyTier, confidence: f64) -> f64 {
    match tier {
        UrgencyTier::Critical => (9.0 * confidence).max(8.0),
        UrgencyTier::Urgent => (7.0 * confidence).max(6.0),
        UrgencyTier::Routine => 3.0 * confidence,
    }
}
