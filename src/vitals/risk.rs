//! Bedside risk scores computed from vitals and normalized evidence.
//!
//! Only the two scores the engine surfaces automatically live here:
//! qSOFA when sepsis enters the differential, CURB-65 when pneumonia
//! does. Each reports which inputs were missing instead of guessing.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::VitalSigns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// One computed score, its interpretation, and the inputs that were
/// unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub risk_level: RiskLevel,
    pub interpretation: String,
    pub missing_inputs: Vec<String>,
}

/// qSOFA: respiratory rate >= 22, systolic BP <= 100, GCS < 15.
/// A score of 2 or more means high risk of sepsis-related mortality.
pub fn qsofa(vitals: &VitalSigns, altered_mentation: bool) -> RiskScore {
    let mut score = 0;
    let mut missing = Vec::new();

    match vitals.respiratory_rate_bpm {
        Some(rr) if rr >= 22.0 => score += 1,
        Some(_) => {}
        None => missing.push("respiratory_rate".to_string()),
    }
    match vitals.systolic_bp_mmhg {
        Some(sbp) if sbp <= 100.0 => score += 1,
        Some(_) => {}
        None => missing.push("systolic_bp".to_string()),
    }
    // Reported confusion counts even without a formal GCS.
    match vitals.gcs {
        Some(g) if g < 15 => score += 1,
        Some(_) => {}
        None if altered_mentation => score += 1,
        None => missing.push("gcs".to_string()),
    }

    let (risk_level, interpretation) = if score >= 2 {
        (
            RiskLevel::High,
            "High risk for sepsis-related poor outcomes; sepsis workup indicated".to_string(),
        )
    } else if score == 1 {
        (
            RiskLevel::Moderate,
            "Moderate risk; consider sepsis evaluation".to_string(),
        )
    } else {
        (
            RiskLevel::Low,
            "Low risk for sepsis-related adverse outcomes".to_string(),
        )
    };

    info!(score, level = risk_level.as_str(), "qSOFA calculated");

    RiskScore {
        name: "qSOFA".to_string(),
        score,
        max_score: 3,
        risk_level,
        interpretation,
        missing_inputs: missing,
    }
}

/// CURB-65 pneumonia severity, without the urea criterion (no labs in
/// scope), so the maximum here is 4 of the nominal 5.
pub fn curb65(vitals: &VitalSigns, confusion: bool) -> RiskScore {
    let mut score = 0;
    let mut missing = vec!["urea".to_string()];

    if confusion {
        score += 1;
    }
    match vitals.respiratory_rate_bpm {
        Some(rr) if rr >= 30.0 => score += 1,
        Some(_) => {}
        None => missing.push("respiratory_rate".to_string()),
    }
    match (vitals.systolic_bp_mmhg, vitals.diastolic_bp_mmhg) {
        (Some(sbp), Some(dbp)) if sbp < 90.0 || dbp <= 60.0 => score += 1,
        (Some(sbp), _) if sbp < 90.0 => score += 1,
        (Some(_), _) => {}
        (None, _) => missing.push("blood_pressure".to_string()),
    }
    match vitals.age_years {
        Some(a) if a >= 65 => score += 1,
        Some(_) => {}
        None => missing.push("age".to_string()),
    }

    let (risk_level, interpretation) = if score <= 1 {
        (
            RiskLevel::Low,
            "Low severity; outpatient treatment usually suitable".to_string(),
        )
    } else if score == 2 {
        (
            RiskLevel::Moderate,
            "Moderate severity; consider hospitalization".to_string(),
        )
    } else {
        (
            RiskLevel::High,
            format!("High severity (score {score}); hospitalize, consider ICU"),
        )
    };

    info!(score, level = risk_level.as_str(), "CURB-65 calculated");

    RiskScore {
        name: "CURB-65".to_string(),
        score,
        max_score: 5,
        risk_level,
        interpretation,
        missing_inputs: missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qsofa_two_of_three_is_high_risk() {
        let vitals = VitalSigns {
            respiratory_rate_bpm: Some(24.0),
            systolic_bp_mmhg: Some(95.0),
            gcs: Some(15),
            ..Default::default()
        };
        let r = qsofa(&vitals, false);
        assert_eq!(r.score, 2);
        assert_eq!(r.risk_level, RiskLevel::High);
        assert!(r.missing_inputs.is_empty());
    }

    #[test]
    fn qsofa_counts_reported_confusion_without_gcs() {
        let vitals = VitalSigns {
            respiratory_rate_bpm: Some(18.0),
            systolic_bp_mmhg: Some(120.0),
            ..Default::default()
        };
        let r = qsofa(&vitals, true);
        assert_eq!(r.score, 1);
        assert!(!r.missing_inputs.contains(&"gcs".to_string()));
    }

    #[test]
    fn qsofa_reports_missing_inputs() {
        let r = qsofa(&VitalSigns::default(), false);
        assert_eq!(r.score, 0);
        assert_eq!(r.risk_level, RiskLevel::Low);
        assert_eq!(r.missing_inputs.len(), 3);
    }

    #[test]
    fn curb65_elderly_hypotensive_tachypneic_is_high() {
        let vitals = VitalSigns {
            respiratory_rate_bpm: Some(32.0),
            systolic_bp_mmhg: Some(85.0),
            diastolic_bp_mmhg: Some(55.0),
            age_years: Some(78),
            ..Default::default()
        };
        let r = curb65(&vitals, true);
        assert_eq!(r.score, 4);
        assert_eq!(r.risk_level, RiskLevel::High);
        assert!(r.missing_inputs.contains(&"urea".to_string()));
    }

    #[test]
    fn curb65_young_stable_is_low() {
        let vitals = VitalSigns {
            respiratory_rate_bpm: Some(18.0),
            systolic_bp_mmhg: Some(125.0),
            diastolic_bp_mmhg: Some(80.0),
            age_years: Some(30),
            ..Default::default()
        };
        let r = curb65(&vitals, false);
        assert_eq!(r.score, 0);
        assert_eq!(r.risk_level, RiskLevel::Low);
    }

    #[test]
    fn curb65_low_diastolic_alone_scores_bp_point() {
        let vitals = VitalSigns {
            systolic_bp_mmhg: Some(110.0),
            diastolic_bp_mmhg: Some(58.0),
            age_years: Some(40),
            ..Default::default()
        };
        assert_eq!(curb65(&vitals, false).score, 1);
    }
}
