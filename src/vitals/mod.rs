//! Optional vital-sign analysis: range checks, early-warning scoring,
//! and bedside risk scores. All of it degrades gracefully when a
//! measurement is missing.

pub mod analysis;
pub mod risk;

pub use analysis::{analyze, evidence, news_score, VitalFinding, VitalStatus, VitalsAnalysis};
pub use risk::{curb65, qsofa, RiskLevel, RiskScore};

use serde::{Deserialize, Serialize};

/// One set of measurements accompanying a query. Every field is
/// optional; checks that need an absent value are skipped, never
/// guessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub temperature_c: Option<f64>,
    pub heart_rate_bpm: Option<f64>,
    pub respiratory_rate_bpm: Option<f64>,
    pub systolic_bp_mmhg: Option<f64>,
    pub diastolic_bp_mmhg: Option<f64>,
    pub spo2_percent: Option<f64>,
    /// Patient age, used to pick the applicable reference ranges.
    pub age_years: Option<u32>,
    /// Glasgow Coma Scale if assessed; feeds qSOFA.
    pub gcs: Option<u8>,
}

impl VitalSigns {
    /// True when no measurement at all was supplied.
    pub fn is_empty(&self) -> bool {
        self.temperature_c.is_none()
            && self.heart_rate_bpm.is_none()
            && self.respiratory_rate_bpm.is_none()
            && self.systolic_bp_mmhg.is_none()
            && self.diastolic_bp_mmhg.is_none()
            && self.spo2_percent.is_none()
            && self.gcs.is_none()
    }
}
