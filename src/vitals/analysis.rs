//! Vital-sign assessment against age-adjusted reference ranges, plus
//! NEWS early-warning scoring and evidence injection for inference.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::VitalSigns;

/// Status of a single measurement against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalStatus {
    Normal,
    Borderline,
    Abnormal,
    Critical,
}

impl VitalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Borderline => "borderline",
            Self::Abnormal => "abnormal",
            Self::Critical => "critical",
        }
    }
}

/// Assessment of one supplied measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalFinding {
    pub vital: String,
    pub value: f64,
    pub status: VitalStatus,
}

/// Full vitals assessment attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsAnalysis {
    pub findings: Vec<VitalFinding>,
    /// National Early Warning Score over the supplied measurements.
    pub news_score: u32,
    /// Human-readable red flags, worst first.
    pub red_flags: Vec<String>,
    /// Worst status across all findings.
    pub overall: VitalStatus,
}

impl VitalsAnalysis {
    /// NEWS >= 7 calls for urgent review regardless of the differential.
    pub fn requires_urgent_review(&self) -> bool {
        self.news_score >= 7 || self.overall == VitalStatus::Critical
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgeGroup {
    Infant,
    Child,
    Adult,
    Elderly,
}

fn age_group(age_years: Option<u32>) -> AgeGroup {
    match age_years {
        Some(a) if a < 1 => AgeGroup::Infant,
        Some(a) if a < 12 => AgeGroup::Child,
        Some(a) if a >= 65 => AgeGroup::Elderly,
        _ => AgeGroup::Adult,
    }
}

/// Reference band for one vital in one age group. `None` bounds mean
/// the direction is unconstrained (SpO2 has no upper limit).
#[derive(Debug, Clone, Copy)]
struct Range {
    low_critical: Option<f64>,
    low: f64,
    high: f64,
    high_critical: Option<f64>,
}

impl Range {
    fn assess(&self, value: f64) -> VitalStatus {
        if self.low_critical.is_some_and(|c| value < c)
            || self.high_critical.is_some_and(|c| value > c)
        {
            return VitalStatus::Critical;
        }
        // No critical bound means that direction is unconstrained
        // (SpO2 of 100 is perfect, not high).
        let upper_bounded = self.high_critical.is_some();
        if value < self.low || (upper_bounded && value > self.high) {
            return VitalStatus::Abnormal;
        }
        // Within 10% of a bounded threshold reads borderline.
        let span = self.high - self.low;
        if value < self.low + span * 0.1 || (upper_bounded && value > self.high - span * 0.1) {
            return VitalStatus::Borderline;
        }
        VitalStatus::Normal
    }
}

fn temperature_range(group: AgeGroup) -> Range {
    match group {
        AgeGroup::Infant => Range { low_critical: Some(36.0), low: 36.5, high: 37.5, high_critical: Some(38.5) },
        AgeGroup::Child => Range { low_critical: Some(35.5), low: 36.5, high: 37.5, high_critical: Some(39.5) },
        AgeGroup::Adult | AgeGroup::Elderly => {
            Range { low_critical: Some(35.0), low: 36.1, high: 37.8, high_critical: Some(40.0) }
        }
    }
}

fn heart_rate_range(group: AgeGroup) -> Range {
    match group {
        AgeGroup::Infant => Range { low_critical: Some(80.0), low: 100.0, high: 160.0, high_critical: Some(200.0) },
        AgeGroup::Child => Range { low_critical: Some(50.0), low: 70.0, high: 120.0, high_critical: Some(160.0) },
        AgeGroup::Adult => Range { low_critical: Some(40.0), low: 60.0, high: 100.0, high_critical: Some(140.0) },
        AgeGroup::Elderly => Range { low_critical: Some(40.0), low: 50.0, high: 100.0, high_critical: Some(120.0) },
    }
}

fn respiratory_rate_range(group: AgeGroup) -> Range {
    match group {
        AgeGroup::Infant => Range { low_critical: Some(20.0), low: 30.0, high: 50.0, high_critical: Some(60.0) },
        AgeGroup::Child => Range { low_critical: Some(12.0), low: 15.0, high: 30.0, high_critical: Some(40.0) },
        AgeGroup::Adult => Range { low_critical: Some(8.0), low: 12.0, high: 20.0, high_critical: Some(30.0) },
        AgeGroup::Elderly => Range { low_critical: Some(8.0), low: 12.0, high: 20.0, high_critical: Some(28.0) },
    }
}

fn systolic_range(group: AgeGroup) -> Range {
    match group {
        AgeGroup::Infant | AgeGroup::Child => {
            Range { low_critical: Some(60.0), low: 80.0, high: 120.0, high_critical: Some(140.0) }
        }
        AgeGroup::Adult => Range { low_critical: Some(70.0), low: 90.0, high: 140.0, high_critical: Some(180.0) },
        AgeGroup::Elderly => Range { low_critical: Some(80.0), low: 100.0, high: 150.0, high_critical: Some(180.0) },
    }
}

fn spo2_range() -> Range {
    Range { low_critical: Some(85.0), low: 92.0, high: 100.0, high_critical: None }
}

/// Assess every supplied measurement, score NEWS, and collect red flags.
pub fn analyze(vitals: &VitalSigns) -> VitalsAnalysis {
    let group = age_group(vitals.age_years);
    let mut findings = Vec::new();

    let mut check = |name: &str, value: Option<f64>, range: Range| {
        if let Some(v) = value {
            findings.push(VitalFinding {
                vital: name.to_string(),
                value: v,
                status: range.assess(v),
            });
        }
    };

    check("temperature_c", vitals.temperature_c, temperature_range(group));
    check("heart_rate_bpm", vitals.heart_rate_bpm, heart_rate_range(group));
    check("respiratory_rate_bpm", vitals.respiratory_rate_bpm, respiratory_rate_range(group));
    check("systolic_bp_mmhg", vitals.systolic_bp_mmhg, systolic_range(group));
    check("spo2_percent", vitals.spo2_percent, spo2_range());

    let overall = findings
        .iter()
        .map(|f| f.status)
        .max()
        .unwrap_or(VitalStatus::Normal);

    let news = news_score(vitals);
    let red_flags = detect_red_flags(vitals, news);

    if !red_flags.is_empty() {
        warn!(news, flags = red_flags.len(), "vital sign red flags detected");
    }

    VitalsAnalysis {
        findings,
        news_score: news,
        red_flags,
        overall,
    }
}

/// National Early Warning Score over whichever measurements are
/// present. Standard NEWS bands; consciousness scores 3 for any GCS
/// below 15.
pub fn news_score(vitals: &VitalSigns) -> u32 {
    let mut score = 0;

    if let Some(rr) = vitals.respiratory_rate_bpm {
        score += if rr <= 8.0 {
            3
        } else if rr <= 11.0 {
            1
        } else if rr <= 20.0 {
            0
        } else if rr <= 24.0 {
            2
        } else {
            3
        };
    }

    if let Some(spo2) = vitals.spo2_percent {
        score += if spo2 <= 91.0 {
            3
        } else if spo2 <= 93.0 {
            2
        } else if spo2 <= 95.0 {
            1
        } else {
            0
        };
    }

    if let Some(sbp) = vitals.systolic_bp_mmhg {
        score += if sbp <= 90.0 {
            3
        } else if sbp <= 100.0 {
            2
        } else if sbp <= 110.0 {
            1
        } else if sbp <= 219.0 {
            0
        } else {
            3
        };
    }

    if let Some(hr) = vitals.heart_rate_bpm {
        score += if hr <= 40.0 {
            3
        } else if hr <= 50.0 {
            1
        } else if hr <= 90.0 {
            0
        } else if hr <= 110.0 {
            1
        } else if hr <= 130.0 {
            2
        } else {
            3
        };
    }

    if let Some(t) = vitals.temperature_c {
        score += if t <= 35.0 {
            3
        } else if t <= 36.0 {
            1
        } else if t <= 38.0 {
            0
        } else if t <= 39.0 {
            1
        } else {
            2
        };
    }

    if vitals.gcs.is_some_and(|g| g < 15) {
        score += 3;
    }

    score
}

fn detect_red_flags(vitals: &VitalSigns, news: u32) -> Vec<String> {
    let mut flags = Vec::new();

    if let Some(t) = vitals.temperature_c {
        if t >= 40.0 {
            flags.push(format!("Critical hyperthermia: {t:.1} C"));
        } else if t <= 35.0 {
            flags.push(format!("Critical hypothermia: {t:.1} C"));
        }
    }
    if vitals.heart_rate_bpm.is_some_and(|hr| hr <= 40.0) {
        flags.push("Severe bradycardia, risk of cardiac arrest".to_string());
    }
    if vitals.systolic_bp_mmhg.is_some_and(|sbp| sbp < 90.0) {
        flags.push("Hypotension, assess for shock".to_string());
    }
    if vitals.spo2_percent.is_some_and(|s| s < 92.0) {
        flags.push("Hypoxia, supplemental oxygen indicated".to_string());
    }
    if vitals.gcs.is_some_and(|g| g <= 8) {
        flags.push("GCS 8 or below, airway protection required".to_string());
    }
    if news >= 7 {
        flags.push(format!("NEWS {news}, urgent clinical review required"));
    }

    flags
}

/// Translate abnormal measurements into canonical symptom ids so the
/// inference stage can weigh them like reported symptoms.
pub fn evidence(vitals: &VitalSigns) -> BTreeSet<String> {
    let mut out = BTreeSet::new();

    if let Some(t) = vitals.temperature_c {
        if t >= 38.0 {
            out.insert("high_fever".to_string());
        } else if t >= 37.5 {
            out.insert("mild_fever".to_string());
        }
    }
    if let Some(hr) = vitals.heart_rate_bpm {
        if hr > 100.0 {
            out.insert("tachycardia".to_string());
        } else if hr < 50.0 {
            out.insert("bradycardia".to_string());
        }
    }
    if vitals.respiratory_rate_bpm.is_some_and(|rr| rr > 20.0) {
        out.insert("tachypnea".to_string());
    }
    if vitals.systolic_bp_mmhg.is_some_and(|sbp| sbp < 90.0) {
        out.insert("hypotension".to_string());
    }
    if vitals.spo2_percent.is_some_and(|s| s < 92.0) {
        out.insert("hypoxia".to_string());
    }
    if vitals.gcs.is_some_and(|g| g < 15) {
        out.insert("altered_mental_status".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ======== RANGE ASSESSMENT ========

    #[test]
    fn adult_normal_vitals_read_normal() {
        let vitals = VitalSigns {
            temperature_c: Some(36.8),
            heart_rate_bpm: Some(72.0),
            respiratory_rate_bpm: Some(16.0),
            systolic_bp_mmhg: Some(118.0),
            spo2_percent: Some(98.0),
            ..Default::default()
        };
        let a = analyze(&vitals);
        assert_eq!(a.overall, VitalStatus::Normal);
        assert_eq!(a.news_score, 0);
        assert!(a.red_flags.is_empty());
    }

    #[test]
    fn missing_measurements_are_skipped() {
        let a = analyze(&VitalSigns::default());
        assert!(a.findings.is_empty());
        assert_eq!(a.overall, VitalStatus::Normal);
    }

    #[test]
    fn child_heart_rate_uses_pediatric_range() {
        // 115 bpm is abnormal for an adult but normal for an eight-year-old.
        let child = VitalSigns {
            heart_rate_bpm: Some(115.0),
            age_years: Some(8),
            ..Default::default()
        };
        let adult = VitalSigns {
            heart_rate_bpm: Some(115.0),
            age_years: Some(40),
            ..Default::default()
        };
        assert_eq!(analyze(&child).overall, VitalStatus::Normal);
        assert_eq!(analyze(&adult).overall, VitalStatus::Abnormal);
    }

    #[test]
    fn critical_temperature_flags_and_scores() {
        let vitals = VitalSigns {
            temperature_c: Some(40.5),
            ..Default::default()
        };
        let a = analyze(&vitals);
        assert_eq!(a.overall, VitalStatus::Critical);
        assert!(a.red_flags.iter().any(|f| f.contains("hyperthermia")));
    }

    // ======== NEWS ========

    #[test]
    fn septic_presentation_scores_high_news() {
        let vitals = VitalSigns {
            temperature_c: Some(39.5),
            heart_rate_bpm: Some(125.0),
            respiratory_rate_bpm: Some(26.0),
            systolic_bp_mmhg: Some(88.0),
            spo2_percent: Some(90.0),
            ..Default::default()
        };
        // 2 (temp) + 2 (hr) + 3 (rr) + 3 (sbp) + 3 (spo2) = 13
        let a = analyze(&vitals);
        assert_eq!(a.news_score, 13);
        assert!(a.requires_urgent_review());
    }

    #[test]
    fn reduced_consciousness_adds_three() {
        let vitals = VitalSigns {
            gcs: Some(13),
            ..Default::default()
        };
        assert_eq!(news_score(&vitals), 3);
    }

    // ======== EVIDENCE INJECTION ========

    #[test]
    fn fever_bands_map_to_distinct_symptoms() {
        let high = VitalSigns { temperature_c: Some(38.6), ..Default::default() };
        let mild = VitalSigns { temperature_c: Some(37.7), ..Default::default() };
        let none = VitalSigns { temperature_c: Some(36.9), ..Default::default() };
        assert!(evidence(&high).contains("high_fever"));
        assert!(evidence(&mild).contains("mild_fever"));
        assert!(evidence(&none).is_empty());
    }

    #[test]
    fn shock_vitals_inject_full_evidence_set() {
        let vitals = VitalSigns {
            heart_rate_bpm: Some(128.0),
            respiratory_rate_bpm: Some(24.0),
            systolic_bp_mmhg: Some(82.0),
            spo2_percent: Some(89.0),
            ..Default::default()
        };
        let ev = evidence(&vitals);
        for id in ["tachycardia", "tachypnea", "hypotension", "hypoxia"] {
            assert!(ev.contains(id), "missing {id}");
        }
    }

    #[test]
    fn normal_vitals_inject_nothing() {
        let vitals = VitalSigns {
            temperature_c: Some(36.8),
            heart_rate_bpm: Some(70.0),
            respiratory_rate_bpm: Some(14.0),
            systolic_bp_mmhg: Some(120.0),
            spo2_percent: Some(99.0),
            ..Default::default()
        };
        assert!(evidence(&vitals).is_empty());
    }
}
