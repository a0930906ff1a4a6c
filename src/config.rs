//! Engine tuning knobs.
//!
//! All thresholds are plain data so a deployment can tighten or relax
//! the bands without touching inference code. Defaults reproduce the
//! calibrated behavior the scenario tests pin down.

use serde::{Deserialize, Serialize};

/// Engine version reported in every result payload.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `RUST_LOG`-style filter when the environment sets none.
pub const DEFAULT_LOG_FILTER: &str = "differo=info";

/// Cut points between confidence bands, plus the thin-evidence
/// penalty. Bands are half-open from the top: a composite at or
/// above `high` reads HIGH, and so on down to VERY LOW.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
    /// Inputs with fewer recognized symptoms than this take the
    /// penalty multiplier before banding.
    pub min_symptoms: usize,
    pub symptom_penalty: f64,
    /// Blend weights for the composite: top probability, separation
    /// from the runner-up, evidence volume.
    pub top_weight: f64,
    pub separation_weight: f64,
    pub evidence_weight: f64,
    /// Separation at or above this earns full credit.
    pub separation_saturation: f64,
    /// Evidence credit saturates at this many recognized symptoms.
    pub evidence_saturation: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.75,
            moderate: 0.55,
            low: 0.35,
            min_symptoms: 3,
            symptom_penalty: 0.75,
            top_weight: 0.4,
            separation_weight: 0.3,
            evidence_weight: 0.3,
            separation_saturation: 0.3,
            evidence_saturation: 5.0,
        }
    }
}

impl ConfidenceThresholds {
    /// Bands must stay strictly ordered or two bands would overlap.
    pub fn is_monotonic(&self) -> bool {
        self.high > self.moderate && self.moderate > self.low && self.low > 0.0
    }
}

/// Optional analysis stages. Both default on; a caller embedding the
/// engine for plain text triage can switch the vitals stages off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Capabilities {
    pub vitals_analysis: bool,
    pub risk_scoring: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            vitals_analysis: true,
            risk_scoring: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub confidence: ConfidenceThresholds,
    /// Global multiplier on pattern boosts. 1.0 applies authored
    /// magnitudes as-is; 0.0 disables the boosting stage.
    pub boost_scale: f64,
    /// Tokens scanned backwards from a symptom phrase for a negation cue.
    pub negation_window: usize,
    /// Maximum candidates retained in a result.
    pub max_candidates: usize,
    pub capabilities: Capabilities,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence: ConfidenceThresholds::default(),
            boost_scale: 1.0,
            negation_window: 3,
            max_candidates: 10,
            capabilities: Capabilities::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_monotonic() {
        assert!(ConfidenceThresholds::default().is_monotonic());
    }

    #[test]
    fn inverted_thresholds_detected() {
        let t = ConfidenceThresholds {
            high: 0.4,
            moderate: 0.55,
            ..Default::default()
        };
        assert!(!t.is_monotonic());
    }

    #[test]
    fn partial_config_deserializes_over_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"boost_scale": 0.5}"#).unwrap();
        assert_eq!(cfg.boost_scale, 0.5);
        assert_eq!(cfg.max_candidates, 10);
        assert!(cfg.capabilities.vitals_analysis);
    }
}
