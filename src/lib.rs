//! Differential diagnosis engine.
//!
//! Takes a free-text symptom description (and optionally a set of
//! vital signs), normalizes it against a clinical synonym table, runs
//! naive-Bayes inference over a validated disease model, boosts
//! hand-authored critical presentations, and returns a ranked
//! differential with a calibrated confidence band and an urgency tier.
//!
//! ```no_run
//! use differo::DiagnosticEngine;
//!
//! let engine = DiagnosticEngine::new();
//! let result = engine.diagnose("fever, cough and shortness of breath", None);
//! for candidate in &result.candidates {
//!     println!("{}: {:.1}%", candidate.name, candidate.probability * 100.0);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod inference;
pub mod knowledge;
pub mod normalize;
pub mod result;
pub mod vitals;

pub use config::{Capabilities, ConfidenceThresholds, EngineConfig, ENGINE_VERSION};
pub use engine::DiagnosticEngine;
pub use inference::{ConfidenceAssessment, ConfidenceBand};
pub use knowledge::{KnowledgeBase, KnowledgeBaseError, LoadedModel, UrgencyTier};
pub use result::{
    Computed, DiagnosisCandidate, DiagnosticResult, DiagnosticStatus, SymptomScore,
};
pub use vitals::{RiskLevel, RiskScore, VitalSigns, VitalsAnalysis};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding the engine. Respects
/// `RUST_LOG`, falling back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .init();
}
