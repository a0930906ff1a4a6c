//! Static disease model: symptoms, diseases, critical patterns, and the
//! synonym/location tables. Everything here is loaded once at startup,
//! validated fail-fast, and shared read-only across concurrent
//! diagnosis calls.

pub mod builtin;
pub mod model;
pub mod synonyms;
pub mod types;

pub use builtin::builtin_knowledge;
pub use model::{LoadedModel, MODEL_SCHEMA_VERSION};
pub use synonyms::{builtin_locations, builtin_synonyms, SynonymTable};
pub use types::{CriticalPattern, Disease, KnowledgeBase, KnowledgeBaseError, Symptom, UrgencyTier};
