//! External model file loading.
//!
//! A model file is a JSON document carrying the full disease model and,
//! optionally, extra synonym entries merged over the built-in table.
//! Loading is the engine's one fallible acquisition: read, parse,
//! validate, done. Any structural violation aborts startup.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::builtin::builtin_knowledge;
use super::synonyms::{builtin_synonyms, SynonymTable};
use super::types::{CriticalPattern, Disease, KnowledgeBase, KnowledgeBaseError, Symptom};

/// Supported model file schema version.
pub const MODEL_SCHEMA_VERSION: u32 = 1;

/// On-disk model format.
#[derive(Debug, Deserialize)]
struct ModelFile {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    symptoms: Vec<Symptom>,
    diseases: Vec<Disease>,
    #[serde(default)]
    patterns: Vec<CriticalPattern>,
    /// Extra phrase → canonical id entries, merged over the built-in
    /// synonym table.
    #[serde(default)]
    synonyms: BTreeMap<String, String>,
}

fn default_schema_version() -> u32 {
    MODEL_SCHEMA_VERSION
}

/// A validated model ready to hand to the engine.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub knowledge: Arc<KnowledgeBase>,
    pub synonyms: Arc<SynonymTable>,
}

impl LoadedModel {
    /// The built-in model with the built-in synonym table.
    pub fn builtin() -> Self {
        Self {
            knowledge: builtin_knowledge(),
            synonyms: builtin_synonyms(),
        }
    }

    /// Parse and validate a model from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeBaseError> {
        let file: ModelFile = serde_json::from_str(json)?;

        if file.schema_version != MODEL_SCHEMA_VERSION {
            return Err(KnowledgeBaseError::InvalidPattern {
                pattern_id: "<model>".to_string(),
                reason: format!(
                    "unsupported schema_version {} (expected {})",
                    file.schema_version, MODEL_SCHEMA_VERSION
                ),
            });
        }

        let knowledge = KnowledgeBase::new(file.symptoms, file.diseases, file.patterns)?;

        // Model synonyms must target symptoms the model actually defines.
        for (phrase, canonical) in &file.synonyms {
            if knowledge.symptom(canonical).is_none() {
                return Err(KnowledgeBaseError::UnknownSymptom {
                    symptom_id: canonical.clone(),
                    referenced_by: format!("synonym '{phrase}'"),
                });
            }
        }
        let synonyms = builtin_synonyms().merged_with(file.synonyms.iter())?;

        Ok(Self {
            knowledge: Arc::new(knowledge),
            synonyms: Arc::new(synonyms),
        })
    }

    /// Load, parse, and validate a model file.
    pub fn from_file(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let json = fs::read_to_string(path)?;
        let model = Self::from_json_str(&json)?;

        tracing::info!(
            path = %path.display(),
            diseases = model.knowledge.disease_count(),
            symptoms = model.knowledge.symptom_count(),
            patterns = model.knowledge.patterns().len(),
            synonyms = model.synonyms.len(),
            "Loaded diagnostic model"
        );

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal_model_json() -> String {
        r#"{
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
            "patterns": [],
            "synonyms": {"the shivers": "fever"}
        }"#
        .to_string()
    }

    #[test]
    fn minimal_model_loads() {
        let model = LoadedModel::from_json_str(&minimal_model_json()).unwrap();
        assert_eq!(model.knowledge.disease_count(), 1);
        assert_eq!(model.synonyms.lookup("the shivers"), Some("fever"));
        // Built-in synonyms survive the merge.
        assert_eq!(
            model.synonyms.lookup("shortness of breath"),
            Some("breathlessness")
        );
    }

    #[test]
    fn dangling_synonym_target_rejected() {
        let json = minimal_model_json().replace("\"the shivers\": \"fever\"", "\"x\": \"ghost\"");
        let err = LoadedModel::from_json_str(&json).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::UnknownSymptom { .. }));
    }

    #[test]
    fn dangling_profile_symptom_rejected() {
        let json = minimal_model_json().replace("\"cough\": 0.6", "\"ghost\": 0.6");
        let err = LoadedModel::from_json_str(&json).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::UnknownSymptom { .. }));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = LoadedModel::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Parse(_)));
    }

    #[test]
    fn unsupported_schema_version_rejected() {
        let json = minimal_model_json().replace(
            "\"symptoms\"",
            "\"schema_version\": 99, \"symptoms\"",
        );
        assert!(LoadedModel::from_json_str(&json).is_err());
    }

    #[test]
    fn from_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(minimal_model_json().as_bytes()).unwrap();
        let model = LoadedModel::from_file(file.path()).unwrap();
        assert_eq!(model.knowledge.disease_count(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LoadedModel::from_file(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Io(_)));
    }
}
