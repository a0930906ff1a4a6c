//! Built-in disease model.
//!
//! Priors, likelihoods, and pattern boosts are tuned against the
//! scenario suite in `engine.rs`; they are starting points, not
//! clinical ground truth. An external model file can replace this
//! model entirely (see `model.rs`).

use std::sync::{Arc, LazyLock};

use super::types::{CriticalPattern, Disease, KnowledgeBase, Symptom, UrgencyTier};

/// The built-in knowledge base, validated once and shared process-wide.
pub fn builtin_knowledge() -> Arc<KnowledgeBase> {
    static KB: LazyLock<Arc<KnowledgeBase>> = LazyLock::new(|| {
        Arc::new(build().expect("built-in disease model failed validation"))
    });
    Arc::clone(&KB)
}

fn sym(id: &str, label: &str) -> Symptom {
    Symptom {
        id: id.to_string(),
        label: label.to_string(),
        location: None,
    }
}

fn sym_at(id: &str, label: &str, location: &str) -> Symptom {
    Symptom {
        id: id.to_string(),
        label: label.to_string(),
        location: Some(location.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn disease(
    id: &str,
    name: &str,
    prior: f64,
    urgency: UrgencyTier,
    likelihoods: &[(&str, f64)],
    recommendations: &[&str],
) -> Disease {
    Disease {
        id: id.to_string(),
        name: name.to_string(),
        prior,
        likelihoods: likelihoods
            .iter()
            .map(|(s, p)| (s.to_string(), *p))
            .collect(),
        urgency,
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
    }
}

fn pattern(
    id: &str,
    disease_id: &str,
    symptoms: &[&str],
    locations: &[&str],
    min_matches: usize,
    boost: f64,
    urgency_override: Option<UrgencyTier>,
) -> CriticalPattern {
    CriticalPattern {
        id: id.to_string(),
        disease_id: disease_id.to_string(),
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        locations: locations.iter().map(|l| l.to_string()).collect(),
        min_matches,
        boost,
        urgency_override,
    }
}

fn symptoms() -> Vec<Symptom> {
    vec![
        // Cardiovascular
        sym("chest_pain", "Chest pain"),
        sym("chest_pain_radiating", "Chest pain radiating to arm/jaw"),
        sym("sweating", "Sweating / diaphoresis"),
        sym("palpitations", "Palpitations"),
        sym("tachycardia", "Elevated heart rate"),
        sym("bradycardia", "Low heart rate"),
        sym("hypotension", "Low blood pressure"),
        // Respiratory
        sym("breathlessness", "Shortness of breath"),
        sym("cough", "Cough"),
        sym("phlegm", "Sputum production"),
        sym("blood_in_sputum", "Blood in sputum"),
        sym("wheezing", "Wheezing"),
        sym("tachypnea", "Rapid breathing"),
        sym("hypoxia", "Low oxygen saturation"),
        // Neurological
        sym("headache", "Headache"),
        sym("severe_headache", "Severe / thunderclap headache"),
        sym("stiff_neck", "Neck stiffness"),
        sym("photophobia", "Light sensitivity"),
        sym("confusion", "Confusion"),
        sym("altered_mental_status", "Altered mental status"),
        sym("facial_droop", "Facial droop"),
        sym("sudden_weakness_one_side", "One-sided weakness"),
        sym("slurred_speech", "Slurred speech"),
        sym("dizziness", "Dizziness"),
        sym("vision_changes", "Vision changes"),
        sym("numbness_tingling", "Numbness or tingling"),
        // Abdominal
        sym("abdominal_pain", "Abdominal pain"),
        sym_at("abdominal_pain_rlq", "Right lower quadrant pain", "rlq"),
        sym_at("abdominal_pain_ruq", "Right upper quadrant pain", "ruq"),
        sym_at("abdominal_pain_llq", "Left lower quadrant pain", "llq"),
        sym_at("epigastric_pain", "Epigastric pain", "epigastric"),
        sym("rebound_tenderness", "Rebound tenderness"),
        sym("guarding", "Abdominal guarding"),
        sym("migrating_pain", "Migrating pain"),
        sym("back_pain", "Back pain"),
        sym("nausea", "Nausea"),
        sym("vomiting", "Vomiting"),
        sym("loss_of_appetite", "Loss of appetite"),
        sym("diarrhea", "Diarrhea"),
        sym("constipation", "Constipation"),
        sym("bloody_stool", "Blood in stool"),
        sym("abdominal_distention", "Abdominal distention"),
        // Systemic
        sym("high_fever", "Fever"),
        sym("mild_fever", "Low-grade fever"),
        sym("chills", "Chills"),
        sym("fatigue", "Fatigue"),
        sym("weight_loss", "Unintentional weight loss"),
        sym("joint_pain", "Joint or muscle pain"),
        // Limbs and skin
        sym("leg_swelling", "Leg swelling"),
        sym_at("calf_pain", "Calf pain", "calf"),
        sym("skin_rash", "Skin rash"),
        sym("itching", "Itching"),
        sym("erythema", "Skin redness"),
        sym("skin_warmth", "Skin warm to touch"),
        sym("urticaria", "Hives"),
        // Urinary / metabolic
        sym_at("flank_pain", "Flank pain", "flank"),
        sym("dysuria", "Painful urination"),
        sym("urinary_frequency", "Urinary frequency"),
        sym("polyuria", "Excessive urination"),
        sym("excessive_thirst", "Excessive thirst"),
        // Upper GI / ENT
        sym("heartburn", "Heartburn"),
        sym("sore_throat", "Sore throat"),
        sym("runny_nose", "Runny nose"),
    ]
}

fn diseases() -> Vec<Disease> {
    vec![
        disease(
            "heart_attack",
            "Heart attack",
            0.04,
            UrgencyTier::Critical,
            &[
                ("chest_pain", 0.90),
                ("chest_pain_radiating", 0.70),
                ("sweating", 0.70),
                ("breathlessness", 0.60),
                ("nausea", 0.40),
                ("dizziness", 0.30),
            ],
            &[
                "Obtain ECG and serial troponin without delay",
                "Continuous cardiac monitoring; prepare for reperfusion therapy",
            ],
        ),
        disease(
            "stroke",
            "Stroke",
            0.04,
            UrgencyTier::Critical,
            &[
                ("facial_droop", 0.80),
                ("sudden_weakness_one_side", 0.85),
                ("slurred_speech", 0.80),
                ("confusion", 0.50),
                ("vision_changes", 0.40),
                ("numbness_tingling", 0.45),
            ],
            &[
                "Non-contrast CT head and neurological assessment; onset time is critical",
                "Activate stroke pathway for thrombolysis window evaluation",
            ],
        ),
        disease(
            "meningitis",
            "Meningitis",
            0.02,
            UrgencyTier::Critical,
            &[
                ("severe_headache", 0.85),
                ("high_fever", 0.80),
                ("stiff_neck", 0.90),
                ("photophobia", 0.70),
                ("confusion", 0.50),
                ("vomiting", 0.45),
                ("skin_rash", 0.30),
            ],
            &[
                "Blood cultures and lumbar puncture; do not delay empiric antibiotics",
                "CT head before lumbar puncture if focal deficits or reduced consciousness",
            ],
        ),
        disease(
            "sepsis",
            "Sepsis",
            0.03,
            UrgencyTier::Critical,
            &[
                ("high_fever", 0.80),
                ("tachycardia", 0.70),
                ("tachypnea", 0.60),
                ("hypotension", 0.60),
                ("confusion", 0.50),
                ("chills", 0.60),
            ],
            &[
                "Blood cultures x2 and lactate, then broad-spectrum antibiotics within the hour",
                "Begin fluid resuscitation and monitor urine output",
            ],
        ),
        disease(
            "pulmonary_embolism",
            "Pulmonary embolism",
            0.02,
            UrgencyTier::Critical,
            &[
                ("breathlessness", 0.85),
                ("chest_pain", 0.60),
                ("tachycardia", 0.60),
                ("blood_in_sputum", 0.30),
                ("calf_pain", 0.35),
                ("hypoxia", 0.50),
            ],
            &[
                "CT pulmonary angiography and D-dimer; assess Wells criteria",
                "Evaluate for anticoagulation; thrombolysis if hemodynamically unstable",
            ],
        ),
        disease(
            "anaphylaxis",
            "Anaphylaxis",
            0.01,
            UrgencyTier::Critical,
            &[
                ("urticaria", 0.80),
                ("breathlessness", 0.70),
                ("wheezing", 0.60),
                ("hypotension", 0.50),
                ("itching", 0.50),
                ("dizziness", 0.40),
            ],
            &[
                "Intramuscular epinephrine first; airway assessment and IV access",
                "Observe for biphasic reaction after stabilization",
            ],
        ),
        disease(
            "aortic_dissection",
            "Aortic dissection",
            0.01,
            UrgencyTier::Critical,
            &[
                ("chest_pain", 0.90),
                ("back_pain", 0.70),
                ("sweating", 0.50),
                ("hypotension", 0.40),
                ("dizziness", 0.30),
            ],
            &[
                "CT angiography of chest and abdomen; compare bilateral blood pressures",
                "Strict blood pressure control and cardiothoracic surgery consult",
            ],
        ),
        disease(
            "diabetic_ketoacidosis",
            "Diabetic ketoacidosis",
            0.015,
            UrgencyTier::Critical,
            &[
                ("polyuria", 0.70),
                ("excessive_thirst", 0.70),
                ("vomiting", 0.60),
                ("abdominal_pain", 0.50),
                ("tachypnea", 0.50),
                ("confusion", 0.40),
            ],
            &[
                "Blood glucose, ketones, and venous blood gas",
                "Start fluids and insulin per DKA protocol; monitor potassium",
            ],
        ),
        disease(
            "acute_pancreatitis",
            "Acute pancreatitis",
            0.02,
            UrgencyTier::Critical,
            &[
                ("epigastric_pain", 0.85),
                ("back_pain", 0.50),
                ("nausea", 0.70),
                ("vomiting", 0.65),
                ("high_fever", 0.40),
                ("loss_of_appetite", 0.50),
            ],
            &[
                "Serum lipase and liver panel; abdominal imaging",
                "Aggressive fluid resuscitation and analgesia",
            ],
        ),
        disease(
            "bowel_obstruction",
            "Bowel obstruction",
            0.015,
            UrgencyTier::Critical,
            &[
                ("abdominal_pain", 0.80),
                ("abdominal_distention", 0.80),
                ("vomiting", 0.70),
                ("constipation", 0.70),
                ("nausea", 0.60),
            ],
            &[
                "Abdominal CT with contrast; nil by mouth and nasogastric decompression",
                "Surgical consultation",
            ],
        ),
        disease(
            "appendicitis",
            "Appendicitis",
            0.03,
            UrgencyTier::Urgent,
            &[
                ("abdominal_pain_rlq", 0.90),
                ("migrating_pain", 0.70),
                ("nausea", 0.65),
                ("vomiting", 0.55),
                ("loss_of_appetite", 0.60),
                ("high_fever", 0.50),
            ],
            &[
                "Surgical consultation; CBC with differential and CT abdomen/pelvis",
                "Nil by mouth pending surgical review",
            ],
        ),
        disease(
            "cholecystitis",
            "Cholecystitis",
            0.02,
            UrgencyTier::Urgent,
            &[
                ("abdominal_pain_ruq", 0.85),
                ("nausea", 0.60),
                ("vomiting", 0.50),
                ("high_fever", 0.45),
                ("loss_of_appetite", 0.40),
            ],
            &[
                "Right upper quadrant ultrasound; CBC, liver panel, and lipase",
                "Surgical consultation",
            ],
        ),
        disease(
            "pneumonia",
            "Pneumonia",
            0.06,
            UrgencyTier::Urgent,
            &[
                ("cough", 0.85),
                ("high_fever", 0.70),
                ("phlegm", 0.65),
                ("breathlessness", 0.60),
                ("chest_pain", 0.40),
                ("chills", 0.50),
            ],
            &[
                "Chest X-ray, CBC with differential, and sputum culture",
                "Assess severity with CURB-65 before deciding admission",
            ],
        ),
        disease(
            "pyelonephritis",
            "Pyelonephritis",
            0.02,
            UrgencyTier::Urgent,
            &[
                ("flank_pain", 0.80),
                ("high_fever", 0.70),
                ("dysuria", 0.60),
                ("urinary_frequency", 0.50),
                ("nausea", 0.45),
                ("chills", 0.50),
            ],
            &[
                "Urinalysis with culture; start empiric antibiotics",
                "Renal ultrasound if obstruction suspected",
            ],
        ),
        disease(
            "deep_vein_thrombosis",
            "Deep vein thrombosis",
            0.02,
            UrgencyTier::Urgent,
            &[
                ("calf_pain", 0.80),
                ("leg_swelling", 0.85),
                ("erythema", 0.50),
                ("skin_warmth", 0.50),
            ],
            &[
                "Venous duplex ultrasound and D-dimer; apply Wells score",
                "Consider anticoagulation pending imaging",
            ],
        ),
        disease(
            "cellulitis",
            "Cellulitis",
            0.03,
            UrgencyTier::Urgent,
            &[
                ("erythema", 0.85),
                ("skin_warmth", 0.70),
                ("leg_swelling", 0.40),
                ("high_fever", 0.40),
                ("chills", 0.35),
            ],
            &[
                "Mark the erythema border and start antibiotics",
                "Blood cultures if systemic symptoms are present",
            ],
        ),
        disease(
            "diverticulitis",
            "Diverticulitis",
            0.02,
            UrgencyTier::Urgent,
            &[
                ("abdominal_pain_llq", 0.85),
                ("high_fever", 0.50),
                ("constipation", 0.40),
                ("diarrhea", 0.35),
                ("nausea", 0.40),
            ],
            &[
                "CT abdomen/pelvis with contrast; CBC",
                "Bowel rest and antibiotics for uncomplicated cases",
            ],
        ),
        disease(
            "gastroenteritis",
            "Gastroenteritis",
            0.08,
            UrgencyTier::Routine,
            &[
                ("diarrhea", 0.85),
                ("vomiting", 0.70),
                ("nausea", 0.75),
                ("abdominal_pain", 0.60),
                ("mild_fever", 0.35),
            ],
            &[
                "Oral rehydration and symptomatic care",
                "Stool studies if bloody diarrhea or symptoms beyond a week",
            ],
        ),
        disease(
            "gerd",
            "Gastroesophageal reflux",
            0.07,
            UrgencyTier::Routine,
            &[
                ("heartburn", 0.90),
                ("epigastric_pain", 0.50),
                ("chest_pain", 0.40),
                ("cough", 0.30),
            ],
            &[
                "Trial of acid suppression and dietary modification",
                "Endoscopy for alarm features or refractory symptoms",
            ],
        ),
        disease(
            "migraine",
            "Migraine",
            0.07,
            UrgencyTier::Routine,
            &[
                ("headache", 0.90),
                ("nausea", 0.60),
                ("photophobia", 0.60),
                ("vision_changes", 0.40),
                ("dizziness", 0.30),
            ],
            &[
                "Abortive therapy early in the attack; rest in a dark room",
                "Consider prophylaxis if attacks are frequent",
            ],
        ),
        disease(
            "tension_headache",
            "Tension headache",
            0.08,
            UrgencyTier::Routine,
            &[
                ("headache", 0.85),
                ("stiff_neck", 0.30),
                ("fatigue", 0.40),
            ],
            &[
                "Simple analgesia and stress management",
                "Review for red-flag headache features on follow-up",
            ],
        ),
        disease(
            "influenza",
            "Influenza",
            0.10,
            UrgencyTier::Routine,
            &[
                ("high_fever", 0.70),
                ("cough", 0.60),
                ("sore_throat", 0.50),
                ("runny_nose", 0.50),
                ("joint_pain", 0.60),
                ("fatigue", 0.70),
                ("chills", 0.60),
            ],
            &[
                "Supportive care with rest and fluids",
                "Antivirals within 48 hours for high-risk patients",
            ],
        ),
        disease(
            "urinary_tract_infection",
            "Urinary tract infection",
            0.05,
            UrgencyTier::Routine,
            &[
                ("dysuria", 0.85),
                ("urinary_frequency", 0.80),
                ("abdominal_pain", 0.30),
                ("mild_fever", 0.30),
            ],
            &[
                "Urinalysis and urine culture; short-course antibiotics",
                "Escalate if flank pain or fever develops",
            ],
        ),
        disease(
            "peptic_ulcer",
            "Peptic ulcer disease",
            0.03,
            UrgencyTier::Routine,
            &[
                ("epigastric_pain", 0.80),
                ("nausea", 0.50),
                ("heartburn", 0.40),
                ("bloody_stool", 0.25),
                ("vomiting", 0.30),
            ],
            &[
                "H. pylori testing and acid suppression",
                "Urgent endoscopy if bleeding signs are present",
            ],
        ),
    ]
}

fn patterns() -> Vec<CriticalPattern> {
    vec![
        pattern(
            "appendicitis_classic",
            "appendicitis",
            &[
                "abdominal_pain_rlq",
                "high_fever",
                "nausea",
                "vomiting",
                "loss_of_appetite",
                "rebound_tenderness",
                "guarding",
            ],
            &["rlq"],
            3,
            0.35,
            Some(UrgencyTier::Urgent),
        ),
        pattern(
            "appendicitis_migration",
            "appendicitis",
            &["abdominal_pain", "migrating_pain"],
            &["periumbilical", "rlq"],
            2,
            0.30,
            Some(UrgencyTier::Urgent),
        ),
        pattern(
            "mi_classic",
            "heart_attack",
            &[
                "chest_pain",
                "chest_pain_radiating",
                "sweating",
                "breathlessness",
                "nausea",
            ],
            &["retrosternal"],
            3,
            0.35,
            Some(UrgencyTier::Critical),
        ),
        pattern(
            "meningitis_triad",
            "meningitis",
            &[
                "severe_headache",
                "high_fever",
                "stiff_neck",
                "photophobia",
                "confusion",
                "altered_mental_status",
            ],
            &[],
            3,
            0.35,
            Some(UrgencyTier::Critical),
        ),
        pattern(
            "stroke_fast",
            "stroke",
            &["facial_droop", "sudden_weakness_one_side", "slurred_speech"],
            &[],
            2,
            0.40,
            Some(UrgencyTier::Critical),
        ),
        pattern(
            "sepsis_screen",
            "sepsis",
            &[
                "high_fever",
                "tachycardia",
                "tachypnea",
                "hypotension",
                "confusion",
                "altered_mental_status",
            ],
            &[],
            3,
            0.30,
            Some(UrgencyTier::Critical),
        ),
        pattern(
            "dka_crisis",
            "diabetic_ketoacidosis",
            &[
                "polyuria",
                "excessive_thirst",
                "vomiting",
                "tachypnea",
                "confusion",
            ],
            &[],
            3,
            0.30,
            Some(UrgencyTier::Critical),
        ),
        pattern(
            "pe_classic",
            "pulmonary_embolism",
            &[
                "breathlessness",
                "chest_pain",
                "calf_pain",
                "blood_in_sputum",
                "tachycardia",
                "hypoxia",
            ],
            &[],
            3,
            0.30,
            Some(UrgencyTier::Critical),
        ),
        pattern(
            "anaphylaxis_acute",
            "anaphylaxis",
            &["urticaria", "breathlessness", "wheezing", "hypotension"],
            &[],
            2,
            0.40,
            Some(UrgencyTier::Critical),
        ),
        pattern(
            "dissection_tearing",
            "aortic_dissection",
            &["chest_pain", "back_pain", "hypotension"],
            &["retrosternal"],
            2,
            0.30,
            Some(UrgencyTier::Critical),
        ),
    ]
}

fn build() -> Result<KnowledgeBase, super::types::KnowledgeBaseError> {
    KnowledgeBase::new(symptoms(), diseases(), patterns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::synonyms::builtin_synonyms;

    #[test]
    fn builtin_model_validates() {
        let kb = builtin_knowledge();
        assert!(kb.disease_count() >= 20);
        assert!(kb.symptom_count() >= 60);
        assert!(!kb.patterns().is_empty());
    }

    #[test]
    fn every_synonym_target_exists_in_model() {
        let kb = builtin_knowledge();
        let synonyms = builtin_synonyms();
        for (phrase, canonical) in synonyms.iter() {
            assert!(
                kb.symptom(canonical).is_some(),
                "synonym '{phrase}' targets unknown symptom '{canonical}'"
            );
        }
    }

    #[test]
    fn every_disease_has_recommendations() {
        let kb = builtin_knowledge();
        for d in kb.diseases() {
            assert!(
                !d.recommendations.is_empty(),
                "disease '{}' has no recommendations",
                d.id
            );
        }
    }

    #[test]
    fn critical_conditions_have_patterns_or_rich_profiles() {
        // Every critical-tier disease should either carry a pattern or
        // have at least five profile symptoms, so it cannot be missed
        // on a classic presentation.
        let kb = builtin_knowledge();
        for d in kb.diseases() {
            if d.urgency == UrgencyTier::Critical {
                let has_pattern = kb.patterns().iter().any(|p| p.disease_id == d.id);
                assert!(
                    has_pattern || d.likelihoods.len() >= 5,
                    "critical disease '{}' has no pattern and a thin profile",
                    d.id
                );
            }
        }
    }

    #[test]
    fn pattern_location_tags_match_symptom_tags() {
        // Location tags used by patterns must be producible: either a
        // symptom carries the tag or the location lexicon emits it.
        let kb = builtin_knowledge();
        let lexicon = crate::knowledge::synonyms::builtin_locations();
        for p in kb.patterns() {
            for tag in &p.locations {
                let from_lexicon = lexicon.iter().any(|(_, t)| t == tag);
                assert!(
                    from_lexicon,
                    "pattern '{}' requires location '{}' no lexicon phrase produces",
                    p.id, tag
                );
            }
        }
    }
}
