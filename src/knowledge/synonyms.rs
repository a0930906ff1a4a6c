use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use super::types::KnowledgeBaseError;

/// Case-insensitive phrase → canonical id table.
///
/// Used both for symptom synonyms and for the anatomical location
/// lexicon. Loaded once at startup and read-only afterwards, so lookups
/// are lock-free from any number of concurrent diagnosis calls.
#[derive(Debug)]
pub struct SynonymTable {
    entries: HashMap<String, String>,
    /// Longest phrase in the table, in words. The normalizer uses this
    /// to bound its greedy longest-phrase-first window.
    max_phrase_words: usize,
}

impl SynonymTable {
    /// Build a table, rejecting any phrase that maps to two different
    /// canonical ids. Phrases are lower-cased; duplicate identical
    /// mappings are collapsed.
    pub fn from_entries<I, S, T>(entries: I) -> Result<Self, KnowledgeBaseError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut map: HashMap<String, String> = HashMap::new();
        let mut max_phrase_words = 1;

        for (phrase, canonical) in entries {
            let phrase = phrase.as_ref().to_lowercase();
            let canonical = canonical.as_ref().to_string();

            if let Some(existing) = map.get(&phrase) {
                if *existing != canonical {
                    return Err(KnowledgeBaseError::SynonymConflict {
                        phrase,
                        first: existing.clone(),
                        second: canonical,
                    });
                }
                continue;
            }

            max_phrase_words = max_phrase_words.max(phrase.split_whitespace().count());
            map.insert(phrase, canonical);
        }

        Ok(Self {
            entries: map,
            max_phrase_words,
        })
    }

    /// Extend with additional entries (e.g. from an external model file),
    /// keeping the conflict check.
    pub fn merged_with<I, S, T>(&self, extra: I) -> Result<Self, KnowledgeBaseError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let base = self
            .entries
            .iter()
            .map(|(p, c)| (p.clone(), c.clone()))
            .collect::<Vec<_>>();
        let extra: Vec<(String, String)> = extra
            .into_iter()
            .map(|(p, c)| (p.as_ref().to_string(), c.as_ref().to_string()))
            .collect();
        Self::from_entries(base.into_iter().chain(extra))
    }

    pub fn lookup(&self, phrase: &str) -> Option<&str> {
        self.entries.get(phrase).map(String::as_str)
    }

    pub fn max_phrase_words(&self) -> usize {
        self.max_phrase_words
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }
}

/// The built-in symptom synonym table, shared process-wide.
pub fn builtin_synonyms() -> Arc<SynonymTable> {
    static TABLE: LazyLock<Arc<SynonymTable>> = LazyLock::new(|| {
        Arc::new(
            SynonymTable::from_entries(SYMPTOM_SYNONYMS.iter().copied())
                .expect("built-in synonym table has conflicting entries"),
        )
    });
    Arc::clone(&TABLE)
}

/// The built-in anatomical location lexicon, shared process-wide.
pub fn builtin_locations() -> Arc<SynonymTable> {
    static TABLE: LazyLock<Arc<SynonymTable>> = LazyLock::new(|| {
        Arc::new(
            SynonymTable::from_entries(LOCATION_LEXICON.iter().copied())
                .expect("built-in location lexicon has conflicting entries"),
        )
    });
    Arc::clone(&TABLE)
}

// ── Symptom synonyms ────────────────────────────────────────
// Phrases are matched after punctuation stripping, so keys contain no
// apostrophes ("cant breathe" matches "can't breathe").

static SYMPTOM_SYNONYMS: &[(&str, &str)] = &[
    // Chest pain
    ("chest pain", "chest_pain"),
    ("chest discomfort", "chest_pain"),
    ("chest pressure", "chest_pain"),
    ("chest tightness", "chest_pain"),
    ("chest heaviness", "chest_pain"),
    ("crushing chest pain", "chest_pain"),
    ("squeezing chest pain", "chest_pain"),
    ("sharp chest pain", "chest_pain"),
    ("burning chest pain", "chest_pain"),
    ("precordial pain", "chest_pain"),
    ("retrosternal pain", "chest_pain"),
    ("substernal pain", "chest_pain"),
    ("angina", "chest_pain"),
    ("angina pectoris", "chest_pain"),
    ("heart pain", "chest_pain"),
    ("pain in chest", "chest_pain"),
    ("chest ache", "chest_pain"),
    ("chest hurts", "chest_pain"),
    ("pressure in chest", "chest_pain"),
    ("tight chest", "chest_pain"),
    ("cp", "chest_pain"),
    // Pain radiation
    ("radiating to arm", "chest_pain_radiating"),
    ("radiating to left arm", "chest_pain_radiating"),
    ("radiating to jaw", "chest_pain_radiating"),
    ("radiating to neck", "chest_pain_radiating"),
    ("radiating to shoulder", "chest_pain_radiating"),
    ("pain radiating", "chest_pain_radiating"),
    ("pain spreading", "chest_pain_radiating"),
    ("pain going to arm", "chest_pain_radiating"),
    ("pain shoots to arm", "chest_pain_radiating"),
    // Sweating
    ("sweating", "sweating"),
    ("diaphoresis", "sweating"),
    ("perspiration", "sweating"),
    ("profuse sweating", "sweating"),
    ("cold sweat", "sweating"),
    ("cold sweats", "sweating"),
    ("clammy", "sweating"),
    ("sweaty", "sweating"),
    ("drenched in sweat", "sweating"),
    // Breathlessness
    ("breathlessness", "breathlessness"),
    ("shortness of breath", "breathlessness"),
    ("short of breath", "breathlessness"),
    ("sob", "breathlessness"),
    ("dyspnea", "breathlessness"),
    ("difficulty breathing", "breathlessness"),
    ("labored breathing", "breathlessness"),
    ("hard to breathe", "breathlessness"),
    ("cant breathe", "breathlessness"),
    ("cannot breathe", "breathlessness"),
    ("trouble breathing", "breathlessness"),
    ("breathing problems", "breathlessness"),
    ("gasping for air", "breathlessness"),
    ("air hunger", "breathlessness"),
    ("out of breath", "breathlessness"),
    ("respiratory distress", "breathlessness"),
    // Palpitations / heart rate
    ("palpitations", "palpitations"),
    ("heart racing", "palpitations"),
    ("racing heart", "palpitations"),
    ("rapid heartbeat", "palpitations"),
    ("heart pounding", "palpitations"),
    ("pounding heart", "palpitations"),
    ("fluttering heart", "palpitations"),
    ("tachycardia", "tachycardia"),
    ("fast heart rate", "tachycardia"),
    ("rapid pulse", "tachycardia"),
    ("elevated heart rate", "tachycardia"),
    ("bradycardia", "bradycardia"),
    ("slow heart rate", "bradycardia"),
    ("slow pulse", "bradycardia"),
    // Blood pressure
    ("hypotension", "hypotension"),
    ("low blood pressure", "hypotension"),
    ("low bp", "hypotension"),
    ("bp drop", "hypotension"),
    ("blood pressure dropped", "hypotension"),
    // Headache
    ("headache", "headache"),
    ("head pain", "headache"),
    ("head ache", "headache"),
    ("cephalalgia", "headache"),
    ("head hurts", "headache"),
    ("pounding headache", "headache"),
    ("throbbing headache", "headache"),
    ("migraine", "headache"),
    ("ha", "headache"),
    ("severe headache", "severe_headache"),
    ("worst headache", "severe_headache"),
    ("worst headache of my life", "severe_headache"),
    ("thunderclap headache", "severe_headache"),
    ("intense headache", "severe_headache"),
    ("splitting headache", "severe_headache"),
    // Neck stiffness
    ("stiff neck", "stiff_neck"),
    ("neck stiffness", "stiff_neck"),
    ("nuchal rigidity", "stiff_neck"),
    ("rigid neck", "stiff_neck"),
    ("cant move neck", "stiff_neck"),
    ("neck is stiff", "stiff_neck"),
    // Photophobia
    ("photophobia", "photophobia"),
    ("light sensitivity", "photophobia"),
    ("sensitive to light", "photophobia"),
    ("light hurts eyes", "photophobia"),
    ("bothered by light", "photophobia"),
    // Confusion / mental status
    ("confusion", "confusion"),
    ("confused", "confusion"),
    ("not thinking clearly", "confusion"),
    ("foggy mind", "confusion"),
    ("cant think straight", "confusion"),
    ("disorientation", "altered_mental_status"),
    ("disoriented", "altered_mental_status"),
    ("altered mental status", "altered_mental_status"),
    ("ams", "altered_mental_status"),
    ("altered consciousness", "altered_mental_status"),
    ("altered sensorium", "altered_mental_status"),
    ("loss of consciousness", "altered_mental_status"),
    ("loc", "altered_mental_status"),
    ("passed out", "altered_mental_status"),
    ("fainted", "altered_mental_status"),
    ("blacked out", "altered_mental_status"),
    // Stroke signs
    ("facial droop", "facial_droop"),
    ("face drooping", "facial_droop"),
    ("droopy face", "facial_droop"),
    ("facial asymmetry", "facial_droop"),
    ("facial paralysis", "facial_droop"),
    ("weakness one side", "sudden_weakness_one_side"),
    ("one sided weakness", "sudden_weakness_one_side"),
    ("weak on one side", "sudden_weakness_one_side"),
    ("hemiparesis", "sudden_weakness_one_side"),
    ("hemiplegia", "sudden_weakness_one_side"),
    ("right sided weakness", "sudden_weakness_one_side"),
    ("left sided weakness", "sudden_weakness_one_side"),
    ("arm weakness", "sudden_weakness_one_side"),
    ("cant move arm", "sudden_weakness_one_side"),
    ("cant move leg", "sudden_weakness_one_side"),
    ("slurred speech", "slurred_speech"),
    ("speech difficulty", "slurred_speech"),
    ("trouble speaking", "slurred_speech"),
    ("cant speak clearly", "slurred_speech"),
    ("aphasia", "slurred_speech"),
    ("dysarthria", "slurred_speech"),
    ("garbled speech", "slurred_speech"),
    // Dizziness
    ("dizziness", "dizziness"),
    ("dizzy", "dizziness"),
    ("lightheaded", "dizziness"),
    ("light headed", "dizziness"),
    ("vertigo", "dizziness"),
    ("room spinning", "dizziness"),
    ("unsteady", "dizziness"),
    ("syncope", "dizziness"),
    // Vision
    ("vision changes", "vision_changes"),
    ("vision problems", "vision_changes"),
    ("blurred vision", "vision_changes"),
    ("blurry vision", "vision_changes"),
    ("double vision", "vision_changes"),
    ("diplopia", "vision_changes"),
    // Numbness
    ("numbness", "numbness_tingling"),
    ("tingling", "numbness_tingling"),
    ("pins and needles", "numbness_tingling"),
    ("paresthesia", "numbness_tingling"),
    ("numb", "numbness_tingling"),
    ("loss of sensation", "numbness_tingling"),
    // Cough / sputum
    ("cough", "cough"),
    ("coughing", "cough"),
    ("productive cough", "cough"),
    ("dry cough", "cough"),
    ("persistent cough", "cough"),
    ("hacking cough", "cough"),
    ("sputum", "phlegm"),
    ("phlegm", "phlegm"),
    ("mucus", "phlegm"),
    ("bloody sputum", "blood_in_sputum"),
    ("blood in sputum", "blood_in_sputum"),
    ("hemoptysis", "blood_in_sputum"),
    ("coughing blood", "blood_in_sputum"),
    ("coughing up blood", "blood_in_sputum"),
    ("rusty sputum", "blood_in_sputum"),
    // Breathing sounds / rate
    ("wheezing", "wheezing"),
    ("wheeze", "wheezing"),
    ("whistling breathing", "wheezing"),
    ("tachypnea", "tachypnea"),
    ("rapid breathing", "tachypnea"),
    ("fast breathing", "tachypnea"),
    ("breathing fast", "tachypnea"),
    ("hyperventilation", "tachypnea"),
    // General abdominal pain
    ("abdominal pain", "abdominal_pain"),
    ("stomach pain", "abdominal_pain"),
    ("belly pain", "abdominal_pain"),
    ("tummy pain", "abdominal_pain"),
    ("stomach ache", "abdominal_pain"),
    ("stomach hurts", "abdominal_pain"),
    ("belly hurts", "abdominal_pain"),
    ("pain in stomach", "abdominal_pain"),
    ("pain in abdomen", "abdominal_pain"),
    ("abd pain", "abdominal_pain"),
    ("periumbilical pain", "abdominal_pain"),
    ("around belly button", "abdominal_pain"),
    ("around umbilicus", "abdominal_pain"),
    ("near belly button", "abdominal_pain"),
    ("around navel", "abdominal_pain"),
    // Abdominal quadrants
    ("right lower quadrant", "abdominal_pain_rlq"),
    ("right lower quadrant pain", "abdominal_pain_rlq"),
    ("rlq", "abdominal_pain_rlq"),
    ("rlq pain", "abdominal_pain_rlq"),
    ("right iliac fossa", "abdominal_pain_rlq"),
    ("right lower abdomen", "abdominal_pain_rlq"),
    ("lower right abdomen", "abdominal_pain_rlq"),
    ("mcburney point", "abdominal_pain_rlq"),
    ("mcburneys point", "abdominal_pain_rlq"),
    ("right upper quadrant", "abdominal_pain_ruq"),
    ("right upper quadrant pain", "abdominal_pain_ruq"),
    ("ruq", "abdominal_pain_ruq"),
    ("ruq pain", "abdominal_pain_ruq"),
    ("right upper abdomen", "abdominal_pain_ruq"),
    ("upper right abdomen", "abdominal_pain_ruq"),
    ("left lower quadrant", "abdominal_pain_llq"),
    ("left lower quadrant pain", "abdominal_pain_llq"),
    ("llq", "abdominal_pain_llq"),
    ("llq pain", "abdominal_pain_llq"),
    ("left lower abdomen", "abdominal_pain_llq"),
    ("lower left abdomen", "abdominal_pain_llq"),
    ("epigastric", "epigastric_pain"),
    ("epigastric pain", "epigastric_pain"),
    ("upper abdominal pain", "epigastric_pain"),
    ("upper stomach pain", "epigastric_pain"),
    // Peritoneal signs
    ("rebound tenderness", "rebound_tenderness"),
    ("rebound pain", "rebound_tenderness"),
    ("guarding", "guarding"),
    ("abdominal guarding", "guarding"),
    ("rigid abdomen", "guarding"),
    ("tense abdomen", "guarding"),
    // Pain migration
    ("migrating pain", "migrating_pain"),
    ("pain migration", "migrating_pain"),
    ("pain moved", "migrating_pain"),
    ("pain shifted", "migrating_pain"),
    ("pain started", "migrating_pain"),
    ("pain began", "migrating_pain"),
    // Back pain / radiation to back
    ("back pain", "back_pain"),
    ("radiating to back", "back_pain"),
    ("pain to back", "back_pain"),
    ("pain in back", "back_pain"),
    ("tearing back pain", "back_pain"),
    // Nausea / vomiting
    ("nausea", "nausea"),
    ("nauseous", "nausea"),
    ("nauseated", "nausea"),
    ("feeling sick", "nausea"),
    ("queasy", "nausea"),
    ("sick to stomach", "nausea"),
    ("n/v", "nausea"),
    ("vomiting", "vomiting"),
    ("vomit", "vomiting"),
    ("vomited", "vomiting"),
    ("throwing up", "vomiting"),
    ("threw up", "vomiting"),
    ("emesis", "vomiting"),
    ("puking", "vomiting"),
    ("retching", "vomiting"),
    ("hematemesis", "vomiting"),
    ("vomiting blood", "vomiting"),
    // Appetite
    ("loss of appetite", "loss_of_appetite"),
    ("no appetite", "loss_of_appetite"),
    ("decreased appetite", "loss_of_appetite"),
    ("not hungry", "loss_of_appetite"),
    ("cant eat", "loss_of_appetite"),
    ("anorexia", "loss_of_appetite"),
    // Bowel
    ("diarrhea", "diarrhea"),
    ("loose stools", "diarrhea"),
    ("watery stools", "diarrhea"),
    ("constipation", "constipation"),
    ("constipated", "constipation"),
    ("bloody stool", "bloody_stool"),
    ("blood in stool", "bloody_stool"),
    ("melena", "bloody_stool"),
    ("black stool", "bloody_stool"),
    ("tarry stool", "bloody_stool"),
    ("hematochezia", "bloody_stool"),
    ("rectal bleeding", "bloody_stool"),
    ("abdominal distention", "abdominal_distention"),
    ("bloating", "abdominal_distention"),
    ("bloated", "abdominal_distention"),
    ("distended abdomen", "abdominal_distention"),
    ("swollen belly", "abdominal_distention"),
    // Fever
    ("fever", "high_fever"),
    ("high fever", "high_fever"),
    ("febrile", "high_fever"),
    ("pyrexia", "high_fever"),
    ("elevated temperature", "high_fever"),
    ("burning up", "high_fever"),
    ("feverish", "high_fever"),
    ("hyperthermia", "high_fever"),
    ("low grade fever", "mild_fever"),
    ("mild fever", "mild_fever"),
    ("slight fever", "mild_fever"),
    ("chills", "chills"),
    ("shivering", "chills"),
    ("rigors", "chills"),
    // Fatigue
    ("fatigue", "fatigue"),
    ("tired", "fatigue"),
    ("tiredness", "fatigue"),
    ("exhaustion", "fatigue"),
    ("exhausted", "fatigue"),
    ("weakness", "fatigue"),
    ("malaise", "fatigue"),
    ("lethargy", "fatigue"),
    ("lethargic", "fatigue"),
    ("no energy", "fatigue"),
    ("run down", "fatigue"),
    // Weight loss
    ("weight loss", "weight_loss"),
    ("losing weight", "weight_loss"),
    ("lost weight", "weight_loss"),
    ("wt loss", "weight_loss"),
    // Musculoskeletal
    ("joint pain", "joint_pain"),
    ("arthralgia", "joint_pain"),
    ("aching joints", "joint_pain"),
    ("muscle pain", "joint_pain"),
    ("myalgia", "joint_pain"),
    ("muscle aches", "joint_pain"),
    ("body aches", "joint_pain"),
    ("body pain", "joint_pain"),
    // Legs
    ("leg swelling", "leg_swelling"),
    ("swollen leg", "leg_swelling"),
    ("leg edema", "leg_swelling"),
    ("edema", "leg_swelling"),
    ("calf pain", "calf_pain"),
    ("calf tenderness", "calf_pain"),
    ("pain in calf", "calf_pain"),
    // Skin
    ("rash", "skin_rash"),
    ("skin rash", "skin_rash"),
    ("red spots", "skin_rash"),
    ("skin eruption", "skin_rash"),
    ("itching", "itching"),
    ("itchy", "itching"),
    ("pruritus", "itching"),
    ("erythema", "erythema"),
    ("redness", "erythema"),
    ("red skin", "erythema"),
    ("skin redness", "erythema"),
    ("warm to touch", "skin_warmth"),
    ("hot skin", "skin_warmth"),
    ("urticaria", "urticaria"),
    ("hives", "urticaria"),
    ("welts", "urticaria"),
    // Urinary
    ("flank pain", "flank_pain"),
    ("side pain", "flank_pain"),
    ("pain in side", "flank_pain"),
    ("costovertebral angle tenderness", "flank_pain"),
    ("cvat", "flank_pain"),
    ("dysuria", "dysuria"),
    ("painful urination", "dysuria"),
    ("burning urination", "dysuria"),
    ("burning when urinating", "dysuria"),
    ("frequent urination", "urinary_frequency"),
    ("urinating a lot", "urinary_frequency"),
    ("peeing a lot", "urinary_frequency"),
    ("polyuria", "polyuria"),
    ("excessive urination", "polyuria"),
    // Thirst
    ("excessive thirst", "excessive_thirst"),
    ("polydipsia", "excessive_thirst"),
    ("very thirsty", "excessive_thirst"),
    ("always thirsty", "excessive_thirst"),
    ("increased thirst", "excessive_thirst"),
    // Upper GI / ENT
    ("heartburn", "heartburn"),
    ("acid reflux", "heartburn"),
    ("reflux", "heartburn"),
    ("sore throat", "sore_throat"),
    ("throat pain", "sore_throat"),
    ("runny nose", "runny_nose"),
    ("rhinorrhea", "runny_nose"),
    ("stuffy nose", "runny_nose"),
];

// ── Location lexicon ────────────────────────────────────────
// Scanned independently of symptoms; a phrase may legitimately appear
// in both tables ("right lower quadrant" is RLQ pain and the RLQ tag).

static LOCATION_LEXICON: &[(&str, &str)] = &[
    ("right lower quadrant", "rlq"),
    ("rlq", "rlq"),
    ("right iliac fossa", "rlq"),
    ("right lower abdomen", "rlq"),
    ("lower right abdomen", "rlq"),
    ("mcburney point", "rlq"),
    ("mcburneys point", "rlq"),
    ("right upper quadrant", "ruq"),
    ("ruq", "ruq"),
    ("right upper abdomen", "ruq"),
    ("left lower quadrant", "llq"),
    ("llq", "llq"),
    ("left lower abdomen", "llq"),
    ("left upper quadrant", "luq"),
    ("luq", "luq"),
    ("left upper abdomen", "luq"),
    ("epigastric", "epigastric"),
    ("epigastrium", "epigastric"),
    ("periumbilical", "periumbilical"),
    ("around belly button", "periumbilical"),
    ("around umbilicus", "periumbilical"),
    ("near belly button", "periumbilical"),
    ("around navel", "periumbilical"),
    ("belly button", "periumbilical"),
    ("umbilicus", "periumbilical"),
    ("retrosternal", "retrosternal"),
    ("substernal", "retrosternal"),
    ("flank", "flank"),
    ("costovertebral angle", "flank"),
    ("calf", "calf"),
];
