//! Symptom normalization: free text → canonical symptom ids and
//! anatomical location tags.
//!
//! Matching is dictionary-based, greedy, and longest-phrase-first, so
//! "shortness of breath" wins over any shorter overlapping phrase.
//! Unrecognized vocabulary is ignored rather than rejected; the engine
//! degrades gracefully on input it has no terms for.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::knowledge::SynonymTable;

/// Tokens that negate a following symptom mention ("denies fever",
/// "no chest pain"). Checked against the unconsumed tokens in a small
/// window before each match.
const NEGATION_CUES: &[&str] = &[
    "no", "not", "denies", "denied", "without", "absent", "negative", "ruled",
];

/// The canonical evidence extracted from one query. Owned exclusively
/// by the diagnosis call that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedInput {
    /// Canonical symptom ids recognized in the text, deduplicated.
    pub symptoms: BTreeSet<String>,
    /// Anatomical location tags recognized in the text.
    pub locations: BTreeSet<String>,
    /// Symptom ids injected from structured vitals (e.g. measured
    /// temperature 39 °C → `high_fever`). Kept separate from text
    /// symptoms for reporting.
    pub vitals_evidence: BTreeSet<String>,
    /// Symptom ids that were mentioned but negated, for the audit trail.
    pub negated: BTreeSet<String>,
}

impl NormalizedInput {
    /// All symptom evidence usable by inference: text symptoms plus
    /// vitals-derived evidence.
    pub fn evidence(&self) -> BTreeSet<String> {
        self.symptoms
            .union(&self.vitals_evidence)
            .cloned()
            .collect()
    }

    /// True when no usable symptom evidence was recognized.
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty() && self.vitals_evidence.is_empty()
    }
}

/// Maps raw text to `NormalizedInput` against a synonym table and a
/// location lexicon. Holds only shared read-only tables; cheap to
/// construct per call.
pub struct Normalizer {
    synonyms: Arc<SynonymTable>,
    locations: Arc<SynonymTable>,
    negation_window: usize,
}

impl Normalizer {
    pub fn new(
        synonyms: Arc<SynonymTable>,
        locations: Arc<SynonymTable>,
        negation_window: usize,
    ) -> Self {
        Self {
            synonyms,
            locations,
            negation_window,
        }
    }

    /// Normalize one query. Never fails; unrecognized tokens are skipped.
    pub fn normalize(&self, text: &str) -> NormalizedInput {
        let tokens = tokenize(text);

        let mut input = NormalizedInput::default();
        scan(
            &tokens,
            &self.synonyms,
            self.negation_window,
            &mut input.symptoms,
            &mut input.negated,
        );

        // Location scan runs independently over the same tokens; a
        // phrase may produce both a symptom and a location tag.
        let mut negated_locations = BTreeSet::new();
        scan(
            &tokens,
            &self.locations,
            self.negation_window,
            &mut input.locations,
            &mut negated_locations,
        );

        input
    }
}

/// Lower-case and split into word tokens. Apostrophes are dropped so
/// "can't breathe" matches the key "cant breathe"; slashes survive so
/// shorthand like "n/v" stays one token; other punctuation separates.
fn tokenize(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() || c == '/' {
            cleaned.push(c);
        } else {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Greedy longest-phrase-first scan. At each token, the longest window
/// that matches the table is consumed; consumed tokens never serve as
/// negation cues for later matches.
fn scan(
    tokens: &[String],
    table: &SynonymTable,
    negation_window: usize,
    matched: &mut BTreeSet<String>,
    negated: &mut BTreeSet<String>,
) {
    let max_words = table.max_phrase_words();
    let mut consumed = vec![false; tokens.len()];

    let mut i = 0;
    while i < tokens.len() {
        let longest = max_words.min(tokens.len() - i);
        let mut advanced = false;

        for len in (1..=longest).rev() {
            let phrase = tokens[i..i + len].join(" ");
            if let Some(canonical) = table.lookup(&phrase) {
                if let Some(cue) = negating_cue(tokens, &consumed, i, negation_window) {
                    negated.insert(canonical.to_string());
                    // A cue negates only its nearest following match;
                    // spend it so later symptoms stay affirmative.
                    consumed[cue] = true;
                } else {
                    matched.insert(canonical.to_string());
                }
                for slot in &mut consumed[i..i + len] {
                    *slot = true;
                }
                i += len;
                advanced = true;
                break;
            }
        }

        if !advanced {
            i += 1;
        }
    }
}

/// Index of the nearest unconsumed negation cue preceding `at`, if any.
fn negating_cue(tokens: &[String], consumed: &[bool], at: usize, window: usize) -> Option<usize> {
    let start = at.saturating_sub(window);
    (start..at)
        .rev()
        .find(|&i| !consumed[i] && NEGATION_CUES.contains(&tokens[i].as_str()))
}
