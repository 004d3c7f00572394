// ============================================================
// Layer 4 — Vocabulary Expander
// ============================================================
// Builds the exported word bank (vocab.json).
//
//   base tokens (every token in the corpus)
//       │
//       ▼
//   + up to N related lemmas per alphabetic token (SynonymSource)
//       │
//       ▼
//   + common chat slang
//       │
//       ▼
//   + naive morphology: word+s, word+ing, word+ed
//       │
//       ▼
//   sorted list
//
// The reply engine never reads this list. It is written next to
// the other artifacts for inspection and reuse.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::data::loader::read_lossy;
use crate::data::tokenizer::{is_alphabetic, tokenize};
use crate::domain::traits::SynonymSource;

/// Slang and contractions always added to the word bank
const SLANG: &[&str] = &[
    "u", "ur", "lol", "brb", "idk", "ikr", "tho", "cuz", "omg", "wtf", "yolo", "ok", "okay", "pls",
];

const MORPH_SUFFIXES: &[&str] = &["s", "ing", "ed"];

// ─── Thesaurus ────────────────────────────────────────────────────────────────
/// A word → related-lemmas table loaded from JSON:
///
/// ```json
/// { "happy": ["felicitous", "glad", "well_chosen"], "run": ["test", "tally"] }
/// ```
///
/// Lists keep their file order, which is the order lemmas are tried in.
#[derive(Debug, Clone, Default)]
pub struct Thesaurus {
    entries: HashMap<String, Vec<String>>,
}

impl Thesaurus {
    /// A source that knows no words.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|(word, lemmas)| (word.to_lowercase(), lemmas))
            .collect();
        Ok(Self { entries })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = read_lossy(path)
            .with_context(|| format!("Cannot read thesaurus '{}'", path.display()))?;
        let thesaurus = Self::from_json_str(&text)
            .with_context(|| format!("Thesaurus '{}' is not a word → [lemmas] JSON map", path.display()))?;
        tracing::info!("Loaded thesaurus with {} head words", thesaurus.len());
        Ok(thesaurus)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynonymSource for Thesaurus {
    fn synonyms(&self, word: &str) -> Vec<String> {
        self.entries.get(word).cloned().unwrap_or_default()
    }
}

// ─── Expansion ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy)]
pub struct ExpandOptions {
    pub expand_synonyms: bool,
    pub max_synonyms_per_word: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self { expand_synonyms: true, max_synonyms_per_word: 5 }
    }
}

/// Build the sorted, expanded vocabulary for `corpus`.
pub fn expand<S: AsRef<str>>(
    corpus: &[S],
    synonyms: &dyn SynonymSource,
    options: ExpandOptions,
) -> Vec<String> {
    let mut bank: BTreeSet<String> = corpus
        .iter()
        .flat_map(|line| tokenize(line.as_ref()))
        .collect();
    let base_size = bank.len();

    if options.expand_synonyms {
        let mut additions: BTreeSet<String> = BTreeSet::new();
        for word in bank.iter().filter(|w| is_alphabetic(w)) {
            let mut taken = 0usize;
            for lemma in synonyms.synonyms(word) {
                if taken >= options.max_synonyms_per_word {
                    break;
                }
                let lemma = lemma.to_lowercase().replace('_', "");
                if !lemma.is_empty() && !bank.contains(&lemma) {
                    additions.insert(lemma);
                    taken += 1;
                }
            }
        }
        tracing::debug!("Synonym expansion added {} words", additions.len());
        bank.extend(additions);
    }

    bank.extend(SLANG.iter().map(|s| s.to_string()));

    let morphs: Vec<String> = bank
        .iter()
        .filter(|w| is_alphabetic(w) && w.chars().count() > 2)
        .flat_map(|w| MORPH_SUFFIXES.iter().map(move |suffix| format!("{w}{suffix}")))
        .collect();
    bank.extend(morphs);

    tracing::debug!("Vocabulary: {} base tokens → {} total", base_size, bank.len());
    bank.into_iter().collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn options(expand_synonyms: bool, max: usize) -> ExpandOptions {
        ExpandOptions { expand_synonyms, max_synonyms_per_word: max }
    }

    #[test]
    fn test_output_is_sorted_and_contains_base_tokens() {
        let vocab = expand(&["Hey you", "2 cool"], &Thesaurus::empty(), options(false, 5));
        let mut sorted = vocab.clone();
        sorted.sort();
        assert_eq!(vocab, sorted);
        for w in ["hey", "you", "2", "cool"] {
            assert!(vocab.contains(&w.to_string()), "missing {w}");
        }
    }

    #[test]
    fn test_adds_slang_and_morphology() {
        let vocab = expand(&["walk it"], &Thesaurus::empty(), options(true, 5));
        for w in ["lol", "idk", "walks", "walking", "walked", "okays"] {
            assert!(vocab.contains(&w.to_string()), "missing {w}");
        }
        // "it" is too short for derivatives
        assert!(!vocab.contains(&"its".to_string()));
    }

    #[test]
    fn test_synonyms_are_bounded_and_normalised() {
        let thesaurus = Thesaurus::from_json_str(
            r#"{"glad": ["Happy", "glad", "well_pleased", "cheery", "joyful", "merry", "sunny"]}"#,
        )
        .unwrap();
        let vocab = expand(&["glad"], &thesaurus, options(true, 3));
        for w in ["happy", "wellpleased", "cheery"] {
            assert!(vocab.contains(&w.to_string()), "missing {w}");
        }
        assert!(!vocab.contains(&"joyful".to_string()));
    }

    #[test]
    fn test_expansion_disabled_ignores_thesaurus() {
        let thesaurus = Thesaurus::from_json_str(r#"{"glad": ["happy"]}"#).unwrap();
        let vocab = expand(&["glad"], &thesaurus, options(false, 5));
        assert!(!vocab.contains(&"happy".to_string()));
    }

    #[test]
    fn test_non_alphabetic_tokens_are_not_expanded() {
        let thesaurus = Thesaurus::from_json_str(r#"{"b2b": ["commerce"]}"#).unwrap();
        let vocab = expand(&["b2b"], &thesaurus, options(true, 5));
        assert!(!vocab.contains(&"commerce".to_string()));
        assert!(!vocab.contains(&"b2bs".to_string()));
    }
}
