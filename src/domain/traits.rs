// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams where the pipeline talks to the outside world.
//
//   - UtteranceFile implements UtteranceSource
//   - Thesaurus implements SynonymSource
//
// The application layer only sees the traits, so tests can
// hand in in-memory corpora and word lists.

use anyhow::Result;

// ─── UtteranceSource ──────────────────────────────────────────────────────────
/// Anything that yields one persona's utterances in corpus order.
pub trait UtteranceSource {
    /// Load every non-empty utterance, trimmed.
    fn load_utterances(&self) -> Result<Vec<String>>;
}

// ─── SynonymSource ────────────────────────────────────────────────────────────
/// An external lexical-relations source used by vocabulary expansion.
///
/// Returns lemma names related to `word`, most relevant first.
/// Unknown words yield an empty list, never an error.
pub trait SynonymSource {
    fn synonyms(&self, word: &str) -> Vec<String>;
}

impl UtteranceSource for Vec<String> {
    fn load_utterances(&self) -> Result<Vec<String>> {
        Ok(self
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}
