// ============================================================
// Layer 5 — Word-level Markov Model
// ============================================================
// An order-k next-token table built from one persona's corpus.
//
// Building:
//   Every utterance is tokenized and wrapped in sentinels:
//
//     "hey you"  →  <s> hey you </s>
//
//   For order 2 the windows are
//     (<s>, hey) → you
//     (hey, you) → </s>
//
//   Continuations are kept as a list with duplicates, so a
//   token that followed a context twice is twice as likely
//   to be sampled.
//
// Generating:
//   Start from a context that opens an utterance, then keep
//   sampling the next token from the continuation list of the
//   last k tokens. Stops at </s> or after `max_len` tokens.
//
// Keys are stored in corpus insertion order, so the same seed
// reproduces the same output.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::data::tokenizer::tokenize;

pub const START: &str = "<s>";
pub const END: &str = "</s>";

/// Ordered tuple of `order` consecutive tokens.
pub type ContextKey = Vec<String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MarkovRecord", into = "MarkovRecord")]
pub struct MarkovModel {
    order: usize,
    entries: Vec<(ContextKey, Vec<String>)>,
    lookup: HashMap<ContextKey, usize>,
}

/// On-disk form: JSON cannot use a tuple as a map key, so the table
/// is stored as an ordered list and the lookup is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct MarkovRecord {
    order: usize,
    entries: Vec<(ContextKey, Vec<String>)>,
}

impl From<MarkovRecord> for MarkovModel {
    fn from(record: MarkovRecord) -> Self {
        let lookup = record
            .entries
            .iter()
            .enumerate()
            .map(|(i, (key, _))| (key.clone(), i))
            .collect();
        Self { order: record.order, entries: record.entries, lookup }
    }
}

impl From<MarkovModel> for MarkovRecord {
    fn from(model: MarkovModel) -> Self {
        Self { order: model.order, entries: model.entries }
    }
}

impl MarkovModel {
    /// Build a model of the given order from raw utterances.
    ///
    /// Utterances whose wrapped token sequence is not longer than
    /// `order` contribute nothing.
    pub fn build<S: AsRef<str>>(lines: &[S], order: usize) -> Self {
        let mut model = Self { order, ..Self::default() };

        for line in lines {
            let mut tokens = Vec::with_capacity(8);
            tokens.push(START.to_string());
            tokens.extend(tokenize(line.as_ref()));
            tokens.push(END.to_string());

            if tokens.len() <= order {
                continue;
            }
            for window in tokens.windows(order + 1) {
                let (key, next) = window.split_at(order);
                model.record(key.to_vec(), next[0].clone());
            }
        }

        tracing::debug!(
            "Markov model (order {}) built with {} contexts",
            order,
            model.entries.len()
        );
        model
    }

    fn record(&mut self, key: ContextKey, next: String) {
        match self.lookup.get(&key) {
            Some(&i) => self.entries[i].1.push(next),
            None => {
                self.lookup.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![next]));
            }
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Continuations recorded for `key`, if any.
    pub fn continuations(&self, key: &[String]) -> Option<&[String]> {
        self.lookup
            .get(key)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Generate a pseudo-sentence of at most `max_len` sampled tokens
    /// on top of the start context, using `order` as the context length.
    /// Returns an empty string when the model is empty or nothing but
    /// sentinels came out.
    pub fn generate(&self, order: usize, max_len: usize, rng: &mut dyn RngCore) -> String {
        let Some(start) = self.pick_start(rng) else {
            return String::new();
        };

        let mut out: Vec<String> = start.clone();
        for _ in 0..max_len {
            let tail = &out[out.len().saturating_sub(order)..];

            // Unseen context: borrow the continuations of a random key
            // instead of halting, so generation keeps moving.
            let choices = self
                .continuations(tail)
                .or_else(|| self.random_entry(rng).map(|(_, next)| next.as_slice()));
            let Some(next) = choices.and_then(|c| c.choose(rng)) else {
                break;
            };
            if next == END {
                break;
            }
            out.push(next.clone());
        }

        let words: Vec<&str> = out
            .iter()
            .map(String::as_str)
            .filter(|t| *t != START && *t != END)
            .collect();
        capitalize_first(&words.join(" "))
    }

    /// Prefer a key that opens an utterance; otherwise any key.
    fn pick_start(&self, rng: &mut dyn RngCore) -> Option<&ContextKey> {
        let openers: Vec<&ContextKey> = self
            .entries
            .iter()
            .map(|(key, _)| key)
            .filter(|key| key.first().map(String::as_str) == Some(START))
            .collect();

        if openers.is_empty() {
            self.random_entry(rng).map(|(key, _)| key)
        } else {
            openers.choose(rng).copied()
        }
    }

    fn random_entry(&self, rng: &mut dyn RngCore) -> Option<&(ContextKey, Vec<String>)> {
        self.entries.choose(rng)
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(a: &str, b: &str) -> ContextKey {
        vec![a.to_string(), b.to_string()]
    }

    fn corpus() -> Vec<&'static str> {
        vec![
            "i love pizza so much",
            "i love you too",
            "pizza is the best thing ever",
            "ok",
        ]
    }

    #[test]
    fn test_build_records_windows_with_duplicates() {
        let model = MarkovModel::build(&corpus(), 2);
        let opener = model.continuations(&key(START, "i")).unwrap();
        assert_eq!(opener, ["love", "love"]);
        assert_eq!(model.continuations(&key("i", "love")).map(|c| c.len()), Some(2));
        assert_eq!(model.continuations(&key("much", END)), None);
    }

    #[test]
    fn test_every_line_with_three_tokens_has_start_key() {
        let lines = corpus();
        let model = MarkovModel::build(&lines, 2);
        for line in lines {
            let tokens = tokenize(line);
            if tokens.len() >= 3 {
                assert!(model.continuations(&key(START, &tokens[0])).is_some(), "missing start key for {line:?}");
            }
        }
    }

    #[test]
    fn test_short_utterances_are_skipped_for_high_order() {
        // "<s> ok </s>" has 3 tokens: skipped at order 3
        let model = MarkovModel::build(&["ok"], 3);
        assert!(model.is_empty());
        let model = MarkovModel::build(&["ok"], 2);
        assert_eq!(model.len(), 1);
        assert!(model.continuations(&key(START, "ok")).is_some());
    }

    #[test]
    fn test_empty_model_generates_nothing() {
        let model = MarkovModel::build::<&str>(&[], 2);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(model.generate(2, 20, &mut rng), "");
    }

    #[test]
    fn test_generation_is_bounded_and_sentinel_free() {
        let model = MarkovModel::build(&corpus(), 2);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let text = model.generate(2, 5, &mut rng);
            assert!(!text.contains(START));
            assert!(!text.contains(END));
            // the start context adds one real word next to <s>
            assert!(text.split_whitespace().count() <= 5 + 1);
        }
    }

    #[test]
    fn test_generation_capitalizes_first_character() {
        let model = MarkovModel::build(&["hello there friend"], 2);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(model.generate(2, 10, &mut rng), "Hello there friend");
    }

    #[test]
    fn test_same_seed_same_output() {
        let model = MarkovModel::build(&corpus(), 2);
        let a = model.generate(2, 12, &mut StdRng::seed_from_u64(42));
        let b = model.generate(2, 12, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_restores_lookup() {
        let model = MarkovModel::build(&corpus(), 2);
        let json = serde_json::to_string(&model).unwrap();
        let back: MarkovModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.order(), 2);
        assert_eq!(back.len(), model.len());
        assert!(back.continuations(&key("i", "love")).is_some());
    }
}
