// ============================================================
// Layer 5 — TF-IDF Vectorizer
// ============================================================
// Turns utterances into sparse, L2-normalised tf-idf vectors.
//
// One vectorizer is fit over BOTH personas' utterances, so a
// query lands in the same feature space no matter which persona
// index it is compared against.
//
// Analyzer:
//   1. lowercase
//   2. terms are runs of two or more word characters (\b\w\w+\b)
//   3. features are unigrams and bigrams ("good", "good morning")
//
// Weighting:
//   tf(t, d)  = raw count of t in d
//   idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//   vector    = tf * idf, then scaled to unit length
//
// Only the `max_features` most frequent terms over the corpus
// are kept (ties broken alphabetically). Feature ids follow the
// sorted order of the kept terms.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("term regex is valid"));

// ─── SparseVector ─────────────────────────────────────────────────────────────
/// Feature id → weight, sorted by feature id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from unsorted pairs; duplicate ids are summed.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (id, w) in pairs {
            *merged.entry(id).or_insert(0.0) += w;
        }
        Self { entries: merged.into_iter().filter(|(_, w)| *w != 0.0).collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Merge-join dot product over the sorted ids.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_id, a_w) = self.entries[i];
            let (b_id, b_w) = other.entries[j];
            match a_id.cmp(&b_id) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }
}

/// `1 - cos(a, b)`, clamped at zero. A zero vector is at distance 1
/// from everything.
pub fn cosine_distance(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 1.0;
    }
    (1.0 - a.dot(b) / denom).max(0.0)
}

// ─── TfidfVectorizer ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    /// term → feature id
    vocabulary: HashMap<String, usize>,
    /// idf weight per feature id
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features, ..Self::default() }
    }

    /// Learn the vocabulary and idf weights from `docs`.
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) {
        let analyzed: Vec<Vec<String>> = docs.iter().map(|d| analyze(d.as_ref())).collect();

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in terms {
                *term_freq.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        // Keep the most frequent terms; alphabetical among equals
        let mut ranked: Vec<(&str, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut kept: Vec<&str> = ranked.into_iter().map(|(t, _)| t).collect();
        kept.sort_unstable();

        let n = docs.len() as f64;
        self.idf = kept
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(id, t)| (t.to_string(), id))
            .collect();

        tracing::debug!(
            "TF-IDF fit over {} documents: {} features",
            docs.len(),
            self.vocabulary.len()
        );
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vectorize one text. Unknown terms are ignored; the result is
    /// empty when nothing matched the vocabulary.
    pub fn transform_one(&self, text: &str) -> SparseVector {
        let pairs = analyze(text).into_iter().filter_map(|term| {
            self.vocabulary
                .get(&term)
                .map(|&id| (id, self.idf[id]))
        });
        // from_pairs sums the idf once per occurrence: tf * idf
        SparseVector::from_pairs(pairs).normalized()
    }

    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> Vec<SparseVector> {
        docs.iter().map(|d| self.transform_one(d.as_ref())).collect()
    }
}

/// Lowercase, extract word terms, emit unigrams followed by bigrams.
fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = TERM_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

    let mut terms: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    terms.extend(words.windows(2).map(|pair| pair.join(" ")));
    terms
}
