// ============================================================
// Layer 5 — Similarity Index
// ============================================================
// Retrieval side of the reply engine: "which thing this persona
// actually said is closest to what the user just typed?"
//
// Structure:
//
//   SimilarityIndex
//     ├── vectorizer   (ONE tf-idf space, fit on bot1 ∪ bot2)
//     ├── bot1: PersonaIndex { neighbors, utterances }
//     └── bot2: PersonaIndex { neighbors, utterances }
//
// Both persona query paths go through the same `vectorizer`
// field, so distances from either persona are measured in the
// same feature space.
//
// Row i of `neighbors` is `utterances[i]`. `PersonaIndex::new`
// is the only constructor and it builds both from the same list.

use serde::{Deserialize, Serialize};

use crate::domain::persona::Persona;
use crate::ml::neighbors::NearestNeighbors;
use crate::ml::tfidf::TfidfVectorizer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaIndex {
    neighbors: NearestNeighbors,
    utterances: Vec<String>,
}

impl PersonaIndex {
    /// Vectorize `utterances` and index them in the same order.
    pub fn new(vectorizer: &TfidfVectorizer, utterances: Vec<String>, n_neighbors: usize) -> Self {
        let mut neighbors = NearestNeighbors::new(n_neighbors);
        neighbors.fit(vectorizer.transform(&utterances));
        Self { neighbors, utterances }
    }

    /// Reassemble a persisted index. Callers check `is_aligned`.
    pub fn from_parts(neighbors: NearestNeighbors, utterances: Vec<String>) -> Self {
        Self { neighbors, utterances }
    }

    pub fn is_aligned(&self) -> bool {
        self.neighbors.len() == self.utterances.len()
    }

    pub fn neighbors(&self) -> &NearestNeighbors {
        &self.neighbors
    }

    pub fn utterances(&self) -> &[String] {
        &self.utterances
    }
}

/// Closest stored utterance for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityMatch<'a> {
    pub distance: f64,
    pub index: usize,
    pub utterance: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityIndex {
    vectorizer: TfidfVectorizer,
    bot1: PersonaIndex,
    bot2: PersonaIndex,
}

impl SimilarityIndex {
    /// Fit the shared vectorizer on both corpora, then index each one.
    pub fn build(bot1: Vec<String>, bot2: Vec<String>, max_features: usize, n_neighbors: usize) -> Self {
        let mut vectorizer = TfidfVectorizer::new(max_features);
        let all: Vec<&str> = bot1.iter().chain(bot2.iter()).map(String::as_str).collect();
        vectorizer.fit(&all);

        let bot1 = PersonaIndex::new(&vectorizer, bot1, n_neighbors);
        let bot2 = PersonaIndex::new(&vectorizer, bot2, n_neighbors);
        Self { vectorizer, bot1, bot2 }
    }

    pub fn from_parts(vectorizer: TfidfVectorizer, bot1: PersonaIndex, bot2: PersonaIndex) -> Self {
        Self { vectorizer, bot1, bot2 }
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn persona(&self, persona: Persona) -> &PersonaIndex {
        match persona {
            Persona::Bot1 => &self.bot1,
            Persona::Bot2 => &self.bot2,
        }
    }

    /// Nearest utterance in `persona`'s corpus.
    ///
    /// `None` when the vectorizer was never fit or the persona has no
    /// utterances; the reply engine then falls through to generation.
    pub fn query(&self, persona: Persona, text: &str) -> Option<SimilarityMatch<'_>> {
        if !self.vectorizer.is_fitted() {
            tracing::warn!("Similarity query before the vectorizer was fit");
            return None;
        }
        let index = self.persona(persona);
        if index.neighbors.is_empty() {
            return None;
        }
        let query = self.vectorizer.transform_one(text);
        if query.is_empty() {
            tracing::debug!("Query shares no terms with the vocabulary");
        }
        let hit = index.neighbors.nearest(&query)?;
        let utterance = index.utterances.get(hit.index)?;
        Some(SimilarityMatch { distance: hit.distance, index: hit.index, utterance })
    }
}
