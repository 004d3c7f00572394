// ============================================================
// Layer 5 — Model Layer
// ============================================================
// Everything that learns from the corpus lives here:
//
//   markov.rs    — order-k next-token tables and bounded
//                  sentence generation
//
//   tfidf.rs     — the shared tf-idf vectorizer (unigrams +
//                  bigrams) and sparse vector math
//
//   neighbors.rs — brute-force cosine nearest-neighbour index
//                  over one persona's vectors
//
// No file I/O happens in this layer; every model derives
// Serialize/Deserialize and infra/ decides where it goes.

/// Word-level Markov chain
pub mod markov;

/// TF-IDF vectorizer and sparse vectors
pub mod tfidf;

/// Cosine nearest-neighbour search
pub mod neighbors;

/// Shared-space retrieval over both personas
pub mod similarity;
