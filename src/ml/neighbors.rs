// ============================================================
// Layer 5 — Cosine Nearest-Neighbour Index
// ============================================================
// Brute-force k-nearest-neighbour search over one persona's
// tf-idf vectors.
//
// Row `i` of the index is utterance `i` of the persona's stored
// list; nothing here reorders rows, so a returned index can be
// used directly against that list.
//
// Persona corpora are a few thousand short lines, so a linear
// scan over sparse dot products answers a query in well under
// a millisecond.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::ml::tfidf::{cosine_distance, SparseVector};

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub distance: f64,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestNeighbors {
    /// Default number of neighbours returned by `kneighbors`
    n_neighbors: usize,
    metric: String,
    rows: Vec<SparseVector>,
}

impl NearestNeighbors {
    pub fn new(n_neighbors: usize) -> Self {
        Self { n_neighbors, metric: "cosine".to_string(), rows: Vec::new() }
    }

    /// Store the rows to search. Replaces anything fit before.
    pub fn fit(&mut self, rows: Vec<SparseVector>) {
        self.rows = rows;
        tracing::debug!("Nearest-neighbour index fit with {} rows", self.rows.len());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `k` closest rows (or `n_neighbors` when `k` is `None`),
    /// nearest first. Equal distances keep the lower row index first.
    pub fn kneighbors(&self, query: &SparseVector, k: Option<usize>) -> Vec<Neighbor> {
        let k = k.unwrap_or(self.n_neighbors);
        let mut hits: Vec<Neighbor> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| Neighbor { distance: cosine_distance(query, row), index })
            .collect();

        // stable sort: ties stay in row order
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits.truncate(k);
        hits
    }

    /// The single closest row, if the index has any.
    pub fn nearest(&self, query: &SparseVector) -> Option<Neighbor> {
        self.kneighbors(query, Some(1)).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(usize, f64)]) -> SparseVector {
        SparseVector::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_returns_closest_first() {
        let mut nn = NearestNeighbors::new(3);
        nn.fit(vec![row(&[(0, 1.0)]), row(&[(1, 1.0)]), row(&[(0, 1.0), (1, 1.0)])]);

        let hits = nn.kneighbors(&row(&[(1, 1.0)]), None);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].index, 1);
        assert!(hits[0].distance < 1e-12);
        assert_eq!(hits[1].index, 2);
        assert_eq!(hits[2].index, 0);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let mut nn = NearestNeighbors::new(3);
        nn.fit(vec![row(&[(5, 1.0)]), row(&[(0, 1.0)]), row(&[(0, 2.0)])]);
        let best = nn.nearest(&row(&[(0, 1.0)])).unwrap();
        assert_eq!(best.index, 1);
    }

    #[test]
    fn test_empty_index_has_no_neighbor() {
        let nn = NearestNeighbors::new(3);
        assert!(nn.nearest(&row(&[(0, 1.0)])).is_none());
    }

    #[test]
    fn test_k_larger_than_rows() {
        let mut nn = NearestNeighbors::new(3);
        nn.fit(vec![row(&[(0, 1.0)])]);
        assert_eq!(nn.kneighbors(&row(&[(0, 1.0)]), None).len(), 1);
    }
}
