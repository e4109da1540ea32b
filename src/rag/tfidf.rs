// ABOUTME: TF-IDF vector space over chunks with cosine-similarity query scoring
// ABOUTME: Vectors are built once in parallel at startup and never mutated afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! TF-IDF retrieval
//!
//! Term weight is raw term frequency times smoothed inverse document
//! frequency, `ln((1 + N) / (1 + df)) + 1`. Chunk vectors are L2-normalized
//! at build time so query scoring is a single sparse dot product.

use std::collections::HashMap;

use rayon::prelude::*;

use super::tokenizer::term_counts;
use super::{rank, Chunk, RetrievalParams, RetrievalResult};

/// Sparse vector as `(term id, weight)` pairs sorted by term id
type SparseVector = Vec<(usize, f64)>;

/// Immutable TF-IDF index
#[derive(Debug)]
pub struct TfIdfIndex {
    chunks: Vec<Chunk>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl TfIdfIndex {
    /// Build vectors for every chunk
    #[must_use]
    pub fn new(chunks: Vec<Chunk>) -> Self {
        let counts: Vec<HashMap<String, u32>> =
            chunks.par_iter().map(|chunk| term_counts(&chunk.text)).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<u32> = Vec::new();
        for chunk_counts in &counts {
            let mut terms: Vec<&String> = chunk_counts.keys().collect();
            terms.sort();
            for term in terms {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(term.clone()).or_insert(next_id);
                if id == document_frequency.len() {
                    document_frequency.push(0);
                }
                document_frequency[id] += 1;
            }
        }

        let total = chunks.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + total) / (1.0 + f64::from(df))).ln() + 1.0)
            .collect();

        let vectors = counts
            .par_iter()
            .map(|chunk_counts| weigh(chunk_counts, &vocabulary, &idf))
            .collect();

        Self {
            chunks,
            vocabulary,
            idf,
            vectors,
        }
    }

    /// Indexed chunks in id order
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Distinct terms across all chunks
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity between the query and every chunk, top `k` above threshold
    #[must_use]
    pub fn retrieve(&self, query: &str, params: RetrievalParams) -> Vec<RetrievalResult> {
        if self.chunks.is_empty() || params.top_k == 0 {
            return Vec::new();
        }

        let query_vector: HashMap<usize, f64> =
            weigh(&term_counts(query), &self.vocabulary, &self.idf)
                .into_iter()
                .collect();
        if query_vector.is_empty() {
            return Vec::new();
        }

        let scores = self.vectors.iter().enumerate().map(|(position, vector)| {
            let dot: f64 = vector
                .iter()
                .filter_map(|(term, weight)| query_vector.get(term).map(|q| q * weight))
                .sum();
            (position, dot)
        });

        rank(&self.chunks, scores, params)
    }
}

/// L2-normalized TF-IDF vector; terms outside the vocabulary are ignored
fn weigh(counts: &HashMap<String, u32>, vocabulary: &HashMap<String, usize>, idf: &[f64]) -> SparseVector {
    let mut vector: SparseVector = counts
        .iter()
        .filter_map(|(term, &count)| {
            vocabulary
                .get(term)
                .map(|&id| (id, f64::from(count) * idf[id]))
        })
        .collect();
    vector.sort_by_key(|(id, _)| *id);

    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in &mut vector {
            *weight /= norm;
        }
    }
    vector
}
