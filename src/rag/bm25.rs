// ABOUTME: Okapi BM25 ranking over chunks as an alternative retrieval strategy
// ABOUTME: Term statistics are computed once at startup; queries only read them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use super::tokenizer::{term_counts, tokenize};
use super::{rank, Chunk, RetrievalParams, RetrievalResult};
use crate::constants::retrieval::{BM25_B, BM25_K1};

/// Immutable BM25 index
#[derive(Debug)]
pub struct Bm25Index {
    chunks: Vec<Chunk>,
    term_frequencies: Vec<HashMap<String, u32>>,
    lengths: Vec<f64>,
    average_length: f64,
    idf: HashMap<String, f64>,
}

impl Bm25Index {
    /// Compute term statistics for every chunk
    #[must_use]
    pub fn new(chunks: Vec<Chunk>) -> Self {
        let term_frequencies: Vec<HashMap<String, u32>> =
            chunks.par_iter().map(|chunk| term_counts(&chunk.text)).collect();
        let lengths: Vec<f64> = term_frequencies
            .iter()
            .map(|counts| f64::from(counts.values().sum::<u32>()))
            .collect();
        let average_length = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<f64>() / lengths.len() as f64
        };

        let mut document_frequency: HashMap<&str, u32> = HashMap::new();
        for counts in &term_frequencies {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let total = chunks.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let df = f64::from(df);
                (term.to_owned(), (1.0 + (total - df + 0.5) / (df + 0.5)).ln())
            })
            .collect();

        Self {
            chunks,
            term_frequencies,
            lengths,
            average_length,
            idf,
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
        self.idf.len()
    }

    /// BM25 score of the query against every chunk, top `k` above threshold
    #[must_use]
    pub fn retrieve(&self, query: &str, params: RetrievalParams) -> Vec<RetrievalResult> {
        if self.chunks.is_empty() || params.top_k == 0 {
            return Vec::new();
        }

        let query_terms: HashSet<String> = tokenize(query)
            .into_iter()
            .filter(|term| self.idf.contains_key(term))
            .collect();
        if query_terms.is_empty() {
            return Vec::new();
        }

        let scores = self
            .term_frequencies
            .iter()
            .zip(&self.lengths)
            .enumerate()
            .map(|(position, (counts, &length))| {
                let score = query_terms
                    .iter()
                    .map(|term| self.term_score(term, counts, length))
                    .sum::<f64>();
                (position, score)
            });

        rank(&self.chunks, scores, params)
    }

    fn term_score(&self, term: &str, counts: &HashMap<String, u32>, length: f64) -> f64 {
        let Some(&frequency) = counts.get(term) else {
            return 0.0;
        };
        let idf = self.idf.get(term).copied().unwrap_or(0.0);
        let frequency = f64::from(frequency);
        let normalizer = if self.average_length > 0.0 {
            BM25_K1 * (1.0 - BM25_B + BM25_B * length / self.average_length)
        } else {
            BM25_K1
        };
        idf * frequency * (BM25_K1 + 1.0) / (frequency + normalizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(texts: &[&str]) -> Bm25Index {
        Bm25Index::new(
            texts
                .iter()
                .enumerate()
                .map(|(id, text)| Chunk {
                    id,
                    source: "fixture.md".to_owned(),
                    text: (*text).to_owned(),
                })
                .collect(),
        )
    }

    const PARAMS: RetrievalParams = RetrievalParams {
        top_k: 2,
        min_score: 0.0,
    };

    #[test]
    fn test_rare_term_outranks_common_term() {
        let index = index(&[
            "Training plan: strength training twice weekly.",
            "Training plan with mobility drills and stretching.",
            "Training plan for a brisk walk.",
        ]);
        let results = index.retrieve("mobility training", PARAMS);
        assert_eq!(results.first().map(|r| r.chunk.id), Some(1));
    }

    #[test]
    fn test_top_k_is_respected() {
        let index = index(&["squat form", "squat depth", "squat stance"]);
        assert_eq!(index.retrieve("squat", PARAMS).len(), 2);
    }

    #[test]
    fn test_query_without_known_terms() {
        let index = index(&["deadlift basics"]);
        assert!(index.retrieve("pilates", PARAMS).is_empty());
    }
}
