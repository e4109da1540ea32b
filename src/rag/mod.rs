// ABOUTME: Retrieval-augmented grounding: corpus loading, chunking, and ranked search
// ABOUTME: Defines Chunk, RetrievalResult, the Retriever trait, and the SearchIndex strategy enum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Retrieval
//!
//! The corpus is read once at startup, split into overlapping windows by the
//! [`chunker::DocumentIndexer`], and indexed by exactly one ranking strategy.
//! The resulting [`SearchIndex`] is immutable and shared across requests
//! behind an `Arc`.
//!
//! An empty index is a valid state: every query returns no results and
//! callers answer without grounding.

/// Okapi BM25 ranking
pub mod bm25;
/// Overlapping window chunker
pub mod chunker;
/// Corpus directory loading
pub mod corpus;
/// TF-IDF vectors with cosine similarity
pub mod tfidf;
/// Shared tokenizer for indexing and queries
pub mod tokenizer;

use std::cmp::Ordering;

use serde::Serialize;

use crate::config::{RetrievalConfig, RetrievalStrategy};
use crate::logging::AppLogger;
pub use bm25::Bm25Index;
pub use chunker::DocumentIndexer;
pub use corpus::{load_corpus, Document};
pub use tfidf::TfIdfIndex;

/// A bounded window of corpus text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Sequential id, stable for the process lifetime
    pub id: usize,
    /// File name of the document the window came from
    pub source: String,
    /// Window text
    pub text: String,
}

/// One scored hit for a query
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    /// Matched chunk
    pub chunk: Chunk,
    /// Strategy-specific relevance score
    pub score: f64,
}

/// Query-time knobs
#[derive(Debug, Clone, Copy)]
pub struct RetrievalParams {
    /// Maximum results
    pub top_k: usize,
    /// Results must score strictly above this
    pub min_score: f64,
}

impl From<&RetrievalConfig> for RetrievalParams {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            top_k: config.top_k,
            min_score: config.min_score,
        }
    }
}

/// Read-only ranked search over a fixed set of chunks
pub trait Retriever: Send + Sync {
    /// Score `query` against every chunk and return the best matches
    ///
    /// Results are ordered by descending score, ties by ascending chunk id.
    /// An empty index yields an empty list.
    fn retrieve(&self, query: &str, params: RetrievalParams) -> Vec<RetrievalResult>;

    /// All indexed chunks in id order
    fn chunks(&self) -> &[Chunk];

    /// Ranking function backing this index
    fn strategy(&self) -> RetrievalStrategy;

    /// Whether the index holds no chunks
    fn is_empty(&self) -> bool {
        self.chunks().is_empty()
    }
}

/// Retrieval index with its ranking strategy chosen once at construction
#[derive(Debug)]
pub enum SearchIndex {
    /// Cosine similarity over TF-IDF vectors
    TfIdf(TfIdfIndex),
    /// Okapi BM25
    Bm25(Bm25Index),
}

impl SearchIndex {
    /// Build an index over already-chunked text
    #[must_use]
    pub fn build(strategy: RetrievalStrategy, chunks: Vec<Chunk>) -> Self {
        match strategy {
            RetrievalStrategy::TfIdf => Self::TfIdf(TfIdfIndex::new(chunks)),
            RetrievalStrategy::Bm25 => Self::Bm25(Bm25Index::new(chunks)),
        }
    }

    /// Build an index from raw documents
    #[must_use]
    pub fn from_documents(
        strategy: RetrievalStrategy,
        indexer: &DocumentIndexer,
        documents: &[Document],
    ) -> Self {
        let index = Self::build(strategy, indexer.index(documents));
        AppLogger::log_index_built(
            strategy.as_str(),
            documents.len(),
            index.chunks().len(),
            index.vocabulary_size(),
        );
        index
    }

    /// Load the configured corpus directory and index it
    ///
    /// A missing or unreadable corpus produces an empty index.
    pub async fn from_config(config: &RetrievalConfig) -> Self {
        let documents = load_corpus(&config.knowledge_base_path).await;
        let indexer = DocumentIndexer::new(config.chunk_size, config.chunk_overlap);
        Self::from_documents(config.strategy, &indexer, &documents)
    }

    /// An index with no chunks
    #[must_use]
    pub fn empty(strategy: RetrievalStrategy) -> Self {
        Self::build(strategy, Vec::new())
    }

    /// Distinct terms known to the index
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        match self {
            Self::TfIdf(index) => index.vocabulary_size(),
            Self::Bm25(index) => index.vocabulary_size(),
        }
    }
}

impl Retriever for SearchIndex {
    fn retrieve(&self, query: &str, params: RetrievalParams) -> Vec<RetrievalResult> {
        match self {
            Self::TfIdf(index) => index.retrieve(query, params),
            Self::Bm25(index) => index.retrieve(query, params),
        }
    }

    fn chunks(&self) -> &[Chunk] {
        match self {
            Self::TfIdf(index) => index.chunks(),
            Self::Bm25(index) => index.chunks(),
        }
    }

    fn strategy(&self) -> RetrievalStrategy {
        match self {
            Self::TfIdf(_) => RetrievalStrategy::TfIdf,
            Self::Bm25(_) => RetrievalStrategy::Bm25,
        }
    }
}

/// Keep scores above the threshold, order them, and materialize the top `k`
pub(crate) fn rank(
    chunks: &[Chunk],
    scores: impl IntoIterator<Item = (usize, f64)>,
    params: RetrievalParams,
) -> Vec<RetrievalResult> {
    let mut scored: Vec<(usize, f64)> = scores
        .into_iter()
        .filter(|(_, score)| score.is_finite() && *score > params.min_score)
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    scored
        .into_iter()
        .take(params.top_k)
        .filter_map(|(position, score)| {
            chunks.get(position).map(|chunk| RetrievalResult {
                chunk: chunk.clone(),
                score,
            })
        })
        .collect()
}
