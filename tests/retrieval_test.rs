// ABOUTME: Integration tests for corpus loading, chunking, and both ranking strategies
// ABOUTME: Builds indexes from a temporary knowledge base directory on disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fs;

use pierre_coach::config::{RetrievalConfig, RetrievalStrategy};
use pierre_coach::rag::{load_corpus, RetrievalParams, Retriever, SearchIndex};
use tempfile::TempDir;

fn knowledge_base() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("b_strength.md"),
        "# Strength basics\nSquats, push-ups, and rows cover most beginner strength needs. Two sessions per week is plenty.",
    )
    .unwrap();
    fs::write(
        dir.path().join("a_sleep.txt"),
        "Sleep seven to nine hours. Recovery happens while you sleep.",
    )
    .unwrap();
    fs::write(dir.path().join("notes.json"), "{\"ignored\": true}").unwrap();
    dir
}

fn config(dir: &TempDir, strategy: RetrievalStrategy) -> RetrievalConfig {
    RetrievalConfig {
        knowledge_base_path: dir.path().to_path_buf(),
        strategy,
        ..RetrievalConfig::default()
    }
}

fn params() -> RetrievalParams {
    RetrievalParams {
        top_k: 3,
        min_score: 0.05,
    }
}

#[tokio::test]
async fn test_corpus_loads_markdown_and_text_sorted_by_name() {
    common::init_test_logging();
    let dir = knowledge_base();

    let documents = load_corpus(dir.path()).await;
    let sources: Vec<&str> = documents.iter().map(|d| d.source.as_str()).collect();
    assert_eq!(sources, vec!["a_sleep.txt", "b_strength.md"]);
}

#[tokio::test]
async fn test_tfidf_finds_the_relevant_document() {
    let dir = knowledge_base();
    let index = SearchIndex::from_config(&config(&dir, RetrievalStrategy::TfIdf)).await;

    assert_eq!(index.strategy(), RetrievalStrategy::TfIdf);
    assert_eq!(index.chunks().len(), 2);

    let results = index.retrieve("how many hours of sleep do I need", params());
    assert_eq!(results[0].chunk.source, "a_sleep.txt");
    assert!(results[0].score > 0.05);
}

#[tokio::test]
async fn test_bm25_finds_the_relevant_document() {
    let dir = knowledge_base();
    let index = SearchIndex::from_config(&config(&dir, RetrievalStrategy::Bm25)).await;

    let results = index.retrieve("beginner squats and rows", params());
    assert_eq!(results[0].chunk.source, "b_strength.md");
}

#[tokio::test]
async fn test_results_are_sorted_and_bounded() {
    let dir = knowledge_base();
    for strategy in [RetrievalStrategy::TfIdf, RetrievalStrategy::Bm25] {
        let index = SearchIndex::from_config(&config(&dir, strategy)).await;
        let results = index.retrieve(
            "sleep strength recovery squats",
            RetrievalParams {
                top_k: 1,
                min_score: 0.0,
            },
        );
        assert_eq!(results.len(), 1);

        let all = index.retrieve(
            "sleep strength recovery squats",
            RetrievalParams {
                top_k: 10,
                min_score: 0.0,
            },
        );
        assert!(all.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }
}

#[tokio::test]
async fn test_missing_directory_gives_empty_index() {
    let dir = TempDir::new().unwrap();
    let mut missing = config(&dir, RetrievalStrategy::TfIdf);
    missing.knowledge_base_path = dir.path().join("does-not-exist");

    let index = SearchIndex::from_config(&missing).await;
    assert!(index.is_empty());
    assert!(index.retrieve("sleep", params()).is_empty());
}

#[tokio::test]
async fn test_long_documents_are_split_with_overlap() {
    let dir = TempDir::new().unwrap();
    let paragraph = "Walking after meals helps blood sugar and is easy to start. ".repeat(40);
    fs::write(dir.path().join("walking.md"), &paragraph).unwrap();

    let mut settings = config(&dir, RetrievalStrategy::Bm25);
    settings.chunk_size = 300;
    settings.chunk_overlap = 50;
    let index = SearchIndex::from_config(&settings).await;

    assert!(index.chunks().len() > 1);
    assert!(index.chunks().iter().all(|c| c.text.chars().count() <= 300));
    let ids: Vec<usize> = index.chunks().iter().map(|c| c.id).collect();
    assert_eq!(ids, (0..ids.len()).collect::<Vec<_>>());
}
