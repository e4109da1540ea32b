// ABOUTME: Tokenizer shared by index construction and query scoring
// ABOUTME: Lowercases, splits on non-alphanumerics, and drops stopwords and single characters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Common English words that carry no retrieval signal
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "before", "but", "by", "can", "could", "did", "do", "does", "doing", "for", "from",
    "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into",
    "is", "it", "its", "just", "me", "more", "most", "my", "no", "not", "now", "of", "on",
    "one", "only", "or", "other", "our", "out", "over", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "to", "too", "up", "us", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "why", "will", "with", "would", "you", "your",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Split text into lowercase index terms
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|raw| raw.chars().count() >= 2)
        .map(str::to_lowercase)
        .filter(|term| !STOPWORD_SET.contains(term.as_str()))
        .collect()
}

/// Term counts for a piece of text
#[must_use]
pub fn term_counts(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for term in tokenize(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stopwords_and_punctuation() {
        let terms = tokenize("How often should I do Full-Body workouts?");
        assert_eq!(terms, vec!["often", "full", "body", "workouts"]);
    }

    #[test]
    fn test_term_counts() {
        let counts = term_counts("Protein, protein and more PROTEIN.");
        assert_eq!(counts.get("protein"), Some(&3));
        assert!(!counts.contains_key("and"));
    }
}
