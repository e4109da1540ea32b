// ABOUTME: Splits corpus documents into overlapping, whitespace-aligned text windows
// ABOUTME: Produces the flat, order-preserving chunk list consumed by every retrieval strategy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Window chunker
//!
//! Sizes are measured in characters, not bytes, so multi-byte text never
//! splits inside a code point. A window ends at the last whitespace in its
//! second half when one exists; the next window starts `overlap` characters
//! earlier, snapped forward to the start of a word.

use super::corpus::Document;
use super::Chunk;

/// Splits documents into overlapping windows
#[derive(Debug, Clone, Copy)]
pub struct DocumentIndexer {
    chunk_size: usize,
    overlap: usize,
}

impl DocumentIndexer {
    /// Create an indexer; `overlap` is clamped below `chunk_size`
    #[must_use]
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Window size in characters
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk every document, numbering chunks sequentially across all of them
    #[must_use]
    pub fn index(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|document| {
                self.split(&document.text)
                    .into_iter()
                    .map(move |text| (document.source.clone(), text))
            })
            .enumerate()
            .map(|(id, (source, text))| Chunk { id, source, text })
            .collect()
    }

    /// Split one text into trimmed, non-empty windows
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut windows = Vec::new();

        let mut start = skip_whitespace(&chars, 0);
        while start < len {
            let end = self.window_end(&chars, start);
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();
            if !trimmed.is_empty() {
                windows.push(trimmed.to_owned());
            }
            if end >= len {
                break;
            }
            start = skip_whitespace(&chars, self.next_start(&chars, start, end));
        }

        windows
    }

    /// End of the window starting at `start`, preferring a whitespace break
    fn window_end(&self, chars: &[char], start: usize) -> usize {
        let hard_end = (start + self.chunk_size).min(chars.len());
        if hard_end == chars.len() {
            return hard_end;
        }

        let earliest_break = start + self.chunk_size / 2;
        (earliest_break.max(start + 1)..hard_end)
            .rev()
            .find(|&i| chars[i].is_whitespace())
            .unwrap_or(hard_end)
    }

    /// Start of the next window: `overlap` back from `end`, aligned to a word
    fn next_start(&self, chars: &[char], start: usize, end: usize) -> usize {
        let mut next = end.saturating_sub(self.overlap).max(start + 1);
        while next < end && !chars[next - 1].is_whitespace() {
            next += 1;
        }
        next
    }
}

fn skip_whitespace(chars: &[char], mut position: usize) -> usize {
    while position < chars.len() && chars[position].is_whitespace() {
        position += 1;
    }
    position
}
