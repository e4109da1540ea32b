// ABOUTME: Loads the static reference corpus from a directory once at startup
// ABOUTME: Reads .md and .txt files in name order; unreadable input degrades to an empty corpus
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::constants::retrieval::CORPUS_EXTENSIONS;

/// One corpus file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name, used as the chunk source label
    pub source: String,
    /// Full file text
    pub text: String,
}

/// Read every `.md`/`.txt` file directly inside `dir`, sorted by file name
///
/// Never fails: a missing directory, an unreadable file, or non-UTF-8 content
/// is logged and skipped.
pub async fn load_corpus(dir: &Path) -> Vec<Document> {
    let mut paths = match list_corpus_files(dir).await {
        Ok(paths) => paths,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Knowledge base directory unreadable");
            return Vec::new();
        }
    };
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let source = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        match fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => {
                debug!(source = %source, "Skipping empty corpus file");
            }
            Ok(text) => documents.push(Document { source, text }),
            Err(e) => warn!(source = %source, error = %e, "Skipping unreadable corpus file"),
        }
    }

    if documents.is_empty() {
        warn!(path = %dir.display(), "Knowledge base holds no readable documents");
    }
    documents
}

async fn list_corpus_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_file = entry.file_type().await.is_ok_and(|kind| kind.is_file());
        if is_file && has_corpus_extension(&path) {
            paths.push(path);
        }
    }
    Ok(paths)
}

fn has_corpus_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CORPUS_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        assert!(has_corpus_extension(Path::new("kb/walking.md")));
        assert!(has_corpus_extension(Path::new("kb/NOTES.TXT")));
        assert!(!has_corpus_extension(Path::new("kb/photo.png")));
        assert!(!has_corpus_extension(Path::new("kb/README")));
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty_corpus() {
        let documents = load_corpus(Path::new("/definitely/not/here/kb")).await;
        assert!(documents.is_empty());
    }
}
