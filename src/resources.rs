// ABOUTME: Shared server resources built once at startup and handed to every route
// ABOUTME: Holds the configuration, the read-only retrieval index, and the chat pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Everything a request needs, constructed before the listener opens and
//! never mutated afterwards. Routes receive it as `State<Arc<ServerResources>>`;
//! tests build it around a fixture index and a mock provider.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::chat::ChatPipeline;
use crate::config::ServerConfig;
use crate::llm::{ChatProvider, LlmProvider};
use crate::rag::SearchIndex;

/// Startup-built, read-only state shared by all handlers
#[derive(Debug)]
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Per-request chat wiring over the shared index
    pub pipeline: ChatPipeline,
    /// When the resources were built
    pub started_at: DateTime<Utc>,
}

impl ServerResources {
    /// Resources over an already-built index and an optional backend
    #[must_use]
    pub fn new(
        config: ServerConfig,
        index: Arc<SearchIndex>,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        let pipeline = ChatPipeline::from_config(&config, index, provider);
        Self {
            config: Arc::new(config),
            pipeline,
            started_at: Utc::now(),
        }
    }

    /// Index the configured corpus and connect the configured backend
    ///
    /// Neither step can fail: an unreadable corpus gives an empty index and a
    /// misconfigured backend gives fallback mode.
    pub async fn from_config(config: ServerConfig) -> Self {
        let index = Arc::new(SearchIndex::from_config(&config.retrieval).await);
        let provider = ChatProvider::from_config(&config.generation)
            .map(|provider| Arc::new(provider) as Arc<dyn LlmProvider>);
        Self::new(config, index, provider)
    }

    /// Shared retrieval index
    #[must_use]
    pub fn index(&self) -> &SearchIndex {
        self.pipeline.index()
    }
}
