// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, fixture corpora, scripted providers, and ServerResources builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
//! Shared test utilities for `pierre_coach`

use std::env;
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use pierre_coach::config::{RetrievalStrategy, ServerConfig};
use pierre_coach::errors::AppError;
use pierre_coach::llm::{ChatRequest, ChatResponse, LlmProvider};
use pierre_coach::rag::{Document, DocumentIndexer, SearchIndex};
use pierre_coach::resources::ServerResources;
use pierre_coach::server::build_router;
use tokio::time::sleep;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Small beginner corpus covering walking, strength, and protein
pub fn fixture_documents() -> Vec<Document> {
    vec![
        Document {
            source: "walking.md".to_owned(),
            text: "# Walking\nBrisk walking most days builds an aerobic base. Start with ten minutes and add five each week.".to_owned(),
        },
        Document {
            source: "strength.md".to_owned(),
            text: "# Strength\nTwo full body strength sessions a week are enough for beginners. Rest a day between sessions so muscles recover.".to_owned(),
        },
        Document {
            source: "protein.md".to_owned(),
            text: "# Protein\nInclude a protein source with each meal. Eggs, beans, fish, and yogurt are simple options.".to_owned(),
        },
    ]
}

/// Index over [`fixture_documents`]
pub fn fixture_index(strategy: RetrievalStrategy) -> Arc<SearchIndex> {
    let indexer = DocumentIndexer::new(800, 100);
    Arc::new(SearchIndex::from_documents(
        strategy,
        &indexer,
        &fixture_documents(),
    ))
}

/// How a [`ScriptedProvider`] answers
#[derive(Debug, Clone)]
pub enum Script {
    /// Return this text
    Reply(String),
    /// Fail with a service error
    Fail,
    /// Never answer within the test timeout
    Stall,
}

/// Generation backend with a fixed behavior
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    script: Script,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            script: Script::Reply(text.to_owned()),
        }
    }

    pub const fn failing() -> Self {
        Self {
            script: Script::Fail,
        }
    }

    pub const fn stalling() -> Self {
        Self {
            script: Script::Stall,
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn default_model(&self) -> &str {
        "scripted-1"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        match &self.script {
            Script::Reply(text) => Ok(ChatResponse {
                content: text.clone(),
                model: "scripted-1".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Script::Fail => Err(AppError::external_service("scripted", "upstream failure")),
            Script::Stall => {
                sleep(Duration::from_secs(30)).await;
                Err(AppError::internal("stall elapsed"))
            }
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(!matches!(self.script, Script::Fail))
    }
}

/// Configuration with a short generation timeout
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.generation.timeout = Duration::from_millis(200);
    config
}

/// Resources over the fixture corpus with an optional backend
pub fn create_test_server_resources(
    provider: Option<Arc<dyn LlmProvider>>,
) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(
        test_config(),
        fixture_index(RetrievalStrategy::TfIdf),
        provider,
    ))
}

/// Full router, middleware included, in fallback mode
pub fn create_test_router() -> Router {
    build_router(create_test_server_resources(None))
}

/// Full router backed by a scripted provider
pub fn create_test_router_with(provider: ScriptedProvider) -> Router {
    build_router(create_test_server_resources(Some(Arc::new(provider))))
}
