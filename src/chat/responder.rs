// ABOUTME: Response generator that makes one bounded LLM call and falls back to templates
// ABOUTME: Any provider failure, timeout, or empty reply yields the deterministic text instead
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::config::GenerationConfig;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;

/// Where a reply's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    /// The generation backend answered
    Model,
    /// The backend was absent or failed; a template answered
    Fallback,
    /// Answered from the profile without consulting the backend
    Direct,
}

impl ReplySource {
    /// Lowercase name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback => "fallback",
            Self::Direct => "direct",
        }
    }
}

/// Reply text plus its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    /// Text returned to the user
    pub text: String,
    /// Origin of `text`
    pub source: ReplySource,
}

impl GeneratedReply {
    /// Reply produced without the backend
    #[must_use]
    pub const fn direct(text: String) -> Self {
        Self {
            text,
            source: ReplySource::Direct,
        }
    }
}

/// Single-attempt generation with deterministic fallback
#[derive(Clone)]
pub struct ResponseGenerator {
    provider: Option<Arc<dyn LlmProvider>>,
    settings: GenerationConfig,
}

impl Debug for ResponseGenerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ResponseGenerator")
            .field("provider", &self.provider_name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ResponseGenerator {
    /// Generator over an optional backend; `None` means permanent fallback mode
    #[must_use]
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, settings: GenerationConfig) -> Self {
        Self { provider, settings }
    }

    /// Whether a backend is configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Backend identifier, or `none`
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.as_ref().map_or("none", |provider| provider.name())
    }

    /// Model used for generation, or `fallback`
    #[must_use]
    pub fn model_name(&self) -> String {
        self.provider
            .as_ref()
            .map_or_else(|| "fallback".to_owned(), |provider| provider.default_model().to_owned())
    }

    /// The configured backend, if any
    #[must_use]
    pub fn provider(&self) -> Option<&Arc<dyn LlmProvider>> {
        self.provider.as_ref()
    }

    /// Ask the backend once; on any failure return `fallback()` instead
    #[instrument(skip_all, fields(provider = self.provider_name(), messages = messages.len()))]
    pub async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        fallback: impl FnOnce() -> String + Send,
    ) -> GeneratedReply {
        let Some(provider) = self.provider.as_ref() else {
            debug!("No generation backend configured; using template reply");
            return Self::fallback_reply(fallback);
        };

        let request = ChatRequest::new(messages)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        let reason = match timeout(self.settings.timeout, provider.complete(&request)).await {
            Ok(Ok(response)) => {
                let text = response.content.trim();
                if !text.is_empty() {
                    return GeneratedReply {
                        text: text.to_owned(),
                        source: ReplySource::Model,
                    };
                }
                "empty reply".to_owned()
            }
            Ok(Err(error)) => error.to_string(),
            Err(_) => format!(
                "timed out after {}ms",
                self.settings.timeout.as_millis()
            ),
        };

        AppLogger::log_generation_fallback(provider.name(), &reason);
        Self::fallback_reply(fallback)
    }

    fn fallback_reply(fallback: impl FnOnce() -> String) -> GeneratedReply {
        GeneratedReply {
            text: fallback(),
            source: ReplySource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::sleep;

    use super::*;
    use crate::errors::{AppError, ErrorCode};
    use crate::llm::ChatResponse;

    enum Behavior {
        Reply(&'static str),
        Fail(ErrorCode),
        Stall,
    }

    struct ScriptedProvider(Behavior);

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn display_name(&self) -> &'static str {
            "Scripted"
        }

        fn default_model(&self) -> &str {
            "scripted-1"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
            match &self.0 {
                Behavior::Reply(text) => Ok(ChatResponse {
                    content: (*text).to_owned(),
                    model: "scripted-1".to_owned(),
                    usage: None,
                    finish_reason: Some("stop".to_owned()),
                }),
                Behavior::Fail(code) => Err(AppError::new(*code, "backend said no")),
                Behavior::Stall => {
                    sleep(Duration::from_secs(5)).await;
                    Err(AppError::internal("unreachable"))
                }
            }
        }

        async fn health_check(&self) -> Result<bool, AppError> {
            Ok(true)
        }
    }

    fn generator(behavior: Behavior) -> ResponseGenerator {
        let settings = GenerationConfig {
            timeout: Duration::from_millis(50),
            ..GenerationConfig::default()
        };
        ResponseGenerator::new(Some(Arc::new(ScriptedProvider(behavior))), settings)
    }

    async fn run(generator: &ResponseGenerator) -> GeneratedReply {
        generator
            .generate(vec![ChatMessage::user("hi")], || "template".to_owned())
            .await
    }

    #[tokio::test]
    async fn test_model_reply_is_trimmed() {
        let reply = run(&generator(Behavior::Reply("  Walk daily.\n"))).await;
        assert_eq!(reply.text, "Walk daily.");
        assert_eq!(reply.source, ReplySource::Model);
    }

    #[tokio::test]
    async fn test_failures_fall_back() {
        for code in [
            ErrorCode::ExternalAuthFailed,
            ErrorCode::ExternalRateLimited,
            ErrorCode::ExternalServiceUnavailable,
        ] {
            let reply = run(&generator(Behavior::Fail(code))).await;
            assert_eq!(reply.text, "template");
            assert_eq!(reply.source, ReplySource::Fallback);
        }
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let reply = run(&generator(Behavior::Reply("   "))).await;
        assert_eq!(reply.source, ReplySource::Fallback);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let reply = run(&generator(Behavior::Stall)).await;
        assert_eq!(reply.text, "template");
        assert_eq!(reply.source, ReplySource::Fallback);
    }

    #[tokio::test]
    async fn test_unconfigured_generator() {
        let generator = ResponseGenerator::new(None, GenerationConfig::default());
        assert!(!generator.is_configured());
        assert_eq!(generator.provider_name(), "none");
        assert_eq!(generator.model_name(), "fallback");
        assert_eq!(run(&generator).await.source, ReplySource::Fallback);
    }
}
