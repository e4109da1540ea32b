// ABOUTME: Unified LLM provider selector chosen once from configuration at startup
// ABOUTME: Wraps Gemini, OpenRouter, or a local server; None means template-only replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Selector
//!
//! Set `PIERRE_LLM_PROVIDER` to one of:
//! - `gemini` (default): Google Gemini (requires `GEMINI_API_KEY`)
//! - `openrouter`: `OpenRouter` hosted models (requires `OPENROUTER_API_KEY`)
//! - `local`/`ollama`/`vllm`/`localai`: any local `OpenAI`-compatible server
//! - `none`: no backend; the coach answers from deterministic templates
//!
//! A selected provider whose credentials are missing is a configuration
//! error for generation only: [`ChatProvider::from_config`] reports it and
//! the server keeps running in fallback mode.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{
    ChatRequest, ChatResponse, GeminiProvider, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};
use crate::config::{GenerationConfig, LlmProviderType};
use crate::errors::AppError;

/// Unified chat provider that wraps Gemini, `OpenRouter`, or a local LLM
pub enum ChatProvider {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// `OpenRouter` through the `OpenAI`-compatible API
    OpenRouter(OpenAiCompatibleProvider),
    /// Local LLM via `OpenAI`-compatible API (Ollama, vLLM, `LocalAI`)
    Local(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Create the configured provider
    ///
    /// Returns `Ok(None)` when generation is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected provider's credentials are missing or
    /// its HTTP client cannot be built.
    pub fn create(provider_type: LlmProviderType, timeout: Duration) -> Result<Option<Self>, AppError> {
        let provider = match provider_type {
            LlmProviderType::Disabled => return Ok(None),
            LlmProviderType::Gemini => Self::Gemini(GeminiProvider::from_env(timeout)?),
            LlmProviderType::OpenRouter => Self::OpenRouter(OpenAiCompatibleProvider::new(
                OpenAiCompatibleConfig::openrouter_from_env(timeout)?,
            )?),
            LlmProviderType::Local => Self::Local(OpenAiCompatibleProvider::new(
                OpenAiCompatibleConfig::local_from_env(timeout),
            )?),
        };
        debug!(
            "Provider {} initialized with model: {}",
            provider.display_name(),
            provider.default_model()
        );
        Ok(Some(provider))
    }

    /// Create the provider named by the generation settings, degrading to
    /// fallback mode when it cannot be initialized
    #[must_use]
    pub fn from_config(config: &GenerationConfig) -> Option<Self> {
        info!(
            "Initializing LLM provider: {} (set {} to change)",
            config.provider,
            LlmProviderType::ENV_VAR
        );
        match Self::create(config.provider, config.timeout) {
            Ok(Some(provider)) => Some(provider),
            Ok(None) => {
                info!("Generation disabled; replies come from deterministic templates");
                None
            }
            Err(error) => {
                warn!(
                    provider = %config.provider,
                    %error,
                    "LLM provider unavailable; running in fallback mode"
                );
                None
            }
        }
    }

    fn inner(&self) -> &dyn LlmProvider {
        match self {
            Self::Gemini(p) => p,
            Self::OpenRouter(p) | Self::Local(p) => p,
        }
    }
}

impl Debug for ChatProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Gemini(_) => f.debug_tuple("ChatProvider::Gemini").finish(),
            Self::OpenRouter(_) => f.debug_tuple("ChatProvider::OpenRouter").finish(),
            Self::Local(_) => f.debug_tuple("ChatProvider::Local").finish(),
        }
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn display_name(&self) -> &'static str {
        self.inner().display_name()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.inner().complete(request).await
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        self.inner().health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_provider_is_none() {
        let created = ChatProvider::create(LlmProviderType::Disabled, Duration::from_secs(1));
        assert!(matches!(created, Ok(None)));
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let created = ChatProvider::create(LlmProviderType::Local, Duration::from_secs(1)).unwrap();
        let provider = created.unwrap();
        assert_eq!(provider.name(), "local");
    }
}
