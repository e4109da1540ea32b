// ABOUTME: OpenAI-compatible chat completions provider for OpenRouter and local servers
// ABOUTME: Supports OpenRouter, Ollama, vLLM, LocalAI, and any chat/completions endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! One implementation for every endpoint that speaks the `OpenAI` chat
//! completions API.
//!
//! ## Configuration
//!
//! `OpenRouter`:
//! - `OPENROUTER_API_KEY`: API key (required)
//! - `OPENROUTER_MODEL`: model id (default `mistralai/mistral-7b-instruct`)
//! - `OPENROUTER_BASE_URL`: base URL (default <https://openrouter.ai/api/v1>)
//!
//! Local servers:
//! - `LOCAL_LLM_BASE_URL`: base URL (default <http://localhost:11434/v1> for Ollama)
//! - `LOCAL_LLM_MODEL`: model to use (default `qwen2.5:7b-instruct`)
//! - `LOCAL_LLM_API_KEY`: API key (optional, empty for local servers)

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::constants::generation::CONNECT_TIMEOUT_SECS;
use crate::errors::{AppError, ErrorCode};

// ============================================================================
// Configuration Constants
// ============================================================================

const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const OPENROUTER_MODEL_ENV: &str = "OPENROUTER_MODEL";
const OPENROUTER_BASE_URL_ENV: &str = "OPENROUTER_BASE_URL";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENROUTER_MODEL: &str = "mistralai/mistral-7b-instruct";

const LOCAL_LLM_BASE_URL_ENV: &str = "LOCAL_LLM_BASE_URL";
const LOCAL_LLM_MODEL_ENV: &str = "LOCAL_LLM_MODEL";
const LOCAL_LLM_API_KEY_ENV: &str = "LOCAL_LLM_API_KEY";
const LOCAL_BASE_URL: &str = "http://localhost:11434/v1";
const LOCAL_MODEL: &str = "qwen2.5:7b-instruct";

/// Attribution headers `OpenRouter` asks clients to send
const OPENROUTER_REFERER: &str = "http://localhost";
const OPENROUTER_TITLE: &str = "Pierre Coach";

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Which kind of endpoint a config points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// Hosted `OpenRouter` API
    OpenRouter,
    /// Self-hosted server (Ollama, vLLM, `LocalAI`)
    Local,
}

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Endpoint kind, used for naming and headers
    pub kind: EndpointKind,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// `OpenRouter` configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENROUTER_API_KEY` is not set or empty.
    pub fn openrouter_from_env(timeout: Duration) -> Result<Self, AppError> {
        let api_key = env::var(OPENROUTER_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AppError::config(format!("{OPENROUTER_API_KEY_ENV} environment variable not set"))
            })?;

        Ok(Self {
            base_url: env::var(OPENROUTER_BASE_URL_ENV)
                .unwrap_or_else(|_| OPENROUTER_BASE_URL.to_owned()),
            api_key: Some(api_key),
            default_model: env::var(OPENROUTER_MODEL_ENV)
                .unwrap_or_else(|_| OPENROUTER_MODEL.to_owned()),
            kind: EndpointKind::OpenRouter,
            timeout,
        })
    }

    /// Local server configuration from environment variables
    #[must_use]
    pub fn local_from_env(timeout: Duration) -> Self {
        Self {
            base_url: env::var(LOCAL_LLM_BASE_URL_ENV).unwrap_or_else(|_| LOCAL_BASE_URL.to_owned()),
            api_key: env::var(LOCAL_LLM_API_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty()),
            default_model: env::var(LOCAL_LLM_MODEL_ENV).unwrap_or_else(|_| LOCAL_MODEL.to_owned()),
            kind: EndpointKind::Local,
            timeout,
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            Self::display_name_for(config.kind),
            config.base_url,
            config.default_model
        );

        Ok(Self { client, config })
    }

    const fn display_name_for(kind: EndpointKind) -> &'static str {
        match kind {
            EndpointKind::OpenRouter => "OpenRouter",
            EndpointKind::Local => "Local LLM",
        }
    }

    /// Service name used in error messages
    const fn service(&self) -> &'static str {
        match self.config.kind {
            EndpointKind::OpenRouter => "OpenRouter",
            EndpointKind::Local => "LocalLLM",
        }
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Parse error response from API
    fn parse_error_response(&self, status: StatusCode, body: &str) -> AppError {
        let service = self.service();
        let message = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |response| response.error.message,
        );

        match status.as_u16() {
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{service} authentication failed: {message}"),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("{service} rate limit reached: {message}"),
            ),
            400 => AppError::external_service(service, format!("Request rejected: {message}")),
            404 => AppError::external_service(
                service,
                format!("Model or endpoint not found: {message}"),
            ),
            500..=599 => AppError::external_unavailable(service, message),
            other => AppError::external_service(service, format!("API error ({other}): {message}")),
        }
    }

    /// Add authorization and attribution headers
    fn add_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match self.config.api_key {
            Some(ref api_key) => request.header("Authorization", format!("Bearer {api_key}")),
            None => request,
        };
        match self.config.kind {
            EndpointKind::OpenRouter => request
                .header("HTTP-Referer", OPENROUTER_REFERER)
                .header("X-Title", OPENROUTER_TITLE),
            EndpointKind::Local => request,
        }
    }

    fn build_request(&self, request: &ChatRequest) -> OpenAiRequest {
        OpenAiRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        match self.config.kind {
            EndpointKind::OpenRouter => "openrouter",
            EndpointKind::Local => "local",
        }
    }

    fn display_name(&self) -> &'static str {
        Self::display_name_for(self.config.kind)
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let openai_request = self.build_request(request);
        debug!(
            "Sending chat completion request to {} with {} messages",
            self.name(),
            openai_request.messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        let response = self.add_headers(http_request).send().await.map_err(|e| {
            error!("Failed to send request to {}: {}", self.name(), e);
            if e.is_timeout() {
                AppError::external_unavailable(self.service(), "Request timed out")
            } else {
                AppError::external_unavailable(
                    self.service(),
                    format!("Cannot reach {}: {e}", self.config.base_url),
                )
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(self.service(), format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            AppError::external_service(self.service(), format!("Failed to parse response: {e}"))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(self.service(), "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.name(),
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response
                .model
                .unwrap_or(openai_request.model),
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let http_request = self.client.get(self.api_url("models"));

        let response = self.add_headers(http_request).send().await.map_err(|e| {
            error!("{} health check failed: {}", self.name(), e);
            AppError::external_unavailable(self.service(), format!("Health check failed: {e}"))
        })?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!(
                "{} health check failed with status: {}",
                self.name(),
                response.status()
            );
        }

        Ok(healthy)
    }
}

impl Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("base_url", &self.config.base_url)
            .field("default_model", &self.config.default_model)
            .field("api_key", &self.config.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(kind: EndpointKind) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
            base_url: "http://localhost:11434/v1/".to_owned(),
            api_key: Some("sk-test".to_owned()),
            default_model: "test-model".to_owned(),
            kind,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_api_url_trims_slash() {
        assert_eq!(
            provider(EndpointKind::Local).api_url("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_uses_default_model() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")]).with_max_tokens(180);
        let body = serde_json::to_value(provider(EndpointKind::OpenRouter).build_request(&request))
            .unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 180);
        assert_eq!(body["stream"], false);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_error_mapping() {
        let local = provider(EndpointKind::Local);
        let body = r#"{"error":{"message":"bad key","type":"auth"}}"#;
        assert_eq!(
            local.parse_error_response(StatusCode::UNAUTHORIZED, body).code,
            ErrorCode::ExternalAuthFailed
        );
        assert_eq!(
            local.parse_error_response(StatusCode::TOO_MANY_REQUESTS, body).code,
            ErrorCode::ExternalRateLimited
        );
        assert_eq!(
            local.parse_error_response(StatusCode::BAD_GATEWAY, "<html>").code,
            ErrorCode::ExternalServiceUnavailable
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(provider(EndpointKind::OpenRouter).name(), "openrouter");
        assert_eq!(provider(EndpointKind::Local).display_name(), "Local LLM");
    }
}
