// ABOUTME: Environment configuration management for the coach server
// ABOUTME: Parses HTTP, retrieval, history, and generation settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration for deployment

use std::env;
use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::types::{Environment, LlmProviderType, LogLevel, RetrievalStrategy};
use crate::constants::{generation, history, limits, ports, retrieval};

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Allowed CORS origins, `*` for any
    pub cors_allowed_origins: Vec<String>,
    /// Request body cap in bytes
    pub request_body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: ports::DEFAULT_HOST.to_owned(),
            port: ports::DEFAULT_HTTP_PORT,
            cors_allowed_origins: vec!["*".to_owned()],
            request_body_limit_bytes: limits::DEFAULT_REQUEST_BODY_LIMIT_BYTES,
        }
    }
}

/// Corpus indexing and retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory holding the `.md`/`.txt` corpus
    pub knowledge_base_path: PathBuf,
    /// Target window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive windows in characters
    pub chunk_overlap: usize,
    /// Ranking function, fixed for the process lifetime
    pub strategy: RetrievalStrategy,
    /// Results returned per query
    pub top_k: usize,
    /// Relevance threshold; scores must exceed it
    pub min_score: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            knowledge_base_path: PathBuf::from(retrieval::DEFAULT_KNOWLEDGE_BASE_PATH),
            chunk_size: retrieval::DEFAULT_CHUNK_SIZE,
            chunk_overlap: retrieval::DEFAULT_CHUNK_OVERLAP,
            strategy: RetrievalStrategy::default(),
            top_k: retrieval::DEFAULT_TOP_K,
            min_score: retrieval::DEFAULT_MIN_SCORE,
        }
    }
}

/// Conversation history settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Transcript length above which compaction runs
    pub compaction_trigger: usize,
    /// Oldest non-system turns collapsed per compaction
    pub compaction_batch: usize,
    /// Characters of recent history forwarded to the model
    pub prompt_char_budget: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            compaction_trigger: history::DEFAULT_COMPACTION_TRIGGER,
            compaction_batch: history::DEFAULT_COMPACTION_BATCH,
            prompt_char_budget: history::DEFAULT_PROMPT_CHAR_BUDGET,
        }
    }
}

/// Generation backend settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Selected backend
    pub provider: LlmProviderType,
    /// Per-request generation window
    pub timeout: Duration,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token cap
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            timeout: Duration::from_secs(generation::DEFAULT_TIMEOUT_SECS),
            temperature: generation::DEFAULT_TEMPERATURE,
            max_tokens: generation::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Log level echoed in the startup summary
    pub log_level: LogLevel,
    /// HTTP listener
    pub http: HttpConfig,
    /// Corpus and retrieval
    pub retrieval: RetrievalConfig,
    /// History compaction and prompt budget
    pub history: HistoryConfig,
    /// Generation backend
    pub generation: GenerationConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// resulting configuration fails [`ServerConfig::validate`]
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development")),
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            http: HttpConfig {
                host: env_var_or("HOST", ports::DEFAULT_HOST),
                port: parse_env("HTTP_PORT", ports::DEFAULT_HTTP_PORT)?,
                cors_allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
                request_body_limit_bytes: parse_env(
                    "REQUEST_BODY_LIMIT_BYTES",
                    limits::DEFAULT_REQUEST_BODY_LIMIT_BYTES,
                )?,
            },
            retrieval: RetrievalConfig {
                knowledge_base_path: PathBuf::from(env_var_or(
                    "KNOWLEDGE_BASE_PATH",
                    retrieval::DEFAULT_KNOWLEDGE_BASE_PATH,
                )),
                chunk_size: parse_env("CHUNK_SIZE", retrieval::DEFAULT_CHUNK_SIZE)?,
                chunk_overlap: parse_env("CHUNK_OVERLAP", retrieval::DEFAULT_CHUNK_OVERLAP)?,
                strategy: RetrievalStrategy::from_str_or_default(&env_var_or(
                    "RETRIEVAL_STRATEGY",
                    "tfidf",
                )),
                top_k: parse_env("RETRIEVAL_TOP_K", retrieval::DEFAULT_TOP_K)?,
                min_score: parse_env("RETRIEVAL_MIN_SCORE", retrieval::DEFAULT_MIN_SCORE)?,
            },
            history: HistoryConfig {
                compaction_trigger: parse_env(
                    "HISTORY_COMPACTION_TRIGGER",
                    history::DEFAULT_COMPACTION_TRIGGER,
                )?,
                compaction_batch: parse_env(
                    "HISTORY_COMPACTION_BATCH",
                    history::DEFAULT_COMPACTION_BATCH,
                )?,
                prompt_char_budget: parse_env(
                    "PROMPT_HISTORY_CHAR_BUDGET",
                    history::DEFAULT_PROMPT_CHAR_BUDGET,
                )?,
            },
            generation: GenerationConfig {
                provider: LlmProviderType::from_env(),
                timeout: Duration::from_secs(parse_env(
                    "LLM_TIMEOUT_SECS",
                    generation::DEFAULT_TIMEOUT_SECS,
                )?),
                temperature: parse_env("LLM_TEMPERATURE", generation::DEFAULT_TEMPERATURE)?,
                max_tokens: parse_env("LLM_MAX_TOKENS", generation::DEFAULT_MAX_TOKENS)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error when a setting would make indexing, retrieval, or
    /// compaction meaningless
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.chunk_size == 0 {
            bail!("CHUNK_SIZE must be greater than zero");
        }
        if self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            bail!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.retrieval.chunk_overlap,
                self.retrieval.chunk_size
            );
        }
        if self.retrieval.top_k == 0 {
            bail!("RETRIEVAL_TOP_K must be greater than zero");
        }
        if self.history.compaction_batch == 0
            || self.history.compaction_batch > self.history.compaction_trigger
        {
            bail!(
                "HISTORY_COMPACTION_BATCH ({}) must be between 1 and HISTORY_COMPACTION_TRIGGER ({})",
                self.history.compaction_batch,
                self.history.compaction_trigger
            );
        }
        if self.generation.timeout.is_zero() {
            bail!("LLM_TIMEOUT_SECS must be greater than zero");
        }
        if self.http.cors_allowed_origins.is_empty() {
            warn!("CORS_ALLOWED_ORIGINS is empty; browsers will reject cross-origin calls");
        }
        Ok(())
    }

    /// Whole-request timeout for the HTTP layer
    ///
    /// At least the fixed floor, and always longer than the generation
    /// window, so a stalled backend is cut off by the generator first.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let floor = Duration::from_secs(limits::REQUEST_TIMEOUT_SECS);
        let after_generation = self
            .generation
            .timeout
            .saturating_add(Duration::from_secs(limits::REQUEST_TIMEOUT_MARGIN_SECS));
        floor.max(after_generation)
    }

    /// One-line-per-setting summary for the startup log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pierre Coach Configuration:\n\
             - Environment: {}\n\
             - Listen: {}:{}\n\
             - Log Level: {}\n\
             - Knowledge Base: {}\n\
             - Chunking: {} chars, {} overlap\n\
             - Retrieval: {} (top {}, min score {})\n\
             - History Compaction: above {} turns, collapse {}\n\
             - Generation: {} (timeout {}s, temperature {}, max tokens {})\n\
             - CORS Origins: {}",
            self.environment,
            self.http.host,
            self.http.port,
            self.log_level,
            self.retrieval.knowledge_base_path.display(),
            self.retrieval.chunk_size,
            self.retrieval.chunk_overlap,
            self.retrieval.strategy,
            self.retrieval.top_k,
            self.retrieval.min_score,
            self.history.compaction_trigger,
            self.history.compaction_batch,
            self.generation.provider,
            self.generation.timeout.as_secs(),
            self.generation.temperature,
            self.generation.max_tokens,
            self.http.cors_allowed_origins.join(","),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const MANAGED_VARS: &[&str] = &[
        "HTTP_PORT",
        "CHUNK_SIZE",
        "CHUNK_OVERLAP",
        "RETRIEVAL_STRATEGY",
        "RETRIEVAL_TOP_K",
        "HISTORY_COMPACTION_TRIGGER",
        "HISTORY_COMPACTION_BATCH",
        "PIERRE_LLM_PROVIDER",
        "LLM_TIMEOUT_SECS",
    ];

    fn clear_managed_vars() {
        for key in MANAGED_VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://coach.example.com,"),
            vec!["http://localhost:3000", "https://coach.example.com"]
        );
    }

    #[test]
    fn test_defaults_validate() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let mut config = ServerConfig::default();
        config.retrieval.chunk_overlap = config.retrieval.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_cannot_exceed_trigger() {
        let mut config = ServerConfig::default();
        config.history.compaction_batch = config.history.compaction_trigger + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_managed_vars();
        env::set_var("HTTP_PORT", "9100");
        env::set_var("RETRIEVAL_STRATEGY", "bm25");
        env::set_var("RETRIEVAL_TOP_K", "5");
        env::set_var("PIERRE_LLM_PROVIDER", "none");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http.port, 9100);
        assert_eq!(config.retrieval.strategy, RetrievalStrategy::Bm25);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.generation.provider, LlmProviderType::Disabled);

        clear_managed_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_garbage_numbers() {
        clear_managed_vars();
        env::set_var("CHUNK_SIZE", "lots");

        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("CHUNK_SIZE"));

        clear_managed_vars();
    }

    #[test]
    fn test_request_timeout_defaults_to_floor() {
        assert_eq!(
            ServerConfig::default().request_timeout(),
            Duration::from_secs(limits::REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    #[serial]
    fn test_long_generation_window_extends_request_timeout() {
        clear_managed_vars();
        env::set_var("PIERRE_LLM_PROVIDER", "none");
        env::set_var("LLM_TIMEOUT_SECS", "90");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.generation.timeout, Duration::from_secs(90));
        assert!(config.request_timeout() > config.generation.timeout);
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(90 + limits::REQUEST_TIMEOUT_MARGIN_SECS)
        );

        clear_managed_vars();
    }

    #[test]
    fn test_summary_mentions_strategy() {
        let summary = ServerConfig::default().summary();
        assert!(summary.contains("Retrieval: tfidf"));
        assert!(summary.contains("collapse 40"));
    }
}
