// ABOUTME: System-wide constants and default configuration values for Pierre Coach
// ABOUTME: Groups service identity, routes, retrieval, history, and generation defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded defaults used when the matching environment variable is unset.
//! `config::environment` is the only place that reads the environment.

/// Service identity
pub mod service {
    /// Service name used in logs and the health endpoint
    pub const SERVICE_NAME: &str = "pierre-coach";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Message returned by the status route
    pub const STATUS_MESSAGE: &str = "AI Fitness Coach running";
}

/// Network defaults
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;

    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
}

/// Route paths
pub mod routes {
    /// Status document
    pub const STATUS: &str = "/";
    /// Liveness probe used by container orchestrators
    pub const HEALTHZ: &str = "/healthz";
    /// Detailed health document
    pub const HEALTH: &str = "/health";
    /// Readiness probe
    pub const READY: &str = "/ready";
    /// Primary chat endpoint
    pub const CHAT: &str = "/api/v1/chat";
}

/// Request limits
pub mod limits {
    /// Default request body cap (1 MiB)
    pub const DEFAULT_REQUEST_BODY_LIMIT_BYTES: usize = 1024 * 1024;

    /// Floor for the whole-request timeout, generation included
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Time the request keeps after the generation window closes, for the fallback reply
    pub const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 10;
}

/// Document indexing and retrieval defaults
pub mod retrieval {
    /// Default corpus directory
    pub const DEFAULT_KNOWLEDGE_BASE_PATH: &str = "knowledge_base";

    /// Target chunk window in characters
    pub const DEFAULT_CHUNK_SIZE: usize = 850;

    /// Overlap between consecutive windows in characters
    pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

    /// Results returned per query
    pub const DEFAULT_TOP_K: usize = 3;

    /// Scores must be strictly greater than this to be returned
    pub const DEFAULT_MIN_SCORE: f64 = 0.05;

    /// File extensions loaded from the corpus directory
    pub const CORPUS_EXTENSIONS: &[&str] = &["md", "txt"];

    /// BM25 term-frequency saturation
    pub const BM25_K1: f64 = 1.5;

    /// BM25 length normalization
    pub const BM25_B: f64 = 0.75;

    /// Characters of chunk text shown to the model per result
    pub const PROMPT_CHUNK_CHARS: usize = 500;

    /// Characters of a chunk quoted in a fallback reply
    pub const FALLBACK_SNIPPET_CHARS: usize = 160;
}

/// Conversation history defaults
pub mod history {
    /// Transcript length above which compaction runs
    pub const DEFAULT_COMPACTION_TRIGGER: usize = 60;

    /// Oldest non-system turns collapsed into one digest turn
    pub const DEFAULT_COMPACTION_BATCH: usize = 40;

    /// Characters of recent history forwarded to the model
    pub const DEFAULT_PROMPT_CHAR_BUDGET: usize = 4000;

    /// Opening words of every digest turn
    pub const DIGEST_MARKER: &str = "Earlier conversation summary";
}

/// Generation backend defaults
pub mod generation {
    /// Per-request generation window
    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

    /// Sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.55;

    /// Output token cap
    pub const DEFAULT_MAX_TOKENS: u32 = 180;

    /// TCP connect timeout for provider clients
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Energy estimate constants
pub mod estimate {
    /// Half-width of the display band around total expenditure
    pub const RANGE_FRACTION: f64 = 0.05;

    /// Pounds to kilograms
    pub const KG_PER_LB: f64 = 0.4536;

    /// Inches to centimeters
    pub const CM_PER_INCH: f64 = 2.54;

    /// BMI below which the reply suggests a health professional
    pub const LOW_BMI_NOTE: f64 = 16.0;

    /// BMI above which the reply suggests a health professional
    pub const HIGH_BMI_NOTE: f64 = 40.0;
}
