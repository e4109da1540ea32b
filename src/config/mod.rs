// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig and its typed enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for Pierre Coach
//!
//! - **Environment**: Server configuration from environment variables
//! - **Types**: Log level, deployment environment, provider and retrieval enums

/// Environment and server configuration
pub mod environment;
/// Core configuration enums
pub mod types;

pub use environment::{GenerationConfig, HistoryConfig, HttpConfig, RetrievalConfig, ServerConfig};
pub use types::{Environment, LlmProviderType, LogLevel, RetrievalStrategy};
